//! Asset loading with embedded fallbacks
//!
//! Templates and the default configuration are compiled into the binary
//! with `rust-embed`. When the `TEMPLATES_DIR` or `CONFIG_FILE` env vars
//! point at the filesystem, those copies take precedence and the embedded
//! versions serve as fallback.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded HTML templates
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct EmbeddedTemplates;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External templates directory (from TEMPLATES_DIR env var)
    templates_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader.
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    /// If `None`, embedded assets are used exclusively.
    pub fn new(templates_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            templates_dir,
            config_file,
        }
    }

    /// Create an asset loader from the `TEMPLATES_DIR` and `CONFIG_FILE`
    /// environment variables.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TEMPLATES_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    /// Read a template, trying the filesystem first when configured.
    pub fn read_template(&self, relative_path: &Path) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref dir) = self.templates_dir {
            let full_path = dir.join(relative_path);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading template from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        let path_str = relative_path.to_string_lossy();
        EmbeddedTemplates::get(&path_str)
            .map(|f| {
                tracing::trace!(path = %path_str, "Loading template from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Template not found: {path_str}"),
                )
            })
    }

    /// Read a template as a UTF-8 string.
    pub fn read_template_string(&self, relative_path: &Path) -> io::Result<String> {
        let bytes = self.read_template(relative_path)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read the configuration file as a string.
    ///
    /// Uses the external path when configured and present, otherwise the
    /// embedded `config.yaml`.
    pub fn read_config_string(&self) -> io::Result<String> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return fs::read_to_string(path);
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| String::from_utf8_lossy(&f.data).into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Embedded config missing"))
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(None, None)
    }
}
