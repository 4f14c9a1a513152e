use crate::assets::AssetLoader;
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Directory where uploaded and processed images are stored
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Cell size percentage used when the form omits the field
    #[serde(default = "default_cell_percent")]
    pub default_cell_percent: f64,

    /// Upper bound on accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Title shown on the rendered page
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("static/uploads")
}

fn default_cell_percent() -> f64 {
    10.0
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_page_title() -> String {
    "Gridlens".to_string()
}

impl AppConfig {
    /// Load configuration from the asset loader (embedded or external).
    ///
    /// Parse and read failures fall back to defaults with a warning, so a
    /// broken config file never prevents startup.
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        upload_dir = %config.upload_dir.display(),
                        default_cell_percent = config.default_cell_percent,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            default_cell_percent: default_cell_percent(),
            max_upload_bytes: default_max_upload_bytes(),
            page_title: default_page_title(),
        }
    }
}
