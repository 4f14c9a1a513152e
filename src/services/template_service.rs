use crate::assets::AssetLoader;
use std::path::Path;
use std::sync::Arc;
use tera::{Context, Tera};

/// Error type for template rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Service for rendering HTML templates with Tera
pub struct TemplateService {
    assets: Arc<AssetLoader>,
}

impl TemplateService {
    pub fn new(assets: Arc<AssetLoader>) -> Self {
        Self { assets }
    }

    /// Render a template with the given data.
    /// Templates are always loaded fresh to support live editing via
    /// TEMPLATES_DIR.
    pub fn render(
        &self,
        template_name: &str,
        data: &serde_json::Value,
    ) -> Result<String, TemplateError> {
        let template_content = self
            .assets
            .read_template_string(Path::new(template_name))
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        let mut tera = Tera::default();
        tera.add_raw_template(template_name, &template_content)?;

        let context = Context::from_serialize(data)?;
        let html = tera.render(template_name, &context)?;

        Ok(html)
    }
}

/// Render a minimal error page.
///
/// Used by the `ApiError` response mapping, so every handler failure
/// reaches the browser as an escaped HTML page rather than bare text.
pub fn render_error(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Error</title></head>
<body style="font-family: sans-serif; max-width: 40em; margin: 4em auto;">
  <h1>Something went wrong</h1>
  <p style="background: #fff0f0; border: 1px solid #c86464; padding: 1em; border-radius: 6px;">
    {}
  </p>
  <p><a href="/">Back to the upload form</a></p>
</body>
</html>"#,
        html_escape(error)
    )
}

/// Simple HTML escape for error messages
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
