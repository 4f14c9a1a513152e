//! Page handlers: the upload form and the processing POST.

use axum::{
    extract::{Multipart, State},
    response::Html,
};
use image::DynamicImage;
use serde_json::json;

use crate::error::ApiError;
use crate::server::AppState;
use crate::services::upload_store::{allowed_file, extension_of, DEFAULT_IMAGE};

/// Render the upload form with the default image and no charts.
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state.store.ensure_default()?;

    let html = state.templates.render(
        "index.html",
        &json!({
            "page_title": state.config.page_title,
            "cell_size": state.config.default_cell_percent,
            "original_image": format!("/uploads/{DEFAULT_IMAGE}"),
            "processed_image": null,
            "original_plot": null,
            "processed_plot": null,
        }),
    )?;

    Ok(Html(html))
}

/// Collected multipart form fields.
#[derive(Default)]
struct ProcessForm {
    /// Uploaded file as (client file name, bytes), when present and non-empty
    upload: Option<(String, Vec<u8>)>,
    /// Parsed cell_size field, when present and parseable
    cell_size: Option<f64>,
}

/// Process an upload: checkerboard overlay plus statistics charts for the
/// original and processed image.
///
/// A missing or empty file falls back to the default image; a missing or
/// unparseable `cell_size` falls back to the configured default. Both
/// stored images get a per-request unique id so concurrent requests never
/// overwrite each other.
pub async fn handle_process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let form = read_form(multipart).await?;

    let cell_size = form.cell_size.unwrap_or(state.config.default_cell_percent);
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(ApiError::InvalidCellSize(cell_size));
    }

    let id = state.store.new_request_id();

    // Decode the upload, or the default image when there is none.
    let (original_name, image) = match form.upload {
        Some((file_name, bytes)) => {
            if !allowed_file(&file_name) {
                return Err(ApiError::UnsupportedExtension(file_name));
            }
            // allowed_file guarantees an extension exists
            let ext = extension_of(&file_name).unwrap_or_default();
            let image = decode(&bytes)?;
            let stored = state.store.save_original(&id, &ext, &bytes)?;

            tracing::info!(
                request_id = %id,
                file = %file_name,
                bytes = bytes.len(),
                "Stored upload"
            );
            (stored, image)
        }
        None => {
            state.store.ensure_default()?;
            let bytes = state.store.read(DEFAULT_IMAGE)?;
            (DEFAULT_IMAGE.to_string(), decode(&bytes)?)
        }
    };

    let processed = pixelgrid::overlay(&image, cell_size);
    let processed_name = state.store.save_processed(&id, &processed)?;
    let processed = DynamicImage::ImageRgb8(processed);

    let original_plot = state.charts.render(&image, "Original Image")?;
    let processed_plot = state.charts.render(&processed, "Processed Image")?;

    tracing::info!(
        request_id = %id,
        cell_size = cell_size,
        width = image.width(),
        height = image.height(),
        "Processed image"
    );

    let html = state.templates.render(
        "index.html",
        &json!({
            "page_title": state.config.page_title,
            "cell_size": cell_size,
            "original_image": format!("/uploads/{original_name}"),
            "processed_image": format!("/uploads/{processed_name}"),
            "original_plot": original_plot,
            "processed_plot": processed_plot,
        }),
    )?;

    Ok(Html(html))
}

/// Drain the multipart stream into the fields we care about.
async fn read_form(mut multipart: Multipart) -> Result<ProcessForm, ApiError> {
    let mut form = ProcessForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("cell_size") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Multipart(e.to_string()))?;
                form.cell_size = text.trim().parse().ok();
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Multipart(e.to_string()))?;

                // Browsers submit an empty file part when nothing was picked.
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.upload = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, ApiError> {
    image::load_from_memory(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
