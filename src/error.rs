use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::services::template_service::render_error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Cell size must be a positive number, got {0}")]
    InvalidCellSize(f64),

    #[error("Error processing image: {0}")]
    Decode(String),

    #[error("Invalid form data: {0}")]
    Multipart(String),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Template error: {0}")]
    Template(#[from] crate::services::template_service::TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedExtension(_)
            | ApiError::InvalidCellSize(_)
            | ApiError::Decode(_)
            | ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(_)
            | ApiError::Template(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Browser form clients get an escaped HTML page with the message.
        let status = self.status_code();
        (status, Html(render_error(&self.to_string()))).into_response()
    }
}
