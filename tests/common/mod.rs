//! Shared test utilities.

pub mod app;
pub mod fixtures;

pub use app::{TestApp, TestResponse};

use axum::http::StatusCode;

/// Assert a 200 response
pub fn assert_ok(response: &TestResponse) {
    assert_eq!(
        response.status,
        StatusCode::OK,
        "Expected 200 OK, got {} with body: {}",
        response.status,
        response.text()
    );
}

/// Assert a 400 response whose body mentions `needle`
pub fn assert_bad_request(response: &TestResponse, needle: &str) {
    assert_eq!(
        response.status,
        StatusCode::BAD_REQUEST,
        "Expected 400, got {} with body: {}",
        response.status,
        response.text()
    );
    assert!(
        response.text().contains(needle),
        "Body should contain {needle:?}: {}",
        response.text()
    );
}

/// Assert a response is a PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG body, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..response.body.len().min(8)]
    );
}

/// Extract the first `/uploads/...` URL ending in `suffix` from a page.
pub fn extract_upload_url(html: &str, suffix: &str) -> String {
    let end = html
        .find(suffix)
        .unwrap_or_else(|| panic!("No URL ending in {suffix} in page"))
        + suffix.len();
    let start = html[..end]
        .rfind("/uploads/")
        .expect("URL should start with /uploads/");
    html[start..end].to_string()
}
