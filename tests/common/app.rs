//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use gridlens::assets::AssetLoader;
use gridlens::models::AppConfig;
use gridlens::server::{build_router, create_app_state};

use super::fixtures::MultipartForm;

/// Test application with router and direct access to the upload directory
pub struct TestApp {
    router: axum::Router,
    pub upload_dir: PathBuf,
    // Held so the upload directory outlives the test
    _upload_root: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application with an isolated upload directory
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with custom configuration.
    ///
    /// The upload directory is always replaced with an isolated temp dir.
    pub fn with_config(mut config: AppConfig) -> Self {
        let upload_root = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = upload_root.path().join("uploads");
        config.upload_dir = upload_dir.clone();

        let config = Arc::new(config);
        let asset_loader = Arc::new(AssetLoader::default());

        let state = create_app_state(config, asset_loader).expect("Failed to create app state");
        let router = build_router(state);

        Self {
            router,
            upload_dir,
            _upload_root: upload_root,
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a multipart form to the given path
    pub async fn post_form(&self, path: &str, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.finish();
        self.request(
            Request::post(path)
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Names of files currently in the upload directory
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter_map(|e| e.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
