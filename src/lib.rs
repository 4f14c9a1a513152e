//! Gridlens
//!
//! Web app that overlays a checkerboard pattern on an uploaded image and
//! shows per-channel color statistics for the original and processed
//! versions. This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
