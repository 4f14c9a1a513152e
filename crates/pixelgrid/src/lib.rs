//! pixelgrid: checkerboard overlays and per-channel color statistics
//!
//! This library holds the pure image transformations behind the gridlens
//! server: painting a checkerboard pattern over an image and computing
//! per-channel histograms and mean intensities. Both are total,
//! single-pass functions over decoded images -- no I/O, no retained state,
//! no failure modes beyond what the type system rules out.
//!
//! # Quick Start
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use pixelgrid::{overlay, ChannelStats};
//!
//! let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(
//!     100,
//!     100,
//!     image::Rgb([255, 255, 255]),
//! ));
//!
//! // 10% of the shorter dimension -> 10px cells
//! let patterned = overlay(&white, 10.0);
//! assert_eq!(patterned.dimensions(), (100, 100));
//!
//! let stats = ChannelStats::of(&DynamicImage::ImageRgb8(patterned));
//! assert!(stats.means[0] < 255.0);
//! ```

pub mod pattern;
pub mod stats;

pub use pattern::{cell_edge, overlay};
pub use stats::{ChannelStats, HISTOGRAM_BINS};
