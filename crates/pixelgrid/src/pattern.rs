//! Checkerboard pattern overlay.
//!
//! The image is partitioned into square cells anchored at the origin.
//! Cells whose grid coordinate sum is odd are painted solid black; cells
//! with an even sum keep their original pixels. The even cells are never
//! repainted -- the overlay darkens half the board and leaves the other
//! half untouched, so re-applying the overlay is a no-op on already
//! painted cells.

use image::{DynamicImage, Rgb, RgbImage};

/// Compute the cell edge length in pixels for a given image size.
///
/// The percentage applies to the shorter image dimension and the result
/// is clamped to at least one pixel, so degenerate inputs (tiny images,
/// tiny percentages) never produce a zero-sized cell.
///
/// ```
/// use pixelgrid::cell_edge;
///
/// assert_eq!(cell_edge(100, 100, 10.0), 10);
/// assert_eq!(cell_edge(200, 100, 10.0), 10); // shorter dimension wins
/// assert_eq!(cell_edge(1, 1, 1.0), 1); // clamped
/// ```
pub fn cell_edge(width: u32, height: u32, cell_size_percent: f64) -> u32 {
    let shorter = width.min(height) as f64;
    let edge = (shorter * cell_size_percent / 100.0).floor() as u32;
    edge.max(1)
}

/// Paint a checkerboard pattern over an image.
///
/// The input is normalized to 8-bit RGB (grayscale and palette images are
/// converted, alpha is dropped) and a new buffer of identical dimensions
/// is returned; the input is never mutated. Cells truncated by the image
/// boundary are clamped, not wrapped or padded.
///
/// This is a total function: any decodable image and any positive
/// `cell_size_percent` succeed. A 1x1 image has a single cell at grid
/// (0, 0) with even coordinate sum, so it is returned unchanged.
pub fn overlay(image: &DynamicImage, cell_size_percent: f64) -> RgbImage {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let cell = cell_edge(width, height, cell_size_percent);

    let mut out = rgb;
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        if (x / cell + y / cell) % 2 == 1 {
            *pixel = Rgb([0, 0, 0]);
        }
    }

    out
}
