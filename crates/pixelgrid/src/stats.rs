//! Per-channel color statistics.
//!
//! One pass over the pixels produces a fixed-bin histogram and an exact
//! mean for each of the three RGB channels. Grayscale inputs are
//! normalized to RGB first, so their three channel slots carry identical
//! distributions.

use image::DynamicImage;

/// Number of histogram bins per channel over the 0-255 intensity range.
///
/// Bin width is `256 / 50` rounded down; the last bin absorbs the
/// remainder so every sample lands in exactly one bin.
pub const HISTOGRAM_BINS: usize = 50;

/// Per-channel histograms and mean intensities for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    /// Sample counts per bin, indexed `[channel][bin]` with channels in
    /// red, green, blue order.
    pub counts: [[u32; HISTOGRAM_BINS]; 3],
    /// Exact per-channel mean intensity in the 0-255 range.
    pub means: [f64; 3],
    /// Total number of pixels sampled per channel.
    pub pixels: u64,
}

impl ChannelStats {
    /// Compute statistics for an image.
    ///
    /// The input is normalized to 8-bit RGB; a grayscale source therefore
    /// yields three identical channel distributions.
    pub fn of(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let pixels = u64::from(rgb.width()) * u64::from(rgb.height());

        let mut counts = [[0u32; HISTOGRAM_BINS]; 3];
        let mut sums = [0u64; 3];

        for pixel in rgb.pixels() {
            for (channel, &value) in pixel.0.iter().enumerate() {
                counts[channel][bin_of(value)] += 1;
                sums[channel] += u64::from(value);
            }
        }

        let means = if pixels == 0 {
            [0.0; 3]
        } else {
            [
                sums[0] as f64 / pixels as f64,
                sums[1] as f64 / pixels as f64,
                sums[2] as f64 / pixels as f64,
            ]
        };

        Self {
            counts,
            means,
            pixels,
        }
    }

    /// The largest bin count across all three channels.
    ///
    /// Used to scale chart axes; returns 1 for an empty image so callers
    /// never divide by zero.
    pub fn max_count(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|channel| channel.iter())
            .copied()
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

/// Map an 8-bit intensity to its histogram bin.
fn bin_of(value: u8) -> usize {
    let width = 256 / HISTOGRAM_BINS; // 5
    (value as usize / width).min(HISTOGRAM_BINS - 1)
}
