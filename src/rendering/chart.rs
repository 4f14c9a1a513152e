//! Color-statistics chart rendering.
//!
//! For one image this produces a two-panel chart: the left panel overlays
//! the red/green/blue histograms with partial opacity and a legend, the
//! right panel bars the per-channel mean intensities on a fixed 0-255
//! axis. The chart is built as SVG, rasterized with resvg onto a
//! tiny-skia pixmap, PNG-encoded and returned base64 encoded so the page
//! can embed it as a data URI without separate file storage.

use crate::error::RenderError;
use base64::Engine;
use image::DynamicImage;
use pixelgrid::{ChannelStats, HISTOGRAM_BINS};
use resvg::usvg;
use std::fmt::Write as _;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Rendered chart dimensions in pixels.
const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 400;

/// Plot area of the left (histogram) panel.
const HIST_PANEL: Panel = Panel {
    left: 60.0,
    top: 50.0,
    width: 500.0,
    height: 290.0,
};

/// Plot area of the right (mean bars) panel.
const MEAN_PANEL: Panel = Panel {
    left: 660.0,
    top: 50.0,
    width: 500.0,
    height: 290.0,
};

const CHANNEL_COLORS: [&str; 3] = ["red", "green", "blue"];
const CHANNEL_NAMES: [&str; 3] = ["Red", "Green", "Blue"];

/// Axis-aligned plot rectangle.
struct Panel {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Panel {
    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Renders per-channel statistics charts for images.
pub struct ChartRenderer {
    /// Font database for chart text rendering
    fontdb: Arc<fontdb::Database>,
}

impl ChartRenderer {
    /// Create a renderer backed by the system font database.
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(font_count = fontdb.len(), "Loaded fonts for chart text");

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Render the statistics chart for an image.
    ///
    /// Returns the chart PNG as a base64 string. Total over valid decoded
    /// images; the only failure modes are in the rasterization pipeline.
    pub fn render(&self, image: &DynamicImage, title: &str) -> Result<String, RenderError> {
        let stats = ChannelStats::of(image);
        let svg = chart_svg(&stats, title);
        let pixmap = self.rasterize(&svg)?;
        let png = encode_png(&pixmap)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(png))
    }

    /// Render the statistics chart straight to PNG bytes (CLI use).
    pub fn render_png(&self, image: &DynamicImage, title: &str) -> Result<Vec<u8>, RenderError> {
        let stats = ChannelStats::of(image);
        let svg = chart_svg(&stats, title);
        let pixmap = self.rasterize(&svg)?;
        encode_png(&pixmap)
    }

    /// Parse and rasterize the chart SVG to an RGBA pixmap.
    fn rasterize(&self, svg: &str) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let mut pixmap =
            Pixmap::new(CHART_WIDTH, CHART_HEIGHT).ok_or(RenderError::PixmapAllocation)?;
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(&tree, usvg::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the two-panel chart SVG from computed statistics.
fn chart_svg(stats: &ChannelStats, title: &str) -> String {
    let mut svg = String::with_capacity(32 * 1024);

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{CHART_HEIGHT}" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}">"#
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);

    histogram_panel(&mut svg, stats, title);
    mean_panel(&mut svg, stats, title);

    svg.push_str("</svg>");
    svg
}

/// Left panel: overlaid per-channel histograms with a legend.
fn histogram_panel(svg: &mut String, stats: &ChannelStats, title: &str) {
    let panel = &HIST_PANEL;
    let max = f64::from(stats.max_count());

    panel_frame(
        svg,
        panel,
        &format!("{title} - Color Distribution"),
        "Color Value",
        "Frequency",
    );

    // Horizontal grid lines plus count labels, 5 divisions.
    for i in 0..=5 {
        let y = panel.bottom() - panel.height * f64::from(i) / 5.0;
        grid_line(svg, panel.left, y, panel.right(), y);
        let label = (max * f64::from(i) / 5.0).round() as u64;
        let _ = write!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11" fill="#333">{label}</text>"##,
            panel.left - 6.0,
            y + 4.0,
        );
    }

    // Intensity labels along the x axis.
    for value in [0u32, 64, 128, 192, 255] {
        let x = panel.left + panel.width * f64::from(value) / 255.0;
        let _ = write!(
            svg,
            r##"<text x="{x:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="11" fill="#333">{value}</text>"##,
            panel.bottom() + 16.0,
        );
    }

    // One translucent bar series per channel, overlaid in RGB order.
    let bar_width = panel.width / HISTOGRAM_BINS as f64;
    for (channel, color) in CHANNEL_COLORS.iter().enumerate() {
        for (bin, &count) in stats.counts[channel].iter().enumerate() {
            if count == 0 {
                continue;
            }
            let height = panel.height * f64::from(count) / max;
            let _ = write!(
                svg,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{color}" fill-opacity="0.7"/>"#,
                panel.left + bin as f64 * bar_width,
                panel.bottom() - height,
                bar_width,
                height,
            );
        }
    }

    // Legend in the top-right corner of the plot area.
    for (i, (color, name)) in CHANNEL_COLORS.iter().zip(CHANNEL_NAMES).enumerate() {
        let y = panel.top + 10.0 + i as f64 * 18.0;
        let _ = write!(
            svg,
            r#"<rect x="{:.1}" y="{y:.1}" width="12" height="12" fill="{color}" fill-opacity="0.7"/>"#,
            panel.right() - 70.0,
        );
        let _ = write!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" fill="#333">{name}</text>"##,
            panel.right() - 53.0,
            y + 10.0,
        );
    }
}

/// Right panel: per-channel mean bars on a fixed 0-255 axis.
fn mean_panel(svg: &mut String, stats: &ChannelStats, title: &str) {
    let panel = &MEAN_PANEL;

    panel_frame(
        svg,
        panel,
        &format!("{title} - Average Colors"),
        "",
        "Average Value",
    );

    // Grid lines with 0-255 labels.
    for value in [0u32, 51, 102, 153, 204, 255] {
        let y = panel.bottom() - panel.height * f64::from(value) / 255.0;
        grid_line(svg, panel.left, y, panel.right(), y);
        let _ = write!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11" fill="#333">{value}</text>"##,
            panel.left - 6.0,
            y + 4.0,
        );
    }

    let slot = panel.width / 3.0;
    let bar_width = slot * 0.6;
    for (channel, (color, name)) in CHANNEL_COLORS.iter().zip(CHANNEL_NAMES).enumerate() {
        let mean = stats.means[channel].clamp(0.0, 255.0);
        let height = panel.height * mean / 255.0;
        let x = panel.left + channel as f64 * slot + (slot - bar_width) / 2.0;

        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{color}" fill-opacity="0.7"/>"#,
            panel.bottom() - height,
        );

        // Channel name below the bar, mean value above it.
        let center = x + bar_width / 2.0;
        let _ = write!(
            svg,
            r##"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12" fill="#333">{name}</text>"##,
            panel.bottom() + 16.0,
        );
        let _ = write!(
            svg,
            r##"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="11" fill="#333">{mean:.1}</text>"##,
            (panel.bottom() - height - 5.0).max(panel.top + 10.0),
        );
    }
}

/// Panel border, title and axis captions shared by both panels.
fn panel_frame(svg: &mut String, panel: &Panel, title: &str, x_label: &str, y_label: &str) {
    let _ = write!(
        svg,
        r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#999" stroke-width="1"/>"##,
        panel.left, panel.top, panel.width, panel.height,
    );

    let center = panel.left + panel.width / 2.0;
    let _ = write!(
        svg,
        r##"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="16" font-weight="bold" fill="#111">{}</text>"##,
        panel.top - 18.0,
        xml_escape(title),
    );

    if !x_label.is_empty() {
        let _ = write!(
            svg,
            r##"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12" fill="#333">{x_label}</text>"##,
            panel.bottom() + 34.0,
        );
    }

    if !y_label.is_empty() {
        let x = panel.left - 40.0;
        let y = panel.top + panel.height / 2.0;
        let _ = write!(
            svg,
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-family="sans-serif" font-size="12" fill="#333" transform="rotate(-90 {x:.1} {y:.1})">{y_label}</text>"##,
        );
    }
}

fn grid_line(svg: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    let _ = write!(
        svg,
        r##"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="#ccc" stroke-opacity="0.5" stroke-width="1"/>"##
    );
}

/// Escape text content for SVG embedding.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Encode the pixmap as an 8-bit RGB PNG, compositing alpha against white.
fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let mut rgb = Vec::with_capacity((pixmap.width() * pixmap.height() * 3) as usize);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        let (r, g, b, a) = (c.red(), c.green(), c.blue(), c.alpha());
        if a == 255 {
            rgb.extend_from_slice(&[r, g, b]);
        } else {
            // Alpha composite against white
            let af = u16::from(a);
            rgb.extend_from_slice(&[
                ((u16::from(r) * af + 255 * (255 - af)) / 255) as u8,
                ((u16::from(g) * af + 255 * (255 - af)) / 255) as u8,
                ((u16::from(b) * af + 255 * (255 - af)) / 255) as u8,
            ]);
        }
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(out)
}
