//! Page loading boundary
//!
//! A [`PageLoader`] extracts positioned glyphs from the first page and
//! rasterizes it for the canvas background. Glyph rectangles are returned in
//! top-left page units relative to the given [`PageGeometry`].

use crate::error::PdfError;
use crate::page::PageGeometry;
use linebox_core::Glyph;

/// Owned RGBA8 raster of a page, row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PageImage {
    /// Opaque white image, used when no backend rendering is available.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![255; width * height * 4],
        }
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }
}

pub trait PageLoader {
    /// Glyphs of the first page in content order.
    fn extract_glyphs(&self, source: &[u8], geometry: &PageGeometry) -> Result<Vec<Glyph>, PdfError>;

    /// Rasterize the first page at `dpi`.
    fn render(&self, source: &[u8], geometry: &PageGeometry, dpi: f32) -> Result<PageImage, PdfError>;
}

/// Pixel size of a page rendered at `dpi`, at least one pixel per axis.
pub fn raster_size(geometry: &PageGeometry, dpi: f32) -> (usize, usize) {
    let scale = f64::from(dpi) / 72.0;
    let w = (geometry.width * scale).round().max(1.0) as usize;
    let h = (geometry.height * scale).round().max(1.0) as usize;
    (w, h)
}

/// Convert a BGRA bitmap whose rows may carry padding into tight RGBA rows.
/// Missing source bytes read as opaque white.
pub fn bgra_to_rgba(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let stride = if height == 0 { 0 } else { src.len() / height };
    let mut pixels = Vec::with_capacity(width.saturating_mul(height).saturating_mul(4));
    for y in 0..height {
        let base = y.saturating_mul(stride);
        for x in 0..width {
            let idx = base.saturating_add(x.saturating_mul(4));
            let px = |i: usize| src.get(idx + i).copied().unwrap_or(255);
            pixels.extend_from_slice(&[px(2), px(1), px(0), px(3)]);
        }
    }
    pixels
}
