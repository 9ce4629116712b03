//! Pdfium-backed page loader

use crate::error::PdfError;
use crate::loader::{bgra_to_rgba, raster_size, PageImage, PageLoader};
use crate::page::PageGeometry;
use linebox_core::{Glyph, Rect};
use pdfium_render::prelude::{PdfBitmapFormat, PdfDocument, PdfRenderConfig, Pdfium};
use tracing::{debug, warn};

fn render_err(e: impl std::fmt::Display) -> PdfError {
    PdfError::Render(e.to_string())
}

pub struct PdfiumLoader {
    pdfium: Pdfium,
}

impl PdfiumLoader {
    /// Bind to a pdfium library next to the executable, falling back to the
    /// system library.
    pub fn bind() -> Result<Self, PdfError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| {
                warn!(error = %e, "pdfium library not found");
                PdfError::Render(format!(
                    "{e}; place {} next to the executable or install it system-wide",
                    Pdfium::pdfium_platform_library_name().to_string_lossy()
                ))
            })?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    fn open<'a>(&'a self, source: &'a [u8]) -> Result<PdfDocument<'a>, PdfError> {
        self.pdfium
            .load_pdf_from_byte_slice(source, None)
            .map_err(|e| PdfError::ParseError(e.to_string()))
    }
}

impl PageLoader for PdfiumLoader {
    fn extract_glyphs(&self, source: &[u8], geometry: &PageGeometry) -> Result<Vec<Glyph>, PdfError> {
        let document = self.open(source)?;
        let page = document.pages().first().map_err(|_| PdfError::NoPages)?;
        let text = page.text().map_err(render_err)?;

        let mut glyphs = Vec::new();
        for ch in text.chars().iter() {
            let Some(c) = ch.unicode_string().and_then(|s| s.chars().next()) else {
                continue;
            };
            match ch.loose_bounds() {
                Ok(bounds) => glyphs.push(Glyph::new(
                    c,
                    geometry.rect_to_page(
                        f64::from(bounds.left().value),
                        f64::from(bounds.bottom().value),
                        f64::from(bounds.right().value),
                        f64::from(bounds.top().value),
                    ),
                )),
                // Generated separators may have no bounds but still end a word
                Err(_) if c.is_whitespace() => glyphs.push(Glyph::new(c, Rect::default())),
                Err(_) => {}
            }
        }

        debug!(glyphs = glyphs.len(), "glyphs extracted");
        Ok(glyphs)
    }

    fn render(&self, source: &[u8], geometry: &PageGeometry, dpi: f32) -> Result<PageImage, PdfError> {
        let document = self.open(source)?;
        let page = document.pages().first().map_err(|_| PdfError::NoPages)?;

        let (target_width, _) = raster_size(geometry, dpi);
        let target_width = i32::try_from(target_width).map_err(render_err)?;
        let config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_format(PdfBitmapFormat::BGRA);
        let bitmap = page.render_with_config(&config).map_err(render_err)?;

        let width = bitmap.width().max(0) as usize;
        let height = bitmap.height().max(0) as usize;
        let rgba = bgra_to_rgba(&bitmap.as_raw_bytes(), width, height);

        debug!(width, height, dpi, "page rendered");
        Ok(PageImage {
            width,
            height,
            rgba,
        })
    }
}
