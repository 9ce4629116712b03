//! PDF collaborators for the line box editor
//!
//! - [`page`]: first-page geometry and page-unit ↔ user-space conversion
//! - [`loader`]: glyph extraction and rasterization boundary
//! - [`export`]: strokes edited rectangles onto the page with lopdf
//! - [`session`]: load → merge → edit → export for one document
//!
//! The pdfium-backed loader is available with the `pdfium` feature.

pub mod error;
pub mod export;
pub mod loader;
pub mod page;
#[cfg(feature = "pdfium")]
pub mod pdfium;
pub mod session;

pub use error::PdfError;
pub use export::{export_rects, write_output, ExportStyle};
pub use loader::{PageImage, PageLoader};
pub use page::{PageGeometry, PdfRect};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumLoader;
pub use session::{detect_lines, read_source, EditSession};
