//! Write edited rectangles back onto the first page
//!
//! Export always starts from the original document bytes, so exporting the
//! same rectangles twice yields the same drawing rather than stacking a new
//! copy on top of the previous one.

use crate::error::PdfError;
use crate::page::{PageGeometry, PdfRect};
use linebox_core::{ExportConfig, ExportMode, Rect};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Stroke settings applied to every exported rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportStyle {
    pub color: [f32; 3],
    pub line_width: f32,
    pub mode: ExportMode,
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for ExportStyle {
    fn from(config: &ExportConfig) -> Self {
        Self {
            color: config.color,
            line_width: config.line_width,
            mode: config.mode,
        }
    }
}

/// Draw `rects` (top-left page units) onto the first page of `source` and
/// return the serialized document.
pub fn export_rects(source: &[u8], rects: &[Rect], style: &ExportStyle) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::load_mem(source).map_err(|e| PdfError::ParseError(e.to_string()))?;
    let (page_id, geometry) = PageGeometry::first_page(&doc)?;
    let pdf_rects: Vec<PdfRect> = rects.iter().map(|r| geometry.rect_to_pdf(r)).collect();

    match style.mode {
        ExportMode::Content => stroke_into_content(&mut doc, page_id, &pdf_rects, style)?,
        ExportMode::Annotation => {
            for rect in &pdf_rects {
                add_square_annotation(&mut doc, page_id, rect, style)?;
            }
        }
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| PdfError::OperationError(e.to_string()))?;

    debug!(boxes = rects.len(), mode = ?style.mode, bytes = output.len(), "rectangles exported");
    Ok(output)
}

/// Write exported bytes to `path`.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), PdfError> {
    fs::write(path, bytes).map_err(|source| PdfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(())
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn stroke_operations(rects: &[PdfRect], style: &ExportStyle) -> Vec<Operation> {
    let [r, g, b] = style.color;
    let mut ops = Vec::with_capacity(rects.len() * 6);
    for rect in rects {
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "RG",
            vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        ));
        ops.push(Operation::new("w", vec![Object::Real(style.line_width)]));
        ops.push(Operation::new(
            "re",
            vec![real(rect.x), real(rect.y), real(rect.width), real(rect.height)],
        ));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }
    ops
}

fn content_stream(doc: &mut Document, operations: Vec<Operation>) -> Result<ObjectId, PdfError> {
    let bytes = Content { operations }
        .encode()
        .map_err(|e| PdfError::OperationError(e.to_string()))?;
    Ok(doc.add_object(Stream::new(Dictionary::new(), bytes)))
}

/// Existing content stream references of a page, flattening an indirect
/// Contents array.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, PdfError> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfError::OperationError(e.to_string()))?;
    let contents = match page.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };
    Ok(match contents {
        Object::Array(items) => items.clone(),
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        _ => Vec::new(),
    })
}

/// Wrap the page content in `q … Q` and append one stream stroking every
/// rectangle, so the page's graphics state cannot leak into the boxes.
fn stroke_into_content(
    doc: &mut Document,
    page_id: ObjectId,
    rects: &[PdfRect],
    style: &ExportStyle,
) -> Result<(), PdfError> {
    let existing = existing_contents(doc, page_id)?;

    let open_id = content_stream(doc, vec![Operation::new("q", vec![])])?;
    let close_id = content_stream(doc, vec![Operation::new("Q", vec![])])?;
    let boxes_id = content_stream(doc, stroke_operations(rects, style))?;

    let mut contents = Vec::with_capacity(existing.len() + 3);
    contents.push(Object::Reference(open_id));
    contents.extend(existing);
    contents.push(Object::Reference(close_id));
    contents.push(Object::Reference(boxes_id));

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| PdfError::OperationError(e.to_string()))?;
    let dict = page
        .as_dict_mut()
        .map_err(|e| PdfError::OperationError(e.to_string()))?;
    dict.set("Contents", Object::Array(contents));
    Ok(())
}

fn add_square_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    rect: &PdfRect,
    style: &ExportStyle,
) -> Result<(), PdfError> {
    let [r, g, b] = style.color;
    let annot = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Square",
        "Rect" => vec![
            real(rect.x),
            real(rect.y),
            real(rect.x + rect.width),
            real(rect.y + rect.height),
        ],
        "C" => vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        "BS" => dictionary! {
            "W" => Object::Real(style.line_width),
        },
        // Print flag
        "F" => 4,
    };
    let annot_id = doc.add_object(annot);
    add_annotation_to_page(doc, page_id, annot_id)
}

fn add_annotation_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), PdfError> {
    let indirect = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Annots").ok())
        .and_then(|annots| annots.as_reference().ok());

    if let Some(array_id) = indirect {
        if let Ok(Object::Array(arr)) = doc.get_object_mut(array_id) {
            arr.push(Object::Reference(annot_id));
            return Ok(());
        }
    }

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| PdfError::OperationError(e.to_string()))?;

    if let Object::Dictionary(ref mut page_dict) = page {
        if let Ok(Object::Array(ref mut arr)) = page_dict.get_mut(b"Annots") {
            arr.push(Object::Reference(annot_id));
        } else {
            page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
        }
    }
    Ok(())
}
