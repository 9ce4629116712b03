//! First-page geometry and coordinate conversion
//!
//! Editor coordinates are page units with the origin at the top-left corner
//! of the visible page area. PDF user space has its origin at the bottom-left
//! of the MediaBox. The visible area is the CropBox when present, otherwise
//! the MediaBox, either of which may be inherited from a parent Pages node.

use crate::error::PdfError;
use linebox_core::{Point, Rect};
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

/// Guard against cyclic Parent chains
const MAX_INHERIT_DEPTH: usize = 32;

/// Rectangle in PDF user space: lower-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Left edge of the visible area in user space
    pub left: f64,
    /// Top edge of the visible area in user space
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    /// Geometry of a page with its visible area at the user-space origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: height,
            width,
            height,
        }
    }

    fn from_box(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        let (left, right) = (llx.min(urx), llx.max(urx));
        let (bottom, top) = (lly.min(ury), lly.max(ury));
        Self {
            left,
            top,
            width: right - left,
            height: top - bottom,
        }
    }

    /// Geometry of the first page of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfError::ParseError(e.to_string()))?;
        let (_, geometry) = Self::first_page(&doc)?;
        Ok(geometry)
    }

    /// Object id and geometry of the first page of `doc`.
    pub fn first_page(doc: &Document) -> Result<(ObjectId, Self), PdfError> {
        let page_id = doc
            .get_pages()
            .into_values()
            .next()
            .ok_or(PdfError::NoPages)?;
        let page = doc
            .get_dictionary(page_id)
            .map_err(|e| PdfError::ParseError(e.to_string()))?;

        let bounds = inherited(doc, page, b"CropBox")
            .or_else(|| inherited(doc, page, b"MediaBox"))
            .and_then(|obj| parse_box(doc, obj))
            .ok_or_else(|| PdfError::ParseError("first page has no MediaBox".to_string()))?;

        Ok((page_id, Self::from_box(bounds[0], bounds[1], bounds[2], bounds[3])))
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// User-space point to top-left page units.
    pub fn to_page(&self, x: f64, y: f64) -> Point {
        Point::new(x - self.left, self.top - y)
    }

    /// User-space rectangle (left, bottom, right, top) to page units.
    pub fn rect_to_page(&self, left: f64, bottom: f64, right: f64, top: f64) -> Rect {
        let a = self.to_page(left, top);
        let b = self.to_page(right, bottom);
        Rect::from_corners(a, b)
    }

    /// Page-unit rectangle to user space.
    pub fn rect_to_pdf(&self, rect: &Rect) -> PdfRect {
        let rect = rect.normalized();
        PdfRect {
            x: self.left + rect.x0,
            y: self.top - rect.y1,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, walking up the Parent chain.
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut dict = page;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(obj) = dict.get(key) {
            return resolve(doc, obj);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn parse_box(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let items = obj.as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let mut out = [0.0; 4];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = number(resolve(doc, item)?)?;
    }
    Some(out)
}
