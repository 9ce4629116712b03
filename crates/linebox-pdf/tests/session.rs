//! Edit session integration tests
//!
//! Drives load → merge → edit → export through a fake loader, so no pdfium
//! library is needed.

use linebox_core::{
    Anchor, BoxEffect, EditorConfig, ExportMode, Glyph, LineBox, Point, Rect, SceneEffect,
};
use linebox_pdf::{EditSession, PageGeometry, PageImage, PageLoader, PdfError};
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::path::PathBuf;

struct FakeLoader {
    glyphs: Vec<Glyph>,
    renders: Cell<usize>,
}

impl FakeLoader {
    fn new(glyphs: Vec<Glyph>) -> Self {
        Self {
            glyphs,
            renders: Cell::new(0),
        }
    }
}

impl PageLoader for FakeLoader {
    fn extract_glyphs(&self, _source: &[u8], _geometry: &PageGeometry) -> Result<Vec<Glyph>, PdfError> {
        Ok(self.glyphs.clone())
    }

    fn render(&self, _source: &[u8], geometry: &PageGeometry, _dpi: f32) -> Result<PageImage, PdfError> {
        self.renders.set(self.renders.get() + 1);
        Ok(PageImage::blank(geometry.width as usize, geometry.height as usize))
    }
}

struct FailingLoader;

impl PageLoader for FailingLoader {
    fn extract_glyphs(&self, _source: &[u8], _geometry: &PageGeometry) -> Result<Vec<Glyph>, PdfError> {
        Err(PdfError::Render("no backend".to_string()))
    }

    fn render(&self, _source: &[u8], _geometry: &PageGeometry, _dpi: f32) -> Result<PageImage, PdfError> {
        Err(PdfError::Render("no backend".to_string()))
    }
}

fn glyph(ch: char, x0: f64, y0: f64, x1: f64, y1: f64) -> Glyph {
    Glyph::new(ch, Rect::new(x0, y0, x1, y1))
}

/// "ab cd" on one line, "ef" on the next.
fn sample_glyphs() -> Vec<Glyph> {
    vec![
        glyph('a', 50.0, 100.0, 56.0, 112.0),
        glyph('b', 56.0, 100.0, 62.0, 112.0),
        glyph(' ', 62.0, 100.0, 65.0, 112.0),
        glyph('c', 65.0, 100.0, 71.0, 112.0),
        glyph('d', 71.0, 100.0, 77.0, 112.0),
        glyph('\n', 77.0, 100.0, 77.0, 112.0),
        glyph('e', 50.0, 140.0, 56.0, 152.0),
        glyph('f', 56.0, 140.0, 62.0, 152.0),
    ]
}

fn letter_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for _ in 0..page_count {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"BT /F1 12 Tf 50 680 Td (ab cd) Tj ET\n".to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn open_sample(config: EditorConfig) -> EditSession {
    EditSession::from_bytes(letter_pdf(1), &FakeLoader::new(sample_glyphs()), config).unwrap()
}

fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("not a number: {:?}", other),
    }
}

fn stroked_rects(bytes: &[u8]) -> Vec<[f64; 4]> {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "re")
        .map(|op| {
            let v: Vec<f64> = op.operands.iter().map(number).collect();
            [v[0], v[1], v[2], v[3]]
        })
        .collect()
}

fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("linebox-{}-{}.pdf", name, std::process::id()))
}

#[test]
fn test_open_detects_lines_and_builds_scene() {
    let session = open_sample(EditorConfig::default());

    assert_eq!(session.words().len(), 3);
    assert_eq!(
        session.lines(),
        &[
            LineBox {
                x0: 50.0,
                y0: 100.0,
                x1: 77.0,
                y1: 112.0
            },
            LineBox {
                x0: 50.0,
                y0: 140.0,
                x1: 62.0,
                y1: 152.0
            },
        ]
    );
    assert_eq!(session.scene().len(), 2);
    assert_eq!(session.scene().selected(), None);
    assert_eq!(session.image().size(), [612, 792]);
}

#[test]
fn test_merge_thresholds_come_from_config() {
    let mut config = EditorConfig::default();
    config.merge.horizontal_gap = 1.0;
    let session = open_sample(config);
    // The 3-unit gap between "ab" and "cd" no longer merges
    assert_eq!(session.lines().len(), 3);
}

#[test]
fn test_unedited_export_strokes_detected_lines() {
    let session = open_sample(EditorConfig::default());
    let out = session.export().unwrap();
    assert_eq!(
        stroked_rects(&out),
        vec![[50.0, 680.0, 27.0, 12.0], [50.0, 640.0, 12.0, 12.0]]
    );
}

#[test]
fn test_moved_box_exports_at_new_position() {
    let mut session = open_sample(EditorConfig::default());
    let scene = session.scene_mut();

    // First press selects, second press starts the move
    scene.pointer_pressed(Point::new(60.0, 105.0));
    scene.pointer_released();
    scene.pointer_pressed(Point::new(60.0, 105.0));
    let effects = scene.pointer_dragged(Point::new(70.0, 115.0));
    scene.pointer_released();

    assert_eq!(
        effects,
        vec![SceneEffect {
            id: 0,
            effect: BoxEffect::GeometryChanged(Rect::new(60.0, 110.0, 87.0, 122.0)),
        }]
    );

    let out = session.export().unwrap();
    assert_eq!(
        stroked_rects(&out),
        vec![[60.0, 670.0, 27.0, 12.0], [50.0, 640.0, 12.0, 12.0]]
    );
    // Detected lines are unaffected by edits
    assert_eq!(session.lines()[0].x0, 50.0);
}

#[test]
fn test_resize_through_handle_and_guard() {
    let mut session = open_sample(EditorConfig::default());
    let scene = session.scene_mut();
    scene.select(1).unwrap();

    let corner = scene.get(1).unwrap().handle(Anchor::BottomRight).position;
    scene.pointer_pressed(corner);
    scene.pointer_dragged(Point::new(80.0, 160.0));
    let rejected = scene.pointer_dragged(Point::new(52.0, 142.0));
    scene.pointer_released();

    assert!(matches!(
        rejected.as_slice(),
        [SceneEffect {
            id: 1,
            effect: BoxEffect::ResizeRejected { .. }
        }]
    ));
    assert_eq!(
        session.scene().get(1).unwrap().rect(),
        Rect::new(50.0, 140.0, 80.0, 160.0)
    );
    assert_eq!(
        stroked_rects(&session.export().unwrap())[1],
        [50.0, 632.0, 30.0, 20.0]
    );
}

#[test]
fn test_repeated_export_does_not_accumulate() {
    let session = open_sample(EditorConfig::default());
    let first = session.export().unwrap();
    let second = session.export().unwrap();
    assert_eq!(stroked_rects(&first).len(), 2);
    assert_eq!(stroked_rects(&first), stroked_rects(&second));
}

#[test]
fn test_export_to_file_writes_configured_output() {
    let path = temp_output("export");
    let mut config = EditorConfig::default();
    config.export.output = path.clone();
    let session = open_sample(config);

    let written = session.export_to_file().unwrap();
    assert_eq!(written, path);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(stroked_rects(&bytes).len(), 2);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_export_to_unwritable_path_reports_io_error() {
    let path = PathBuf::from("/nonexistent-dir/edited.pdf");
    let session = open_sample(EditorConfig::default());

    match session.export_to(&path) {
        Err(PdfError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_annotation_mode_export() {
    let mut config = EditorConfig::default();
    config.export.mode = ExportMode::Annotation;
    let session = open_sample(config);

    let out = session.export().unwrap();
    let doc = Document::load_mem(&out).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let annots = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Annots")
        .unwrap()
        .as_array()
        .unwrap()
        .len();
    assert_eq!(annots, 2);
    assert!(stroked_rects(&out).is_empty());
}

#[test]
fn test_loader_renders_once_at_open() {
    let loader = FakeLoader::new(sample_glyphs());
    let session = EditSession::from_bytes(letter_pdf(1), &loader, EditorConfig::default()).unwrap();
    session.export().unwrap();
    assert_eq!(loader.renders.get(), 1);
}

#[test]
fn test_document_without_pages_is_rejected() {
    let result = EditSession::from_bytes(
        letter_pdf(0),
        &FakeLoader::new(sample_glyphs()),
        EditorConfig::default(),
    );
    assert!(matches!(result, Err(PdfError::NoPages)));
}

#[test]
fn test_loader_failure_propagates() {
    let result = EditSession::from_bytes(letter_pdf(1), &FailingLoader, EditorConfig::default());
    assert!(matches!(result, Err(PdfError::Render(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = EditSession::open(
        std::path::Path::new("/nonexistent/input.pdf"),
        &FakeLoader::new(sample_glyphs()),
        EditorConfig::default(),
    );
    assert!(matches!(result, Err(PdfError::Io { .. })));
}
