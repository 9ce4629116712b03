//! Edit session for a single document
//!
//! Holds the original bytes, the rendered first page, the detected line
//! boxes and the editable scene built from them. Export always reads the
//! scene's current rectangles and draws them onto the original bytes.

use crate::error::PdfError;
use crate::export::{export_rects, write_output, ExportStyle};
use crate::loader::{PageImage, PageLoader};
use crate::page::PageGeometry;
use linebox_core::{group_words, merge_words, BoxScene, EditorConfig, LineBox, MergeThresholds, WordBox};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Read a document from disk.
pub fn read_source(path: &Path) -> Result<Vec<u8>, PdfError> {
    fs::read(path).map_err(|source| PdfError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Words and merged lines of the first page, without rendering it.
pub fn detect_lines(
    source: &[u8],
    geometry: &PageGeometry,
    loader: &dyn PageLoader,
    thresholds: &MergeThresholds,
) -> Result<(Vec<WordBox>, Vec<LineBox>), PdfError> {
    let glyphs = loader.extract_glyphs(source, geometry)?;
    let words = group_words(&glyphs);
    let lines = merge_words(&words, thresholds);
    Ok((words, lines))
}

pub struct EditSession {
    source: Vec<u8>,
    geometry: PageGeometry,
    image: PageImage,
    words: Vec<WordBox>,
    lines: Vec<LineBox>,
    scene: BoxScene,
    config: EditorConfig,
}

impl EditSession {
    /// Load `path`, detect its line boxes and render the first page.
    pub fn open(path: &Path, loader: &dyn PageLoader, config: EditorConfig) -> Result<Self, PdfError> {
        let source = read_source(path)?;
        let session = Self::from_bytes(source, loader, config)?;
        info!(path = %path.display(), "document opened");
        Ok(session)
    }

    pub fn from_bytes(
        source: Vec<u8>,
        loader: &dyn PageLoader,
        config: EditorConfig,
    ) -> Result<Self, PdfError> {
        let geometry = PageGeometry::from_bytes(&source)?;
        let (words, lines) = detect_lines(&source, &geometry, loader, &config.merge)?;
        let image = loader.render(&source, &geometry, config.render.dpi)?;
        let scene = BoxScene::from_lines(
            &lines,
            config.geometry.min_size,
            config.geometry.handle_size,
        );

        info!(
            words = words.len(),
            lines = lines.len(),
            width = geometry.width,
            height = geometry.height,
            "page loaded"
        );

        Ok(Self {
            source,
            geometry,
            image,
            words,
            lines,
            scene,
            config,
        })
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn image(&self) -> &PageImage {
        &self.image
    }

    pub fn words(&self) -> &[WordBox] {
        &self.words
    }

    /// Line boxes as detected at load time; edits do not change these.
    pub fn lines(&self) -> &[LineBox] {
        &self.lines
    }

    pub fn scene(&self) -> &BoxScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut BoxScene {
        &mut self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn output_path(&self) -> &Path {
        &self.config.export.output
    }

    /// Current rectangles drawn onto the original document.
    pub fn export(&self) -> Result<Vec<u8>, PdfError> {
        let style = ExportStyle::from(&self.config.export);
        export_rects(&self.source, &self.scene.rects(), &style)
    }

    /// Export to the configured output path.
    pub fn export_to_file(&self) -> Result<PathBuf, PdfError> {
        let path = self.output_path().to_path_buf();
        self.export_to(&path)?;
        Ok(path)
    }

    pub fn export_to(&self, path: &Path) -> Result<(), PdfError> {
        let result = self.export().and_then(|bytes| write_output(path, &bytes));
        match &result {
            Ok(()) => info!(boxes = self.scene.len(), path = %path.display(), "export complete"),
            Err(e) => error!(path = %path.display(), error = %e, "export failed"),
        }
        result
    }
}
