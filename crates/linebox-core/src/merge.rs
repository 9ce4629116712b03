//! Greedy word-to-line merging
//!
//! Single forward pass over reading-ordered word boxes with one open line
//! accumulator. A word joins the open line when both its top and bottom edges
//! are within the vertical tolerance of the line's and the gap from the line's
//! right edge to the word's left edge is at most the horizontal tolerance.
//!
//! The horizontal test is one-sided: words that overlap the line or sit to
//! its left still merge when the vertical test passes. Merging only ever
//! extends the line's right and bottom edges.

use crate::geometry::Rect;
use crate::words::WordBox;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeThresholds {
    /// Maximum difference between the line's and the word's top edges, and
    /// between their bottom edges
    #[serde(default = "default_vertical_tolerance")]
    pub vertical_tolerance: f64,
    /// Maximum gap from the line's right edge to the word's left edge
    #[serde(default = "default_horizontal_gap")]
    pub horizontal_gap: f64,
}

fn default_vertical_tolerance() -> f64 {
    2.0
}

fn default_horizontal_gap() -> f64 {
    5.0
}

impl Default for MergeThresholds {
    fn default() -> Self {
        Self {
            vertical_tolerance: default_vertical_tolerance(),
            horizontal_gap: default_horizontal_gap(),
        }
    }
}

/// Merged rectangle for one visual text line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl LineBox {
    fn seed(rect: &Rect) -> Self {
        Self {
            x0: rect.x0,
            y0: rect.y0,
            x1: rect.x1,
            y1: rect.y1,
        }
    }

    fn accepts(&self, word: &Rect, thresholds: &MergeThresholds) -> bool {
        (self.y0 - word.y0).abs() <= thresholds.vertical_tolerance
            && (self.y1 - word.y1).abs() <= thresholds.vertical_tolerance
            && (word.x0 - self.x1) <= thresholds.horizontal_gap
    }

    fn extend(&mut self, word: &Rect) {
        self.x1 = self.x1.max(word.x1);
        self.y1 = self.y1.max(word.y1);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, self.y1)
    }
}

impl From<LineBox> for Rect {
    fn from(line: LineBox) -> Self {
        line.rect()
    }
}

/// Merge reading-ordered word boxes into line boxes.
///
/// Output order follows input order, and the output never has more entries
/// than the input.
pub fn merge_words(words: &[WordBox], thresholds: &MergeThresholds) -> Vec<LineBox> {
    let mut lines = Vec::new();
    let mut open: Option<LineBox> = None;

    for word in words {
        let rect = &word.rect;
        match open.as_mut() {
            Some(line) if line.accepts(rect, thresholds) => line.extend(rect),
            _ => {
                if let Some(line) = open.replace(LineBox::seed(rect)) {
                    lines.push(line);
                }
            }
        }
    }

    if let Some(line) = open {
        lines.push(line);
    }

    tracing::debug!(words = words.len(), lines = lines.len(), "merged words into lines");
    lines
}
