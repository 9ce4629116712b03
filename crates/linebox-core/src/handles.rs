//! Resize handles
//!
//! Every editable box owns eight handles, one per corner and edge midpoint.
//! A handle's position is never stored independently: it is derived from the
//! parent rectangle through the anchor's fractional offset.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    RightCenter,
    BottomRight,
    BottomCenter,
    BottomLeft,
    LeftCenter,
}

/// Pointer shape shown while hovering a handle or a box body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    /// Top-left to bottom-right diagonal
    ResizeNwSe,
    /// Top-right to bottom-left diagonal
    ResizeNeSw,
    ResizeHorizontal,
    ResizeVertical,
    Move,
}

impl Anchor {
    /// All anchors, clockwise from the top-left corner.
    pub const ALL: [Anchor; 8] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::RightCenter,
        Anchor::BottomRight,
        Anchor::BottomCenter,
        Anchor::BottomLeft,
        Anchor::LeftCenter,
    ];

    /// Position of the anchor in [`Anchor::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fractional offset of the anchor along each axis, in {0, 0.5, 1}.
    pub fn fraction(self) -> (f64, f64) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::RightCenter => (1.0, 0.5),
            Anchor::BottomRight => (1.0, 1.0),
            Anchor::BottomCenter => (0.5, 1.0),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::LeftCenter => (0.0, 0.5),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopCenter => "top-center",
            Anchor::TopRight => "top-right",
            Anchor::RightCenter => "right-center",
            Anchor::BottomRight => "bottom-right",
            Anchor::BottomCenter => "bottom-center",
            Anchor::BottomLeft => "bottom-left",
            Anchor::LeftCenter => "left-center",
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            Anchor::TopLeft | Anchor::BottomLeft | Anchor::LeftCenter
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            Anchor::TopRight | Anchor::BottomRight | Anchor::RightCenter
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight
        )
    }

    pub fn cursor(self) -> CursorKind {
        match self {
            Anchor::TopLeft | Anchor::BottomRight => CursorKind::ResizeNwSe,
            Anchor::TopRight | Anchor::BottomLeft => CursorKind::ResizeNeSw,
            Anchor::LeftCenter | Anchor::RightCenter => CursorKind::ResizeHorizontal,
            Anchor::TopCenter | Anchor::BottomCenter => CursorKind::ResizeVertical,
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePoint {
    pub anchor: Anchor,
    pub position: Point,
}

impl HandlePoint {
    /// Square hit/draw area of side `size` centred on the handle.
    pub fn area(&self, size: f64) -> Rect {
        Rect::centered_square(self.position, size)
    }
}

/// Handle positions for `rect`, in [`Anchor::ALL`] order.
pub fn handle_points(rect: &Rect) -> [HandlePoint; 8] {
    Anchor::ALL.map(|anchor| {
        let (fx, fy) = anchor.fraction();
        HandlePoint {
            anchor,
            position: rect.point_at(fx, fy),
        }
    })
}

/// Candidate rectangle after dragging the `anchor` handle of `rect` to `to`.
///
/// Only the edges named by the anchor move. The result is normalized, so a
/// handle dragged past the opposite edge flips the rectangle instead of
/// inverting it. The minimum-size guard is applied by the caller.
pub fn resize_candidate(rect: &Rect, anchor: Anchor, to: Point) -> Rect {
    let mut left = rect.x0;
    let mut top = rect.y0;
    let mut right = rect.x1;
    let mut bottom = rect.y1;

    if anchor.moves_left() {
        left = to.x;
    }
    if anchor.moves_right() {
        right = to.x;
    }
    if anchor.moves_top() {
        top = to.y;
    }
    if anchor.moves_bottom() {
        bottom = to.y;
    }

    Rect::new(left, top, right, bottom).normalized()
}
