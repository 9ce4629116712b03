//! Interactive line box
//!
//! An [`EditableBox`] is a line box promoted to an editable entity. Its
//! interaction state is an explicit state machine:
//!
//! ```text
//!   Idle <──enter/leave──> Hovered
//!    │ press                 │ press
//!    └──────> Selected <─────┘
//!              │  ▲  │  ▲
//!  press handle│  │  │  │release
//!              ▼  │  ▼  │
//!        Resizing  Moving (press body)
//! ```
//!
//! Pointer-over is tracked separately from the phase because a selected box
//! keeps its highlighted pen on deselection while the pointer is still over
//! it. Every transition returns the [`BoxEffect`]s the render layer needs.

use crate::geometry::{Point, Rect};
use crate::handles::{handle_points, resize_candidate, Anchor, HandlePoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stable identifier of a box within a scene (its insertion index).
pub type BoxId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxPhase {
    Idle,
    Hovered,
    Selected,
    /// A handle is being dragged; sub-state of `Selected`
    Resizing(Anchor),
    /// The body is being dragged; sub-state of `Selected`
    Moving,
}

/// Outline style of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenKind {
    Default,
    Highlight,
}

/// Message emitted by a state transition for the render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxEffect {
    SelectionChanged(bool),
    HandlesVisible(bool),
    PenChanged(PenKind),
    GeometryChanged(Rect),
    ResizeRejected { anchor: Anchor, candidate: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    Committed(Rect),
    /// Candidate violated the minimum size; the rectangle is unchanged
    Rejected(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    /// Last pointer position seen while moving
    Move { last: Point },
    /// Offset from pointer to handle centre at press time
    Resize { offset: (f64, f64) },
}

#[derive(Debug, Clone)]
pub struct EditableBox {
    id: BoxId,
    rect: Rect,
    phase: BoxPhase,
    pointer_over: bool,
    handles: [HandlePoint; 8],
    min_size: f64,
    drag: Option<Drag>,
}

impl EditableBox {
    pub fn new(id: BoxId, rect: Rect, min_size: f64) -> Self {
        let rect = rect.normalized();
        Self {
            id,
            rect,
            phase: BoxPhase::Idle,
            pointer_over: false,
            handles: handle_points(&rect),
            min_size,
            drag: None,
        }
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn handles(&self) -> &[HandlePoint; 8] {
        &self.handles
    }

    pub fn handle(&self, anchor: Anchor) -> HandlePoint {
        self.handles[anchor.index()]
    }

    pub fn phase(&self) -> BoxPhase {
        self.phase
    }

    pub fn is_selected(&self) -> bool {
        matches!(
            self.phase,
            BoxPhase::Selected | BoxPhase::Resizing(_) | BoxPhase::Moving
        )
    }

    pub fn is_hovered(&self) -> bool {
        self.pointer_over
    }

    pub fn handles_visible(&self) -> bool {
        self.is_selected()
    }

    pub fn pen(&self) -> PenKind {
        if self.is_selected() || self.pointer_over {
            PenKind::Highlight
        } else {
            PenKind::Default
        }
    }

    /// Run `change` and report what it changed as effects.
    fn transition(&mut self, change: impl FnOnce(&mut Self)) -> Vec<BoxEffect> {
        let before_phase = self.phase;
        let before_selected = self.is_selected();
        let before_pen = self.pen();

        change(self);

        let mut effects = Vec::new();
        if self.is_selected() != before_selected {
            effects.push(BoxEffect::SelectionChanged(self.is_selected()));
            effects.push(BoxEffect::HandlesVisible(self.handles_visible()));
        }
        if self.pen() != before_pen {
            effects.push(BoxEffect::PenChanged(self.pen()));
        }
        if self.phase != before_phase {
            debug!(id = self.id, from = ?before_phase, to = ?self.phase, "box transition");
        }
        effects
    }

    pub fn pointer_entered(&mut self) -> Vec<BoxEffect> {
        self.transition(|b| {
            b.pointer_over = true;
            if b.phase == BoxPhase::Idle {
                b.phase = BoxPhase::Hovered;
            }
        })
    }

    pub fn pointer_left(&mut self) -> Vec<BoxEffect> {
        self.transition(|b| {
            b.pointer_over = false;
            if b.phase == BoxPhase::Hovered {
                b.phase = BoxPhase::Idle;
            }
        })
    }

    pub fn select(&mut self) -> Vec<BoxEffect> {
        self.transition(|b| {
            if !b.is_selected() {
                b.phase = BoxPhase::Selected;
            }
        })
    }

    /// Clear selection, abandoning any drag in progress.
    pub fn deselect(&mut self) -> Vec<BoxEffect> {
        self.transition(|b| {
            b.drag = None;
            if b.is_selected() {
                b.phase = if b.pointer_over {
                    BoxPhase::Hovered
                } else {
                    BoxPhase::Idle
                };
            }
        })
    }

    /// Press on the box body. An unselected box only becomes selected; a
    /// selected box starts moving.
    pub fn press_body(&mut self, at: Point) -> Vec<BoxEffect> {
        if !self.is_selected() {
            debug!(id = self.id, "body pressed on unselected box, selecting");
            return self.select();
        }
        self.transition(|b| {
            b.phase = BoxPhase::Moving;
            b.drag = Some(Drag::Move { last: at });
        })
    }

    /// Press on one of the handles. Selecting the parent takes priority over
    /// starting a resize: the press is consumed without starting a drag.
    pub fn press_handle(&mut self, anchor: Anchor, at: Point) -> Vec<BoxEffect> {
        if !self.is_selected() {
            debug!(id = self.id, %anchor, "handle pressed on unselected box, selecting");
            return self.select();
        }
        let handle = self.handle(anchor).position;
        debug!(id = self.id, %anchor, "handle pressed, ready to resize");
        self.transition(|b| {
            b.phase = BoxPhase::Resizing(anchor);
            b.drag = Some(Drag::Resize {
                offset: handle.delta_from(at),
            });
        })
    }

    /// Pointer moved with the button held.
    pub fn drag_to(&mut self, at: Point) -> Vec<BoxEffect> {
        match (self.phase, self.drag) {
            (BoxPhase::Moving, Some(Drag::Move { last })) => {
                let (dx, dy) = at.delta_from(last);
                self.drag = Some(Drag::Move { last: at });
                let rect = self.translate(dx, dy);
                vec![BoxEffect::GeometryChanged(rect)]
            }
            (BoxPhase::Resizing(anchor), Some(Drag::Resize { offset })) => {
                let target = at.offset(offset.0, offset.1);
                match self.try_resize(anchor, target) {
                    ResizeOutcome::Committed(rect) => vec![BoxEffect::GeometryChanged(rect)],
                    ResizeOutcome::Rejected(candidate) => {
                        vec![BoxEffect::ResizeRejected { anchor, candidate }]
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    pub fn release(&mut self) -> Vec<BoxEffect> {
        if let BoxPhase::Resizing(anchor) = self.phase {
            debug!(id = self.id, %anchor, "handle released");
        }
        self.transition(|b| {
            b.drag = None;
            if matches!(b.phase, BoxPhase::Resizing(_) | BoxPhase::Moving) {
                b.phase = BoxPhase::Selected;
            }
        })
    }

    /// Move the `anchor` handle to `to` (parent-local coordinates) and resize
    /// accordingly, unless the result would be `min_size` or smaller on either
    /// axis.
    pub fn try_resize(&mut self, anchor: Anchor, to: Point) -> ResizeOutcome {
        let candidate = resize_candidate(&self.rect, anchor, to);
        if candidate.width() > self.min_size && candidate.height() > self.min_size {
            self.set_rect(candidate);
            ResizeOutcome::Committed(candidate)
        } else {
            debug!(
                id = self.id,
                %anchor,
                width = candidate.width(),
                height = candidate.height(),
                "resize rejected below minimum size"
            );
            ResizeOutcome::Rejected(candidate)
        }
    }

    /// Translate the rectangle without resizing it.
    pub fn translate(&mut self, dx: f64, dy: f64) -> Rect {
        let moved = self.rect.translated(dx, dy);
        self.set_rect(moved);
        moved
    }

    fn set_rect(&mut self, rect: Rect) {
        tracing::trace!(id = self.id, old = ?self.rect, new = ?rect, "set rect");
        self.rect = rect;
        self.handles = handle_points(&rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit_box() -> EditableBox {
        EditableBox::new(0, Rect::new(0.0, 0.0, 10.0, 10.0), 5.0)
    }

    fn selected_box() -> EditableBox {
        let mut b = unit_box();
        b.select();
        b
    }

    #[test]
    fn test_new_box_is_idle_with_derived_handles() {
        let b = unit_box();
        assert_eq!(b.phase(), BoxPhase::Idle);
        assert!(!b.handles_visible());
        assert_eq!(b.pen(), PenKind::Default);
        assert_eq!(*b.handles(), handle_points(&b.rect()));
    }

    #[test]
    fn test_new_box_normalizes_rect() {
        let b = EditableBox::new(3, Rect::new(10.0, 10.0, 0.0, 0.0), 5.0);
        assert_eq!(b.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut b = unit_box();
        assert_eq!(
            b.pointer_entered(),
            vec![BoxEffect::PenChanged(PenKind::Highlight)]
        );
        assert_eq!(b.phase(), BoxPhase::Hovered);
        assert!(!b.handles_visible());

        assert_eq!(b.pointer_left(), vec![BoxEffect::PenChanged(PenKind::Default)]);
        assert_eq!(b.phase(), BoxPhase::Idle);
    }

    #[test]
    fn test_press_unselected_body_selects_without_drag() {
        let mut b = unit_box();
        let effects = b.press_body(Point::new(5.0, 5.0));
        assert_eq!(
            effects,
            vec![
                BoxEffect::SelectionChanged(true),
                BoxEffect::HandlesVisible(true),
                BoxEffect::PenChanged(PenKind::Highlight),
            ]
        );
        assert_eq!(b.phase(), BoxPhase::Selected);
        assert!(b.drag_to(Point::new(50.0, 50.0)).is_empty());
        assert_eq!(b.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_press_handle_on_unselected_box_only_selects() {
        let mut b = unit_box();
        b.press_handle(Anchor::BottomRight, Point::new(10.0, 10.0));
        assert_eq!(b.phase(), BoxPhase::Selected);
        assert!(b.drag_to(Point::new(40.0, 40.0)).is_empty());
        assert_eq!(b.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_resize_through_bottom_right_handle() {
        let mut b = selected_box();
        b.press_handle(Anchor::BottomRight, Point::new(10.0, 10.0));
        assert_eq!(b.phase(), BoxPhase::Resizing(Anchor::BottomRight));

        let effects = b.drag_to(Point::new(30.0, 20.0));
        assert_eq!(
            effects,
            vec![BoxEffect::GeometryChanged(Rect::new(0.0, 0.0, 30.0, 20.0))]
        );
        assert_eq!(*b.handles(), handle_points(&Rect::new(0.0, 0.0, 30.0, 20.0)));

        assert!(b.release().is_empty());
        assert_eq!(b.phase(), BoxPhase::Selected);
    }

    #[test]
    fn test_resize_keeps_grab_offset() {
        let mut b = selected_box();
        // Grabbed one unit up-left of the handle centre.
        b.press_handle(Anchor::BottomRight, Point::new(9.0, 9.0));
        b.drag_to(Point::new(19.0, 29.0));
        assert_eq!(b.rect(), Rect::new(0.0, 0.0, 20.0, 30.0));
    }

    #[test]
    fn test_resize_below_minimum_is_rejected() {
        let mut b = selected_box();
        b.press_handle(Anchor::BottomRight, Point::new(10.0, 10.0));
        let effects = b.drag_to(Point::new(5.0, 40.0));
        assert_eq!(
            effects,
            vec![BoxEffect::ResizeRejected {
                anchor: Anchor::BottomRight,
                candidate: Rect::new(0.0, 0.0, 5.0, 40.0),
            }]
        );
        assert_eq!(b.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(*b.handles(), handle_points(&b.rect()));
    }

    #[test]
    fn test_move_translates_rect_and_handles() {
        let mut b = selected_box();
        b.press_body(Point::new(5.0, 5.0));
        assert_eq!(b.phase(), BoxPhase::Moving);
        b.drag_to(Point::new(8.0, 9.0));
        b.drag_to(Point::new(15.0, 25.0));
        assert_eq!(b.rect(), Rect::new(10.0, 20.0, 20.0, 30.0));
        assert_eq!(*b.handles(), handle_points(&b.rect()));
        b.release();
        assert_eq!(b.phase(), BoxPhase::Selected);
    }

    #[test]
    fn test_deselect_keeps_highlight_while_hovered() {
        let mut b = unit_box();
        b.pointer_entered();
        b.select();
        let effects = b.deselect();
        assert_eq!(
            effects,
            vec![
                BoxEffect::SelectionChanged(false),
                BoxEffect::HandlesVisible(false),
            ]
        );
        assert_eq!(b.phase(), BoxPhase::Hovered);
        assert_eq!(b.pen(), PenKind::Highlight);
    }

    #[test]
    fn test_deselect_restores_default_pen() {
        let mut b = selected_box();
        let effects = b.deselect();
        assert!(effects.contains(&BoxEffect::PenChanged(PenKind::Default)));
        assert_eq!(b.phase(), BoxPhase::Idle);
    }

    #[test]
    fn test_leaving_selected_box_keeps_it_selected() {
        let mut b = unit_box();
        b.pointer_entered();
        b.select();
        assert!(b.pointer_left().is_empty());
        assert_eq!(b.phase(), BoxPhase::Selected);
        assert_eq!(b.pen(), PenKind::Highlight);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut b = selected_box();
        assert!(b.select().is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_anchor() -> impl Strategy<Value = Anchor> {
        prop::sample::select(Anchor::ALL.to_vec())
    }

    proptest! {
        /// Property: a rejected resize leaves the rectangle untouched
        #[test]
        fn rejected_resize_is_noop(
            anchor in arb_anchor(),
            x in -50.0f64..50.0,
            y in -50.0f64..50.0
        ) {
            let start = Rect::new(0.0, 0.0, 10.0, 10.0);
            let mut b = EditableBox::new(0, start, 5.0);
            let candidate = resize_candidate(&start, anchor, Point::new(x, y));
            let outcome = b.try_resize(anchor, Point::new(x, y));
            if candidate.width() <= 5.0 || candidate.height() <= 5.0 {
                prop_assert_eq!(outcome, ResizeOutcome::Rejected(candidate));
                prop_assert_eq!(b.rect(), start);
            } else {
                prop_assert_eq!(outcome, ResizeOutcome::Committed(candidate));
                prop_assert_eq!(b.rect(), candidate);
            }
            prop_assert!(b.rect().is_normalized());
            prop_assert_eq!(*b.handles(), handle_points(&b.rect()));
        }

        /// Property: bottom-right drag from the unit box yields (0, 0, x, y)
        #[test]
        fn bottom_right_resize(x in 5.01f64..500.0, y in 5.01f64..500.0) {
            let mut b = EditableBox::new(0, Rect::new(0.0, 0.0, 10.0, 10.0), 5.0);
            b.try_resize(Anchor::BottomRight, Point::new(x, y));
            prop_assert_eq!(b.rect(), Rect::new(0.0, 0.0, x, y));
        }

        /// Property: moving and moving back restores the rectangle
        #[test]
        fn move_round_trip(dx in -300.0f64..300.0, dy in -300.0f64..300.0) {
            let start = Rect::new(12.5, 40.25, 90.0, 52.0);
            let mut b = EditableBox::new(0, start, 5.0);
            b.translate(dx, dy);
            b.translate(-dx, -dy);
            prop_assert!(b.rect().approx_eq(&start, 1e-9));
        }
    }
}
