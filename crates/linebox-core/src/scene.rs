//! Box scene with single-selection discipline
//!
//! The scene owns every editable box for the session and turns raw pointer
//! events (in page units) into per-box transitions. At most one box is
//! selected at any time; selecting another box deselects the previous one.

use crate::editable::{BoxEffect, BoxId, BoxPhase, EditableBox};
use crate::error::CoreError;
use crate::geometry::{Point, Rect};
use crate::handles::{Anchor, CursorKind};
use crate::merge::LineBox;
use tracing::{debug, info};

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle(BoxId, Anchor),
    Body(BoxId),
}

/// A box effect tagged with the box it applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneEffect {
    pub id: BoxId,
    pub effect: BoxEffect,
}

fn tag(id: BoxId, effects: Vec<BoxEffect>) -> impl Iterator<Item = SceneEffect> {
    effects.into_iter().map(move |effect| SceneEffect { id, effect })
}

#[derive(Debug, Clone)]
pub struct BoxScene {
    boxes: Vec<EditableBox>,
    selected: Option<BoxId>,
    hovered: Option<BoxId>,
    /// Box receiving drag events between press and release
    grabbed: Option<BoxId>,
    min_size: f64,
    handle_size: f64,
}

impl BoxScene {
    pub fn new(min_size: f64, handle_size: f64) -> Self {
        Self {
            boxes: Vec::new(),
            selected: None,
            hovered: None,
            grabbed: None,
            min_size,
            handle_size,
        }
    }

    /// One editable box per line, in line order.
    pub fn from_lines(lines: &[LineBox], min_size: f64, handle_size: f64) -> Self {
        let mut scene = Self::new(min_size, handle_size);
        for line in lines {
            scene.push(line.rect());
        }
        info!(boxes = scene.len(), "scene populated");
        scene
    }

    pub fn push(&mut self, rect: Rect) -> BoxId {
        let id = self.boxes.len();
        self.boxes.push(EditableBox::new(id, rect, self.min_size));
        id
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[EditableBox] {
        &self.boxes
    }

    pub fn get(&self, id: BoxId) -> Option<&EditableBox> {
        self.boxes.get(id)
    }

    pub fn selected(&self) -> Option<BoxId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<BoxId> {
        self.hovered
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    /// Current rectangles in box order, as read at export time.
    pub fn rects(&self) -> Vec<Rect> {
        self.boxes.iter().map(EditableBox::rect).collect()
    }

    fn get_mut(&mut self, id: BoxId) -> Result<&mut EditableBox, CoreError> {
        self.boxes.get_mut(id).ok_or(CoreError::UnknownBox(id))
    }

    /// Select `id`, deselecting whichever box was selected before.
    pub fn select(&mut self, id: BoxId) -> Result<Vec<SceneEffect>, CoreError> {
        let mut effects = Vec::new();
        if self.selected == Some(id) {
            return Ok(effects);
        }
        if id >= self.boxes.len() {
            return Err(CoreError::UnknownBox(id));
        }
        effects.extend(self.clear_selection());
        effects.extend(tag(id, self.boxes[id].select()));
        self.selected = Some(id);
        debug!(id, "box selected");
        Ok(effects)
    }

    pub fn clear_selection(&mut self) -> Vec<SceneEffect> {
        match self.selected.take() {
            Some(prev) => {
                if self.grabbed == Some(prev) {
                    self.grabbed = None;
                }
                debug!(id = prev, "box deselected");
                tag(prev, self.boxes[prev].deselect()).collect()
            }
            None => Vec::new(),
        }
    }

    /// Topmost interactive element under `p`. Handles of the selected box win
    /// over any body; among bodies the most recently added box wins.
    pub fn hit_test(&self, p: Point) -> Option<HitTarget> {
        if let Some(id) = self.selected {
            let selected = &self.boxes[id];
            if let Some(handle) = selected
                .handles()
                .iter()
                .rev()
                .find(|h| h.area(self.handle_size).contains(p))
            {
                return Some(HitTarget::Handle(id, handle.anchor));
            }
        }
        self.boxes
            .iter()
            .rev()
            .find(|b| b.rect().contains(p))
            .map(|b| HitTarget::Body(b.id()))
    }

    pub fn cursor_at(&self, p: Point) -> Option<CursorKind> {
        if let Some(id) = self.grabbed {
            return match self.boxes[id].phase() {
                BoxPhase::Resizing(anchor) => Some(anchor.cursor()),
                _ => Some(CursorKind::Move),
            };
        }
        self.hit_test(p).map(|hit| match hit {
            HitTarget::Handle(_, anchor) => anchor.cursor(),
            HitTarget::Body(_) => CursorKind::Move,
        })
    }

    /// Pointer moved without a button held: update hover.
    pub fn pointer_moved(&mut self, p: Point) -> Vec<SceneEffect> {
        let under = self.hit_test(p).map(|hit| match hit {
            HitTarget::Handle(id, _) | HitTarget::Body(id) => id,
        });
        if under == self.hovered {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if let Some(prev) = self.hovered.take() {
            effects.extend(tag(prev, self.boxes[prev].pointer_left()));
        }
        if let Some(id) = under {
            effects.extend(tag(id, self.boxes[id].pointer_entered()));
        }
        self.hovered = under;
        effects
    }

    /// Pointer left the canvas.
    pub fn pointer_exited(&mut self) -> Vec<SceneEffect> {
        match self.hovered.take() {
            Some(prev) => tag(prev, self.boxes[prev].pointer_left()).collect(),
            None => Vec::new(),
        }
    }

    /// Button pressed at `p`. Empty canvas clears the selection.
    pub fn pointer_pressed(&mut self, p: Point) -> Vec<SceneEffect> {
        let Some(hit) = self.hit_test(p) else {
            self.grabbed = None;
            return self.clear_selection();
        };

        let (id, was_selected) = match hit {
            HitTarget::Handle(id, _) | HitTarget::Body(id) => (id, self.selected == Some(id)),
        };

        let mut effects = Vec::new();
        if !was_selected {
            effects.extend(self.clear_selection());
        }

        let box_effects = match hit {
            HitTarget::Handle(_, anchor) => self.boxes[id].press_handle(anchor, p),
            HitTarget::Body(_) => self.boxes[id].press_body(p),
        };
        effects.extend(tag(id, box_effects));

        self.selected = Some(id);
        self.grabbed = was_selected.then_some(id);
        effects
    }

    /// Pointer moved with the button held.
    pub fn pointer_dragged(&mut self, p: Point) -> Vec<SceneEffect> {
        match self.grabbed {
            Some(id) => tag(id, self.boxes[id].drag_to(p)).collect(),
            None => Vec::new(),
        }
    }

    pub fn pointer_released(&mut self) -> Vec<SceneEffect> {
        match self.grabbed.take() {
            Some(id) => tag(id, self.boxes[id].release()).collect(),
            None => Vec::new(),
        }
    }

    /// Move a box by a delta, independent of pointer state.
    pub fn translate(&mut self, id: BoxId, dx: f64, dy: f64) -> Result<Rect, CoreError> {
        Ok(self.get_mut(id)?.translate(dx, dy))
    }
}
