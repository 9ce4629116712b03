//! Page canvas: background raster, box outlines, handles and pointer input

use egui::{
    pos2, Color32, ColorImage, CursorIcon, Painter, PointerButton, Pos2, Rect, Response,
    ScrollArea, Sense, Shape, Stroke, TextureHandle, TextureOptions, Ui,
};
use linebox_core::{BoxScene, CursorKind, EditableBox, PenKind, Point, SceneEffect, Viewport};
use linebox_pdf::EditSession;

const DASH_LENGTH: f32 = 4.0;
const GAP_LENGTH: f32 = 3.0;

pub fn cursor_icon(kind: CursorKind) -> CursorIcon {
    match kind {
        CursorKind::ResizeNwSe => CursorIcon::ResizeNwSe,
        CursorKind::ResizeNeSw => CursorIcon::ResizeNeSw,
        CursorKind::ResizeHorizontal => CursorIcon::ResizeHorizontal,
        CursorKind::ResizeVertical => CursorIcon::ResizeVertical,
        CursorKind::Move => CursorIcon::Move,
    }
}

pub fn pen_stroke(pen: PenKind) -> Stroke {
    match pen {
        PenKind::Default => Stroke::new(1.0, Color32::BLACK),
        PenKind::Highlight => Stroke::new(1.0, Color32::BLUE),
    }
}

fn to_pos(p: Point) -> Pos2 {
    pos2(p.x as f32, p.y as f32)
}

fn to_point(p: Pos2) -> Point {
    Point::new(f64::from(p.x), f64::from(p.y))
}

#[derive(Default)]
pub struct PageCanvas {
    texture: Option<TextureHandle>,
}

impl PageCanvas {
    fn texture(&mut self, ui: &Ui, session: &EditSession) -> &TextureHandle {
        self.texture.get_or_insert_with(|| {
            let image = session.image();
            let color = ColorImage::from_rgba_unmultiplied(image.size(), &image.rgba);
            ui.ctx().load_texture("page", color, TextureOptions::LINEAR)
        })
    }

    /// Draw the page and its boxes, feeding pointer input to the scene.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        session: &mut EditSession,
        viewport: &Viewport,
    ) -> Vec<SceneEffect> {
        let texture_id = self.texture(ui, session).id();
        let (page_w, page_h) = session.geometry().size();
        let zoom = viewport.zoom() as f32;
        let size = egui::vec2(page_w as f32 * zoom, page_h as f32 * zoom);

        ScrollArea::both()
            .id_salt("page_canvas_scroll")
            .auto_shrink([false, false])
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let (page_rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
                let origin = to_point(page_rect.min);
                let effects = handle_pointer(ui, &response, session.scene_mut(), viewport, origin);

                let painter = ui.painter_at(page_rect);
                painter.image(
                    texture_id,
                    page_rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
                draw_scene(&painter, session.scene(), viewport, origin);
                effects
            })
            .inner
    }
}

fn handle_pointer(
    ui: &Ui,
    response: &Response,
    scene: &mut BoxScene,
    viewport: &Viewport,
    origin: Point,
) -> Vec<SceneEffect> {
    let to_page = |p: Pos2| viewport.to_page(origin, to_point(p));
    let (pressed, released, press_origin) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.press_origin(),
        )
    });
    let dragging = response.dragged_by(PointerButton::Primary);
    let mut effects = Vec::new();

    // Presses go to the scene on the frame they happen, before egui decides
    // between click and drag.
    if pressed && response.is_pointer_button_down_on() {
        if let Some(p) = press_origin {
            effects.extend(scene.pointer_pressed(to_page(p)));
        }
    }
    if dragging {
        if let Some(p) = response.interact_pointer_pos() {
            effects.extend(scene.pointer_dragged(to_page(p)));
        }
    }
    if released {
        effects.extend(scene.pointer_released());
    }

    let pointer = if dragging {
        response.interact_pointer_pos()
    } else {
        response.hover_pos()
    };
    match pointer {
        Some(p) => {
            if !dragging {
                effects.extend(scene.pointer_moved(to_page(p)));
            }
            if let Some(kind) = scene.cursor_at(to_page(p)) {
                ui.ctx().set_cursor_icon(cursor_icon(kind));
            }
        }
        None => effects.extend(scene.pointer_exited()),
    }

    for effect in &effects {
        tracing::trace!(id = effect.id, effect = ?effect.effect, "scene effect");
    }
    effects
}

fn draw_scene(painter: &Painter, scene: &BoxScene, viewport: &Viewport, origin: Point) {
    for b in scene.boxes() {
        draw_box(painter, b, viewport, origin);
    }
    // Handles sit above every box outline
    if let Some(b) = scene.selected().and_then(|id| scene.get(id)) {
        draw_handles(painter, b, scene.handle_size(), viewport, origin);
    }
}

fn draw_box(painter: &Painter, b: &EditableBox, viewport: &Viewport, origin: Point) {
    let r = viewport.rect_to_screen(origin, &b.rect());
    let corners = [
        pos2(r.x0 as f32, r.y0 as f32),
        pos2(r.x1 as f32, r.y0 as f32),
        pos2(r.x1 as f32, r.y1 as f32),
        pos2(r.x0 as f32, r.y1 as f32),
        pos2(r.x0 as f32, r.y0 as f32),
    ];
    painter.extend(Shape::dashed_line(
        &corners,
        pen_stroke(b.pen()),
        DASH_LENGTH,
        GAP_LENGTH,
    ));
}

fn draw_handles(
    painter: &Painter,
    b: &EditableBox,
    handle_size: f64,
    viewport: &Viewport,
    origin: Point,
) {
    let outline = Stroke::new(1.0, Color32::BLUE);
    for handle in b.handles() {
        let area = viewport.rect_to_screen(origin, &handle.area(handle_size));
        let rect = Rect::from_min_max(
            to_pos(Point::new(area.x0, area.y0)),
            to_pos(Point::new(area.x1, area.y1)),
        );
        painter.rect(rect, 0.0, Color32::WHITE, outline);
    }
}
