use crate::canvas::PageCanvas;
use linebox_core::{BoxEffect, SceneEffect, Viewport};
use linebox_pdf::EditSession;

pub struct EditorApp {
    session: EditSession,
    viewport: Viewport,
    canvas: PageCanvas,
    status: String,
}

impl EditorApp {
    pub fn new(session: EditSession) -> Self {
        let viewport = session.config().view.viewport();
        let status = format!("{} line boxes", session.scene().len());
        Self {
            session,
            viewport,
            canvas: PageCanvas::default(),
            status,
        }
    }

    fn export(&mut self) {
        self.status = match self.session.export_to_file() {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => format!("Export failed: {e}"),
        };
    }

    fn note_effects(&mut self, effects: &[SceneEffect]) {
        for effect in effects {
            match effect.effect {
                BoxEffect::SelectionChanged(true) => {
                    self.status = format!("Box {} selected", effect.id);
                }
                BoxEffect::ResizeRejected { anchor, .. } => {
                    self.status = format!("Box {} too small to resize from {anchor}", effect.id);
                }
                _ => {}
            }
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Zoom In").clicked() {
                    self.viewport.zoom_in();
                }
                if ui.button("Zoom Out").clicked() {
                    self.viewport.zoom_out();
                }
                if ui.button("Export").clicked() {
                    self.export();
                }
                ui.separator();
                ui.label(format!("{:.0}%", self.viewport.zoom() * 100.0));
                ui.separator();
                ui.label(&self.status);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let effects = self.canvas.show(ui, &mut self.session, &self.viewport);
            self.note_effects(&effects);
        });
    }
}
