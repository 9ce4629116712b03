//! Canvas zoom and page ↔ screen mapping

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    step: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    pub fn new(step: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            zoom: 1.0,
            step,
            min_zoom,
            max_zoom,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom * self.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom / self.step)
    }

    fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        tracing::debug!(zoom = self.zoom, "zoom changed");
        self.zoom
    }

    /// Page units to screen points, with the page's top-left drawn at `origin`.
    pub fn to_screen(&self, origin: Point, p: Point) -> Point {
        Point::new(origin.x + p.x * self.zoom, origin.y + p.y * self.zoom)
    }

    pub fn to_page(&self, origin: Point, screen: Point) -> Point {
        Point::new(
            (screen.x - origin.x) / self.zoom,
            (screen.y - origin.y) / self.zoom,
        )
    }

    pub fn rect_to_screen(&self, origin: Point, rect: &Rect) -> Rect {
        let a = self.to_screen(origin, Point::new(rect.x0, rect.y0));
        let b = self.to_screen(origin, Point::new(rect.x1, rect.y1));
        Rect::new(a.x, a.y, b.x, b.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.2, 0.1, 20.0)
    }
}
