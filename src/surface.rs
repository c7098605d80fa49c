use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::WebError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Rgba {
        Rgba { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { a, ..self }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// The drawing primitives a frame needs.
pub trait Surface {
    fn resize(&mut self, width: f64, height: f64);
    fn clear(&mut self, width: f64, height: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &Rgba);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &Rgba, width: f64);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_element_id(document: &web_sys::Document, id: &str) -> Result<CanvasSurface, WebError> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| WebError::MissingElement(id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| WebError::WrongElementType(id.to_string()))?;

        let context = canvas
            .get_context("2d")
            .map_err(WebError::js)?
            .ok_or(WebError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| WebError::NoContext)?;

        Ok(CanvasSurface { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &Rgba) {
        self.context.begin_path();
        if let Err(err) = self.context.arc(x, y, radius, 0.0, std::f64::consts::TAU) {
            log::debug!("arc at ({x}, {y}) r={radius} rejected: {:?}", err);
            return;
        }
        self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.fill();
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &Rgba, width: f64) {
        self.context.begin_path();
        self.context.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.context.set_line_width(width);
        self.context.move_to(from.0, from.1);
        self.context.line_to(to.0, to.1);
        self.context.stroke();
    }
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Resize { width: f64, height: f64 },
    Clear { width: f64, height: f64 },
    Circle { x: f64, y: f64, radius: f64, color: Rgba },
    Line { from: (f64, f64), to: (f64, f64), color: Rgba, width: f64 },
}

/// Headless surface that keeps every call, for driving frames without a canvas.
#[derive(Default, Debug)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> RecordingSurface {
        RecordingSurface::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Circle { .. }))
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Resize { width, height });
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &Rgba) {
        self.calls.push(DrawCall::Circle { x, y, radius, color: *color });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &Rgba, width: f64) {
        self.calls.push(DrawCall::Line { from, to, color: *color, width });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_string_carries_alpha() {
        let color = Rgba::new(99, 102, 241, 0.6);
        assert_eq!(color.to_css(), "rgba(99, 102, 241, 0.6)");
        assert_eq!(color.with_alpha(0.25).to_css(), "rgba(99, 102, 241, 0.25)");
    }

    #[test]
    fn recording_surface_filters_by_kind() {
        let mut surface = RecordingSurface::new();
        let color = Rgba::new(1, 2, 3, 1.0);
        surface.clear(10.0, 10.0);
        surface.fill_circle(1.0, 1.0, 1.0, &color);
        surface.stroke_line((0.0, 0.0), (1.0, 1.0), &color, 1.5);
        surface.stroke_line((1.0, 1.0), (0.0, 0.0), &color, 1.5);

        assert_eq!(surface.circles().count(), 1);
        assert_eq!(surface.lines().count(), 2);
        surface.clear_log();
        assert!(surface.calls.is_empty());
    }
}
