//! Rendering port implemented by the host

use glam::Vec2;
use skyhop_core::Color;
use skyhop_sim::{Aabb, Bitmap, RenderingPattern};

/// Draw calls a frame produces, in world units
pub trait Renderer {
    /// A multi-cell pattern laid over `bounds`
    fn render_pattern(&mut self, pattern: &RenderingPattern, bitmaps: &[&Bitmap], bounds: Aabb);

    /// A single bitmap stretched over `bounds`
    fn render_bitmap(&mut self, bitmap: &Bitmap, bounds: Aabb);

    /// One line of HUD text anchored at `position`
    fn render_text(&mut self, text: &str, position: Vec2, color: Color);
}

/// Renderer that records what it was asked to draw
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Pattern { bitmaps: Vec<String>, bounds: Aabb },
    Bitmap { path: String, bounds: Aabb },
    Text { text: String, position: Vec2 },
}

impl Renderer for RecordingRenderer {
    fn render_pattern(&mut self, _pattern: &RenderingPattern, bitmaps: &[&Bitmap], bounds: Aabb) {
        self.calls.push(DrawCall::Pattern {
            bitmaps: bitmaps.iter().map(|b| b.path.clone()).collect(),
            bounds,
        });
    }

    fn render_bitmap(&mut self, bitmap: &Bitmap, bounds: Aabb) {
        self.calls.push(DrawCall::Bitmap {
            path: bitmap.path.clone(),
            bounds,
        });
    }

    fn render_text(&mut self, text: &str, position: Vec2, _color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            position,
        });
    }
}
