//! Backend-neutral draw list
//!
//! Coordinates are logical screen pixels (800×400, y down). Colors are
//! straight-alpha RGBA in 0-1.

use glam::Vec2;

use crate::sim::palette::Rgb;

pub type Rgba = [f32; 4];

/// Convert a palette color plus alpha into RGBA
pub fn rgba(color: Rgb, alpha: f32) -> Rgba {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Rgba,
    },
    /// Convex polygon, points in order
    Polygon { points: Vec<Vec2>, color: Rgba },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    /// `pos` is the top-left for `Left`, the top-center for `Center`
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Rgba,
        align: TextAlign,
    },
}

impl DrawCmd {
    pub fn rect(x: f32, y: f32, w: f32, h: f32, color: Rgba) -> Self {
        DrawCmd::Rect {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            color,
        }
    }

    pub fn text(text: impl Into<String>, x: f32, y: f32, size: f32, align: TextAlign) -> Self {
        DrawCmd::Text {
            text: text.into(),
            pos: Vec2::new(x, y),
            size,
            color: rgba(crate::sim::palette::TEXT_COLOR, 1.0),
            align,
        }
    }

    /// Replace the color of any command
    pub fn with_color(mut self, new: Rgba) -> Self {
        match &mut self {
            DrawCmd::Rect { color, .. }
            | DrawCmd::Polygon { color, .. }
            | DrawCmd::Circle { color, .. }
            | DrawCmd::Line { color, .. }
            | DrawCmd::Text { color, .. } => *color = new,
        }
        self
    }
}
