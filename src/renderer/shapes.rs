//! Tessellation of draw commands into triangle lists

use glam::Vec2;
use std::f32::consts::PI;

use super::draw::{DrawCmd, Rgba};
use super::vertex::Vertex;

const CIRCLE_SEGMENTS: u32 = 24;

fn push_tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: Rgba) {
    let [a, b, c, d] = corners;
    push_tri(out, a, b, c, color);
    push_tri(out, a, c, d, color);
}

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, color: Rgba) {
    push_quad(
        out,
        [
            pos,
            pos + Vec2::new(size.x, 0.0),
            pos + size,
            pos + Vec2::new(0.0, size.y),
        ],
        color,
    );
}

/// Convex polygon as a triangle fan from the first point
pub fn polygon(out: &mut Vec<Vertex>, points: &[Vec2], color: Rgba) {
    if points.len() < 3 {
        return;
    }
    for pair in points[1..].windows(2) {
        push_tri(out, points[0], pair[0], pair[1], color);
    }
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Rgba) {
    for i in 0..CIRCLE_SEGMENTS {
        let theta1 = (i as f32 / CIRCLE_SEGMENTS as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / CIRCLE_SEGMENTS as f32) * 2.0 * PI;

        // Triangle from center to edge
        push_tri(
            out,
            center,
            center + radius * Vec2::new(theta1.cos(), theta1.sin()),
            center + radius * Vec2::new(theta2.cos(), theta2.sin()),
            color,
        );
    }
}

/// Thick line segment as a quad
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Rgba) {
    // Direction from start to end
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    push_quad(out, [from + perp, to + perp, to - perp, from - perp], color);
}

/// Triangles for every geometric command; text is skipped
pub fn tessellate(cmds: &[DrawCmd]) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(cmds.len() * 6);
    for cmd in cmds {
        match cmd {
            DrawCmd::Rect { pos, size, color } => rect(&mut out, *pos, *size, *color),
            DrawCmd::Polygon { points, color } => polygon(&mut out, points, *color),
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => circle(&mut out, *center, *radius, *color),
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => line(&mut out, *from, *to, *width, *color),
            DrawCmd::Text { .. } => {}
        }
    }
    out
}
