// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable primitives and their interpolation.

use keyline_layout::{TextAnchor, VerticalAlign};
use kurbo::{Line, Point, Rect, Vec2};
use peniko::Brush;

/// A stroked line (bar or tick).
#[derive(Clone, Debug, PartialEq)]
pub struct LinePrimitive {
    /// Geometry.
    pub line: Line,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// A possibly multi-line text block.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPrimitive {
    /// Anchor point.
    pub anchor_point: Point,
    /// Lines in reading order.
    pub lines: Vec<String>,
    /// Distance between consecutive lines.
    pub line_pitch: f64,
    /// Font size.
    pub font_size: f64,
    /// CSS font family.
    pub font_family: String,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical block alignment.
    pub align: VerticalAlign,
    /// Fill paint.
    pub fill: Brush,
    /// Block bounds, moving with the anchor point.
    pub bounds: Rect,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// A retained primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Clip rectangle.
    Clip(Rect),
    /// Stroked line.
    Line(LinePrimitive),
    /// Text block.
    Text(TextPrimitive),
}

impl Primitive {
    /// Interpolates geometry and opacity towards `to`; paints and text switch to `to` immediately.
    ///
    /// Mismatched kinds jump straight to `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Clip(a), Self::Clip(b)) => Self::Clip(lerp_rect(*a, *b, t)),
            (Self::Line(a), Self::Line(b)) => Self::Line(LinePrimitive {
                line: Line::new(a.line.p0.lerp(b.line.p0, t), a.line.p1.lerp(b.line.p1, t)),
                stroke: b.stroke.clone(),
                stroke_width: lerp(a.stroke_width, b.stroke_width, t),
                opacity: lerp(a.opacity, b.opacity, t),
            }),
            (Self::Text(a), Self::Text(b)) => Self::Text(TextPrimitive {
                anchor_point: a.anchor_point.lerp(b.anchor_point, t),
                bounds: lerp_rect(a.bounds, b.bounds, t),
                opacity: lerp(a.opacity, b.opacity, t),
                ..b.clone()
            }),
            _ => to.clone(),
        }
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        match self {
            Self::Clip(r) => Self::Clip(*r + delta),
            Self::Line(l) => Self::Line(LinePrimitive {
                line: Line::new(l.line.p0 + delta, l.line.p1 + delta),
                ..l.clone()
            }),
            Self::Text(t) => Self::Text(TextPrimitive {
                anchor_point: t.anchor_point + delta,
                bounds: t.bounds + delta,
                ..t.clone()
            }),
        }
    }

    /// Returns a copy with the given opacity (clips are unchanged).
    #[must_use]
    pub fn with_opacity(&self, opacity: f64) -> Self {
        match self {
            Self::Clip(_) => self.clone(),
            Self::Line(l) => Self::Line(LinePrimitive {
                opacity,
                ..l.clone()
            }),
            Self::Text(t) => Self::Text(TextPrimitive {
                opacity,
                ..t.clone()
            }),
        }
    }

    /// Position along the primary axis: a tick line's base or a label's anchor.
    pub fn primary_position(&self, horizontal: bool) -> Option<f64> {
        let p = match self {
            Self::Clip(_) => return None,
            Self::Line(l) => l.line.p0,
            Self::Text(t) => t.anchor_point,
        };
        Some(if horizontal { p.x } else { p.y })
    }

    /// Bounding box, inflated by half the stroke width for lines.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Clip(r) => *r,
            Self::Line(l) => {
                let half = l.stroke_width / 2.0;
                Rect::from_points(l.line.p0, l.line.p1).inflate(half, half)
            }
            Self::Text(t) => t.bounds,
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;

    use super::*;

    fn line(x: f64, opacity: f64) -> Primitive {
        Primitive::Line(LinePrimitive {
            line: Line::new((x, 0.0), (x, 5.0)),
            stroke: Brush::Solid(css::BLACK),
            stroke_width: 1.0,
            opacity,
        })
    }

    #[test]
    fn lerp_moves_geometry_and_fades() {
        let mid = line(0.0, 0.0).lerp(&line(10.0, 1.0), 0.5);
        assert_eq!(mid, line(5.0, 0.5));
        assert_eq!(mid.primary_position(true), Some(5.0));
    }

    #[test]
    fn translate_and_fade() {
        let moved = line(0.0, 1.0).translated(Vec2::new(3.0, 0.0)).with_opacity(0.0);
        assert_eq!(moved, line(3.0, 0.0));
        let clip = Primitive::Clip(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(clip.primary_position(true), None);
        assert_eq!(clip.with_opacity(0.0), clip);
    }
}
