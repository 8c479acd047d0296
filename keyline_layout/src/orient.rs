// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation roles.
//!
//! A legend has a *primary* axis (along which domain values are laid out) and
//! a *secondary* axis (its thickness: bar, ticks, then labels). Every
//! orientation-dependent decision in layout goes through one lookup table,
//! [`Roles`], so the four orientations share a single code path.

use kurbo::{Line, Point, Rect, Size};

/// Legend orientation: the side of the bar on which ticks and labels sit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orient {
    /// Horizontal; ticks and labels above the bar.
    Top,
    /// Horizontal; ticks and labels below the bar.
    #[default]
    Bottom,
    /// Vertical; ticks and labels left of the bar.
    Left,
    /// Vertical; ticks and labels right of the bar.
    Right,
}

impl Orient {
    /// All orientations.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Returns the role table for this orientation.
    pub const fn roles(self) -> Roles {
        match self {
            Self::Top => Roles {
                horizontal: true,
                tick_sign: -1.0,
                bar_edge: Edge::After,
                label_anchor: TextAnchor::Middle,
                label_align: VerticalAlign::Bottom,
            },
            Self::Bottom => Roles {
                horizontal: true,
                tick_sign: 1.0,
                bar_edge: Edge::Before,
                label_anchor: TextAnchor::Middle,
                label_align: VerticalAlign::Top,
            },
            Self::Left => Roles {
                horizontal: false,
                tick_sign: -1.0,
                bar_edge: Edge::After,
                label_anchor: TextAnchor::End,
                label_align: VerticalAlign::Middle,
            },
            Self::Right => Roles {
                horizontal: false,
                tick_sign: 1.0,
                bar_edge: Edge::Before,
                label_anchor: TextAnchor::Start,
                label_align: VerticalAlign::Middle,
            },
        }
    }

    /// Whether values run along the x axis.
    pub const fn is_horizontal(self) -> bool {
        self.roles().horizontal
    }
}

/// Alignment of the legend within the container's secondary extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Top (horizontal legends) or left (vertical legends), inset by padding.
    Start,
    /// Centered.
    #[default]
    Center,
    /// Bottom or right, flush with the container edge.
    End,
}

/// Which end of the outer box's secondary extent the bar sits at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Secondary start plus padding.
    Before,
    /// Secondary end minus padding.
    After,
}

/// Horizontal text anchor relative to the label point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the point.
    Start,
    /// Text is centered on the point.
    Middle,
    /// Text ends at the point.
    End,
}

/// Vertical alignment of a (possibly multi-line) label block relative to the label point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// The block's top edge is at the point.
    Top,
    /// The block is centered on the point.
    Middle,
    /// The block's bottom edge is at the point.
    Bottom,
}

/// Orientation-dependent roles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roles {
    /// Primary axis is x.
    pub horizontal: bool,
    /// Direction from the bar towards ticks and labels along the secondary axis.
    pub tick_sign: f64,
    /// Bar placement inside the outer box.
    pub bar_edge: Edge,
    /// Label anchor.
    pub label_anchor: TextAnchor,
    /// Label block alignment.
    pub label_align: VerticalAlign,
}

impl Roles {
    /// Builds a point from primary/secondary coordinates.
    pub fn point(&self, primary: f64, secondary: f64) -> Point {
        if self.horizontal {
            Point::new(primary, secondary)
        } else {
            Point::new(secondary, primary)
        }
    }

    /// Builds a line between two primary/secondary points.
    pub fn line(&self, p0: f64, s0: f64, p1: f64, s1: f64) -> Line {
        Line::new(self.point(p0, s0), self.point(p1, s1))
    }

    /// Builds a normalized rectangle spanning two primary/secondary corners.
    pub fn rect(&self, p0: f64, s0: f64, p1: f64, s1: f64) -> Rect {
        Rect::from_points(self.point(p0, s0), self.point(p1, s1))
    }

    /// Splits a size into `(primary, secondary)` extents.
    pub fn split(&self, size: Size) -> (f64, f64) {
        if self.horizontal {
            (size.width, size.height)
        } else {
            (size.height, size.width)
        }
    }

    /// Joins `(primary, secondary)` extents into a size.
    pub fn join(&self, primary: f64, secondary: f64) -> Size {
        if self.horizontal {
            Size::new(primary, secondary)
        } else {
            Size::new(secondary, primary)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn opposite_orientations_differ_only_in_sign_edge_and_text_placement() {
        for (a, b) in [(Orient::Top, Orient::Bottom), (Orient::Left, Orient::Right)] {
            let (ra, rb) = (a.roles(), b.roles());
            assert_eq!(ra.horizontal, rb.horizontal);
            assert_eq!(ra.tick_sign, -rb.tick_sign);
            assert_ne!(ra.bar_edge, rb.bar_edge);
        }
    }

    #[test]
    fn vertical_roles_swap_axes() {
        let r = Orient::Left.roles();
        assert_eq!(r.point(10.0, 2.0), Point::new(2.0, 10.0));
        assert_eq!(r.split(Size::new(30.0, 200.0)), (200.0, 30.0));
        assert_eq!(r.join(200.0, 30.0), Size::new(30.0, 200.0));
        assert_eq!(r.rect(5.0, 8.0, 1.0, 2.0), Rect::new(2.0, 1.0, 8.0, 5.0));
    }
}
