// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend layout.
//!
//! A layout pass reconciles the domain, the label sizes and the container
//! into one arrangement, in this order:
//!
//! 1. resolve the scale over the padded primary extent,
//! 2. generate (or validate) ticks and derive the label spacing budget,
//! 3. format, wrap and measure every label,
//! 4. narrow the range once so the edge labels fit (no re-measurement),
//! 5. size and align the outer box, then place bar, ticks, clip and labels,
//! 6. hide labels that would overlap a preceding visible label.
//!
//! The pass is pure: the only state it consumes is the optional previous
//! layout, whose scale is carried forward for renderer transitions.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use keyline_text::{FontFamily, TextMeasurer, TextStyle, WrapBudget, WrappedText};
use kurbo::{Line, Point, Rect};

use crate::error::{ConfigurationError, LayoutError};
use crate::orient::{Align, Edge, Orient, Roles, TextAnchor, VerticalAlign};
use crate::scale::{BuiltinScales, ScaleContinuous, ScaleLinear, ScaleProvider, tick_step};
use crate::spec::LegendSpec;

/// Pixels of tick spacing per generated tick when no count is configured.
const PIXELS_PER_TICK: f64 = 75.0;
const MIN_TICKS: usize = 2;
const MAX_TICKS: usize = 10;

/// Extra space added to every label line.
const LINE_SPACING: f64 = 1.0;

const OVERLAP_EPSILON: f64 = 1.0e-9;

/// The legend's outer box in container coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OuterBounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (never negative).
    pub width: f64,
    /// Height (never negative).
    pub height: f64,
}

impl OuterBounds {
    /// Converts to a `kurbo` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// A measured and placed tick label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLayout {
    /// The formatted text before wrapping.
    pub text: String,
    /// The wrapped lines.
    pub wrapped: WrappedText,
    /// Block width, rounded up.
    pub width: f64,
    /// Block height (`lines × (line height + 1)`), rounded up.
    pub height: f64,
    /// Resolved font size.
    pub font_size: f64,
    /// Resolved font family.
    pub font_family: FontFamily,
    /// The point the label is anchored at.
    pub anchor_point: Point,
    /// The label's block.
    pub bounds: Rect,
    /// `false` when the label overlaps a preceding visible label, or is empty.
    pub visible: bool,
}

impl LabelLayout {
    /// Number of wrapped lines.
    pub fn line_count(&self) -> usize {
        self.wrapped.line_count()
    }

    /// Distance between consecutive line baselines.
    pub fn line_pitch(&self) -> f64 {
        self.wrapped.line_height + LINE_SPACING
    }
}

/// One tick: its value, position, line and label.
#[derive(Clone, Debug, PartialEq)]
pub struct TickLayout {
    /// Domain value.
    pub value: f64,
    /// Position along the primary axis.
    pub position: f64,
    /// Tick line, from the bar outwards.
    pub line: Line,
    /// The tick's label.
    pub label: LabelLayout,
}

/// The result of a layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendLayout {
    /// Orientation the layout was computed for.
    pub orient: Orient,
    /// Final (narrowed) scale.
    pub scale: ScaleContinuous,
    /// Scale of the previous layout, if one was supplied.
    pub previous_scale: Option<ScaleContinuous>,
    /// Narrowed primary range.
    pub range: (f64, f64),
    /// Primary-axis label budget; `None` when unconstrained.
    pub max_tick_spacing: Option<f64>,
    /// Ticks in tick-set order.
    pub ticks: Vec<TickLayout>,
    /// Outer bounds.
    pub outer: OuterBounds,
    /// Bar line from `s(d0)` to `s(d1)`.
    pub bar: Line,
    /// Clip rectangle around bar and ticks.
    pub clip: Rect,
    /// Label text anchor.
    pub label_anchor: TextAnchor,
    /// Label block alignment.
    pub label_align: VerticalAlign,
    /// Stroke width for bar and ticks.
    pub stroke_width: f64,
    /// Transition duration for renderers.
    pub duration: Duration,
}

impl Default for LegendLayout {
    /// An empty layout with zeroed bounds.
    fn default() -> Self {
        let roles = Orient::default().roles();
        Self {
            orient: Orient::default(),
            scale: ScaleContinuous::Linear(ScaleLinear::new((0.0, 1.0), (0.0, 0.0))),
            previous_scale: None,
            range: (0.0, 0.0),
            max_tick_spacing: None,
            ticks: Vec::new(),
            outer: OuterBounds::default(),
            bar: Line::new(Point::ZERO, Point::ZERO),
            clip: Rect::ZERO,
            label_anchor: roles.label_anchor,
            label_align: roles.label_align,
            stroke_width: 0.0,
            duration: Duration::ZERO,
        }
    }
}

impl LegendLayout {
    /// The outer bounds (zeroed for a default layout).
    pub fn outer_bounds(&self) -> OuterBounds {
        self.outer
    }

    /// Tick values in tick-set order.
    pub fn tick_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|t| t.value)
    }

    /// The union of bar, tick lines and visible labels.
    pub fn content_bounds(&self) -> Rect {
        let bar = Rect::from_points(self.bar.p0, self.bar.p1);
        self.ticks.iter().fold(bar, |acc, tick| {
            let acc = acc.union(Rect::from_points(tick.line.p0, tick.line.p1));
            if tick.label.visible {
                acc.union(tick.label.bounds)
            } else {
                acc
            }
        })
    }
}

/// A label measured but not yet placed.
struct Measured {
    text: String,
    wrapped: WrappedText,
    width: f64,
    height: f64,
    font_size: f64,
    font_family: FontFamily,
}

impl Measured {
    fn primary_extent(&self, roles: &Roles) -> f64 {
        if roles.horizontal {
            self.width
        } else {
            self.height
        }
    }

    fn secondary_extent(&self, roles: &Roles) -> f64 {
        if roles.horizontal {
            self.height
        } else {
            self.width
        }
    }
}

impl LegendSpec {
    /// Computes the layout with the built-in scales.
    ///
    /// `previous` is the last layout of the same legend, if any; its scale is
    /// carried in the result so a renderer can animate from it.
    pub fn layout(
        &self,
        measurer: &dyn TextMeasurer,
        previous: Option<&LegendLayout>,
    ) -> Result<LegendLayout, LayoutError> {
        self.layout_with(&BuiltinScales, measurer, previous)
    }

    /// Computes the layout, resolving the scale kind through `scales`.
    ///
    /// All configuration errors are reported before any text is measured.
    pub fn layout_with(
        &self,
        scales: &dyn ScaleProvider,
        measurer: &dyn TextMeasurer,
        previous: Option<&LegendLayout>,
    ) -> Result<LegendLayout, LayoutError> {
        self.validate()?;
        let roles = self.orient.roles();
        let (container_primary, container_secondary) = roles.split(self.size);
        let container_primary = container_primary.max(0.0);
        let container_secondary = container_secondary.max(0.0);
        let padding = self.padding.max(0.0);
        let tick_size = self.tick_size.abs();
        let stroke_width = self.stroke_width.max(0.0);

        // Scale over the padded primary extent.
        let usable = container_primary - 2.0 * padding;
        let initial_range = if usable > 0.0 {
            (padding, padding + usable)
        } else {
            tracing::debug!(container_primary, padding, "no primary space; range collapsed");
            (padding, padding)
        };
        let scale = scales.scale(
            &self.scale,
            self.domain,
            initial_range,
            &self.scale_options,
        )?;

        let values = self.resolve_ticks(&scale, usable.max(0.0))?;
        let max_tick_spacing = max_tick_spacing(&scale, &values, padding);
        tracing::debug!(
            kind = scale.kind().name(),
            ticks = values.len(),
            ?max_tick_spacing,
            "resolved scale"
        );

        // Labels.
        let secondary_budget = container_secondary - tick_size - padding;
        let budget = label_budget(&roles, max_tick_spacing, secondary_budget);
        let step = tick_step(&values);
        let labels = values
            .iter()
            .enumerate()
            .map(|(index, &value)| self.measure_label(measurer, value, index, step, budget))
            .collect::<Result<Vec<_>, _>>()?;

        // One-shot edge correction.
        let range = narrow_range(&scale, &values, &labels, &roles, initial_range);
        let scale = scale.with_range(range);
        tracing::debug!(?initial_range, ?range, "narrowed range");

        // Outer bounds.
        let label_secondary = labels
            .iter()
            .map(|l| l.secondary_extent(&roles))
            .fold(0.0, f64::max);
        let secondary_size = finite_or(tick_size + label_secondary + 2.0 * padding, 0.0);
        let primary_size = (range.1 - range.0).max(0.0);
        let secondary_pos = finite_or(
            match self.align {
                Align::Start => padding,
                Align::End => container_secondary - secondary_size,
                Align::Center => (container_secondary - secondary_size) / 2.0,
            },
            0.0,
        );
        let origin = roles.point(range.0, secondary_pos);
        let size = roles.join(primary_size, secondary_size);
        let outer = OuterBounds {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        };

        // Geometry.
        let bar_s = finite_or(
            match roles.bar_edge {
                Edge::After => secondary_pos + secondary_size - padding,
                Edge::Before => secondary_pos + padding,
            },
            secondary_pos,
        );
        let tick_end = bar_s + roles.tick_sign * tick_size;
        let label_s = bar_s + roles.tick_sign * (tick_size + padding);

        let (d0, d1) = scale.domain();
        let (b0, b1) = (scale.map(d0), scale.map(d1));
        let bar = roles.line(b0, bar_s, b1, bar_s);
        let clip = roles.rect(
            b0.min(b1) - stroke_width,
            bar_s.min(tick_end) - stroke_width,
            b0.max(b1) + stroke_width,
            bar_s.max(tick_end) + stroke_width,
        );

        let mut ticks: Vec<TickLayout> = values
            .iter()
            .zip(labels)
            .map(|(&value, label)| {
                let position = scale.map(value);
                let half = label.primary_extent(&roles) / 2.0;
                let far = label_s + roles.tick_sign * label.secondary_extent(&roles);
                let visible = label.wrapped.line_count() > 0;
                TickLayout {
                    value,
                    position,
                    line: roles.line(position, bar_s, position, tick_end),
                    label: LabelLayout {
                        text: label.text,
                        wrapped: label.wrapped,
                        width: label.width,
                        height: label.height,
                        font_size: label.font_size,
                        font_family: label.font_family,
                        anchor_point: roles.point(position, label_s),
                        bounds: roles.rect(position - half, label_s, position + half, far),
                        visible,
                    },
                }
            })
            .collect();
        hide_overlapping_labels(&mut ticks, &roles);

        Ok(LegendLayout {
            orient: self.orient,
            scale,
            previous_scale: previous.map(|p| p.scale),
            range,
            max_tick_spacing,
            ticks,
            outer,
            bar,
            clip,
            label_anchor: roles.label_anchor,
            label_align: roles.label_align,
            stroke_width,
            duration: self.duration,
        })
    }

    /// Explicit ticks (validated, de-duplicated) or generated ones.
    fn resolve_ticks(
        &self,
        scale: &ScaleContinuous,
        usable: f64,
    ) -> Result<Vec<f64>, ConfigurationError> {
        let Some(explicit) = &self.ticks else {
            let count = self
                .tick_count
                .unwrap_or_else(|| adaptive_tick_count(usable));
            return Ok(scale.ticks(count));
        };
        let mut out: Vec<f64> = Vec::with_capacity(explicit.len());
        for (index, &value) in explicit.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteTick { index, value });
            }
            if !scale.accepts(value) {
                return Err(ConfigurationError::InvalidTick {
                    kind: scale.kind().name(),
                    index,
                    value,
                });
            }
            if !out.contains(&value) {
                out.push(value);
            }
        }
        Ok(out)
    }

    fn measure_label(
        &self,
        measurer: &dyn TextMeasurer,
        value: f64,
        index: usize,
        step: f64,
        budget: WrapBudget,
    ) -> Result<Measured, LayoutError> {
        let font_size = self.font_size.get(value, index);
        let font_family = self.font_family.get(value, index);
        let style = TextStyle::new(font_size).with_family(font_family.clone());
        let text = self.format_tick(value, step);
        let wrapped = measurer.wrap(&text, &style, budget)?;

        let width = finite_or(wrapped.max_line_width().ceil(), 0.0).max(0.0);
        let height = finite_or(
            (wrapped.line_count() as f64 * (wrapped.line_height + LINE_SPACING)).ceil(),
            0.0,
        )
        .max(0.0);
        tracing::trace!(
            value,
            text = %text,
            lines = wrapped.line_count(),
            width,
            height,
            "measured label"
        );
        Ok(Measured {
            text,
            wrapped,
            width,
            height,
            font_size,
            font_family,
        })
    }
}

/// `clamp(floor(usable / 75), 2, 10)`.
fn adaptive_tick_count(usable: f64) -> usize {
    let n = (usable / PIXELS_PER_TICK).floor();
    if !n.is_finite() || n <= MIN_TICKS as f64 {
        return MIN_TICKS;
    }
    if n >= MAX_TICKS as f64 {
        return MAX_TICKS;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is between MIN_TICKS and MAX_TICKS"
    )]
    {
        n as usize
    }
}

/// Largest gap between adjacent tick positions, minus padding.
///
/// `None` for fewer than two ticks or a non-positive result.
fn max_tick_spacing(scale: &ScaleContinuous, ticks: &[f64], padding: f64) -> Option<f64> {
    let spacing = ticks
        .windows(2)
        .map(|w| (scale.map(w[1]) - scale.map(w[0])).abs())
        .reduce(f64::max)?
        - padding;
    (spacing.is_finite() && spacing > 0.0).then_some(spacing)
}

/// Maps the primary/secondary budgets onto label width/height.
fn label_budget(roles: &Roles, primary: Option<f64>, secondary: f64) -> WrapBudget {
    let budget = if roles.horizontal {
        WrapBudget::new(primary, Some(secondary))
    } else {
        WrapBudget::new(Some(secondary), primary)
    };
    if budget.max_width.is_none() && budget.max_height.is_none() {
        tracing::debug!("label budget unconstrained");
    }
    budget.with_line_spacing(LINE_SPACING)
}

/// Shrinks `range` by half the primary extent of the labels nearest each end.
///
/// Positions come from the unshrunk scale. Never inverts: when the labels
/// do not fit, the range collapses to its midpoint.
fn narrow_range(
    scale: &ScaleContinuous,
    ticks: &[f64],
    labels: &[Measured],
    roles: &Roles,
    range: (f64, f64),
) -> (f64, f64) {
    let positioned = || ticks.iter().map(|&t| scale.map(t)).zip(labels);
    let Some((_, first)) = positioned().reduce(|a, b| if b.0 < a.0 { b } else { a }) else {
        return range;
    };
    let Some((_, last)) = positioned().reduce(|a, b| if b.0 >= a.0 { b } else { a }) else {
        return range;
    };

    let start = range.0 + first.primary_extent(roles) / 2.0;
    let end = range.1 - last.primary_extent(roles) / 2.0;
    if start <= end {
        (start, end)
    } else {
        let mid = ((start + end) / 2.0).clamp(range.0, range.1);
        tracing::debug!(start, end, mid, "labels wider than range; collapsed");
        (mid, mid)
    }
}

/// Greedily hides labels overlapping the last visible label, in primary order.
fn hide_overlapping_labels(ticks: &mut [TickLayout], roles: &Roles) {
    let interval = |r: &Rect| {
        if roles.horizontal {
            (r.x0, r.x1)
        } else {
            (r.y0, r.y1)
        }
    };
    let mut order: Vec<usize> = (0..ticks.len())
        .filter(|&i| ticks[i].label.visible)
        .collect();
    order.sort_by(|&a, &b| ticks[a].position.total_cmp(&ticks[b].position));

    let mut last_end = f64::NEG_INFINITY;
    for i in order {
        let (lo, hi) = interval(&ticks[i].label.bounds);
        if lo < last_end - OVERLAP_EPSILON {
            ticks[i].label.visible = false;
            tracing::trace!(value = ticks[i].value, "label hidden by overlap");
        } else {
            last_end = hi;
        }
    }
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::format;

    use keyline_text::{HeuristicTextMeasurer, MeasurementError, TextMetrics};

    use super::*;
    use crate::Accessor;

    const EPS: f64 = 1.0e-9;

    fn spec() -> LegendSpec {
        LegendSpec::new()
            .with_domain(0.0, 10.0)
            .with_size(400.0, 100.0)
            .with_padding(5.0)
            .with_tick_size(5.0)
    }

    fn layout(spec: &LegendSpec) -> LegendLayout {
        spec.layout(&HeuristicTextMeasurer, None).unwrap()
    }

    fn all_finite(l: &LegendLayout) -> bool {
        let rect_ok = |r: Rect| [r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite());
        let line_ok = |l: Line| [l.p0.x, l.p0.y, l.p1.x, l.p1.y].iter().all(|v| v.is_finite());
        rect_ok(l.outer.to_rect())
            && rect_ok(l.clip)
            && line_ok(l.bar)
            && l.ticks.iter().all(|t| {
                t.position.is_finite()
                    && line_ok(t.line)
                    && rect_ok(t.label.bounds)
                    && t.label.width.is_finite()
                    && t.label.height.is_finite()
            })
    }

    #[test]
    fn default_linear_legend() {
        let l = layout(&spec());
        let values: Vec<f64> = l.tick_values().collect();
        assert_eq!(values, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert!(l.outer.width <= 390.0);
        assert!(l.outer.width > 0.0);
        assert!(all_finite(&l));

        // "0" is 6px wide and "10" is 12px wide (heuristic, 10px font).
        assert!((l.range.0 - 8.0).abs() < EPS);
        assert!((l.range.1 - 389.0).abs() < EPS);
        assert!((l.outer.x - 8.0).abs() < EPS);
        assert!((l.outer.width - 381.0).abs() < EPS);

        // Labels are one line: ceil(1 × (10 + 1)) = 11.
        assert!(l.ticks.iter().all(|t| t.label.height == 11.0));
        // tick 5 + label 11 + 2 × padding.
        assert!((l.outer.height - 26.0).abs() < EPS);
        assert!(l.ticks.iter().all(|t| t.label.visible));
    }

    #[test]
    fn bottom_geometry() {
        let l = layout(&spec());
        // Centered: (100 - 26) / 2 = 37.
        assert!((l.outer.y - 37.0).abs() < EPS);
        let bar_y = 37.0 + 5.0;
        assert!((l.bar.p0.y - bar_y).abs() < EPS);
        assert!((l.bar.p0.x - l.range.0).abs() < EPS);
        assert!((l.bar.p1.x - l.range.1).abs() < EPS);

        let first = &l.ticks[0];
        assert!((first.line.p0.y - bar_y).abs() < EPS);
        assert!((first.line.p1.y - (bar_y + 5.0)).abs() < EPS);
        assert_eq!(first.label.anchor_point, Point::new(l.range.0, bar_y + 10.0));
        assert_eq!(l.label_anchor, TextAnchor::Middle);
        assert_eq!(l.label_align, VerticalAlign::Top);

        // Clip spans range and ticks, inflated by the stroke width.
        assert_eq!(
            l.clip,
            Rect::new(l.range.0 - 1.0, bar_y - 1.0, l.range.1 + 1.0, bar_y + 6.0)
        );
        // Everything but the edge labels stays inside the outer box.
        let outer = l.outer.to_rect();
        assert!(l.bar.p0.y > outer.y0 && l.bar.p0.y < outer.y1);
        for t in &l.ticks {
            assert!(t.label.bounds.y1 <= outer.y1 + EPS);
        }
    }

    #[test]
    fn top_mirrors_bottom() {
        let bottom = layout(&spec());
        let top = layout(&spec().with_orient(Orient::Top));
        assert_eq!(top.outer, bottom.outer);
        assert_eq!(top.range, bottom.range);
        let bar_y = top.outer.y + top.outer.height - 5.0;
        assert!((top.bar.p0.y - bar_y).abs() < EPS);
        let t = &top.ticks[1];
        assert!((t.line.p1.y - (bar_y - 5.0)).abs() < EPS);
        assert!((t.label.bounds.y1 - (bar_y - 10.0)).abs() < EPS);
        assert!(t.label.bounds.y0 >= top.outer.y - EPS);
        assert_eq!(top.label_align, VerticalAlign::Bottom);
    }

    #[test]
    fn vertical_legends_swap_roles() {
        let s = spec().with_size(100.0, 400.0);
        let left = layout(&s.clone().with_orient(Orient::Left));
        let right = layout(&s.with_orient(Orient::Right));

        // Primary extent is vertical: narrowed by half a line height at each end.
        assert!((left.range.0 - 10.5).abs() < EPS);
        assert!((left.range.1 - 389.5).abs() < EPS);
        assert!((left.outer.y - 10.5).abs() < EPS);
        assert!((left.outer.height - 379.0).abs() < EPS);
        // Secondary: tick 5 + widest label ("10", 12px) + 10.
        assert!((left.outer.width - 27.0).abs() < EPS);
        assert_eq!(left.outer.height, right.outer.height);
        assert_eq!(left.outer.width, right.outer.width);

        assert_eq!(left.label_anchor, TextAnchor::End);
        assert_eq!(right.label_anchor, TextAnchor::Start);
        let lt = &left.ticks[0];
        let rt = &right.ticks[0];
        assert!(lt.line.p1.x < lt.line.p0.x);
        assert!(rt.line.p1.x > rt.line.p0.x);
        assert!((lt.label.bounds.x1 - lt.label.anchor_point.x).abs() < EPS);
        assert!((rt.label.bounds.x0 - rt.label.anchor_point.x).abs() < EPS);
    }

    #[test]
    fn alignment_start_end_center() {
        for orient in Orient::ALL {
            let s = spec().with_orient(orient).with_size(300.0, 300.0);
            let start = layout(&s.clone().with_align(Align::Start));
            let end = layout(&s.clone().with_align(Align::End));
            let center = layout(&s.with_align(Align::Center));
            let horizontal = orient.is_horizontal();
            let pos = |l: &LegendLayout| if horizontal { l.outer.y } else { l.outer.x };
            let size = if horizontal {
                start.outer.height
            } else {
                start.outer.width
            };
            assert!((pos(&start) - 5.0).abs() < EPS, "{orient:?}");
            assert!((pos(&end) - (300.0 - size)).abs() < EPS, "{orient:?}");
            assert!((pos(&center) - (300.0 - size) / 2.0).abs() < EPS, "{orient:?}");
        }
    }

    #[test]
    fn zero_width_completes_with_empty_bounds() {
        let l = layout(&spec().with_size(10.0, 100.0));
        assert_eq!(l.outer.width, 0.0);
        assert_eq!(l.range.0, l.range.1);
        assert!(all_finite(&l));
        assert_eq!(l.max_tick_spacing, None);

        let l = layout(&spec().with_size(0.0, 0.0).with_padding(0.0));
        assert_eq!(l.outer.width, 0.0);
        assert!(all_finite(&l));
    }

    #[test]
    fn single_tick_wraps_only_to_secondary_extent() {
        let l = layout(
            &spec()
                .with_ticks([5.0])
                .with_tick_formatter(|_, _| String::from("a very long label text")),
        );
        assert_eq!(l.max_tick_spacing, None);
        assert_eq!(l.ticks.len(), 1);
        // No width limit: stays on one line.
        assert_eq!(l.ticks[0].label.line_count(), 1);
    }

    #[test]
    fn secondary_budget_limits_lines() {
        // Secondary budget = 40 - 5 - 5 = 30px; line pitch 11px fits two lines.
        let l = layout(
            &spec()
                .with_size(400.0, 40.0)
                .with_ticks([0.0, 10.0])
                .with_tick_formatter(|_, _| String::from("one\ntwo\nthree")),
        );
        let label = &l.ticks[0].label;
        assert_eq!(label.line_count(), 2);
        assert!(label.wrapped.truncated);
        assert_eq!(label.height, 22.0);
    }

    #[test]
    fn wide_labels_wrap_to_tick_spacing() {
        let l = layout(
            &spec()
                .with_size(200.0, 200.0)
                .with_ticks([0.0, 5.0, 10.0])
                .with_tick_formatter(|v, _| format!("value is {v}")),
        );
        // Spacing = 95 - 5 = 90; "value is 0" = 60px fits, so no wrap.
        assert_eq!(l.max_tick_spacing, Some(90.0));
        assert!(l.ticks.iter().all(|t| t.label.line_count() == 1));

        let l = layout(
            &spec()
                .with_size(100.0, 200.0)
                .with_ticks([0.0, 5.0, 10.0])
                .with_tick_formatter(|v, _| format!("value is {v}")),
        );
        // Spacing = 45 - 5 = 40 → "value is" (48px) overflows; words break.
        assert_eq!(l.max_tick_spacing, Some(40.0));
        assert!(l.ticks.iter().all(|t| t.label.line_count() > 1));
    }

    #[test]
    fn labels_wider_than_range_collapse_to_midpoint() {
        let l = layout(
            &spec()
                .with_size(60.0, 100.0)
                .with_ticks([0.0, 10.0])
                .with_tick_formatter(|_, _| String::from("wide_label_text")),
        );
        assert_eq!(l.range.0, l.range.1);
        assert!((l.range.0 - 30.0).abs() < EPS);
        assert_eq!(l.outer.width, 0.0);
        // Both labels sit at the same spot: the second is hidden.
        assert!(l.ticks[0].label.visible);
        assert!(!l.ticks[1].label.visible);
    }

    #[test]
    fn descending_domain_reverses_positions() {
        let l = layout(&spec().with_domain(10.0, 0.0));
        let values: Vec<f64> = l.tick_values().collect();
        assert_eq!(values, [10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
        assert!(l.ticks[0].position < l.ticks[5].position);
        // First by position is "10" (12px) → start moves by 6.
        assert!((l.range.0 - 11.0).abs() < EPS);
        assert!((l.range.1 - 392.0).abs() < EPS);
    }

    #[test]
    fn near_max_domain_spreads_ticks() {
        let l = layout(&spec().with_domain(-1.0e308, 1.0e308));
        assert!(all_finite(&l));
        assert!(l.ticks.len() >= 2);
        assert!(l.scale.map(1.0e308) > l.scale.map(-1.0e308));
        assert!(l.ticks.windows(2).all(|w| w[1].position > w[0].position));
        assert!(l.ticks.iter().filter(|t| t.label.visible).count() >= 2);
    }

    #[test]
    fn explicit_ticks_are_validated_and_deduplicated() {
        let l = layout(&spec().with_ticks([2.0, 4.0, 2.0, -0.0, 0.0]));
        let values: Vec<f64> = l.tick_values().collect();
        assert_eq!(values, [2.0, 4.0, -0.0]);

        let err = spec()
            .with_ticks([1.0, f64::NAN])
            .layout(&HeuristicTextMeasurer, None)
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Configuration(ConfigurationError::NonFiniteTick { index: 1, .. })
        ));

        let err = spec()
            .with_scale("log")
            .with_domain(1.0, 100.0)
            .with_ticks([0.0])
            .layout(&HeuristicTextMeasurer, None)
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Configuration(ConfigurationError::InvalidTick { kind: "log", .. })
        ));
    }

    #[test]
    fn unknown_scale_kind_is_a_configuration_error() {
        let err = spec()
            .with_scale("ordinal")
            .layout(&HeuristicTextMeasurer, None)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Configuration(ConfigurationError::UnknownScaleKind("ordinal".into()))
        );
    }

    struct FailingMeasurer;

    impl TextMeasurer for FailingMeasurer {
        fn measure(&self, _: &str, _: &TextStyle) -> Result<TextMetrics, MeasurementError> {
            Err(MeasurementError::UnsupportedFont("Nope".into()))
        }
    }

    #[test]
    fn measurement_errors_propagate() {
        let err = spec().layout(&FailingMeasurer, None).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Measurement(MeasurementError::UnsupportedFont("Nope".into()))
        );
        // Configuration errors win: nothing is measured.
        let err = spec()
            .with_scale("nope")
            .layout(&FailingMeasurer, None)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Configuration(_)));
    }

    #[test]
    fn per_datum_fonts_resolve_per_tick() {
        let l = layout(
            &spec()
                .with_ticks([0.0, 10.0])
                .with_font_size(Accessor::per_datum(|_, i| if i == 0 { 10.0 } else { 20.0 }))
                .with_font_family(FontFamily::Monospace),
        );
        assert_eq!(l.ticks[0].label.font_size, 10.0);
        assert_eq!(l.ticks[1].label.font_size, 20.0);
        assert_eq!(l.ticks[1].label.height, 21.0);
        assert_eq!(l.ticks[1].label.font_family, FontFamily::Monospace);
    }

    #[test]
    fn invalid_font_size_is_a_measurement_error() {
        let err = spec()
            .with_font_size(f64::NAN)
            .layout(&HeuristicTextMeasurer, None)
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Measurement(MeasurementError::InvalidFontSize(_))
        ));
    }

    #[test]
    fn adaptive_tick_count_is_clamped() {
        assert_eq!(adaptive_tick_count(0.0), 2);
        assert_eq!(adaptive_tick_count(390.0), 5);
        assert_eq!(adaptive_tick_count(10_000.0), 10);
        assert_eq!(adaptive_tick_count(f64::NAN), 2);
    }

    #[test]
    fn tick_count_override() {
        let l = layout(&spec().with_tick_count(2));
        let values: Vec<f64> = l.tick_values().collect();
        assert_eq!(values, [0.0, 5.0, 10.0]);
    }

    #[test]
    fn previous_scale_is_carried() {
        let first = layout(&spec());
        let second = spec()
            .with_domain(0.0, 20.0)
            .layout(&HeuristicTextMeasurer, Some(&first))
            .unwrap();
        assert_eq!(second.previous_scale, Some(first.scale));
        assert_eq!(first.previous_scale, None);
    }

    #[test]
    fn layout_is_idempotent() {
        let s = spec().with_scale("sqrt").with_domain(0.0, 1000.0);
        assert_eq!(layout(&s), layout(&s));
    }

    #[test]
    fn default_layout_has_zeroed_bounds() {
        let l = LegendLayout::default();
        assert_eq!(l.outer_bounds(), OuterBounds::default());
        assert_eq!(l.outer_bounds().to_rect(), Rect::ZERO);
        assert!(l.ticks.is_empty());
    }

    #[test]
    fn every_scale_kind_lays_out() {
        for (kind, domain) in [
            ("linear", (0.0, 1.0)),
            ("log", (1.0, 1.0e6)),
            ("sqrt", (0.0, 400.0)),
            ("pow", (-5.0, 5.0)),
            ("symlog", (-1000.0, 1000.0)),
            ("time", (0.0, 7200.0)),
        ] {
            let l = layout(&spec().with_scale(kind).with_domain(domain.0, domain.1));
            assert!(l.ticks.len() >= 2, "{kind}");
            assert!(all_finite(&l), "{kind}");
            let positions: Vec<f64> = l.ticks.iter().map(|t| t.position).collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{kind}");
        }
    }

    #[test]
    fn content_bounds_cover_visible_labels() {
        let l = layout(&spec());
        let content = l.content_bounds();
        for t in l.ticks.iter().filter(|t| t.label.visible) {
            assert_eq!(content.union(t.label.bounds), content);
        }
    }
}
