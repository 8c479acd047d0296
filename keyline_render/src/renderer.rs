// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained legend rendering with transitions.

use std::time::Duration;

use hashbrown::HashMap;
use keyline_layout::{LegendLayout, LegendStyle};
use kurbo::{Rect, Vec2};

use crate::id::PrimitiveId;
use crate::primitive::{LinePrimitive, Primitive, TextPrimitive};

/// Called once when a transition finishes.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Draws legend layouts.
///
/// Time is supplied by the caller: `render` starts a transition at `now`
/// and `advance` moves the displayed frame forward. A render while a
/// transition is in flight supersedes it; animation continues from the
/// currently displayed values and the superseded callback is dropped.
pub trait Renderer {
    /// Transitions the drawn legend to `layout` over `layout.duration`.
    fn render(
        &mut self,
        layout: &LegendLayout,
        style: &LegendStyle,
        now: Duration,
        on_complete: Option<CompletionCallback>,
    );

    /// Moves the clock to `now`, finishing the transition if it is due.
    ///
    /// Returns `true` while a transition is still in flight.
    fn advance(&mut self, now: Duration) -> bool;
}

/// Lifecycle phase of a retained primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Newly created; fading in.
    Enter,
    /// Present before and after.
    Update,
    /// No longer in the layout; fading out, removed when the transition ends.
    Exit,
}

#[derive(Clone, Debug)]
struct Entry {
    from: Primitive,
    to: Primitive,
    phase: Phase,
}

struct Transition {
    start: Duration,
    duration: Duration,
    on_complete: Option<CompletionCallback>,
}

impl Transition {
    fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }
}

/// A retained legend scene that serializes its displayed frame to SVG.
pub struct SvgRenderer {
    entries: HashMap<PrimitiveId, Entry>,
    transition: Option<Transition>,
    now: Duration,
    pub(crate) id_prefix: String,
    pub(crate) view_box: Option<Rect>,
}

impl core::fmt::Debug for SvgRenderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SvgRenderer")
            .field("entries", &self.entries.len())
            .field("animating", &self.transition.is_some())
            .field("now", &self.now)
            .field("id_prefix", &self.id_prefix)
            .field("view_box", &self.view_box)
            .finish()
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            transition: None,
            now: Duration::ZERO,
            id_prefix: String::from("keyline"),
            view_box: None,
        }
    }

    /// Sets the prefix for element ids (e.g. the clip path), so several
    /// legends can share one document.
    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Replaces the element id prefix.
    pub fn set_id_prefix(&mut self, prefix: impl Into<String>) {
        self.id_prefix = prefix.into();
    }

    /// Sets a minimum view box; the output view box also covers all primitives.
    #[must_use]
    pub fn with_view_box(mut self, view_box: Rect) -> Self {
        self.view_box = Some(view_box);
        self
    }

    /// Whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// The clock value of the displayed frame.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The displayed value of one primitive.
    pub fn get(&self, id: PrimitiveId) -> Option<Primitive> {
        let t = self.eased_progress();
        self.entries.get(&id).map(|e| e.from.lerp(&e.to, t))
    }

    /// The phase of one primitive.
    pub fn phase(&self, id: PrimitiveId) -> Option<Phase> {
        self.entries.get(&id).map(|e| e.phase)
    }

    /// The displayed frame in paint order.
    pub fn primitives(&self) -> Vec<(PrimitiveId, Primitive)> {
        let t = self.eased_progress();
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(id, e)| (*id, e.from.lerp(&e.to, t)))
            .collect();
        out.sort_by_key(|(id, _)| (id.z_index(), *id));
        out
    }

    fn eased_progress(&self) -> f64 {
        let Some(tr) = &self.transition else {
            return 1.0;
        };
        let total = tr.duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        let t = (self.now.saturating_sub(tr.start).as_secs_f64() / total).clamp(0.0, 1.0);
        ease_cubic_in_out(t)
    }

    /// Freezes every primitive at its displayed value.
    fn snapshot(&mut self) {
        let t = self.eased_progress();
        for entry in self.entries.values_mut() {
            let shown = entry.from.lerp(&entry.to, t);
            entry.from = shown.clone();
            entry.to = shown;
        }
    }
}

impl Renderer for SvgRenderer {
    fn render(
        &mut self,
        layout: &LegendLayout,
        style: &LegendStyle,
        now: Duration,
        on_complete: Option<CompletionCallback>,
    ) {
        // A transition that is already due completes normally.
        self.advance(now);
        // Freeze at the displayed values while the old transition still drives progress.
        self.snapshot();
        if let Some(superseded) = self.transition.take() {
            tracing::debug!(
                dropped_callback = superseded.on_complete.is_some(),
                "legend transition superseded"
            );
        }

        let horizontal = layout.orient.is_horizontal();
        let along = |delta: f64| {
            if horizontal {
                Vec2::new(delta, 0.0)
            } else {
                Vec2::new(0.0, delta)
            }
        };

        let targets = targets(layout, style);
        let mut entered = 0_usize;
        for (id, target) in &targets {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.to = target.clone();
                entry.phase = Phase::Update;
                continue;
            }
            let from = match (id, id.value(), layout.previous_scale) {
                (PrimitiveId::Clip, ..) => target.clone(),
                (_, Some(v), Some(previous)) => target
                    .translated(along(previous.map(v) - layout.scale.map(v)))
                    .with_opacity(0.0),
                _ => target.with_opacity(0.0),
            };
            self.entries.insert(
                *id,
                Entry {
                    from,
                    to: target.clone(),
                    phase: Phase::Enter,
                },
            );
            entered += 1;
        }

        let mut exited = 0_usize;
        for (id, entry) in &mut self.entries {
            if targets.iter().any(|(t, _)| t == id) {
                continue;
            }
            let delta = id
                .value()
                .zip(entry.from.primary_position(horizontal))
                .map_or(0.0, |(v, pos)| layout.scale.map(v) - pos);
            entry.to = entry.from.translated(along(delta)).with_opacity(0.0);
            entry.phase = Phase::Exit;
            exited += 1;
        }
        tracing::debug!(
            entered,
            exited,
            total = self.entries.len(),
            duration_ms = layout.duration.as_millis(),
            "legend render"
        );

        self.transition = Some(Transition {
            start: now,
            duration: layout.duration,
            on_complete,
        });
        self.advance(now);
    }

    fn advance(&mut self, now: Duration) -> bool {
        self.now = now;
        let Some(tr) = &self.transition else {
            return false;
        };
        if now < tr.end() {
            return true;
        }
        let Some(tr) = self.transition.take() else {
            return false;
        };
        self.entries.retain(|_, e| e.phase != Phase::Exit);
        for entry in self.entries.values_mut() {
            entry.from = entry.to.clone();
        }
        if let Some(on_complete) = tr.on_complete {
            on_complete();
        }
        false
    }
}

/// Target primitives for a layout: clip, bar, tick lines and visible labels.
fn targets(layout: &LegendLayout, style: &LegendStyle) -> Vec<(PrimitiveId, Primitive)> {
    let stroke = |line| {
        Primitive::Line(LinePrimitive {
            line,
            stroke: style.stroke.clone(),
            stroke_width: layout.stroke_width,
            opacity: 1.0,
        })
    };
    let mut out = Vec::with_capacity(2 + 2 * layout.ticks.len());
    out.push((PrimitiveId::Clip, Primitive::Clip(layout.clip)));
    out.push((PrimitiveId::Bar, stroke(layout.bar)));
    for tick in &layout.ticks {
        out.push((PrimitiveId::tick(tick.value), stroke(tick.line)));
        let label = &tick.label;
        if !label.visible {
            continue;
        }
        out.push((
            PrimitiveId::label(tick.value),
            Primitive::Text(TextPrimitive {
                anchor_point: label.anchor_point,
                lines: label.wrapped.texts().map(String::from).collect(),
                line_pitch: label.line_pitch(),
                font_size: label.font_size,
                font_family: String::from(label.font_family.as_css_family()),
                anchor: layout.label_anchor,
                align: layout.label_align,
                fill: style.label_fill.clone(),
                bounds: label.bounds,
                opacity: 1.0,
            }),
        ));
    }
    out
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use keyline_layout::LegendSpec;
    use keyline_text::HeuristicTextMeasurer;

    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn spec() -> LegendSpec {
        LegendSpec::new()
            .with_size(400.0, 100.0)
            .with_duration(Duration::from_millis(100))
    }

    fn counter() -> (Rc<Cell<u32>>, CompletionCallback) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Box::new(move || c.set(c.get() + 1)))
    }

    fn opacity(p: &Primitive) -> f64 {
        match p {
            Primitive::Line(l) => l.opacity,
            Primitive::Text(t) => t.opacity,
            Primitive::Clip(_) => 1.0,
        }
    }

    #[test]
    fn zero_duration_applies_immediately() {
        let layout = spec()
            .with_duration(Duration::ZERO)
            .layout(&HeuristicTextMeasurer, None)
            .unwrap();
        let mut r = SvgRenderer::new();
        let (count, cb) = counter();
        r.render(&layout, &LegendStyle::default(), Duration::ZERO, Some(cb));
        assert_eq!(count.get(), 1);
        assert!(!r.is_animating());
        let bar = r.get(PrimitiveId::Bar).unwrap();
        assert_eq!(opacity(&bar), 1.0);
        // Clip, bar, six ticks, six labels.
        assert_eq!(r.primitives().len(), 14);
    }

    #[test]
    fn enter_fades_in_and_completes_once() {
        let layout = spec().layout(&HeuristicTextMeasurer, None).unwrap();
        let mut r = SvgRenderer::new();
        let (count, cb) = counter();
        r.render(&layout, &LegendStyle::default(), Duration::ZERO, Some(cb));

        let id = PrimitiveId::tick(4.0);
        assert_eq!(r.phase(id), Some(Phase::Enter));
        assert_eq!(opacity(&r.get(id).unwrap()), 0.0);

        assert!(r.advance(50 * MS));
        let mid = opacity(&r.get(id).unwrap());
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(count.get(), 0);

        assert!(!r.advance(100 * MS));
        assert_eq!(count.get(), 1);
        assert_eq!(opacity(&r.get(id).unwrap()), 1.0);
        r.advance(500 * MS);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn supersede_drops_callback_and_starts_from_displayed() {
        let first = spec().layout(&HeuristicTextMeasurer, None).unwrap();
        let second = spec()
            .with_domain(0.0, 20.0)
            .layout(&HeuristicTextMeasurer, Some(&first))
            .unwrap();
        let mut r = SvgRenderer::new();
        let (first_count, first_cb) = counter();
        let (second_count, second_cb) = counter();

        r.render(&first, &LegendStyle::default(), Duration::ZERO, Some(first_cb));
        r.advance(40 * MS);
        let shown = r.get(PrimitiveId::Bar).unwrap();
        assert!(opacity(&shown) > 0.0 && opacity(&shown) < 1.0);

        r.render(&second, &LegendStyle::default(), 40 * MS, Some(second_cb));
        assert_eq!(r.get(PrimitiveId::Bar).unwrap(), shown);

        r.advance(140 * MS);
        assert_eq!(first_count.get(), 0);
        assert_eq!(second_count.get(), 1);
    }

    #[test]
    fn exiting_ticks_move_to_new_scale_then_disappear() {
        let first = spec()
            .with_ticks([0.0, 5.0, 10.0])
            .layout(&HeuristicTextMeasurer, None)
            .unwrap();
        let second = spec()
            .with_domain(0.0, 20.0)
            .with_ticks([0.0, 10.0, 20.0])
            .layout(&HeuristicTextMeasurer, Some(&first))
            .unwrap();
        let mut r = SvgRenderer::new().with_id_prefix("exit");
        r.render(&first, &LegendStyle::default(), Duration::ZERO, None);
        r.advance(100 * MS);

        r.render(&second, &LegendStyle::default(), 100 * MS, None);
        let five = PrimitiveId::tick(5.0);
        assert_eq!(r.phase(five), Some(Phase::Exit));
        assert_eq!(r.phase(PrimitiveId::tick(10.0)), Some(Phase::Update));
        assert_eq!(r.phase(PrimitiveId::tick(20.0)), Some(Phase::Enter));

        r.advance(199 * MS);
        let near_end = r.get(five).unwrap();
        let target = second.scale.map(5.0);
        let pos = near_end.primary_position(true).unwrap();
        assert!((pos - target).abs() < 1.0);
        assert!(opacity(&near_end) < 0.01);

        r.advance(200 * MS);
        assert_eq!(r.get(five), None);
        assert_eq!(r.get(PrimitiveId::label(5.0)), None);
    }

    #[test]
    fn entering_ticks_start_at_previous_scale_position() {
        let first = spec()
            .with_ticks([0.0, 10.0])
            .layout(&HeuristicTextMeasurer, None)
            .unwrap();
        let second = spec()
            .with_domain(0.0, 20.0)
            .with_ticks([0.0, 10.0, 20.0])
            .layout(&HeuristicTextMeasurer, Some(&first))
            .unwrap();
        let mut r = SvgRenderer::new();
        r.render(&first, &LegendStyle::default(), Duration::ZERO, None);
        r.advance(100 * MS);
        r.render(&second, &LegendStyle::default(), 100 * MS, None);

        let entering = r.get(PrimitiveId::tick(20.0)).unwrap();
        let expected = first.scale.map(20.0);
        assert!((entering.primary_position(true).unwrap() - expected).abs() < 1e-9);
        assert_eq!(opacity(&entering), 0.0);
    }
}
