// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy word wrapping on top of single-line measurement.

use alloc::string::String;

use smallvec::SmallVec;

use crate::{MeasurementError, TextMeasurer, TextStyle};

const ELLIPSIS: char = '\u{2026}';

/// Probe string for line metrics (ascender + descender).
const LINE_PROBE: &str = "Hg";

/// Upper bound on the number of lines a height budget can admit.
const MAX_LINES: usize = 10_000;

/// Size limits for wrapped text.
///
/// `None` means unconstrained along that dimension. Budgets that are zero,
/// negative or not finite are normalized to `None` by [`WrapBudget::new`], so
/// wrapping never fails on degenerate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WrapBudget {
    /// Maximum line width.
    pub max_width: Option<f64>,
    /// Maximum block height (line count × line pitch).
    pub max_height: Option<f64>,
    /// Extra space added to each line's height when computing the line pitch.
    pub line_spacing: f64,
}

impl WrapBudget {
    /// Creates a budget, treating non-positive or non-finite limits as unconstrained.
    #[must_use]
    pub fn new(max_width: Option<f64>, max_height: Option<f64>) -> Self {
        Self {
            max_width: positive(max_width),
            max_height: positive(max_height),
            line_spacing: 0.0,
        }
    }

    /// A budget without any limits; text breaks only on explicit `\n`.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Sets the extra per-line spacing.
    #[must_use]
    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = if line_spacing.is_finite() {
            line_spacing.max(0.0)
        } else {
            0.0
        };
        self
    }

    /// Returns the number of lines of the given height that fit the height budget.
    ///
    /// Always at least one, so a label is never dropped entirely.
    #[must_use]
    pub fn max_lines(&self, line_height: f64) -> usize {
        let Some(max_height) = self.max_height else {
            return usize::MAX;
        };
        let pitch = line_height + self.line_spacing;
        if !pitch.is_finite() || pitch <= 0.0 {
            return usize::MAX;
        }
        let mut n = 0_usize;
        while n < MAX_LINES && (n + 1) as f64 * pitch <= max_height + 1.0e-9 {
            n += 1;
        }
        n.max(1)
    }
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite() && *v > 0.0)
}

/// One line of wrapped text.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedLine {
    /// The line's text.
    pub text: String,
    /// Measured advance width.
    pub width: f64,
}

/// The result of wrapping a string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedText {
    /// Non-empty lines, in reading order.
    pub lines: SmallVec<[WrappedLine; 2]>,
    /// Height of a single line (`ascent + descent + leading`).
    pub line_height: f64,
    /// Whether lines were dropped to satisfy the height budget.
    pub truncated: bool,
}

impl WrappedText {
    /// Returns the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the widest line's width (0 when empty).
    #[must_use]
    pub fn max_line_width(&self) -> f64 {
        self.lines.iter().map(|l| l.width).fold(0.0, f64::max)
    }

    /// Iterates the line strings.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }
}

/// Greedy word wrap driven by single-line measurement.
///
/// - Explicit `\n` always breaks.
/// - Words are appended while the line fits `budget.max_width`; a single word
///   wider than the budget gets a line of its own (no mid-word breaks).
/// - Blank lines are dropped.
/// - If the height budget admits fewer lines, the remainder is dropped and the
///   last kept line ends with an ellipsis.
pub fn greedy_wrap<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    style: &TextStyle,
    budget: WrapBudget,
) -> Result<WrappedText, MeasurementError> {
    let line_height = measurer.measure(LINE_PROBE, style)?.line_height();
    let mut out = WrappedText {
        lines: SmallVec::new(),
        line_height,
        truncated: false,
    };

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                current_width = measurer.measure(&current, style)?.advance_width;
                continue;
            }
            let mut candidate = current.clone();
            candidate.push(' ');
            candidate.push_str(word);
            let candidate_width = measurer.measure(&candidate, style)?.advance_width;
            let fits = budget.max_width.is_none_or(|w| candidate_width <= w);
            if fits {
                current = candidate;
                current_width = candidate_width;
            } else {
                out.lines.push(WrappedLine {
                    text: core::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = measurer.measure(&current, style)?.advance_width;
            }
        }
        if !current.is_empty() {
            out.lines.push(WrappedLine {
                text: current,
                width: current_width,
            });
        }
    }

    fit_height(measurer, &mut out, style, budget)?;
    Ok(out)
}

/// Drops lines that exceed the height budget, ellipsizing the last kept line.
///
/// Shared by line breakers that produce [`WrappedText`] without honoring a
/// height budget themselves.
pub fn fit_height<M: TextMeasurer + ?Sized>(
    measurer: &M,
    wrapped: &mut WrappedText,
    style: &TextStyle,
    budget: WrapBudget,
) -> Result<(), MeasurementError> {
    let max_lines = budget.max_lines(wrapped.line_height);
    if wrapped.lines.len() <= max_lines {
        return Ok(());
    }
    wrapped.lines.truncate(max_lines);
    wrapped.truncated = true;
    if let Some(last) = wrapped.lines.last_mut() {
        *last = ellipsize(measurer, &last.text, style, budget.max_width)?;
    }
    Ok(())
}

fn ellipsize<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    style: &TextStyle,
    max_width: Option<f64>,
) -> Result<WrappedLine, MeasurementError> {
    let mut base = String::from(text.trim_end());
    loop {
        let mut candidate = base.clone();
        candidate.push(ELLIPSIS);
        let width = measurer.measure(&candidate, style)?.advance_width;
        if base.is_empty() || max_width.is_none_or(|w| width <= w) {
            return Ok(WrappedLine {
                text: candidate,
                width,
            });
        }
        base.pop();
        let trimmed = base.trim_end().len();
        base.truncate(trimmed);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use super::*;
    use crate::HeuristicTextMeasurer;

    fn lines(w: &WrappedText) -> Vec<&str> {
        w.texts().collect()
    }

    #[test]
    fn unconstrained_breaks_only_on_newlines() {
        let m = HeuristicTextMeasurer;
        let w = m
            .wrap(
                "a long label\nsecond",
                &TextStyle::new(10.0),
                WrapBudget::unconstrained(),
            )
            .unwrap();
        assert_eq!(lines(&w), ["a long label", "second"]);
        assert!(!w.truncated);
    }

    #[test]
    fn narrow_budget_wraps_per_word() {
        let m = HeuristicTextMeasurer;
        // 6px per glyph: "aaa bbb" = 42px, each word = 18px.
        let budget = WrapBudget::new(Some(30.0), None);
        let w = m.wrap("aaa bbb", &TextStyle::new(10.0), budget).unwrap();
        assert_eq!(lines(&w), ["aaa", "bbb"]);
        assert!((w.max_line_width() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_word_keeps_its_own_line() {
        let m = HeuristicTextMeasurer;
        let budget = WrapBudget::new(Some(5.0), None);
        let w = m.wrap("abcdef gh", &TextStyle::new(10.0), budget).unwrap();
        assert_eq!(lines(&w), ["abcdef", "gh"]);
    }

    #[test]
    fn degenerate_budgets_are_unconstrained() {
        let budget = WrapBudget::new(Some(0.0), Some(-3.0));
        assert_eq!(budget.max_width, None);
        assert_eq!(budget.max_height, None);
        let budget = WrapBudget::new(Some(f64::NAN), Some(f64::INFINITY));
        assert_eq!(budget, WrapBudget::unconstrained());
    }

    #[test]
    fn height_budget_truncates_with_ellipsis() {
        let m = HeuristicTextMeasurer;
        // line height 10 + spacing 1 => 11px pitch; 25px fits two lines.
        let budget = WrapBudget::new(Some(20.0), Some(25.0)).with_line_spacing(1.0);
        let w = m.wrap("aa bb cc dd", &TextStyle::new(10.0), budget).unwrap();
        assert_eq!(w.line_count(), 2);
        assert!(w.truncated);
        assert!(w.lines[1].text.ends_with(ELLIPSIS));
    }

    #[test]
    fn height_budget_keeps_at_least_one_line() {
        let budget = WrapBudget::new(None, Some(1.0));
        assert_eq!(budget.max_lines(10.0), 1);
    }

    #[test]
    fn blank_text_has_no_lines() {
        let m = HeuristicTextMeasurer;
        let w = m
            .wrap(" \n ", &TextStyle::new(10.0), WrapBudget::unconstrained())
            .unwrap();
        assert_eq!(w.line_count(), 0);
        assert_eq!(w.max_line_width(), 0.0);
    }
}
