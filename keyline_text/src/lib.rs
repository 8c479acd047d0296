// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement and wrapping hooks for legend layout.
//!
//! Legend layout needs to know how large each tick label will be before any
//! drawing happens: label widths narrow the scale range, label heights size the
//! legend's outer bounds. Shaping and glyph layout stay downstream, so the
//! layout engine depends only on the small [`TextMeasurer`] interface defined
//! here.
//!
//! This crate is:
//! - small and dependency-light,
//! - `no_std`-friendly (it uses `alloc` for owned strings and font names), and
//! - renderer-agnostic (native shaping engines and web canvas measurement can
//!   both implement the same trait).

#![no_std]

extern crate alloc;

mod wrap;

use alloc::string::String;
use alloc::sync::Arc;

pub use wrap::{WrapBudget, WrappedLine, WrappedText, fit_height, greedy_wrap};

/// Errors reported by a [`TextMeasurer`].
///
/// The layout engine never recovers from these; they are returned to the
/// caller unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MeasurementError {
    /// The requested font family cannot be resolved by the backend.
    #[error("font family `{0}` is not available")]
    UnsupportedFont(String),
    /// The font size is negative or not finite.
    #[error("invalid font size {0}")]
    InvalidFontSize(f64),
    /// The measurement backend failed for another reason.
    #[error("text measurement backend failed: {0}")]
    Backend(String),
}

/// A minimal text measurement interface used by legend layout.
///
/// Implementations can be:
/// - heuristic (fast, but inaccurate),
/// - backed by a shaping engine (e.g. Parley), or
/// - backed by web platform text measurement (e.g. HTML canvas).
///
/// Implementations must be deterministic: identical inputs produce identical
/// metrics.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; callers should split on `\n` if they
    /// want multi-line layout.
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, MeasurementError>;

    /// Wrap `text` into lines that fit `budget`.
    ///
    /// The default implementation is a greedy word wrap driven by
    /// [`TextMeasurer::measure`]. Backends with their own line breaker can
    /// override it.
    fn wrap(
        &self,
        text: &str,
        style: &TextStyle,
        budget: WrapBudget,
    ) -> Result<WrappedText, MeasurementError> {
        greedy_wrap(self, text, style, budget)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, MeasurementError> {
        (**self).measure(text, style)
    }

    fn wrap(
        &self,
        text: &str,
        style: &TextStyle,
        budget: WrapBudget,
    ) -> Result<WrappedText, MeasurementError> {
        (**self).wrap(text, style, budget)
    }
}

/// Text styling inputs relevant to measurement.
///
/// This is intentionally minimal: it’s just enough to make legend layout
/// consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in the legend’s coordinate system (typically pixels).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a default `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, font_family: FontFamily) -> Self {
        self.font_family = font_family;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Inter"`, `"Helvetica Neue"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Parses a CSS family name, mapping the generic keywords to their variants.
    #[must_use]
    pub fn from_css(family: &str) -> Self {
        match family.trim() {
            "serif" => Self::Serif,
            "sans-serif" => Self::SansSerif,
            "monospace" => Self::Monospace,
            other => Self::Named(Arc::from(other.trim_matches(['"', '\'']))),
        }
    }

    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// The advance width (useful for horizontal layout).
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// A tiny heuristic text measurer suitable for demos, tests and early layout.
///
/// It assumes an average glyph width of ~0.6em and a baseline at ~0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, MeasurementError> {
        let size = style.font_size;
        if !size.is_finite() || size < 0.0 {
            return Err(MeasurementError::InvalidFontSize(size));
        }
        Ok(TextMetrics {
            advance_width: 0.6 * size * text.chars().count() as f64,
            ascent: 0.8 * size,
            descent: 0.2 * size,
            leading: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn heuristic_width_scales_with_glyph_count() {
        let m = HeuristicTextMeasurer;
        let style = TextStyle::new(10.0);
        let a = m.measure("ab", &style).unwrap();
        let b = m.measure("abcd", &style).unwrap();
        assert!((a.advance_width - 12.0).abs() < 1e-9);
        assert!((b.advance_width - 24.0).abs() < 1e-9);
        assert!((a.line_height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn heuristic_rejects_invalid_font_size() {
        let m = HeuristicTextMeasurer;
        let err = m.measure("x", &TextStyle::new(f64::NAN)).unwrap_err();
        assert!(matches!(err, MeasurementError::InvalidFontSize(_)));
        assert!(m.measure("x", &TextStyle::new(-1.0)).is_err());
    }

    #[test]
    fn css_family_round_trips_generic_keywords() {
        assert_eq!(FontFamily::from_css("serif"), FontFamily::Serif);
        assert_eq!(FontFamily::from_css(" monospace "), FontFamily::Monospace);
        let named = FontFamily::from_css("\"Inter\"");
        assert_eq!(named.as_css_family(), "Inter");
    }
}
