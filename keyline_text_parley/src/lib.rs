// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley-backed text measurement adapter.
//!
//! This crate implements [`keyline_text::TextMeasurer`] using Parley, enabling
//! shaping-aware label metrics and Parley's own line breaker for legend
//! label wrapping.

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use core::cell::RefCell;

use keyline_text::{
    FontFamily, FontStyle, MeasurementError, TextMeasurer, TextMetrics, TextStyle, WrapBudget,
    WrappedLine, WrappedText, fit_height,
};
use parley::style::{FontFamily as ParleyFontFamily, FontStack, GenericFamily, StyleProperty};
use parley::{Alignment, AlignmentOptions, FontContext, FontStyle as ParleyFontStyle, FontWeight};
use smallvec::SmallVec;

/// A [`TextMeasurer`] backed by Parley.
pub struct ParleyTextMeasurer {
    font_cx: RefCell<FontContext>,
    layout_cx: RefCell<parley::LayoutContext<()>>,
    display_scale: f32,
    quantize: bool,
}

impl core::fmt::Debug for ParleyTextMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyTextMeasurer")
            .field("display_scale", &self.display_scale)
            .field("quantize", &self.quantize)
            .finish_non_exhaustive()
    }
}

impl ParleyTextMeasurer {
    /// Creates a new Parley-backed text measurer using the system font configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            font_cx: RefCell::new(FontContext::new()),
            layout_cx: RefCell::new(parley::LayoutContext::new()),
            display_scale: 1.0,
            quantize: true,
        }
    }

    /// Sets the display scale passed to Parley.
    ///
    /// This is typically a device pixel ratio. Measurements returned by this
    /// measurer are scaled back into logical coordinates (divide by scale).
    #[must_use]
    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale.max(0.0);
        self
    }

    /// Sets whether Parley should quantize layout coordinates to pixel boundaries.
    #[must_use]
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }

    fn parley_font_stack(family: &FontFamily) -> FontStack<'_> {
        let family = match family {
            FontFamily::Serif => ParleyFontFamily::Generic(GenericFamily::Serif),
            FontFamily::SansSerif => ParleyFontFamily::Generic(GenericFamily::SansSerif),
            FontFamily::Monospace => ParleyFontFamily::Generic(GenericFamily::Monospace),
            FontFamily::Named(name) => ParleyFontFamily::Named(Cow::Borrowed(name.as_ref())),
        };
        FontStack::from(family)
    }

    fn parley_font_style(style: FontStyle) -> ParleyFontStyle {
        match style {
            FontStyle::Normal => ParleyFontStyle::Normal,
            FontStyle::Italic => ParleyFontStyle::Italic,
            FontStyle::Oblique => ParleyFontStyle::Oblique(None),
        }
    }

    fn font_size_f32(font_size: f64) -> Result<f32, MeasurementError> {
        if !font_size.is_finite() || font_size < 0.0 {
            return Err(MeasurementError::InvalidFontSize(font_size));
        }
        if font_size >= f64::from(f32::MAX) {
            Ok(f32::MAX)
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Value is clamped to f32::MAX above"
            )]
            {
                Ok(font_size as f32)
            }
        }
    }

    fn scale(&self) -> f32 {
        self.display_scale.max(1.0e-6)
    }

    /// Shapes `text` and breaks it at `max_width` (logical units), if any.
    fn layout(
        &self,
        text: &str,
        style: &TextStyle,
        max_width: Option<f64>,
    ) -> Result<parley::Layout<()>, MeasurementError> {
        let font_size = Self::font_size_f32(style.font_size)?;
        let scale = self.scale();

        let mut font_cx = self.font_cx.borrow_mut();
        let mut layout_cx = self.layout_cx.borrow_mut();

        let mut builder = layout_cx.ranged_builder(&mut font_cx, text, scale, self.quantize);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::FontStack(Self::parley_font_stack(
            &style.font_family,
        )));
        builder.push_default(StyleProperty::FontStyle(Self::parley_font_style(
            style.font_style,
        )));
        builder.push_default(StyleProperty::FontWeight(FontWeight::new(f32::from(
            style.font_weight.0,
        ))));

        let mut layout: parley::Layout<()> = builder.build(text);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "label budgets are small pixel extents"
        )]
        let max_advance = max_width.map(|w| w as f32 * scale);
        layout.break_all_lines(max_advance);
        layout.align(None, Alignment::Start, AlignmentOptions::default());
        Ok(layout)
    }
}

impl Default for ParleyTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for ParleyTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, MeasurementError> {
        let text = text.split('\n').next().unwrap_or("");
        if text.is_empty() {
            return Ok(TextMetrics::default());
        }

        let layout = self.layout(text, style, None)?;
        let Some(line) = layout.lines().next() else {
            return Ok(TextMetrics::default());
        };

        let scale = f64::from(self.scale());
        let m = line.metrics();
        Ok(TextMetrics {
            advance_width: f64::from(m.advance) / scale,
            ascent: f64::from(m.ascent) / scale,
            descent: f64::from(m.descent) / scale,
            leading: f64::from(m.leading) / scale,
        })
    }

    fn wrap(
        &self,
        text: &str,
        style: &TextStyle,
        budget: WrapBudget,
    ) -> Result<WrappedText, MeasurementError> {
        let scale = f64::from(self.scale());
        let layout = self.layout(text, style, budget.max_width)?;

        let mut lines = SmallVec::new();
        let mut line_height = 0.0_f64;
        for line in layout.lines() {
            let m = line.metrics();
            line_height = line_height.max(f64::from(m.ascent + m.descent + m.leading) / scale);
            let Some(slice) = text.get(line.text_range()) else {
                continue;
            };
            let trimmed = slice.trim();
            if trimmed.is_empty() {
                continue;
            }
            lines.push(WrappedLine {
                text: String::from(trimmed),
                width: f64::from(m.advance - m.trailing_whitespace) / scale,
            });
        }
        if lines.is_empty() {
            line_height = self.measure("Hg", style)?.line_height();
        }

        let mut wrapped = WrappedText {
            lines,
            line_height,
            truncated: false,
        };
        fit_height(self, &mut wrapped, style, budget)?;
        Ok(wrapped)
    }
}
