// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web/WASM text measurement adapter.
//!
//! This crate provides a [`keyline_text::TextMeasurer`] implementation for
//! `wasm32-*` targets using HTML Canvas `measureText`, which is how
//! browser-hosted legends size their labels.
//!
//! Notes:
//! - This uses `web-sys`/`wasm-bindgen` only on `wasm32` targets.
//! - Non-`wasm32` builds fall back to a heuristic measurer.
//! - Wrapping uses the default greedy line breaker over `measureText`.

#![no_std]

extern crate alloc;

#[cfg(target_arch = "wasm32")]
use alloc::{format, string::String};
#[cfg(not(target_arch = "wasm32"))]
use keyline_text::HeuristicTextMeasurer;
use keyline_text::{MeasurementError, TextMeasurer, TextMetrics, TextStyle};

/// A `wasm32` measurer backed by HTML Canvas 2D text metrics.
///
/// On non-`wasm32` targets, this type is still available but always falls back
/// to [`keyline_text::HeuristicTextMeasurer`].
#[derive(Clone, Debug)]
pub struct WebTextMeasurer {
    #[cfg(target_arch = "wasm32")]
    ctx: web_sys::CanvasRenderingContext2d,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for WebTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl WebTextMeasurer {
    #[cfg(target_arch = "wasm32")]
    fn css_font(style: &TextStyle) -> String {
        let family = style.font_family.as_css_family();
        let weight = style.font_weight.0;
        let font_style = match style.font_style {
            keyline_text::FontStyle::Normal => "normal",
            keyline_text::FontStyle::Italic => "italic",
            keyline_text::FontStyle::Oblique => "oblique",
        };
        format!("{font_style} {weight} {}px {family}", style.font_size)
    }

    /// Creates a web measurer using an offscreen canvas.
    ///
    /// This requires a browser-like environment with `window` and `document`.
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Result<Self, MeasurementError> {
        use wasm_bindgen::JsCast as _;

        let backend = |msg: &str| MeasurementError::Backend(String::from(msg));
        let window = web_sys::window().ok_or_else(|| backend("missing window"))?;
        let document = window.document().ok_or_else(|| backend("missing document"))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|_| backend("failed to create canvas"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| backend("canvas element has an unexpected type"))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| backend("failed to get 2d context"))?
            .ok_or_else(|| backend("missing 2d context"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .map_err(|_| backend("2d context has an unexpected type"))?;
        Ok(Self { ctx })
    }

    /// Creates a web measurer that uses an existing canvas 2D context.
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn from_canvas_context(ctx: web_sys::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Creates a non-web measurer that always falls back to heuristics.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }
}

impl TextMeasurer for WebTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, MeasurementError> {
        #[cfg(target_arch = "wasm32")]
        {
            if !style.font_size.is_finite() || style.font_size < 0.0 {
                return Err(MeasurementError::InvalidFontSize(style.font_size));
            }
            self.ctx.set_font(&Self::css_font(style));
            let metrics = self
                .ctx
                .measure_text(text)
                .map_err(|_| MeasurementError::UnsupportedFont(Self::css_font(style)))?;

            // The bounding box fields may be 0 in older engines. Treat zeros as unknown.
            let ascent = metrics.actual_bounding_box_ascent();
            let descent = metrics.actual_bounding_box_descent();
            let ascent = if ascent > 0.0 {
                ascent
            } else {
                0.8 * style.font_size
            };
            let descent = if descent > 0.0 {
                descent
            } else {
                0.2 * style.font_size
            };

            Ok(TextMetrics {
                advance_width: metrics.width(),
                ascent,
                descent,
                leading: 0.0,
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        HeuristicTextMeasurer.measure(text, style)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    extern crate std;

    use keyline_text::WrapBudget;

    use super::*;

    #[test]
    fn native_fallback_matches_heuristic() {
        let web = WebTextMeasurer::new();
        let style = TextStyle::new(10.0);
        assert_eq!(
            web.measure("abc", &style).unwrap(),
            HeuristicTextMeasurer.measure("abc", &style).unwrap()
        );
        let wrapped = web
            .wrap("abc def", &style, WrapBudget::new(Some(20.0), None))
            .unwrap();
        assert_eq!(wrapped.line_count(), 2);
    }
}
