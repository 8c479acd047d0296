// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend configuration.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::time::Duration;

use keyline_text::FontFamily;
use kurbo::Size;
use peniko::Brush;
use peniko::color::palette::css;

use crate::accessor::Accessor;
use crate::error::ConfigurationError;
use crate::format::format_tick_with_step;
use crate::orient::{Align, Orient};
use crate::scale::{ScaleKind, ScaleOptions};
use crate::time::format_time_seconds;

/// Paints used when drawing a legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendStyle {
    /// Paint for the bar and tick lines.
    pub stroke: Brush,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            stroke: Brush::Solid(css::BLACK),
            label_fill: Brush::Solid(css::BLACK),
        }
    }
}

/// A scale legend specification.
///
/// Specs are immutable values built with `with_*` methods; layout is computed
/// from a spec by [`LegendSpec::layout`](crate::LegendSpec::layout).
#[derive(Clone)]
pub struct LegendSpec {
    /// Which side of the bar ticks and labels sit on.
    pub orient: Orient,
    /// Domain `(d0, d1)`; `d0` maps to the range start. May be descending.
    pub domain: (f64, f64),
    /// Scale kind name, resolved by a [`ScaleProvider`](crate::ScaleProvider).
    pub scale: String,
    /// Kind-specific scale parameters.
    pub scale_options: ScaleOptions,
    /// Explicit tick values. `None` uses the scale's tick generator.
    pub ticks: Option<Vec<f64>>,
    /// Tick count hint. `None` derives it from the available width.
    pub tick_count: Option<usize>,
    /// Tick line length.
    pub tick_size: f64,
    /// Padding around the range and between ticks and labels.
    pub padding: f64,
    /// Bar and tick stroke width; also inflates the clip rectangle.
    pub stroke_width: f64,
    /// Container size.
    pub size: Size,
    /// Placement along the container's secondary extent.
    pub align: Align,
    /// Label font family, per tick.
    pub font_family: Accessor<FontFamily>,
    /// Label font size, per tick.
    pub font_size: Accessor<f64>,
    /// Optional tick label formatter `(value, step) -> text`.
    pub tick_formatter: Option<Arc<dyn Fn(f64, f64) -> String>>,
    /// Transition duration for renderers.
    pub duration: Duration,
    /// Paints.
    pub style: LegendStyle,
}

impl core::fmt::Debug for LegendSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LegendSpec")
            .field("orient", &self.orient)
            .field("domain", &self.domain)
            .field("scale", &self.scale)
            .field("scale_options", &self.scale_options)
            .field("ticks", &self.ticks)
            .field("tick_count", &self.tick_count)
            .field("tick_size", &self.tick_size)
            .field("padding", &self.padding)
            .field("stroke_width", &self.stroke_width)
            .field("size", &self.size)
            .field("align", &self.align)
            .field("font_family", &self.font_family)
            .field("font_size", &self.font_size)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .field("duration", &self.duration)
            .field("style", &self.style)
            .finish()
    }
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl LegendSpec {
    /// Creates a legend spec with defaults:
    /// - bottom orientation over a linear `[0, 10]` domain,
    /// - `tick_size = 5`, `padding = 5`, `stroke_width = 1`,
    /// - a `400 x 100` container, centered,
    /// - 10px sans-serif labels and a 600ms transition.
    pub fn new() -> Self {
        Self {
            orient: Orient::Bottom,
            domain: (0.0, 10.0),
            scale: String::from(ScaleKind::Linear.name()),
            scale_options: ScaleOptions::default(),
            ticks: None,
            tick_count: None,
            tick_size: 5.0,
            padding: 5.0,
            stroke_width: 1.0,
            size: Size::new(400.0, 100.0),
            align: Align::Center,
            font_family: Accessor::Const(FontFamily::SansSerif),
            font_size: Accessor::Const(10.0),
            tick_formatter: None,
            duration: Duration::from_millis(600),
            style: LegendStyle::default(),
        }
    }

    /// Set the orientation.
    pub fn with_orient(mut self, orient: Orient) -> Self {
        self.orient = orient;
        self
    }

    /// Set the domain.
    pub fn with_domain(mut self, d0: f64, d1: f64) -> Self {
        self.domain = (d0, d1);
        self
    }

    /// Set the domain from an untyped list, which must hold exactly two values.
    pub fn try_with_domain(self, values: &[f64]) -> Result<Self, ConfigurationError> {
        match *values {
            [d0, d1] => Ok(self.with_domain(d0, d1)),
            _ => Err(ConfigurationError::MissingDomain { len: values.len() }),
        }
    }

    /// Set the scale kind by name (`linear`, `log`, `sqrt`, `pow`, `symlog`, `time`).
    pub fn with_scale(mut self, name: impl Into<String>) -> Self {
        self.scale = name.into();
        self
    }

    /// Set the log base used by `log` scales.
    pub fn with_log_base(mut self, base: f64) -> Self {
        self.scale_options.log_base = base;
        self
    }

    /// Set the exponent used by `pow` scales.
    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.scale_options.exponent = exponent;
        self
    }

    /// Set the linear-region constant used by `symlog` scales.
    pub fn with_symlog_constant(mut self, constant: f64) -> Self {
        self.scale_options.symlog_constant = constant;
        self
    }

    /// Use explicit tick values instead of generated ones.
    pub fn with_ticks(mut self, ticks: impl IntoIterator<Item = f64>) -> Self {
        self.ticks = Some(ticks.into_iter().collect());
        self
    }

    /// Set the tick count hint for generated ticks.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = Some(tick_count);
        self
    }

    /// Set tick size.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Set padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the stroke width.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Set the container size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set the alignment within the container.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the label font family (constant or per tick).
    pub fn with_font_family(mut self, family: impl Into<Accessor<FontFamily>>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the label font size (constant or per tick).
    pub fn with_font_size(mut self, size: impl Into<Accessor<f64>>) -> Self {
        self.font_size = size.into();
        self
    }

    /// Set a custom tick label formatter.
    ///
    /// The second argument is the smallest tick step (0 for a single tick).
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Set the transition duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the paints.
    pub fn with_style(mut self, style: LegendStyle) -> Self {
        self.style = style;
        self
    }

    /// Checks the numeric settings that layout relies on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let (d0, d1) = self.domain;
        if !d0.is_finite() || !d1.is_finite() {
            return Err(ConfigurationError::NonFiniteDomain { d0, d1 });
        }
        for (name, value) in [
            ("width", self.size.width),
            ("height", self.size.height),
            ("tick_size", self.tick_size),
            ("padding", self.padding),
            ("stroke_width", self.stroke_width),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteDimension { name, value });
            }
        }
        Ok(())
    }

    pub(crate) fn format_tick(&self, v: f64, step: f64) -> String {
        match &self.tick_formatter {
            Some(f) => (f)(v, step),
            None if self.scale.trim().eq_ignore_ascii_case(ScaleKind::Time.name()) => {
                format_time_seconds(v, step)
            }
            None => format_tick_with_step(v, step),
        }
    }
}
