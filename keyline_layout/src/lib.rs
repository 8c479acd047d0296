// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale legend layout.
//!
//! A scale legend is an axis-like key: a bar spanning a numeric domain, tick
//! lines at chosen values, and a label per tick. This crate computes where all
//! of that goes before anything is drawn:
//! - **Scales** map the domain onto a pixel range ([`ScaleContinuous`]).
//! - **Ticks** come from the scale or an explicit list.
//! - **Labels** are formatted, wrapped and measured through
//!   [`keyline_text::TextMeasurer`], then used to narrow the range so the edge
//!   labels stay inside the container.
//! - **Geometry** (bar, tick lines, clip, label anchors, outer bounds) is
//!   derived for any [`Orient`] from a single role table.
//!
//! Drawing is out of scope; a renderer consumes [`LegendLayout`].
//!
//! ```
//! use keyline_layout::{LegendSpec, Orient};
//! use keyline_text::HeuristicTextMeasurer;
//!
//! let spec = LegendSpec::new()
//!     .with_orient(Orient::Bottom)
//!     .with_domain(0.0, 10.0)
//!     .with_size(400.0, 100.0);
//! let layout = spec.layout(&HeuristicTextMeasurer, None).unwrap();
//! assert_eq!(layout.ticks.len(), 6);
//! assert!(layout.outer.width <= 390.0);
//! ```

#![no_std]

extern crate alloc;

mod accessor;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod layout;
mod legend;
mod orient;
mod scale;
mod spec;
mod time;

pub use accessor::Accessor;
pub use error::{ConfigurationError, LayoutError, MeasurementError};
pub use format::format_tick_with_step;
pub use layout::{LabelLayout, LegendLayout, OuterBounds, TickLayout};
pub use legend::Legend;
pub use orient::{Align, Edge, Orient, Roles, TextAnchor, VerticalAlign};
pub use scale::{
    BuiltinScales, ScaleContinuous, ScaleKind, ScaleLinear, ScaleLog, ScaleOptions, ScalePow,
    ScaleProvider, ScaleSymlog, ScaleTime,
};
pub use spec::{LegendSpec, LegendStyle};
pub use time::{format_time_seconds, nice_time_ticks_seconds};
