// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained, animated rendering of legend layouts.
//!
//! [`SvgRenderer`] keeps one retained [`Primitive`] per [`PrimitiveId`]: the clip
//! rectangle, the bar, and a line and label per tick value. Each
//! [`Renderer::render`] call diffs the new layout against what is displayed:
//! - new ticks enter from where the previous scale would have put them, fading in,
//! - surviving ticks move from their displayed position to the new one,
//! - removed ticks slide to their position under the new scale while fading out,
//!   and are dropped when the transition ends.
//!
//! Time is explicit: the caller passes `now` to `render` and `advance`.
//!
//! ```
//! use std::time::Duration;
//!
//! use keyline_layout::LegendSpec;
//! use keyline_render::{Renderer, SvgRenderer};
//! use keyline_text::HeuristicTextMeasurer;
//!
//! let spec = LegendSpec::new().with_duration(Duration::ZERO);
//! let layout = spec.layout(&HeuristicTextMeasurer, None).unwrap();
//! let mut renderer = SvgRenderer::new();
//! renderer.render(&layout, &spec.style, Duration::ZERO, None);
//! assert!(renderer.to_svg_string().contains("<line"));
//! ```

mod id;
mod primitive;
mod renderer;
mod svg;

pub use id::{PrimitiveId, z_order};
pub use primitive::{LinePrimitive, Primitive, TextPrimitive};
pub use renderer::{CompletionCallback, Phase, Renderer, SvgRenderer};
