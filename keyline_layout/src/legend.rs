// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A legend that remembers its last layout.

use keyline_text::TextMeasurer;

use crate::error::LayoutError;
use crate::layout::{LegendLayout, OuterBounds};
use crate::scale::{BuiltinScales, ScaleProvider};
use crate::spec::LegendSpec;

/// A spec paired with its most recent layout.
///
/// Each [`Legend::update`] lays the current spec out with the previous
/// layout threaded in, so renderers can transition from the old scale.
/// A failed update leaves the previous layout in place.
#[derive(Clone, Debug, Default)]
pub struct Legend {
    spec: LegendSpec,
    layout: Option<LegendLayout>,
}

impl Legend {
    /// Creates a legend that has not been laid out yet.
    pub fn new(spec: LegendSpec) -> Self {
        Self { spec, layout: None }
    }

    /// The current spec.
    pub fn spec(&self) -> &LegendSpec {
        &self.spec
    }

    /// Replaces the spec; takes effect on the next update.
    pub fn set_spec(&mut self, spec: LegendSpec) {
        self.spec = spec;
    }

    /// The last successful layout, if any.
    pub fn layout(&self) -> Option<&LegendLayout> {
        self.layout.as_ref()
    }

    /// Outer bounds of the last layout; zeroed before the first update.
    pub fn outer_bounds(&self) -> OuterBounds {
        self.layout
            .as_ref()
            .map(LegendLayout::outer_bounds)
            .unwrap_or_default()
    }

    /// Lays the spec out with the built-in scales.
    pub fn update(&mut self, measurer: &dyn TextMeasurer) -> Result<&LegendLayout, LayoutError> {
        self.update_with(&BuiltinScales, measurer)
    }

    /// Lays the spec out, resolving the scale kind through `scales`.
    pub fn update_with(
        &mut self,
        scales: &dyn ScaleProvider,
        measurer: &dyn TextMeasurer,
    ) -> Result<&LegendLayout, LayoutError> {
        let next = self
            .spec
            .layout_with(scales, measurer, self.layout.as_ref())?;
        Ok(self.layout.insert(next))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use keyline_text::HeuristicTextMeasurer;

    use super::*;

    #[test]
    fn bounds_are_zero_before_first_update() {
        let legend = Legend::new(LegendSpec::new());
        assert_eq!(legend.outer_bounds(), OuterBounds::default());
        assert!(legend.layout().is_none());
    }

    #[test]
    fn updates_thread_the_previous_scale() {
        let mut legend = Legend::new(LegendSpec::new());
        let first = legend.update(&HeuristicTextMeasurer).unwrap().scale;
        legend.set_spec(LegendSpec::new().with_domain(0.0, 50.0));
        let second = legend.update(&HeuristicTextMeasurer).unwrap();
        assert_eq!(second.previous_scale, Some(first));
        assert!(legend.outer_bounds().width > 0.0);
    }

    #[test]
    fn failed_update_keeps_last_layout() {
        let mut legend = Legend::new(LegendSpec::new());
        legend.update(&HeuristicTextMeasurer).unwrap();
        let before = legend.layout().cloned();
        legend.set_spec(LegendSpec::new().with_scale("bogus"));
        assert!(legend.update(&HeuristicTextMeasurer).is_err());
        assert_eq!(legend.layout().cloned(), before);
    }
}
