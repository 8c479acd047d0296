// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable primitive identities and paint order.

/// Identity of a retained primitive.
///
/// Ticks and labels are keyed by their domain value, so a tick that survives
/// a re-layout is updated in place rather than replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveId {
    /// The clip rectangle around bar and ticks.
    Clip,
    /// The bar.
    Bar,
    /// A tick line, keyed by value bits.
    Tick(u64),
    /// A tick label, keyed by value bits.
    Label(u64),
}

impl PrimitiveId {
    /// The tick line for `value`.
    pub fn tick(value: f64) -> Self {
        Self::Tick(value_key(value))
    }

    /// The label for `value`.
    pub fn label(value: f64) -> Self {
        Self::Label(value_key(value))
    }

    /// The domain value of a tick or label id.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Tick(bits) | Self::Label(bits) => Some(f64::from_bits(bits)),
            Self::Clip | Self::Bar => None,
        }
    }

    /// Paint order; ties break on the id itself.
    pub fn z_index(self) -> i32 {
        match self {
            Self::Clip => z_order::CLIP,
            Self::Bar => z_order::BAR,
            Self::Tick(_) => z_order::TICKS,
            Self::Label(_) => z_order::LABELS,
        }
    }
}

/// `-0.0` and `0.0` share a key.
fn value_key(value: f64) -> u64 {
    if value == 0.0 { 0.0_f64.to_bits() } else { value.to_bits() }
}

/// Paint order conventions.
///
/// Renderers sort by `(z_index, PrimitiveId)` for a deterministic tie-break.
pub mod z_order {
    /// Clip definitions.
    pub const CLIP: i32 = -10;
    /// The bar.
    pub const BAR: i32 = 0;
    /// Tick lines.
    pub const TICKS: i32 = 10;
    /// Tick labels.
    pub const LABELS: i32 = 20;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero_shares_a_key() {
        assert_eq!(PrimitiveId::tick(-0.0), PrimitiveId::tick(0.0));
        assert_eq!(PrimitiveId::label(2.5).value(), Some(2.5));
        assert_eq!(PrimitiveId::Bar.value(), None);
    }

    #[test]
    fn labels_paint_above_ticks() {
        assert!(PrimitiveId::label(0.0).z_index() > PrimitiveId::tick(0.0).z_index());
        assert!(PrimitiveId::tick(0.0).z_index() > PrimitiveId::Bar.z_index());
    }
}
