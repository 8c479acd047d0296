// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick style values.

use alloc::sync::Arc;

/// A style value that is either constant or computed per tick.
///
/// Per-datum closures receive the tick value and its index in the tick set.
#[derive(Clone)]
pub enum Accessor<T> {
    /// The same value for every tick.
    Const(T),
    /// A value computed from `(tick value, tick index)`.
    PerDatum(Arc<dyn Fn(f64, usize) -> T>),
}

impl<T: Clone> Accessor<T> {
    /// Wraps a per-tick closure.
    pub fn per_datum(f: impl Fn(f64, usize) -> T + 'static) -> Self {
        Self::PerDatum(Arc::new(f))
    }

    /// Resolves the value for one tick.
    pub fn get(&self, value: f64, index: usize) -> T {
        match self {
            Self::Const(v) => v.clone(),
            Self::PerDatum(f) => f(value, index),
        }
    }
}

impl<T> From<T> for Accessor<T> {
    fn from(value: T) -> Self {
        Self::Const(value)
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Const(v) => f.debug_tuple("Const").field(v).finish(),
            Self::PerDatum(_) => f.write_str("PerDatum(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn const_and_per_datum_resolve() {
        let c: Accessor<f64> = 12.0.into();
        assert_eq!(c.get(3.0, 7), 12.0);
        let p = Accessor::per_datum(|v, i| v + i as f64);
        assert_eq!(p.get(3.0, 2), 5.0);
    }
}
