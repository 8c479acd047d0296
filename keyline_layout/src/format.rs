// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default numeric tick label formatting.

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const MAX_DECIMALS: i32 = 12;

/// Formats `v` with just enough decimals to distinguish ticks spaced `step` apart.
///
/// `step = 0` (a single tick) formats with the decimals `v` itself needs.
/// Very large or very small magnitudes use exponent notation.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = v.abs();
    if magnitude >= 1.0e21 || (magnitude != 0.0 && magnitude < 1.0e-12) {
        return format!("{v:e}");
    }
    let reference = if step.is_finite() && step > 0.0 {
        step
    } else {
        v
    };
    let decimals = decimals_for(reference);
    let s = format!("{v:.decimals$}");
    // Avoid "-0" / "-0.00" for values that round to zero.
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        return String::from(&s[1..]);
    }
    s
}

/// Smallest number of decimals that represents `x` exactly (within rounding noise).
fn decimals_for(x: f64) -> usize {
    let x = x.abs();
    let d = (0..MAX_DECIMALS)
        .find(|&d| {
            let scaled = x * 10_f64.powi(d);
            (scaled - scaled.round()).abs() <= 1.0e-6 * scaled.max(1.0)
        })
        .unwrap_or(MAX_DECIMALS);
    usize::try_from(d).unwrap_or(0)
}
