// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation and formatting helpers.
//!
//! Time is modeled as a numeric value in **seconds**. Ticks snap to
//! second/minute/hour steps and labels read `5`, `1:05` or `2:03:00`.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::scale::ticks_in_domain;

/// Candidate steps in seconds, spanning seconds/minutes/hours.
const STEPS: &[f64] = &[
    1.0,
    2.0,
    5.0,
    10.0,
    15.0,
    30.0,
    60.0,
    2.0 * 60.0,
    5.0 * 60.0,
    10.0 * 60.0,
    15.0 * 60.0,
    30.0 * 60.0,
    60.0 * 60.0,
    2.0 * 60.0 * 60.0,
    3.0 * 60.0 * 60.0,
    6.0 * 60.0 * 60.0,
    12.0 * 60.0 * 60.0,
];

/// Returns tick values inside a time domain expressed in seconds, ordered from `d0`.
pub fn nice_time_ticks_seconds(d0: f64, d1: f64, count: usize) -> Vec<f64> {
    if count == 0 || !d0.is_finite() || !d1.is_finite() {
        return Vec::new();
    }
    if d0 == d1 {
        return alloc::vec![d0];
    }
    let step = nice_time_step_seconds((d1 - d0).abs() / count as f64);
    ticks_in_domain(d0, d1, step)
}

fn nice_time_step_seconds(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    if let Some(&s) = STEPS.iter().find(|&&s| s >= step) {
        return s;
    }
    // Past twelve hours: whole hours.
    (step / 3600.0).ceil().max(1.0) * 3600.0
}

/// Formats a tick value (seconds) given the tick step (seconds).
pub fn format_time_seconds(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return alloc::format!("{v}");
    }

    let sign = if v < 0.0 { "-" } else { "" };
    let secs = {
        let secs_f = v.abs().round().clamp(0.0, i64::MAX as f64);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
        {
            secs_f as i64
        }
    };
    let step = step.abs();

    let h = secs / 3600;
    let m = (secs / 60) % 60;
    let s = secs % 60;

    if step >= 3600.0 || h > 0 {
        alloc::format!("{sign}{h}:{m:02}:{s:02}")
    } else if step >= 60.0 || m > 0 {
        alloc::format!("{sign}{m}:{s:02}")
    } else {
        alloc::format!("{sign}{s}")
    }
}
