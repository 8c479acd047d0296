// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Continuous scales for legend layout.
//!
//! A legend maps a numeric domain onto a pixel range. Every scale here is a
//! monotonic transform `t` followed by a linear interpolation of `t(x)` between
//! `t(d0)` and `t(d1)` onto the range, so `d0` always lands on the range start
//! and `d1` on the range end, whichever direction either pair runs in.
//!
//! Scales are selected by name through a [`ScaleProvider`]; the built-in
//! provider is [`BuiltinScales`].

use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::error::ConfigurationError;
use crate::time;

/// Hard cap on generated tick counts.
const MAX_TICKS: f64 = 10_000.0;

/// The supported scale kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    /// `t(x) = x`.
    Linear,
    /// `t(x) = log_b(x)`; the domain must not touch or cross zero.
    Log,
    /// Power scale with exponent `0.5`.
    Sqrt,
    /// `t(x) = sign(x) * |x|^k`.
    Pow,
    /// `t(x) = sign(x) * ln(1 + |x| / c)`.
    Symlog,
    /// Linear over timestamps in seconds, with time-aware ticks and labels.
    Time,
}

impl ScaleKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Linear,
        Self::Log,
        Self::Sqrt,
        Self::Pow,
        Self::Symlog,
        Self::Time,
    ];

    /// Returns the canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
            Self::Pow => "pow",
            Self::Symlog => "symlog",
            Self::Time => "time",
        }
    }

    /// Builds a scale of this kind.
    ///
    /// Fails when the domain is not finite, or (for `log`) when it touches or
    /// spans zero.
    pub fn instantiate(
        self,
        domain: (f64, f64),
        range: (f64, f64),
        options: &ScaleOptions,
    ) -> Result<ScaleContinuous, ConfigurationError> {
        let (d0, d1) = domain;
        if !d0.is_finite() || !d1.is_finite() {
            return Err(ConfigurationError::NonFiniteDomain { d0, d1 });
        }
        Ok(match self {
            Self::Linear => ScaleContinuous::Linear(ScaleLinear::new(domain, range)),
            Self::Log => {
                if d0 == 0.0 || d1 == 0.0 || (d0 < 0.0) != (d1 < 0.0) {
                    return Err(ConfigurationError::InvalidDomain {
                        kind: self.name(),
                        reason: "domain must not include or cross zero",
                    });
                }
                ScaleContinuous::Log(ScaleLog::new(domain, range).with_base(options.log_base))
            }
            Self::Sqrt | Self::Pow => {
                let exponent = if self == Self::Sqrt { 0.5 } else { options.exponent };
                let pow = ScalePow::new(domain, range).with_exponent(exponent);
                if !pow.transform(d0).is_finite() || !pow.transform(d1).is_finite() {
                    return Err(ConfigurationError::InvalidDomain {
                        kind: self.name(),
                        reason: "exponent overflows on the domain",
                    });
                }
                ScaleContinuous::Pow(pow)
            }
            Self::Symlog => ScaleContinuous::Symlog(
                ScaleSymlog::new(domain, range).with_constant(options.symlog_constant),
            ),
            Self::Time => ScaleContinuous::Time(ScaleTime::new(domain, range)),
        })
    }
}

impl FromStr for ScaleKind {
    type Err = ConfigurationError;

    /// Parses a kind name, ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigurationError::UnknownScaleKind(String::from(name)))
    }
}

/// Kind-specific scale parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleOptions {
    /// Log base (default 10). Invalid bases fall back to 10.
    pub log_base: f64,
    /// Exponent for `pow` scales (default 1). Zero or non-finite falls back to 1.
    pub exponent: f64,
    /// Linear-region constant for `symlog` scales (default 1).
    pub symlog_constant: f64,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            log_base: 10.0,
            exponent: 1.0,
            symlog_constant: 1.0,
        }
    }
}

/// Resolves scale kind names into concrete scales.
pub trait ScaleProvider {
    /// Creates the scale named `name` mapping `domain` onto `range`.
    ///
    /// Unknown names yield [`ConfigurationError::UnknownScaleKind`].
    fn scale(
        &self,
        name: &str,
        domain: (f64, f64),
        range: (f64, f64),
        options: &ScaleOptions,
    ) -> Result<ScaleContinuous, ConfigurationError>;
}

/// The built-in scale kinds, resolved by case-insensitive name.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinScales;

impl ScaleProvider for BuiltinScales {
    fn scale(
        &self,
        name: &str,
        domain: (f64, f64),
        range: (f64, f64),
        options: &ScaleOptions,
    ) -> Result<ScaleContinuous, ConfigurationError> {
        name.parse::<ScaleKind>()?.instantiate(domain, range, options)
    }
}

/// A continuous scale instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Log scale.
    Log(ScaleLog),
    /// Power scale (including `sqrt`).
    Pow(ScalePow),
    /// Symmetric log scale.
    Symlog(ScaleSymlog),
    /// Time scale.
    Time(ScaleTime),
}

impl ScaleContinuous {
    /// Returns the kind of this scale.
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Log(_) => ScaleKind::Log,
            Self::Pow(s) if s.exponent == 0.5 => ScaleKind::Sqrt,
            Self::Pow(_) => ScaleKind::Pow,
            Self::Symlog(_) => ScaleKind::Symlog,
            Self::Time(_) => ScaleKind::Time,
        }
    }

    /// Maps a value from domain space into range space.
    ///
    /// Always finite: inputs the transform cannot handle map to the range start.
    pub fn map(&self, x: f64) -> f64 {
        let y = match self {
            Self::Linear(s) => s.map(x),
            Self::Log(s) => s.map(x),
            Self::Pow(s) => s.map(x),
            Self::Symlog(s) => s.map(x),
            Self::Time(s) => s.map(x),
        };
        if y.is_finite() { y } else { self.range().0 }
    }

    /// Returns the domain as authored.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain,
            Self::Log(s) => s.domain,
            Self::Pow(s) => s.domain,
            Self::Symlog(s) => s.domain,
            Self::Time(s) => s.inner.domain,
        }
    }

    /// Returns the output range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range,
            Self::Log(s) => s.range,
            Self::Pow(s) => s.range,
            Self::Symlog(s) => s.range,
            Self::Time(s) => s.inner.range,
        }
    }

    /// Returns the same scale re-targeted to `range`.
    #[must_use]
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        match &mut self {
            Self::Linear(s) => s.range = range,
            Self::Log(s) => s.range = range,
            Self::Pow(s) => s.range = range,
            Self::Symlog(s) => s.range = range,
            Self::Time(s) => s.inner.range = range,
        }
        self
    }

    /// Returns tick values inside the domain, ordered from `d0` towards `d1`.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Log(s) => s.ticks(count),
            Self::Pow(s) => s.ticks(count),
            Self::Symlog(s) => s.ticks(count),
            Self::Time(s) => s.ticks(count),
        }
    }

    /// Whether `x` is a valid input (finite, and on the domain's side of zero for log scales).
    pub fn accepts(&self, x: f64) -> bool {
        match self {
            Self::Log(s) => s.accepts(x),
            _ => x.is_finite(),
        }
    }
}

/// Interpolates transformed value `tx` between `t0` and `t1` onto `range`.
///
/// Differences are taken on halved values so that domains spanning most of
/// the `f64` range do not overflow.
fn interpolate(t0: f64, t1: f64, tx: f64, range: (f64, f64)) -> f64 {
    let (r0, r1) = range;
    let denom = t1 / 2.0 - t0 / 2.0;
    if denom == 0.0 || !denom.is_finite() {
        return r0;
    }
    r0 + (tx / 2.0 - t0 / 2.0) / denom * (r1 - r0)
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        interpolate(self.domain.0, self.domain.1, x, self.range)
    }

    /// Returns “nice” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// A log-scale mapping from a domain strictly on one side of zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
}

impl ScaleLog {
    /// Creates a new base-10 log scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            base: 10.0,
        }
    }

    /// Sets the log base; invalid bases fall back to 10.
    #[must_use]
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    /// Returns the log base.
    pub fn base(&self) -> f64 {
        self.base
    }

    fn negative(&self) -> bool {
        self.domain.0 < 0.0
    }

    fn accepts(&self, x: f64) -> bool {
        x.is_finite() && x != 0.0 && (x < 0.0) == self.negative()
    }

    fn log_base(&self, x: f64) -> f64 {
        let denom = self.base.ln();
        if denom == 0.0 { x.ln() } else { x.ln() / denom }
    }

    fn transform(&self, x: f64) -> f64 {
        if self.negative() {
            -self.log_base(-x)
        } else {
            self.log_base(x)
        }
    }

    /// Maps a value from domain space into range space.
    ///
    /// Values on the wrong side of zero map to the range start.
    pub fn map(&self, x: f64) -> f64 {
        if !self.accepts(x) {
            return self.range.0;
        }
        interpolate(
            self.transform(self.domain.0),
            self.transform(self.domain.1),
            self.transform(x),
            self.range,
        )
    }

    /// Returns powers of the base inside the domain.
    ///
    /// When fewer than two powers fit, falls back to linear ticks on the
    /// domain's side of zero. More than `count` powers are thinned evenly.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        let (d0, d1) = self.domain;
        let sign = if self.negative() { -1.0 } else { 1.0 };
        let (lo, hi) = {
            let (a, b) = (d0.abs(), d1.abs());
            if a <= b { (a, b) } else { (b, a) }
        };
        let e0 = clamp_exponent((self.log_base(lo) - 1.0e-9).ceil());
        let e1 = clamp_exponent((self.log_base(hi) + 1.0e-9).floor());

        let mut out: Vec<f64> = if e0 <= e1 {
            (e0..=e1)
                .map(|e| self.base.powi(e))
                .filter(|v| (lo..=hi).contains(v))
                .map(|v| sign * v)
                .collect()
        } else {
            Vec::new()
        };
        if out.len() < 2 {
            out = nice_ticks(d0, d1, count)
                .into_iter()
                .filter(|&v| self.accepts(v))
                .collect();
            return out;
        }
        out.sort_by(f64::total_cmp);
        if d1 < d0 {
            out.reverse();
        }
        // Thin from the `d0` end so the first tick stays nearest `d0`.
        if out.len() > count {
            let stride = out.len().div_ceil(count);
            out = out.into_iter().step_by(stride).collect();
        }
        out
    }
}

fn clamp_exponent(e: f64) -> i32 {
    let e = if e.is_finite() { e } else { 0.0 };
    #[allow(clippy::cast_possible_truncation, reason = "clamped to a small exponent range")]
    {
        e.clamp(-300.0, 300.0) as i32
    }
}

/// A power-scale mapping `sign(x) * |x|^k`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePow {
    domain: (f64, f64),
    range: (f64, f64),
    exponent: f64,
}

impl ScalePow {
    /// Creates a new power scale with exponent 1.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            exponent: 1.0,
        }
    }

    /// Sets the exponent; zero or non-finite exponents fall back to 1.
    #[must_use]
    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = if exponent.is_finite() && exponent != 0.0 {
            exponent
        } else {
            1.0
        };
        self
    }

    /// Returns the exponent.
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    fn transform(&self, x: f64) -> f64 {
        let y = if self.exponent == 0.5 {
            x.abs().sqrt()
        } else {
            x.abs().powf(self.exponent)
        };
        if x < 0.0 { -y } else { y }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        interpolate(
            self.transform(self.domain.0),
            self.transform(self.domain.1),
            self.transform(x),
            self.range,
        )
    }

    /// Returns “nice” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// A symmetric log scale, linear near zero and logarithmic further out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSymlog {
    domain: (f64, f64),
    range: (f64, f64),
    constant: f64,
}

impl ScaleSymlog {
    /// Creates a new symlog scale with constant 1.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            constant: 1.0,
        }
    }

    /// Sets the linear-region constant; non-positive values fall back to 1.
    #[must_use]
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = if constant.is_finite() && constant > 0.0 {
            constant
        } else {
            1.0
        };
        self
    }

    fn transform(&self, x: f64) -> f64 {
        let y = (1.0 + x.abs() / self.constant).ln();
        if x < 0.0 { -y } else { y }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        interpolate(
            self.transform(self.domain.0),
            self.transform(self.domain.1),
            self.transform(x),
            self.range,
        )
    }

    /// Returns “nice” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// A time scale (a linear scale over timestamps in seconds).
///
/// Ticks snap to second/minute/hour steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp value into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Returns tick values on second/minute/hour boundaries inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        time::nice_time_ticks_seconds(self.inner.domain.0, self.inner.domain.1, count)
    }
}

/// Returns 1/2/5×10ⁿ ticks lying inside `[d0, d1]`, ordered from `d0`.
pub(crate) fn nice_ticks(d0: f64, d1: f64, count: usize) -> Vec<f64> {
    if count == 0 || !d0.is_finite() || !d1.is_finite() {
        return Vec::new();
    }
    if d0 == d1 {
        return alloc::vec![d0];
    }
    // Halved so the span of a near-`f64::MAX` domain stays finite.
    let half_span = (d1 / 2.0 - d0 / 2.0).abs();
    let step = nice_step(half_span / count as f64 * 2.0);
    ticks_in_domain(d0, d1, step)
}

/// Returns the multiples of `step` inside `[d0, d1]`, ordered from `d0`.
///
/// Steps below one are applied as divisions by their reciprocal so that
/// decimal ticks come out as the shortest float (`0.3`, not `0.30000000000000004`).
pub(crate) fn ticks_in_domain(d0: f64, d1: f64, step: f64) -> Vec<f64> {
    let (min, max) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
    if !step.is_finite() || step <= 0.0 {
        return endpoints(d0, d1);
    }

    let divide = step < 1.0;
    let factor = if divide { (1.0 / step).round() } else { step };
    let (i0, i1) = if divide {
        ((min * factor).ceil(), (max * factor).floor())
    } else {
        ((min / factor).ceil(), (max / factor).floor())
    };
    let value = |i: f64| if divide { i / factor } else { i * factor };

    let n = i1 - i0;
    if !n.is_finite() || n < 0.0 {
        return endpoints(d0, d1);
    }
    let n = {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n.min(MAX_TICKS) as u64
        }
    };
    let mut out: Vec<f64> = (0..=n)
        .map(|k| value(i0 + k as f64))
        .filter(|v| (min..=max).contains(v))
        .collect();
    if out.is_empty() {
        return endpoints(d0, d1);
    }
    if d1 < d0 {
        out.reverse();
    }
    out
}

fn endpoints(d0: f64, d1: f64) -> Vec<f64> {
    if d0 == d1 {
        alloc::vec![d0]
    } else {
        alloc::vec![d0, d1]
    }
}

pub(crate) fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Returns the smallest gap between adjacent ticks (0 for fewer than two).
pub(crate) fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}
