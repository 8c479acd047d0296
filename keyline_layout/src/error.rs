// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout errors.

use alloc::string::String;

pub use keyline_text::MeasurementError;

/// Invalid legend configuration, reported before any text is measured.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// The scale kind name is not supported by the scale provider.
    #[error("unknown scale kind `{0}`")]
    UnknownScaleKind(String),
    /// An untyped domain did not contain exactly two values.
    #[error("domain needs exactly two values, got {len}")]
    MissingDomain {
        /// Number of values supplied.
        len: usize,
    },
    /// A domain endpoint is NaN or infinite.
    #[error("domain [{d0}, {d1}] is not finite")]
    NonFiniteDomain {
        /// Domain start.
        d0: f64,
        /// Domain end.
        d1: f64,
    },
    /// The domain is finite but unusable for the chosen scale kind.
    #[error("domain is invalid for a {kind} scale: {reason}")]
    InvalidDomain {
        /// Scale kind name.
        kind: &'static str,
        /// Why the domain was rejected.
        reason: &'static str,
    },
    /// An explicit tick value is NaN or infinite.
    #[error("tick {index} is not finite: {value}")]
    NonFiniteTick {
        /// Position in the explicit tick list.
        index: usize,
        /// The rejected value.
        value: f64,
    },
    /// An explicit tick value lies outside the scale's valid input (e.g. zero on a log scale).
    #[error("tick {index} ({value}) cannot be mapped by a {kind} scale")]
    InvalidTick {
        /// Scale kind name.
        kind: &'static str,
        /// Position in the explicit tick list.
        index: usize,
        /// The rejected value.
        value: f64,
    },
    /// A size, padding, or stroke setting is NaN or infinite.
    #[error("`{name}` must be finite, got {value}")]
    NonFiniteDimension {
        /// Setting name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Any failure of a layout pass.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The configuration was rejected.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The text measurer failed; propagated unchanged.
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}
