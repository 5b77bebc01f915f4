// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for dimension and fit resolution
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before any geometry is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A nominal or derived dimension violates a consistency invariant
    #[error("Invalid dimension `{name}`: {reason}")]
    InvalidDimension { name: String, reason: String },

    /// A mating feature does not engage far enough to be mechanically functional
    #[error(
        "Insufficient engagement for `{feature}`: mating length {available:.3} < required {required:.3}"
    )]
    InsufficientEngagement {
        feature: String,
        required: f64,
        available: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidDimension`]
    pub fn invalid_dimension(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidDimension {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Reject non-finite or non-positive sizes
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::invalid_dimension(name, format!("{} is not finite", value)));
    }
    if value <= 0.0 {
        return Err(Error::invalid_dimension(
            name,
            format!("must be positive, got {}", value),
        ));
    }
    Ok(value)
}

/// Reject non-finite or negative values
pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_dimension(
            name,
            format!("must be a finite, non-negative value, got {}", value),
        ));
    }
    Ok(value)
}
