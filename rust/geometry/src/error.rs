// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::csg::CsgOp;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building solids
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Fewer than 4 distinct points, or all points collinear/coplanar
    #[error("Degenerate hull: {0}")]
    DegenerateHull(String),

    /// A boolean step produced an empty, open or otherwise unusable solid
    #[error("Degenerate result for `{part}` at step {step} ({op} of {operands:?}): {reason}")]
    DegenerateResult {
        part: String,
        step: usize,
        op: CsgOp,
        operands: Vec<String>,
        reason: String,
    },

    /// Split sub-part volumes do not add up to the original
    #[error(
        "Split imbalance for `{part}`: sub-parts sum to {actual:.6} but the original is {expected:.6}"
    )]
    SplitImbalance {
        part: String,
        expected: f64,
        actual: f64,
    },

    #[error("Kernel failure: {0}")]
    Kernel(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),

    /// Dimension, fit or configuration error from the core crate
    #[error(transparent)]
    Core(#[from] printforge_core::Error),
}

impl Error {
    /// Shorthand for a core `InvalidDimension`
    pub fn invalid_dimension(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Core(printforge_core::Error::invalid_dimension(name, reason))
    }

    pub fn is_invalid_dimension(&self) -> bool {
        matches!(
            self,
            Error::Core(printforge_core::Error::InvalidDimension { .. })
        )
    }
}

/// Reject non-finite or non-positive sizes
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid_dimension(
            name,
            format!("must be a finite, positive size, got {}", value),
        ))
    }
}
