// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSG (Constructive Solid Geometry) sequencing
//!
//! [`CsgCombinator`] folds an ordered operand list through the kernel one
//! boolean at a time and validates every intermediate solid, so a failure
//! names the exact step and operands that produced it.

use std::fmt;

use tracing::{debug, trace};

use crate::bounds::Aabb;
use crate::error::{Error, Result};
use crate::kernel::GeometryKernel;
use crate::part::Part;
use crate::placement::Instance;
use crate::solid::Solid;

/// Boolean operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsgOp {
    Union,
    /// First operand is the base, the rest are subtracted in order
    Difference,
    Intersection,
}

impl fmt::Display for CsgOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CsgOp::Union => "union",
            CsgOp::Difference => "difference",
            CsgOp::Intersection => "intersection",
        };
        f.write_str(name)
    }
}

/// Applies boolean sequences and validates each step
pub struct CsgCombinator<'k> {
    kernel: &'k dyn GeometryKernel,
    /// Smallest volume accepted for an intermediate result (mm³)
    pub min_volume: f64,
    /// Bounds overlap below this distance counts as touching
    pub overlap_epsilon: f64,
    /// Relative volume change under which a difference removed nothing
    pub unchanged_tolerance: f64,
}

impl<'k> CsgCombinator<'k> {
    pub const DEFAULT_MIN_VOLUME: f64 = 1e-6;
    pub const DEFAULT_OVERLAP_EPSILON: f64 = 1e-9;
    pub const DEFAULT_UNCHANGED_TOLERANCE: f64 = 1e-9;

    pub fn new(kernel: &'k dyn GeometryKernel) -> Self {
        Self {
            kernel,
            min_volume: Self::DEFAULT_MIN_VOLUME,
            overlap_epsilon: Self::DEFAULT_OVERLAP_EPSILON,
            unchanged_tolerance: Self::DEFAULT_UNCHANGED_TOLERANCE,
        }
    }

    #[inline]
    pub fn kernel(&self) -> &'k dyn GeometryKernel {
        self.kernel
    }

    /// Combine placed operands into a named part
    pub fn combine(&self, name: &str, op: CsgOp, operands: &[Instance]) -> Result<Part> {
        self.combine_from(name, op, operands, 0)
    }

    /// Same as [`combine`](Self::combine) with step numbers starting at
    /// `first_step`, for bodies built over several nodes
    pub(crate) fn combine_from(
        &self,
        name: &str,
        op: CsgOp,
        operands: &[Instance],
        first_step: usize,
    ) -> Result<Part> {
        let names = |upto: usize| -> Vec<String> {
            operands[..=upto.min(operands.len().saturating_sub(1))]
                .iter()
                .map(|o| o.name().to_string())
                .collect()
        };
        let degenerate = |step: usize, upto: usize, reason: String| Error::DegenerateResult {
            part: name.to_string(),
            step: first_step + step,
            op,
            operands: names(upto),
            reason,
        };

        let Some((base, rest)) = operands.split_first() else {
            return Err(Error::DegenerateResult {
                part: name.to_string(),
                step: first_step,
                op,
                operands: Vec::new(),
                reason: "empty operand list".into(),
            });
        };

        let mut acc: Solid = base.world().clone();
        let mut volume = self
            .validate(&acc)
            .map_err(|reason| degenerate(0, 0, reason))?;
        let mut acc_bounds: Aabb = self.kernel.bounds(&acc);

        for (i, operand) in rest.iter().enumerate() {
            let step = i + 1;
            let operand_bounds = self.kernel.bounds(operand.world());
            let overlapping = acc_bounds.overlaps(&operand_bounds, self.overlap_epsilon);

            match op {
                CsgOp::Difference if !overlapping => {
                    debug!(
                        part = name,
                        step = first_step + step,
                        operand = operand.name(),
                        "Skipping subtrahend outside the base bounds"
                    );
                    continue;
                }
                CsgOp::Intersection if !overlapping => {
                    return Err(degenerate(
                        step,
                        step,
                        "operand bounds are disjoint from the accumulated result".into(),
                    ));
                }
                _ => {}
            }

            let result = self
                .kernel
                .boolean(op, &acc, operand.world())
                .map_err(|e| degenerate(step, step, e.to_string()))?;

            // Subtrahend inside a cavity or opening: bounds overlap, material does not
            let removed = volume - self.kernel.volume(&result);
            if op == CsgOp::Difference && removed.abs() <= self.unchanged_tolerance * volume {
                debug!(
                    part = name,
                    step = first_step + step,
                    operand = operand.name(),
                    "Skipping subtrahend that removes no material"
                );
                continue;
            }

            volume = self
                .validate(&result)
                .map_err(|reason| degenerate(step, step, reason))?;
            acc = result;
            acc_bounds = self.kernel.bounds(&acc);

            trace!(
                part = name,
                step = first_step + step,
                op = %op,
                operand = operand.name(),
                volume,
                faces = acc.face_count(),
                "CSG step"
            );
        }

        Ok(Part::new(name, acc, volume))
    }

    /// Volume and closure check, returning the volume or a reason
    fn validate(&self, solid: &Solid) -> std::result::Result<f64, String> {
        if solid.is_empty() {
            return Err("result is empty".into());
        }
        let volume = self.kernel.volume(solid);
        if !volume.is_finite() || volume <= self.min_volume {
            return Err(format!(
                "volume {:.3e} is not above {:.3e}",
                volume, self.min_volume
            ));
        }
        if self.kernel.is_watertight(solid) == Some(false) {
            return Err("boundary is not closed".into());
        }
        Ok(volume)
    }
}
