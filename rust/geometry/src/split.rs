// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bed-size splitting
//!
//! A part longer than the printable envelope along one axis is cut into
//! slabs. The plan comes from recursive midpoint bisection of the part's
//! bounds; each slab is the intersection of at most two half-space masks,
//! realised as a box that overshoots the part by a margin on every side
//! that is not a cut plane. Slab volumes must add back up to the original.
//!
//! No joints or registration features are added here. Callers that want
//! dowels or tongues add them to the sub-parts afterwards.

use printforge_core::{Axis, Extent3};
use tracing::{debug, info};

use crate::bounds::Aabb;
use crate::csg::{CsgCombinator, CsgOp};
use crate::error::{Error, Result};
use crate::part::Part;
use crate::placement::{place, Instance, ShapeKind, Transform};

/// Which side of a cut plane a mask keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Coordinates below the offset
    Below,
    /// Coordinates above the offset
    Above,
}

/// Half-space `axis < offset` or `axis > offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpaceMask {
    pub axis: Axis,
    pub offset: f64,
    pub keep: Side,
}

/// One slab of a split plan
#[derive(Debug, Clone, PartialEq)]
pub struct Slab {
    /// Lower cut (`Above`), `None` for the first slab
    pub lower: Option<HalfSpaceMask>,
    /// Upper cut (`Below`), `None` for the last slab
    pub upper: Option<HalfSpaceMask>,
    /// Coordinate range of the slab within the part bounds
    pub start: f64,
    pub end: f64,
}

impl Slab {
    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Ordered slabs along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    pub axis: Axis,
    pub slabs: Vec<Slab>,
}

impl SplitPlan {
    /// Bisect `[start, end]` at midpoints until every piece fits `limit`
    pub fn bisect(axis: Axis, start: f64, end: f64, limit: f64) -> Result<SplitPlan> {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(Error::invalid_dimension(
                "split_limit",
                format!("envelope limit must be finite and positive, got {}", limit),
            ));
        }
        if !(start.is_finite() && end.is_finite()) || end < start {
            return Err(Error::invalid_dimension(
                format!("{}_range", axis),
                format!("invalid range [{}, {}]", start, end),
            ));
        }

        let mut cuts = Vec::new();
        bisect_range(start, end, limit, &mut cuts);

        let mut bounds = Vec::with_capacity(cuts.len() + 2);
        bounds.push(start);
        bounds.extend(cuts);
        bounds.push(end);

        let last = bounds.len() - 2;
        let slabs = bounds
            .windows(2)
            .enumerate()
            .map(|(i, w)| Slab {
                lower: (i > 0).then_some(HalfSpaceMask {
                    axis,
                    offset: w[0],
                    keep: Side::Above,
                }),
                upper: (i < last).then_some(HalfSpaceMask {
                    axis,
                    offset: w[1],
                    keep: Side::Below,
                }),
                start: w[0],
                end: w[1],
            })
            .collect();

        Ok(SplitPlan { axis, slabs })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }
}

/// Interior cut offsets in ascending order
fn bisect_range(start: f64, end: f64, limit: f64, cuts: &mut Vec<f64>) {
    if end - start <= limit {
        return;
    }
    let mid = start + (end - start) / 2.0;
    bisect_range(start, mid, limit, cuts);
    cuts.push(mid);
    bisect_range(mid, end, limit, cuts);
}

/// Splits oversized parts into printable sub-parts
pub struct BedSplitter<'c, 'k> {
    combinator: &'c CsgCombinator<'k>,
    /// How far mask boxes overshoot the part on uncut sides
    pub margin: f64,
    /// Relative tolerance on the volume sum
    pub volume_tolerance: f64,
}

impl<'c, 'k> BedSplitter<'c, 'k> {
    pub const DEFAULT_MARGIN: f64 = 10.0;

    pub fn new(combinator: &'c CsgCombinator<'k>, volume_tolerance: f64) -> Self {
        Self {
            combinator,
            margin: Self::DEFAULT_MARGIN,
            volume_tolerance,
        }
    }

    /// Plan for a part, without running any boolean
    pub fn plan(&self, part: &Part, axis: Axis, limit: f64) -> Result<SplitPlan> {
        let (start, end) = part.bounds().range(axis);
        SplitPlan::bisect(axis, start, end, limit)
    }

    /// Split `part` so each sub-part's extent along `axis` is at most `limit`.
    ///
    /// A part that already fits is returned unchanged as the only element.
    pub fn split(&self, part: &Part, axis: Axis, limit: f64) -> Result<Vec<Part>> {
        let plan = self.plan(part, axis, limit)?;
        if plan.len() <= 1 {
            return Ok(vec![part.clone()]);
        }

        info!(
            part = part.name(),
            axis = %axis,
            extent = part.bounds().extent(axis),
            limit,
            pieces = plan.len(),
            "Splitting part to fit the bed"
        );

        let kernel = self.combinator.kernel();
        let source = part.to_instance();
        let bounds = part.bounds();

        let mut pieces = Vec::with_capacity(plan.len());
        for (i, slab) in plan.slabs.iter().enumerate() {
            let name = format!("{}_part{}", part.name(), i + 1);
            let (center, size) = self.mask_box(&bounds, slab, axis);
            let mask = kernel.cuboid(nalgebra::Vector3::new(size.x, size.y, size.z))?;
            let mask = place(
                kernel,
                &Instance::new(format!("{}_mask", name), ShapeKind::Cuboid, mask),
                &Transform::translation_by(center),
            );
            let piece = self
                .combinator
                .combine(&name, CsgOp::Intersection, &[source.clone(), mask])?;
            debug!(
                part = %name,
                start = slab.start,
                end = slab.end,
                volume = piece.volume(),
                "Split slab"
            );
            pieces.push(piece);
        }

        let expected = part.volume();
        let actual: f64 = pieces.iter().map(Part::volume).sum();
        if (actual - expected).abs() > self.volume_tolerance * expected.abs() {
            return Err(Error::SplitImbalance {
                part: part.name().to_string(),
                expected,
                actual,
            });
        }

        Ok(pieces)
    }

    /// Centre and size of the mask box for one slab
    fn mask_box(&self, bounds: &Aabb, slab: &Slab, axis: Axis) -> (Extent3, Extent3) {
        let outer = bounds.inflated(self.margin);
        let lo = slab.lower.map_or(outer.min[axis.index()], |m| m.offset);
        let hi = slab.upper.map_or(outer.max[axis.index()], |m| m.offset);

        let mut center = Extent3::default();
        let mut size = Extent3::default();
        for a in Axis::ALL {
            let (min, max) = if a == axis {
                (lo, hi)
            } else {
                (outer.min[a.index()], outer.max[a.index()])
            };
            center = center.with(a, (min + max) / 2.0);
            size = size.with(a, max - min);
        }
        (center, size)
    }
}
