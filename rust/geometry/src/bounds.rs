// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounds
//!
//! Used by the combinator to short-circuit no-op differences and disjoint
//! intersections, and by the splitter to plan slabs.

use nalgebra::{Point3, Vector3};
use printforge_core::Axis;

/// Axis-aligned bounding box in f64 precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create bounds from two corners
    #[inline]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Bounds initialized to an invalid (inverted) state
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// Smallest box containing every point
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand(p);
        }
        bounds
    }

    /// Check if at least one point was added
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, p: &Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Union of two boxes
    pub fn merged(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.expand(&other.min);
        out.expand(&other.max);
        out
    }

    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        if self.is_valid() {
            self.max - self.min
        } else {
            Vector3::zeros()
        }
    }

    /// Extent along one axis
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        self.size()[axis.index()]
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Lower and upper coordinate along one axis
    #[inline]
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        (self.min[axis.index()], self.max[axis.index()])
    }

    /// Whether the interiors overlap by more than `eps` on every axis.
    ///
    /// Boxes that only touch on a face, edge or corner do not overlap.
    pub fn overlaps(&self, other: &Aabb, eps: f64) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        Axis::ALL.iter().all(|&axis| {
            let i = axis.index();
            self.min[i] + eps < other.max[i] && other.min[i] + eps < self.max[i]
        })
    }

    /// Copy grown by `margin` on every side
    pub fn inflated(&self, margin: f64) -> Aabb {
        let m = Vector3::new(margin, margin, margin);
        Aabb::new(self.min - m, self.max + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(offset: f64) -> Aabb {
        Aabb::new(
            Point3::new(offset, 0.0, 0.0),
            Point3::new(offset + 1.0, 1.0, 1.0),
        )
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Aabb::empty();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.size(), Vector3::zeros());
    }

    #[test]
    fn test_from_points() {
        let points = [Point3::new(1.0, -2.0, 3.0), Point3::new(-1.0, 4.0, 0.0)];
        let bounds = Aabb::from_points(&points);
        assert_eq!(bounds.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.extent(Axis::Y), 6.0);
        assert_eq!(bounds.range(Axis::Z), (0.0, 3.0));
    }

    #[test]
    fn test_touching_is_not_overlap() {
        assert!(unit_box(0.0).overlaps(&unit_box(0.5), 1e-9));
        assert!(!unit_box(0.0).overlaps(&unit_box(1.0), 1e-9));
        assert!(!unit_box(0.0).overlaps(&unit_box(2.0), 1e-9));
    }
}
