// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive factory
//!
//! Canonical shapes requested from the kernel. Boxes and hulls come back
//! unplaced. Cylinders are built along Z and turned onto the requested
//! axis by a rotation that becomes part of the instance transform, so
//! later placements compose on top of it.

use nalgebra::{Point3, Vector3};
use printforge_core::{Axis, Extent3};

use crate::error::Result;
use crate::kernel::GeometryKernel;
use crate::placement::{place, Instance, ShapeKind, Transform};

/// Creates named primitive instances through a kernel
#[derive(Clone, Copy)]
pub struct PrimitiveFactory<'k> {
    kernel: &'k dyn GeometryKernel,
}

impl<'k> PrimitiveFactory<'k> {
    pub fn new(kernel: &'k dyn GeometryKernel) -> Self {
        Self { kernel }
    }

    #[inline]
    pub fn kernel(&self) -> &'k dyn GeometryKernel {
        self.kernel
    }

    /// Box of `size` centred on the origin
    pub fn make_box(&self, name: &str, size: Extent3) -> Result<Instance> {
        let solid = self.kernel.cuboid(Vector3::new(size.x, size.y, size.z))?;
        Ok(Instance::new(name, ShapeKind::Cuboid, solid))
    }

    /// Cylinder centred on the origin, its length running along `axis`
    pub fn make_cylinder(&self, name: &str, radius: f64, height: f64, axis: Axis) -> Result<Instance> {
        let solid = self.kernel.cylinder(radius, height)?;
        Ok(Instance::oriented(
            self.kernel,
            name,
            ShapeKind::Cylinder,
            solid,
            axis_orientation(axis),
        ))
    }

    /// Convex hull of a point set, in the frame the points are given in
    pub fn make_hull(&self, name: &str, points: &[Point3<f64>]) -> Result<Instance> {
        let solid = self.kernel.convex_hull(points)?;
        Ok(Instance::new(name, ShapeKind::Hull, solid))
    }

    /// See [`place`]
    #[inline]
    pub fn place(&self, instance: &Instance, t: &Transform) -> Instance {
        place(self.kernel, instance, t)
    }
}

/// Rotation taking +Z onto the given axis
pub fn axis_orientation(axis: Axis) -> Transform {
    match axis {
        Axis::X => Transform::rotation(Axis::Y, 90.0),
        Axis::Y => Transform::rotation(Axis::X, -90.0),
        Axis::Z => Transform::identity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CsgrsKernel;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_orientation_maps_z() {
        let tip = Point3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(
            axis_orientation(Axis::X).apply(&tip),
            Point3::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            axis_orientation(Axis::Y).apply(&tip),
            Point3::new(0.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cylinder_along_x() {
        let kernel = CsgrsKernel::default();
        let factory = PrimitiveFactory::new(&kernel);
        let pin = factory.make_cylinder("pin", 1.0, 10.0, Axis::X).unwrap();
        let bounds = pin.bounds();
        assert_relative_eq!(bounds.extent(Axis::X), 10.0, epsilon = 1e-9);
        assert!(bounds.extent(Axis::Y) <= 2.0 + 1e-9);
        assert!(!pin.transform().is_identity(1e-12));
    }

    #[test]
    fn test_placing_oriented_cylinder_composes() {
        let kernel = CsgrsKernel::default();
        let factory = PrimitiveFactory::new(&kernel);
        let pin = factory.make_cylinder("pin", 1.0, 10.0, Axis::Y).unwrap();
        let moved = factory.place(&pin, &Transform::translation(0.0, 0.0, 5.0));
        let bounds = moved.bounds();
        // Still along Y after the translation
        assert_relative_eq!(bounds.extent(Axis::Y), 10.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.center().z, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_sizes() {
        let kernel = CsgrsKernel::default();
        let factory = PrimitiveFactory::new(&kernel);
        assert!(factory
            .make_box("b", Extent3::new(1.0, -1.0, 1.0))
            .unwrap_err()
            .is_invalid_dimension());
        assert!(factory
            .make_cylinder("c", 0.0, 1.0, Axis::Z)
            .unwrap_err()
            .is_invalid_dimension());
    }
}
