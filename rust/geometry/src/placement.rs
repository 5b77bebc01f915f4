// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement engine
//!
//! Rigid transforms and placed primitive instances. An [`Instance`] keeps
//! its canonical local solid next to the accumulated transform, so placing
//! it again composes with the prior placement instead of replacing it:
//! `place(place(i, a), b) == place(i, b * a)`.

use std::fmt;
use std::ops::Mul;

use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};
use printforge_core::{Axis, Extent3};

use crate::bounds::Aabb;
use crate::kernel::GeometryKernel;
use crate::solid::Solid;

/// Rigid-body transform: rotation (unit quaternion) followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    iso: Isometry3<f64>,
}

impl Transform {
    #[inline]
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    #[inline]
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity()),
        }
    }

    /// Translation by a size triple interpreted as a vector
    #[inline]
    pub fn translation_by(offset: Extent3) -> Self {
        Self::translation(offset.x, offset.y, offset.z)
    }

    /// Rotation about a principal axis through the origin, in degrees
    pub fn rotation(axis: Axis, degrees: f64) -> Self {
        let unit = match axis {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        };
        Self::from_axis_angle(&unit, degrees.to_radians())
    }

    /// Rotation about an arbitrary axis through the origin, in radians
    pub fn from_axis_angle(axis: &Unit<Vector3<f64>>, radians: f64) -> Self {
        Self {
            iso: Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(axis, radians),
            ),
        }
    }

    #[inline]
    pub fn from_isometry(iso: Isometry3<f64>) -> Self {
        Self { iso }
    }

    #[inline]
    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }

    /// `self` followed by `outer`, i.e. `outer ∘ self`
    #[inline]
    pub fn then(&self, outer: &Transform) -> Transform {
        Transform {
            iso: outer.iso * self.iso,
        }
    }

    #[inline]
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        self.iso * p
    }

    pub fn inverse(&self) -> Transform {
        Transform {
            iso: self.iso.inverse(),
        }
    }

    pub fn is_identity(&self, eps: f64) -> bool {
        self.iso.translation.vector.norm() <= eps && self.iso.rotation.angle() <= eps
    }

    /// Translation part
    #[inline]
    pub fn offset(&self) -> Vector3<f64> {
        self.iso.translation.vector
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// `a * b` applies `b` first, then `a`
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            iso: self.iso * rhs.iso,
        }
    }
}

/// Canonical shape family of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Cuboid,
    Cylinder,
    Hull,
    /// Result of a boolean body reused as an operand
    Body,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Cuboid => "cuboid",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Hull => "hull",
            ShapeKind::Body => "body",
        };
        f.write_str(name)
    }
}

/// Named solid with its accumulated placement
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    kind: ShapeKind,
    local: Solid,
    transform: Transform,
    world: Solid,
}

impl Instance {
    /// Unplaced instance; `world` equals `local`
    pub fn new(name: impl Into<String>, kind: ShapeKind, local: Solid) -> Self {
        Self {
            name: name.into(),
            kind,
            world: local.clone(),
            local,
            transform: Transform::identity(),
        }
    }

    /// Instance whose canonical frame carries a built-in orientation
    pub(crate) fn oriented(
        kernel: &dyn GeometryKernel,
        name: impl Into<String>,
        kind: ShapeKind,
        local: Solid,
        transform: Transform,
    ) -> Self {
        let world = kernel.transform(&local, &transform);
        Self {
            name: name.into(),
            kind,
            local,
            transform,
            world,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Canonical solid before any placement
    #[inline]
    pub fn local(&self) -> &Solid {
        &self.local
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Solid in the parent frame
    #[inline]
    pub fn world(&self) -> &Solid {
        &self.world
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.world.bounds()
    }

    /// Copy under a different name
    pub fn renamed(&self, name: impl Into<String>) -> Instance {
        Instance {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// Place an instance in its parent frame.
///
/// The new transform is `t ∘ old`; the world solid is recomputed from the
/// canonical local solid so repeated placement does not accumulate error in
/// the vertex data.
pub fn place(kernel: &dyn GeometryKernel, instance: &Instance, t: &Transform) -> Instance {
    let transform = instance.transform.then(t);
    let world = kernel.transform(&instance.local, &transform);
    Instance {
        name: instance.name.clone(),
        kind: instance.kind,
        local: instance.local.clone(),
        transform,
        world,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_composition_order() {
        let rotate = Transform::rotation(Axis::Z, 90.0);
        let shift = Transform::translation(10.0, 0.0, 0.0);

        // Rotate first, then translate
        let p = rotate.then(&shift).apply(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);

        // Translate first, then rotate
        let p = shift.then(&rotate).apply(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 11.0, 0.0), epsilon = 1e-12);

        assert_eq!(shift * rotate, rotate.then(&shift));
    }

    #[test]
    fn test_identity_is_neutral() {
        let t = Transform::translation(1.0, 2.0, 3.0) * Transform::rotation(Axis::X, 30.0);
        assert_eq!(t.then(&Transform::identity()), t);
        assert_eq!(Transform::identity().then(&t), t);
        assert!(Transform::identity().is_identity(0.0));
        assert!(!t.is_identity(1e-9));
    }

    #[test]
    fn test_inverse() {
        let t = Transform::translation(4.0, -2.0, 1.0) * Transform::rotation(Axis::Y, 45.0);
        let p = Point3::new(3.0, 5.0, 7.0);
        assert_relative_eq!(t.inverse().apply(&t.apply(&p)), p, epsilon = 1e-12);
    }

    #[test]
    fn test_associativity() {
        let a = Transform::rotation(Axis::X, 20.0);
        let b = Transform::translation(0.0, 3.0, 0.0);
        let c = Transform::rotation(Axis::Z, -70.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let left = ((a * b) * c).apply(&p);
        let right = (a * (b * c)).apply(&p);
        assert_relative_eq!(left, right, epsilon = 1e-12);
    }
}
