// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary representation of a solid
//!
//! A [`Solid`] is a shared, immutable list of planar polygonal faces wound
//! counter-clockwise when viewed from outside. Transforming or combining a
//! solid always produces a new one; the face list itself is never mutated.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Isometry3, Point3, Vector3};
use smallvec::SmallVec;

use crate::bounds::Aabb;

/// Planar polygon, counter-clockwise seen from outside the solid
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: SmallVec<[Point3<f64>; 4]>,
}

impl Face {
    pub fn new(vertices: impl IntoIterator<Item = Point3<f64>>) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
        }
    }

    /// Area-weighted normal (Newell's method), half the magnitude of the
    /// cross-product sum so its length equals the face area
    pub fn vector_area(&self) -> Vector3<f64> {
        let n = self.vertices.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let current = &self.vertices[i];
            let next = &self.vertices[(i + 1) % n];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal * 0.5
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.vector_area().norm()
    }

    /// Unit outward normal, `None` for degenerate faces
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.vector_area().try_normalize(1e-12)
    }

    /// Signed volume of the cone from the origin to this face, times six
    fn signed_volume6(&self) -> f64 {
        let v = &self.vertices;
        if v.len() < 3 {
            return 0.0;
        }
        let origin = v[0].coords;
        (1..v.len() - 1)
            .map(|i| origin.dot(&v[i].coords.cross(&v[i + 1].coords)))
            .sum()
    }

    fn transformed(&self, iso: &Isometry3<f64>) -> Face {
        Face {
            vertices: self.vertices.iter().map(|p| iso * p).collect(),
        }
    }
}

/// Immutable, cheaply clonable solid
#[derive(Clone)]
pub struct Solid {
    faces: Arc<[Face]>,
}

impl Solid {
    /// Build a solid from faces, dropping faces with fewer than 3 vertices
    pub fn from_faces(faces: Vec<Face>) -> Self {
        let faces: Vec<Face> = faces.into_iter().filter(|f| f.vertices.len() >= 3).collect();
        Self {
            faces: faces.into(),
        }
    }

    /// Solid with no faces
    pub fn empty() -> Self {
        Self {
            faces: Arc::from(Vec::new()),
        }
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.faces.iter().map(|f| f.vertices.len()).sum()
    }

    /// Enclosed volume by the divergence theorem
    pub fn volume(&self) -> f64 {
        self.faces.iter().map(Face::signed_volume6).sum::<f64>() / 6.0
    }

    pub fn surface_area(&self) -> f64 {
        self.faces.iter().map(Face::area).sum()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.faces.iter().flat_map(|f| f.vertices.iter()))
    }

    /// Residual of the closed-surface identity `Σ vector_area = 0`,
    /// relative to the total surface area.
    ///
    /// T-junctions left by boolean engines do not affect it, a missing or
    /// flipped face does. It is a necessary condition only: removing two
    /// opposite faces of equal area (both ends of a box, say) leaves the
    /// sum at zero and goes undetected.
    pub fn closure_defect(&self) -> f64 {
        let area = self.surface_area();
        if area <= 0.0 {
            return f64::INFINITY;
        }
        let residual: Vector3<f64> = self.faces.iter().map(Face::vector_area).sum();
        residual.norm() / area
    }

    /// Whether the boundary is closed within a relative tolerance
    #[inline]
    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.closure_defect() <= tolerance
    }

    /// New solid with every vertex mapped through a rigid transform
    pub fn transformed(&self, iso: &Isometry3<f64>) -> Solid {
        Solid {
            faces: self.faces.iter().map(|f| f.transformed(iso)).collect(),
        }
    }

    /// Faces of both solids in one list, without any boolean resolution
    pub fn concat(&self, other: &Solid) -> Solid {
        Solid {
            faces: self.faces.iter().chain(other.faces.iter()).cloned().collect(),
        }
    }
}

impl Default for Solid {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Solid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solid")
            .field("faces", &self.faces.len())
            .field("vertices", &self.vertex_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Translation3, UnitQuaternion};

    fn unit_cube() -> Solid {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        Solid::from_faces(vec![
            Face::new([p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)]),
            Face::new([p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)]),
            Face::new([p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)]),
            Face::new([p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)]),
            Face::new([p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)]),
            Face::new([p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)]),
        ])
    }

    #[test]
    fn test_cube_volume_and_area() {
        let cube = unit_cube();
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cube.surface_area(), 6.0, epsilon = 1e-12);
        assert!(cube.is_closed(1e-9));
    }

    #[test]
    fn test_open_surface_detected() {
        let cube = unit_cube();
        let open = Solid::from_faces(cube.faces()[..5].to_vec());
        assert!(!open.is_closed(1e-6));

        // A tube open at both ends still sums to zero
        let tube = Solid::from_faces(cube.faces()[..4].to_vec());
        assert!(tube.is_closed(1e-9));
    }

    #[test]
    fn test_transform_preserves_volume() {
        let iso = Isometry3::from_parts(
            Translation3::new(10.0, -4.0, 2.5),
            UnitQuaternion::from_euler_angles(0.3, 0.1, 1.2),
        );
        let moved = unit_cube().transformed(&iso);
        assert_relative_eq!(moved.volume(), 1.0, epsilon = 1e-9);
        assert!(moved.is_closed(1e-9));
    }

    #[test]
    fn test_empty_solid() {
        let solid = Solid::empty();
        assert!(solid.is_empty());
        assert_eq!(solid.volume(), 0.0);
        assert!(!solid.is_closed(1e-6));
        assert!(!solid.bounds().is_valid());
    }
}
