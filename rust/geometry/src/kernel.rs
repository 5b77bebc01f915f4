// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry kernel boundary
//!
//! Everything the pipeline needs from a solid modeller goes through
//! [`GeometryKernel`]. [`CsgrsKernel`] implements it with exact planar
//! primitives and the csgrs BSP boolean engine.

use nalgebra::{Point3, Vector3};

use crate::bounds::Aabb;
use crate::csg::CsgOp;
use crate::error::{require_positive, Error, Result};
use crate::hull::convex_hull;
use crate::placement::Transform;
use crate::solid::{Face, Solid};

/// Solid modelling operations used by the pipeline.
///
/// Implementations must never mutate their inputs. Canonical primitives
/// are centred on the origin; cylinders run along +Z.
pub trait GeometryKernel: Send + Sync {
    /// Box of the given size centred on the origin
    fn cuboid(&self, size: Vector3<f64>) -> Result<Solid>;

    /// Cylinder along Z centred on the origin
    fn cylinder(&self, radius: f64, height: f64) -> Result<Solid>;

    fn convex_hull(&self, points: &[Point3<f64>]) -> Result<Solid>;

    /// Apply one boolean between an accumulated solid and the next operand
    fn boolean(&self, op: CsgOp, base: &Solid, operand: &Solid) -> Result<Solid>;

    fn transform(&self, solid: &Solid, t: &Transform) -> Solid {
        solid.transformed(t.isometry())
    }

    fn volume(&self, solid: &Solid) -> f64 {
        solid.volume()
    }

    /// `None` when the kernel cannot tell
    fn is_watertight(&self, solid: &Solid) -> Option<bool>;

    fn bounds(&self, solid: &Solid) -> Aabb {
        solid.bounds()
    }
}

/// Kernel backed by csgrs
#[derive(Debug, Clone)]
pub struct CsgrsKernel {
    /// Facets around a cylinder
    pub segments: usize,
    /// Relative closure tolerance for watertightness checks
    pub closure_tolerance: f64,
}

impl CsgrsKernel {
    pub const DEFAULT_SEGMENTS: usize = 48;
    pub const DEFAULT_CLOSURE_TOLERANCE: f64 = 1e-6;

    pub fn new(segments: usize) -> Self {
        Self {
            segments: segments.max(3),
            closure_tolerance: Self::DEFAULT_CLOSURE_TOLERANCE,
        }
    }

    /// Convert a solid into a csgrs mesh, one polygon per face
    fn to_csgrs(solid: &Solid) -> csgrs::mesh::Mesh<()> {
        use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};

        let polygons: Vec<Polygon<()>> = solid
            .faces()
            .iter()
            .filter_map(|face| {
                // Zero-area faces would give csgrs a NaN plane
                let normal = face.normal()?;
                let vertices = face
                    .vertices
                    .iter()
                    .map(|p| Vertex::new(*p, normal))
                    .collect();
                Some(Polygon::new(vertices, None))
            })
            .collect();

        CSGMesh::from_polygons(&polygons, None)
    }

    /// Convert csgrs polygons back into faces
    fn from_csgrs(mesh: &csgrs::mesh::Mesh<()>) -> Solid {
        let faces = mesh
            .polygons
            .iter()
            .filter(|polygon| polygon.vertices.len() >= 3)
            .map(|polygon| {
                Face::new(
                    polygon
                        .vertices
                        .iter()
                        .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2])),
                )
            })
            .filter(|face| face.area() > 1e-12)
            .collect();
        Solid::from_faces(faces)
    }
}

impl Default for CsgrsKernel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEGMENTS)
    }
}

impl GeometryKernel for CsgrsKernel {
    fn cuboid(&self, size: Vector3<f64>) -> Result<Solid> {
        let hx = require_positive("box_length", size.x)? / 2.0;
        let hy = require_positive("box_width", size.y)? / 2.0;
        let hz = require_positive("box_height", size.z)? / 2.0;

        let c = |x: f64, y: f64, z: f64| Point3::new(x * hx, y * hy, z * hz);
        Ok(Solid::from_faces(vec![
            Face::new([c(-1., -1., -1.), c(-1., -1., 1.), c(-1., 1., 1.), c(-1., 1., -1.)]),
            Face::new([c(1., -1., -1.), c(1., 1., -1.), c(1., 1., 1.), c(1., -1., 1.)]),
            Face::new([c(-1., -1., -1.), c(1., -1., -1.), c(1., -1., 1.), c(-1., -1., 1.)]),
            Face::new([c(-1., 1., -1.), c(-1., 1., 1.), c(1., 1., 1.), c(1., 1., -1.)]),
            Face::new([c(-1., -1., -1.), c(-1., 1., -1.), c(1., 1., -1.), c(1., -1., -1.)]),
            Face::new([c(-1., -1., 1.), c(1., -1., 1.), c(1., 1., 1.), c(-1., 1., 1.)]),
        ]))
    }

    fn cylinder(&self, radius: f64, height: f64) -> Result<Solid> {
        let r = require_positive("cylinder_radius", radius)?;
        let h = require_positive("cylinder_height", height)? / 2.0;
        let n = self.segments;

        let ring: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                (r * theta.cos(), r * theta.sin())
            })
            .collect();

        let mut faces = Vec::with_capacity(n + 2);
        faces.push(Face::new(ring.iter().map(|&(x, y)| Point3::new(x, y, h))));
        faces.push(Face::new(ring.iter().rev().map(|&(x, y)| Point3::new(x, y, -h))));
        for i in 0..n {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            faces.push(Face::new([
                Point3::new(x0, y0, -h),
                Point3::new(x1, y1, -h),
                Point3::new(x1, y1, h),
                Point3::new(x0, y0, h),
            ]));
        }
        Ok(Solid::from_faces(faces))
    }

    fn convex_hull(&self, points: &[Point3<f64>]) -> Result<Solid> {
        convex_hull(points)
    }

    fn boolean(&self, op: CsgOp, base: &Solid, operand: &Solid) -> Result<Solid> {
        use csgrs::traits::CSG;

        if base.is_empty() {
            return Err(Error::Kernel(format!("{} with an empty base solid", op)));
        }

        // Fast paths that need no BSP work
        if operand.is_empty() {
            return Ok(match op {
                CsgOp::Union | CsgOp::Difference => base.clone(),
                CsgOp::Intersection => Solid::empty(),
            });
        }

        let lhs = Self::to_csgrs(base);
        let rhs = Self::to_csgrs(operand);
        let result = match op {
            CsgOp::Union => lhs.union(&rhs),
            CsgOp::Difference => lhs.difference(&rhs),
            CsgOp::Intersection => lhs.intersection(&rhs),
        };
        Ok(Self::from_csgrs(&result))
    }

    /// Vector-area closure test; see [`Solid::closure_defect`] for the
    /// open boundaries it cannot see
    fn is_watertight(&self, solid: &Solid) -> Option<bool> {
        Some(solid.is_closed(self.closure_tolerance))
    }
}
