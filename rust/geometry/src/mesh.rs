// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export mesh data structures

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::solid::Solid;
use crate::triangulation::triangulate_face;

/// Triangle mesh with flat per-face normals, ready for serialization
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Triangulate every face of a solid
    pub fn from_solid(solid: &Solid) -> Result<Mesh> {
        if solid.is_empty() {
            return Err(Error::EmptyMesh("solid has no faces".into()));
        }

        let mut mesh = Mesh::with_capacity(solid.vertex_count(), solid.vertex_count() * 3);
        for face in solid.faces() {
            // Slivers from boolean splits carry no area
            let Some(normal) = face.normal() else {
                continue;
            };
            let triangles = triangulate_face(&face.vertices, &normal)?;

            let base = mesh.vertex_count() as u32;
            for p in &face.vertices {
                mesh.add_vertex(*p, normal);
            }
            for [a, b, c] in triangles {
                mesh.add_triangle(base + a as u32, base + b as u32, base + c as u32);
            }
        }

        if mesh.triangle_count() == 0 {
            return Err(Error::EmptyMesh("every face was degenerate".into()));
        }
        Ok(mesh)
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions
            .extend([position.x as f32, position.y as f32, position.z as f32]);
        self.normals
            .extend([normal.x as f32, normal.y as f32, normal.z as f32]);
    }

    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend([i0, i1, i2]);
    }

    /// Merge another mesh into this one
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Corner positions and face normal of each triangle
    pub fn triangles(&self) -> impl Iterator<Item = ([[f32; 3]; 3], [f32; 3])> + '_ {
        self.indices.chunks_exact(3).map(move |t| {
            let corner = |i: u32| {
                let i = i as usize * 3;
                [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
            };
            let n = t[0] as usize * 3;
            (
                [corner(t[0]), corner(t[1]), corner(t[2])],
                [self.normals[n], self.normals[n + 1], self.normals[n + 2]],
            )
        })
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }
        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);
        for chunk in self.positions.chunks_exact(3) {
            for k in 0..3 {
                min[k] = min[k].min(chunk[k]);
                max[k] = max[k].max(chunk[k]);
            }
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{CsgrsKernel, GeometryKernel};

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_from_cuboid() {
        let kernel = CsgrsKernel::default();
        let solid = kernel.cuboid(Vector3::new(2.0, 4.0, 6.0)).unwrap();
        let mesh = Mesh::from_solid(&solid).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);
        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_triangles_face_outward() {
        let kernel = CsgrsKernel::new(16);
        let solid = kernel.cylinder(3.0, 2.0).unwrap();
        let mesh = Mesh::from_solid(&solid).unwrap();
        for (corners, normal) in mesh.triangles() {
            let a = Vector3::from(corners[0]).cast::<f64>();
            let b = Vector3::from(corners[1]).cast::<f64>();
            let c = Vector3::from(corners[2]).cast::<f64>();
            let n = Vector3::from(normal).cast::<f64>();
            assert!((b - a).cross(&(c - a)).dot(&n) > 0.0);
        }
    }

    #[test]
    fn test_merge() {
        let kernel = CsgrsKernel::default();
        let a = Mesh::from_solid(&kernel.cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap()).unwrap();
        let mut combined = a.clone();
        combined.merge(&a);
        assert_eq!(combined.triangle_count(), 24);
        assert_eq!(*combined.indices.last().unwrap(), 47);
    }

    #[test]
    fn test_empty_solid_rejected() {
        assert!(matches!(
            Mesh::from_solid(&Solid::empty()),
            Err(Error::EmptyMesh(_))
        ));
    }
}
