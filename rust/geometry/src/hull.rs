// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D convex hull
//!
//! Incremental hull: seed a tetrahedron from extreme points, then add the
//! remaining points one at a time, replacing every face the point can see
//! by a fan from the horizon to the point.
//!
//! Degenerate inputs (fewer than 4 distinct points, collinear or coplanar
//! sets) are rejected with [`Error::DegenerateHull`] before any face is
//! built.

use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::solid::{Face, Solid};

/// Distance tolerance relative to the point cloud diameter
const RELATIVE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct HullFace {
    v: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
}

impl HullFace {
    fn new(v: [usize; 3], points: &[Point3<f64>]) -> Option<Self> {
        let [a, b, c] = v;
        let normal = (points[b] - points[a])
            .cross(&(points[c] - points[a]))
            .try_normalize(0.0)?;
        let offset = normal.dot(&points[a].coords);
        Some(Self { v, normal, offset })
    }

    #[inline]
    fn distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }
}

/// Compute the convex hull of a point set as a closed solid
pub fn convex_hull(points: &[Point3<f64>]) -> Result<Solid> {
    if let Some(bad) = points.iter().find(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(Error::DegenerateHull(format!("non-finite point {:?}", bad)));
    }

    let scale = diameter_estimate(points);
    let eps = (scale * RELATIVE_EPSILON).max(f64::EPSILON);
    let unique = dedup(points, eps);
    if unique.len() < 4 {
        return Err(Error::DegenerateHull(format!(
            "need at least 4 distinct points, got {}",
            unique.len()
        )));
    }

    let seed = initial_simplex(&unique, eps)?;
    let mut faces = seed_faces(seed, &unique);

    let seed_set: FxHashSet<usize> = seed.iter().copied().collect();
    for idx in (0..unique.len()).filter(|i| !seed_set.contains(i)) {
        let p = unique[idx];
        let visible: Vec<bool> = faces.iter().map(|f| f.distance(&p) > eps).collect();
        if !visible.iter().any(|&v| v) {
            continue;
        }

        // Horizon: directed edges of visible faces whose twin is not visible
        let visible_edges: FxHashSet<(usize, usize)> = faces
            .iter()
            .zip(&visible)
            .filter(|(_, v)| **v)
            .flat_map(|(f, _)| f.edges())
            .collect();
        let horizon: Vec<(usize, usize)> = visible_edges
            .iter()
            .filter(|&&(a, b)| !visible_edges.contains(&(b, a)))
            .copied()
            .collect();

        let mut kept: Vec<HullFace> = faces
            .into_iter()
            .zip(visible)
            .filter_map(|(f, v)| (!v).then_some(f))
            .collect();
        kept.extend(
            horizon
                .into_iter()
                .filter_map(|(a, b)| HullFace::new([a, b, idx], &unique)),
        );
        faces = kept;
    }

    let solid = Solid::from_faces(
        faces
            .iter()
            .map(|f| Face::new(f.v.iter().map(|&i| unique[i])))
            .collect(),
    );
    if solid.volume() <= 0.0 {
        return Err(Error::DegenerateHull("hull encloses no volume".into()));
    }
    Ok(solid)
}

fn diameter_estimate(points: &[Point3<f64>]) -> f64 {
    let mut min = Vector3::repeat(f64::MAX);
    let mut max = Vector3::repeat(f64::MIN);
    for p in points {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }
    if points.is_empty() {
        0.0
    } else {
        (max - min).norm()
    }
}

fn dedup(points: &[Point3<f64>], eps: f64) -> Vec<Point3<f64>> {
    let mut unique: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if !unique.iter().any(|u| (u - p).norm() <= eps) {
            unique.push(*p);
        }
    }
    unique
}

/// Four affinely independent points: farthest pair, farthest from their
/// line, farthest from their plane
fn initial_simplex(points: &[Point3<f64>], eps: f64) -> Result<[usize; 4]> {
    let farthest_from = |from: usize| {
        (0..points.len())
            .max_by(|&a, &b| {
                let da = (points[a] - points[from]).norm_squared();
                let db = (points[b] - points[from]).norm_squared();
                da.total_cmp(&db)
            })
            .unwrap_or(from)
    };
    let p0 = farthest_from(0);
    let p1 = farthest_from(p0);

    let dir = points[p1] - points[p0];
    let line_distance = |i: usize| (points[i] - points[p0]).cross(&dir).norm() / dir.norm();
    let p2 = (0..points.len())
        .max_by(|&a, &b| line_distance(a).total_cmp(&line_distance(b)))
        .unwrap_or(p0);
    if line_distance(p2) <= eps {
        return Err(Error::DegenerateHull("all points are collinear".into()));
    }

    let normal = dir.cross(&(points[p2] - points[p0])).normalize();
    let plane_distance = |i: usize| normal.dot(&(points[i] - points[p0])).abs();
    let p3 = (0..points.len())
        .max_by(|&a, &b| plane_distance(a).total_cmp(&plane_distance(b)))
        .unwrap_or(p0);
    if plane_distance(p3) <= eps {
        return Err(Error::DegenerateHull("all points are coplanar".into()));
    }

    Ok([p0, p1, p2, p3])
}

/// Tetrahedron faces with outward normals
fn seed_faces(seed: [usize; 4], points: &[Point3<f64>]) -> Vec<HullFace> {
    let [a, b, c, d] = seed;
    let centroid = Point3::from(
        (points[a].coords + points[b].coords + points[c].coords + points[d].coords) / 4.0,
    );
    [[a, b, c], [a, c, d], [a, d, b], [b, d, c]]
        .into_iter()
        .filter_map(|[i, j, k]| {
            let face = HullFace::new([i, j, k], points)?;
            if face.distance(&centroid) > 0.0 {
                HullFace::new([i, k, j], points)
            } else {
                Some(face)
            }
        })
        .collect()
}
