// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face triangulation for export
//!
//! Faces are projected onto their own plane and cut with earcutr.
//! Triangles and convex faces take a fan shortcut.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, Result};

/// Convex test on a projected polygon (cross products never change sign)
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0.0_f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let cross = (b - a).perp(&(c - b));
        if cross.abs() <= 1e-12 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Triangulate a simple 2D polygon, returning index triples into `points`
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(format!(
            "need at least 3 points, got {}",
            n
        )));
    }

    if n == 3 || is_convex(points) {
        return Ok((1..n - 1).map(|i| [0, i, i + 1]).collect());
    }

    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = earcutr::earcut(&flat, &[], 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

    Ok(indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect())
}

/// Project points onto the plane with the given unit normal.
///
/// The basis `(u, v, normal)` is right-handed, so counter-clockwise order
/// around `normal` stays counter-clockwise in 2D.
pub fn project_to_plane(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<Point2<f64>> {
    let Some(origin) = points.first() else {
        return Vec::new();
    };

    // Reference axis least parallel to the normal
    let abs = normal.abs();
    let reference = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = reference.cross(normal).normalize();
    let v = normal.cross(&u);

    points
        .iter()
        .map(|p| {
            let d = p - origin;
            Point2::new(d.dot(&u), d.dot(&v))
        })
        .collect()
}

/// Triangulate a planar 3D face; triangles keep the face's winding
pub fn triangulate_face(points: &[Point3<f64>], normal: &Vector3<f64>) -> Result<Vec<[usize; 3]>> {
    let projected = project_to_plane(points, normal);
    let triangles = triangulate_polygon(&projected)?;

    // earcutr may return either winding; restore the face's
    Ok(triangles
        .into_iter()
        .map(|[a, b, c]| {
            let ccw = (projected[b] - projected[a]).perp(&(projected[c] - projected[a])) >= 0.0;
            if ccw {
                [a, b, c]
            } else {
                [a, c, b]
            }
        })
        .collect())
}
