// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane frames
//!
//! A `PlaneFrame` is the orthonormal (origin, U, V, normal) basis that fixes
//! a 2D coordinate system in 3D. It is built once per host face; everything
//! downstream works in (u, v) and only the placement emitter maps back.

use crate::error::{Error, Result};
use nalgebra::{Point2, Point3, Vector2, Vector3};

/// Epsilon below which a direction vector is considered degenerate
const DIRECTION_EPSILON: f64 = 1e-10;

/// Orthonormal basis embedding a 2D plane in 3D
#[derive(Debug, Clone)]
pub struct PlaneFrame {
    /// Frame origin in world space
    pub origin: Point3<f64>,
    /// In-plane U axis (unit length)
    pub u: Vector3<f64>,
    /// In-plane V axis (unit length, perpendicular to U)
    pub v: Vector3<f64>,
    /// Plane normal (U x V)
    pub normal: Vector3<f64>,
}

impl PlaneFrame {
    /// Build a frame from an origin and two in-plane directions
    ///
    /// `u` is normalized; `v` is re-orthogonalized against `u` before
    /// normalization, so slightly skewed host axes are accepted.
    pub fn new(origin: Point3<f64>, u: Vector3<f64>, v: Vector3<f64>) -> Result<Self> {
        let u = u
            .try_normalize(DIRECTION_EPSILON)
            .ok_or_else(|| Error::InvalidFrame("U axis is degenerate".to_string()))?;

        let v_ortho = v - u * v.dot(&u);
        let v = v_ortho
            .try_normalize(DIRECTION_EPSILON)
            .ok_or_else(|| Error::InvalidFrame("V axis is parallel to U".to_string()))?;

        let normal = u.cross(&v);

        Ok(Self { origin, u, v, normal })
    }

    /// Fit a frame to a planar 3D polygon
    ///
    /// Origin is the first vertex, U the first non-degenerate edge, and the
    /// normal comes from Newell's method so slightly non-planar input still
    /// yields a stable basis.
    pub fn fit(points: &[Point3<f64>]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InvalidFrame(
                "Need at least 3 points to fit a plane".to_string(),
            ));
        }

        // Newell's method for the polygon normal
        let mut normal = Vector3::zeros();
        let n = points.len();
        for i in 0..n {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        let normal = normal
            .try_normalize(DIRECTION_EPSILON)
            .ok_or_else(|| Error::InvalidFrame("Polygon has no area".to_string()))?;

        // First non-degenerate edge as U
        let origin = points[0];
        let u = points
            .iter()
            .skip(1)
            .map(|p| p - origin)
            .find(|e| e.norm_squared() > DIRECTION_EPSILON)
            .ok_or_else(|| Error::InvalidFrame("All points coincide".to_string()))?;

        let v = normal.cross(&u);
        Self::new(origin, u, v)
    }

    /// Project a world point into (u, v) coordinates
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let rel = point - self.origin;
        Point2::new(rel.dot(&self.u), rel.dot(&self.v))
    }

    /// Map a (u, v) point back to world space
    pub fn unproject(&self, point: &Point2<f64>) -> Point3<f64> {
        self.origin + self.u * point.x + self.v * point.y
    }

    /// Map an in-plane 2D direction to a world direction
    pub fn unproject_dir(&self, dir: &Vector2<f64>) -> Vector3<f64> {
        self.u * dir.x + self.v * dir.y
    }

    /// Project a 3D polygon into the frame's (u, v) coordinates
    pub fn project_contour(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}
