// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D contour primitives
//!
//! Free functions over vertex slices: signed area, winding normalization,
//! bounds, and the even-odd containment test used by the occupancy sampler.
//! A point within epsilon of any edge is classified `Boundary`; how a
//! boundary point counts is decided by the caller, since outer contours and
//! opening contours resolve the band differently.

use nalgebra::Point2;

/// Minimum area threshold - contours smaller than this are considered degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Classification of a point against a closed contour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClass {
    /// Strictly inside (even-odd rule, outside the boundary band)
    Inside,
    /// Strictly outside
    Outside,
    /// Within epsilon of an edge
    Boundary,
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if contour.is_empty() {
        return None;
    }

    let mut min = contour[0];
    let mut max = contour[0];

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Distance from a point to a segment
pub fn point_segment_distance(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.norm_squared();

    if len_sq <= f64::EPSILON {
        return ap.norm();
    }

    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}

/// Check if a point is inside a contour using even-odd ray casting
///
/// Pure parity test with no boundary band; points exactly on an edge give
/// an arbitrary but deterministic answer. Use [`classify_point`] where the
/// boundary must be handled explicitly.
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Classify a point against a contour with an explicit boundary band
///
/// Any point within `epsilon` of an edge is `Boundary`, regardless of which
/// side of the edge the parity test would put it on. The single epsilon is
/// shared by the sampler, edge classification and rectification so boundary
/// behavior is consistent across the pipeline.
pub fn classify_point(point: &Point2<f64>, contour: &[Point2<f64>], epsilon: f64) -> PointClass {
    if contour.len() < 3 {
        return PointClass::Outside;
    }

    let n = contour.len();
    for i in 0..n {
        let j = (i + 1) % n;
        if point_segment_distance(point, &contour[i], &contour[j]) <= epsilon {
            return PointClass::Boundary;
        }
    }

    if point_in_contour(point, contour) {
        PointClass::Inside
    } else {
        PointClass::Outside
    }
}

/// Simplify a contour by removing collinear points
pub fn simplify_contour(contour: &[Point2<f64>], epsilon: f64) -> Vec<Point2<f64>> {
    if contour.len() <= 3 {
        return contour.to_vec();
    }

    let mut result = Vec::with_capacity(contour.len());
    let n = contour.len();

    for i in 0..n {
        let prev = &contour[(i + n - 1) % n];
        let curr = &contour[i];
        let next = &contour[(i + 1) % n];

        let cross = (curr.x - prev.x) * (next.y - prev.y) - (curr.y - prev.y) * (next.x - prev.x);

        if cross.abs() > epsilon {
            result.push(*curr);
        }
    }

    if result.len() < 3 {
        return contour.to_vec();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_signed_area_ccw() {
        let area = signed_area(&unit_square());
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_signed_area_cw() {
        let cw: Vec<_> = unit_square().into_iter().rev().collect();
        let area = signed_area(&cw);
        assert!((area + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ensure_ccw() {
        let cw: Vec<_> = unit_square().into_iter().rev().collect();
        let ccw = ensure_ccw(&cw);
        assert!(signed_area(&ccw) > 0.0);
    }

    #[test]
    fn test_point_in_contour() {
        let contour = unit_square();
        assert!(point_in_contour(&Point2::new(0.5, 0.5), &contour));
        assert!(!point_in_contour(&Point2::new(1.5, 0.5), &contour));
        assert!(!point_in_contour(&Point2::new(-0.5, 0.5), &contour));
    }

    #[test]
    fn test_classify_point_boundary_is_conservative() {
        let contour = unit_square();
        // Exactly on the bottom edge
        assert_eq!(
            classify_point(&Point2::new(0.5, 0.0), &contour, 1e-4),
            PointClass::Boundary
        );
        // Perturbed within epsilon, either side of the edge
        assert_eq!(
            classify_point(&Point2::new(0.5, 5e-5), &contour, 1e-4),
            PointClass::Boundary
        );
        assert_eq!(
            classify_point(&Point2::new(0.5, -5e-5), &contour, 1e-4),
            PointClass::Boundary
        );
        // Clearly interior
        assert_eq!(
            classify_point(&Point2::new(0.5, 0.5), &contour, 1e-4),
            PointClass::Inside
        );
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert!((point_segment_distance(&Point2::new(5.0, 3.0), &a, &b) - 3.0).abs() < 1e-12);
        // Beyond the segment end, distance is to the endpoint
        assert!((point_segment_distance(&Point2::new(14.0, 3.0), &a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_simplify_contour() {
        let contour = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0), // Collinear
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];

        let simplified = simplify_contour(&contour, 1e-6);
        assert_eq!(simplified.len(), 4);
    }

    #[test]
    fn test_is_valid_contour() {
        assert!(is_valid_contour(&unit_square()));

        let degenerate = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(!is_valid_contour(&degenerate));

        let too_few = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(!is_valid_contour(&too_few));
    }

}
