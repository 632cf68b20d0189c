// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening boundary extraction
//!
//! Some host faces expose only a synthesized outer contour; the real
//! openings have to be recovered by geometric subtraction against the
//! face's material cross-section. The original host-side implementation
//! extruded both contours into thin solids and took the 3D difference; the
//! restriction of that difference to the face plane is exactly the 2D
//! boolean difference computed here with i_overlay.
//!
//! Faces that already enumerate their hole loops do not need this path;
//! build the [`Region`](crate::region::Region) directly (or via
//! `Region::from_loops`).

use crate::error::{Error, Result};
use crate::polygon::{classify_point, ensure_ccw, is_valid_contour, PointClass};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Recover opening contours by 2D boolean difference
///
/// `outer` is the face's outer boundary; `material_loops` are the contours
/// of the face's true material cross-section (even-odd interpretation, as a
/// host tessellation delivers them). The difference `outer - material`
/// yields one filled shape per opening.
///
/// Recovered contours that are degenerate or not contained in the outer
/// boundary (within `epsilon`) are discarded with a logged inconsistency;
/// this is non-fatal per the containment invariant on regions.
pub fn openings_from_difference(
    outer: &[Point2<f64>],
    material_loops: &[Vec<Point2<f64>>],
    epsilon: f64,
) -> Result<Vec<Vec<Point2<f64>>>> {
    if outer.len() < 3 {
        return Err(Error::InvalidRegion(
            "Outer contour must have at least 3 vertices".to_string(),
        ));
    }
    if material_loops.is_empty() {
        return Err(Error::BooleanFailed(
            "No material contours to subtract".to_string(),
        ));
    }

    let subject = vec![contour_to_path(&ensure_ccw(outer))];
    let clip: Vec<Vec<[f64; 2]>> = material_loops
        .iter()
        .filter(|c| c.len() >= 3)
        .map(|c| contour_to_path(c))
        .collect();

    if clip.is_empty() {
        return Err(Error::BooleanFailed(
            "All material contours are degenerate".to_string(),
        ));
    }

    // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
    let shapes = subject.overlay(&clip, OverlayRule::Difference, FillRule::EvenOdd);

    let mut openings = Vec::new();
    for shape in &shapes {
        // First contour of each shape is its boundary; inner contours of an
        // opening shape carry no information for layout.
        let Some(boundary) = shape.first() else {
            continue;
        };
        let contour: Vec<Point2<f64>> =
            boundary.iter().map(|p| Point2::new(p[0], p[1])).collect();

        if !is_valid_contour(&contour) {
            tracing::warn!(
                vertices = contour.len(),
                "Discarding degenerate recovered opening"
            );
            continue;
        }

        if !contour_within(&contour, outer, epsilon) {
            tracing::warn!(
                vertices = contour.len(),
                "Discarding recovered opening outside the outer boundary"
            );
            continue;
        }

        openings.push(contour);
    }

    Ok(openings)
}

/// Containment with boundary tolerance
///
/// Openings cut through the outer boundary (doors) have vertices lying on
/// it, so strict interior containment is too strong; within-epsilon
/// boundary points count as contained.
fn contour_within(inner: &[Point2<f64>], outer: &[Point2<f64>], epsilon: f64) -> bool {
    inner
        .iter()
        .all(|p| classify_point(p, outer, epsilon) != PointClass::Outside)
}

fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::signed_area;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn test_recovers_interior_opening() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        // Material = outer with a 2x2 window as an even-odd loop pair
        let material = vec![outer.clone(), rect(4.0, 4.0, 6.0, 6.0)];

        let openings = openings_from_difference(&outer, &material, 1e-6).unwrap();

        assert_eq!(openings.len(), 1);
        assert!((signed_area(&openings[0]).abs() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovers_boundary_touching_opening() {
        let outer = rect(0.0, 0.0, 10.0, 5.0);
        // Material is the face with a 1x2 door notch cut out of the bottom edge
        let material = vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(5.0, 2.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(0.0, 5.0),
        ]];

        let openings = openings_from_difference(&outer, &material, 1e-6).unwrap();

        assert_eq!(openings.len(), 1);
        assert!((signed_area(&openings[0]).abs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_openings_when_material_fills_face() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let material = vec![outer.clone()];

        let openings = openings_from_difference(&outer, &material, 1e-6).unwrap();
        assert!(openings.is_empty());
    }

    #[test]
    fn test_rejects_degenerate_outer() {
        let outer = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let material = vec![rect(0.0, 0.0, 1.0, 1.0)];
        assert!(openings_from_difference(&outer, &material, 1e-6).is_err());
    }
}
