// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded planar regions
//!
//! A `Region` is one outer contour plus zero or more opening contours, all
//! in plane-local (u, v) coordinates. It is constructed fresh per host face
//! and is the sole input to the layout pipeline.

use crate::error::{Error, Result};
use crate::polygon::{classify_point, contour_bounds, is_valid_contour, signed_area, PointClass};
use nalgebra::Point2;

/// Planar area bounded by an outer contour with optional openings
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Opening contours, each strictly interior to the outer boundary
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Region {
    /// Create a region with no openings
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Create a region with openings
    pub fn with_holes(outer: Vec<Point2<f64>>, holes: Vec<Vec<Point2<f64>>>) -> Self {
        Self { outer, holes }
    }

    /// Build a region from an undifferentiated set of face loops
    ///
    /// Hosts that expose a face as a flat list of edge loops do not say
    /// which loop is the boundary. The largest loop by absolute area is the
    /// outer contour; every other loop is an opening.
    pub fn from_loops(mut loops: Vec<Vec<Point2<f64>>>) -> Result<Self> {
        if loops.is_empty() {
            return Err(Error::InvalidRegion("No face loops supplied".to_string()));
        }

        let mut outer_idx = 0;
        let mut largest = 0.0f64;
        for (i, contour) in loops.iter().enumerate() {
            let area = signed_area(contour).abs();
            if area > largest {
                largest = area;
                outer_idx = i;
            }
        }

        let outer = loops.swap_remove(outer_idx);
        Ok(Self {
            outer,
            holes: loops,
        })
    }

    /// Add an opening contour
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Validate the outer contour
    ///
    /// Fails with `InvalidRegion` when the outer boundary is degenerate
    /// (fewer than 3 vertices or no area). Holes are not validated here;
    /// [`Region::retain_contained_holes`] handles them non-fatally.
    pub fn validate(&self) -> Result<()> {
        if self.outer.len() < 3 {
            return Err(Error::InvalidRegion(format!(
                "Outer contour has {} vertices, need at least 3",
                self.outer.len()
            )));
        }
        if !is_valid_contour(&self.outer) {
            return Err(Error::InvalidRegion(
                "Outer contour has no area".to_string(),
            ));
        }
        Ok(())
    }

    /// Bounding box of the outer contour
    pub fn bounds(&self) -> Result<(Point2<f64>, Point2<f64>)> {
        contour_bounds(&self.outer)
            .ok_or_else(|| Error::InvalidRegion("Outer contour is empty".to_string()))
    }

    /// Drop holes that are degenerate or not contained in the outer contour
    ///
    /// Extraction can produce contours violating the containment invariant;
    /// those are discarded with a logged inconsistency rather than failing
    /// the region. Containment is epsilon-tolerant: openings cut through the
    /// outer boundary (doors, top-edge window strips) have vertices lying on
    /// it, and those count as contained on every edge, not just the ones a
    /// strict parity test happens to accept. Returns the indices of the
    /// dropped holes, as they were before removal.
    pub fn retain_contained_holes(&mut self, epsilon: f64) -> Vec<usize> {
        let outer = std::mem::take(&mut self.outer);
        let mut dropped = Vec::new();
        let mut index = 0usize;

        self.holes.retain(|hole| {
            let keep = is_valid_contour(hole)
                && hole
                    .iter()
                    .all(|p| classify_point(p, &outer, epsilon) != PointClass::Outside);
            if !keep {
                tracing::warn!(
                    hole_index = index,
                    vertices = hole.len(),
                    "Discarding hole contour outside the outer boundary"
                );
                dropped.push(index);
            }
            index += 1;
            keep
        });

        self.outer = outer;
        dropped
    }

    /// Point availability test
    ///
    /// True iff the point is inside the outer contour and strictly outside
    /// every hole. The epsilon band is resolved conservatively on both
    /// boundaries: a point on an outer edge still counts as inside (the
    /// material reaches the boundary, leaving it uncovered would be a gap),
    /// while a point on a hole edge counts as unavailable (never
    /// double-count tiles against an opening).
    pub fn contains(&self, point: &Point2<f64>, epsilon: f64) -> bool {
        if classify_point(point, &self.outer, epsilon) == PointClass::Outside {
            return false;
        }

        for hole in &self.holes {
            if classify_point(point, hole, epsilon) != PointClass::Outside {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        let too_few = Region::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(too_few.validate().is_err());

        let collinear = Region::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert!(collinear.validate().is_err());

        let square = Region::new(rect(0.0, 0.0, 1.0, 1.0));
        assert!(square.validate().is_ok());
    }

    #[test]
    fn test_from_loops_picks_largest_as_outer() {
        let loops = vec![
            rect(4.0, 4.0, 6.0, 6.0),  // opening
            rect(0.0, 0.0, 10.0, 10.0), // boundary
            rect(1.0, 1.0, 2.0, 2.0),  // opening
        ];

        let region = Region::from_loops(loops).unwrap();
        let (min, max) = region.bounds().unwrap();
        assert_eq!(min, Point2::new(0.0, 0.0));
        assert_eq!(max, Point2::new(10.0, 10.0));
        assert_eq!(region.holes.len(), 2);
    }

    #[test]
    fn test_retain_contained_holes() {
        let mut region = Region::with_holes(
            rect(0.0, 0.0, 10.0, 10.0),
            vec![
                rect(4.0, 4.0, 6.0, 6.0),   // fine
                rect(8.0, 8.0, 12.0, 12.0), // pokes outside
                vec![Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)], // degenerate
            ],
        );

        let dropped = region.retain_contained_holes(1e-4);
        assert_eq!(dropped, vec![1, 2]);
        assert_eq!(region.holes.len(), 1);
    }

    #[test]
    fn test_retain_keeps_boundary_touching_holes() {
        // One opening per wall edge; every one has vertices exactly on the
        // outer boundary and every one is valid input.
        let mut region = Region::with_holes(
            rect(0.0, 0.0, 10.0, 10.0),
            vec![
                rect(4.0, 0.0, 5.0, 2.0),   // bottom door
                rect(4.0, 8.0, 5.0, 10.0),  // top window strip
                rect(0.0, 4.0, 2.0, 5.0),   // left
                rect(8.0, 4.0, 10.0, 5.0),  // right
            ],
        );

        let dropped = region.retain_contained_holes(1e-4);
        assert!(dropped.is_empty());
        assert_eq!(region.holes.len(), 4);
    }

    #[test]
    fn test_contains() {
        let region = Region::with_holes(
            rect(0.0, 0.0, 10.0, 10.0),
            vec![rect(4.0, 4.0, 6.0, 6.0)],
        );

        assert!(region.contains(&Point2::new(1.0, 1.0), 1e-4));
        // Inside the hole
        assert!(!region.contains(&Point2::new(5.0, 5.0), 1e-4));
        // Outside the outer boundary
        assert!(!region.contains(&Point2::new(11.0, 5.0), 1e-4));
        // On the hole edge: conservative, unavailable
        assert!(!region.contains(&Point2::new(4.0, 5.0), 1e-4));
        // On the outer edge: material reaches the boundary, available
        assert!(region.contains(&Point2::new(0.0, 5.0), 1e-4));
    }
}
