// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Occupancy grid sampling
//!
//! Discretizes a region's bounding box into a uniform lattice and
//! classifies each cell as available (inside the outer contour, outside
//! every opening) or not. The sample point is the cell's anchor corner -
//! its minimum (u, v) corner - applied uniformly. Rows run along V, columns
//! along U, both anchored at the bounding-box minimum.
//!
//! The grid is recomputed per region and discarded after decomposition; it
//! owns no references into the region.

use crate::error::Result;
use nalgebra::Point2;
use tilelayout_geometry::Region;

/// Row-major boolean occupancy lattice
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    origin: Point2<f64>,
    pitch: f64,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Sample a region at the given pitch
    ///
    /// `rows = ceil(height / pitch)`, `cols = ceil(width / pitch)` over the
    /// outer contour's bounding box. Fails with `InvalidRegion` for a
    /// degenerate outer contour. Sampling is pure: re-running on an
    /// unchanged region yields a bit-identical grid.
    pub fn sample(region: &Region, pitch: f64, epsilon: f64) -> Result<Self> {
        region.validate()?;
        let (min, max) = region.bounds()?;

        let width = max.x - min.x;
        let height = max.y - min.y;
        let cols = (width / pitch).ceil().max(1.0) as usize;
        let rows = (height / pitch).ceil().max(1.0) as usize;

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let v = min.y + row as f64 * pitch;
            for col in 0..cols {
                let u = min.x + col as f64 * pitch;
                cells.push(region.contains(&Point2::new(u, v), epsilon));
            }
        }

        Ok(Self {
            rows,
            cols,
            origin: min,
            pitch,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Bounding-box minimum corner the lattice is anchored at
    pub fn origin(&self) -> Point2<f64> {
        self.origin
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    #[inline]
    pub fn is_available(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)]
    }

    /// Number of available cells
    pub fn available_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Anchor (minimum) corner of a cell in plane coordinates
    pub fn cell_anchor(&self, row: usize, col: usize) -> Point2<f64> {
        Point2::new(
            self.origin.x + col as f64 * self.pitch,
            self.origin.y + row as f64 * self.pitch,
        )
    }

    /// Raw cell buffer, row-major
    pub fn cells(&self) -> &[bool] {
        &self.cells
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

    // Hole edges are kept off the lattice points so exactly the four
    // anchors (rows 2..=3, cols 4..=5) fall inside the opening.
    fn holed_region() -> Region {
        Region::with_holes(rect(0.0, 0.0, 10.0, 5.0), vec![rect(3.5, 1.5, 5.5, 3.5)])
    }

    #[test]
    fn test_full_rectangle_all_available() {
        let region = Region::new(rect(0.0, 0.0, 10.0, 5.0));
        let grid = OccupancyGrid::sample(&region, 1.0, 1e-4).unwrap();

        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cols(), 10);
        // Row-0/col-0 anchors lie on the outer boundary and still count
        assert_eq!(grid.available_count(), 50);
    }

    #[test]
    fn test_hole_cells_unavailable() {
        let grid = OccupancyGrid::sample(&holed_region(), 1.0, 1e-4).unwrap();

        assert_eq!(grid.available_count(), 46);
        assert!(!grid.is_available(2, 4));
        assert!(!grid.is_available(3, 5));
        assert!(grid.is_available(1, 4));
        assert!(grid.is_available(2, 3));
    }

    #[test]
    fn test_sampling_is_idempotent() {
        let region = holed_region();
        let a = OccupancyGrid::sample(&region, 1.0, 1e-4).unwrap();
        let b = OccupancyGrid::sample(&region, 1.0, 1e-4).unwrap();
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn test_hole_edge_points_unavailable() {
        // Hole edges pass exactly through lattice points: all nine anchors
        // (rows 2..=4, cols 4..=6) are on or inside the opening and blocked
        let region = Region::with_holes(rect(0.0, 0.0, 10.0, 5.0), vec![rect(4.0, 2.0, 6.0, 4.0)]);
        let grid = OccupancyGrid::sample(&region, 1.0, 1e-4).unwrap();

        assert_eq!(grid.available_count(), 41);
        for row in 2..=4 {
            for col in 4..=6 {
                assert!(!grid.is_available(row, col));
            }
        }
    }

    #[test]
    fn test_degenerate_region_fails() {
        let region = Region::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(OccupancyGrid::sample(&region, 1.0, 1e-4).is_err());
    }

    #[test]
    fn test_cell_anchor() {
        let region = Region::new(rect(2.0, 3.0, 12.0, 8.0));
        let grid = OccupancyGrid::sample(&region, 1.0, 1e-4).unwrap();
        assert_eq!(grid.cell_anchor(0, 0), Point2::new(2.0, 3.0));
        assert_eq!(grid.cell_anchor(2, 5), Point2::new(7.0, 5.0));
    }
}
