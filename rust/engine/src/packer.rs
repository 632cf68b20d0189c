// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Greedy multi-size tile packing
//!
//! Each axis of a target rectangle is decomposed independently against the
//! descending module catalog: take as many of the largest size as fit,
//! carry the remainder to the next size, and leave the final sub-minimum
//! remainder untiled. Partial or clipped modules are never placed; the
//! untiled margin is a design choice, not an accident.
//!
//! Placement enumeration walks width bands in the outer loop and length
//! bands in the inner loop, advancing a cursor by each placed tile and
//! resetting it to the length-axis start at every band end.

use crate::config::Module;
use crate::placement::Placement;
use nalgebra::Point2;
use smallvec::SmallVec;

/// One run of equally sized modules along an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Module extent along this axis
    pub size: f64,
    /// Number of modules in the run
    pub count: usize,
}

/// Greedy axis decomposition result
#[derive(Debug, Clone)]
pub struct AxisFill {
    /// Bands in catalog order (largest size first)
    pub bands: SmallVec<[Band; 4]>,
    /// Untiled remainder, smaller than the smallest catalog size
    pub remainder: f64,
}

impl AxisFill {
    /// Total tiled extent along the axis
    pub fn tiled_extent(&self) -> f64 {
        self.bands
            .iter()
            .map(|band| band.size * band.count as f64)
            .sum()
    }
}

/// Decompose an extent over a descending size list
///
/// `count_i = floor(remaining / size_i)`, remainder carried to the next
/// size. The remainder is tracked by subtraction rather than float modulo
/// so the conservation property `tiled + remainder == extent` holds to
/// floating point exactness in tests.
pub fn decompose_axis(extent: f64, sizes: impl Iterator<Item = f64>) -> AxisFill {
    let mut remaining = extent.max(0.0);
    let mut bands = SmallVec::new();

    for size in sizes {
        let count = (remaining / size).floor() as usize;
        remaining -= count as f64 * size;
        bands.push(Band { size, count });
    }

    AxisFill {
        bands,
        remainder: remaining,
    }
}

/// Packed rectangle result
#[derive(Debug, Clone)]
pub struct PackResult {
    /// One placement per physical tile, in emission order
    pub placements: Vec<Placement>,
    /// Untiled strip along the length axis
    pub leftover_length: f64,
    /// Untiled strip along the width axis
    pub leftover_width: f64,
}

impl PackResult {
    /// Total footprint of the placed tiles
    pub fn placed_area(&self) -> f64 {
        self.placements.iter().map(|p| p.length * p.width).sum()
    }
}

/// Pack a rectangle with the module catalog
///
/// `origin` is the rectangle's minimum (u, v) corner; `length` runs along
/// U, `width` along V. Module lengths fill the length axis and module
/// widths the width axis, so mixed-size tiles (e.g. 300x100) appear at the
/// band crossings exactly as the greedy cascade dictates.
pub fn pack(origin: Point2<f64>, length: f64, width: f64, modules: &[Module]) -> PackResult {
    let length_fill = decompose_axis(length, modules.iter().map(|m| m.length));
    let width_fill = decompose_axis(width, modules.iter().map(|m| m.width));

    let mut placements = Vec::new();
    let mut v = origin.y;

    for width_band in &width_fill.bands {
        for _ in 0..width_band.count {
            let mut u = origin.x;
            for length_band in &length_fill.bands {
                for _ in 0..length_band.count {
                    placements.push(Placement {
                        origin: Point2::new(u, v),
                        length: length_band.size,
                        width: width_band.size,
                        rotation: 0.0,
                    });
                    u += length_band.size;
                }
            }
            v += width_band.size;
        }
    }

    PackResult {
        placements,
        leftover_length: length_fill.remainder,
        leftover_width: width_fill.remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_modules;
    use approx::assert_relative_eq;

    fn sizes() -> impl Iterator<Item = f64> {
        default_modules().into_iter().map(|m| m.length)
    }

    #[test]
    fn test_decompose_950() {
        let fill = decompose_axis(950.0, sizes());
        let counts: Vec<usize> = fill.bands.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 0, 0]);
        assert_relative_eq!(fill.remainder, 50.0, epsilon = 1e-9);
        assert_relative_eq!(fill.tiled_extent(), 900.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decompose_430() {
        let fill = decompose_axis(430.0, sizes());
        let counts: Vec<usize> = fill.bands.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1]);
        assert_relative_eq!(fill.remainder, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decompose_exact_fit() {
        let fill = decompose_axis(600.0, sizes());
        let counts: Vec<usize> = fill.bands.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 0, 0]);
        assert_relative_eq!(fill.remainder, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decompose_below_minimum() {
        let fill = decompose_axis(70.0, sizes());
        assert!(fill.bands.iter().all(|b| b.count == 0));
        assert_relative_eq!(fill.remainder, 70.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pack_conservation_950_430() {
        // Length 950 -> 3x300 rem 50; width 430 -> 1x300 + 1x100 rem 30.
        // Two width bands of three tiles each: 6 tiles.
        let result = pack(Point2::new(0.0, 0.0), 950.0, 430.0, &default_modules());

        assert_eq!(result.placements.len(), 6);
        assert_relative_eq!(result.leftover_length, 50.0, epsilon = 1e-9);
        assert_relative_eq!(result.leftover_width, 30.0, epsilon = 1e-9);

        // Placed area + leftover strips = full rectangle
        let leftover_area = result.leftover_length * 430.0
            + result.leftover_width * 950.0
            - result.leftover_length * result.leftover_width;
        assert_relative_eq!(
            result.placed_area() + leftover_area,
            950.0 * 430.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_pack_cursor_positions() {
        let result = pack(Point2::new(10.0, 20.0), 950.0, 430.0, &default_modules());

        // First band: three 300x300 tiles left to right
        assert_eq!(result.placements[0].origin, Point2::new(10.0, 20.0));
        assert_eq!(result.placements[1].origin, Point2::new(310.0, 20.0));
        assert_eq!(result.placements[2].origin, Point2::new(610.0, 20.0));
        assert_relative_eq!(result.placements[0].width, 300.0);

        // Second band: cursor reset to the length start, advanced one band
        // width, tiles are 300x100
        assert_eq!(result.placements[3].origin, Point2::new(10.0, 320.0));
        assert_relative_eq!(result.placements[3].width, 100.0);
        assert_relative_eq!(result.placements[3].length, 300.0);
    }

    #[test]
    fn test_pack_empty_when_too_small() {
        let result = pack(Point2::new(0.0, 0.0), 90.0, 90.0, &default_modules());
        assert!(result.placements.is_empty());
        assert_relative_eq!(result.leftover_length, 90.0, epsilon = 1e-9);
    }
}
