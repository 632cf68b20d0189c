// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Maximal rectangle decomposition
//!
//! Repeatedly extracts the largest all-available axis-aligned rectangle
//! from an occupancy grid until no available cell remains. Per pass:
//! per-column height accumulation swept row by row, with the monotonic
//! stack "largest rectangle in histogram" subroutine at each row.
//!
//! The sampled grid stays immutable; consumption is tracked in a bitset
//! local to one decomposition run, so concurrent layouts over the same
//! grid cannot observe each other. The extraction loop is iterative, not
//! recursive - worst case it runs once per cell, which is the documented
//! hot path for very large faces at fine pitch.
//!
//! Determinism: the row-major sweep with strict `>` comparisons resolves
//! area ties to the topmost, then leftmost candidate, so decomposition
//! output is reproducible cell for cell.

use crate::grid::OccupancyGrid;

/// Inclusive cell range extracted from an occupancy grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRect {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
}

impl CellRect {
    /// Number of rows covered
    pub fn rows(&self) -> usize {
        self.row_end - self.row_start + 1
    }

    /// Number of columns covered
    pub fn cols(&self) -> usize {
        self.col_end - self.col_start + 1
    }

    /// Covered area in cells
    pub fn area(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Cell-range intersection test
    pub fn intersects(&self, other: &CellRect) -> bool {
        self.row_start <= other.row_end
            && self.row_end >= other.row_start
            && self.col_start <= other.col_end
            && self.col_end >= other.col_start
    }
}

/// Best rectangle found in one histogram pass
struct HistRect {
    area: usize,
    col_start: usize,
    col_end: usize,
    height: usize,
}

/// Largest rectangle under a histogram, via monotonic stack
///
/// One sentinel pass beyond the end flushes the stack. The best
/// candidate's own height is recorded with it, so the caller can recover
/// the rectangle's top row exactly.
fn largest_rect_in_histogram(heights: &[usize]) -> HistRect {
    let mut stack: Vec<usize> = Vec::with_capacity(heights.len());
    let mut best = HistRect {
        area: 0,
        col_start: 0,
        col_end: 0,
        height: 0,
    };

    for i in 0..=heights.len() {
        let h = if i == heights.len() { 0 } else { heights[i] };

        while let Some(&top) = stack.last() {
            if h >= heights[top] {
                break;
            }
            stack.pop();

            let height = heights[top];
            let col_start = stack.last().map(|&j| j + 1).unwrap_or(0);
            let area = height * (i - col_start);

            if area > best.area {
                best = HistRect {
                    area,
                    col_start,
                    col_end: i - 1,
                    height,
                };
            }
        }
        stack.push(i);
    }

    best
}

/// Find the largest available rectangle not yet consumed
///
/// Returns `None` when no available cell remains.
pub fn maximal_rectangle(grid: &OccupancyGrid, consumed: &[bool]) -> Option<CellRect> {
    let rows = grid.rows();
    let cols = grid.cols();
    let mut heights = vec![0usize; cols];

    let mut best: Option<CellRect> = None;
    let mut best_area = 0usize;

    for row in 0..rows {
        for col in 0..cols {
            let free = grid.is_available(row, col) && !consumed[grid.index(row, col)];
            heights[col] = if free { heights[col] + 1 } else { 0 };
        }

        let hist = largest_rect_in_histogram(&heights);
        if hist.area > best_area {
            best_area = hist.area;
            best = Some(CellRect {
                row_start: row + 1 - hist.height,
                col_start: hist.col_start,
                row_end: row,
                col_end: hist.col_end,
            });
        }
    }

    best
}

/// Decompose a grid into maximal rectangles until exhaustion
///
/// Emitted rectangles are disjoint and together cover exactly the grid's
/// available cells. Ordered by extraction, largest area first.
pub fn decompose(grid: &OccupancyGrid) -> Vec<CellRect> {
    let mut consumed = vec![false; grid.rows() * grid.cols()];
    let mut rects = Vec::new();

    while let Some(rect) = maximal_rectangle(grid, &consumed) {
        for row in rect.row_start..=rect.row_end {
            for col in rect.col_start..=rect.col_end {
                consumed[grid.index(row, col)] = true;
            }
        }
        rects.push(rect);
    }

    rects
}
