// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout engine facade
//!
//! One engine, one pipeline: sample the occupancy grid, decompose it into
//! maximal rectangles, optionally rectify boundary-touching openings, pack
//! every rectangle with the module catalog, and emit placements through
//! the host sink. The engine is stateless between invocations; the grid
//! and rectangle lists live and die inside one `layout` call.

use crate::config::EngineConfig;
use crate::decompose::{decompose, CellRect};
use crate::error::{Diagnostic, Result};
use crate::grid::OccupancyGrid;
use crate::packer::pack;
use crate::placement::{Placement, PlacementSink};
use crate::rectify::{rectify_openings, Rect2};
use nalgebra::Point2;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tilelayout_geometry::{PlaneFrame, Region};

/// Result of laying out one region
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    /// Raw grid decomposition, before rectification overrides
    pub cell_rects: Vec<CellRect>,
    /// Final packed rectangles in plane coordinates
    pub rects: Vec<Rect2>,
    /// One entry per tile, in emission order
    pub placements: Vec<Placement>,
    /// Non-fatal problems encountered during layout
    pub diagnostics: Vec<Diagnostic>,
    /// Available cells in the sampled grid
    pub available_cells: usize,
    /// Wall-clock time spent on this region
    pub elapsed: Duration,
}

impl LayoutPlan {
    /// Total footprint of the planned tiles
    pub fn placed_area(&self) -> f64 {
        self.placements.iter().map(|p| p.length * p.width).sum()
    }

    /// Corner loops of the packed rectangles, for host-side inspection
    /// lines around each decomposed area
    pub fn outlines_uv(&self) -> impl Iterator<Item = [Point2<f64>; 4]> + '_ {
        self.rects.iter().map(|r| r.corners())
    }
}

/// Result of emitting one plan to a host sink
#[derive(Debug, Clone)]
pub struct LayoutReport {
    /// Tiles offered to the sink
    pub attempted: usize,
    /// Tiles the sink accepted
    pub placed: usize,
    /// One entry per rejected tile
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutReport {
    /// True when every tile was accepted
    pub fn is_complete(&self) -> bool {
        self.placed == self.attempted
    }
}

/// Tile layout engine
///
/// Holds only immutable configuration, so one engine can serve many
/// regions, sequentially or in parallel.
#[derive(Debug, Clone)]
pub struct TileEngine {
    config: EngineConfig,
}

impl TileEngine {
    /// Create an engine, validating the configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lay out one region
    ///
    /// Fails with `InvalidRegion` for a degenerate outer boundary; hole
    /// inconsistencies and skipped rectifications are diagnostics on the
    /// returned plan, never failures.
    pub fn layout(&self, region: &Region) -> Result<LayoutPlan> {
        let start = Instant::now();
        let mut diagnostics = Vec::new();

        // Containment invariant first: inconsistent holes are dropped, not
        // fatal, but must be recorded against their original index
        let mut region = region.clone();
        for hole_index in region.retain_contained_holes(self.config.epsilon) {
            diagnostics.push(Diagnostic::InconsistentHole { hole_index });
        }

        let grid = OccupancyGrid::sample(&region, self.config.pitch, self.config.epsilon)?;
        let available_cells = grid.available_count();
        tracing::debug!(
            rows = grid.rows(),
            cols = grid.cols(),
            available = available_cells,
            "Sampled occupancy grid"
        );

        let cell_rects = decompose(&grid);
        tracing::debug!(rect_count = cell_rects.len(), "Grid decomposition complete");

        // Rectification overrides the grid rects it overlaps
        let mut rects: Vec<Rect2> = Vec::with_capacity(cell_rects.len());
        let rectified = if self.config.rectify && !region.holes.is_empty() {
            let outcome = rectify_openings(&region, self.config.epsilon);
            diagnostics.extend(outcome.diagnostics);
            outcome.rects
        } else {
            Vec::new()
        };

        for cell_rect in &cell_rects {
            let uv = self.cell_rect_to_uv(&grid, cell_rect);
            let overridden = rectified
                .iter()
                .any(|r| r.intersects(&uv, self.config.epsilon));
            if !overridden {
                rects.push(uv);
            }
        }
        rects.extend(rectified.iter().copied());

        let mut placements = Vec::new();
        for rect in &rects {
            let packed = pack(rect.min, rect.length(), rect.width(), &self.config.modules);
            placements.extend(packed.placements);
        }

        let elapsed = start.elapsed();
        tracing::info!(
            rects = rects.len(),
            placements = placements.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Region layout complete"
        );

        Ok(LayoutPlan {
            cell_rects,
            rects,
            placements,
            diagnostics,
            available_cells,
            elapsed,
        })
    }

    /// Emit a plan's placements through the host sink
    ///
    /// Each tile is offered once; rejections are logged, recorded and
    /// skipped, so a single failed placement never aborts the batch. The
    /// caller owns transactional semantics around the whole emission.
    pub fn emit(
        &self,
        plan: &LayoutPlan,
        frame: &PlaneFrame,
        sink: &mut dyn PlacementSink,
    ) -> LayoutReport {
        let mut placed = 0usize;
        let mut diagnostics = Vec::new();

        for (index, placement) in plan.placements.iter().enumerate() {
            let world = placement.to_world(frame);
            match sink.place(&world) {
                Ok(()) => placed += 1,
                Err(err) => {
                    tracing::warn!(
                        placement_index = index,
                        error = %err,
                        "Host rejected placement, continuing"
                    );
                    diagnostics.push(Diagnostic::PlacementFailed {
                        placement_index: index,
                        reason: err.0,
                    });
                }
            }
        }

        LayoutReport {
            attempted: plan.placements.len(),
            placed,
            diagnostics,
        }
    }

    /// Lay out several regions sequentially
    ///
    /// One region's failure never aborts the rest.
    pub fn layout_batch(&self, regions: &[Region]) -> Vec<Result<LayoutPlan>> {
        regions.iter().map(|region| self.layout(region)).collect()
    }

    /// Lay out several regions in parallel
    ///
    /// Safe because each invocation only shares the immutable
    /// configuration; grids and rectangle lists are per-call.
    pub fn par_layout_batch(&self, regions: &[Region]) -> Vec<Result<LayoutPlan>> {
        regions
            .par_iter()
            .map(|region| self.layout(region))
            .collect()
    }

    fn cell_rect_to_uv(&self, grid: &OccupancyGrid, rect: &CellRect) -> Rect2 {
        let min = grid.cell_anchor(rect.row_start, rect.col_start);
        let pitch = grid.pitch();
        Rect2::new(
            min,
            Point2::new(
                min.x + rect.cols() as f64 * pitch,
                min.y + rect.rows() as f64 * pitch,
            ),
        )
    }
}
