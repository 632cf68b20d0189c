// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary rectification
//!
//! Grid decomposition quantizes everything to the pitch, which
//! mis-represents the thin strips beside a door or window that touches the
//! outer boundary. For such openings this pass reconstructs the exact
//! rectangles between each vertical opening edge and the nearest outer
//! edge on the same side, capped by the opening's horizontal edges. The
//! resulting rectangles override the grid rectangles they overlap.
//!
//! Supported configuration: axis-aligned openings with no second opening
//! edge inside the search corridor. Anything else is skipped with a
//! diagnostic and the grid decomposition output stands untouched.

use crate::error::Diagnostic;
use nalgebra::Point2;
use rustc_hash::FxHashMap;
use tilelayout_geometry::polygon::contour_bounds;
use tilelayout_geometry::Region;

/// Axis-aligned rectangle in plane coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect2 {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect2 {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Extent along U
    pub fn length(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along V
    pub fn width(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Interior overlap test; shared edges do not count
    pub fn intersects(&self, other: &Rect2, epsilon: f64) -> bool {
        self.min.x < other.max.x - epsilon
            && self.max.x > other.min.x + epsilon
            && self.min.y < other.max.y - epsilon
            && self.max.y > other.min.y + epsilon
    }

    /// Corner loop, counter-clockwise from the minimum corner
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }
}

/// Orientation bucket for an axis-parallel contour edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeSide {
    /// Horizontal, on the upper side of the contour
    Up,
    /// Horizontal, on the lower side
    Down,
    /// Vertical, on the left side
    Left,
    /// Vertical, on the right side
    Right,
}

/// Axis-parallel edge reduced to its fixed coordinate and span
#[derive(Debug, Clone, Copy)]
struct AxisEdge {
    side: EdgeSide,
    /// x for Left/Right edges, y for Up/Down edges
    coord: f64,
    /// Range along the edge's own direction (y-range or x-range)
    span: (f64, f64),
}

/// Rectification output
#[derive(Debug, Default)]
pub struct RectifyOutcome {
    /// Exact rectangles to pack instead of the grid rects they overlap
    pub rects: Vec<Rect2>,
    /// Skipped openings, with reasons
    pub diagnostics: Vec<Diagnostic>,
}

/// Bucket a closed contour's edges into Up/Down/Left/Right
///
/// Returns `None` when any edge is not parallel to a principal axis
/// (within epsilon); rectification does not guess at skewed openings.
fn classify_axis_edges(contour: &[Point2<f64>], epsilon: f64) -> Option<Vec<AxisEdge>> {
    let (min, max) = contour_bounds(contour)?;
    let mid_x = (min.x + max.x) * 0.5;
    let mid_y = (min.y + max.y) * 0.5;

    let n = contour.len();
    let mut edges = Vec::with_capacity(n);

    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        let dx = (b.x - a.x).abs();
        let dy = (b.y - a.y).abs();

        if dy <= epsilon && dx > epsilon {
            // Horizontal
            let side = if a.y >= mid_y { EdgeSide::Up } else { EdgeSide::Down };
            edges.push(AxisEdge {
                side,
                coord: a.y,
                span: (a.x.min(b.x), a.x.max(b.x)),
            });
        } else if dx <= epsilon && dy > epsilon {
            // Vertical
            let side = if a.x >= mid_x { EdgeSide::Right } else { EdgeSide::Left };
            edges.push(AxisEdge {
                side,
                coord: a.x,
                span: (a.y.min(b.y), a.y.max(b.y)),
            });
        } else if dx <= epsilon && dy <= epsilon {
            // Zero-length edge, ignore
        } else {
            return None;
        }
    }

    Some(edges)
}

fn spans_overlap(a: (f64, f64), b: (f64, f64), epsilon: f64) -> bool {
    a.0 < b.1 - epsilon && a.1 > b.0 + epsilon
}

/// Reconstruct exact rectangles beside boundary-touching openings
pub fn rectify_openings(region: &Region, epsilon: f64) -> RectifyOutcome {
    let mut outcome = RectifyOutcome::default();

    let Some(outer_edges) = classify_axis_edges(&region.outer, epsilon) else {
        tracing::debug!("Outer boundary is not axis-aligned, rectification disabled");
        return outcome;
    };
    let Some((outer_min, outer_max)) = contour_bounds(&region.outer) else {
        return outcome;
    };

    // All vertical opening edges, for adjacency detection. Edges are also
    // grouped by quantized coordinate: two openings sharing a vertical
    // line is the stacked configuration the source never resolved.
    let mut vertical_edges: Vec<(usize, AxisEdge)> = Vec::new();
    let mut by_coord: FxHashMap<i64, Vec<usize>> = FxHashMap::default();
    let quantize = |coord: f64| -> i64 { (coord / epsilon.max(1e-12)).round() as i64 };

    let mut hole_edges: Vec<Option<Vec<AxisEdge>>> = Vec::with_capacity(region.holes.len());
    for (hole_idx, hole) in region.holes.iter().enumerate() {
        let edges = classify_axis_edges(hole, epsilon);
        if let Some(edges) = &edges {
            for edge in edges {
                if matches!(edge.side, EdgeSide::Left | EdgeSide::Right) {
                    by_coord.entry(quantize(edge.coord)).or_default().push(hole_idx);
                    vertical_edges.push((hole_idx, *edge));
                }
            }
        }
        hole_edges.push(edges);
    }

    for (hole_idx, hole) in region.holes.iter().enumerate() {
        let Some(edges) = &hole_edges[hole_idx] else {
            tracing::warn!(hole_index = hole_idx, "Skipping non-axis-aligned opening");
            outcome.diagnostics.push(Diagnostic::RectificationSkipped {
                hole_index: hole_idx,
                reason: "opening is not axis-aligned".to_string(),
            });
            continue;
        };

        let Some((hole_min, hole_max)) = contour_bounds(hole) else {
            continue;
        };

        // Interior openings are represented well enough by the grid
        let touches = hole_min.y <= outer_min.y + epsilon
            || hole_max.y >= outer_max.y - epsilon
            || hole_min.x <= outer_min.x + epsilon
            || hole_max.x >= outer_max.x - epsilon;
        if !touches {
            continue;
        }

        // Stacked openings sharing a vertical line: unsupported
        let stacked = edges.iter().any(|edge| {
            matches!(edge.side, EdgeSide::Left | EdgeSide::Right)
                && by_coord
                    .get(&quantize(edge.coord))
                    .is_some_and(|holes| holes.iter().any(|&h| h != hole_idx))
        });
        if stacked {
            tracing::warn!(
                hole_index = hole_idx,
                "Skipping opening stacked with another on the same vertical line"
            );
            outcome.diagnostics.push(Diagnostic::RectificationSkipped {
                hole_index: hole_idx,
                reason: "stacked openings share a vertical edge line".to_string(),
            });
            continue;
        }

        let mut skipped = false;
        let mut candidates: Vec<Rect2> = Vec::new();

        for edge in edges.iter().filter(|e| matches!(e.side, EdgeSide::Left | EdgeSide::Right)) {
            // Nearest outer vertical edge on the same side, by projected
            // distance along U
            let nearest = outer_edges
                .iter()
                .filter(|outer| {
                    matches!(outer.side, EdgeSide::Left | EdgeSide::Right)
                        && spans_overlap(outer.span, edge.span, epsilon)
                        && match edge.side {
                            EdgeSide::Left => outer.coord < edge.coord - epsilon,
                            _ => outer.coord > edge.coord + epsilon,
                        }
                })
                .min_by(|a, b| {
                    let da = (a.coord - edge.coord).abs();
                    let db = (b.coord - edge.coord).abs();
                    da.total_cmp(&db)
                });

            let Some(outer_edge) = nearest else {
                continue;
            };

            // A vertical edge of another opening inside the corridor means
            // the strip is bounded by that opening, not the outer wall;
            // the source never resolved this case and neither do we.
            let lo = edge.coord.min(outer_edge.coord);
            let hi = edge.coord.max(outer_edge.coord);
            let blocked = vertical_edges.iter().any(|(other_idx, other)| {
                *other_idx != hole_idx
                    && other.coord > lo + epsilon
                    && other.coord < hi - epsilon
                    && spans_overlap(other.span, edge.span, epsilon)
            });
            if blocked {
                tracing::warn!(
                    hole_index = hole_idx,
                    "Skipping opening with an adjacent opening in the rectification corridor"
                );
                outcome.diagnostics.push(Diagnostic::RectificationSkipped {
                    hole_index: hole_idx,
                    reason: "adjacent opening inside the rectification corridor".to_string(),
                });
                skipped = true;
                break;
            }

            // Perpendicular projection: the candidate spans the opening
            // edge's own range between the two vertical lines
            let candidate = Rect2::new(
                Point2::new(lo, edge.span.0),
                Point2::new(hi, edge.span.1),
            );

            if candidate.length() <= epsilon || candidate.width() <= epsilon {
                continue;
            }

            // The candidate must be capped by one of the opening's
            // horizontal edges, and its interior must be real material
            let capped = edges.iter().any(|cap| {
                matches!(cap.side, EdgeSide::Up | EdgeSide::Down)
                    && ((cap.coord - candidate.max.y).abs() <= epsilon
                        || (cap.coord - candidate.min.y).abs() <= epsilon)
            });
            if !capped {
                continue;
            }

            if region.contains(&candidate.center(), epsilon) {
                candidates.push(candidate);
            }
        }

        if !skipped {
            outcome.rects.extend(candidates);
        }
    }

    outcome
}
