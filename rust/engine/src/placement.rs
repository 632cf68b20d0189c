// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placements and the host sink boundary
//!
//! A `Placement` is one tile in plane-local coordinates; `WorldPlacement`
//! is the same tile after mapping through the face's `PlaneFrame`. The
//! engine hands world placements to a caller-supplied [`PlacementSink`]
//! and never retains them, keeping the geometry kernel decoupled from any
//! host catalog or family lookup.

use nalgebra::{Point2, Point3, Vector2, Vector3};
use thiserror::Error;
use tilelayout_geometry::PlaneFrame;

/// One tile in plane-local (u, v) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Minimum (u, v) corner
    pub origin: Point2<f64>,
    /// Extent along U
    pub length: f64,
    /// Extent along V
    pub width: f64,
    /// In-plane rotation in radians (0 for axis-aligned layouts)
    pub rotation: f64,
}

impl Placement {
    /// Map into world space through a plane frame
    pub fn to_world(&self, frame: &PlaneFrame) -> WorldPlacement {
        let (sin, cos) = self.rotation.sin_cos();
        let length_dir = frame.unproject_dir(&Vector2::new(cos, sin));
        let width_dir = frame.unproject_dir(&Vector2::new(-sin, cos));

        WorldPlacement {
            origin: frame.unproject(&self.origin),
            length_dir,
            width_dir,
            length: self.length,
            width: self.width,
        }
    }
}

/// One tile mapped into the host's 3D frame
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPlacement {
    /// Tile corner in world space
    pub origin: Point3<f64>,
    /// Unit direction of the tile's length edge
    pub length_dir: Vector3<f64>,
    /// Unit direction of the tile's width edge
    pub width_dir: Vector3<f64>,
    pub length: f64,
    pub width: f64,
}

/// Error returned by a host sink for a single tile
///
/// Recoverable by design: the emitter logs it, records a diagnostic and
/// keeps going. A single failed placement never aborts the batch.
#[derive(Error, Debug, Clone)]
#[error("Placement rejected by host: {0}")]
pub struct SinkError(pub String);

/// Host placement collaborator
///
/// Implemented by the CAD host adapter; called once per tile. The host's
/// transaction is the unit of atomicity, not the engine's, so the sink is
/// expected to be acquired once per batch and committed after the last
/// placement.
pub trait PlacementSink {
    fn place(&mut self, placement: &WorldPlacement) -> Result<(), SinkError>;
}

/// Sink that records placements in memory, for tests and dry runs
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub placed: Vec<WorldPlacement>,
}

impl PlacementSink for CollectingSink {
    fn place(&mut self, placement: &WorldPlacement) -> Result<(), SinkError> {
        self.placed.push(placement.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_world_on_vertical_wall() {
        // Wall face in the XZ plane: U along +X, V along +Z
        let frame = PlaneFrame::new(
            Point3::new(1.0, 2.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        )
        .unwrap();

        let placement = Placement {
            origin: Point2::new(3.0, 0.5),
            length: 0.3,
            width: 0.1,
            rotation: 0.0,
        };

        let world = placement.to_world(&frame);
        assert_relative_eq!(world.origin.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(world.origin.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(world.origin.z, 0.5, epsilon = 1e-12);
        assert_relative_eq!(world.length_dir.dot(&Vector3::x()), 1.0, epsilon = 1e-12);
        assert_relative_eq!(world.width_dir.dot(&Vector3::z()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_collecting_sink() {
        let frame = PlaneFrame::new(Point3::origin(), Vector3::x(), Vector3::y()).unwrap();
        let mut sink = CollectingSink::default();

        let placement = Placement {
            origin: Point2::new(0.0, 0.0),
            length: 1.0,
            width: 1.0,
            rotation: 0.0,
        };
        sink.place(&placement.to_world(&frame)).unwrap();
        assert_eq!(sink.placed.len(), 1);
    }
}
