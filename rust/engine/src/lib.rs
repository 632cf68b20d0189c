//! Tilelayout Engine
//!
//! Decomposes a bounded planar region (a wall face with openings) into
//! maximal axis-aligned rectangles and packs them with a greedy multi-size
//! tile layout. Host concerns - documents, families, transactions - stay
//! behind the [`PlacementSink`] boundary.

pub mod config;
pub mod decompose;
pub mod engine;
pub mod error;
pub mod grid;
pub mod packer;
pub mod placement;
pub mod rectify;

// Re-export the geometry crate's surface for convenience
pub use tilelayout_geometry::{self as geometry, PlaneFrame, Point2, Point3, Region, Vector3};

pub use config::{default_modules, EngineConfig, Module};
pub use decompose::{decompose, maximal_rectangle, CellRect};
pub use engine::{LayoutPlan, LayoutReport, TileEngine};
pub use error::{Diagnostic, Error, Result};
pub use grid::OccupancyGrid;
pub use packer::{decompose_axis, pack, AxisFill, Band, PackResult};
pub use placement::{CollectingSink, Placement, PlacementSink, SinkError, WorldPlacement};
pub use rectify::{rectify_openings, Rect2, RectifyOutcome};
