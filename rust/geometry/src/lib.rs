//! Tilelayout Geometry
//!
//! Plane-local 2D geometry for wall tile layout: plane frames, polygon
//! primitives, regions with openings, and opening-boundary recovery via
//! 2D boolean difference.

pub mod error;
pub mod extract;
pub mod frame;
pub mod polygon;
pub mod region;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use extract::openings_from_difference;
pub use frame::PlaneFrame;
pub use polygon::PointClass;
pub use region::Region;
