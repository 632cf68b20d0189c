use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a single region's layout
///
/// Per-tile and per-hole problems are not errors; they accumulate as
/// [`Diagnostic`] entries on the plan or report instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Geometry error: {0}")]
    Geometry(#[from] tilelayout_geometry::Error),
}

/// Non-fatal problems accumulated during layout and emission
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A hole contour violated the containment invariant and was discarded
    InconsistentHole { hole_index: usize },
    /// An opening was skipped by boundary rectification
    RectificationSkipped { hole_index: usize, reason: String },
    /// The host sink rejected one tile; packing continued
    PlacementFailed { placement_index: usize, reason: String },
}
