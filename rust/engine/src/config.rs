// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration
//!
//! One engine, configuration flags. Pitch, module catalog, boundary epsilon
//! and the rectification toggle are the only knobs; everything else is
//! derived per region.

use crate::error::{Error, Result};

/// Default grid pitch (100 mm in millimeter-unit models)
pub const DEFAULT_PITCH: f64 = 100.0;

/// Boundary epsilon as a fraction of pitch
pub const BOUNDARY_EPSILON_RATIO: f64 = 1e-4;

/// Tile size descriptor
///
/// Read-only configuration; the packer never mutates modules at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    /// Extent along the rectangle's length axis (U)
    pub length: f64,
    /// Extent along the rectangle's width axis (V)
    pub width: f64,
}

impl Module {
    /// Square module
    pub fn square(size: f64) -> Self {
        Self {
            length: size,
            width: size,
        }
    }
}

/// Default module catalog: 300 / 200 / 100, descending
pub fn default_modules() -> Vec<Module> {
    vec![
        Module::square(300.0),
        Module::square(200.0),
        Module::square(100.0),
    ]
}

/// Layout engine configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Grid sample spacing in plane units
    pub pitch: f64,
    /// Boundary band half-width for point classification
    pub epsilon: f64,
    /// Candidate tile sizes, strictly descending
    pub modules: Vec<Module>,
    /// Reconstruct exact rectangles beside boundary-touching openings
    pub rectify: bool,
}

impl EngineConfig {
    /// Configuration at a given pitch, epsilon derived proportionally
    pub fn with_pitch(pitch: f64) -> Self {
        Self {
            pitch,
            epsilon: pitch * BOUNDARY_EPSILON_RATIO,
            modules: default_modules(),
            rectify: true,
        }
    }

    /// Replace the module catalog
    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = modules;
        self
    }

    /// Check the configuration invariants
    ///
    /// Pitch and epsilon must be positive, the catalog non-empty and
    /// strictly descending on both axes. The greedy packer depends on the
    /// ordering; an unordered catalog would silently under-fill.
    pub fn validate(&self) -> Result<()> {
        if !(self.pitch > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "Pitch must be positive, got {}",
                self.pitch
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "Epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.modules.is_empty() {
            return Err(Error::InvalidConfig("Module catalog is empty".to_string()));
        }
        for module in &self.modules {
            if !(module.length > 0.0) || !(module.width > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "Module sizes must be positive, got {}x{}",
                    module.length, module.width
                )));
            }
        }
        for pair in self.modules.windows(2) {
            if pair[1].length >= pair[0].length || pair[1].width >= pair[0].width {
                return Err(Error::InvalidConfig(
                    "Module catalog must be strictly descending".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_pitch(DEFAULT_PITCH)
    }
}
