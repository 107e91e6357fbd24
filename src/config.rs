//! Inside tree configuration types.
//!
//! Defines how geometries are turned into S2 coverings before they are
//! inserted into the trie.

use crate::cell::MAX_LEVEL;
use crate::error::{InsideTreeError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for S2 covering generation.
///
/// Controls the granularity and cell count of S2 coverings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveringConfig {
    /// Minimum S2 cell level (1-30). Lower = coarser cells.
    /// Default: 1 (whole faces are never emitted)
    pub min_level: u8,

    /// Maximum S2 cell level (1-30). Higher = finer cells.
    /// Default: 22 (roughly 2m cells)
    pub max_level: u8,

    /// Maximum number of cells in a covering.
    /// More cells = tighter fit but more trie paths per geometry.
    /// Default: 100
    pub max_cells: usize,
}

impl Default for CoveringConfig {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: 22,
            max_cells: 100,
        }
    }
}

impl CoveringConfig {
    /// Check that the level bounds and cell budget are usable.
    pub fn validate(&self) -> Result<()> {
        if self.min_level == 0 {
            return Err(InsideTreeError::Config(
                "min_level must be at least 1".into(),
            ));
        }
        if self.max_level > MAX_LEVEL {
            return Err(InsideTreeError::Config(format!(
                "max_level {} exceeds S2 maximum level {}",
                self.max_level, MAX_LEVEL
            )));
        }
        if self.min_level > self.max_level {
            return Err(InsideTreeError::Config(format!(
                "min_level {} is finer than max_level {}",
                self.min_level, self.max_level
            )));
        }
        if self.max_cells == 0 {
            return Err(InsideTreeError::Config("max_cells must be positive".into()));
        }
        Ok(())
    }
}

/// Configuration for building an inside tree from geometries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// S2 covering configuration.
    pub covering: CoveringConfig,

    /// Whether POINT geometries are indexed (at `covering.max_level`).
    /// Default: false (points are query inputs, not regions).
    pub index_points: bool,
}

impl IndexConfig {
    /// Create a config with default covering settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set S2 covering configuration.
    pub fn with_covering(mut self, covering: CoveringConfig) -> Self {
        self.covering = covering;
        self
    }

    /// Enable indexing of POINT geometries.
    pub fn with_index_points(mut self, index_points: bool) -> Self {
        self.index_points = index_points;
        self
    }
}
