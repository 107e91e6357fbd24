//! Error types for ingestion into the inside tree.
//!
//! The trie itself never fails; these errors come from the geometry and
//! covering collaborators that feed it.

use thiserror::Error;

/// Inside tree ingestion errors.
#[derive(Error, Debug)]
pub enum InsideTreeError {
    /// WKT parsing error.
    #[error("WKT parse error: {0}")]
    WktParse(String),

    /// Invalid geometry (e.g., self-intersecting or clockwise-only ring).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// S2 covering generation error.
    #[error("S2 covering error: {0}")]
    CoveringError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for inside tree operations.
pub type Result<T> = std::result::Result<T, InsideTreeError>;
