//! S2 cell trie for point-in-region and nested-region lookups.
//!
//! This crate maps arbitrary payload values to regions of the sphere,
//! expressed as S2 cells, and answers two questions:
//!
//! - **Stab**: which values cover this point (or cell)?
//! - **Mask**: which values are nested inside this region?
//!
//! # Architecture
//!
//! Each region is decomposed into an S2 covering; the region's value is
//! attached to every covering cell in a trie whose shape mirrors the S2
//! hierarchy (6 faces, 4 children per cell, 30 levels).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     InsideTreeBuilder                      │
//! │   WKT ──► parse ──► ring validation ──► S2 covering        │
//! └────────────────────────────┬───────────────────────────────┘
//!                              │ insert(cell, value)
//!                              ▼
//!               InsideTree (6 face roots, 4-ary nodes)
//!                    │                        │
//!          stab(cell): root ──► cell   mask(cell): cell ──► subtree
//!                    │                        │
//!                    └──────────┬─────────────┘
//!                               ▼
//!                     ResultSet (dedup by value)
//! ```
//!
//! The tree is append-only and single-threaded; wrap it in a lock for
//! shared access.
//!
//! # Modules
//!
//! - [`cell`]: Cell addressing trait and S2 constants
//! - [`tree`]: The trie and its insert/stab/mask operations
//! - [`dedup`]: Per-query result deduplication
//! - [`covering`]: S2 point cells and region coverings
//! - [`geometry`]: WKT parsing and ring validation
//! - [`builder`]: Bulk loading from geometries
//! - [`config`]: Covering and index configuration
//! - [`error`]: Error types

pub mod cell;
pub mod config;
pub mod covering;
pub mod dedup;
pub mod error;
pub mod geometry;

mod builder;
mod tree;

// Re-export key types
pub use builder::{BuildStats, InsideTreeBuilder};
pub use cell::{CellAddress, CHILD_COUNT, FACE_COUNT, MAX_LEVEL};
pub use config::{CoveringConfig, IndexConfig};
pub use covering::{
    cell_for_point, cell_for_point_at_level, covering_for_geometry, covering_for_region,
    GeometryRegion,
};
pub use error::{InsideTreeError, Result};
pub use geometry::{parse_wkt, ring_from_coordinates, validate_ring, RingValidity};
pub use tree::{InsideTree, TreeStats};

pub use s2::cellid::CellID;
