//! Inside tree builder.
//!
//! Builds an [`InsideTree`] from geometry data. The builder:
//! 1. Accepts (value, wkt) records
//! 2. Parses WKT and validates polygon rings
//! 3. Generates S2 cell coverings
//! 4. Inserts the value at every covering cell
//!
//! # Usage
//!
//! ```ignore
//! let mut builder = InsideTreeBuilder::new(IndexConfig::default());
//!
//! builder.add_geometry("27719949".to_string(), "POLYGON((...))")?;
//!
//! let tree = builder.build();
//! let hits = tree.stab(&cell_for_point(46.83704, -71.27751));
//! ```

use crate::cell::CellAddress;
use crate::config::IndexConfig;
use crate::covering::{covering_for_geometry, covering_for_region, GeometryRegion};
use crate::error::Result;
use crate::geometry::{exterior_ring, parse_wkt, validate_ring, GeometryType};
use crate::tree::InsideTree;
use geo_types::{Geometry, Polygon};
use s2::cellid::CellID;

/// Statistics collected during building.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of geometry records processed.
    pub records_processed: u64,

    /// Number of geometries inserted.
    pub geometries_added: u64,

    /// Number of records skipped (parse errors, invalid rings, points).
    pub records_skipped: u64,

    /// Total (cell, value) insertions.
    pub cells_indexed: u64,

    /// Number of points inserted.
    pub point_count: u64,

    /// Number of polygons inserted.
    pub polygon_count: u64,

    /// Number of other geometry types inserted.
    pub other_count: u64,
}

/// Builder for inside trees.
///
/// Accumulates geometry records into a tree that is queried once building
/// is done.
pub struct InsideTreeBuilder<V> {
    /// Configuration used for building.
    config: IndexConfig,

    /// Tree under construction.
    tree: InsideTree<V>,

    /// Build statistics.
    stats: BuildStats,
}

impl<V: Clone> InsideTreeBuilder<V> {
    /// Create a new builder with the given configuration.
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            tree: InsideTree::new(),
            stats: BuildStats::default(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Get current build statistics.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Add a geometry record to the tree.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the geometry was inserted
    /// - `Ok(false)` if skipped (WKT parse error, invalid ring, POINT when
    ///   `index_points=false`)
    ///
    /// Skips are logged and counted in `stats.records_skipped`, not
    /// propagated as errors, so batch loads continue past malformed input.
    /// Configuration errors are propagated.
    pub fn add_geometry(&mut self, value: V, wkt: &str) -> Result<bool> {
        self.stats.records_processed += 1;

        let geom = match parse_wkt(wkt) {
            Ok(g) => g,
            Err(e) => {
                self.stats.records_skipped += 1;
                tracing::debug!(error = %e, "Failed to parse WKT");
                return Ok(false);
            }
        };

        let geom_type = GeometryType::from_geometry(&geom);
        if geom_type.is_point() && !self.config.index_points {
            self.stats.records_skipped += 1;
            tracing::trace!("Skipping POINT geometry (index_points=false)");
            return Ok(false);
        }

        let cells = match &geom {
            Geometry::Polygon(polygon) => self.cover_polygons(std::slice::from_ref(polygon))?,
            Geometry::MultiPolygon(mp) => self.cover_polygons(&mp.0)?,
            other => covering_for_geometry(other, &self.config.covering)?,
        };

        if cells.is_empty() {
            self.stats.records_skipped += 1;
            tracing::debug!(
                geom_type = ?geom_type,
                "No valid ring to index"
            );
            return Ok(false);
        }

        match geom_type {
            GeometryType::Point | GeometryType::MultiPoint => self.stats.point_count += 1,
            GeometryType::Polygon | GeometryType::MultiPolygon => self.stats.polygon_count += 1,
            _ => self.stats.other_count += 1,
        }

        self.insert_cells(value, cells);
        self.stats.geometries_added += 1;

        Ok(true)
    }

    /// Insert a value at a pre-computed covering.
    ///
    /// Level-0 cells (whole faces) are skipped.
    pub fn add_cells<C, I>(&mut self, value: V, cells: I)
    where
        C: CellAddress,
        I: IntoIterator<Item = C>,
    {
        self.stats.records_processed += 1;
        let before = self.stats.cells_indexed;
        self.insert_cells(value, cells);
        if self.stats.cells_indexed > before {
            self.stats.geometries_added += 1;
        } else {
            self.stats.records_skipped += 1;
        }
    }

    /// Finish building and hand over the tree.
    pub fn build(self) -> InsideTree<V> {
        let shape = self.tree.stats();
        tracing::info!(
            records = self.stats.records_processed,
            added = self.stats.geometries_added,
            skipped = self.stats.records_skipped,
            cells = self.stats.cells_indexed,
            nodes = shape.node_count,
            max_depth = shape.max_depth,
            "Inside tree built"
        );
        self.tree
    }

    fn insert_cells<C, I>(&mut self, value: V, cells: I)
    where
        C: CellAddress,
        I: IntoIterator<Item = C>,
    {
        for cell in cells {
            if cell.level() < 1 {
                continue;
            }
            self.tree.insert(&cell, value.clone());
            self.stats.cells_indexed += 1;
        }
    }

    /// Union of the coverings of every polygon whose exterior ring is valid.
    ///
    /// Each polygon is covered by its re-oriented exterior ring with its
    /// interior rings kept as holes.
    fn cover_polygons(&self, polygons: &[Polygon<f64>]) -> Result<Vec<CellID>> {
        let mut cells = Vec::new();
        for polygon in polygons {
            let Some(ring) = exterior_ring(polygon) else {
                tracing::debug!("Skipping ring with too few points");
                continue;
            };
            if let Err(e) = validate_ring(&ring) {
                tracing::debug!(error = %e, "Skipping invalid ring");
                continue;
            }
            let shape = Polygon::new(ring, polygon.interiors().to_vec());
            let Some(region) = GeometryRegion::new(Geometry::Polygon(shape)) else {
                continue;
            };
            cells.extend(covering_for_region(&region, &self.config.covering)?);
        }
        Ok(cells)
    }
}
