//! S2 covering generation.
//!
//! Turns lat/lng points and geometries into the S2 cell identifiers the
//! trie is keyed by. Point lookups use leaf cells (level 30); regions are
//! approximated by a bounded set of cells from S2's region coverer, which
//! follows the geometry's shape including its holes.

use crate::config::CoveringConfig;
use crate::error::{InsideTreeError, Result};
use geo::{BoundingRect, Contains, Intersects};
use geo_types::{Coord, Geometry};
use s2::cap::Cap;
use s2::cell::Cell;
use s2::cellid::CellID;
use s2::latlng::LatLng;
use s2::rect::Rect;
use s2::region::{Region, RegionCoverer};

/// Leaf cell containing a lat/lng point.
pub fn cell_for_point(lat: f64, lng: f64) -> CellID {
    CellID::from(&LatLng::from_degrees(lat, lng))
}

/// Cell at `level` containing a lat/lng point.
pub fn cell_for_point_at_level(lat: f64, lng: f64, level: u8) -> CellID {
    cell_for_point(lat, lng).parent(u64::from(level))
}

/// A geometry as seen by the S2 region coverer.
///
/// Cells are tested through their lat/lng bounding rectangle: a cell
/// intersects the region when its bound touches the geometry, and is
/// contained only when its whole bound is. A covering may carry a few
/// extra cells along the boundary but never misses part of the geometry.
#[derive(Debug, Clone)]
pub struct GeometryRegion {
    geometry: Geometry<f64>,
    bound: Rect,
}

impl GeometryRegion {
    /// Wrap a geometry. Returns `None` for an empty geometry.
    pub fn new(geometry: Geometry<f64>) -> Option<Self> {
        let rect = geometry.bounding_rect()?;
        let bound = Rect::from_degrees(rect.min().y, rect.min().x, rect.max().y, rect.max().x);
        Some(Self { geometry, bound })
    }

    /// Cell bound in lng/lat degrees, or `None` when the cell wraps the
    /// antimeridian or reaches a pole.
    fn planar_bound(cell: &Cell) -> Option<geo_types::Rect<f64>> {
        let bound = cell.rect_bound();
        if bound.lng.is_inverted() || bound.lng.is_full() {
            return None;
        }
        Some(geo_types::Rect::new(
            Coord {
                x: bound.lng.lo.to_degrees(),
                y: bound.lat.lo.to_degrees(),
            },
            Coord {
                x: bound.lng.hi.to_degrees(),
                y: bound.lat.hi.to_degrees(),
            },
        ))
    }
}

impl Region for GeometryRegion {
    fn cap_bound(&self) -> Cap {
        self.bound.cap_bound()
    }

    fn rect_bound(&self) -> Rect {
        self.bound.clone()
    }

    fn contains_cell(&self, cell: &Cell) -> bool {
        match Self::planar_bound(cell) {
            Some(rect) => self.geometry.contains(&rect),
            None => false,
        }
    }

    fn intersects_cell(&self, cell: &Cell) -> bool {
        match Self::planar_bound(cell) {
            Some(rect) => self.geometry.intersects(&rect),
            None => self.bound.intersects(&cell.rect_bound()),
        }
    }
}

/// Covering for an arbitrary region.
pub fn covering_for_region(region: &GeometryRegion, config: &CoveringConfig) -> Result<Vec<CellID>> {
    config.validate()?;

    let coverer = RegionCoverer {
        min_level: config.min_level,
        max_level: config.max_level,
        level_mod: 1,
        max_cells: config.max_cells,
    };

    let cells = coverer.covering(region).0;
    if cells.is_empty() {
        return Err(InsideTreeError::CoveringError(
            "covering produced no cells".into(),
        ));
    }

    Ok(cells)
}

/// Covering for an arbitrary geometry.
///
/// Points map to their cell at `config.max_level`; everything else is
/// covered through its shape.
pub fn covering_for_geometry(geom: &Geometry<f64>, config: &CoveringConfig) -> Result<Vec<CellID>> {
    match geom {
        Geometry::Point(p) => {
            config.validate()?;
            Ok(vec![cell_for_point_at_level(p.y(), p.x(), config.max_level)])
        }
        Geometry::MultiPoint(mp) => {
            config.validate()?;
            let mut cells: Vec<CellID> = mp
                .iter()
                .map(|p| cell_for_point_at_level(p.y(), p.x(), config.max_level))
                .collect();
            cells.sort_by_key(|c| c.0);
            cells.dedup_by_key(|c| c.0);
            if cells.is_empty() {
                return Err(InsideTreeError::CoveringError("empty multipoint".into()));
            }
            Ok(cells)
        }
        _ => {
            let region = GeometryRegion::new(geom.clone())
                .ok_or_else(|| InsideTreeError::CoveringError("empty geometry".into()))?;
            covering_for_region(&region, config)
        }
    }
}
