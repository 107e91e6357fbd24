//! Geometry parsing and ring validation.
//!
//! This module provides:
//! - WKT parsing
//! - Geometry classification
//! - Ring construction with counter-clockwise winding
//! - Validity predicates used to reject degenerate rings before indexing
//!
//! Coordinates follow WKT/GeoJSON order: `x = longitude`, `y = latitude`.
//! Predicates are evaluated in the planar lng/lat domain, which is adequate
//! for the building- and parcel-sized regions the tree is fed with.

use crate::error::{InsideTreeError, Result};
use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo::{Area, BoundingRect, Contains, Intersects};
use geo_types::{Coord, Geometry, Line, LineString, Point, Polygon};

/// Latitude of the S2 origin reference point, in degrees.
///
/// A valid ring must not contain it; rings that do were almost always
/// given inside-out.
pub const ORIGIN_LAT: f64 = 89.408_120_566_886_17;

/// Longitude of the S2 origin reference point, in degrees.
pub const ORIGIN_LNG: f64 = 165.465_544_919_459_9;

/// Geometry type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    /// Classify a geo-types Geometry.
    pub fn from_geometry(geom: &Geometry<f64>) -> Self {
        match geom {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) | Geometry::Line(_) => GeometryType::LineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
                GeometryType::Polygon
            }
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Check if this is a point type.
    pub fn is_point(&self) -> bool {
        matches!(self, GeometryType::Point | GeometryType::MultiPoint)
    }
}

/// Parse WKT string to geo-types Geometry.
pub fn parse_wkt(wkt: &str) -> Result<Geometry<f64>> {
    use std::str::FromStr;
    wkt::Wkt::from_str(wkt)
        .map_err(|e| InsideTreeError::WktParse(format!("{:?}", e)))
        .and_then(|w| {
            w.try_into()
                .map_err(|e: wkt::conversion::Error| InsideTreeError::WktParse(format!("{:?}", e)))
        })
}

/// Build a closed ring from flat `[lng, lat, lng, lat, ...]` coordinates.
///
/// The closing coordinate must not be repeated. Returns `None` for an odd
/// number of values or fewer than four points. If the first three points
/// do not turn counter-clockwise the point order is reversed.
pub fn ring_from_coordinates(coords: &[f64]) -> Option<LineString<f64>> {
    if coords.len() % 2 != 0 || coords.len() <= 2 * 3 {
        return None;
    }

    let points = coords
        .chunks_exact(2)
        .map(|pair| Coord {
            x: pair[0],
            y: pair[1],
        })
        .collect();

    Some(ring_from_points(points))
}

/// Build a closed, counter-clockwise ring from open ring points.
fn ring_from_points(mut points: Vec<Coord<f64>>) -> LineString<f64> {
    if points.len() >= 3
        && RobustKernel::orient2d(points[0], points[1], points[2]) != Orientation::CounterClockwise
    {
        points.reverse();
    }

    let mut ring = LineString::new(points);
    ring.close();
    ring
}

/// Re-orient a polygon's exterior ring the same way [`ring_from_coordinates`]
/// does. Interior rings are ignored.
pub fn exterior_ring(polygon: &Polygon<f64>) -> Option<LineString<f64>> {
    let mut points: Vec<Coord<f64>> = polygon.exterior().0.clone();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() <= 3 {
        return None;
    }
    Some(ring_from_points(points))
}

/// Validity predicates for a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingValidity {
    /// No two non-adjacent edges touch.
    pub is_simple: bool,

    /// Encloses a non-zero area.
    pub has_interior: bool,

    /// Spans the entire lng/lat domain.
    pub is_full: bool,

    /// Interior contains the S2 origin reference point.
    pub contains_origin: bool,
}

impl RingValidity {
    /// Evaluate every predicate for `ring`.
    pub fn check(ring: &LineString<f64>) -> Self {
        let polygon = Polygon::new(ring.clone(), Vec::new());

        Self {
            is_simple: is_simple(ring),
            has_interior: polygon.unsigned_area() > 0.0,
            is_full: ring.bounding_rect().is_some_and(|r| {
                r.min().y <= -90.0 && r.max().y >= 90.0 && r.min().x <= -180.0 && r.max().x >= 180.0
            }),
            contains_origin: polygon.contains(&Point::new(ORIGIN_LNG, ORIGIN_LAT)),
        }
    }

    /// Whether the ring can be indexed.
    pub fn is_valid(&self) -> bool {
        self.first_failure().is_none()
    }

    fn first_failure(&self) -> Option<&'static str> {
        if !self.is_simple {
            Some("ring is self-intersecting")
        } else if !self.has_interior {
            Some("ring has no interior")
        } else if self.is_full {
            Some("ring covers the whole sphere")
        } else if self.contains_origin {
            Some("ring contains the origin point")
        } else {
            None
        }
    }
}

/// Reject rings that fail any validity predicate.
pub fn validate_ring(ring: &LineString<f64>) -> Result<()> {
    match RingValidity::check(ring).first_failure() {
        Some(reason) => Err(InsideTreeError::InvalidGeometry(reason.into())),
        None => Ok(()),
    }
}

fn is_simple(ring: &LineString<f64>) -> bool {
    let edges: Vec<Line<f64>> = ring.lines().collect();
    let n = edges.len();

    for i in 0..n {
        for j in (i + 2)..n {
            // first and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return false;
            }
        }
    }

    true
}
