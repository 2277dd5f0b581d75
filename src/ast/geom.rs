//! Geometry literals
//!
//! The coordinate model stores explicit 2- or 3-tuples; the WKT `Z` marker is
//! informational only. A bounding box is not a geometry and therefore cannot
//! appear inside a collection.

use crate::Error;

/// A single 2D or 3D coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Position {
    pub fn xy(x: f64, y: f64) -> Position {
        Position { x, y, z: None }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Position {
        Position { x, y, z: Some(z) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Build a line string. Fails with fewer than 2 positions.
    pub fn line_string(coords: Vec<Position>) -> Result<Geometry, Error> {
        if coords.len() < 2 {
            return Err(Error::Structural(format!(
                "linestring needs at least 2 positions, got {}",
                coords.len()
            )));
        }
        Ok(Geometry::LineString(coords))
    }

    /// Build a polygon. Fails if any ring has fewer than 4 positions.
    pub fn polygon(rings: Vec<Vec<Position>>) -> Result<Geometry, Error> {
        for ring in &rings {
            if ring.len() < 4 {
                return Err(Error::Structural(format!(
                    "polygon ring needs at least 4 positions, got {}",
                    ring.len()
                )));
            }
        }
        Ok(Geometry::Polygon(rings))
    }

    pub fn multi_line_string(parts: Vec<Vec<Position>>) -> Result<Geometry, Error> {
        for part in &parts {
            if part.len() < 2 {
                return Err(Error::Structural(format!(
                    "multilinestring part needs at least 2 positions, got {}",
                    part.len()
                )));
            }
        }
        Ok(Geometry::MultiLineString(parts))
    }

    pub fn multi_polygon(polygons: Vec<Vec<Vec<Position>>>) -> Result<Geometry, Error> {
        for rings in &polygons {
            for ring in rings {
                if ring.len() < 4 {
                    return Err(Error::Structural(format!(
                        "polygon ring needs at least 4 positions, got {}",
                        ring.len()
                    )));
                }
            }
        }
        Ok(Geometry::MultiPolygon(polygons))
    }

    /// Build a collection. Members must themselves be non-collections.
    pub fn collection(members: Vec<Geometry>) -> Result<Geometry, Error> {
        for member in &members {
            if matches!(member, Geometry::GeometryCollection(_)) {
                return Err(Error::Structural(
                    "geometry collections cannot be nested".to_string(),
                ));
            }
        }
        Ok(Geometry::GeometryCollection(members))
    }

    /// True if any coordinate carries a Z value.
    pub fn has_z(&self) -> bool {
        match self {
            Geometry::Point(p) => p.z.is_some(),
            Geometry::LineString(ps) | Geometry::MultiPoint(ps) => {
                ps.iter().any(|p| p.z.is_some())
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter().flatten().any(|p| p.z.is_some())
            }
            Geometry::MultiPolygon(polys) => {
                polys.iter().flatten().flatten().any(|p| p.z.is_some())
            }
            Geometry::GeometryCollection(gs) => gs.iter().any(Geometry::has_z),
        }
    }
}
