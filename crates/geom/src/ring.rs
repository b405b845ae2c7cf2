//! Polygon data model: rings, polygons with holes, and named regions.
//!
//! A [`Ring`] is an ordered closed sequence of vertices with no implicit
//! closing duplicate (the edge from the last vertex back to the first is
//! implied). A [`PolygonWithHoles`] is one outer ring plus zero or more hole
//! rings; a [`GeoDiv`] is a named region owning one or more such polygons.
//! Regions own their polygons; projection passes never mutate vertices in
//! place but build a complete replacement and swap it in wholesale.

use cartoflow_core::Point;
use serde::{Deserialize, Serialize};

/// A closed ring of vertices (no duplicate closing vertex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(pub Vec<Point>);

impl Ring {
    /// Creates a ring from a vertex list.
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// The ring's vertices in order.
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Signed shoelace area: positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let pts = &self.0;
        let n = pts.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for k in 0..n {
            let a = pts[k];
            let b = pts[(k + 1) % n];
            twice_area += a.x * b.y - b.x * a.y;
        }
        twice_area / 2.0
    }

    /// Whether the ring winds counter-clockwise.
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Applies `f` to every vertex, building a new ring; the vertex count
    /// and order are preserved.
    pub fn try_map_points<E>(
        &self,
        mut f: impl FnMut(Point) -> Result<Point, E>,
    ) -> Result<Ring, E> {
        let mut points = Vec::with_capacity(self.0.len());
        for &p in &self.0 {
            points.push(f(p)?);
        }
        Ok(Ring(points))
    }

    /// This ring with every coordinate rounded to the fixed decimal
    /// precision.
    pub fn rounded(&self) -> Ring {
        Ring(self.0.iter().map(|p| p.rounded()).collect())
    }
}

/// An outer ring plus zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonWithHoles {
    pub exterior: Ring,
    #[serde(default)]
    pub holes: Vec<Ring>,
}

impl PolygonWithHoles {
    /// Creates a polygon from its outer ring and holes.
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// This polygon with every coordinate rounded to the fixed decimal
    /// precision.
    pub fn rounded(&self) -> PolygonWithHoles {
        PolygonWithHoles {
            exterior: self.exterior.rounded(),
            holes: self.holes.iter().map(Ring::rounded).collect(),
        }
    }
}

/// A named map region owning one or more polygons with holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoDiv {
    pub id: String,
    pub polygons: Vec<PolygonWithHoles>,
}

impl GeoDiv {
    /// Creates an empty region with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            polygons: Vec::new(),
        }
    }

    /// Appends a polygon to the region.
    pub fn push(&mut self, polygon: PolygonWithHoles) {
        self.polygons.push(polygon);
    }

    /// This region with every coordinate rounded to the fixed decimal
    /// precision.
    pub fn rounded(&self) -> GeoDiv {
        GeoDiv {
            id: self.id.clone(),
            polygons: self.polygons.iter().map(PolygonWithHoles::rounded).collect(),
        }
    }
}
