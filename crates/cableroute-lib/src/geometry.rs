//! Planar geometry primitives shared by the graph and equipment index.
//!
//! Only the X and Y components of drawing coordinates participate in any
//! distance or graph computation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Segments shorter than this are treated as degenerate and ignored.
pub const DEGENERATE_LENGTH: f64 = 1e-6;

/// A point on the drawing plane.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Cheap rejection test: true when either axis offset exceeds `radius`.
    pub(crate) fn outside_box(&self, other: &Point2D, radius: f64) -> bool {
        (self.x - other.x).abs() > radius || (self.y - other.y).abs() > radius
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(point: Point2D) -> Self {
        [point.x, point.y]
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Quantization cell used to merge near-duplicate coordinates into one node.
///
/// Each axis is divided by the snap tolerance and rounded half away from zero
/// (`f64::round`). Points sitting exactly on a cell boundary therefore land in
/// the cell further from the origin, so snapping is not symmetric around
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SnapKey {
    pub x: i64,
    pub y: i64,
}

impl SnapKey {
    /// Quantize a point. `tolerance` must be strictly positive.
    pub fn from_point(point: &Point2D, tolerance: f64) -> Self {
        Self {
            x: (point.x / tolerance).round() as i64,
            y: (point.y / tolerance).round() as i64,
        }
    }

    /// Canonical coordinate of this cell.
    pub fn canonical(&self, tolerance: f64) -> Point2D {
        Point2D::new(self.x as f64 * tolerance, self.y as f64 * tolerance)
    }
}

/// Ordered vertex list as read from a drawing entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    pub vertices: Vec<Point2D>,
}

impl Polyline {
    pub fn new(vertices: Vec<Point2D>) -> Self {
        Self { vertices }
    }

    /// First and last vertex, or `None` for fewer than two vertices.
    pub fn endpoints(&self) -> Option<(Point2D, Point2D)> {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) if self.vertices.len() >= 2 => Some((*first, *last)),
            _ => None,
        }
    }

    /// Consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Sum of the segment lengths.
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance_to(&b)).sum()
    }
}
