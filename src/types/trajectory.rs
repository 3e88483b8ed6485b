//! Well path trajectory
//!
//! The exporter only needs one thing from a well path: the 3-D point at a given
//! measured depth. `WellPathGeometry` is that seam; `Trajectory` is the sampled
//! polyline implementation used when a model is loaded from file.

use serde::{Deserialize, Serialize};

/// A point in model coordinates. `z` grows upward, so depth is `-z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

/// Anything that can locate a measured depth in space.
pub trait WellPathGeometry {
    /// Interpolated point along the path at `measured_depth`.
    fn point_at_measured_depth(&self, measured_depth: f64) -> Point3;

    /// False when the geometry cannot answer queries at all.
    fn is_defined(&self) -> bool {
        true
    }
}

/// One sample along a well path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub md: f64,
    #[serde(flatten)]
    pub point: Point3,
}

/// Sampled well path, ordered by increasing measured depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(mut points: Vec<TrajectoryPoint>) -> Self {
        points.sort_by(|a, b| a.md.total_cmp(&b.md));
        Self { points }
    }

    /// Straight vertical path from `(x, y, -top_tvd)` where MD equals TVD offset by `top_tvd`.
    pub fn vertical(x: f64, y: f64, top_tvd: f64, total_md: f64) -> Self {
        Self::new(vec![
            TrajectoryPoint { md: 0.0, point: Point3::new(x, y, -top_tvd) },
            TrajectoryPoint { md: total_md, point: Point3::new(x, y, -(top_tvd + total_md)) },
        ])
    }

    pub fn first_md(&self) -> Option<f64> {
        self.points.first().map(|p| p.md)
    }

    pub fn last_md(&self) -> Option<f64> {
        self.points.last().map(|p| p.md)
    }
}

impl WellPathGeometry for Trajectory {
    fn point_at_measured_depth(&self, measured_depth: f64) -> Point3 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Point3::new(0.0, 0.0, 0.0);
        };

        if measured_depth <= first.md {
            return first.point;
        }
        if measured_depth >= last.md {
            return last.point;
        }

        // First sample strictly deeper than the query; both neighbours exist here.
        let upper = self.points.partition_point(|p| p.md <= measured_depth);
        let a = self.points[upper - 1];
        let b = self.points[upper];
        let span = b.md - a.md;
        if span <= 0.0 {
            return a.point;
        }
        a.point.lerp(b.point, (measured_depth - a.md) / span)
    }

    fn is_defined(&self) -> bool {
        !self.points.is_empty()
    }
}
