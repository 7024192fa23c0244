use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in map coordinates: `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The district a plan most recently changed, as resolved by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRef {
    pub id: i64,
    /// Centroid of the district's simplified geometry
    #[serde(default)]
    pub centroid: Option<Point>,
}

impl DistrictRef {
    pub fn new(id: i64, centroid: Option<Point>) -> Self {
        Self { id, centroid }
    }

    /// The centroid, if present and made of finite coordinates
    pub fn usable_centroid(&self) -> Option<Point> {
        self.centroid.filter(Point::is_finite)
    }
}

/// Geometry a feed entry needed but the plan did not carry.
///
/// Recoverable: the entry is still rendered without the parts it affects.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingGeometry {
    /// No last changed district: both the map image and the point are omitted
    #[error("plan {plan_id} has no last changed district")]
    District { plan_id: i64 },
    /// District known but centroid absent or non-finite: only the point is omitted
    #[error("district {district_id} of plan {plan_id} has no usable centroid")]
    Centroid { plan_id: i64, district_id: i64 },
}

impl MissingGeometry {
    pub fn plan_id(&self) -> i64 {
        match self {
            MissingGeometry::District { plan_id } => *plan_id,
            MissingGeometry::Centroid { plan_id, .. } => *plan_id,
        }
    }
}
