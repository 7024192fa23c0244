pub mod geometry;
pub mod plan;

pub use geometry::{DistrictRef, MissingGeometry, Point};
pub use plan::PlanRecord;
