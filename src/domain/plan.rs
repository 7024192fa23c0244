use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DistrictRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: i64,
    pub name: String,
    pub edited: DateTime<Utc>,
    #[serde(default = "default_shared")]
    pub is_shared: bool,
    #[serde(default)]
    pub last_changed_district: Option<DistrictRef>,
}

fn default_shared() -> bool {
    true
}

impl PlanRecord {
    pub fn new(id: i64, name: impl Into<String>, edited: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            edited,
            is_shared: true,
            last_changed_district: None,
        }
    }

    pub fn with_district(mut self, district: Option<DistrictRef>) -> Self {
        self.last_changed_district = district;
        self
    }

    pub fn with_shared(mut self, is_shared: bool) -> Self {
        self.is_shared = is_shared;
        self
    }
}
