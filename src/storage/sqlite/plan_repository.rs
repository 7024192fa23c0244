use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};

use crate::domain::{DistrictRef, PlanRecord, Point};
use crate::errors::{PlanFeedError, PlanFeedResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::PlanRepository;

/// Joins each plan to the district it changed most recently
const SELECT_PLAN: &str = r#"
SELECT p.id, p.name, p.edited, p.is_shared, d.id, d.centroid_x, d.centroid_y
FROM plans p
LEFT JOIN districts d ON d.id = (
    SELECT d2.id FROM districts d2
    WHERE d2.plan_id = p.id
    ORDER BY d2.edited DESC, d2.id DESC
    LIMIT 1
)
"#;

pub struct SqlitePlanRepository {
    storage: SqliteStorage,
}

impl SqlitePlanRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

/// Fixed-width timestamps so text ordering matches time ordering
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<PlanRecord> {
    let edited: String = row.get(2)?;
    let edited = DateTime::parse_from_rfc3339(&edited)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let district_id: Option<i64> = row.get(4)?;
    let centroid_x: Option<f64> = row.get(5)?;
    let centroid_y: Option<f64> = row.get(6)?;

    let district = district_id.map(|id| {
        let centroid = match (centroid_x, centroid_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        };
        DistrictRef::new(id, centroid)
    });

    Ok(PlanRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        edited,
        is_shared: row.get(3)?,
        last_changed_district: district,
    })
}

impl PlanRepository for SqlitePlanRepository {
    fn upsert(&self, plan: &PlanRecord) -> PlanFeedResult<()> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;
        let edited = encode_timestamp(&plan.edited);

        tx.execute(
            "INSERT INTO plans (id, name, edited, is_shared) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, edited = excluded.edited, is_shared = excluded.is_shared",
            (plan.id, &plan.name, &edited, plan.is_shared),
        )?;

        if let Some(district) = &plan.last_changed_district {
            // A district id belongs to exactly one plan
            let owner: Option<i64> = tx
                .query_row(
                    "SELECT plan_id FROM districts WHERE id = ?1",
                    [district.id],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(owner) = owner.filter(|owner| *owner != plan.id) {
                return Err(PlanFeedError::InvalidRecord(format!(
                    "district {} already belongs to plan {}",
                    district.id, owner
                )));
            }

            let (x, y) = match district.centroid {
                Some(point) => (Some(point.x), Some(point.y)),
                None => (None, None),
            };

            tx.execute(
                "INSERT INTO districts (id, plan_id, centroid_x, centroid_y, edited) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET centroid_x = excluded.centroid_x, centroid_y = excluded.centroid_y, edited = excluded.edited",
                (district.id, plan.id, x, y, &edited),
            )?;
        } else {
            // The plan no longer has a changed district to show
            tx.execute("DELETE FROM districts WHERE plan_id = ?1", [plan.id])?;
        }

        tx.commit()?;
        Ok(())
    }

    fn recent_shared(&self, limit: usize) -> PlanFeedResult<Vec<PlanRecord>> {
        let limit = i64::try_from(limit)
            .map_err(|_| PlanFeedError::InvalidInput(format!("limit too large: {}", limit)))?;

        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE p.is_shared = 1 ORDER BY p.edited DESC, p.id DESC LIMIT ?1",
            SELECT_PLAN
        ))?;

        let plans = stmt.query_map([limit], plan_from_row)?;

        plans.collect::<Result<Vec<_>, _>>().map_err(PlanFeedError::from)
    }

    fn get_by_id(&self, id: i64) -> PlanFeedResult<Option<PlanRecord>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("{} WHERE p.id = ?1", SELECT_PLAN))?;

        let plan = stmt.query_row([id], plan_from_row);

        match plan {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(PlanFeedError::from(e)),
        }
    }

    fn count(&self) -> PlanFeedResult<usize> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM plans", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
