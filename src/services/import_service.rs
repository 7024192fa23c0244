use serde_json::Value;

use crate::domain::PlanRecord;
use crate::errors::{PlanFeedError, PlanFeedResult};
use crate::storage::traits::PlanRepository;

#[derive(Debug)]
pub struct ImportResult {
    pub imported: Vec<PlanRecord>,
    pub invalid: Vec<(usize, String)>, // (position in input, error_message)
}

pub struct ImportService<R: PlanRepository> {
    repository: R,
}

impl<R: PlanRepository> ImportService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Import plans from a JSON array. Records are stored one by one; a bad
    /// record is reported and skipped.
    pub fn import_json(&self, content: &str) -> PlanFeedResult<ImportResult> {
        let value: Value = serde_json::from_str(content)?;
        let records = match value {
            Value::Array(records) => records,
            _ => {
                return Err(PlanFeedError::InvalidInput(
                    "expected a JSON array of plans".to_string(),
                ))
            }
        };

        let mut result = ImportResult {
            imported: Vec::new(),
            invalid: Vec::new(),
        };

        for (index, record) in records.into_iter().enumerate() {
            let plan: PlanRecord = match serde_json::from_value(record) {
                Ok(plan) => plan,
                Err(e) => {
                    result.invalid.push((index, e.to_string()));
                    continue;
                }
            };

            match self.repository.upsert(&plan) {
                Ok(()) => result.imported.push(plan),
                Err(e) => {
                    tracing::warn!(plan_id = plan.id, error = %e, "skipping plan");
                    result.invalid.push((index, e.to_string()));
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::{SqlitePlanRepository, SqliteStorage};
    use crate::storage::traits::MockPlanRepository;

    fn setup() -> (ImportService<SqlitePlanRepository>, SqlitePlanRepository) {
        let storage = SqliteStorage::in_memory().unwrap();
        let service = ImportService::new(SqlitePlanRepository::new(storage.clone()));
        (service, SqlitePlanRepository::new(storage))
    }

    const PLANS: &str = r#"[
        {
            "id": 42,
            "name": "Senate Plan",
            "edited": "2011-05-01T10:00:00Z",
            "last_changed_district": {"id": 7, "centroid": {"x": -96.8, "y": 32.7}}
        },
        {"id": "not a number", "name": "Broken", "edited": "2011-05-01T10:00:00Z"},
        {"id": 43, "name": "House Plan", "edited": "2011-05-02T10:00:00Z", "is_shared": false}
    ]"#;

    #[test]
    fn test_import_reports_invalid_records() {
        let (service, repo) = setup();
        let result = service.import_json(PLANS).unwrap();

        assert_eq!(result.imported.len(), 2);
        assert_eq!(result.invalid.len(), 1);
        assert_eq!(result.invalid[0].0, 1);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_import_respects_shared_flag() {
        let (service, repo) = setup();
        service.import_json(PLANS).unwrap();

        let shared: Vec<i64> = repo.recent_shared(10).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(shared, vec![42]);
    }

    #[test]
    fn test_import_rejects_non_array() {
        let (service, _) = setup();
        let err = service.import_json(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, PlanFeedError::InvalidInput(_)));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let (service, _) = setup();
        let err = service.import_json("[{").unwrap_err();
        assert!(matches!(err, PlanFeedError::Json(_)));
    }

    #[test]
    fn test_storage_failure_is_recorded() {
        let mut repo = MockPlanRepository::new();
        repo.expect_upsert()
            .returning(|plan| Err(PlanFeedError::InvalidRecord(format!("plan {}", plan.id))));

        let service = ImportService::new(repo);
        let result = service
            .import_json(r#"[{"id": 1, "name": "A", "edited": "2011-05-01T10:00:00Z"}]"#)
            .unwrap();

        assert!(result.imported.is_empty());
        assert_eq!(result.invalid, vec![(0, "Invalid plan record: plan 1".to_string())]);
    }
}
