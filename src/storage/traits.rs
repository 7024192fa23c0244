use crate::domain::PlanRecord;
use crate::errors::PlanFeedResult;

/// Plans with their last changed district already resolved.
#[cfg_attr(test, mockall::automock)]
pub trait PlanRepository: Send + Sync {
    /// Insert or replace a plan, recording its last changed district.
    /// A plan without one has its stored districts removed.
    fn upsert(&self, plan: &PlanRecord) -> PlanFeedResult<()>;
    /// Shared plans, most recently edited first
    fn recent_shared(&self, limit: usize) -> PlanFeedResult<Vec<PlanRecord>>;
    fn get_by_id(&self, id: i64) -> PlanFeedResult<Option<PlanRecord>>;
    fn count(&self) -> PlanFeedResult<usize>;
}
