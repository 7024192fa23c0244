use std::io::Write;

use crate::domain::PlanRecord;
use crate::errors::{PlanFeedError, PlanFeedResult};
use crate::render::{Clock, FeedRenderer, UrlResolver};
use crate::storage::traits::PlanRepository;

pub struct FeedService<R: PlanRepository> {
    repository: R,
}

impl<R: PlanRepository> FeedService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// The most recently edited shared plans, newest first
    pub fn recent_plans(&self, limit: usize) -> PlanFeedResult<Vec<PlanRecord>> {
        if limit == 0 {
            return Err(PlanFeedError::InvalidInput(
                "limit must be at least 1".to_string(),
            ));
        }
        self.repository.recent_shared(limit)
    }

    /// Load recent plans and stream their feed into `writer`.
    /// Returns the number of entries written.
    pub fn write_feed<U, C, W>(
        &self,
        renderer: &FeedRenderer<U, C>,
        limit: usize,
        writer: W,
    ) -> PlanFeedResult<usize>
    where
        U: UrlResolver,
        C: Clock,
        W: Write,
    {
        let plans = self.recent_plans(limit)?;
        tracing::info!(plans = plans.len(), limit, "rendering shared plan feed");

        renderer.write_to(&plans, writer)?;
        Ok(plans.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use crate::render::{FixedClock, SiteRoutes};
    use crate::storage::traits::MockPlanRepository;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use url::Url;

    fn renderer() -> FeedRenderer<SiteRoutes, FixedClock> {
        let config = FeedConfig::new("maps.example.org", "pmp", 200, 150, [-97.0, 32.0, -96.0, 33.0]);
        let routes = SiteRoutes::new(Url::parse("https://example.org/").unwrap()).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 0).unwrap());
        FeedRenderer::new(&config, routes, clock).unwrap()
    }

    #[test]
    fn test_write_feed_uses_repository_order() {
        let mut repo = MockPlanRepository::new();
        repo.expect_recent_shared().with(eq(5)).times(1).returning(|_| {
            let edited = Utc.with_ymd_and_hms(2011, 5, 1, 0, 0, 0).unwrap();
            Ok(vec![
                PlanRecord::new(2, "Newer", edited),
                PlanRecord::new(1, "Older", edited),
            ])
        });

        let service = FeedService::new(repo);
        let mut out = Vec::new();
        let count = service.write_feed(&renderer(), 5, &mut out).unwrap();

        let feed = String::from_utf8(out).unwrap();
        assert_eq!(count, 2);
        assert!(feed.find("Newer").unwrap() < feed.find("Older").unwrap());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let repo = MockPlanRepository::new();
        let service = FeedService::new(repo);

        let err = service.recent_plans(0).unwrap_err();
        assert!(matches!(err, PlanFeedError::InvalidInput(_)));
    }

    #[test]
    fn test_repository_error_writes_nothing() {
        let mut repo = MockPlanRepository::new();
        repo.expect_recent_shared()
            .returning(|_| Err(PlanFeedError::Database(rusqlite::Error::InvalidQuery)));

        let service = FeedService::new(repo);
        let mut out = Vec::new();
        assert!(service.write_feed(&renderer(), 10, &mut out).is_err());
        assert!(out.is_empty());
    }
}
