use url::Url;

use crate::errors::{PlanFeedError, PlanFeedResult};

/// Resolves the URLs the feed links to.
#[cfg_attr(test, mockall::automock)]
pub trait UrlResolver: Send + Sync {
    /// The feed's own address, used for `<link rel="self">`
    fn feed_url(&self) -> String;

    /// Public page of a shared plan
    fn permalink(&self, plan_id: i64) -> String;
}

/// DistrictBuilder route layout under a site base URL
#[derive(Debug, Clone)]
pub struct SiteRoutes {
    base: Url,
}

impl SiteRoutes {
    pub fn new(base: Url) -> PlanFeedResult<Self> {
        if base.cannot_be_a_base() {
            return Err(PlanFeedError::config(
                "PLANFEED_BASE_URL",
                format!("'{}' cannot be used as a base URL", base),
            ));
        }

        let mut base = base;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }

        Ok(Self { base })
    }

    fn resolve(&self, path: &str) -> String {
        self.base
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base, path))
    }
}

impl UrlResolver for SiteRoutes {
    fn feed_url(&self) -> String {
        self.resolve("districtmapping/plan/feed/")
    }

    fn permalink(&self, plan_id: i64) -> String {
        self.resolve(&format!("districtmapping/plan/{}/view/", plan_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_under_root() {
        let routes = SiteRoutes::new(Url::parse("https://example.org").unwrap()).unwrap();
        assert_eq!(
            routes.feed_url(),
            "https://example.org/districtmapping/plan/feed/"
        );
        assert_eq!(
            routes.permalink(42),
            "https://example.org/districtmapping/plan/42/view/"
        );
    }

    #[test]
    fn test_routes_under_prefix() {
        let routes = SiteRoutes::new(Url::parse("https://example.org/tx").unwrap()).unwrap();
        assert_eq!(
            routes.permalink(1),
            "https://example.org/tx/districtmapping/plan/1/view/"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(SiteRoutes::new(Url::parse("mailto:support@publicmapping.org").unwrap()).is_err());
    }
}
