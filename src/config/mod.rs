use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::errors::{PlanFeedError, PlanFeedResult};

/// GeoServer workspace names: letters, digits, `_`, `-`, `.`
const NAMESPACE_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.-]*$";

const DEFAULT_IMAGE_WIDTH: u32 = 200;
const DEFAULT_IMAGE_HEIGHT: u32 = 150;
const DEFAULT_MAX_PLANS: usize = 10;
const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// How closely the feed follows the historical DistrictBuilder output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatMode {
    /// Unique entry ids and one consistent spatial reference
    #[default]
    Standard,
    /// Constant entry id and the historical GML srsName, byte for byte
    Legacy,
}

impl std::str::FromStr for CompatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(CompatMode::Standard),
            "legacy" => Ok(CompatMode::Legacy),
            _ => Err(format!("Unknown compat mode: {}", s)),
        }
    }
}

/// Map server settings the feed needs to build its image URLs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedConfig {
    pub mapserver_host: String,
    pub mapserver_namespace: String,
    pub image_width: u32,
    pub image_height: u32,
    /// `[minx, miny, maxx, maxy]`
    pub map_extent: [f64; 4],
    pub compat: CompatMode,
}

impl FeedConfig {
    pub fn new(
        mapserver_host: impl Into<String>,
        mapserver_namespace: impl Into<String>,
        image_width: u32,
        image_height: u32,
        map_extent: [f64; 4],
    ) -> Self {
        Self {
            mapserver_host: mapserver_host.into(),
            mapserver_namespace: mapserver_namespace.into(),
            image_width,
            image_height,
            map_extent,
            compat: CompatMode::default(),
        }
    }

    pub fn with_compat(mut self, compat: CompatMode) -> Self {
        self.compat = compat;
        self
    }

    /// Check every field, failing on the first invalid one
    pub fn validate(&self) -> PlanFeedResult<()> {
        self.mapserver_base()?;

        let namespace = self.mapserver_namespace.trim();
        if namespace.is_empty() {
            return Err(PlanFeedError::config("mapserver_namespace", "must not be empty"));
        }
        let pattern = Regex::new(NAMESPACE_PATTERN)
            .map_err(|e| PlanFeedError::config("mapserver_namespace", e.to_string()))?;
        if !pattern.is_match(namespace) {
            return Err(PlanFeedError::config(
                "mapserver_namespace",
                format!("'{}' is not a valid workspace name", namespace),
            ));
        }

        if self.image_width == 0 {
            return Err(PlanFeedError::config("image_width", "must be positive"));
        }
        if self.image_height == 0 {
            return Err(PlanFeedError::config("image_height", "must be positive"));
        }

        let [minx, miny, maxx, maxy] = self.map_extent;
        if self.map_extent.iter().any(|v| !v.is_finite()) {
            return Err(PlanFeedError::config("map_extent", "coordinates must be finite"));
        }
        if minx >= maxx || miny >= maxy {
            return Err(PlanFeedError::config(
                "map_extent",
                "expected minx,miny,maxx,maxy with min < max",
            ));
        }

        Ok(())
    }

    /// Map server root URL; hosts without a scheme are served over http
    pub fn mapserver_base(&self) -> PlanFeedResult<Url> {
        let host = self.mapserver_host.trim();
        if host.is_empty() {
            return Err(PlanFeedError::config("mapserver_host", "must not be empty"));
        }

        let candidate = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        let url = Url::parse(&candidate)
            .map_err(|e| PlanFeedError::config("mapserver_host", e.to_string()))?;
        if url.host_str().is_none() {
            return Err(PlanFeedError::config("mapserver_host", "missing host"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(PlanFeedError::config(
                "mapserver_host",
                "must not carry a query or fragment",
            ));
        }

        Ok(url)
    }
}

/// Parse `minx,miny,maxx,maxy`
pub fn parse_extent(value: &str) -> PlanFeedResult<[f64; 4]> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| PlanFeedError::config("map_extent", e.to_string()))?;

    match parts.as_slice() {
        [minx, miny, maxx, maxy] => Ok([*minx, *miny, *maxx, *maxy]),
        _ => Err(PlanFeedError::config(
            "map_extent",
            format!("expected 4 comma separated numbers, got {}", parts.len()),
        )),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub base_url: Url,
    pub max_plans: usize,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Load `.env` files into the process environment, then read the
    /// storage and site settings. Map server settings are read separately
    /// by [`FeedConfig::from_env`] since only rendering needs them.
    pub fn from_env() -> PlanFeedResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let default_db = exe_dir
            .map(|d| d.join("planfeed.db").to_string_lossy().into_owned())
            .unwrap_or_else(|| "./planfeed.db".to_string());

        Self::from_lookup(|key| std::env::var(key).ok(), default_db)
    }

    /// Build a config from any key/value source
    pub fn from_lookup<F>(lookup: F, default_db: String) -> PlanFeedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_plans = parse_number(&lookup, "FEED_MAX_PLANS", DEFAULT_MAX_PLANS)?;

        let base_url = optional(&lookup, "PLANFEED_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| PlanFeedError::config("PLANFEED_BASE_URL", e.to_string()))?;

        let db_path = optional(&lookup, "PLANFEED_DB_PATH").unwrap_or(default_db);

        Ok(Self {
            db_path,
            base_url,
            max_plans,
        })
    }
}

impl FeedConfig {
    /// Read map server settings from the process environment
    pub fn from_env() -> PlanFeedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate map server settings from any key/value source
    pub fn from_lookup<F>(lookup: F) -> PlanFeedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            optional(&lookup, key).ok_or_else(|| PlanFeedError::MissingEnvVar(key.to_string()))
        };

        let mapserver_host = require("MAPSERVER_HOST")?;
        let mapserver_namespace = require("MAPSERVER_NS")?;
        let map_extent = parse_extent(&require("MAP_EXTENT")?)?;

        let image_width = parse_number(&lookup, "FEED_IMAGE_WIDTH", DEFAULT_IMAGE_WIDTH)?;
        let image_height = parse_number(&lookup, "FEED_IMAGE_HEIGHT", DEFAULT_IMAGE_HEIGHT)?;

        let compat = match optional(&lookup, "PLANFEED_COMPAT") {
            Some(value) => value
                .trim()
                .parse::<CompatMode>()
                .map_err(|e: String| PlanFeedError::config("PLANFEED_COMPAT", e))?,
            None => CompatMode::default(),
        };

        let feed = FeedConfig {
            mapserver_host,
            mapserver_namespace,
            image_width,
            image_height,
            map_extent,
            compat,
        };
        feed.validate()?;

        Ok(feed)
    }
}

/// A set variable; blank values count as unset
fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> PlanFeedResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| PlanFeedError::config(key, e.to_string())),
        None => Ok(default),
    }
}
