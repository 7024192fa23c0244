//! GetMap URLs for the district thumbnails.
//!
//! Parameter order is fixed; GeoServer deployments and caches in front of
//! them key on the literal query string.

use url::Url;

use crate::config::FeedConfig;
use crate::errors::{PlanFeedError, PlanFeedResult};

const WMS_PATH: &str = "geoserver/wms";
const DISTRICT_LAYER: &str = "simple_district";
pub const IMAGE_SRS: &str = "EPSG:3785";
const IMAGE_FORMAT: &str = "image/png";

#[derive(Debug, Clone)]
pub struct GetMapUrl {
    /// Everything up to and including `cql_filter=id%3d`
    prefix: String,
}

impl GetMapUrl {
    pub fn new(config: &FeedConfig) -> PlanFeedResult<Self> {
        let base = config.mapserver_base()?;
        let endpoint = join_path(&base, WMS_PATH)?;

        let [minx, miny, maxx, maxy] = config.map_extent;
        let prefix = format!(
            "{}?service=WMS&version=1.1.0&request=GetMap&layers={}:{}&styles=&bbox={},{},{},{}&width={}&height={}&srs={}&format={}&cql_filter=id%3d",
            endpoint,
            config.mapserver_namespace.trim(),
            DISTRICT_LAYER,
            minx,
            miny,
            maxx,
            maxy,
            config.image_width,
            config.image_height,
            IMAGE_SRS,
            IMAGE_FORMAT,
        );

        Ok(Self { prefix })
    }

    /// URL of the image showing only `district_id`
    pub fn for_district(&self, district_id: i64) -> String {
        format!("{}{}", self.prefix, district_id)
    }
}

fn join_path(base: &Url, path: &str) -> PlanFeedResult<Url> {
    // A base without a trailing slash would have its last segment replaced
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    base.join(path)
        .map_err(|e| PlanFeedError::config("mapserver_host", e.to_string()))
}
