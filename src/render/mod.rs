pub mod clock;
pub mod feed;
pub mod routes;
pub mod templates;
pub mod wms;
pub mod xml_text;

pub use clock::{Clock, FixedClock, SystemClock};
pub use feed::{FeedChunks, FeedRenderer, MissingGeometryHook, CONTENT_TYPE};
pub use routes::{SiteRoutes, UrlResolver};
pub use wms::GetMapUrl;
