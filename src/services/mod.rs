pub mod feed_service;
pub mod import_service;

pub use feed_service::FeedService;
pub use import_service::{ImportResult, ImportService};
