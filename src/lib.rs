//! Atom/GeoRSS syndication of recently shared redistricting plans.
//!
//! [`render::FeedRenderer`] turns already-resolved [`domain::PlanRecord`]s into
//! an Atom 1.0 document with GeoRSS points and WMS map thumbnails. The
//! storage, services and CLI layers feed it from an SQLite plan store.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod render;
pub mod services;
pub mod storage;
