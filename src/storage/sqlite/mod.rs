mod connection;
mod plan_repository;

pub use connection::SqliteStorage;
pub use plan_repository::SqlitePlanRepository;
