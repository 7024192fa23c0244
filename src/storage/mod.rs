pub mod traits;
pub mod sqlite;

pub use traits::PlanRepository;
pub use sqlite::{SqlitePlanRepository, SqliteStorage};
