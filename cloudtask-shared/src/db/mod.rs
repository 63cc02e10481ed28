/// Database infrastructure
///
/// - [`pool`]: PostgreSQL connection pool construction and health checks
/// - [`migrations`]: embedded migration runner

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, DatabaseConfig};
