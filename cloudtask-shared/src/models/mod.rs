/// Database models for CloudTask
///
/// Each model owns its SQL: the structs here derive `sqlx::FromRow` and
/// expose async CRUD methods over a `PgPool`. Higher layers reach them
/// through the [`crate::store::Store`] trait rather than calling the SQL
/// directly.
///
/// # Models
///
/// - `user`: user accounts, roles, and the [`user::Actor`] identity
/// - `project`: projects, the unit of ownership
/// - `task`: tasks and the cached [`task::TaskProjection`]

pub mod project;
pub mod task;
pub mod user;
