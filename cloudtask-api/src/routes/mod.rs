/// API route handlers
///
/// Handlers organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration and login
/// - `projects`: project CRUD
/// - `tasks`: task CRUD (read-through cached single reads)

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use serde::Deserialize;

/// Pagination query parameters shared by the list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    /// Records to skip
    #[serde(default)]
    pub skip: i64,

    /// Page size
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub(crate) fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, 100);
    }
}
