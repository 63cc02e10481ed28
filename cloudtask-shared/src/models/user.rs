/// User model and database operations
///
/// Users are the unit of ownership in CloudTask: every project references
/// exactly one owning user, and a task's owner is resolved transitively
/// through its project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'user');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     full_name TEXT,
///     password_hash TEXT NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cloudtask_shared::models::user::{CreateUser, User, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     full_name: Some("Jane Doe".to_string()),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role of a user account
///
/// Admins may read and mutate any record; regular users only records they
/// transitively own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Unrestricted access to all projects and tasks
    Admin,

    /// Access limited to owned projects and their tasks
    User,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Whether this role bypasses ownership checks
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Optional display name
    pub full_name: Option<String>,

    /// Argon2id password hash, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Whether the account is active
    ///
    /// Currently informational: the authorization policy does not consult
    /// this flag (see `access::policy`).
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity this user presents when performing operations
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
            is_active: self.is_active,
        }
    }
}

/// The authenticated identity performing an operation
///
/// Supplied by the authentication layer on every call into the access
/// service; there is no ambient "current user" state anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID
    pub id: Uuid,

    /// Account role
    pub role: UserRole,

    /// Account active flag, carried for completeness
    pub is_active: bool,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Optional display name
    pub full_name: Option<String>,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, full_name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, full_name, password_hash, role, is_active, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.full_name)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, password_hash, role, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, password_hash, role, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            full_name: Some("Test User".to_string()),
            password_hash: "hash".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::User.as_str(), "user");
    }

    #[test]
    fn test_role_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
    }

    #[test]
    fn test_actor_from_user() {
        let user = sample_user(UserRole::Admin);
        let actor = user.actor();
        assert_eq!(actor.id, user.id);
        assert_eq!(actor.role, UserRole::Admin);
        assert!(actor.is_active);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = sample_user(UserRole::User);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("test@example.com"));
    }
}
