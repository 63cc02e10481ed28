/// Authentication endpoints
///
/// - `POST /api/v1/auth/register`: create an account, returns the user
/// - `POST /api/v1/auth/login`: verify credentials, returns a bearer token
///
/// Every account registers with the `user` role; admins are promoted out
/// of band. Login failures deliberately do not reveal whether the email or
/// the password was wrong.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use cloudtask_shared::auth::{jwt, password};
use cloudtask_shared::models::user::{CreateUser, User, UserRole};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub full_name: Option<String>,
}

/// Public view of a user account
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub full_name: Option<String>,

    /// Account role
    pub role: UserRole,

    /// Account active flag
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Signed access token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .store
        .create_user(CreateUser {
            email: req.email,
            full_name: req.full_name,
            password_hash,
            role: UserRole::User,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(user.into()))
}

/// Log in and obtain an access token
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = state
        .store
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, state.token_lifetime());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
