/// JWT access token generation and validation
///
/// Tokens are signed with HS256 and carry the user id as subject. Role and
/// activity status are deliberately NOT embedded: the API middleware
/// re-reads the user from the store on every request, so revoking or
/// demoting an account takes effect immediately rather than at token
/// expiry.
///
/// # Example
///
/// ```
/// use cloudtask_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let claims = Claims::new(user_id, chrono::Duration::minutes(30));
/// let token = create_token(&claims, "a-secret-at-least-32-bytes-long!")?;
///
/// let validated = validate_token(&token, "a-secret-at-least-32-bytes-long!")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped into every token
pub const ISSUER: &str = "cloudtask";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "cloudtask"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `user_id` expiring after `expires_in`
    pub fn new(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token's signature, expiry, and issuer
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens and
/// `JwtError::ValidationError` for any other defect (bad signature, wrong
/// issuer, malformed token).
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(JwtError::Expired),
            _ => Err(JwtError::ValidationError(e.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::minutes(30));
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, ISSUER);
        assert!(!validated.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4(), Duration::minutes(30));
        let token = create_token(&claims, SECRET).unwrap();

        let err = validate_token(&token, "another-secret-also-32-bytes-long!").unwrap_err();
        assert!(matches!(err, JwtError::ValidationError(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::new(Uuid::new_v4(), Duration::minutes(-5));
        let token = create_token(&claims, SECRET).unwrap();

        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = validate_token("definitely.not.ajwt", SECRET).unwrap_err();
        assert!(matches!(err, JwtError::ValidationError(_)));
    }
}
