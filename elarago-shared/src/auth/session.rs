/// Session token generation and validation
///
/// Sessions are signed HS256 tokens carrying the user id. The token is opaque
/// to clients; the server validates the signature, expiration, and issuer on
/// every request. There is a single token type with a 30-day lifetime:
/// browser-session semantics, not an access/refresh pair.
///
/// # Example
///
/// ```
/// use elarago_shared::auth::session::{create_session_token, validate_session_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let token = create_session_token(user_id, "a-secret-of-at-least-32-bytes!!!")?;
///
/// let claims = validate_session_token(&token, "a-secret-of-at-least-32-bytes!!!")?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer baked into every session token
const ISSUER: &str = "elarago";

/// Session lifetime
const SESSION_DAYS: i64 = 30;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Token failed validation (bad signature, malformed, wrong claims)
    #[error("Invalid session token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Session has expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "elarago"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims for a new session with the default lifetime
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_DAYS)).timestamp(),
        }
    }
}

/// Creates a signed session token for a user
///
/// # Errors
///
/// Returns `SessionError::CreateError` if signing fails.
pub fn create_session_token(user_id: Uuid, secret: &str) -> Result<String, SessionError> {
    let claims = SessionClaims::new(user_id);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SessionError::CreateError(e.to_string()))
}

/// Validates a session token and returns its claims
///
/// Checks the signature, expiration, and issuer.
///
/// # Errors
///
/// Returns `SessionError::Expired` for expired tokens and
/// `SessionError::ValidationError` for any other failure.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_session_token(user_id, SECRET).expect("Create should succeed");

        let claims = validate_session_token(&token, SECRET).expect("Validate should succeed");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_session_token(Uuid::new_v4(), SECRET).expect("Create should succeed");

        let result = validate_session_token(&token, "a-completely-different-secret-key!!");
        assert!(matches!(result, Err(SessionError::ValidationError(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = validate_session_token("not.a.token", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: Uuid::new_v4(),
            iss: ISSUER.to_string(),
            iat: (now - Duration::days(31)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = validate_session_token(&token, SECRET);
        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: Uuid::new_v4(),
            iss: "someone-else".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = validate_session_token(&token, SECRET);
        assert!(matches!(result, Err(SessionError::ValidationError(_))));
    }

    #[test]
    fn test_claims_lifetime() {
        let claims = SessionClaims::new(Uuid::new_v4());
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, SESSION_DAYS * 24 * 60 * 60);
    }
}
