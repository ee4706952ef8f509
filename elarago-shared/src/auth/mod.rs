/// Authentication primitives
///
/// - `password`: Argon2id password hashing and verification
/// - `session`: signed session tokens mapping a bearer token to a user id

pub mod password;
pub mod session;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authentication context added to request extensions
///
/// Inserted by the API's session middleware after a token validates.
/// Handlers extract it with Axum's `Extension` extractor; every per-user
/// query is scoped by `user_id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context for a validated session
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
