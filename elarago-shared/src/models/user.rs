/// User model and database operations
///
/// Users own all other entities and carry the subscription state the billing
/// reconciler converges: plan tier, provider customer/subscription references,
/// and the renewal timestamp.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     plan plan_tier NOT NULL DEFAULT 'free',
///     stripe_customer_id TEXT,
///     stripe_subscription_id TEXT,
///     plan_renewal BIGINT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Emails are normalized to lowercase at the API boundary before they reach
/// this module.
///
/// # Example
///
/// ```no_run
/// use elarago_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "user@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
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

/// Subscription plan tier
///
/// `plan != Free` implies a subscription reference was stored at some point;
/// cancellation reverts the plan to `Free` and clears the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_tier")]
pub enum Plan {
    /// Free tier (default)
    #[sqlx(rename = "free")]
    #[serde(rename = "free")]
    Free,

    /// Paid six-month plan
    #[sqlx(rename = "pro-6mo")]
    #[serde(rename = "pro-6mo")]
    Pro6Mo,
}

impl Plan {
    /// Gets the plan's wire/display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro6Mo => "pro-6mo",
        }
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address (lowercase, unique)
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Current subscription plan
    pub plan: Plan,

    /// External billing customer reference (set on first checkout/portal use)
    pub stripe_customer_id: Option<String>,

    /// External subscription reference (cleared on cancellation)
    pub stripe_subscription_id: Option<String>,

    /// Current period end of the subscription (epoch seconds)
    pub plan_renewal: Option<i64>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (already lowercased)
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user on the free plan
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, plan, stripe_customer_id,
                      stripe_subscription_id, plan_renewal, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, plan, stripe_customer_id,
                   stripe_subscription_id, plan_renewal, created_at, updated_at
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
            SELECT id, email, password_hash, plan, stripe_customer_id,
                   stripe_subscription_id, plan_renewal, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Stores the external billing customer reference for a user
    ///
    /// Called when the customer record is lazily provisioned before a
    /// checkout or portal session. The write is an absolute assignment.
    pub async fn set_customer_ref(
        pool: &PgPool,
        id: Uuid,
        customer_ref: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET stripe_customer_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(customer_ref)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
