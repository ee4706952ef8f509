/// Goal model and database operations
///
/// Goals carry free-text action steps and a progress percentage. The schema
/// checks the 0..=100 range; the API validates it before the row is written.
/// The dashboard counts goals with progress strictly between 0 and 100 as
/// "in progress".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Goal model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goal {
    /// Unique goal ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Goal text
    pub goal: String,

    /// Free-text action steps
    pub action_steps: Option<String>,

    /// Progress percentage in [0, 100]
    pub progress: i32,

    /// When the goal was created
    pub created_at: DateTime<Utc>,

    /// When the goal was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a goal; progress defaults to 0
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoal {
    pub goal: String,
    #[serde(default)]
    pub action_steps: Option<String>,
    #[serde(default)]
    pub progress: i32,
}

/// Input for updating a goal (full replacement of the mutable fields)
pub type UpdateGoal = CreateGoal;

impl Goal {
    /// Lists all goals for an owner (insertion order)
    pub async fn list_for(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, goal, action_steps, progress, created_at, updated_at
            FROM goals
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(goals)
    }

    /// Creates a goal for an owner
    pub async fn create(pool: &PgPool, owner: Uuid, data: CreateGoal) -> Result<Self, sqlx::Error> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (user_id, goal, action_steps, progress)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, goal, action_steps, progress, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(data.goal)
        .bind(data.action_steps)
        .bind(data.progress)
        .fetch_one(pool)
        .await?;

        Ok(goal)
    }

    /// Updates a goal by id, scoped to the owner
    ///
    /// Returns whether a row matched; a foreign id matches zero rows and is
    /// treated by callers as a silent no-op.
    pub async fn update(
        pool: &PgPool,
        owner: Uuid,
        id: Uuid,
        data: UpdateGoal,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE goals
            SET goal = $3, action_steps = $4, progress = $5, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(data.goal)
        .bind(data.action_steps)
        .bind(data.progress)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a goal by id, scoped to the owner
    pub async fn delete(pool: &PgPool, owner: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_goal_progress_defaults_to_zero() {
        let data: CreateGoal =
            serde_json::from_str(r#"{"goal": "Read 12 books"}"#).unwrap();

        assert_eq!(data.progress, 0);
        assert!(data.action_steps.is_none());
    }
}
