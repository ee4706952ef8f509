/// Habit model and database operations
///
/// A habit is a label plus a weekly bitmap: seven boolean day flags that the
/// owner toggles as the week goes on. The dashboard sums every flag across
/// all habits as a running completion total.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE habits (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     habit TEXT NOT NULL,
///     mon BOOLEAN NOT NULL DEFAULT FALSE,
///     tue BOOLEAN NOT NULL DEFAULT FALSE,
///     wed BOOLEAN NOT NULL DEFAULT FALSE,
///     thu BOOLEAN NOT NULL DEFAULT FALSE,
///     fri BOOLEAN NOT NULL DEFAULT FALSE,
///     sat BOOLEAN NOT NULL DEFAULT FALSE,
///     sun BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Habit model: a weekly tracker
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Habit {
    /// Unique habit ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Habit label (e.g., "Meditate")
    pub habit: String,

    pub mon: bool,
    pub tue: bool,
    pub wed: bool,
    pub thu: bool,
    pub fri: bool,
    pub sat: bool,
    pub sun: bool,

    /// When the habit was created
    pub created_at: DateTime<Utc>,

    /// When the habit was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a habit; unset day flags default to false
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHabit {
    pub habit: String,
    #[serde(default)]
    pub mon: bool,
    #[serde(default)]
    pub tue: bool,
    #[serde(default)]
    pub wed: bool,
    #[serde(default)]
    pub thu: bool,
    #[serde(default)]
    pub fri: bool,
    #[serde(default)]
    pub sat: bool,
    #[serde(default)]
    pub sun: bool,
}

/// Input for updating a habit (full replacement of the mutable fields)
pub type UpdateHabit = CreateHabit;

impl Habit {
    /// Number of days checked off this week
    pub fn days_completed(&self) -> i64 {
        [
            self.mon, self.tue, self.wed, self.thu, self.fri, self.sat, self.sun,
        ]
        .iter()
        .filter(|&&d| d)
        .count() as i64
    }

    /// Lists all habits for an owner (insertion order)
    pub async fn list_for(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let habits = sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, user_id, habit, mon, tue, wed, thu, fri, sat, sun,
                   created_at, updated_at
            FROM habits
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(habits)
    }

    /// Creates a habit for an owner
    pub async fn create(
        pool: &PgPool,
        owner: Uuid,
        data: CreateHabit,
    ) -> Result<Self, sqlx::Error> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (user_id, habit, mon, tue, wed, thu, fri, sat, sun)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, habit, mon, tue, wed, thu, fri, sat, sun,
                      created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(data.habit)
        .bind(data.mon)
        .bind(data.tue)
        .bind(data.wed)
        .bind(data.thu)
        .bind(data.fri)
        .bind(data.sat)
        .bind(data.sun)
        .fetch_one(pool)
        .await?;

        Ok(habit)
    }

    /// Updates a habit by id, scoped to the owner
    ///
    /// Returns whether a row matched; a foreign id matches zero rows and is
    /// treated by callers as a silent no-op.
    pub async fn update(
        pool: &PgPool,
        owner: Uuid,
        id: Uuid,
        data: UpdateHabit,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE habits
            SET habit = $3, mon = $4, tue = $5, wed = $6, thu = $7,
                fri = $8, sat = $9, sun = $10, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(data.habit)
        .bind(data.mon)
        .bind(data.tue)
        .bind(data.wed)
        .bind(data.thu)
        .bind(data.fri)
        .bind(data.sat)
        .bind(data.sun)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a habit by id, scoped to the owner
    pub async fn delete(pool: &PgPool, owner: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1 AND user_id = $2")
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

    fn habit_with_flags(flags: [bool; 7]) -> Habit {
        Habit {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            habit: "Exercise".to_string(),
            mon: flags[0],
            tue: flags[1],
            wed: flags[2],
            thu: flags[3],
            fri: flags[4],
            sat: flags[5],
            sun: flags[6],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_days_completed() {
        let habit = habit_with_flags([true, true, false, true, false, false, true]);
        assert_eq!(habit.days_completed(), 4);

        let empty = habit_with_flags([false; 7]);
        assert_eq!(empty.days_completed(), 0);
    }

    #[test]
    fn test_create_habit_flag_defaults() {
        let data: CreateHabit =
            serde_json::from_str(r#"{"habit": "Plan Tomorrow", "wed": true}"#).unwrap();

        assert!(data.wed);
        assert!(!data.mon && !data.tue && !data.thu && !data.fri && !data.sat && !data.sun);
    }
}
