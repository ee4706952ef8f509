/// Task model and database operations
///
/// Tasks are to-do items with a project label, an ordinal priority, an
/// optional due date, and a completion status. Listing orders by due date
/// ascending (nulls last) with priority descending as the tiebreak, so the
/// most urgent work sorts first.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
/// CREATE TYPE task_status AS ENUM ('Not Started', 'In Progress', 'Completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task TEXT NOT NULL,
///     project TEXT,
///     priority task_priority NOT NULL DEFAULT 'Medium',
///     due_date DATE,
///     status task_status NOT NULL DEFAULT 'Not Started',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The priority enum is declared low-to-high, so `ORDER BY priority DESC`
/// yields High before Medium before Low.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority (ordinal: Low < Medium < High)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_priority")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Default for newly created tasks
    #[sqlx(rename = "Not Started")]
    #[serde(rename = "Not Started")]
    NotStarted,

    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,

    Completed,
}

/// Task model representing one to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Task text
    pub task: String,

    /// Optional project label
    pub project: Option<String>,

    /// Priority (Low/Medium/High)
    pub priority: Priority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Completion status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// Priority defaults to Medium and status to "Not Started" when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub task: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
}

fn default_priority() -> Priority {
    Priority::Medium
}

fn default_status() -> TaskStatus {
    TaskStatus::NotStarted
}

/// Input for updating a task (full replacement of the mutable fields)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub task: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
}

impl Task {
    /// Lists all tasks for an owner, most urgent first
    ///
    /// Ordering: due date ascending (undated tasks last), then priority
    /// descending.
    pub async fn list_for(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, task, project, priority, due_date, status,
                   created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY due_date ASC, priority DESC
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Creates a task for an owner
    pub async fn create(pool: &PgPool, owner: Uuid, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, task, project, priority, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, task, project, priority, due_date, status,
                      created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(data.task)
        .bind(data.project)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task by id, scoped to the owner
    ///
    /// Returns whether a row matched. An id owned by someone else matches
    /// zero rows; callers treat that as a silent no-op, not an error.
    pub async fn update(
        pool: &PgPool,
        owner: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET task = $3, project = $4, priority = $5, due_date = $6,
                status = $7, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(data.task)
        .bind(data.project)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.status)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task by id, scoped to the owner
    ///
    /// Same zero-row semantics as [`Task::update`].
    pub async fn delete(pool: &PgPool, owner: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
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
    fn test_priority_ordinal() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::NotStarted).unwrap(),
            "\"Not Started\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"Completed\""
        );
    }

    #[test]
    fn test_create_task_defaults() {
        let data: CreateTask = serde_json::from_str(r#"{"task": "Water the plants"}"#).unwrap();

        assert_eq!(data.task, "Water the plants");
        assert_eq!(data.priority, Priority::Medium);
        assert_eq!(data.status, TaskStatus::NotStarted);
        assert!(data.project.is_none());
        assert!(data.due_date.is_none());
    }
}
