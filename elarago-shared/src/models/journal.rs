/// Journal entry model and database operations
///
/// One entry per reflection: date, mood label, a stress level, and free-text
/// gratitude/highlight/notes. Listing returns newest entries first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Journal entry model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JournalEntry {
    /// Unique entry ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Date the entry is for
    pub entry_date: NaiveDate,

    /// Mood label (e.g., "Calm")
    pub mood: Option<String>,

    /// Stress level (0-10)
    pub stress: i32,

    /// What the owner is grateful for
    pub gratitude: Option<String>,

    /// Highlight of the day
    pub highlight: Option<String>,

    /// Free-form reflection notes
    pub notes: Option<String>,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a journal entry; stress defaults to 0
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJournalEntry {
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub stress: i32,
    #[serde(default)]
    pub gratitude: Option<String>,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl JournalEntry {
    /// Lists all entries for an owner, newest first
    pub async fn list_for(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT id, user_id, entry_date, mood, stress, gratitude, highlight,
                   notes, created_at, updated_at
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY entry_date DESC
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Creates a journal entry for an owner
    pub async fn create(
        pool: &PgPool,
        owner: Uuid,
        data: CreateJournalEntry,
    ) -> Result<Self, sqlx::Error> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries
                (user_id, entry_date, mood, stress, gratitude, highlight, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, entry_date, mood, stress, gratitude, highlight,
                      notes, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(data.entry_date)
        .bind(data.mood)
        .bind(data.stress)
        .bind(data.gratitude)
        .bind(data.highlight)
        .bind(data.notes)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_entry_stress_defaults_to_zero() {
        let data: CreateJournalEntry =
            serde_json::from_str(r#"{"entry_date": "2024-03-01", "mood": "Calm"}"#).unwrap();

        assert_eq!(data.stress, 0);
        assert_eq!(data.mood.as_deref(), Some("Calm"));
    }
}
