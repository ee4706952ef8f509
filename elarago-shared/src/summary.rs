/// Dashboard summary aggregator
///
/// A pure read over the four collections, computing four metrics for one
/// owner. The "today" date is passed in by the caller so the computation is
/// deterministic and testable.
///
/// Metrics:
/// - tasks due exactly today that are not completed
/// - sum of all weekly habit day flags (a running total, not normalized)
/// - goals with progress strictly between 0 and 100
/// - mean stress across all journal entries, 0 when there are none, rounded
///   to one decimal place

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// The four dashboard metrics
///
/// Serializes to the fixed display-key shape the dashboard and the export
/// consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(rename = "Tasks Due Today")]
    pub tasks_due_today: i64,

    #[serde(rename = "Habits Completed This Week")]
    pub habits_completed_this_week: i64,

    #[serde(rename = "Goals In Progress")]
    pub goals_in_progress: i64,

    #[serde(rename = "Avg. Stress Level")]
    pub avg_stress_level: f64,
}

impl DashboardSummary {
    /// Metric rows as (label, value) pairs, in display order
    pub fn metrics(&self) -> [(&'static str, f64); 4] {
        [
            ("Tasks Due Today", self.tasks_due_today as f64),
            (
                "Habits Completed This Week",
                self.habits_completed_this_week as f64,
            ),
            ("Goals In Progress", self.goals_in_progress as f64),
            ("Avg. Stress Level", self.avg_stress_level),
        ]
    }
}

/// Computes the dashboard summary for one owner
///
/// # Errors
///
/// Returns an error if any of the four queries fails.
pub async fn dashboard_summary(
    pool: &PgPool,
    owner: Uuid,
    today: NaiveDate,
) -> Result<DashboardSummary, sqlx::Error> {
    let (tasks_due_today,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM tasks
        WHERE user_id = $1 AND due_date = $2 AND status != 'Completed'
        "#,
    )
    .bind(owner)
    .bind(today)
    .fetch_one(pool)
    .await?;

    let (habits_completed_this_week,): (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(
            mon::int + tue::int + wed::int + thu::int + fri::int + sat::int + sun::int
        ), 0)
        FROM habits
        WHERE user_id = $1
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;

    let (goals_in_progress,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM goals
        WHERE user_id = $1 AND progress > 0 AND progress < 100
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;

    let (avg_stress,): (Option<f64>,) = sqlx::query_as(
        r#"
        SELECT AVG(stress)::float8
        FROM journal_entries
        WHERE user_id = $1
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(DashboardSummary {
        tasks_due_today,
        habits_completed_this_week,
        goals_in_progress,
        avg_stress_level: rounded_avg(avg_stress),
    })
}

/// Rounds an optional mean to one decimal place, defaulting to 0 for "no
/// entries"
fn rounded_avg(avg: Option<f64>) -> f64 {
    match avg {
        Some(v) => (v * 10.0).round() / 10.0,
        None => 0.0,
    }
}
