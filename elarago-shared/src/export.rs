/// Export assembler
///
/// Snapshots all of one owner's collections plus the dashboard summary and
/// renders them as named tabular sheets. The spreadsheet file writer itself
/// is an external sink: this module produces sheet names, headers, and typed
/// cell values, and the API edge feeds them to the xlsx writer.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::goal::Goal;
use crate::models::habit::Habit;
use crate::models::journal::JournalEntry;
use crate::models::task::Task;
use crate::summary::{dashboard_summary, DashboardSummary};

/// A single cell in a rendered sheet
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn opt_text(value: &Option<String>) -> Self {
        match value {
            Some(v) => Cell::Text(v.clone()),
            None => Cell::Empty,
        }
    }

    fn opt_date(value: &Option<NaiveDate>) -> Self {
        match value {
            Some(d) => Cell::Text(d.to_string()),
            None => Cell::Empty,
        }
    }
}

/// One rendered sheet: a name, a header row, and data rows
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: &'static str,
    pub header: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

/// Snapshot of everything one owner can export
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub goals: Vec<Goal>,
    pub journal: Vec<JournalEntry>,
    pub summary: DashboardSummary,
}

/// Workbook filename offered in the download
pub const EXPORT_FILENAME: &str = "ElaraGo_Dashboard.xlsx";

impl ExportSnapshot {
    /// Reads all collections and the summary for one owner
    pub async fn capture(
        pool: &PgPool,
        owner: Uuid,
        today: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        let tasks = Task::list_for(pool, owner).await?;
        let habits = Habit::list_for(pool, owner).await?;
        let goals = Goal::list_for(pool, owner).await?;
        let journal = JournalEntry::list_for(pool, owner).await?;
        let summary = dashboard_summary(pool, owner, today).await?;

        Ok(Self {
            tasks,
            habits,
            goals,
            journal,
            summary,
        })
    }

    /// Renders the snapshot as the five export sheets, in workbook order
    pub fn sheets(&self) -> Vec<Sheet> {
        let day_flag = |on: bool| Cell::Number(if on { 1.0 } else { 0.0 });

        let tasks = Sheet {
            name: "Tasks",
            header: &["ID", "Task", "Project", "Priority", "Due Date", "Status"],
            rows: self
                .tasks
                .iter()
                .map(|t| {
                    vec![
                        Cell::text(t.id.to_string()),
                        Cell::text(&t.task),
                        Cell::opt_text(&t.project),
                        Cell::text(format!("{:?}", t.priority)),
                        Cell::opt_date(&t.due_date),
                        Cell::text(status_label(t)),
                    ]
                })
                .collect(),
        };

        let habits = Sheet {
            name: "Habits",
            header: &["Habit", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            rows: self
                .habits
                .iter()
                .map(|h| {
                    vec![
                        Cell::text(&h.habit),
                        day_flag(h.mon),
                        day_flag(h.tue),
                        day_flag(h.wed),
                        day_flag(h.thu),
                        day_flag(h.fri),
                        day_flag(h.sat),
                        day_flag(h.sun),
                    ]
                })
                .collect(),
        };

        let goals = Sheet {
            name: "Goals",
            header: &["Goal", "Action Steps", "Progress %"],
            rows: self
                .goals
                .iter()
                .map(|g| {
                    vec![
                        Cell::text(&g.goal),
                        Cell::opt_text(&g.action_steps),
                        Cell::Number(g.progress as f64),
                    ]
                })
                .collect(),
        };

        let journal = Sheet {
            name: "Daily Journal",
            header: &[
                "Date",
                "Mood",
                "Stress Level (1-10)",
                "Gratitude",
                "Today's Highlight",
                "Reflection/Notes",
            ],
            rows: self
                .journal
                .iter()
                .map(|j| {
                    vec![
                        Cell::text(j.entry_date.to_string()),
                        Cell::opt_text(&j.mood),
                        Cell::Number(j.stress as f64),
                        Cell::opt_text(&j.gratitude),
                        Cell::opt_text(&j.highlight),
                        Cell::opt_text(&j.notes),
                    ]
                })
                .collect(),
        };

        let summary = Sheet {
            name: "Dashboard Summary",
            header: &["Metric", "Value"],
            rows: self
                .summary
                .metrics()
                .iter()
                .map(|(label, value)| vec![Cell::text(*label), Cell::Number(*value)])
                .collect(),
        };

        vec![tasks, habits, goals, journal, summary]
    }
}

/// Status display label, matching the wire format
fn status_label(task: &Task) -> &'static str {
    use crate::models::task::TaskStatus;
    match task.status {
        TaskStatus::NotStarted => "Not Started",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Completed => "Completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{Priority, TaskStatus};
    use chrono::Utc;

    fn sample_snapshot() -> ExportSnapshot {
        let owner = Uuid::new_v4();
        let now = Utc::now();

        ExportSnapshot {
            tasks: vec![Task {
                id: Uuid::new_v4(),
                user_id: owner,
                task: "Define weekly goals".to_string(),
                project: Some("Elara Go".to_string()),
                priority: Priority::High,
                due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
                status: TaskStatus::InProgress,
                created_at: now,
                updated_at: now,
            }],
            habits: vec![Habit {
                id: Uuid::new_v4(),
                user_id: owner,
                habit: "Meditate".to_string(),
                mon: true,
                tue: true,
                wed: false,
                thu: true,
                fri: true,
                sat: false,
                sun: true,
                created_at: now,
                updated_at: now,
            }],
            goals: vec![Goal {
                id: Uuid::new_v4(),
                user_id: owner,
                goal: "Launch Elara Go".to_string(),
                action_steps: Some("Complete MVP, Setup billing, Launch".to_string()),
                progress: 60,
                created_at: now,
                updated_at: now,
            }],
            journal: vec![JournalEntry {
                id: Uuid::new_v4(),
                user_id: owner,
                entry_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                mood: Some("Calm".to_string()),
                stress: 3,
                gratitude: Some("Good sleep".to_string()),
                highlight: None,
                notes: None,
                created_at: now,
                updated_at: now,
            }],
            summary: DashboardSummary {
                tasks_due_today: 1,
                habits_completed_this_week: 5,
                goals_in_progress: 1,
                avg_stress_level: 3.0,
            },
        }
    }

    #[test]
    fn test_sheet_names_and_order() {
        let sheets = sample_snapshot().sheets();

        let names: Vec<_> = sheets.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["Tasks", "Habits", "Goals", "Daily Journal", "Dashboard Summary"]
        );
    }

    #[test]
    fn test_rows_match_headers() {
        for sheet in sample_snapshot().sheets() {
            for row in &sheet.rows {
                assert_eq!(row.len(), sheet.header.len(), "sheet {}", sheet.name);
            }
        }
    }

    #[test]
    fn test_task_row_values() {
        let sheets = sample_snapshot().sheets();
        let tasks = &sheets[0];

        assert_eq!(tasks.rows[0][1], Cell::Text("Define weekly goals".to_string()));
        assert_eq!(tasks.rows[0][3], Cell::Text("High".to_string()));
        assert_eq!(tasks.rows[0][4], Cell::Text("2024-03-01".to_string()));
        assert_eq!(tasks.rows[0][5], Cell::Text("In Progress".to_string()));
    }

    #[test]
    fn test_habit_flags_rendered_as_numbers() {
        let sheets = sample_snapshot().sheets();
        let habits = &sheets[1];

        assert_eq!(habits.rows[0][1], Cell::Number(1.0)); // mon
        assert_eq!(habits.rows[0][3], Cell::Number(0.0)); // wed
    }

    #[test]
    fn test_summary_sheet_has_four_metrics() {
        let sheets = sample_snapshot().sheets();
        let summary = &sheets[4];

        assert_eq!(summary.rows.len(), 4);
        assert_eq!(summary.rows[0][0], Cell::Text("Tasks Due Today".to_string()));
        assert_eq!(summary.rows[0][1], Cell::Number(1.0));
    }
}
