/// Database models
///
/// All child entities are owner-scoped: every row carries a `user_id` foreign
/// key and every query filters by it. Update and delete statements are scoped
/// `WHERE id = $1 AND user_id = $2` and silently match zero rows when the id
/// belongs to another owner.
///
/// # Models
///
/// - `user`: accounts, credentials, and plan/billing state
/// - `task`: to-do items with priority, due date, and status
/// - `habit`: weekly habit trackers (seven day flags)
/// - `goal`: goals with free-text action steps and a progress percentage
/// - `journal`: daily journal entries (mood, stress, reflections)

pub mod goal;
pub mod habit;
pub mod journal;
pub mod task;
pub mod user;
