//! # Domain models for tasks and accounts
//!
//! These types are shared by the server (persistence, reminder scan, REST
//! handlers) and the browser client (rendering, optimistic updates), so they
//! are `Serialize + Deserialize` and use camelCase field names on the wire.
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Task`] | A single task owned by exactly one user. Keeps `completed_at` in step with `completed`. |
//! | [`Priority`] | High / Medium / Low, ranked 1 / 2 / 3 for listings. |
//! | [`TaskPatch`] | A partial update. Absent fields are untouched; `description` and `due_date` accept an explicit `null` to clear. |
//! | [`TaskFilter`] | Which slice of a user's tasks a listing returns, and how it is ordered. |
//! | [`User`] | A stored account, including the password hash. Never serialised. |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Task priority. Listings order tasks by [`Priority::rank`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: High = 1, Medium = 2, Low = 3.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `High`, `Medium`, `Low`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPriority(pub String);

impl fmt::Display for UnknownPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown priority '{}'", self.0)
    }
}

impl std::error::Error for UnknownPriority {}

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

/// A task owned by a single user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub completed: bool,
    /// Set iff `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
    pub reminder_sent: bool,
    pub last_reminder_sent: Option<DateTime<Utc>>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a fresh, incomplete task for `owner_id`.
    pub fn new(
        owner_id: Uuid,
        title: String,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            due_date,
            priority,
            completed: false,
            completed_at: None,
            reminder_sent: false,
            last_reminder_sent: None,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `completed`, stamping or clearing `completed_at` on a transition.
    /// Setting the current state again leaves `completed_at` as it was.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if self.completed == completed {
            return;
        }
        self.completed = completed;
        self.completed_at = completed.then_some(now);
        self.updated_at = now;
    }

    /// Flip completion.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.set_completed(!self.completed, now);
    }

    /// Apply a partial update. Reminder flags are never touched here.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(completed) = patch.completed {
            self.set_completed(completed, now);
        }
        self.updated_at = now;
    }
}

/// Partial update of a task.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &TaskPatch::default()
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Which of a user's tasks a listing returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }

    /// Order a listing: completed tasks newest-completed first, everything
    /// else by priority rank. Both sorts are stable, so equal keys keep
    /// their stored order.
    pub fn sort(self, tasks: &mut [Task]) {
        match self {
            TaskFilter::Completed => {
                tasks.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
            }
            TaskFilter::All | TaskFilter::Active => {
                tasks.sort_by_key(|t| t.priority.rank());
            }
        }
    }
}

/// A stored account.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Trimmed and lowercased.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(priority: Priority) -> Task {
        Task::new(
            Uuid::new_v4(),
            format!("{priority} task"),
            None,
            None,
            priority,
            Utc::now(),
        )
    }

    #[test]
    fn toggle_twice_restores_state() {
        let now = Utc::now();
        let mut t = task(Priority::Medium);
        let original = (t.completed, t.completed_at);

        t.toggle(now);
        assert!(t.completed);
        assert_eq!(t.completed_at, Some(now));

        t.toggle(now + Duration::minutes(1));
        assert_eq!((t.completed, t.completed_at), original);
    }

    #[test]
    fn patch_completed_keeps_completed_at_in_step() {
        let now = Utc::now();
        let mut t = task(Priority::Low);

        t.apply(
            &TaskPatch {
                completed: Some(true),
                ..Default::default()
            },
            now,
        );
        assert_eq!(t.completed_at, Some(now));

        // Re-sending the same state must not restamp.
        t.apply(
            &TaskPatch {
                completed: Some(true),
                ..Default::default()
            },
            now + Duration::hours(1),
        );
        assert_eq!(t.completed_at, Some(now));

        t.apply(
            &TaskPatch {
                completed: Some(false),
                ..Default::default()
            },
            now,
        );
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn patch_does_not_touch_reminder_flags() {
        let now = Utc::now();
        let mut t = task(Priority::High);
        t.reminder_sent = true;
        t.last_reminder_sent = Some(now);

        t.apply(
            &TaskPatch {
                title: Some("renamed".into()),
                due_date: Some(None),
                ..Default::default()
            },
            now,
        );
        assert_eq!(t.title, "renamed");
        assert!(t.due_date.is_none());
        assert!(t.reminder_sent);
        assert_eq!(t.last_reminder_sent, Some(now));
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"description": null, "priority": "High"}"#).unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.due_date, None);
        assert_eq!(patch.priority, Some(Priority::High));
        assert!(!patch.is_empty());

        let empty: TaskPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn priority_sort_is_stable_and_ranked() {
        let mut tasks = vec![
            task(Priority::Low),
            task(Priority::High),
            task(Priority::Medium),
            task(Priority::High),
        ];
        let second_high = tasks[3].id;
        TaskFilter::Active.sort(&mut tasks);

        let ranks: Vec<u8> = tasks.iter().map(|t| t.priority.rank()).collect();
        assert_eq!(ranks, vec![1, 1, 2, 3]);
        assert_eq!(tasks[1].id, second_high);
    }

    #[test]
    fn completed_sort_is_newest_first() {
        let now = Utc::now();
        let mut older = task(Priority::High);
        older.set_completed(true, now - Duration::hours(2));
        let mut newer = task(Priority::Low);
        newer.set_completed(true, now);

        let mut tasks = vec![older.clone(), newer.clone()];
        TaskFilter::Completed.sort(&mut tasks);
        assert_eq!(tasks[0].id, newer.id);
        assert_eq!(tasks[1].id, older.id);
    }

    #[test]
    fn priority_parses_and_defaults() {
        assert_eq!("Low".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
