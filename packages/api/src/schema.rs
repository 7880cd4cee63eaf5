//! # Request and response bodies
//!
//! One struct per endpoint body, shared by the axum handlers and
//! [`crate::ApiClient`]. Request types carry a `validate` step that trims and
//! normalises input and rejects malformed values before anything reaches a
//! store; the browser runs the same checks before submitting a form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::{hours_until_due, Priority, ReminderTier, Task, TaskPatch};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UserInfo;

pub const MIN_PASSWORD_LEN: usize = 6;

/// A rejected request body.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        let email = normalize_email(&self.email);

        if name.is_empty() {
            return Err(ValidationError::new("Name is required"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationError::new("Invalid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(Self {
            name,
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let email = normalize_email(&self.email);
        if email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::new("Email and password are required"));
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl NewTaskRequest {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::new("Title is required"));
        }
        Ok(Self {
            title,
            description: clean_description(self.description),
            due_date: self.due_date,
            priority: self.priority,
        })
    }

    pub fn into_task(self, owner: Uuid, now: DateTime<Utc>) -> Task {
        Task::new(
            owner,
            self.title,
            self.description,
            self.due_date,
            self.priority.unwrap_or_default(),
            now,
        )
    }
}

/// Validate a `PUT /updateTask/:id` body.
pub fn validate_patch(patch: TaskPatch) -> Result<TaskPatch, ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::new("No fields to update"));
    }
    let title = match patch.title {
        Some(title) => {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ValidationError::new("Title cannot be empty"));
            }
            Some(title)
        }
        None => None,
    };
    Ok(TaskPatch {
        title,
        description: patch.description.map(clean_description),
        ..patch
    })
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A mutated task together with a human-readable acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskMessage {
    pub message: String,
    pub task: Task,
}

/// Body of `GET /notification-stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStats {
    pub total_upcoming_tasks: usize,
    pub tasks_in_next_24_hours: usize,
    pub tasks_in_next_12_hours: usize,
    pub upcoming_tasks: Vec<UpcomingTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingTask {
    pub id: Uuid,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub hours_until_due: i64,
    pub reminder_sent: bool,
    pub last_reminder_sent: Option<DateTime<Utc>>,
    /// The tier the next scan would send for this task, if any.
    pub eligible_tier: Option<ReminderTier>,
}

impl NotificationStats {
    /// Summarise incomplete tasks due at or after `now`, soonest first.
    pub fn from_upcoming(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let within = |task: &Task, hours: i64| {
            task.due_date.is_some_and(|due| {
                let secs = (due - now).num_seconds();
                secs > 0 && secs <= hours * 3600
            })
        };

        let upcoming_tasks = tasks
            .iter()
            .filter_map(|task| {
                let due_date = task.due_date?;
                Some(UpcomingTask {
                    id: task.id,
                    title: task.title.clone(),
                    due_date,
                    priority: task.priority,
                    hours_until_due: hours_until_due(due_date, now),
                    reminder_sent: task.reminder_sent,
                    last_reminder_sent: task.last_reminder_sent,
                    eligible_tier: store::eligible_tier(task, now),
                })
            })
            .collect::<Vec<_>>();

        Self {
            total_upcoming_tasks: upcoming_tasks.len(),
            tasks_in_next_24_hours: tasks.iter().filter(|t| within(t, 24)).count(),
            tasks_in_next_12_hours: tasks.iter().filter(|t| within(t, 12)).count(),
            upcoming_tasks,
        }
    }
}

/// Body of `POST /trigger-reminders`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub message: String,
    #[serde(rename = "sent24h")]
    pub sent_24h: usize,
    #[serde(rename = "sent12h")]
    pub sent_12h: usize,
    pub failed: usize,
}
