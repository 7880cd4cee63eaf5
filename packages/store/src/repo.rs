//! # Store traits
//!
//! The REST handlers and the reminder scan only talk to persistence through
//! [`TaskStore`] and [`UserStore`], so the same logic runs against PostgreSQL
//! (`api::db::PgStore`) and the in-memory [`crate::MemoryStore`] used by tests
//! and local development.
//!
//! Every method that takes an `owner` is owner-scoped: a task that exists but
//! belongs to someone else is reported exactly like a missing one (`None` /
//! `false`), so callers cannot tell the two apart.
//!
//! Listings come back in creation order; callers apply [`TaskFilter::sort`].

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Task, TaskFilter, TaskPatch, User};
use crate::reminder::ReminderTier;

/// Persistence for task records.
pub trait TaskStore: Clone + Send + Sync + 'static {
    fn insert_task(&self, task: Task) -> impl Future<Output = Result<Task, StoreError>> + Send;

    fn list_tasks(
        &self,
        owner: Uuid,
        filter: TaskFilter,
    ) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    fn get_task(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    /// Apply `patch` in a single write. `None` if absent or not owned.
    fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    /// Flip `completed` and set/clear `completed_at` in the same write.
    fn toggle_task(
        &self,
        owner: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    /// `true` if a task was removed.
    fn delete_task(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Incomplete tasks of `owner` due at or after `now`, soonest first.
    fn upcoming_tasks(
        &self,
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// All tasks, across owners, matching [`ReminderTier::is_candidate`].
    fn reminder_candidates(
        &self,
        tier: ReminderTier,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Record a successful dispatch, see [`ReminderTier::mark`].
    fn mark_reminded(
        &self,
        id: Uuid,
        tier: ReminderTier,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Persistence for accounts.
pub trait UserStore: Clone + Send + Sync + 'static {
    /// Fails with [`StoreError::Conflict`] if the email is taken.
    fn create_user(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// Lookup by normalised (trimmed, lowercased) email.
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    fn find_user(&self, id: Uuid) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;
}
