use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Task, TaskFilter, TaskPatch, User};
use crate::reminder::ReminderTier;
use crate::repo::{TaskStore, UserStore};

/// In-memory task and user store for tests and local development.
///
/// Records are kept in insertion order. [`MemoryStore::set_unavailable`]
/// makes every call fail, to exercise outage handling.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tasks: Arc<Mutex<Vec<Task>>>,
    users: Arc<Mutex<Vec<User>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Read a task regardless of owner.
    pub fn task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks()?.iter().find(|t| t.id == id).cloned())
    }

    fn tasks(&self) -> Result<MutexGuard<'_, Vec<Task>>, StoreError> {
        self.check()?;
        self.tasks
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn users(&self) -> Result<MutexGuard<'_, Vec<User>>, StoreError> {
        self.check()?;
        self.users
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".into()));
        }
        Ok(())
    }

    fn with_owned<T>(
        &self,
        owner: Uuid,
        id: Uuid,
        f: impl FnOnce(&mut Task) -> T,
    ) -> Result<Option<T>, StoreError> {
        let mut tasks = self.tasks()?;
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner)
            .map(f))
    }
}

impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        self.tasks()?.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, owner: Uuid, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks()?
            .iter()
            .filter(|t| t.owner_id == owner && filter.matches(t))
            .cloned()
            .collect())
    }

    async fn get_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self
            .tasks()?
            .iter()
            .find(|t| t.id == id && t.owner_id == owner)
            .cloned())
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        self.with_owned(owner, id, |task| {
            task.apply(&patch, now);
            task.clone()
        })
    }

    async fn toggle_task(
        &self,
        owner: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        self.with_owned(owner, id, |task| {
            task.toggle(now);
            task.clone()
        })
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks()?;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.owner_id == owner));
        Ok(tasks.len() != before)
    }

    async fn upcoming_tasks(&self, owner: Uuid, now: DateTime<Utc>) -> Result<Vec<Task>, StoreError> {
        let mut upcoming: Vec<Task> = self
            .tasks()?
            .iter()
            .filter(|t| t.owner_id == owner && !t.completed)
            .filter(|t| t.due_date.is_some_and(|due| due >= now))
            .cloned()
            .collect();
        upcoming.sort_by_key(|t| t.due_date);
        Ok(upcoming)
    }

    async fn reminder_candidates(
        &self,
        tier: ReminderTier,
        now: DateTime<Utc>,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks()?
            .iter()
            .filter(|t| tier.is_candidate(t, now))
            .cloned()
            .collect())
    }

    async fn mark_reminded(
        &self,
        id: Uuid,
        tier: ReminderTier,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if let Some(task) = self.tasks()?.iter_mut().find(|t| t.id == id) {
            tier.mark(task, now);
        }
        Ok(())
    }
}

impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let mut users = self.users()?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(StoreError::Conflict(format!("email '{email}' already registered")));
        }
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users()?
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users()?.iter().find(|u| u.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::Duration;

    fn new_task(owner: Uuid, title: &str, priority: Priority) -> Task {
        Task::new(owner, title.into(), None, None, priority, Utc::now())
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let task = store
            .insert_task(new_task(alice, "alice's", Priority::High))
            .await
            .unwrap();

        assert!(store.get_task(bob, task.id).await.unwrap().is_none());
        assert!(!store.delete_task(bob, task.id).await.unwrap());
        let patch = TaskPatch {
            title: Some("hijacked".into()),
            ..Default::default()
        };
        assert!(store
            .update_task(bob, task.id, patch, Utc::now())
            .await
            .unwrap()
            .is_none());
        assert!(store.toggle_task(bob, task.id, Utc::now()).await.unwrap().is_none());

        let unchanged = store.get_task(alice, task.id).await.unwrap().unwrap();
        assert_eq!(unchanged, task);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let a = store.insert_task(new_task(owner, "a", Priority::Low)).await.unwrap();
        store.insert_task(new_task(owner, "b", Priority::High)).await.unwrap();
        store.toggle_task(owner, a.id, Utc::now()).await.unwrap();

        let active = store.list_tasks(owner, TaskFilter::Active).await.unwrap();
        let completed = store.list_tasks(owner, TaskFilter::Completed).await.unwrap();
        let all = store.list_tasks(owner, TaskFilter::All).await.unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "b");
        assert_eq!(completed.len(), 1);
        assert!(completed[0].completed_at.is_some());
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_upcoming_tasks_sorted_by_due_date() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        let mut later = new_task(owner, "later", Priority::Medium);
        later.due_date = Some(now + Duration::hours(30));
        let mut sooner = new_task(owner, "sooner", Priority::Medium);
        sooner.due_date = Some(now + Duration::hours(3));
        let mut past = new_task(owner, "past", Priority::Medium);
        past.due_date = Some(now - Duration::hours(3));

        for t in [later, sooner, past] {
            store.insert_task(t).await.unwrap();
        }

        let titles: Vec<String> = store
            .upcoming_tasks(owner, now)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["sooner", "later"]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store
            .create_user("Ada".into(), "ada@example.com".into(), "hash".into())
            .await
            .unwrap();
        let err = store
            .create_user("Ada".into(), "ADA@example.com".into(), "hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert!(store
            .find_user_by_email("Ada@Example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = store
            .reminder_candidates(ReminderTier::DayBefore, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
