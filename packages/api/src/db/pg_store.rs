use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use store::{
    Priority, ReminderTier, StoreError, Task, TaskFilter, TaskPatch, TaskStore, User, UserStore,
};
use uuid::Uuid;

const TASK_COLUMNS: &str = "id, user_id, title, description, due_date, priority, completed, \
     completed_at, reminder_sent, last_reminder_sent, created_at, updated_at";

/// [`TaskStore`] and [`UserStore`] backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: String,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    reminder_sent: bool,
    last_reminder_sent: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let priority = row
            .priority
            .parse::<Priority>()
            .map_err(|e| StoreError::Corrupt(format!("task {}: {e}", row.id)))?;
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            priority,
            completed: row.completed,
            completed_at: row.completed_at,
            reminder_sent: row.reminder_sent,
            last_reminder_sent: row.last_reminder_sent,
            owner_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

fn db_error(err: sqlx::Error) -> StoreError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Conflict(db.message().to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

fn into_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>, StoreError> {
    rows.into_iter().map(Task::try_from).collect()
}

fn into_task(row: Option<TaskRow>) -> Result<Option<Task>, StoreError> {
    row.map(Task::try_from).transpose()
}

impl TaskStore for PgStore {
    async fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        let row: TaskRow = sqlx::query_as(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(task.owner_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.priority.as_str())
        .bind(task.completed)
        .bind(task.completed_at)
        .bind(task.reminder_sent)
        .bind(task.last_reminder_sent)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        row.try_into()
    }

    async fn list_tasks(&self, owner: Uuid, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        let completed = match filter {
            TaskFilter::All => None,
            TaskFilter::Active => Some(false),
            TaskFilter::Completed => Some(true),
        };
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR completed = $2) \
             ORDER BY created_at, id"
        ))
        .bind(owner)
        .bind(completed)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        into_tasks(rows)
    }

    async fn get_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        into_task(row)
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        // Right-hand sides see the pre-update row, so completed_at can be
        // derived from the old and new `completed` in one statement.
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "UPDATE tasks SET \
                title = COALESCE($3, title), \
                description = CASE WHEN $4 THEN $5 ELSE description END, \
                due_date = CASE WHEN $6 THEN $7 ELSE due_date END, \
                priority = COALESCE($8, priority), \
                completed = COALESCE($9, completed), \
                completed_at = CASE \
                    WHEN $9::BOOLEAN IS NULL OR $9 = completed THEN completed_at \
                    WHEN $9 THEN $10 \
                    ELSE NULL END, \
                updated_at = $10 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(patch.title)
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.due_date.is_some())
        .bind(patch.due_date.flatten())
        .bind(patch.priority.map(Priority::as_str))
        .bind(patch.completed)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        into_task(row)
    }

    async fn toggle_task(
        &self,
        owner: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "UPDATE tasks SET \
                completed = NOT completed, \
                completed_at = CASE WHEN completed THEN NULL ELSE $3 END, \
                updated_at = $3 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        into_task(row)
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn upcoming_tasks(&self, owner: Uuid, now: DateTime<Utc>) -> Result<Vec<Task>, StoreError> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE user_id = $1 AND completed = FALSE AND due_date >= $2 \
             ORDER BY due_date, created_at"
        ))
        .bind(owner)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        into_tasks(rows)
    }

    async fn reminder_candidates(
        &self,
        tier: ReminderTier,
        now: DateTime<Utc>,
    ) -> Result<Vec<Task>, StoreError> {
        let (start, end) = tier.window(now);
        let freshness = match tier {
            ReminderTier::DayBefore => "(reminder_sent = FALSE OR last_reminder_sent < $3)",
            ReminderTier::HalfDay => "last_reminder_sent < $3",
        };
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE completed = FALSE AND due_date BETWEEN $1 AND $2 AND {freshness} \
             ORDER BY due_date"
        ))
        .bind(start)
        .bind(end)
        .bind(tier.stale_before(now))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        into_tasks(rows)
    }

    async fn mark_reminded(
        &self,
        id: Uuid,
        tier: ReminderTier,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let sql = match tier {
            ReminderTier::DayBefore => {
                "UPDATE tasks SET reminder_sent = TRUE, last_reminder_sent = $2 WHERE id = $1"
            }
            ReminderTier::HalfDay => "UPDATE tasks SET last_reminder_sent = $2 WHERE id = $1",
        };
        sqlx::query(sql)
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

impl UserStore for PgStore {
    async fn create_user(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (id, name, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.into())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(User::from))
    }
}
