//! Owner-scoped task CRUD. A task id that is malformed, missing or owned by
//! someone else is always answered with the same 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use store::{Task, TaskFilter, TaskPatch};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiJson};
use crate::mail::Mailer;
use crate::schema::{validate_patch, MessageResponse, NewTaskRequest, TaskMessage};
use crate::state::{AppState, AppStore};

fn task_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::task_not_found())
}

async fn list<S: AppStore, M: Mailer>(
    state: &AppState<S, M>,
    owner: Uuid,
    filter: TaskFilter,
) -> Result<Json<Vec<Task>>, ApiError> {
    let mut tasks = state.store.list_tasks(owner, filter).await?;
    filter.sort(&mut tasks);
    Ok(Json(tasks))
}

/// `POST /addTask`
pub async fn add_task<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
    ApiJson(body): ApiJson<NewTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = body.validate()?.into_task(user.id, Utc::now());
    let task = state.store.insert_task(task).await?;
    info!(task = %task.id, owner = %user.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tasks`
pub async fn all_tasks<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    list(&state, user.id, TaskFilter::All).await
}

/// `GET /active-tasks`, priority order.
pub async fn active_tasks<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    list(&state, user.id, TaskFilter::Active).await
}

/// `GET /completed-tasks`, most recently completed first.
pub async fn completed_tasks<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    list(&state, user.id, TaskFilter::Completed).await
}

/// `GET /task/{id}`
pub async fn get_task<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .get_task(user.id, task_id(&id)?)
        .await?
        .map(Json)
        .ok_or_else(ApiError::task_not_found)
}

/// `PUT /updateTask/{id}`
pub async fn update_task<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> Result<Json<TaskMessage>, ApiError> {
    let id = task_id(&id)?;
    let patch = validate_patch(patch)?;
    let task = state
        .store
        .update_task(user.id, id, patch, Utc::now())
        .await?
        .ok_or_else(ApiError::task_not_found)?;

    Ok(Json(TaskMessage {
        message: "Task Updated Successfully!".into(),
        task,
    }))
}

/// `PATCH /toggleTask/{id}`
pub async fn toggle_task<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TaskMessage>, ApiError> {
    let task = state
        .store
        .toggle_task(user.id, task_id(&id)?, Utc::now())
        .await?
        .ok_or_else(ApiError::task_not_found)?;

    let message = if task.completed {
        "Task marked as completed!"
    } else {
        "Task marked as pending!"
    };
    Ok(Json(TaskMessage {
        message: message.into(),
        task,
    }))
}

/// `DELETE /deleteTask/{id}`
pub async fn delete_task<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete_task(user.id, task_id(&id)?).await? {
        return Err(ApiError::task_not_found());
    }
    info!(task = %id, owner = %user.id, "task deleted");
    Ok(Json(MessageResponse::new("Task deleted successfully!")))
}
