use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::mail::Mailer;
use crate::schema::{NotificationStats, TriggerResponse};
use crate::state::{AppState, AppStore};

/// `GET /notification-stats`: the caller's upcoming deadlines and which of
/// them the next scan would remind about.
pub async fn stats<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
) -> Result<Json<NotificationStats>, ApiError> {
    let now = Utc::now();
    let tasks = state.store.upcoming_tasks(user.id, now).await?;
    Ok(Json(NotificationStats::from_upcoming(&tasks, now)))
}

/// `POST /trigger-reminders`: run a scan now and wait for it.
///
/// The scan covers every user's tasks, not only the caller's.
pub async fn trigger<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    user: AuthUser,
) -> Result<Json<TriggerResponse>, ApiError> {
    tracing::info!(user = %user.id, "manual reminder check");
    let report = state.reminders.trigger().await?;
    Ok(Json(TriggerResponse {
        message: "Reminder check completed successfully".into(),
        sent_24h: report.sent_24h,
        sent_12h: report.sent_12h,
        failed: report.failed,
    }))
}
