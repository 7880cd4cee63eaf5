//! # REST routes
//!
//! | Method | Path | Auth | Handler |
//! |--------|------|------|---------|
//! | POST | `/register` | - | [`auth::register`] |
//! | POST | `/login` | - | [`auth::login`] |
//! | GET | `/validate-token` | bearer | [`auth::validate_token`] |
//! | POST | `/addTask` | bearer | [`tasks::add_task`] |
//! | GET | `/tasks` | bearer | [`tasks::all_tasks`] |
//! | GET | `/active-tasks` | bearer | [`tasks::active_tasks`] |
//! | GET | `/completed-tasks` | bearer | [`tasks::completed_tasks`] |
//! | GET | `/task/{id}` | bearer | [`tasks::get_task`] |
//! | PUT | `/updateTask/{id}` | bearer | [`tasks::update_task`] |
//! | PATCH | `/toggleTask/{id}` | bearer | [`tasks::toggle_task`] |
//! | DELETE | `/deleteTask/{id}` | bearer | [`tasks::delete_task`] |
//! | GET | `/notification-stats` | bearer | [`notifications::stats`] |
//! | POST | `/trigger-reminders` | bearer | [`notifications::trigger`] |

pub mod auth;
pub mod notifications;
pub mod tasks;

#[cfg(test)]
mod tests;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::mail::Mailer;
use crate::state::{AppState, AppStore};

pub fn router<S: AppStore, M: Mailer>(state: AppState<S, M>) -> Router {
    Router::new()
        .route("/register", post(auth::register::<S, M>))
        .route("/login", post(auth::login::<S, M>))
        .route("/validate-token", get(auth::validate_token::<S, M>))
        .route("/addTask", post(tasks::add_task::<S, M>))
        .route("/tasks", get(tasks::all_tasks::<S, M>))
        .route("/active-tasks", get(tasks::active_tasks::<S, M>))
        .route("/completed-tasks", get(tasks::completed_tasks::<S, M>))
        .route("/task/{id}", get(tasks::get_task::<S, M>))
        .route("/updateTask/{id}", put(tasks::update_task::<S, M>))
        .route("/toggleTask/{id}", patch(tasks::toggle_task::<S, M>))
        .route("/deleteTask/{id}", delete(tasks::delete_task::<S, M>))
        .route("/notification-stats", get(notifications::stats::<S, M>))
        .route("/trigger-reminders", post(notifications::trigger::<S, M>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
