//! Shared UI for the TaskFlow client: session handling, the auth context,
//! theme, task board, task form and notification center.

use std::time::Duration;

pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod session;
pub use session::{Persistence, Session, SessionContext, SessionStorage};

mod auth;
pub use auth::{
    client_for, failure_action, handle_failure, sign_in, sign_out, use_auth, use_sessions,
    AuthProvider, AuthState, FailureAction, LogoutButton,
};

mod theme;
pub use theme::{apply_theme, load_theme_from_storage, save_theme, Theme, ThemeSignal, ThemeToggle};

mod task_list;
pub use task_list::{BoardKind, TaskBoard, TaskCard};

mod task_form;
pub use task_form::{TaskDraft, TaskForm};

mod notification_center;
pub use notification_center::NotificationCenter;

/// Origin the API is served from. In the browser that is the page's own
/// origin; native builds talk to a local server.
pub fn api_base_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            return origin;
        }
    }
    "http://localhost:8080".to_string()
}

pub(crate) async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}
