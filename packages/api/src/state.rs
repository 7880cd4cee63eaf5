use axum::extract::FromRef;
use store::{TaskStore, UserStore};

use crate::auth::TokenIssuer;
use crate::mail::Mailer;
use crate::reminders::ReminderHandle;

/// Everything the REST handlers need.
pub trait AppStore: TaskStore + UserStore {}

impl<T: TaskStore + UserStore> AppStore for T {}

/// Shared state for the router.
#[derive(Clone)]
pub struct AppState<S, M> {
    pub store: S,
    pub mailer: M,
    pub tokens: TokenIssuer,
    pub reminders: ReminderHandle,
}

impl<S, M> AppState<S, M> {
    pub fn new(store: S, mailer: M, tokens: TokenIssuer, reminders: ReminderHandle) -> Self {
        Self {
            store,
            mailer,
            tokens,
            reminders,
        }
    }
}

impl<S, M> FromRef<AppState<S, M>> for TokenIssuer {
    fn from_ref(state: &AppState<S, M>) -> Self {
        state.tokens.clone()
    }
}
