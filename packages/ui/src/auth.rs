//! Authentication context and hooks for the UI.

use api::schema::AuthResponse;
use api::{ApiClient, ClientError, UserInfo};
use dioxus::prelude::*;

use crate::session::{
    platform_sessions, validation_outcome, Persistence, PlatformStorage, Session, SessionContext,
    ValidationOutcome,
};
use crate::{api_base_url, sleep};

/// How often a signed-in client re-confirms its token.
const REVALIDATE_EVERY: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub token: Option<String>,
    /// A restored session has not been confirmed by the server yet.
    pub loading: bool,
    /// Whether the last validation reached the server.
    pub online: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            loading: false,
            online: true,
        }
    }
}

impl AuthState {
    fn restored(session: Option<Session>) -> Self {
        match session {
            Some(session) => Self {
                user: Some(session.user),
                token: Some(session.token),
                loading: true,
                online: true,
            },
            None => Self::default(),
        }
    }

    pub fn signed_in(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// State after the server has answered a validation request.
    pub fn after_validation(self, outcome: &ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Keep => Self {
                loading: false,
                online: false,
                ..self
            },
            ValidationOutcome::Replace(user) => Self {
                user: Some(user.clone()),
                loading: false,
                online: true,
                ..self
            },
            ValidationOutcome::Clear => Self::default(),
        }
    }
}

/// Get the current authentication state.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_sessions() -> SessionContext<PlatformStorage> {
    use_context::<SessionContext<PlatformStorage>>()
}

/// A client carrying the current bearer token, if any.
pub fn client_for(state: &AuthState) -> ApiClient {
    ApiClient::new(api_base_url()).with_token(state.token.clone())
}

/// Adopt a fresh login or registration.
pub fn sign_in(
    auth: &mut Signal<AuthState>,
    sessions: &SessionContext<PlatformStorage>,
    response: AuthResponse,
    persistence: Persistence,
) {
    let session = Session {
        token: response.token,
        user: response.user,
    };
    sessions.set(&session, persistence);
    auth.set(AuthState {
        user: Some(session.user),
        token: Some(session.token),
        loading: false,
        online: true,
    });
}

pub fn sign_out(auth: &mut Signal<AuthState>, sessions: &SessionContext<PlatformStorage>) {
    sessions.clear();
    auth.set(AuthState::default());
}

/// What a failed request means for the local session.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureAction {
    /// The server refused the token; drop the session.
    SignOut,
    /// Keep the session and show the message.
    Report(String),
}

pub fn failure_action(err: &ClientError) -> FailureAction {
    if err.is_auth_rejection() {
        FailureAction::SignOut
    } else {
        FailureAction::Report(err.to_string())
    }
}

/// Apply [`failure_action`] to a failed call. Returns the message to show
/// inline, or `None` once the session has been torn down; the signed-in
/// layout then redirects to sign-in.
pub fn handle_failure(
    auth: &mut Signal<AuthState>,
    sessions: &SessionContext<PlatformStorage>,
    err: &ClientError,
) -> Option<String> {
    match failure_action(err) {
        FailureAction::SignOut => {
            tracing::info!(error = %err, "server rejected the session, signing out");
            if auth.peek().token.is_some() {
                sign_out(auth, sessions);
            }
            None
        }
        FailureAction::Report(message) => Some(message),
    }
}

async fn revalidate(mut auth: Signal<AuthState>, sessions: SessionContext<PlatformStorage>) {
    let current = auth.peek().clone();
    if current.token.is_none() {
        return;
    }
    let outcome = validation_outcome(client_for(&current).validate_token().await);
    match &outcome {
        ValidationOutcome::Replace(user) => sessions.persist(user),
        ValidationOutcome::Clear => sessions.clear(),
        ValidationOutcome::Keep => {}
    }
    let next = auth.peek().clone().after_validation(&outcome);
    if *auth.peek() != next {
        auth.set(next);
    }
}

/// Provider component that manages authentication state.
///
/// A persisted session is shown as signed in immediately, then confirmed
/// against `GET /validate-token` in the background.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let sessions = use_context_provider(platform_sessions);
    let restore_from = sessions.clone();
    let auth_state = use_context_provider(|| Signal::new(AuthState::restored(restore_from.get())));

    let on_mount = sessions.clone();
    use_effect(move || {
        let sessions = on_mount.clone();
        spawn(async move {
            revalidate(auth_state, sessions.clone()).await;
            loop {
                sleep(REVALIDATE_EVERY).await;
                revalidate(auth_state, sessions.clone()).await;
            }
        });
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth = use_auth();
    let sessions = use_sessions();
    let nav = use_navigator();

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| {
                sign_out(&mut auth, &sessions);
                nav.replace("/signin");
            },
            "{label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(name: &str) -> UserInfo {
        UserInfo {
            id: Uuid::new_v4(),
            name: name.into(),
            email: "ada@example.com".into(),
        }
    }

    fn restored() -> AuthState {
        AuthState::restored(Some(Session {
            token: "tok".into(),
            user: user("Ada"),
        }))
    }

    #[test]
    fn restored_session_is_optimistically_signed_in() {
        let state = restored();
        assert!(state.signed_in());
        assert!(state.loading);
        assert!(!AuthState::restored(None).signed_in());
    }

    #[test]
    fn validation_outcomes() {
        let kept = restored().after_validation(&ValidationOutcome::Keep);
        assert!(kept.signed_in());
        assert!(!kept.online);
        assert!(!kept.loading);

        let renamed = user("Ada L.");
        let replaced = restored().after_validation(&ValidationOutcome::Replace(renamed.clone()));
        assert_eq!(replaced.user, Some(renamed));
        assert_eq!(replaced.token.as_deref(), Some("tok"));

        let cleared = restored().after_validation(&ValidationOutcome::Clear);
        assert!(!cleared.signed_in());
    }

    #[test]
    fn only_auth_rejections_end_the_session() {
        let rejected = |status| ClientError::Rejected {
            status,
            message: "Invalid or expired token".into(),
        };
        assert_eq!(failure_action(&rejected(401)), FailureAction::SignOut);
        assert_eq!(failure_action(&rejected(403)), FailureAction::SignOut);

        let server_error = ClientError::Rejected {
            status: 500,
            message: "Internal server error".into(),
        };
        assert_eq!(
            failure_action(&server_error),
            FailureAction::Report("Internal server error".into())
        );
        assert!(matches!(
            failure_action(&ClientError::Network("connection refused".into())),
            FailureAction::Report(_)
        ));
        assert!(matches!(
            failure_action(&ClientError::Rejected { status: 404, message: "Task not found".into() }),
            FailureAction::Report(m) if m == "Task not found"
        ));
    }
}
