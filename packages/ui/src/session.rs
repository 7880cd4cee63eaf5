//! # Persisted sign-in state
//!
//! A session is a bearer token plus the [`UserInfo`] it was issued for,
//! stored under `auth_token` / `auth_user`. "Remember me" writes to durable
//! storage (`localStorage`), otherwise to session-scoped storage
//! (`sessionStorage`). [`SessionContext`] hides the choice: reads look in
//! durable storage first, writes always clear the other backend so a stale
//! copy can never win on the next load.
//!
//! [`validation_outcome`] decides what a `GET /validate-token` result means
//! for a restored session. Only an explicit 401/403 ends it; an unreachable
//! or failing server keeps the user signed in.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use api::schema::ValidateTokenResponse;
use api::{ClientError, UserInfo};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";

/// A string key/value backend.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-process storage, used off the browser and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage(Rc<RefCell<HashMap<String, String>>>);

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
}

/// `window.localStorage` or `window.sessionStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug)]
pub struct BrowserStorage(pub(crate) Persistence);

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn storage(&self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match self.0 {
            Persistence::Durable => window.local_storage().ok().flatten(),
            Persistence::SessionOnly => window.session_storage().ok().flatten(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "browser storage rejected write");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            if storage.remove_item(key).is_err() {
                tracing::warn!(key, "browser storage rejected removal");
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persistence {
    /// Survives browser restarts.
    Durable,
    /// Cleared when the tab closes.
    SessionOnly,
}

impl Persistence {
    pub fn from_remember_me(remember: bool) -> Self {
        if remember {
            Persistence::Durable
        } else {
            Persistence::SessionOnly
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Clone, Debug)]
pub struct SessionContext<S> {
    durable: S,
    session: S,
}

impl<S: SessionStorage> SessionContext<S> {
    pub fn new(durable: S, session: S) -> Self {
        Self { durable, session }
    }

    fn backend(&self, persistence: Persistence) -> &S {
        match persistence {
            Persistence::Durable => &self.durable,
            Persistence::SessionOnly => &self.session,
        }
    }

    fn read(backend: &S) -> Option<Session> {
        let token = backend.get(TOKEN_KEY)?;
        let user = backend.get(USER_KEY)?;
        match serde_json::from_str::<UserInfo>(&user) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored user");
                None
            }
        }
    }

    /// Where the current session lives, durable first.
    pub fn persistence(&self) -> Option<Persistence> {
        [Persistence::Durable, Persistence::SessionOnly]
            .into_iter()
            .find(|p| self.backend(*p).get(TOKEN_KEY).is_some())
    }

    /// The persisted session, if any.
    pub fn get(&self) -> Option<Session> {
        let persistence = self.persistence()?;
        let session = Self::read(self.backend(persistence));
        if session.is_none() {
            self.clear();
        }
        session
    }

    /// Store `session`, replacing whatever was persisted before.
    pub fn set(&self, session: &Session, persistence: Persistence) {
        self.clear();
        let backend = self.backend(persistence);
        backend.set(TOKEN_KEY, &session.token);
        match serde_json::to_string(&session.user) {
            Ok(user) => backend.set(USER_KEY, &user),
            Err(e) => tracing::error!(error = %e, "failed to serialise user"),
        }
    }

    /// Refresh the stored user in place, keeping token and persistence.
    pub fn persist(&self, user: &UserInfo) {
        let Some(persistence) = self.persistence() else {
            return;
        };
        if let Ok(json) = serde_json::to_string(user) {
            self.backend(persistence).set(USER_KEY, &json);
        }
    }

    pub fn clear(&self) {
        for backend in [&self.durable, &self.session] {
            backend.remove(TOKEN_KEY);
            backend.remove(USER_KEY);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = MemoryStorage;

/// Session context over the platform's storage.
pub fn platform_sessions() -> SessionContext<PlatformStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        SessionContext::new(
            BrowserStorage(Persistence::Durable),
            BrowserStorage(Persistence::SessionOnly),
        )
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        SessionContext::new(MemoryStorage::default(), MemoryStorage::default())
    }
}

/// What to do with a restored session after asking the server about it.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationOutcome {
    /// Server unreachable or failing: keep the session as it is.
    Keep,
    /// Token accepted; adopt the server's view of the user.
    Replace(UserInfo),
    /// Token rejected: sign out.
    Clear,
}

pub fn validation_outcome(result: Result<ValidateTokenResponse, ClientError>) -> ValidationOutcome {
    match result {
        Ok(response) if response.valid => ValidationOutcome::Replace(response.user),
        Ok(_) => ValidationOutcome::Clear,
        Err(e) if e.is_auth_rejection() => ValidationOutcome::Clear,
        Err(e) => {
            tracing::warn!(error = %e, "could not confirm session, keeping it");
            ValidationOutcome::Keep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sessions() -> SessionContext<MemoryStorage> {
        SessionContext::new(MemoryStorage::default(), MemoryStorage::default())
    }

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: UserInfo {
                id: Uuid::new_v4(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        }
    }

    #[test]
    fn remember_me_picks_backend() {
        let ctx = sessions();
        let s = session();
        ctx.set(&s, Persistence::SessionOnly);
        assert_eq!(ctx.persistence(), Some(Persistence::SessionOnly));
        assert!(ctx.durable.get(TOKEN_KEY).is_none());

        ctx.set(&s, Persistence::Durable);
        assert_eq!(ctx.persistence(), Some(Persistence::Durable));
        assert!(ctx.session.get(TOKEN_KEY).is_none());
        assert_eq!(ctx.get(), Some(s));
    }

    #[test]
    fn get_round_trips_and_clear_forgets() {
        let ctx = sessions();
        let s = session();
        ctx.set(&s, Persistence::Durable);
        assert_eq!(ctx.get(), Some(s));

        ctx.clear();
        assert_eq!(ctx.get(), None);
        assert_eq!(ctx.persistence(), None);
    }

    #[test]
    fn corrupt_user_is_discarded() {
        let ctx = sessions();
        ctx.durable.set(TOKEN_KEY, "tok");
        ctx.durable.set(USER_KEY, "{not json");
        assert_eq!(ctx.get(), None);
        assert!(ctx.durable.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn persist_updates_user_in_place() {
        let ctx = sessions();
        let mut s = session();
        ctx.set(&s, Persistence::SessionOnly);
        s.user.name = "Ada Lovelace".into();
        ctx.persist(&s.user);
        assert_eq!(ctx.get().unwrap().user.name, "Ada Lovelace");
        assert_eq!(ctx.persistence(), Some(Persistence::SessionOnly));
    }

    #[test]
    fn only_auth_rejection_clears() {
        let user = session().user;
        assert_eq!(
            validation_outcome(Ok(ValidateTokenResponse { valid: true, user: user.clone() })),
            ValidationOutcome::Replace(user)
        );
        assert_eq!(
            validation_outcome(Err(ClientError::Rejected { status: 403, message: "Invalid or expired token".into() })),
            ValidationOutcome::Clear
        );
        assert_eq!(
            validation_outcome(Err(ClientError::Network("offline".into()))),
            ValidationOutcome::Keep
        );
        assert_eq!(
            validation_outcome(Err(ClientError::Rejected { status: 500, message: "boom".into() })),
            ValidationOutcome::Keep
        );
    }
}
