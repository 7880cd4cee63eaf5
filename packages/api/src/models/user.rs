//! # Client-safe user projection
//!
//! [`UserInfo`] is what crosses the wire in auth responses and what the
//! browser keeps in storage. It is built from a stored [`store::User`] and
//! drops the password hash and timestamps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&store::User> for UserInfo {
    fn from(user: &store::User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
