//! # API crate: REST server and typed client for TaskFlow
//!
//! The browser talks to the server only through the JSON endpoints defined
//! here. The same request/response types are used on both sides, so
//! [`ApiClient`] and the axum handlers cannot drift apart.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`schema`] | - | Request/response bodies and their validation |
//! | [`models`] | - | [`UserInfo`], the client-safe projection of an account |
//! | [`client`] | - | `reqwest` client for every endpoint |
//! | [`auth`] | `server` | Argon2 password hashing, JWT bearer tokens, [`auth::AuthUser`] extractor |
//! | [`db`] | `server` | PostgreSQL pool, migrations and [`db::PgStore`] |
//! | [`mail`] | `server` | [`mail::Mailer`] trait, SMTP and log transports, email templates |
//! | [`reminders`] | `server` | The reminder scan and the scheduler task that serializes it |
//! | [`routes`] | `server` | The axum [`routes::router`] |
//! | [`settings`] | `server` | Layered configuration (`config.toml`, `APP__*` env) |
//!
//! Client (WASM) builds compile with `default-features = false` and only see
//! the first three.

pub mod client;
pub mod models;
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod mail;
#[cfg(feature = "server")]
pub mod reminders;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod settings;
#[cfg(feature = "server")]
pub mod state;

pub use client::{ApiClient, ClientError};
pub use models::UserInfo;

#[cfg(feature = "server")]
pub use error::ApiError;
#[cfg(feature = "server")]
pub use state::{AppState, AppStore};
