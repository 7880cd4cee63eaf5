//! # PostgreSQL persistence
//!
//! - [`connect`] opens the pool sized from [`crate::settings::DatabaseSettings`].
//! - [`migrate`] applies `packages/api/migrations` at startup.
//! - [`PgStore`] implements the `store` traits on top of the pool.

mod pg_store;
mod pool;

pub use pg_store::PgStore;
pub use pool::{connect, migrate};
