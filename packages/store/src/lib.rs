pub mod error;
pub mod models;
pub mod reminder;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

pub use error::StoreError;
pub use models::{Priority, Task, TaskFilter, TaskPatch, User};
pub use reminder::{eligible_tier, hours_until_due, ReminderTier};
pub use repo::{TaskStore, UserStore};
