//! In-process implementations of the store traits.
//!
//! Used for `memory://` deployments and tests. Each store keeps its state
//! behind one async mutex, so every operation is atomic with respect to
//! the others on the same store.

pub mod invite;
pub mod job;
pub mod setting;
pub mod user;

pub use invite::MemoryInviteStore;
pub use job::MemoryJobStore;
pub use setting::MemorySettingStore;
pub use user::MemoryUserStore;
