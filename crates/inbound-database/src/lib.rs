//! # inbound-database
//!
//! Persistence for Inbound. The [`store`] traits are what services depend
//! on; [`repositories`] implements them over PostgreSQL and [`memory`]
//! implements them in-process. [`Stores`] picks one set from configuration.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use store::{InviteStore, JobStore, SettingStore, UserStore};
pub use stores::Stores;
