//! Reverse share invite entities.

pub mod model;

pub use model::{CreateReverseShareInvite, INVITE_TTL_DAYS, ReverseShareInvite};
