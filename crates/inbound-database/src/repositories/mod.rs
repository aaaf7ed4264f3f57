//! PostgreSQL implementations of the store traits.

pub mod invite;
pub mod job;
pub mod setting;
pub mod user;

pub use invite::InviteRepository;
pub use job::JobRepository;
pub use setting::SettingRepository;
pub use user::UserRepository;
