//! Runtime settings.

pub mod model;

pub use model::{ALLOW_REVERSE_SHARES, Setting, parse_flag};
