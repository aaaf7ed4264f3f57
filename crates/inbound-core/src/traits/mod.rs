//! Seams defined in `inbound-core` and implemented by other crates.

pub mod queue;
pub mod scanner;

pub use queue::MailQueue;
pub use scanner::MalwareScanner;
