//! Background job processing for Inbound.
//!
//! This crate provides:
//! - A durable job queue that also serves as the service layer's mail queue
//! - A worker runner that polls for and executes queued jobs
//! - A job executor that dispatches jobs to the correct handler
//! - The `send_email` job that renders and hands off notification mail

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::{JobCreateParams, JobQueue, MAIL_QUEUE};
pub use runner::WorkerRunner;
