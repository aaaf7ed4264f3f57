//! # inbound-scanner
//!
//! Sends one stored file to a ClamAV-compatible REST service and folds
//! every outcome into a [`ScanVerdict`](inbound_core::types::ScanVerdict).
//!
//! Policy: no endpoint configured means `Clean` with a warning; any
//! failure after that means `Undetermined`.

pub mod gateway;
pub mod response;

pub use gateway::ScanGateway;
