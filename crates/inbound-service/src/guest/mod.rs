//! Guest identity provisioning.

pub mod provisioner;

pub use provisioner::{GuestProvisioner, PLACEHOLDER_LEN};
