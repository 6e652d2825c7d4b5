//! OpenProv Common - Shared types for subscriber provisioning
//!
//! This crate provides the pieces every provisioning component agrees on:
//! - Domain model (tenants, sites, VLAN assignments, devices)
//! - The `{error, result}` envelope and the remote-step boundary
//! - Operator notification sink
//! - Explicit runtime configuration
//! - Static platform registry

#![warn(missing_docs)]

pub mod config;
pub mod envelope;
pub mod model;
pub mod notify;
pub mod ops;
pub mod platform;

pub use config::ProvisionerConfig;
pub use envelope::{ExecutorError, StepEnvelope, StepExecutor};
pub use model::*;
pub use notify::{InMemoryNotifier, NotificationEvent, Notifier, NotifyError, WebhookNotifier};
pub use platform::Platform;
