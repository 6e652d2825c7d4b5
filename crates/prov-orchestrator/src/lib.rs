//! OpenProv Orchestrator - the provisioning saga controller
//!
//! One inbound registration lease drives one saga run: a fixed, linear
//! sequence of remote and local steps that allocates the subscriber's
//! customer VLAN, binds it to a billing tenant, and pushes the device
//! configuration, reporting progress to an operator channel. The saga
//! halts on the first failure; nothing already done is rolled back unless
//! compensation is explicitly enabled.

pub mod event;
pub mod executor;
pub mod orchestrator;
pub mod saga;

pub use event::{EventError, RegistrationLease};
pub use executor::HttpStepExecutor;
pub use orchestrator::{ProvisioningError, ProvisioningOrchestrator, StepError};
pub use saga::{SagaExecution, SagaState, StepRecord, StepStatus};
