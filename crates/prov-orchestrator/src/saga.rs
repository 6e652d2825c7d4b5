//! Saga state machine
//!
//! Linear, no branching except on error. Every non-terminal state can fall
//! into the absorbing `Failed` state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// States of one provisioning saga, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SagaState {
    Received,
    EligibilityChecked,
    ApCenterResolved,
    MgmtVlanResolved,
    MacsAcquired,
    InventoryAssigned,
    TenantVerified,
    VlanAssigned,
    RouterResolved,
    DeviceConfigured,
    ServiceModuleConfigured,
    Completed,
    Failed,
}

impl SagaState {
    /// Next state on success; terminal states have none.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::EligibilityChecked),
            Self::EligibilityChecked => Some(Self::ApCenterResolved),
            Self::ApCenterResolved => Some(Self::MgmtVlanResolved),
            Self::MgmtVlanResolved => Some(Self::MacsAcquired),
            Self::MacsAcquired => Some(Self::InventoryAssigned),
            Self::InventoryAssigned => Some(Self::TenantVerified),
            Self::TenantVerified => Some(Self::VlanAssigned),
            Self::VlanAssigned => Some(Self::RouterResolved),
            Self::RouterResolved => Some(Self::DeviceConfigured),
            Self::DeviceConfigured => Some(Self::ServiceModuleConfigured),
            Self::ServiceModuleConfigured => Some(Self::Completed),
            Self::Completed | Self::Failed => None,
        }
    }

    /// Name of the step whose success produces this state. Used in
    /// notifications and failure reporting.
    pub fn step(&self) -> &'static str {
        match self {
            Self::Received => "receive",
            Self::EligibilityChecked => "eligibility check",
            Self::ApCenterResolved => "registration context",
            Self::MgmtVlanResolved => "management vlan",
            Self::MacsAcquired => "mac acquisition",
            Self::InventoryAssigned => "inventory assignment",
            Self::TenantVerified => "tenant verification",
            Self::VlanAssigned => "vlan assignment",
            Self::RouterResolved => "router lookup",
            Self::DeviceConfigured => "device configuration",
            Self::ServiceModuleConfigured => "service module configuration",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Per-step outcome inside an execution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Running,
    Completed,
    Failed,
}

/// One step's record.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub name: &'static str,
    pub status: StepStatus,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Execution record for one saga run. Owned by the worker driving the run;
/// never shared across runs.
#[derive(Debug, Clone, Serialize)]
pub struct SagaExecution {
    pub id: Uuid,
    pub account_id: String,
    pub state: SagaState,
    pub steps: Vec<StepRecord>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SagaExecution {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id: account_id.into(),
            state: SagaState::Received,
            steps: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record a step starting.
    pub fn begin(&mut self, state: SagaState) {
        self.steps.push(StepRecord {
            name: state.step(),
            status: StepStatus::Running,
            error: None,
            completed_at: None,
        });
    }

    /// Record the running step succeeding and advance the state.
    pub fn advance(&mut self, state: SagaState) {
        if let Some(step) = self.steps.last_mut() {
            step.status = StepStatus::Completed;
            step.completed_at = Some(Utc::now());
        }
        self.state = state;
    }

    /// Record the running step failing and absorb into `Failed`.
    pub fn fail(&mut self, error: impl Into<String>) {
        if let Some(step) = self.steps.last_mut() {
            step.status = StepStatus::Failed;
            step.error = Some(error.into());
        }
        self.state = SagaState::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run complete.
    pub fn complete(&mut self) {
        self.state = SagaState::Completed;
        self.completed_at = Some(Utc::now());
    }
}
