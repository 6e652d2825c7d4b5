//! Runtime configuration
//!
//! All knobs are passed in at construction time; nothing is read from
//! ambient state.

use crate::model::VidRange;
use std::time::Duration;

/// Configuration for the provisioning core.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    /// Operator channel progress and failure notifications post to.
    pub operator_channel: String,
    /// Customer VLAN pool to allocate from.
    pub customer_pool: VidRange,
    /// Prefix of the deterministic tenant name (`{prefix}{account_id}`).
    pub tenant_name_prefix: String,
    /// Bounded retries of the allocation algorithm after a lost bind race.
    pub allocation_retries: u32,
    /// Per-step remote call timeout.
    pub step_timeout: Duration,
    /// Release a VLAN bound during this run when a later step fails.
    /// Off by default: orphaned bindings are cleaned up manually.
    pub release_vlan_on_failure: bool,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            operator_channel: "provisioning-ops".to_string(),
            customer_pool: VidRange::CUSTOMER,
            tenant_name_prefix: "cust-".to_string(),
            allocation_retries: 3,
            step_timeout: Duration::from_secs(30),
            release_vlan_on_failure: false,
        }
    }
}
