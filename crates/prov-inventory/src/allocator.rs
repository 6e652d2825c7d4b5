//! VLAN allocation
//!
//! Enforces the invariant that a tenant holds at most one VLAN and that it
//! belongs to the tenant's current site. Binds are confirmed by re-read:
//! the pool is shared with concurrent runs and nothing locks it, so a bind
//! can be lost to a racing allocator. A lost race surfaces as
//! [`AllocationError::Conflict`] and the algorithm restarts from the top a
//! bounded number of times.

use crate::client::{InventoryClient, InventoryError};
use prov_common::model::{RecordId, VidRange, VlanAssignment};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Allocation failures.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("tenant {0} does not exist")]
    TenantNotFound(RecordId),
    #[error("site {0} does not exist")]
    SiteNotFound(RecordId),
    #[error("no free VLANs for site {0}")]
    ResourceExhausted(RecordId),
    #[error("lost VLAN {vlan_id} to a concurrent allocation")]
    Conflict { vlan_id: RecordId },
    /// A business-rule invariant the system assumes is false was observed
    /// true. Never expected in a correct system.
    #[error("consistency violation: {0}")]
    ConsistencyViolation(String),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Finds and binds customer VLANs from a site's pool.
pub struct VlanAllocator<I> {
    inventory: Arc<I>,
    pool: VidRange,
    retries: u32,
}

impl<I: InventoryClient> VlanAllocator<I> {
    pub fn new(inventory: Arc<I>, pool: VidRange, retries: u32) -> Self {
        Self {
            inventory,
            pool,
            retries,
        }
    }

    /// Assign a customer VLAN at `site_id` to `tenant_id`.
    ///
    /// Idempotent for a tenant already holding a VLAN at that site. A
    /// tenant holding a VLAN at a different site is released there first.
    /// Lost bind races are retried from the top up to the configured
    /// bound.
    pub async fn assign_tenant_vlan(
        &self,
        site_id: RecordId,
        tenant_id: RecordId,
    ) -> Result<VlanAssignment, AllocationError> {
        let mut attempt = 0;
        loop {
            match self.try_assign(site_id, tenant_id).await {
                Err(AllocationError::Conflict { vlan_id }) if attempt < self.retries => {
                    attempt += 1;
                    warn!(vlan_id, attempt, "lost allocation race, retrying");
                }
                other => return other,
            }
        }
    }

    /// The tenant's current assignment, if any. Errors with
    /// `ConsistencyViolation` when more than one VLAN is bound.
    pub async fn tenant_vlan(
        &self,
        tenant_id: RecordId,
    ) -> Result<Option<VlanAssignment>, AllocationError> {
        // An unknown tenant id makes the backend return the unfiltered
        // VLAN list, so existence is checked first.
        if !self.inventory.tenant_exists(tenant_id).await? {
            return Err(AllocationError::TenantNotFound(tenant_id));
        }
        let mut vlans = self.inventory.tenant_vlans(tenant_id).await?;
        match vlans.len() {
            0 => Ok(None),
            1 => Ok(vlans.pop()),
            n => Err(AllocationError::ConsistencyViolation(format!(
                "tenant {tenant_id} holds {n} VLANs"
            ))),
        }
    }

    /// Clear a VLAN's tenant binding.
    pub async fn release(&self, vlan_id: RecordId) -> Result<(), AllocationError> {
        self.inventory.bind_vlan_tenant(vlan_id, None).await?;
        info!(vlan_id, "released VLAN tenant binding");
        Ok(())
    }

    async fn try_assign(
        &self,
        site_id: RecordId,
        tenant_id: RecordId,
    ) -> Result<VlanAssignment, AllocationError> {
        if let Some(current) = self.tenant_vlan(tenant_id).await? {
            if current.site_id == site_id {
                debug!(
                    vlan_id = current.vlan_id,
                    tenant_id, "tenant already holds a VLAN at this site"
                );
                return Ok(current);
            }
            // One site per tenant: release the old binding before moving.
            self.release(current.vlan_id).await?;
        }
        self.assign_next_free(site_id, tenant_id).await
    }

    async fn assign_next_free(
        &self,
        site_id: RecordId,
        tenant_id: RecordId,
    ) -> Result<VlanAssignment, AllocationError> {
        // Same unfiltered-list quirk as for tenants.
        if !self.inventory.site_exists(site_id).await? {
            return Err(AllocationError::SiteNotFound(site_id));
        }

        let pool = self.inventory.site_vlans(site_id, self.pool).await?;
        let free = pool
            .into_iter()
            .find(|v| v.tenant_id.is_none())
            .ok_or(AllocationError::ResourceExhausted(site_id))?;

        self.inventory
            .bind_vlan_tenant(free.vlan_id, Some(tenant_id))
            .await?;

        // Confirm the bind stuck; a racing allocator may have taken it.
        let confirmed = self
            .inventory
            .vlan(free.vlan_id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(format!("vlan {}", free.vlan_id)))?;
        if confirmed.tenant_id != Some(tenant_id) {
            return Err(AllocationError::Conflict {
                vlan_id: free.vlan_id,
            });
        }

        info!(
            vlan_id = confirmed.vlan_id,
            vid = confirmed.vid,
            site_id,
            tenant_id,
            "bound customer VLAN"
        );
        Ok(confirmed)
    }
}
