//! Inventory interface
//!
//! The query language and transport live behind this trait; the core only
//! sees typed records. Mutations are limited to tenant creation and the
//! VLAN tenant binding.

use async_trait::async_trait;
use prov_common::model::{
    Device, RecordId, RegistrationContext, Tenant, VidRange, VlanAssignment,
};
use std::net::IpAddr;
use thiserror::Error;

/// Result type for inventory calls.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Failures of the inventory backend itself.
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// A record the call requires does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The backend rejected or failed the query.
    #[error("query failed: {0}")]
    Query(String),
}

/// Narrow interface to the inventory system.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// VLANs currently bound to a tenant.
    async fn tenant_vlans(&self, tenant_id: RecordId) -> InventoryResult<Vec<VlanAssignment>>;

    /// VLANs of a site restricted to a vid range, in inventory order.
    async fn site_vlans(
        &self,
        site_id: RecordId,
        range: VidRange,
    ) -> InventoryResult<Vec<VlanAssignment>>;

    /// Whether the site exists. The backend silently returns an unfiltered
    /// list when a filter id is unknown, so callers must check first.
    async fn site_exists(&self, site_id: RecordId) -> InventoryResult<bool>;

    /// Whether the tenant exists. Same filter quirk as [`Self::site_exists`].
    async fn tenant_exists(&self, tenant_id: RecordId) -> InventoryResult<bool>;

    /// One VLAN by record id.
    async fn vlan(&self, vlan_id: RecordId) -> InventoryResult<Option<VlanAssignment>>;

    /// One VLAN by exact name.
    async fn vlan_by_name(&self, name: &str) -> InventoryResult<Option<VlanAssignment>>;

    /// Bind a VLAN to a tenant, or clear the binding with `None`.
    async fn bind_vlan_tenant(
        &self,
        vlan_id: RecordId,
        tenant_id: Option<RecordId>,
    ) -> InventoryResult<()>;

    /// Create a tenant record.
    async fn create_tenant(&self, name: &str, slug: &str) -> InventoryResult<Tenant>;

    /// One tenant by exact name.
    async fn tenant_by_name(&self, name: &str) -> InventoryResult<Option<Tenant>>;

    /// Devices on the site serving a VLAN.
    async fn devices_for_vlan(&self, vlan_id: RecordId) -> InventoryResult<Vec<Device>>;

    /// Registration-VLAN context for a leased address.
    async fn vlan_by_registration_address(
        &self,
        ip: IpAddr,
    ) -> InventoryResult<RegistrationContext>;
}
