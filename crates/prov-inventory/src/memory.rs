//! In-memory inventory (for testing and development)

use crate::client::{InventoryClient, InventoryError, InventoryResult};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use prov_common::model::{
    Device, RecordId, RegistrationContext, Site, Tenant, VidRange, VlanAssignment, VlanRef,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// In-memory inventory backend.
///
/// Scan order of [`InventoryClient::site_vlans`] is insertion order, which
/// stands in for the backend's query order.
pub struct InMemoryInventory {
    vlans: RwLock<Vec<VlanAssignment>>,
    tenants: DashMap<RecordId, Tenant>,
    sites: DashMap<RecordId, Site>,
    devices: DashMap<RecordId, Vec<Device>>,
    registrations: RwLock<HashMap<IpAddr, RegistrationContext>>,
    next_id: AtomicI64,
    bind_calls: AtomicU64,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self {
            vlans: RwLock::new(Vec::new()),
            tenants: DashMap::new(),
            sites: DashMap::new(),
            devices: DashMap::new(),
            registrations: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            bind_calls: AtomicU64::new(0),
        }
    }

    fn fresh_id(&self) -> RecordId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Seed a site.
    pub fn add_site(&self, name: &str) -> RecordId {
        let id = self.fresh_id();
        self.sites.insert(
            id,
            Site {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    /// Seed a VLAN on a site, unbound.
    pub fn add_vlan(&self, site_id: RecordId, vid: u16, name: &str) -> RecordId {
        let id = self.fresh_id();
        self.vlans.write().push(VlanAssignment {
            vlan_id: id,
            vid,
            name: name.to_string(),
            site_id,
            tenant_id: None,
        });
        id
    }

    /// Seed a tenant.
    pub fn add_tenant(&self, name: &str, slug: &str) -> Tenant {
        let id = self.fresh_id();
        let tenant = Tenant {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
        };
        self.tenants.insert(id, tenant.clone());
        tenant
    }

    /// Seed a device on a site.
    pub fn add_device(&self, site_id: RecordId, device: Device) {
        self.devices.entry(site_id).or_default().push(device);
    }

    /// Seed the registration prefix containing `ip`, pointing at an
    /// already-seeded site and VLAN.
    pub fn add_registration(&self, ip: IpAddr, prefix: &str, site_id: RecordId, vlan_id: RecordId) {
        let site = self
            .sites
            .get(&site_id)
            .map(|s| s.value().clone())
            .unwrap_or(Site {
                id: site_id,
                name: String::new(),
            });
        let vlan = self
            .vlans
            .read()
            .iter()
            .find(|v| v.vlan_id == vlan_id)
            .map(|v| VlanRef {
                id: v.vlan_id,
                name: v.name.clone(),
                vid: v.vid,
            })
            .unwrap_or(VlanRef {
                id: vlan_id,
                name: String::new(),
                vid: 0,
            });
        self.registrations.write().insert(
            ip,
            RegistrationContext {
                prefix: prefix.to_string(),
                site,
                vlan,
            },
        );
    }

    /// Number of tenant-binding mutations issued so far.
    pub fn bind_mutations(&self) -> u64 {
        self.bind_calls.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventory {
    async fn tenant_vlans(&self, tenant_id: RecordId) -> InventoryResult<Vec<VlanAssignment>> {
        Ok(self
            .vlans
            .read()
            .iter()
            .filter(|v| v.tenant_id == Some(tenant_id))
            .cloned()
            .collect())
    }

    async fn site_vlans(
        &self,
        site_id: RecordId,
        range: VidRange,
    ) -> InventoryResult<Vec<VlanAssignment>> {
        Ok(self
            .vlans
            .read()
            .iter()
            .filter(|v| v.site_id == site_id && range.contains(v.vid))
            .cloned()
            .collect())
    }

    async fn site_exists(&self, site_id: RecordId) -> InventoryResult<bool> {
        Ok(self.sites.contains_key(&site_id))
    }

    async fn tenant_exists(&self, tenant_id: RecordId) -> InventoryResult<bool> {
        Ok(self.tenants.contains_key(&tenant_id))
    }

    async fn vlan(&self, vlan_id: RecordId) -> InventoryResult<Option<VlanAssignment>> {
        Ok(self
            .vlans
            .read()
            .iter()
            .find(|v| v.vlan_id == vlan_id)
            .cloned())
    }

    async fn vlan_by_name(&self, name: &str) -> InventoryResult<Option<VlanAssignment>> {
        Ok(self.vlans.read().iter().find(|v| v.name == name).cloned())
    }

    async fn bind_vlan_tenant(
        &self,
        vlan_id: RecordId,
        tenant_id: Option<RecordId>,
    ) -> InventoryResult<()> {
        self.bind_calls.fetch_add(1, Ordering::Relaxed);
        let mut vlans = self.vlans.write();
        let vlan = vlans
            .iter_mut()
            .find(|v| v.vlan_id == vlan_id)
            .ok_or_else(|| InventoryError::NotFound(format!("vlan {vlan_id}")))?;
        vlan.tenant_id = tenant_id;
        Ok(())
    }

    async fn create_tenant(&self, name: &str, slug: &str) -> InventoryResult<Tenant> {
        Ok(self.add_tenant(name, slug))
    }

    async fn tenant_by_name(&self, name: &str) -> InventoryResult<Option<Tenant>> {
        Ok(self
            .tenants
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value().clone()))
    }

    async fn devices_for_vlan(&self, vlan_id: RecordId) -> InventoryResult<Vec<Device>> {
        let site_id = self
            .vlan(vlan_id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(format!("vlan {vlan_id}")))?
            .site_id;
        Ok(self
            .devices
            .get(&site_id)
            .map(|d| d.value().clone())
            .unwrap_or_default())
    }

    async fn vlan_by_registration_address(
        &self,
        ip: IpAddr,
    ) -> InventoryResult<RegistrationContext> {
        self.registrations
            .read()
            .get(&ip)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(format!("no registration prefix contains {ip}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_site_vlans_filters_by_range_in_insertion_order() {
        let inventory = InMemoryInventory::new();
        let site = inventory.add_site("ubbt2");
        inventory.add_vlan(site, 900, "ap-biq60.ubbt2-reg");
        inventory.add_vlan(site, 1025, "cust-1025");
        inventory.add_vlan(site, 1024, "cust-1024");
        inventory.add_vlan(site, 3100, "mgmt-extra");

        let pool = inventory
            .site_vlans(site, VidRange::CUSTOMER)
            .await
            .unwrap();
        let vids: Vec<u16> = pool.iter().map(|v| v.vid).collect();
        assert_eq!(vids, vec![1025, 1024]);
    }

    #[tokio::test]
    async fn test_bind_and_counters() {
        let inventory = InMemoryInventory::new();
        let site = inventory.add_site("site");
        let vlan = inventory.add_vlan(site, 1024, "cust-1024");
        let tenant = inventory.add_tenant("cust-1001", "1001");

        inventory
            .bind_vlan_tenant(vlan, Some(tenant.id))
            .await
            .unwrap();
        assert_eq!(inventory.bind_mutations(), 1);
        assert_eq!(
            inventory.vlan(vlan).await.unwrap().unwrap().tenant_id,
            Some(tenant.id)
        );

        inventory.bind_vlan_tenant(vlan, None).await.unwrap();
        assert_eq!(inventory.bind_mutations(), 2);
        assert_eq!(inventory.vlan(vlan).await.unwrap().unwrap().tenant_id, None);
    }

    #[tokio::test]
    async fn test_registration_lookup() {
        let inventory = InMemoryInventory::new();
        let site = inventory.add_site("ubbt2");
        let vlan = inventory.add_vlan(site, 900, "ap-biq60.ubbt2-reg");
        let ip: IpAddr = "172.20.123.198".parse().unwrap();
        inventory.add_registration(ip, "172.20.123.0/24", site, vlan);

        let ctx = inventory.vlan_by_registration_address(ip).await.unwrap();
        assert_eq!(ctx.site.id, site);
        assert_eq!(ctx.vlan.name, "ap-biq60.ubbt2-reg");

        let missing: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(inventory.vlan_by_registration_address(missing).await.is_err());
    }
}
