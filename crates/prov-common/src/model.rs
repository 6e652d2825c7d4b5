//! Provisioning Domain Model

use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Record id in the backing inventory system.
pub type RecordId = i64;

/// One provisioning run's input, built from the inbound registration event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningRequest {
    /// Billing account the subscriber belongs to.
    pub account_id: String,
    /// Address the device leased on the registration VLAN.
    pub ip: IpAddr,
    /// Registration VLAN reference carried by the lease, when present.
    pub registration_vlan_ref: Option<String>,
}

/// Billing tenant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Inventory id.
    pub id: RecordId,
    /// Deterministic display name derived from the account id.
    pub name: String,
    /// URL-safe slug.
    pub slug: String,
}

/// Physical site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Inventory id.
    pub id: RecordId,
    /// Site name.
    pub name: String,
}

/// A VLAN record with its optional tenant binding.
///
/// VLANs are owned by the inventory system; this core only mutates the
/// `tenant_id` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanAssignment {
    /// Inventory id of the VLAN record.
    pub vlan_id: RecordId,
    /// Numeric VLAN id on the wire.
    pub vid: u16,
    /// VLAN name.
    pub name: String,
    /// Site the VLAN belongs to.
    pub site_id: RecordId,
    /// Tenant currently bound, if any.
    pub tenant_id: Option<RecordId>,
}

/// Inclusive vid interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VidRange {
    /// First vid in the range.
    pub start: u16,
    /// Last vid in the range.
    pub end: u16,
}

impl VidRange {
    /// The reserved customer pool. Exclusive of the registration and
    /// management pools.
    pub const CUSTOMER: VidRange = VidRange { start: 1024, end: 3071 };

    /// Whether `vid` falls inside the range.
    pub fn contains(&self, vid: u16) -> bool {
        vid >= self.start && vid <= self.end
    }
}

/// Role of a device in the site inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceRole {
    /// Serving router.
    Router,
    /// Access point.
    #[serde(rename = "AP")]
    AccessPoint,
    /// Distribution switch.
    Switch,
    /// Any role this core does not act on.
    #[serde(other)]
    Other,
}

/// Device record as returned by the inventory device query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Device name.
    pub name: String,
    /// Inventory role.
    pub role: DeviceRole,
    /// Primary address, possibly carrying a `/len` suffix.
    pub primary_address: Option<String>,
    /// Explicit platform field; never inferred from naming conventions.
    #[serde(default)]
    pub platform: Option<Platform>,
}

/// VLAN reference inside a registration context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanRef {
    /// Inventory id.
    pub id: RecordId,
    /// VLAN name.
    pub name: String,
    /// Numeric VLAN id.
    pub vid: u16,
}

/// Everything the registration prefix containing a leased address tells us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationContext {
    /// The containing prefix in CIDR form.
    pub prefix: String,
    /// Site the prefix belongs to.
    pub site: Site,
    /// The registration VLAN itself.
    pub vlan: VlanRef,
}
