//! Serving-device resolution
//!
//! Finds the router and the named access point on a VLAN's site. A partial
//! match is a hard failure; the caller never sees half a result.

use crate::client::{InventoryClient, InventoryError};
use prov_common::model::{DeviceRole, RecordId};
use prov_common::platform::Platform;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Device lookup failures.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("no router or no access point named {ap_name} on the VLAN's site")]
    DeviceNotFound { ap_name: String },
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Addresses of the devices serving a customer VLAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServingDevices {
    pub router_ip: String,
    pub access_point_ip: String,
    /// Platform of the access point, when the inventory records one.
    pub access_point_platform: Option<Platform>,
}

/// Resolves serving devices through the inventory.
pub struct DeviceLocator<I> {
    inventory: Arc<I>,
}

impl<I: InventoryClient> DeviceLocator<I> {
    pub fn new(inventory: Arc<I>) -> Self {
        Self { inventory }
    }

    /// Router and access-point addresses for a VLAN.
    ///
    /// The router is matched by role; the access point by role and exact
    /// name. Both must resolve or the call fails.
    pub async fn router_and_access_point_ip(
        &self,
        vlan_id: RecordId,
        ap_name: &str,
    ) -> Result<ServingDevices, LocatorError> {
        let devices = self.inventory.devices_for_vlan(vlan_id).await?;

        let mut router_ip = None;
        let mut access_point_ip = None;
        let mut access_point_platform = None;

        for device in &devices {
            let Some(address) = device.primary_address.as_deref() else {
                continue;
            };
            match device.role {
                DeviceRole::Router if router_ip.is_none() => {
                    router_ip = Some(strip_prefix_len(address));
                }
                DeviceRole::AccessPoint if device.name == ap_name => {
                    access_point_ip = Some(strip_prefix_len(address));
                    access_point_platform = device.platform;
                }
                _ => {}
            }
        }

        debug!(vlan_id, ap_name, ?router_ip, ?access_point_ip, "device lookup");

        match (router_ip, access_point_ip) {
            (Some(router_ip), Some(access_point_ip)) => Ok(ServingDevices {
                router_ip,
                access_point_ip,
                access_point_platform,
            }),
            _ => Err(LocatorError::DeviceNotFound {
                ap_name: ap_name.to_string(),
            }),
        }
    }
}

/// Drop a trailing `/len` from an inventory primary address.
fn strip_prefix_len(address: &str) -> String {
    match address.rsplit_once('/') {
        Some((ip, _)) => ip.to_string(),
        None => address.to_string(),
    }
}
