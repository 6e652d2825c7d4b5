//! Remote operation names
//!
//! The full bus topology (topics, queues) is intentionally excluded; these
//! names are the only part of the remote surface this core depends on.

/// Eligibility gate: may this account be provisioned today.
pub const CAN_PROVISION: &str = "erp.can_provision";

/// Validate and bind a service-module inventory item to the account.
pub const ASSIGN_INVENTORY: &str = "erp.assign_inventory";

/// Resolve the registration-VLAN context from a leased address.
pub const GET_REGISTRATION_VLAN: &str = "dcim.get_registration_vlan";

/// Resolve the management vid from a registration VLAN name.
pub const GET_MGMT_VLAN: &str = "dcim.get_mgmt_vlan";

/// Read the MAC addresses off the subscriber's service module.
pub const GET_SERVICE_MODULE_MACS: &str = "network.get_service_module_macs";

/// Add the customer VLAN to the serving router and switch interfaces.
pub const CONFIGURE_INTERFACES: &str = "network.configure_interfaces";

/// Push the final configuration to the service module.
pub const SEND_SERVICE_MODULE_CONFIG: &str = "network.send_service_module_config";
