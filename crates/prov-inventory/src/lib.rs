//! OpenProv Inventory - resource services over the inventory boundary
//!
//! The narrow async interface to the inventory system, an in-memory
//! implementation for testing and development, and the three services
//! built on top of it:
//! - VLAN allocator (single-VLAN-per-tenant invariant, read-verify binds)
//! - Tenant resolver (deterministic names, create-if-absent)
//! - Device locator (serving router and access point for a VLAN)

pub mod allocator;
pub mod client;
pub mod locator;
pub mod memory;
pub mod rpc;
pub mod tenant;

pub use allocator::{AllocationError, VlanAllocator};
pub use client::{InventoryClient, InventoryError, InventoryResult};
pub use locator::{DeviceLocator, LocatorError, ServingDevices};
pub use memory::InMemoryInventory;
pub use rpc::InventoryRpcHandler;
pub use tenant::{TenantError, TenantResolver};
