//! Inbound trigger event
//!
//! One event type starts a saga: a device leased an address on a
//! registration VLAN.

use prov_common::model::ProvisioningRequest;
use serde::Deserialize;
use std::net::IpAddr;
use thiserror::Error;

/// Body of a `registration-lease` event.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationLease {
    pub account_id: String,
    pub ip: IpAddr,
    /// Registration VLAN reference, when the lease carries one.
    #[serde(default)]
    pub vlan: Option<String>,
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid registration-lease event: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl RegistrationLease {
    /// Parse a raw event body.
    pub fn from_json(body: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(body)?)
    }

    /// The request one saga run owns.
    pub fn into_request(self) -> ProvisioningRequest {
        ProvisioningRequest {
            account_id: self.account_id,
            ip: self.ip,
            registration_vlan_ref: self.vlan,
        }
    }
}
