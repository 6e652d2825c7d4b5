//! Inventory RPC handlers
//!
//! Serves the inventory-owned remote steps over the step-envelope
//! boundary, the same way the orchestrator reaches every other driver.
//! Handler failures ride the envelope's `error` field; only an unknown
//! operation is a dispatch fault.

use crate::client::{InventoryClient, InventoryError};
use async_trait::async_trait;
use prov_common::envelope::{ExecutorError, StepEnvelope, StepExecutor};
use prov_common::ops;
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
enum HandlerError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serves `dcim.*` step operations against an inventory client.
pub struct InventoryRpcHandler<I> {
    inventory: Arc<I>,
}

impl<I: InventoryClient> InventoryRpcHandler<I> {
    pub fn new(inventory: Arc<I>) -> Self {
        Self { inventory }
    }

    async fn registration_vlan(&self, payload: &Value) -> Result<Value, HandlerError> {
        let ip = payload
            .get("ip")
            .and_then(Value::as_str)
            .ok_or(HandlerError::MissingField("ip"))?;
        let ip: IpAddr = ip.parse().map_err(|e| HandlerError::InvalidField {
            field: "ip",
            reason: format!("{e}"),
        })?;

        let context = self.inventory.vlan_by_registration_address(ip).await?;
        Ok(serde_json::to_value(context)?)
    }

    async fn mgmt_vlan(&self, payload: &Value) -> Result<Value, HandlerError> {
        let reg_name = payload
            .get("name")
            .and_then(Value::as_str)
            .ok_or(HandlerError::MissingField("name"))?;
        let mgmt_name = management_vlan_name(reg_name);

        let vlan = self
            .inventory
            .vlan_by_name(&mgmt_name)
            .await?
            .ok_or_else(|| HandlerError::NotFound(format!("management VLAN {mgmt_name}")))?;
        Ok(Value::from(vlan.vid))
    }
}

#[async_trait]
impl<I: InventoryClient> StepExecutor for InventoryRpcHandler<I> {
    async fn execute(&self, operation: &str, payload: Value) -> Result<StepEnvelope, ExecutorError> {
        debug!(operation, "inventory rpc dispatch");
        let outcome = match operation {
            ops::GET_REGISTRATION_VLAN => self.registration_vlan(&payload).await,
            ops::GET_MGMT_VLAN => self.mgmt_vlan(&payload).await,
            _ => return Err(ExecutorError::UnknownOperation(operation.to_string())),
        };
        Ok(match outcome {
            Ok(result) => StepEnvelope::ok(result),
            Err(e) => StepEnvelope::err(e.to_string()),
        })
    }
}

/// Management VLAN name for a registration VLAN: `ap-foo-reg` is paired
/// with `ap-foo-mgmt`.
pub fn management_vlan_name(reg_name: &str) -> String {
    match reg_name.strip_suffix("-reg") {
        Some(base) => format!("{base}-mgmt"),
        None => reg_name.to_string(),
    }
}
