//! Tenant resolution
//!
//! One tenant per billing account, named deterministically from the
//! account id. Creation is confirmed with a second lookup because the
//! create call and the query are not atomic on the backend.

use crate::client::{InventoryClient, InventoryError};
use prov_common::model::Tenant;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Tenant resolution failures.
#[derive(Debug, Error)]
pub enum TenantError {
    #[error("tenant for account {0} was created but did not verify")]
    VerificationFailed(String),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Ensures a billing tenant record exists for an account.
pub struct TenantResolver<I> {
    inventory: Arc<I>,
    name_prefix: String,
}

impl<I: InventoryClient> TenantResolver<I> {
    pub fn new(inventory: Arc<I>, name_prefix: impl Into<String>) -> Self {
        Self {
            inventory,
            name_prefix: name_prefix.into(),
        }
    }

    /// Deterministic tenant name for a billing account.
    pub fn tenant_name(&self, account_id: &str) -> String {
        format!("{}{}", self.name_prefix, account_id)
    }

    /// Look up the account's tenant, creating it when absent.
    ///
    /// Exactly one re-verification follows a create; a tenant still absent
    /// after that surfaces as [`TenantError::VerificationFailed`] rather
    /// than proceeding with a missing record.
    pub async fn ensure_tenant(&self, account_id: &str) -> Result<Tenant, TenantError> {
        let name = self.tenant_name(account_id);
        if let Some(tenant) = self.inventory.tenant_by_name(&name).await? {
            return Ok(tenant);
        }

        info!(account_id, name, "tenant missing, creating");
        self.inventory.create_tenant(&name, account_id).await?;

        self.inventory
            .tenant_by_name(&name)
            .await?
            .ok_or_else(|| TenantError::VerificationFailed(account_id.to_string()))
    }
}
