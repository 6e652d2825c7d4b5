//! Provisioning saga controller
//!
//! Drives the fixed step sequence for one registration lease, threading
//! each step's output into the next step's input. The first failure halts
//! the run: the operator channel gets a failure notification naming the
//! step, and the caller gets a [`ProvisioningError`] wrapping the cause.
//! Completed steps are not rolled back unless VLAN compensation is
//! explicitly enabled in the configuration.

use crate::saga::{SagaExecution, SagaState};
use prov_common::config::ProvisionerConfig;
use prov_common::envelope::StepExecutor;
use prov_common::model::{ProvisioningRequest, RecordId, RegistrationContext};
use prov_common::notify::Notifier;
use prov_common::ops;
use prov_inventory::allocator::{AllocationError, VlanAllocator};
use prov_inventory::client::InventoryClient;
use prov_inventory::locator::{DeviceLocator, LocatorError};
use prov_inventory::tenant::{TenantError, TenantResolver};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Cause of a failed saga step.
#[derive(Debug, Error)]
pub enum StepError {
    /// The step result was missing an expected field or had the wrong
    /// shape. Fatal, like any remote error.
    #[error("invalid step result: {0}")]
    Validation(String),
    /// The remote side reported an error, or the call timed out.
    #[error("{0}")]
    External(String),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Tenant(#[from] TenantError),
    #[error(transparent)]
    Locator(#[from] LocatorError),
}

/// Terminal saga failure naming the step that caused it.
#[derive(Debug, Error)]
#[error("provisioning failed at {step}: {cause}")]
pub struct ProvisioningError {
    /// Name of the failing step, sufficient to resume or escalate
    /// manually.
    pub step: &'static str,
    #[source]
    pub cause: StepError,
}

/// What this run changed, for optional compensation.
#[derive(Default)]
struct RunState {
    /// VLAN bound during this run, as opposed to a binding that already
    /// existed before it.
    freshly_bound_vlan: Option<RecordId>,
}

/// The saga controller.
pub struct ProvisioningOrchestrator<I> {
    executor: Arc<dyn StepExecutor>,
    allocator: VlanAllocator<I>,
    tenants: TenantResolver<I>,
    locator: DeviceLocator<I>,
    notifier: Arc<dyn Notifier>,
    config: ProvisionerConfig,
}

impl<I: InventoryClient> ProvisioningOrchestrator<I> {
    pub fn new(
        executor: Arc<dyn StepExecutor>,
        inventory: Arc<I>,
        notifier: Arc<dyn Notifier>,
        config: ProvisionerConfig,
    ) -> Self {
        Self {
            allocator: VlanAllocator::new(
                inventory.clone(),
                config.customer_pool,
                config.allocation_retries,
            ),
            tenants: TenantResolver::new(inventory.clone(), config.tenant_name_prefix.clone()),
            locator: DeviceLocator::new(inventory),
            executor,
            notifier,
            config,
        }
    }

    /// Run one saga to completion.
    pub async fn run(&self, request: &ProvisioningRequest) -> Result<(), ProvisioningError> {
        self.execute(request).await.map(|_| ())
    }

    /// Run one saga, returning its execution record.
    pub async fn execute(
        &self,
        request: &ProvisioningRequest,
    ) -> Result<SagaExecution, ProvisioningError> {
        let mut exec = SagaExecution::new(&request.account_id);
        info!(
            saga_id = %exec.id,
            account_id = %request.account_id,
            ip = %request.ip,
            vlan_ref = ?request.registration_vlan_ref,
            "provisioning saga started"
        );
        self.notify(request, "Received provisioning request.").await;

        let mut run = RunState::default();
        match self.drive(request, &mut exec, &mut run).await {
            Ok(()) => {
                exec.complete();
                self.notify(
                    request,
                    &format!(
                        "Provisioning completed successfully for account {}.",
                        request.account_id
                    ),
                )
                .await;
                info!(saga_id = %exec.id, "provisioning saga completed");
                Ok(exec)
            }
            Err(e) => {
                exec.fail(e.cause.to_string());
                warn!(saga_id = %exec.id, step = e.step, error = %e.cause, "provisioning saga failed");
                self.notify(
                    request,
                    &format!("PROVISIONING FAILED: {} - {}", e.step, e.cause),
                )
                .await;
                self.compensate(request, &run).await;
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        request: &ProvisioningRequest,
        exec: &mut SagaExecution,
        run: &mut RunState,
    ) -> Result<(), ProvisioningError> {
        let account = request.account_id.as_str();

        // Eligibility gate. The only step that can reject a request
        // before any external mutation.
        self.notify(request, &format!("Checking for scheduled job on account {account}."))
            .await;
        self.remote_step(
            exec,
            SagaState::EligibilityChecked,
            ops::CAN_PROVISION,
            json!({ "account_id": account, "ip": request.ip }),
        )
        .await?;
        self.notify(
            request,
            &format!("Account {account} is eligible for provisioning today."),
        )
        .await;

        // Which prefix, site and VLAN the lease landed on.
        self.notify(request, "Resolving registration VLAN context.").await;
        let value = self
            .remote_step(
                exec,
                SagaState::ApCenterResolved,
                ops::GET_REGISTRATION_VLAN,
                json!({ "ip": request.ip }),
            )
            .await?;
        let reg: RegistrationContext = parse_result(SagaState::ApCenterResolved, value)?;
        self.notify(
            request,
            &format!("Access point data acquired for site {}.", reg.site.name),
        )
        .await;

        // Management vid paired with the registration VLAN.
        self.notify(request, "Resolving management VLAN id.").await;
        let value = self
            .remote_step(
                exec,
                SagaState::MgmtVlanResolved,
                ops::GET_MGMT_VLAN,
                json!({ "name": reg.vlan.name }),
            )
            .await?;
        let mgmt_vid: u16 = parse_result(SagaState::MgmtVlanResolved, value)?;
        self.notify(request, &format!("Management VLAN id resolved: {mgmt_vid}."))
            .await;

        // MAC addresses off the service module.
        self.notify(
            request,
            &format!("Acquiring MAC addresses from {}.", request.ip),
        )
        .await;
        let value = self
            .remote_step(
                exec,
                SagaState::MacsAcquired,
                ops::GET_SERVICE_MODULE_MACS,
                json!({ "ip": request.ip }),
            )
            .await?;
        let macs: Vec<String> = parse_result(SagaState::MacsAcquired, value)?;
        self.notify(
            request,
            &format!("Acquired {} MAC addresses from {}.", macs.len(), request.ip),
        )
        .await;

        // One of the MACs must be a known inventory item; bind it to the
        // account.
        self.notify(request, "Validating and assigning MAC addresses.").await;
        let item = self
            .remote_step(
                exec,
                SagaState::InventoryAssigned,
                ops::ASSIGN_INVENTORY,
                json!({ "account_id": account, "ip": request.ip, "mac_addresses": macs }),
            )
            .await?;
        self.notify(
            request,
            &format!("Assigned inventory item {item} to account {account}."),
        )
        .await;

        // Billing tenant, created on first provision.
        self.notify(request, "Verifying tenant record.").await;
        exec.begin(SagaState::TenantVerified);
        let tenant = self
            .tenants
            .ensure_tenant(account)
            .await
            .map_err(|e| step_failure(SagaState::TenantVerified, e))?;
        exec.advance(SagaState::TenantVerified);
        self.notify(
            request,
            &format!("Tenant verified: {} ({}).", tenant.id, tenant.name),
        )
        .await;

        // Customer VLAN at the registration site. The prior assignment is
        // read first so compensation never releases a binding that
        // predates this run.
        self.notify(request, "Assigning customer VLAN.").await;
        exec.begin(SagaState::VlanAssigned);
        let prior = self
            .allocator
            .tenant_vlan(tenant.id)
            .await
            .map_err(|e| step_failure(SagaState::VlanAssigned, e))?;
        let vlan = self
            .allocator
            .assign_tenant_vlan(reg.site.id, tenant.id)
            .await
            .map_err(|e| step_failure(SagaState::VlanAssigned, e))?;
        if prior.as_ref().map(|p| p.vlan_id) != Some(vlan.vlan_id) {
            run.freshly_bound_vlan = Some(vlan.vlan_id);
        }
        exec.advance(SagaState::VlanAssigned);
        self.notify(
            request,
            &format!(
                "Assigned VLAN {} (vid {}) to account {account}.",
                vlan.vlan_id, vlan.vid
            ),
        )
        .await;

        // Serving router and access point.
        let ap_name = access_point_name(&reg.vlan.name);
        self.notify(request, "Acquiring router IP address.").await;
        exec.begin(SagaState::RouterResolved);
        let devices = self
            .locator
            .router_and_access_point_ip(vlan.vlan_id, ap_name)
            .await
            .map_err(|e| step_failure(SagaState::RouterResolved, e))?;
        exec.advance(SagaState::RouterResolved);
        self.notify(
            request,
            &format!("Router IP acquired: {}.", devices.router_ip),
        )
        .await;

        // Push the customer VLAN onto the serving interfaces.
        self.notify(
            request,
            &format!(
                "Adding customer VLAN ({}) to interfaces and configuring router/switches.",
                vlan.vid
            ),
        )
        .await;
        self.remote_step(
            exec,
            SagaState::DeviceConfigured,
            ops::CONFIGURE_INTERFACES,
            json!({
                "router_ip": devices.router_ip,
                "ip": devices.access_point_ip,
                "customer_vlan": vlan.vid,
            }),
        )
        .await?;
        self.notify(request, "Customer VLAN assigned. Router and switches configured.")
            .await;

        // Final service-module configuration.
        self.notify(request, "Sending configuration to service module.").await;
        self.remote_step(
            exec,
            SagaState::ServiceModuleConfigured,
            ops::SEND_SERVICE_MODULE_CONFIG,
            json!({
                "ip_address": request.ip,
                "account_id": account,
                "customer_vlan": vlan.vid,
                "mgmt_vlan": mgmt_vid,
                "ap_name": ap_name,
                "platform": devices.access_point_platform,
            }),
        )
        .await?;
        self.notify(request, "Service module successfully configured.").await;

        Ok(())
    }

    /// Dispatch one remote step and validate its envelope.
    async fn remote_step(
        &self,
        exec: &mut SagaExecution,
        state: SagaState,
        operation: &'static str,
        payload: Value,
    ) -> Result<Value, ProvisioningError> {
        let step = state.step();
        exec.begin(state);
        debug!(step, operation, "dispatching remote step");

        let dispatched = self.executor.execute(operation, payload);
        let envelope = match tokio::time::timeout(self.config.step_timeout, dispatched).await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(e)) => {
                return Err(ProvisioningError {
                    step,
                    cause: StepError::External(e.to_string()),
                })
            }
            Err(_) => {
                return Err(ProvisioningError {
                    step,
                    cause: StepError::External(format!("{operation} timed out")),
                })
            }
        };

        match envelope.into_result() {
            Ok(result) => {
                exec.advance(state);
                Ok(result)
            }
            Err(error) => Err(ProvisioningError {
                step,
                cause: StepError::External(error),
            }),
        }
    }

    /// Undo what the failed run changed, when enabled.
    async fn compensate(&self, request: &ProvisioningRequest, run: &RunState) {
        if !self.config.release_vlan_on_failure {
            return;
        }
        let Some(vlan_id) = run.freshly_bound_vlan else {
            return;
        };
        match self.allocator.release(vlan_id).await {
            Ok(()) => {
                self.notify(
                    request,
                    &format!("Released VLAN {vlan_id} bound during the failed run."),
                )
                .await;
            }
            Err(e) => warn!(vlan_id, error = %e, "failed to release VLAN after saga failure"),
        }
    }

    async fn notify(&self, request: &ProvisioningRequest, text: &str) {
        let message = format!("*Acc: {}* - {}", request.account_id, text);
        if let Err(e) = self
            .notifier
            .post(&self.config.operator_channel, &message)
            .await
        {
            // Logged, never escalated.
            warn!(error = %e, "operator notification failed");
        }
    }
}

fn step_failure(state: SagaState, cause: impl Into<StepError>) -> ProvisioningError {
    ProvisioningError {
        step: state.step(),
        cause: cause.into(),
    }
}

fn parse_result<T: DeserializeOwned>(state: SagaState, value: Value) -> Result<T, ProvisioningError> {
    serde_json::from_value(value).map_err(|e| ProvisioningError {
        step: state.step(),
        cause: StepError::Validation(e.to_string()),
    })
}

/// Access-point name for a registration VLAN: the name with its pool
/// suffix stripped.
fn access_point_name(reg_vlan_name: &str) -> &str {
    reg_vlan_name
        .strip_suffix("-reg")
        .or_else(|| reg_vlan_name.strip_suffix("-mgmt"))
        .unwrap_or(reg_vlan_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prov_common::envelope::{ExecutorError, StepEnvelope};
    use prov_common::model::{Device, DeviceRole};
    use prov_common::notify::InMemoryNotifier;
    use prov_common::platform::Platform;
    use prov_inventory::memory::InMemoryInventory;
    use prov_inventory::rpc::InventoryRpcHandler;
    use std::collections::HashMap;
    use std::net::IpAddr;
    use std::sync::Mutex;
    use std::time::Duration;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .try_init();
    }

    fn lease_ip() -> IpAddr {
        "172.20.123.198".parse().unwrap()
    }

    fn request() -> ProvisioningRequest {
        ProvisioningRequest {
            account_id: "420791".to_string(),
            ip: lease_ip(),
            registration_vlan_ref: None,
        }
    }

    /// Scripted executor answering by operation name, recording the call
    /// order.
    struct FakeExecutor {
        responses: Mutex<HashMap<String, StepEnvelope>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeExecutor {
        fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn respond(&self, operation: &str, envelope: StepEnvelope) {
            self.responses
                .lock()
                .unwrap()
                .insert(operation.to_string(), envelope);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StepExecutor for FakeExecutor {
        async fn execute(
            &self,
            operation: &str,
            _payload: Value,
        ) -> Result<StepEnvelope, ExecutorError> {
            self.calls.lock().unwrap().push(operation.to_string());
            self.responses
                .lock()
                .unwrap()
                .get(operation)
                .cloned()
                .ok_or_else(|| ExecutorError::UnknownOperation(operation.to_string()))
        }
    }

    struct World {
        inventory: Arc<InMemoryInventory>,
        executor: Arc<FakeExecutor>,
        notifier: Arc<InMemoryNotifier>,
        cust_vlan: RecordId,
    }

    fn world() -> World {
        init_tracing();
        let inventory = Arc::new(InMemoryInventory::new());
        let site = inventory.add_site("ubbt2");
        let reg_vlan = inventory.add_vlan(site, 900, "ap-biq60.ubbt2-reg");
        inventory.add_vlan(site, 15, "ap-biq60.ubbt2-mgmt");
        let cust_vlan = inventory.add_vlan(site, 1024, "cust-1024");
        inventory.add_vlan(site, 1025, "cust-1025");
        inventory.add_device(
            site,
            Device {
                name: "rtr1.ubbt2".to_string(),
                role: DeviceRole::Router,
                primary_address: Some("10.0.0.1/31".to_string()),
                platform: Some(Platform::CiscoIosXr),
            },
        );
        inventory.add_device(
            site,
            Device {
                name: "ap-biq60.ubbt2".to_string(),
                role: DeviceRole::AccessPoint,
                primary_address: Some("172.20.123.5/24".to_string()),
                platform: Some(Platform::UbiquitiWave),
            },
        );
        inventory.add_registration(lease_ip(), "172.20.123.0/24", site, reg_vlan);

        let executor = Arc::new(FakeExecutor::new());
        executor.respond(ops::CAN_PROVISION, StepEnvelope::ok(json!(true)));
        executor.respond(
            ops::GET_REGISTRATION_VLAN,
            StepEnvelope::ok(json!({
                "prefix": "172.20.123.0/24",
                "site": { "id": site, "name": "ubbt2" },
                "vlan": { "id": reg_vlan, "name": "ap-biq60.ubbt2-reg", "vid": 900 },
            })),
        );
        executor.respond(ops::GET_MGMT_VLAN, StepEnvelope::ok(json!(15)));
        executor.respond(
            ops::GET_SERVICE_MODULE_MACS,
            StepEnvelope::ok(json!(["aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02"])),
        );
        executor.respond(ops::ASSIGN_INVENTORY, StepEnvelope::ok(json!(90817)));
        executor.respond(ops::CONFIGURE_INTERFACES, StepEnvelope::ok(json!("ok")));
        executor.respond(ops::SEND_SERVICE_MODULE_CONFIG, StepEnvelope::ok(json!("ok")));

        World {
            inventory,
            executor,
            notifier: Arc::new(InMemoryNotifier::new()),
            cust_vlan,
        }
    }

    fn orchestrator(
        world: &World,
        config: ProvisionerConfig,
    ) -> ProvisioningOrchestrator<InMemoryInventory> {
        ProvisioningOrchestrator::new(
            world.executor.clone(),
            world.inventory.clone(),
            world.notifier.clone(),
            config,
        )
    }

    #[tokio::test]
    async fn test_happy_path_completes() {
        let world = world();
        let orch = orchestrator(&world, ProvisionerConfig::default());

        let exec = orch.execute(&request()).await.unwrap();
        assert_eq!(exec.state, SagaState::Completed);
        assert!(exec.completed_at.is_some());

        // Remote steps ran exactly once each, in order.
        assert_eq!(
            world.executor.calls(),
            vec![
                ops::CAN_PROVISION,
                ops::GET_REGISTRATION_VLAN,
                ops::GET_MGMT_VLAN,
                ops::GET_SERVICE_MODULE_MACS,
                ops::ASSIGN_INVENTORY,
                ops::CONFIGURE_INTERFACES,
                ops::SEND_SERVICE_MODULE_CONFIG,
            ]
        );

        // The tenant exists and holds the first free customer VLAN.
        let tenant = world
            .inventory
            .tenant_by_name("cust-420791")
            .await
            .unwrap()
            .unwrap();
        let bound = world.inventory.vlan(world.cust_vlan).await.unwrap().unwrap();
        assert_eq!(bound.tenant_id, Some(tenant.id));

        let texts: Vec<String> = world.notifier.events().into_iter().map(|e| e.text).collect();
        assert!(texts
            .iter()
            .any(|t| t.contains("Provisioning completed successfully for account 420791")));
        assert!(texts.iter().all(|t| t.starts_with("*Acc: 420791* - ")));
        assert!(texts
            .iter()
            .any(|t| t.contains(&format!("Assigned VLAN {} (vid 1024)", world.cust_vlan))));
    }

    #[tokio::test]
    async fn test_halts_on_first_failure_with_one_notification() {
        let world = world();
        world.executor.respond(
            ops::GET_SERVICE_MODULE_MACS,
            StepEnvelope::err("timeout"),
        );
        let orch = orchestrator(&world, ProvisionerConfig::default());

        let err = orch.run(&request()).await.unwrap_err();
        assert_eq!(err.step, "mac acquisition");
        assert!(matches!(err.cause, StepError::External(ref e) if e == "timeout"));

        // The next step never ran.
        let calls = world.executor.calls();
        assert!(!calls.iter().any(|c| c == ops::ASSIGN_INVENTORY));

        // Exactly one failure notification, naming the step.
        let failures: Vec<String> = world
            .notifier
            .events()
            .into_iter()
            .map(|e| e.text)
            .filter(|t| t.contains("PROVISIONING FAILED"))
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("mac acquisition"));

        // Nothing was mutated: the saga failed before tenant and VLAN
        // steps.
        assert!(world
            .inventory
            .tenant_by_name("cust-420791")
            .await
            .unwrap()
            .is_none());
        assert_eq!(world.inventory.bind_mutations(), 0);
    }

    #[tokio::test]
    async fn test_malformed_step_result_is_fatal() {
        let world = world();
        world.executor.respond(
            ops::GET_REGISTRATION_VLAN,
            StepEnvelope::ok(json!({ "prefix": "172.20.123.0/24" })),
        );
        let orch = orchestrator(&world, ProvisionerConfig::default());

        let err = orch.run(&request()).await.unwrap_err();
        assert_eq!(err.step, "registration context");
        assert!(matches!(err.cause, StepError::Validation(_)));
        assert!(!world
            .executor
            .calls()
            .iter()
            .any(|c| c == ops::GET_MGMT_VLAN));
    }

    struct SlowExecutor;

    #[async_trait]
    impl StepExecutor for SlowExecutor {
        async fn execute(
            &self,
            _operation: &str,
            _payload: Value,
        ) -> Result<StepEnvelope, ExecutorError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(StepEnvelope::ok(json!(true)))
        }
    }

    #[tokio::test]
    async fn test_step_timeout_fails_the_saga() {
        let world = world();
        let config = ProvisionerConfig {
            step_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let orch = ProvisioningOrchestrator::new(
            Arc::new(SlowExecutor),
            world.inventory.clone(),
            world.notifier.clone(),
            config,
        );

        let err = orch.run(&request()).await.unwrap_err();
        assert_eq!(err.step, "eligibility check");
        assert!(matches!(err.cause, StepError::External(ref e) if e.contains("timed out")));
    }

    #[tokio::test]
    async fn test_fresh_vlan_released_on_failure_when_enabled() {
        let world = world();
        world
            .executor
            .respond(ops::CONFIGURE_INTERFACES, StepEnvelope::err("ssh unreachable"));
        let config = ProvisionerConfig {
            release_vlan_on_failure: true,
            ..Default::default()
        };
        let orch = orchestrator(&world, config);

        let err = orch.run(&request()).await.unwrap_err();
        assert_eq!(err.step, "device configuration");

        let vlan = world.inventory.vlan(world.cust_vlan).await.unwrap().unwrap();
        assert_eq!(vlan.tenant_id, None);
        assert!(world
            .notifier
            .events()
            .iter()
            .any(|e| e.text.contains(&format!("Released VLAN {}", world.cust_vlan))));
    }

    #[tokio::test]
    async fn test_preexisting_binding_survives_compensation() {
        let world = world();
        // The tenant already holds its VLAN at this site from an earlier
        // run.
        let tenant = world.inventory.add_tenant("cust-420791", "420791");
        world
            .inventory
            .bind_vlan_tenant(world.cust_vlan, Some(tenant.id))
            .await
            .unwrap();
        world
            .executor
            .respond(ops::CONFIGURE_INTERFACES, StepEnvelope::err("ssh unreachable"));
        let config = ProvisionerConfig {
            release_vlan_on_failure: true,
            ..Default::default()
        };
        let orch = orchestrator(&world, config);

        orch.run(&request()).await.unwrap_err();

        let vlan = world.inventory.vlan(world.cust_vlan).await.unwrap().unwrap();
        assert_eq!(vlan.tenant_id, Some(tenant.id));
    }

    #[tokio::test]
    async fn test_orphaned_binding_kept_by_default() {
        let world = world();
        world
            .executor
            .respond(ops::CONFIGURE_INTERFACES, StepEnvelope::err("ssh unreachable"));
        let orch = orchestrator(&world, ProvisionerConfig::default());

        orch.run(&request()).await.unwrap_err();

        // Manual cleanup is the default: the binding stays.
        let vlan = world.inventory.vlan(world.cust_vlan).await.unwrap().unwrap();
        assert!(vlan.tenant_id.is_some());
    }

    /// Routes `dcim.*` operations to the inventory handler, everything
    /// else to the scripted executor.
    struct SplitExecutor {
        inventory: InventoryRpcHandler<InMemoryInventory>,
        rest: Arc<FakeExecutor>,
    }

    #[async_trait]
    impl StepExecutor for SplitExecutor {
        async fn execute(
            &self,
            operation: &str,
            payload: Value,
        ) -> Result<StepEnvelope, ExecutorError> {
            if operation.starts_with("dcim.") {
                self.inventory.execute(operation, payload).await
            } else {
                self.rest.execute(operation, payload).await
            }
        }
    }

    #[tokio::test]
    async fn test_end_to_end_with_inventory_rpc_handler() {
        let world = world();
        let split = Arc::new(SplitExecutor {
            inventory: InventoryRpcHandler::new(world.inventory.clone()),
            rest: world.executor.clone(),
        });
        let orch = ProvisioningOrchestrator::new(
            split,
            world.inventory.clone(),
            world.notifier.clone(),
            ProvisionerConfig::default(),
        );

        let exec = orch.execute(&request()).await.unwrap();
        assert_eq!(exec.state, SagaState::Completed);

        // Registration context and management vid came from the seeded
        // inventory, not the script.
        let texts: Vec<String> = world.notifier.events().into_iter().map(|e| e.text).collect();
        assert!(texts.iter().any(|t| t.contains("Management VLAN id resolved: 15")));
        assert!(texts.iter().any(|t| t.contains("Router IP acquired: 10.0.0.1")));
    }

    #[test]
    fn test_access_point_name_strips_pool_suffix() {
        assert_eq!(access_point_name("ap-biq60.ubbt2-reg"), "ap-biq60.ubbt2");
        assert_eq!(access_point_name("ap-biq60.ubbt2-mgmt"), "ap-biq60.ubbt2");
        assert_eq!(access_point_name("ap-biq60.ubbt2"), "ap-biq60.ubbt2");
    }
}
