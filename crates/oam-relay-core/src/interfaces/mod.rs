// oam-relay-core/src/interfaces/mod.rs
// ============================================================================
// Module: OaM Relay Interfaces
// Description: Backend-agnostic interfaces for inventory, routing, and automation.
// Purpose: Define the contract surfaces used by the lifecycle orchestrator.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how the orchestrator reaches its external collaborators
//! without embedding backend-specific details. Per-attribute inventory writes
//! are atomic; there is no cross-resource transaction, so a failed lifecycle
//! call may leave earlier writes applied (documented, not corrected).

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::ApplicationEndpoints;
use crate::core::ApplicationName;
use crate::core::ApplicationSummary;
use crate::core::EndpointDescription;
use crate::core::EndpointId;
use crate::core::OperationName;
use crate::core::OperationPath;
use crate::core::RecipeName;
use crate::core::ReleaseNumber;
use crate::core::RemoteAddress;
use crate::core::RemoteProtocol;
use crate::core::RoutingStatus;

// ============================================================================
// SECTION: Resource Inventory
// ============================================================================

/// Resolution errors raised while locating or creating endpoint resources.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The resource inventory is unreachable.
    #[error("resource inventory unavailable: {0}")]
    Unavailable(String),
    /// An endpoint referenced by the inventory does not exist.
    #[error("resource inventory missing endpoint: {0}")]
    MissingEndpoint(String),
    /// The inventory returned contradictory data.
    #[error("resource inventory inconsistent: {0}")]
    Inconsistent(String),
}

/// Write errors raised while mutating endpoint resources.
#[derive(Debug, Error)]
pub enum WriteError {
    /// A field write to the inventory failed.
    #[error("resource write failed: {0}")]
    WriteFailed(String),
    /// The endpoint targeted by a write does not exist.
    #[error("resource write targeted missing endpoint: {0}")]
    MissingEndpoint(String),
}

/// One operation endpoint removed by a deregistration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeletedOperation {
    /// Endpoint that was removed.
    pub endpoint: EndpointId,
    /// Operation name the endpoint represented.
    pub operation: OperationName,
    /// Routing path the endpoint carried.
    pub path: OperationPath,
}

/// Resource set removed by a deregistration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeletedApplication {
    /// Identity endpoint that was removed.
    pub identity: EndpointId,
    /// Transport endpoint that was removed.
    pub transport: EndpointId,
    /// Operation endpoints that were removed.
    pub operations: Vec<DeletedOperation>,
}

/// Persistent resource inventory consulted by every orchestration path.
///
/// Getters fail with [`ResolutionError`]; mutations fail with [`WriteError`].
/// Each setter writes exactly one attribute atomically.
#[async_trait]
pub trait ResourceInventory: Send + Sync {
    /// Finds the endpoint set of an application by name and release.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the inventory cannot be consulted.
    async fn find_application(
        &self,
        name: &ApplicationName,
        release: &ReleaseNumber,
    ) -> Result<Option<ApplicationEndpoints>, ResolutionError>;

    /// Finds the well-known endpoint set reserved for the successor release.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the inventory cannot be consulted.
    async fn new_release_endpoints(&self)
    -> Result<Option<ApplicationEndpoints>, ResolutionError>;

    /// Creates the full endpoint set for an application that does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when creation fails.
    async fn create_application(
        &self,
        description: &EndpointDescription,
    ) -> Result<ApplicationEndpoints, ResolutionError>;

    /// Creates one operation endpoint under an existing identity endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when creation fails.
    async fn create_operation(
        &self,
        identity: &EndpointId,
        operation: &OperationName,
        path: &OperationPath,
    ) -> Result<EndpointId, ResolutionError>;

    /// Reads the application name stored on an identity endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the read fails.
    async fn application_name(&self, identity: &EndpointId)
    -> Result<ApplicationName, ResolutionError>;

    /// Reads the release number stored on an identity endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the read fails.
    async fn release_number(&self, identity: &EndpointId)
    -> Result<ReleaseNumber, ResolutionError>;

    /// Reads the remote protocol stored on a transport endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the read fails.
    async fn remote_protocol(&self, transport: &EndpointId)
    -> Result<RemoteProtocol, ResolutionError>;

    /// Reads the remote address stored on a transport endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the read fails.
    async fn remote_address(&self, transport: &EndpointId)
    -> Result<RemoteAddress, ResolutionError>;

    /// Reads the remote port stored on a transport endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the read fails.
    async fn remote_port(&self, transport: &EndpointId) -> Result<u16, ResolutionError>;

    /// Reads the routing path stored on an operation endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the read fails.
    async fn operation_path(&self, operation: &EndpointId)
    -> Result<OperationPath, ResolutionError>;

    /// Writes the application name of an identity endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the write fails.
    async fn set_application_name(
        &self,
        identity: &EndpointId,
        value: &ApplicationName,
    ) -> Result<(), WriteError>;

    /// Writes the release number of an identity endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the write fails.
    async fn set_release_number(
        &self,
        identity: &EndpointId,
        value: &ReleaseNumber,
    ) -> Result<(), WriteError>;

    /// Writes the remote protocol of a transport endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the write fails.
    async fn set_remote_protocol(
        &self,
        transport: &EndpointId,
        value: RemoteProtocol,
    ) -> Result<(), WriteError>;

    /// Writes the remote address of a transport endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the write fails.
    async fn set_remote_address(
        &self,
        transport: &EndpointId,
        value: &RemoteAddress,
    ) -> Result<(), WriteError>;

    /// Writes the remote port of a transport endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the write fails.
    async fn set_remote_port(&self, transport: &EndpointId, value: u16)
    -> Result<(), WriteError>;

    /// Writes the routing path of an operation endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the write fails.
    async fn set_operation_path(
        &self,
        operation: &EndpointId,
        value: &OperationPath,
    ) -> Result<(), WriteError>;

    /// Deletes the full endpoint set of an application.
    ///
    /// Returns `None` when no matching application exists; deregistration of
    /// an absent application is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when deletion fails.
    async fn delete_application(
        &self,
        name: &ApplicationName,
        release: &ReleaseNumber,
    ) -> Result<Option<DeletedApplication>, WriteError>;

    /// Lists the registered applications in name order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the inventory cannot be consulted.
    async fn list_applications(&self) -> Result<Vec<ApplicationSummary>, ResolutionError>;
}

// ============================================================================
// SECTION: Forwarding Configurator
// ============================================================================

/// Routing errors raised while applying a reconfiguration batch.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The routing layer rejected or failed the batch.
    #[error("routing batch apply failed: {0}")]
    Apply(String),
}

/// Direction of one routing change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingAction {
    /// Add or repoint the routing entry.
    Add,
    /// Remove the routing entry.
    Remove,
}

/// One routing change request within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoutingChange {
    /// Operation name the entry dispatches.
    pub operation: OperationName,
    /// Operation endpoint the entry points at.
    pub endpoint: EndpointId,
    /// Routing path of the operation.
    pub path: OperationPath,
    /// Whether the entry is added or removed.
    pub action: RoutingAction,
}

/// Routing-construct configuration service.
#[async_trait]
pub trait ForwardingConfigurator: Send + Sync {
    /// Applies one batch of routing changes and reports what was touched.
    ///
    /// The `operation_server` names the lifecycle operation on whose behalf
    /// the batch is applied.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError`] when the batch cannot be applied.
    async fn configure(
        &self,
        operation_server: &OperationPath,
        changes: &[RoutingChange],
    ) -> Result<RoutingStatus, RoutingError>;
}

// ============================================================================
// SECTION: Automation Executor
// ============================================================================

/// One automation invocation naming a recipe and its scoping inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AutomationInvocation {
    /// Automation recipe to run.
    pub recipe: RecipeName,
    /// Scoping payload handed to the recipe.
    pub payload: Value,
}

/// Automation execution service, fire-and-forget.
///
/// Submission never fails from the caller's viewpoint; implementations own
/// failure recording. A lifecycle caller observing success is guaranteed
/// configuration and routing only, never automation completion.
pub trait AutomationExecutor: Send + Sync {
    /// Submits a batch of automation invocations for out-of-band execution.
    fn submit(&self, invocations: Vec<AutomationInvocation>);

    /// Submits the secondary software-upgrade step, parameterized by the
    /// number of invocations just fired.
    fn submit_upgrade(&self, fired: usize);
}
