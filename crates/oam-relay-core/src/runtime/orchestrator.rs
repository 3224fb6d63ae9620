// oam-relay-core/src/runtime/orchestrator.rs
// ============================================================================
// Module: OaM Relay Lifecycle Orchestrator
// Description: Stage-ordered lifecycle execution over collaborator interfaces.
// Purpose: Drive resolve, diff, aggregate, route, and trigger for each call.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The orchestrator is the single canonical execution path for lifecycle
//! calls. Every call runs its stages strictly in order: resolve, diff,
//! aggregate, route (only when operation endpoints changed), then trigger
//! (fire-and-forget). Any stage error before the trigger aborts the call and
//! surfaces to the caller unchanged; already-applied writes are not rolled
//! back. Concurrent calls are not serialized — the inventory's atomic
//! per-attribute writes are the only protection against lost updates, so
//! last-writer-wins races on the same application are an accepted risk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ApplicationName;
use crate::core::ApplicationSummary;
use crate::core::ConfigurationStatus;
use crate::core::Disposition;
use crate::core::EndpointDescription;
use crate::core::OperationPath;
use crate::core::OperationStatus;
use crate::core::ReleaseNumber;
use crate::core::ResourceStatus;
use crate::core::SuccessorDescription;
use crate::interfaces::AutomationExecutor;
use crate::interfaces::ForwardingConfigurator;
use crate::interfaces::ResolutionError;
use crate::interfaces::ResourceInventory;
use crate::interfaces::RoutingError;
use crate::interfaces::WriteError;
use crate::runtime::aggregator::aggregate_configuration;
use crate::runtime::aggregator::aggregate_deletion;
use crate::runtime::automation::bequeath_invocations;
use crate::runtime::automation::disregard_invocations;
use crate::runtime::automation::regard_invocations;
use crate::runtime::differ::diff_identity;
use crate::runtime::differ::diff_operation;
use crate::runtime::differ::diff_transport;
use crate::runtime::differ::read_identity;
use crate::runtime::differ::read_transport;
use crate::runtime::resolver::Resolution;
use crate::runtime::resolver::resolve_application;
use crate::runtime::resolver::resolve_new_release;
use crate::runtime::routing::reconfigure;
use crate::runtime::routing::routing_changes;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced to lifecycle callers.
///
/// Trigger-stage failures never appear here; they are recorded by the
/// automation executor after the caller's request has resolved.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The resolve stage failed.
    #[error("lifecycle resolve stage failed: {0}")]
    Resolution(#[from] ResolutionError),
    /// A diff-stage field write or a deletion failed.
    #[error("lifecycle configuration stage failed: {0}")]
    Write(#[from] WriteError),
    /// The routing stage failed.
    #[error("lifecycle routing stage failed: {0}")]
    Routing(#[from] RoutingError),
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Lifecycle orchestrator over the collaborator interfaces.
///
/// Holds no per-application locks; see the module overview for the
/// partial-failure and concurrency contract.
pub struct Orchestrator<I, F, A> {
    /// Resource inventory collaborator.
    inventory: I,
    /// Routing-construct configuration collaborator.
    routing: F,
    /// Automation execution collaborator.
    automation: A,
}

impl<I, F, A> Orchestrator<I, F, A>
where
    I: ResourceInventory,
    F: ForwardingConfigurator,
    A: AutomationExecutor,
{
    /// Creates a new orchestrator.
    #[must_use]
    pub fn new(inventory: I, routing: F, automation: A) -> Self {
        Self {
            inventory,
            routing,
            automation,
        }
    }

    /// Registers a peer application or reconciles an existing registration.
    ///
    /// Automation fires only when at least one resource was created or
    /// updated; a fully idempotent repeat performs no writes and fires
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when a stage before the trigger fails.
    pub async fn regard_application(
        &self,
        description: &EndpointDescription,
        operation_server: &OperationPath,
    ) -> Result<(), LifecycleError> {
        let resolution = resolve_application(&self.inventory, description).await?;
        let mut status = self.reconcile_registration(description, &resolution).await?;

        if status.has_operation_changes() {
            let changes = routing_changes(&status);
            let routing = reconfigure(&self.routing, operation_server, &changes).await?;
            status.routing = Some(routing);
        }

        if status.has_endpoint_changes() {
            let invocations = regard_invocations(
                &status,
                &description.application_name,
                &description.release_number,
            );
            self.automation.submit(invocations);
        }
        Ok(())
    }

    /// Deregisters a peer application.
    ///
    /// Automation always fires, even when nothing existed to delete; the
    /// recipes own no-op handling of already-absent state.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when a stage before the trigger fails.
    pub async fn disregard_application(
        &self,
        name: &ApplicationName,
        release: &ReleaseNumber,
        operation_server: &OperationPath,
    ) -> Result<(), LifecycleError> {
        let deleted = self.inventory.delete_application(name, release).await?;
        let mut status = aggregate_deletion(deleted);

        if status.has_operation_changes() {
            let changes = routing_changes(&status);
            let routing = reconfigure(&self.routing, operation_server, &changes).await?;
            status.routing = Some(routing);
        }

        self.automation.submit(disregard_invocations(&status, name, release));
        Ok(())
    }

    /// Hands the relay's registrations over to a successor release.
    ///
    /// Reconciles the well-known successor endpoint set against the supplied
    /// description. Automation fires only when the successor's identity or
    /// transport endpoint actually changed, and the secondary
    /// software-upgrade step is then submitted with the number of
    /// invocations just fired. A missing successor slot is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when a stage before the trigger fails.
    pub async fn bequeath_your_data_and_die(
        &self,
        successor: &SuccessorDescription,
    ) -> Result<(), LifecycleError> {
        let Some(endpoints) = resolve_new_release(&self.inventory).await? else {
            return Ok(());
        };

        let identity_snapshot = read_identity(&self.inventory, &endpoints.identity).await?;
        let identity = diff_identity(
            &self.inventory,
            &endpoints.identity,
            &identity_snapshot,
            &successor.application_name,
            &successor.release_number,
        )
        .await?;

        let transport_snapshot = read_transport(&self.inventory, &endpoints.transport).await?;
        let transport = diff_transport(
            &self.inventory,
            &endpoints.transport,
            &transport_snapshot,
            successor.remote_protocol,
            &successor.remote_address,
            successor.remote_port,
        )
        .await?;

        let status = aggregate_configuration(identity, transport, Vec::new());
        if status.has_connection_changes() {
            let invocations = bequeath_invocations(
                &status,
                &successor.application_name,
                &successor.release_number,
            );
            let fired = invocations.len();
            self.automation.submit(invocations);
            self.automation.submit_upgrade(fired);
        }
        Ok(())
    }

    /// Lists the registered applications as an ordered sequence.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when the inventory cannot be consulted.
    pub async fn list_applications(&self) -> Result<Vec<ApplicationSummary>, LifecycleError> {
        let mut summaries = self.inventory.list_applications().await?;
        summaries.sort();
        Ok(summaries)
    }

    /// Runs the diff and aggregate stages of a registration.
    ///
    /// A freshly created set yields created statuses without diffing; an
    /// existing set is diffed field-by-field, and operation endpoints the
    /// resolver created individually are reported as created.
    async fn reconcile_registration(
        &self,
        description: &EndpointDescription,
        resolution: &Resolution,
    ) -> Result<ConfigurationStatus, LifecycleError> {
        let endpoints = &resolution.endpoints;
        if resolution.created.application {
            let operations = endpoints
                .operations
                .iter()
                .filter_map(|(operation, endpoint)| {
                    description.operations.get(operation).map(|path| OperationStatus {
                        endpoint: endpoint.clone(),
                        operation: operation.clone(),
                        path: path.clone(),
                        disposition: Disposition::Created,
                    })
                })
                .collect();
            return Ok(aggregate_configuration(
                Some(ResourceStatus {
                    endpoint: endpoints.identity.clone(),
                    disposition: Disposition::Created,
                    writes: Vec::new(),
                }),
                Some(ResourceStatus {
                    endpoint: endpoints.transport.clone(),
                    disposition: Disposition::Created,
                    writes: Vec::new(),
                }),
                operations,
            ));
        }

        let identity_snapshot = read_identity(&self.inventory, &endpoints.identity).await?;
        let identity = diff_identity(
            &self.inventory,
            &endpoints.identity,
            &identity_snapshot,
            &description.application_name,
            &description.release_number,
        )
        .await?;

        let transport_snapshot = read_transport(&self.inventory, &endpoints.transport).await?;
        let transport = diff_transport(
            &self.inventory,
            &endpoints.transport,
            &transport_snapshot,
            description.remote_protocol,
            &description.remote_address,
            description.remote_port,
        )
        .await?;

        let mut operations = Vec::new();
        for (operation, path) in &description.operations {
            let Some(endpoint) = endpoints.operations.get(operation) else {
                continue;
            };
            if resolution.created.operations.contains(operation) {
                operations.push(OperationStatus {
                    endpoint: endpoint.clone(),
                    operation: operation.clone(),
                    path: path.clone(),
                    disposition: Disposition::Created,
                });
                continue;
            }
            let current = self.inventory.operation_path(endpoint).await?;
            if let Some(changed) =
                diff_operation(&self.inventory, endpoint, operation, &current, path).await?
            {
                operations.push(changed);
            }
        }
        Ok(aggregate_configuration(identity, transport, operations))
    }
}
