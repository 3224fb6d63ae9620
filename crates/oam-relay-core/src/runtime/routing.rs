// oam-relay-core/src/runtime/routing.rs
// ============================================================================
// Module: OaM Relay Routing Reconfigurer
// Description: Minimal routing-change batches derived from configuration status.
// Purpose: Touch the routing layer only for operation endpoints that changed.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The reconfigurer translates an aggregate configuration status into a batch
//! of routing change requests: one add/repoint per created or updated
//! operation endpoint, one removal per deleted operation endpoint. Identity-
//! or transport-only changes yield no batch, and callers must skip the apply
//! entirely in that case so the routing layer never sees a no-op call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ConfigurationStatus;
use crate::core::Disposition;
use crate::core::OperationPath;
use crate::core::RoutingStatus;
use crate::interfaces::ForwardingConfigurator;
use crate::interfaces::RoutingAction;
use crate::interfaces::RoutingChange;
use crate::interfaces::RoutingError;

// ============================================================================
// SECTION: Batch Construction
// ============================================================================

/// Builds the routing-change batch for a configuration status.
///
/// Created and updated operation endpoints become adds; deleted operation
/// endpoints become removals. An empty result means routing must not be
/// invoked.
#[must_use]
pub fn routing_changes(status: &ConfigurationStatus) -> Vec<RoutingChange> {
    status
        .operations
        .iter()
        .map(|operation| RoutingChange {
            operation: operation.operation.clone(),
            endpoint: operation.endpoint.clone(),
            path: operation.path.clone(),
            action: match operation.disposition {
                Disposition::Created | Disposition::Updated => RoutingAction::Add,
                Disposition::Deleted => RoutingAction::Remove,
            },
        })
        .collect()
}

// ============================================================================
// SECTION: Batch Apply
// ============================================================================

/// Applies one routing-change batch and returns the presence-based outcome.
///
/// # Errors
///
/// Returns [`RoutingError`] when the routing layer fails the batch.
pub async fn reconfigure<F>(
    configurator: &F,
    operation_server: &OperationPath,
    changes: &[RoutingChange],
) -> Result<RoutingStatus, RoutingError>
where
    F: ForwardingConfigurator + ?Sized,
{
    configurator.configure(operation_server, changes).await
}
