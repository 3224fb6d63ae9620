// oam-relay-core/src/runtime/aggregator.rs
// ============================================================================
// Module: OaM Relay Configuration Status Aggregator
// Description: Collects per-resource change records into one aggregate status.
// Purpose: Build the single change-set threaded through routing and automation.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The aggregator turns resolver and differ outputs into one
//! [`ConfigurationStatus`]. Unchanged resources are omitted entirely rather
//! than included with a cleared flag; downstream stages rely on presence to
//! decide relevance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ConfigurationStatus;
use crate::core::Disposition;
use crate::core::OperationStatus;
use crate::core::ResourceStatus;
use crate::interfaces::DeletedApplication;

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Builds the aggregate status of a registration or handover call.
///
/// Each argument is already presence-based: `None` or an empty vector means
/// the resource did not change.
#[must_use]
pub fn aggregate_configuration(
    identity: Option<ResourceStatus>,
    transport: Option<ResourceStatus>,
    operations: Vec<OperationStatus>,
) -> ConfigurationStatus {
    ConfigurationStatus {
        identity,
        transport: transport.into_iter().collect(),
        operations,
        routing: None,
    }
}

/// Builds the aggregate status of a deregistration call.
///
/// An absent application yields an empty status; deregistration of absent
/// state is not an error, and automation still runs against the empty
/// status.
#[must_use]
pub fn aggregate_deletion(deleted: Option<DeletedApplication>) -> ConfigurationStatus {
    let Some(deleted) = deleted else {
        return ConfigurationStatus::unchanged();
    };
    ConfigurationStatus {
        identity: Some(ResourceStatus {
            endpoint: deleted.identity,
            disposition: Disposition::Deleted,
            writes: Vec::new(),
        }),
        transport: vec![ResourceStatus {
            endpoint: deleted.transport,
            disposition: Disposition::Deleted,
            writes: Vec::new(),
        }],
        operations: deleted
            .operations
            .into_iter()
            .map(|operation| OperationStatus {
                endpoint: operation.endpoint,
                operation: operation.operation,
                path: operation.path,
                disposition: Disposition::Deleted,
            })
            .collect(),
        routing: None,
    }
}
