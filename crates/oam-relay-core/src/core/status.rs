// oam-relay-core/src/core/status.rs
// ============================================================================
// Module: OaM Relay Configuration Status
// Description: Request-scoped change-set records for lifecycle calls.
// Purpose: Report which resources actually changed, with absence meaning no change.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Every lifecycle call threads one [`ConfigurationStatus`] through its
//! stages. A resource appears in the status if and only if at least one
//! underlying write occurred; downstream stages use presence, not flags, to
//! decide relevance. Statuses are created at the start of a lifecycle call
//! and discarded once automation has been fired.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::EndpointId;
use crate::core::identifiers::OperationName;
use crate::core::identifiers::OperationPath;

// ============================================================================
// SECTION: Resource Status
// ============================================================================

/// How a resource changed during one lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    /// The resource was newly created.
    Created,
    /// At least one field of the resource was written.
    Updated,
    /// The resource was deleted.
    Deleted,
}

/// One field write performed on a resource, with old and new values for
/// auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldWrite {
    /// Field label.
    pub field: String,
    /// Value before the write, absent for creations.
    pub old: Option<Value>,
    /// Value after the write.
    pub new: Value,
}

/// Change record for one identity or transport endpoint.
///
/// A status exists only when a change happened: `Updated` statuses carry at
/// least one [`FieldWrite`]; `Created` and `Deleted` statuses may carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceStatus {
    /// Endpoint the status refers to.
    pub endpoint: EndpointId,
    /// How the endpoint changed.
    pub disposition: Disposition,
    /// Field writes performed on the endpoint.
    pub writes: Vec<FieldWrite>,
}

/// Change record for one operation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OperationStatus {
    /// Endpoint the status refers to.
    pub endpoint: EndpointId,
    /// Operation name the endpoint represents.
    pub operation: OperationName,
    /// Routing path of the operation after the call.
    pub path: OperationPath,
    /// How the endpoint changed.
    pub disposition: Disposition,
}

// ============================================================================
// SECTION: Routing Status
// ============================================================================

/// One routing entry touched by a reconfiguration batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoutingEntry {
    /// Operation name the entry dispatches.
    pub operation: OperationName,
    /// Operation endpoint the entry points at.
    pub endpoint: EndpointId,
}

/// Outcome of one routing reconfiguration batch, presence-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoutingStatus {
    /// Entries actually added or repointed.
    pub added: Vec<RoutingEntry>,
    /// Entries actually removed.
    pub removed: Vec<RoutingEntry>,
}

impl RoutingStatus {
    /// Returns true when the batch touched no routing entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

// ============================================================================
// SECTION: Aggregate Status
// ============================================================================

/// Aggregate change-set of one lifecycle call.
///
/// Every field reported here must be traceable to an actual resource
/// mutation; automation triggering uses this structure as the sole source of
/// truth for what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationStatus {
    /// Identity endpoint change, absent when unchanged.
    pub identity: Option<ResourceStatus>,
    /// Transport endpoint changes, empty when unchanged (zero or one entry).
    pub transport: Vec<ResourceStatus>,
    /// Operation endpoint changes, empty when unchanged.
    pub operations: Vec<OperationStatus>,
    /// Routing reconfiguration outcome, absent when routing was not touched.
    pub routing: Option<RoutingStatus>,
}

impl ConfigurationStatus {
    /// Returns a status reporting no changes.
    #[must_use]
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Returns true when any identity, transport, or operation endpoint
    /// changed.
    #[must_use]
    pub fn has_endpoint_changes(&self) -> bool {
        self.identity.is_some() || !self.transport.is_empty() || !self.operations.is_empty()
    }

    /// Returns true when any operation endpoint changed.
    #[must_use]
    pub fn has_operation_changes(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Returns true when the identity or transport endpoint changed.
    #[must_use]
    pub fn has_connection_changes(&self) -> bool {
        self.identity.is_some() || !self.transport.is_empty()
    }
}
