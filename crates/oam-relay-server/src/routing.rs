// oam-relay-server/src/routing.rs
// ============================================================================
// Module: In-Process Routing Table
// Description: Operation-to-endpoint dispatch map behind the configurator trait.
// Purpose: Apply routing change batches atomically and report real changes.
// Dependencies: oam-relay-core
// ============================================================================

//! ## Overview
//! The routing table is the relay's request-dispatch layer: it maps operation
//! names to the operation endpoint and path requests are forwarded to. A
//! change batch is applied under one lock, and the returned status lists only
//! entries that actually changed; re-adding an identical route or removing an
//! absent one reports nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use oam_relay_core::EndpointId;
use oam_relay_core::ForwardingConfigurator;
use oam_relay_core::OperationName;
use oam_relay_core::OperationPath;
use oam_relay_core::RoutingAction;
use oam_relay_core::RoutingChange;
use oam_relay_core::RoutingEntry;
use oam_relay_core::RoutingError;
use oam_relay_core::RoutingStatus;

// ============================================================================
// SECTION: Route Target
// ============================================================================

/// Dispatch target of one routed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    /// Operation endpoint the route points at.
    pub endpoint: EndpointId,
    /// Routing path of the operation.
    pub path: OperationPath,
}

// ============================================================================
// SECTION: Routing Table
// ============================================================================

/// In-process routing table implementing [`ForwardingConfigurator`].
#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    /// Route map protected by a mutex.
    routes: Arc<Mutex<BTreeMap<OperationName, RouteTarget>>>,
}

impl RoutingTable {
    /// Creates an empty routing table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dispatch target of an operation, if routed.
    #[must_use]
    pub fn route(&self, operation: &OperationName) -> Option<RouteTarget> {
        self.routes.lock().ok().and_then(|routes| routes.get(operation).cloned())
    }

    /// Returns the number of routed operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.lock().map(|routes| routes.len()).unwrap_or(0)
    }

    /// Returns true when no operation is routed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ForwardingConfigurator for RoutingTable {
    async fn configure(
        &self,
        _operation_server: &OperationPath,
        changes: &[RoutingChange],
    ) -> Result<RoutingStatus, RoutingError> {
        let mut routes = self
            .routes
            .lock()
            .map_err(|_| RoutingError::Apply("routing table mutex poisoned".to_string()))?;
        let mut status = RoutingStatus::default();
        for change in changes {
            let entry = RoutingEntry {
                operation: change.operation.clone(),
                endpoint: change.endpoint.clone(),
            };
            match change.action {
                RoutingAction::Add => {
                    let target = RouteTarget {
                        endpoint: change.endpoint.clone(),
                        path: change.path.clone(),
                    };
                    let previous = routes.insert(change.operation.clone(), target.clone());
                    if previous.as_ref() != Some(&target) {
                        status.added.push(entry);
                    }
                }
                RoutingAction::Remove => {
                    if routes.remove(&change.operation).is_some() {
                        status.removed.push(entry);
                    }
                }
            }
        }
        Ok(status)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for batch apply and presence-based status reporting.
    #![allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        clippy::dbg_macro,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only output and panic-based assertions are permitted."
    )]

    use super::*;

    fn add(operation: &str, endpoint: &str, path: &str) -> RoutingChange {
        RoutingChange {
            operation: OperationName::new(operation),
            endpoint: EndpointId::new(endpoint),
            path: OperationPath::new(path),
            action: RoutingAction::Add,
        }
    }

    fn remove(operation: &str, endpoint: &str, path: &str) -> RoutingChange {
        RoutingChange {
            operation: OperationName::new(operation),
            endpoint: EndpointId::new(endpoint),
            path: OperationPath::new(path),
            action: RoutingAction::Remove,
        }
    }

    #[tokio::test]
    async fn batch_adds_and_reports_new_routes() {
        let table = RoutingTable::new();
        let server = OperationPath::new("/v1/regard-application");
        let status = table
            .configure(&server, &[add("redirect", "endpoint-3", "/v1/redirect")])
            .await
            .unwrap();

        assert_eq!(status.added.len(), 1);
        assert!(status.removed.is_empty());
        assert_eq!(table.len(), 1);
        let target = table.route(&OperationName::new("redirect")).unwrap();
        assert_eq!(target.path.as_str(), "/v1/redirect");
    }

    #[tokio::test]
    async fn identical_re_add_reports_nothing() {
        let table = RoutingTable::new();
        let server = OperationPath::new("/v1/regard-application");
        let change = add("redirect", "endpoint-3", "/v1/redirect");

        table.configure(&server, std::slice::from_ref(&change)).await.unwrap();
        let status = table.configure(&server, std::slice::from_ref(&change)).await.unwrap();

        assert!(status.added.is_empty());
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn removal_of_absent_route_reports_nothing() {
        let table = RoutingTable::new();
        let server = OperationPath::new("/v1/disregard-application");
        let status = table
            .configure(&server, &[remove("redirect", "endpoint-3", "/v1/redirect")])
            .await
            .unwrap();

        assert!(status.removed.is_empty());
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn repoint_reports_one_added_entry() {
        let table = RoutingTable::new();
        let server = OperationPath::new("/v1/regard-application");
        table
            .configure(&server, &[add("redirect", "endpoint-3", "/v1/redirect")])
            .await
            .unwrap();
        let status = table
            .configure(&server, &[add("redirect", "endpoint-9", "/v1/redirect")])
            .await
            .unwrap();

        assert_eq!(status.added.len(), 1);
        let target = table.route(&OperationName::new("redirect")).unwrap();
        assert_eq!(target.endpoint.as_str(), "endpoint-9");
    }
}
