// oam-relay-core/src/runtime/inventory.rs
// ============================================================================
// Module: OaM Relay In-Memory Inventory
// Description: Simple in-memory resource inventory for tests and local use.
// Purpose: Provide a deterministic inventory implementation without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of
//! [`ResourceInventory`] for tests and local deployments. Every mutation is
//! counted so tests can assert that idempotent calls perform zero writes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;

use crate::core::ApplicationEndpoints;
use crate::core::ApplicationName;
use crate::core::ApplicationSummary;
use crate::core::EndpointDescription;
use crate::core::EndpointId;
use crate::core::OperationName;
use crate::core::OperationPath;
use crate::core::ReleaseNumber;
use crate::core::RemoteAddress;
use crate::core::RemoteProtocol;
use crate::core::SuccessorDescription;
use crate::interfaces::DeletedApplication;
use crate::interfaces::DeletedOperation;
use crate::interfaces::ResolutionError;
use crate::interfaces::ResourceInventory;
use crate::interfaces::WriteError;

// ============================================================================
// SECTION: Stored State
// ============================================================================

/// One operation endpoint held by a stored application.
#[derive(Debug, Clone)]
struct StoredOperation {
    /// Endpoint identifier.
    endpoint: EndpointId,
    /// Routing path of the operation.
    path: OperationPath,
}

/// One application endpoint set held by the inventory.
#[derive(Debug, Clone)]
struct StoredApplication {
    /// Identity endpoint identifier.
    identity: EndpointId,
    /// Transport endpoint identifier.
    transport: EndpointId,
    /// Stored application name.
    name: ApplicationName,
    /// Stored release number.
    release: ReleaseNumber,
    /// Stored remote protocol.
    protocol: RemoteProtocol,
    /// Stored remote address.
    address: RemoteAddress,
    /// Stored remote port.
    port: u16,
    /// Stored operation endpoints keyed by operation name.
    operations: BTreeMap<OperationName, StoredOperation>,
}

impl StoredApplication {
    /// Builds the resolved endpoint identifiers of this application.
    fn endpoints(&self) -> ApplicationEndpoints {
        ApplicationEndpoints {
            identity: self.identity.clone(),
            transport: self.transport.clone(),
            operations: self
                .operations
                .iter()
                .map(|(operation, stored)| (operation.clone(), stored.endpoint.clone()))
                .collect(),
        }
    }
}

/// Mutable inventory state behind the mutex.
#[derive(Debug, Default)]
struct InventoryState {
    /// Registered application endpoint sets.
    applications: Vec<StoredApplication>,
    /// Well-known endpoint set reserved for the successor release.
    new_release: Option<StoredApplication>,
    /// Next endpoint identifier suffix.
    next_id: u64,
    /// Number of mutations performed.
    writes: u64,
}

impl InventoryState {
    /// Allocates a fresh endpoint identifier.
    fn allocate(&mut self) -> EndpointId {
        self.next_id += 1;
        EndpointId::new(format!("endpoint-{}", self.next_id))
    }

    /// Builds a stored application from a description.
    fn store_description(&mut self, description: &EndpointDescription) -> StoredApplication {
        let identity = self.allocate();
        let transport = self.allocate();
        let operations = description
            .operations
            .iter()
            .map(|(operation, path)| {
                (
                    operation.clone(),
                    StoredOperation {
                        endpoint: self.allocate(),
                        path: path.clone(),
                    },
                )
            })
            .collect();
        StoredApplication {
            identity,
            transport,
            name: description.application_name.clone(),
            release: description.release_number.clone(),
            protocol: description.remote_protocol,
            address: description.remote_address.clone(),
            port: description.remote_port,
            operations,
        }
    }

    /// Iterates all stored applications including the successor slot.
    fn all(&self) -> impl Iterator<Item = &StoredApplication> {
        self.applications.iter().chain(self.new_release.as_ref())
    }

    /// Iterates all stored applications mutably including the successor slot.
    fn all_mut(&mut self) -> impl Iterator<Item = &mut StoredApplication> {
        self.applications.iter_mut().chain(self.new_release.as_mut())
    }
}

// ============================================================================
// SECTION: In-Memory Inventory
// ============================================================================

/// In-memory resource inventory for tests and local deployments.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResourceInventory {
    /// Inventory state protected by a mutex.
    inner: Arc<Mutex<InventoryState>>,
}

impl InMemoryResourceInventory {
    /// Creates an empty in-memory inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory whose successor slot is seeded from a
    /// description.
    #[must_use]
    pub fn with_successor(successor: &SuccessorDescription) -> Self {
        let inventory = Self::new();
        if let Ok(mut state) = inventory.inner.lock() {
            let identity = state.allocate();
            let transport = state.allocate();
            state.new_release = Some(StoredApplication {
                identity,
                transport,
                name: successor.application_name.clone(),
                release: successor.release_number.clone(),
                protocol: successor.remote_protocol,
                address: successor.remote_address.clone(),
                port: successor.remote_port,
                operations: BTreeMap::new(),
            });
        }
        inventory
    }

    /// Returns the number of mutations performed so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.lock().map(|state| state.writes).unwrap_or(0)
    }

    /// Locks the state for a read, mapping poisoning to a resolution error.
    fn read(&self) -> Result<MutexGuard<'_, InventoryState>, ResolutionError> {
        self.inner
            .lock()
            .map_err(|_| ResolutionError::Unavailable("inventory mutex poisoned".to_string()))
    }

    /// Locks the state for a write, mapping poisoning to a write error.
    fn write(&self) -> Result<MutexGuard<'_, InventoryState>, WriteError> {
        self.inner
            .lock()
            .map_err(|_| WriteError::WriteFailed("inventory mutex poisoned".to_string()))
    }
}

/// Applies one identity-endpoint write through a field closure.
fn write_identity_field(
    state: &mut InventoryState,
    identity: &EndpointId,
    apply: impl FnOnce(&mut StoredApplication),
) -> Result<(), WriteError> {
    let Some(stored) = state.all_mut().find(|stored| stored.identity == *identity) else {
        return Err(WriteError::MissingEndpoint(identity.to_string()));
    };
    apply(stored);
    state.writes += 1;
    Ok(())
}

/// Applies one transport-endpoint write through a field closure.
fn write_transport_field(
    state: &mut InventoryState,
    transport: &EndpointId,
    apply: impl FnOnce(&mut StoredApplication),
) -> Result<(), WriteError> {
    let Some(stored) = state.all_mut().find(|stored| stored.transport == *transport) else {
        return Err(WriteError::MissingEndpoint(transport.to_string()));
    };
    apply(stored);
    state.writes += 1;
    Ok(())
}

#[async_trait]
impl ResourceInventory for InMemoryResourceInventory {
    async fn find_application(
        &self,
        name: &ApplicationName,
        release: &ReleaseNumber,
    ) -> Result<Option<ApplicationEndpoints>, ResolutionError> {
        let state = self.read()?;
        Ok(state
            .applications
            .iter()
            .find(|stored| stored.name == *name && stored.release == *release)
            .map(StoredApplication::endpoints))
    }

    async fn new_release_endpoints(
        &self,
    ) -> Result<Option<ApplicationEndpoints>, ResolutionError> {
        let state = self.read()?;
        Ok(state.new_release.as_ref().map(StoredApplication::endpoints))
    }

    async fn create_application(
        &self,
        description: &EndpointDescription,
    ) -> Result<ApplicationEndpoints, ResolutionError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| ResolutionError::Unavailable("inventory mutex poisoned".to_string()))?;
        let stored = state.store_description(description);
        let endpoints = stored.endpoints();
        state.applications.push(stored);
        state.writes += 1;
        Ok(endpoints)
    }

    async fn create_operation(
        &self,
        identity: &EndpointId,
        operation: &OperationName,
        path: &OperationPath,
    ) -> Result<EndpointId, ResolutionError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| ResolutionError::Unavailable("inventory mutex poisoned".to_string()))?;
        let endpoint = state.allocate();
        let Some(stored) = state.all_mut().find(|stored| stored.identity == *identity) else {
            return Err(ResolutionError::MissingEndpoint(identity.to_string()));
        };
        stored.operations.insert(
            operation.clone(),
            StoredOperation {
                endpoint: endpoint.clone(),
                path: path.clone(),
            },
        );
        state.writes += 1;
        Ok(endpoint)
    }

    async fn application_name(
        &self,
        identity: &EndpointId,
    ) -> Result<ApplicationName, ResolutionError> {
        let state = self.read()?;
        state
            .all()
            .find(|stored| stored.identity == *identity)
            .map(|stored| stored.name.clone())
            .ok_or_else(|| ResolutionError::MissingEndpoint(identity.to_string()))
    }

    async fn release_number(
        &self,
        identity: &EndpointId,
    ) -> Result<ReleaseNumber, ResolutionError> {
        let state = self.read()?;
        state
            .all()
            .find(|stored| stored.identity == *identity)
            .map(|stored| stored.release.clone())
            .ok_or_else(|| ResolutionError::MissingEndpoint(identity.to_string()))
    }

    async fn remote_protocol(
        &self,
        transport: &EndpointId,
    ) -> Result<RemoteProtocol, ResolutionError> {
        let state = self.read()?;
        state
            .all()
            .find(|stored| stored.transport == *transport)
            .map(|stored| stored.protocol)
            .ok_or_else(|| ResolutionError::MissingEndpoint(transport.to_string()))
    }

    async fn remote_address(
        &self,
        transport: &EndpointId,
    ) -> Result<RemoteAddress, ResolutionError> {
        let state = self.read()?;
        state
            .all()
            .find(|stored| stored.transport == *transport)
            .map(|stored| stored.address.clone())
            .ok_or_else(|| ResolutionError::MissingEndpoint(transport.to_string()))
    }

    async fn remote_port(&self, transport: &EndpointId) -> Result<u16, ResolutionError> {
        let state = self.read()?;
        state
            .all()
            .find(|stored| stored.transport == *transport)
            .map(|stored| stored.port)
            .ok_or_else(|| ResolutionError::MissingEndpoint(transport.to_string()))
    }

    async fn operation_path(
        &self,
        operation: &EndpointId,
    ) -> Result<OperationPath, ResolutionError> {
        let state = self.read()?;
        state
            .all()
            .flat_map(|stored| stored.operations.values())
            .find(|stored| stored.endpoint == *operation)
            .map(|stored| stored.path.clone())
            .ok_or_else(|| ResolutionError::MissingEndpoint(operation.to_string()))
    }

    async fn set_application_name(
        &self,
        identity: &EndpointId,
        value: &ApplicationName,
    ) -> Result<(), WriteError> {
        let mut state = self.write()?;
        write_identity_field(&mut state, identity, |stored| stored.name = value.clone())
    }

    async fn set_release_number(
        &self,
        identity: &EndpointId,
        value: &ReleaseNumber,
    ) -> Result<(), WriteError> {
        let mut state = self.write()?;
        write_identity_field(&mut state, identity, |stored| stored.release = value.clone())
    }

    async fn set_remote_protocol(
        &self,
        transport: &EndpointId,
        value: RemoteProtocol,
    ) -> Result<(), WriteError> {
        let mut state = self.write()?;
        write_transport_field(&mut state, transport, |stored| stored.protocol = value)
    }

    async fn set_remote_address(
        &self,
        transport: &EndpointId,
        value: &RemoteAddress,
    ) -> Result<(), WriteError> {
        let mut state = self.write()?;
        write_transport_field(&mut state, transport, |stored| stored.address = value.clone())
    }

    async fn set_remote_port(
        &self,
        transport: &EndpointId,
        value: u16,
    ) -> Result<(), WriteError> {
        let mut state = self.write()?;
        write_transport_field(&mut state, transport, |stored| stored.port = value)
    }

    async fn set_operation_path(
        &self,
        operation: &EndpointId,
        value: &OperationPath,
    ) -> Result<(), WriteError> {
        let mut state = self.write()?;
        let Some(stored) = state
            .all_mut()
            .flat_map(|stored| stored.operations.values_mut())
            .find(|stored| stored.endpoint == *operation)
        else {
            return Err(WriteError::MissingEndpoint(operation.to_string()));
        };
        stored.path = value.clone();
        state.writes += 1;
        Ok(())
    }

    async fn delete_application(
        &self,
        name: &ApplicationName,
        release: &ReleaseNumber,
    ) -> Result<Option<DeletedApplication>, WriteError> {
        let mut state = self.write()?;
        let Some(index) = state
            .applications
            .iter()
            .position(|stored| stored.name == *name && stored.release == *release)
        else {
            return Ok(None);
        };
        let stored = state.applications.remove(index);
        state.writes += 1;
        Ok(Some(DeletedApplication {
            identity: stored.identity,
            transport: stored.transport,
            operations: stored
                .operations
                .into_iter()
                .map(|(operation, held)| DeletedOperation {
                    endpoint: held.endpoint,
                    operation,
                    path: held.path,
                })
                .collect(),
        }))
    }

    async fn list_applications(&self) -> Result<Vec<ApplicationSummary>, ResolutionError> {
        let state = self.read()?;
        Ok(state
            .applications
            .iter()
            .map(|stored| ApplicationSummary {
                application_name: stored.name.clone(),
                release_number: stored.release.clone(),
            })
            .collect())
    }
}
