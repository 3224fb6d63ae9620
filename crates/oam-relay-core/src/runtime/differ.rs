// oam-relay-core/src/runtime/differ.rs
// ============================================================================
// Module: OaM Relay Configuration Differ
// Description: Per-field compare-then-write against stored endpoint resources.
// Purpose: Write only fields whose desired value differs and report every write.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The differ reads the current value of each endpoint field, compares it to
//! the desired value with exact value equality, performs the write only when
//! the values differ, and reports the write. Fields are diffed independently,
//! so a single-field change never marks unrelated fields as written. A
//! resource with zero field writes yields no status at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::core::ApplicationName;
use crate::core::Disposition;
use crate::core::EndpointId;
use crate::core::FieldWrite;
use crate::core::OperationName;
use crate::core::OperationPath;
use crate::core::ReleaseNumber;
use crate::core::RemoteAddress;
use crate::core::RemoteProtocol;
use crate::core::ResourceStatus;
use crate::core::status::OperationStatus;
use crate::interfaces::ResolutionError;
use crate::interfaces::ResourceInventory;
use crate::interfaces::WriteError;

// ============================================================================
// SECTION: Snapshots
// ============================================================================

/// Current field values of an identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySnapshot {
    /// Stored application name.
    pub name: ApplicationName,
    /// Stored release number.
    pub release: ReleaseNumber,
}

/// Current field values of a transport endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSnapshot {
    /// Stored remote protocol.
    pub protocol: RemoteProtocol,
    /// Stored remote address.
    pub address: RemoteAddress,
    /// Stored remote port.
    pub port: u16,
}

/// Reads the current identity field values of an endpoint.
///
/// # Errors
///
/// Returns [`ResolutionError`] when the inventory cannot be consulted.
pub async fn read_identity<I>(
    inventory: &I,
    identity: &EndpointId,
) -> Result<IdentitySnapshot, ResolutionError>
where
    I: ResourceInventory + ?Sized,
{
    Ok(IdentitySnapshot {
        name: inventory.application_name(identity).await?,
        release: inventory.release_number(identity).await?,
    })
}

/// Reads the current transport field values of an endpoint.
///
/// # Errors
///
/// Returns [`ResolutionError`] when the inventory cannot be consulted.
pub async fn read_transport<I>(
    inventory: &I,
    transport: &EndpointId,
) -> Result<TransportSnapshot, ResolutionError>
where
    I: ResourceInventory + ?Sized,
{
    Ok(TransportSnapshot {
        protocol: inventory.remote_protocol(transport).await?,
        address: inventory.remote_address(transport).await?,
        port: inventory.remote_port(transport).await?,
    })
}

// ============================================================================
// SECTION: Field Diffing
// ============================================================================

/// Serializes a field value for the audit record, null on failure.
fn audit_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Records one field write with old and new audit values.
fn field_write<T: Serialize>(field: &str, old: &T, new: &T) -> FieldWrite {
    FieldWrite {
        field: field.to_string(),
        old: Some(audit_value(old)),
        new: audit_value(new),
    }
}

/// Diffs an identity endpoint against its desired name and release.
///
/// Returns a status only when at least one field was written.
///
/// # Errors
///
/// Returns [`WriteError`] when a field write fails.
pub async fn diff_identity<I>(
    inventory: &I,
    identity: &EndpointId,
    current: &IdentitySnapshot,
    name: &ApplicationName,
    release: &ReleaseNumber,
) -> Result<Option<ResourceStatus>, WriteError>
where
    I: ResourceInventory + ?Sized,
{
    let mut writes = Vec::new();
    if current.name != *name {
        inventory.set_application_name(identity, name).await?;
        writes.push(field_write("application-name", &current.name, name));
    }
    if current.release != *release {
        inventory.set_release_number(identity, release).await?;
        writes.push(field_write("release-number", &current.release, release));
    }
    if writes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ResourceStatus {
        endpoint: identity.clone(),
        disposition: Disposition::Updated,
        writes,
    }))
}

/// Diffs a transport endpoint against its desired protocol, address, and port.
///
/// The address comparison is structural, so representation differences never
/// produce a spurious write. Returns a status only when at least one field
/// was written.
///
/// # Errors
///
/// Returns [`WriteError`] when a field write fails.
pub async fn diff_transport<I>(
    inventory: &I,
    transport: &EndpointId,
    current: &TransportSnapshot,
    protocol: RemoteProtocol,
    address: &RemoteAddress,
    port: u16,
) -> Result<Option<ResourceStatus>, WriteError>
where
    I: ResourceInventory + ?Sized,
{
    let mut writes = Vec::new();
    if current.protocol != protocol {
        inventory.set_remote_protocol(transport, protocol).await?;
        writes.push(field_write("remote-protocol", &current.protocol, &protocol));
    }
    if current.address != *address {
        inventory.set_remote_address(transport, address).await?;
        writes.push(field_write("remote-address", &current.address, address));
    }
    if current.port != port {
        inventory.set_remote_port(transport, port).await?;
        writes.push(field_write("remote-port", &current.port, &port));
    }
    if writes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ResourceStatus {
        endpoint: transport.clone(),
        disposition: Disposition::Updated,
        writes,
    }))
}

/// Diffs an operation endpoint against its desired routing path.
///
/// Returns a status only when the path was repointed.
///
/// # Errors
///
/// Returns [`WriteError`] when the path write fails.
pub async fn diff_operation<I>(
    inventory: &I,
    endpoint: &EndpointId,
    operation: &OperationName,
    current: &OperationPath,
    desired: &OperationPath,
) -> Result<Option<OperationStatus>, WriteError>
where
    I: ResourceInventory + ?Sized,
{
    if current == desired {
        return Ok(None);
    }
    inventory.set_operation_path(endpoint, desired).await?;
    Ok(Some(OperationStatus {
        endpoint: endpoint.clone(),
        operation: operation.clone(),
        path: desired.clone(),
        disposition: Disposition::Updated,
    }))
}
