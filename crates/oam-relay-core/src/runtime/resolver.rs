// oam-relay-core/src/runtime/resolver.rs
// ============================================================================
// Module: OaM Relay Endpoint Resolver
// Description: Find-or-create resolution of application endpoint sets.
// Purpose: Return stable endpoint identifiers, creating resources only when absent.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The resolver locates the identity, transport, and operation endpoints
//! representing an application, creating them if and only if no matching
//! endpoint exists. Resolution is idempotent: a second call with identical
//! input returns the same identifiers and performs no additional creation.
//! Store failures surface as [`ResolutionError`]; they are never swallowed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ApplicationEndpoints;
use crate::core::EndpointDescription;
use crate::core::OperationName;
use crate::interfaces::ResolutionError;
use crate::interfaces::ResourceInventory;

// ============================================================================
// SECTION: Resolution Outcome
// ============================================================================

/// Resources the resolver had to create while resolving an application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedResources {
    /// True when the whole endpoint set was newly created.
    pub application: bool,
    /// Operation endpoints created individually on an existing set.
    pub operations: Vec<OperationName>,
}

impl CreatedResources {
    /// Returns true when resolution created nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.application && self.operations.is_empty()
    }
}

/// Outcome of resolving an application endpoint set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Complete endpoint set, including any endpoints created by this call.
    pub endpoints: ApplicationEndpoints,
    /// Resources created by this call.
    pub created: CreatedResources,
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the endpoint set for the application named in a description.
///
/// When no matching set exists, the full set is created from the description.
/// When a set exists, operation endpoints named in the description but
/// missing from the set are created individually; existing endpoints are
/// returned untouched (the differ decides about their fields).
///
/// # Errors
///
/// Returns [`ResolutionError`] when the inventory cannot be consulted or a
/// creation fails.
pub async fn resolve_application<I>(
    inventory: &I,
    description: &EndpointDescription,
) -> Result<Resolution, ResolutionError>
where
    I: ResourceInventory + ?Sized,
{
    let existing = inventory
        .find_application(&description.application_name, &description.release_number)
        .await?;
    let Some(mut endpoints) = existing else {
        let endpoints = inventory.create_application(description).await?;
        return Ok(Resolution {
            endpoints,
            created: CreatedResources {
                application: true,
                operations: Vec::new(),
            },
        });
    };

    let mut created_operations = Vec::new();
    for (operation, path) in &description.operations {
        if endpoints.operations.contains_key(operation) {
            continue;
        }
        let endpoint = inventory.create_operation(&endpoints.identity, operation, path).await?;
        endpoints.operations.insert(operation.clone(), endpoint);
        created_operations.push(operation.clone());
    }
    Ok(Resolution {
        endpoints,
        created: CreatedResources {
            application: false,
            operations: created_operations,
        },
    })
}

/// Resolves the well-known endpoint set reserved for the successor release.
///
/// Returns `None` when no successor slot exists; the handover flow treats
/// that as a no-op rather than an error.
///
/// # Errors
///
/// Returns [`ResolutionError`] when the inventory cannot be consulted.
pub async fn resolve_new_release<I>(
    inventory: &I,
) -> Result<Option<ApplicationEndpoints>, ResolutionError>
where
    I: ResourceInventory + ?Sized,
{
    inventory.new_release_endpoints().await
}
