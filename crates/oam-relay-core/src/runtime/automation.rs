// oam-relay-core/src/runtime/automation.rs
// ============================================================================
// Module: OaM Relay Automation Planner
// Description: Builds automation invocation lists from aggregate status.
// Purpose: Fire downstream automation exactly once per real change.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! The planner derives automation invocations from the combined configuration
//! and routing status. Registration fires only when something changed;
//! deregistration always fires, even against an empty deletion status,
//! because the recipes own no-op handling of already-absent state; handover
//! fires only when the successor's identity or transport endpoint changed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;

use crate::core::ApplicationName;
use crate::core::ConfigurationStatus;
use crate::core::RecipeName;
use crate::core::ReleaseNumber;
use crate::interfaces::AutomationInvocation;

// ============================================================================
// SECTION: Recipes
// ============================================================================

/// Recipe announcing a new or updated registration to subscribed peers.
pub const SUBSCRIPTION_BROADCAST: &str = "subscription-broadcast";
/// Recipe announcing a deregistration to subscribed peers.
pub const DISPOSAL_BROADCAST: &str = "disposal-broadcast";
/// Recipe announcing the successor release during a handover.
pub const HANDOVER_NOTIFICATION: &str = "handover-notification";

// ============================================================================
// SECTION: Invocation Builders
// ============================================================================

/// Builds the scoping payload common to all recipes.
fn scope_payload(
    status: &ConfigurationStatus,
    name: &ApplicationName,
    release: &ReleaseNumber,
) -> serde_json::Value {
    json!({
        "application-name": name,
        "release-number": release,
        "configuration-status": status,
    })
}

/// Builds the invocations fired after a registration that changed something.
///
/// The caller must only invoke this when the status reports at least one
/// endpoint change.
#[must_use]
pub fn regard_invocations(
    status: &ConfigurationStatus,
    name: &ApplicationName,
    release: &ReleaseNumber,
) -> Vec<AutomationInvocation> {
    vec![AutomationInvocation {
        recipe: RecipeName::new(SUBSCRIPTION_BROADCAST),
        payload: scope_payload(status, name, release),
    }]
}

/// Builds the invocations fired after a deregistration.
///
/// Always yields at least one invocation; the recipe handles already-absent
/// state itself.
#[must_use]
pub fn disregard_invocations(
    status: &ConfigurationStatus,
    name: &ApplicationName,
    release: &ReleaseNumber,
) -> Vec<AutomationInvocation> {
    vec![AutomationInvocation {
        recipe: RecipeName::new(DISPOSAL_BROADCAST),
        payload: scope_payload(status, name, release),
    }]
}

/// Builds the invocations fired after a handover that changed the successor.
///
/// The caller must only invoke this when the successor's identity or
/// transport endpoint changed.
#[must_use]
pub fn bequeath_invocations(
    status: &ConfigurationStatus,
    name: &ApplicationName,
    release: &ReleaseNumber,
) -> Vec<AutomationInvocation> {
    vec![AutomationInvocation {
        recipe: RecipeName::new(HANDOVER_NOTIFICATION),
        payload: scope_payload(status, name, release),
    }]
}
