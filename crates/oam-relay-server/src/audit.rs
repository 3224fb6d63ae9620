// oam-relay-server/src/audit.rs
// ============================================================================
// Module: Relay Audit Logging
// Description: Structured audit events for lifecycle and automation handling.
// Purpose: Emit JSON-line audit logs without hard logging-framework deps.
// Dependencies: oam-relay-core, serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for relay request
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign. Automation failures
//! only ever surface here; they are never propagated to lifecycle callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use oam_relay_core::RecipeName;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Lifecycle call audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Lifecycle operation label.
    pub operation: &'static str,
    /// Application name when the request carried one.
    pub application: Option<String>,
    /// Release number when the request carried one.
    pub release: Option<String>,
    /// Call outcome label.
    pub outcome: &'static str,
    /// Error message for rejected calls.
    pub error: Option<String>,
}

impl LifecycleAuditEvent {
    /// Creates a new lifecycle audit event with a consistent timestamp.
    #[must_use]
    pub fn new(
        operation: &'static str,
        application: Option<String>,
        release: Option<String>,
        outcome: &'static str,
        error: Option<String>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "lifecycle_call",
            timestamp_ms,
            operation,
            application,
            release,
            outcome,
            error,
        }
    }
}

/// Automation task audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AutomationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Recipe the event refers to, absent for upgrade tasks.
    pub recipe: Option<RecipeName>,
    /// Task outcome label.
    pub outcome: &'static str,
    /// Failure detail when delivery failed or the task was dropped.
    pub detail: Option<String>,
}

impl AutomationAuditEvent {
    /// Creates a new automation audit event with a consistent timestamp.
    #[must_use]
    pub fn new(recipe: Option<RecipeName>, outcome: &'static str, detail: Option<String>) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "automation_task",
            timestamp_ms,
            recipe,
            outcome,
            detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for relay events.
pub trait AuditSink: Send + Sync {
    /// Records a lifecycle call event.
    fn record_lifecycle(&self, event: &LifecycleAuditEvent);

    /// Records an automation task event.
    fn record_automation(&self, event: &AutomationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_lifecycle(&self, event: &LifecycleAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_automation(&self, event: &AutomationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record_lifecycle(&self, event: &LifecycleAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }

    fn record_automation(&self, event: &AutomationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_lifecycle(&self, _event: &LifecycleAuditEvent) {}

    fn record_automation(&self, _event: &AutomationAuditEvent) {}
}
