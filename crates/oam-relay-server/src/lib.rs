// oam-relay-server/src/lib.rs
// ============================================================================
// Module: OaM Relay Server
// Description: HTTP surface, routing table, automation worker, and audit sinks.
// Purpose: Wire the orchestrator and record engine into a running relay.
// Dependencies: oam-relay-core, oam-relay-records, oam-relay-config, axum, tokio
// ============================================================================

//! ## Overview
//! The server crate hosts the relay's HTTP API and the in-process pieces the
//! core treats as collaborators: the routing table behind the forwarding
//! configurator interface and the queued automation worker behind the
//! automation executor interface. All request handling is a thin wrapper
//! over [`oam_relay_core::Orchestrator`] and
//! [`oam_relay_records::RecordQueryEngine`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod automation;
pub mod routing;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::AutomationAuditEvent;
pub use audit::FileAuditSink;
pub use audit::LifecycleAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use automation::AutomationGateway;
pub use automation::AutomationWorker;
pub use automation::GatewayError;
pub use automation::HttpAutomationGateway;
pub use automation::NullAutomationGateway;
pub use automation::QueuedAutomationExecutor;
pub use automation::automation_channel;
pub use routing::RouteTarget;
pub use routing::RoutingTable;
pub use server::OamRelayServer;
pub use server::ServerError;
