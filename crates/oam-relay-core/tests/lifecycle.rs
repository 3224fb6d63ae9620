// crates/oam-relay-core/tests/lifecycle.rs
// ============================================================================
// Module: Lifecycle Orchestration Tests
// Description: Tests for idempotence, field isolation, and trigger rules.
// ============================================================================
//! ## Overview
//! Validates that repeated registrations perform no writes, that unrelated
//! fields never appear in the change-set, that routing is skipped without
//! operation changes, and that deregistration always fires automation.

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

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use oam_relay_core::ApplicationName;
use oam_relay_core::AutomationExecutor;
use oam_relay_core::AutomationInvocation;
use oam_relay_core::EndpointDescription;
use oam_relay_core::ForwardingConfigurator;
use oam_relay_core::InMemoryResourceInventory;
use oam_relay_core::OperationName;
use oam_relay_core::OperationPath;
use oam_relay_core::Orchestrator;
use oam_relay_core::ReleaseNumber;
use oam_relay_core::RemoteAddress;
use oam_relay_core::RemoteProtocol;
use oam_relay_core::RoutingAction;
use oam_relay_core::RoutingChange;
use oam_relay_core::RoutingEntry;
use oam_relay_core::RoutingError;
use oam_relay_core::RoutingStatus;
use oam_relay_core::SuccessorDescription;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

#[derive(Default, Clone)]
struct RecordingConfigurator {
    batches: Arc<Mutex<Vec<Vec<RoutingChange>>>>,
}

impl RecordingConfigurator {
    fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    fn last_batch(&self) -> Vec<RoutingChange> {
        self.batches.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ForwardingConfigurator for RecordingConfigurator {
    async fn configure(
        &self,
        _operation_server: &OperationPath,
        changes: &[RoutingChange],
    ) -> Result<RoutingStatus, RoutingError> {
        self.batches.lock().unwrap().push(changes.to_vec());
        let mut status = RoutingStatus::default();
        for change in changes {
            let entry = RoutingEntry {
                operation: change.operation.clone(),
                endpoint: change.endpoint.clone(),
            };
            match change.action {
                RoutingAction::Add => status.added.push(entry),
                RoutingAction::Remove => status.removed.push(entry),
            }
        }
        Ok(status)
    }
}

#[derive(Default, Clone)]
struct RecordingAutomation {
    batches: Arc<Mutex<Vec<Vec<AutomationInvocation>>>>,
    upgrades: Arc<Mutex<Vec<usize>>>,
}

impl RecordingAutomation {
    fn fired(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    fn last_payload(&self) -> serde_json::Value {
        let batches = self.batches.lock().unwrap();
        batches.last().unwrap().first().unwrap().payload.clone()
    }

    fn upgrades(&self) -> Vec<usize> {
        self.upgrades.lock().unwrap().clone()
    }
}

impl AutomationExecutor for RecordingAutomation {
    fn submit(&self, invocations: Vec<AutomationInvocation>) {
        self.batches.lock().unwrap().push(invocations);
    }

    fn submit_upgrade(&self, fired: usize) {
        self.upgrades.lock().unwrap().push(fired);
    }
}

type TestOrchestrator =
    Orchestrator<InMemoryResourceInventory, RecordingConfigurator, RecordingAutomation>;

fn harness(
    inventory: InMemoryResourceInventory,
) -> (TestOrchestrator, RecordingConfigurator, RecordingAutomation) {
    let routing = RecordingConfigurator::default();
    let automation = RecordingAutomation::default();
    (Orchestrator::new(inventory, routing.clone(), automation.clone()), routing, automation)
}

fn description(port: u16, release: &str) -> EndpointDescription {
    let mut operations = BTreeMap::new();
    operations.insert(
        OperationName::new("redirect-oam-request-information"),
        OperationPath::new("/v1/redirect-oam-request-information"),
    );
    EndpointDescription {
        application_name: ApplicationName::new("OamLog"),
        release_number: ReleaseNumber::new(release),
        remote_protocol: RemoteProtocol::Http,
        remote_address: RemoteAddress::IpAddress("10.0.0.7".parse::<IpAddr>().unwrap()),
        remote_port: port,
        operations,
    }
}

fn operation_server() -> OperationPath {
    OperationPath::new("/v1/regard-application")
}

// ============================================================================
// SECTION: Registration Tests
// ============================================================================

#[tokio::test]
async fn regard_creates_endpoints_routes_and_fires() {
    let inventory = InMemoryResourceInventory::new();
    let (orchestrator, routing, automation) = harness(inventory.clone());

    orchestrator.regard_application(&description(8080, "1.0.0"), &operation_server()).await.unwrap();

    let listed = orchestrator.list_applications().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].application_name.as_str(), "OamLog");

    assert_eq!(routing.batch_count(), 1);
    let batch = routing.last_batch();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].action, RoutingAction::Add);
    assert_eq!(batch[0].operation.as_str(), "redirect-oam-request-information");

    assert_eq!(automation.fired(), 1);
    let payload = automation.last_payload();
    assert_eq!(payload["application-name"], "OamLog");
    assert!(payload["configuration-status"]["identity"].is_object());
}

#[tokio::test]
async fn regard_twice_performs_no_writes_and_fires_nothing() {
    let inventory = InMemoryResourceInventory::new();
    let (orchestrator, routing, automation) = harness(inventory.clone());

    orchestrator.regard_application(&description(8080, "1.0.0"), &operation_server()).await.unwrap();
    let writes_after_first = inventory.write_count();
    let fired_after_first = automation.fired();

    orchestrator.regard_application(&description(8080, "1.0.0"), &operation_server()).await.unwrap();

    assert_eq!(inventory.write_count(), writes_after_first);
    assert_eq!(automation.fired(), fired_after_first);
    assert_eq!(routing.batch_count(), 1);
}

#[tokio::test]
async fn port_only_change_updates_only_transport_port() {
    let inventory = InMemoryResourceInventory::new();
    let (orchestrator, routing, automation) = harness(inventory.clone());

    orchestrator.regard_application(&description(8080, "1.0.0"), &operation_server()).await.unwrap();
    orchestrator.regard_application(&description(9090, "1.0.0"), &operation_server()).await.unwrap();

    // Routing untouched: no operation endpoint changed.
    assert_eq!(routing.batch_count(), 1);
    assert_eq!(automation.fired(), 2);

    let status = automation.last_payload()["configuration-status"].clone();
    assert!(status["identity"].is_null());
    let transport = status["transport"].as_array().unwrap();
    assert_eq!(transport.len(), 1);
    let writes = transport[0]["writes"].as_array().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0]["field"], "remote-port");
    assert_eq!(writes[0]["old"], 8080);
    assert_eq!(writes[0]["new"], 9090);
}

#[tokio::test]
async fn release_only_change_skips_routing() {
    let inventory = InMemoryResourceInventory::new();
    let (orchestrator, routing, automation) = harness(inventory.clone());

    orchestrator.regard_application(&description(8080, "1.0.0"), &operation_server()).await.unwrap();
    orchestrator.regard_application(&description(8080, "1.1.0"), &operation_server()).await.unwrap();

    assert_eq!(routing.batch_count(), 1);
    assert_eq!(automation.fired(), 2);

    let status = automation.last_payload()["configuration-status"].clone();
    assert!(status["identity"].is_object());
    assert!(status["transport"].as_array().unwrap().is_empty());
    assert!(status["operations"].as_array().unwrap().is_empty());
    assert!(status["routing"].is_null());
}

// ============================================================================
// SECTION: Deregistration Tests
// ============================================================================

#[tokio::test]
async fn disregard_of_absent_application_still_fires_automation() {
    let inventory = InMemoryResourceInventory::new();
    let (orchestrator, routing, automation) = harness(inventory);

    orchestrator
        .disregard_application(
            &ApplicationName::new("Ghost"),
            &ReleaseNumber::new("1.0.0"),
            &OperationPath::new("/v1/disregard-application"),
        )
        .await
        .unwrap();

    assert_eq!(routing.batch_count(), 0);
    assert_eq!(automation.fired(), 1);
    let status = automation.last_payload()["configuration-status"].clone();
    assert!(status["identity"].is_null());
    assert!(status["operations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn disregard_removes_routing_for_deleted_operations() {
    let inventory = InMemoryResourceInventory::new();
    let (orchestrator, routing, automation) = harness(inventory.clone());

    orchestrator.regard_application(&description(8080, "1.0.0"), &operation_server()).await.unwrap();
    orchestrator
        .disregard_application(
            &ApplicationName::new("OamLog"),
            &ReleaseNumber::new("1.0.0"),
            &OperationPath::new("/v1/disregard-application"),
        )
        .await
        .unwrap();

    assert_eq!(routing.batch_count(), 2);
    let batch = routing.last_batch();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].action, RoutingAction::Remove);

    assert_eq!(automation.fired(), 2);
    assert!(orchestrator.list_applications().await.unwrap().is_empty());
}

// ============================================================================
// SECTION: Handover Tests
// ============================================================================

fn successor(port: u16) -> SuccessorDescription {
    SuccessorDescription {
        application_name: ApplicationName::new("OamLog"),
        release_number: ReleaseNumber::new("2.0.0"),
        remote_protocol: RemoteProtocol::Http,
        remote_address: RemoteAddress::IpAddress("10.0.0.8".parse::<IpAddr>().unwrap()),
        remote_port: port,
    }
}

#[tokio::test]
async fn bequeath_fires_and_submits_upgrade_on_change() {
    let inventory = InMemoryResourceInventory::with_successor(&successor(8080));
    let (orchestrator, routing, automation) = harness(inventory);

    orchestrator.bequeath_your_data_and_die(&successor(9090)).await.unwrap();

    assert_eq!(routing.batch_count(), 0);
    assert_eq!(automation.fired(), 1);
    assert_eq!(automation.upgrades(), vec![1]);
}

#[tokio::test]
async fn bequeath_without_change_fires_nothing() {
    let inventory = InMemoryResourceInventory::with_successor(&successor(8080));
    let (orchestrator, _routing, automation) = harness(inventory.clone());

    let writes_before = inventory.write_count();
    orchestrator.bequeath_your_data_and_die(&successor(8080)).await.unwrap();

    assert_eq!(inventory.write_count(), writes_before);
    assert_eq!(automation.fired(), 0);
    assert!(automation.upgrades().is_empty());
}

#[tokio::test]
async fn bequeath_without_successor_slot_is_a_no_op() {
    let inventory = InMemoryResourceInventory::new();
    let (orchestrator, _routing, automation) = harness(inventory);

    orchestrator.bequeath_your_data_and_die(&successor(9090)).await.unwrap();

    assert_eq!(automation.fired(), 0);
    assert!(automation.upgrades().is_empty());
}
