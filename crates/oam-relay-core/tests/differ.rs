// crates/oam-relay-core/tests/differ.rs
// ============================================================================
// Module: Configuration Differ Tests
// Description: Tests for no-op write suppression and structural equality.
// ============================================================================
//! ## Overview
//! Validates that the differ writes only fields whose values actually differ
//! and that address comparison is structural rather than textual.

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

use oam_relay_core::ApplicationName;
use oam_relay_core::EndpointDescription;
use oam_relay_core::InMemoryResourceInventory;
use oam_relay_core::ReleaseNumber;
use oam_relay_core::RemoteAddress;
use oam_relay_core::RemoteProtocol;
use oam_relay_core::ResourceInventory;
use oam_relay_core::runtime::diff_transport;
use oam_relay_core::runtime::read_transport;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

fn description(address: RemoteAddress) -> EndpointDescription {
    EndpointDescription {
        application_name: ApplicationName::new("RegistryOffice"),
        release_number: ReleaseNumber::new("2.0.1"),
        remote_protocol: RemoteProtocol::Https,
        remote_address: address,
        remote_port: 443,
        operations: BTreeMap::new(),
    }
}

fn ip(text: &str) -> RemoteAddress {
    RemoteAddress::IpAddress(text.parse::<IpAddr>().unwrap())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn identical_transport_values_write_nothing() {
    let inventory = InMemoryResourceInventory::new();
    let endpoints = inventory.create_application(&description(ip("192.168.1.10"))).await.unwrap();
    let writes_before = inventory.write_count();

    let current = read_transport(&inventory, &endpoints.transport).await.unwrap();
    let status = diff_transport(
        &inventory,
        &endpoints.transport,
        &current,
        RemoteProtocol::Https,
        &ip("192.168.1.10"),
        443,
    )
    .await
    .unwrap();

    assert!(status.is_none());
    assert_eq!(inventory.write_count(), writes_before);
}

#[tokio::test]
async fn equivalent_address_representations_do_not_write() {
    let inventory = InMemoryResourceInventory::new();
    let endpoints = inventory.create_application(&description(ip("::1"))).await.unwrap();
    let writes_before = inventory.write_count();

    let current = read_transport(&inventory, &endpoints.transport).await.unwrap();
    // "0:0:0:0:0:0:0:1" parses to the same address value as "::1".
    let status = diff_transport(
        &inventory,
        &endpoints.transport,
        &current,
        RemoteProtocol::Https,
        &ip("0:0:0:0:0:0:0:1"),
        443,
    )
    .await
    .unwrap();

    assert!(status.is_none());
    assert_eq!(inventory.write_count(), writes_before);
}

#[tokio::test]
async fn address_kind_change_is_a_single_field_write() {
    let inventory = InMemoryResourceInventory::new();
    let endpoints = inventory.create_application(&description(ip("192.168.1.10"))).await.unwrap();

    let current = read_transport(&inventory, &endpoints.transport).await.unwrap();
    let status = diff_transport(
        &inventory,
        &endpoints.transport,
        &current,
        RemoteProtocol::Https,
        &RemoteAddress::DomainName("oam.example.net".to_string()),
        443,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(status.writes.len(), 1);
    assert_eq!(status.writes[0].field, "remote-address");
    let stored = inventory.remote_address(&endpoints.transport).await.unwrap();
    assert_eq!(stored, RemoteAddress::DomainName("oam.example.net".to_string()));
}
