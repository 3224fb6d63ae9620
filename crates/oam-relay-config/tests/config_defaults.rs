// crates/oam-relay-config/tests/config_defaults.rs
// ============================================================================
// Module: Config Defaults and Validation Tests
// Description: Tests for default values and fail-closed validation.
// ============================================================================
//! ## Overview
//! Validates that an empty config file yields the documented defaults and
//! that out-of-range limits reject the file.

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

use std::io::Write;

use oam_relay_config::AuditSinkType;
use oam_relay_config::OamRelayConfig;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn empty_config_uses_documented_defaults() {
    let file = write_config("");
    let config = OamRelayConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.server.bind, "127.0.0.1:8420");
    assert_eq!(config.server.max_body_bytes, 1024 * 1024);
    assert_eq!(config.records.scroll_keep_alive_ms, 60_000);
    assert_eq!(config.automation.queue_capacity, 256);
    assert_eq!(config.audit.sink, AuditSinkType::Stderr);
}

#[test]
fn explicit_sections_override_defaults() {
    let file = write_config(
        "[server]\nbind = \"0.0.0.0:9000\"\n\n[records]\nscroll_keep_alive_ms = 30000\n\n\
         [automation]\nqueue_capacity = 64\n",
    );
    let config = OamRelayConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.server.bind, "0.0.0.0:9000");
    assert_eq!(config.records.scroll_keep_alive_ms, 30_000);
    assert_eq!(config.automation.queue_capacity, 64);
}

#[test]
fn invalid_bind_address_fails_closed() {
    let file = write_config("[server]\nbind = \"not-an-address\"\n");
    assert!(OamRelayConfig::load(Some(file.path())).is_err());
}

#[test]
fn zero_queue_capacity_fails_closed() {
    let file = write_config("[automation]\nqueue_capacity = 0\n");
    assert!(OamRelayConfig::load(Some(file.path())).is_err());
}

#[test]
fn out_of_range_keep_alive_fails_closed() {
    let file = write_config("[records]\nscroll_keep_alive_ms = 10\n");
    assert!(OamRelayConfig::load(Some(file.path())).is_err());
}

#[test]
fn file_sink_requires_a_path() {
    let file = write_config("[audit]\nsink = \"file\"\n");
    assert!(OamRelayConfig::load(Some(file.path())).is_err());
}

#[test]
fn explicit_body_limit_is_applied() {
    let file = write_config("[server]\nbind = \"127.0.0.1:8421\"\nmax_body_bytes = 2048\n");
    let config = OamRelayConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server.max_body_bytes, 2048);
}
