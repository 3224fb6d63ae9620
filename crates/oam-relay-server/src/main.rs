// oam-relay-server/src/main.rs
// ============================================================================
// Module: OaM Relay Server Binary
// Description: Entry point loading configuration and serving the relay API.
// Purpose: Run the relay with an optional config path argument.
// Dependencies: oam-relay-config, oam-relay-server, tokio
// ============================================================================

//! ## Overview
//! Loads `oam-relay.toml` (or the path given as the first argument, or the
//! `OAM_RELAY_CONFIG` environment variable) and serves the relay API until
//! the listener fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use oam_relay_config::OamRelayConfig;
use oam_relay_server::OamRelayServer;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Loads configuration, builds the server, and serves until failure.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = OamRelayConfig::load(path.as_deref())?;
    let server = OamRelayServer::from_config(config)?;
    server.serve().await?;
    Ok(())
}
