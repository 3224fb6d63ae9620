// oam-relay-config/src/lib.rs
// ============================================================================
// Module: OaM Relay Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for oam-relay.toml semantics.
// Dependencies: oam-relay-records, serde, toml
// ============================================================================

//! ## Overview
//! `oam-relay-config` defines the canonical configuration model for OaM
//! Relay. Parsing is strict and fail-closed: out-of-range limits reject the
//! whole file rather than falling back to defaults.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
