// oam-relay-records/src/record.rs
// ============================================================================
// Module: OaM Record Model
// Description: Immutable OaM request observations stored in the record index.
// Purpose: Provide the canonical, serializable record shape.
// Dependencies: oam-relay-core, serde
// ============================================================================

//! ## Overview
//! An [`OamRecord`] is written once at ingestion and never mutated. Retention
//! is owned by the backing index. The field set mirrors the OaM request
//! observations peers redirect to the relay.

// ============================================================================
// SECTION: Imports
// ============================================================================

use oam_relay_core::ApplicationName;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Record
// ============================================================================

/// One immutable OaM request observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OamRecord {
    /// Application the request was observed at.
    pub application_name: ApplicationName,
    /// HTTP method of the observed request.
    pub method: String,
    /// Resource path of the observed request.
    pub resource: String,
    /// Stringified request body, empty when the request carried none.
    pub stringified_body: String,
    /// Response code returned to the requester.
    pub response_code: u16,
    /// User that issued the request.
    pub user_name: String,
    /// Observation timestamp in RFC 3339 form.
    pub timestamp: String,
}

impl OamRecord {
    /// Returns the document key under which the record is indexed.
    ///
    /// Re-indexing a record with the same key replaces the stored document,
    /// which the index reports as an update rather than a creation.
    #[must_use]
    pub fn document_key(&self) -> String {
        format!("{}@{}", self.application_name, self.timestamp)
    }
}
