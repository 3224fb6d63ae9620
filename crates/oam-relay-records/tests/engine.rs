// crates/oam-relay-records/tests/engine.rs
// ============================================================================
// Module: Record Query Engine Tests
// Description: Tests for the window boundary, filtering, and ingestion.
// ============================================================================
//! ## Overview
//! Validates that the engine switches from offset search to scroll exactly
//! at the 10,000-result ceiling, filters per-application queries by exact
//! name, and returns ingestion receipts only for created or replaced
//! documents.

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

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use oam_relay_core::ApplicationName;
use oam_relay_records::IndexOutcome;
use oam_relay_records::InMemoryRecordIndex;
use oam_relay_records::OamRecord;
use oam_relay_records::QueryError;
use oam_relay_records::RecordIndex;
use oam_relay_records::RecordQuery;
use oam_relay_records::RecordQueryEngine;
use oam_relay_records::SearchOutcome;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Which read path the engine chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path {
    Search,
    Scroll,
}

#[derive(Default, Clone)]
struct PathProbeIndex {
    paths: Arc<Mutex<Vec<Path>>>,
}

impl PathProbeIndex {
    fn paths(&self) -> Vec<Path> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordIndex for PathProbeIndex {
    async fn search(
        &self,
        _query: &RecordQuery,
        _from: u64,
        _size: u64,
    ) -> Result<SearchOutcome, QueryError> {
        self.paths.lock().unwrap().push(Path::Search);
        Ok(SearchOutcome {
            hits: Vec::new(),
            took: 3,
        })
    }

    async fn scroll(
        &self,
        _query: &RecordQuery,
        _from: u64,
        _size: u64,
        _keep_alive_ms: u64,
    ) -> Result<SearchOutcome, QueryError> {
        self.paths.lock().unwrap().push(Path::Scroll);
        Ok(SearchOutcome {
            hits: Vec::new(),
            took: 7,
        })
    }

    async fn index(&self, _record: &OamRecord) -> Result<IndexOutcome, QueryError> {
        Ok(IndexOutcome::Noop)
    }
}

fn record(application: &str, timestamp: &str) -> OamRecord {
    OamRecord {
        application_name: ApplicationName::new(application),
        method: "PUT".to_string(),
        resource: "/core-model-1-4:control-construct".to_string(),
        stringified_body: "{}".to_string(),
        response_code: 204,
        user_name: "operator".to_string(),
        timestamp: timestamp.to_string(),
    }
}

// ============================================================================
// SECTION: Window Boundary Tests
// ============================================================================

#[tokio::test]
async fn window_at_ceiling_uses_offset_search() {
    let index = PathProbeIndex::default();
    let engine = RecordQueryEngine::new(index.clone());

    let page = engine.list_records(9_999, 1).await.unwrap();

    assert_eq!(index.paths(), vec![Path::Search]);
    assert_eq!(page.took, 3);
}

#[tokio::test]
async fn window_past_ceiling_uses_scroll() {
    let index = PathProbeIndex::default();
    let engine = RecordQueryEngine::new(index.clone());

    let page = engine.list_records(9_999, 2).await.unwrap();

    assert_eq!(index.paths(), vec![Path::Scroll]);
    assert_eq!(page.took, 7);
}

#[tokio::test]
async fn application_window_follows_the_same_policy() {
    let index = PathProbeIndex::default();
    let engine = RecordQueryEngine::new(index.clone());
    let name = ApplicationName::new("OamLog");

    engine.list_records_of_application(&name, 10_000, 0).await.unwrap();
    engine.list_records_of_application(&name, 10_000, 1).await.unwrap();

    assert_eq!(index.paths(), vec![Path::Search, Path::Scroll]);
}

// ============================================================================
// SECTION: Filtering Tests
// ============================================================================

#[tokio::test]
async fn application_query_matches_by_exact_name() {
    let index = InMemoryRecordIndex::new();
    let engine = RecordQueryEngine::new(index.clone());

    engine.record_oam_request(&record("OamLog", "2026-08-06T10:00:00Z")).await.unwrap();
    engine.record_oam_request(&record("OamLogger", "2026-08-06T10:00:01Z")).await.unwrap();
    engine.record_oam_request(&record("OamLog", "2026-08-06T10:00:02Z")).await.unwrap();

    let page = engine
        .list_records_of_application(&ApplicationName::new("OamLog"), 10, 0)
        .await
        .unwrap();

    assert_eq!(page.response.len(), 2);
    assert!(
        page.response
            .iter()
            .all(|stored| stored.application_name.as_str() == "OamLog")
    );
}

#[tokio::test]
async fn offset_skips_earlier_matches() {
    let index = InMemoryRecordIndex::new();
    let engine = RecordQueryEngine::new(index.clone());

    for second in 0..5 {
        let timestamp = format!("2026-08-06T10:00:0{second}Z");
        engine.record_oam_request(&record("OamLog", &timestamp)).await.unwrap();
    }

    let page = engine.list_records(2, 3).await.unwrap();

    assert_eq!(page.response.len(), 2);
    assert_eq!(page.response[0].timestamp, "2026-08-06T10:00:03Z");
}

// ============================================================================
// SECTION: Ingestion Tests
// ============================================================================

#[tokio::test]
async fn fresh_record_yields_a_receipt() {
    let index = InMemoryRecordIndex::new();
    let engine = RecordQueryEngine::new(index.clone());

    let receipt = engine
        .record_oam_request(&record("OamLog", "2026-08-06T10:00:00Z"))
        .await
        .unwrap();

    assert!(receipt.is_some());
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn replaced_record_still_yields_a_receipt() {
    let index = InMemoryRecordIndex::new();
    let engine = RecordQueryEngine::new(index.clone());
    let observation = record("OamLog", "2026-08-06T10:00:00Z");

    engine.record_oam_request(&observation).await.unwrap();
    let receipt = engine.record_oam_request(&observation).await.unwrap();

    assert!(receipt.is_some());
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn noop_outcome_yields_no_receipt() {
    let engine = RecordQueryEngine::new(PathProbeIndex::default());

    let receipt = engine
        .record_oam_request(&record("OamLog", "2026-08-06T10:00:00Z"))
        .await
        .unwrap();

    assert!(receipt.is_none());
}
