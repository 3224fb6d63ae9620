// oam-relay-records/src/memory.rs
// ============================================================================
// Module: In-Memory Record Index
// Description: Simple in-memory record index for tests and local use.
// Purpose: Provide a deterministic index implementation without external deps.
// Dependencies: crate::{index, record}
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`RecordIndex`]
//! for tests and local deployments. Documents are keyed by the record's
//! document key, so re-indexing the same observation replaces the stored
//! document and reports an update. Scroll reads page over the match set in
//! fixed-size chunks and hold no cursor across calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::index::IndexOutcome;
use crate::index::QueryError;
use crate::index::RecordIndex;
use crate::index::RecordQuery;
use crate::index::SearchOutcome;
use crate::record::OamRecord;

// ============================================================================
// SECTION: In-Memory Index
// ============================================================================

/// Page size used by the emulated scroll cursor.
const SCROLL_PAGE: usize = 1_000;

/// Mutable index state behind the mutex.
#[derive(Debug, Default)]
struct IndexState {
    /// Stored records in index order.
    records: Vec<OamRecord>,
    /// Document positions keyed by document key.
    keys: BTreeMap<String, usize>,
}

/// In-memory record index for tests and local deployments.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordIndex {
    /// Index state protected by a mutex.
    inner: Arc<Mutex<IndexState>>,
}

impl InMemoryRecordIndex {
    /// Creates an empty in-memory index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().map(|state| state.records.len()).unwrap_or(0)
    }

    /// Returns true when the index holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collects the records matching a query in index order.
    fn matches(&self, query: &RecordQuery) -> Result<Vec<OamRecord>, QueryError> {
        let state = self
            .inner
            .lock()
            .map_err(|_| QueryError::Unavailable("record index mutex poisoned".to_string()))?;
        Ok(state.records.iter().filter(|record| query.matches(record)).cloned().collect())
    }
}

/// Slices a match set to the requested window.
fn window(matches: Vec<OamRecord>, from: u64, size: u64) -> Vec<OamRecord> {
    let from = usize::try_from(from).unwrap_or(usize::MAX);
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    matches.into_iter().skip(from).take(size).collect()
}

#[async_trait]
impl RecordIndex for InMemoryRecordIndex {
    async fn search(
        &self,
        query: &RecordQuery,
        from: u64,
        size: u64,
    ) -> Result<SearchOutcome, QueryError> {
        let matches = self.matches(query)?;
        Ok(SearchOutcome {
            hits: window(matches, from, size),
            took: 0,
        })
    }

    async fn scroll(
        &self,
        query: &RecordQuery,
        from: u64,
        size: u64,
        _keep_alive_ms: u64,
    ) -> Result<SearchOutcome, QueryError> {
        let matches = self.matches(query)?;
        let target = usize::try_from(from.saturating_add(size)).unwrap_or(usize::MAX);
        // Page the match set the way a cursor would, then slice the window;
        // the cursor never survives the call.
        let mut paged: Vec<OamRecord> = Vec::new();
        for chunk in matches.chunks(SCROLL_PAGE) {
            paged.extend_from_slice(chunk);
            if paged.len() >= target {
                break;
            }
        }
        Ok(SearchOutcome {
            hits: window(paged, from, size),
            took: 0,
        })
    }

    async fn index(&self, record: &OamRecord) -> Result<IndexOutcome, QueryError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| QueryError::Unavailable("record index mutex poisoned".to_string()))?;
        let key = record.document_key();
        if let Some(&position) = state.keys.get(&key) {
            state.records[position] = record.clone();
            return Ok(IndexOutcome::Updated);
        }
        let position = state.records.len();
        state.records.push(record.clone());
        state.keys.insert(key, position);
        Ok(IndexOutcome::Created)
    }
}
