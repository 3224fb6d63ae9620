// oam-relay-records/src/engine.rs
// ============================================================================
// Module: Record Query Engine
// Description: Bounded-window record queries with scroll fallback.
// Purpose: Serve historical OaM records without deep offset pagination.
// Dependencies: crate::{index, record}, oam-relay-core
// ============================================================================

//! ## Overview
//! The engine serves point-in-time and per-application searches. Windows
//! within the index's 10,000-result offset ceiling run as direct searches;
//! larger windows fall back to the cursor-based scroll, since the backing
//! index forbids deep offset pagination. Ingestion is timed and yields a
//! receipt only when the index reports the document as created or replaced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use oam_relay_core::ApplicationName;
use serde::Deserialize;
use serde::Serialize;

use crate::index::IndexOutcome;
use crate::index::QueryError;
use crate::index::RecordIndex;
use crate::index::RecordQuery;
use crate::record::OamRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hard offset ceiling imposed by the backing index's non-scrolling window.
pub const RESULT_WINDOW_CEILING: u64 = 10_000;
/// Default scroll-cursor keep-alive in milliseconds.
pub const DEFAULT_SCROLL_KEEP_ALIVE_MS: u64 = 60_000;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Scroll-cursor policy applied to every scroll read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    /// Cursor keep-alive in milliseconds.
    pub keep_alive_ms: u64,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            keep_alive_ms: DEFAULT_SCROLL_KEEP_ALIVE_MS,
        }
    }
}

/// One page of records with the elapsed query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPage {
    /// Matching records.
    pub response: Vec<OamRecord>,
    /// Elapsed milliseconds reported by the index.
    pub took: u64,
}

/// Receipt returned for a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Elapsed milliseconds of the indexing write.
    pub took: u64,
}

// ============================================================================
// SECTION: Window Policy
// ============================================================================

/// Returns true when a window exceeds the offset ceiling and must scroll.
#[must_use]
pub fn exceeds_result_window(from: u64, size: u64) -> bool {
    from.saturating_add(size) > RESULT_WINDOW_CEILING
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Record query engine over a backend-agnostic index.
pub struct RecordQueryEngine<X> {
    /// Record index implementation.
    index: X,
    /// Scroll-cursor policy.
    scroll: ScrollPolicy,
}

impl<X> RecordQueryEngine<X>
where
    X: RecordIndex,
{
    /// Creates an engine with the default scroll policy.
    #[must_use]
    pub fn new(index: X) -> Self {
        Self::with_scroll_policy(index, ScrollPolicy::default())
    }

    /// Creates an engine with an explicit scroll policy.
    #[must_use]
    pub const fn with_scroll_policy(index: X, scroll: ScrollPolicy) -> Self {
        Self {
            index,
            scroll,
        }
    }

    /// Lists recorded OaM requests.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the index fails the read.
    pub async fn list_records(
        &self,
        number_of_records: u64,
        latest_record_offset: u64,
    ) -> Result<RecordPage, QueryError> {
        self.windowed(&RecordQuery::All, latest_record_offset, number_of_records).await
    }

    /// Lists recorded OaM requests of one application.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the index fails the read.
    pub async fn list_records_of_application(
        &self,
        application_name: &ApplicationName,
        number_of_records: u64,
        latest_match_offset: u64,
    ) -> Result<RecordPage, QueryError> {
        let query = RecordQuery::Application(application_name.clone());
        self.windowed(&query, latest_match_offset, number_of_records).await
    }

    /// Records one OaM request, timing the write.
    ///
    /// Returns a receipt only when the index reports the document as created
    /// or replaced; a no-op outcome yields `None` and is treated as a soft
    /// failure by callers.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the index is unreachable.
    pub async fn record_oam_request(
        &self,
        record: &OamRecord,
    ) -> Result<Option<IngestReceipt>, QueryError> {
        let started = Instant::now();
        let outcome = self.index.index(record).await?;
        let took = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            IndexOutcome::Created | IndexOutcome::Updated => Ok(Some(IngestReceipt {
                took,
            })),
            IndexOutcome::Noop => Ok(None),
        }
    }

    /// Runs one windowed read, choosing between offset search and scroll.
    async fn windowed(
        &self,
        query: &RecordQuery,
        from: u64,
        size: u64,
    ) -> Result<RecordPage, QueryError> {
        let outcome = if exceeds_result_window(from, size) {
            self.index.scroll(query, from, size, self.scroll.keep_alive_ms).await?
        } else {
            self.index.search(query, from, size).await?
        };
        Ok(RecordPage {
            response: outcome.hits,
            took: outcome.took,
        })
    }
}
