// oam-relay-records/src/index.rs
// ============================================================================
// Module: Record Index Interface
// Description: Backend-agnostic interface to the OaM record index.
// Purpose: Define offset search, cursor scroll, and single-document indexing.
// Dependencies: crate::record, oam-relay-core
// ============================================================================

//! ## Overview
//! The record index is an external collaborator with a documented
//! 10,000-result offset ceiling. Implementations expose a direct offset
//! search, a cursor-based scroll for windows beyond the ceiling, and
//! single-document indexing that reports whether the document was created or
//! replaced. Cursor lifetime is bounded by the keep-alive passed with every
//! scroll call; implementations release the cursor when the requested window
//! is drained or the keep-alive lapses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use oam_relay_core::ApplicationName;
use thiserror::Error;

use crate::record::OamRecord;

// ============================================================================
// SECTION: Queries and Outcomes
// ============================================================================

/// Query errors raised by the record index.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The record index is unreachable.
    #[error("record index unavailable: {0}")]
    Unavailable(String),
    /// The query was rejected as malformed.
    #[error("record query malformed: {0}")]
    Malformed(String),
    /// A scroll cursor could not be opened, advanced, or released.
    #[error("record scroll failed: {0}")]
    Scroll(String),
}

/// Filter applied to a record search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordQuery {
    /// Match every record.
    All,
    /// Match records of one application by exact name.
    Application(ApplicationName),
}

impl RecordQuery {
    /// Returns true when a record matches the query.
    #[must_use]
    pub fn matches(&self, record: &OamRecord) -> bool {
        match self {
            Self::All => true,
            Self::Application(name) => record.application_name == *name,
        }
    }
}

/// Result window of one search or scroll read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Matching records in index order.
    pub hits: Vec<OamRecord>,
    /// Elapsed milliseconds reported by the index.
    pub took: u64,
}

/// Outcome of indexing one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The document was newly created.
    Created,
    /// An existing document with the same key was replaced.
    Updated,
    /// The index accepted the call but stored nothing.
    Noop,
}

// ============================================================================
// SECTION: Record Index
// ============================================================================

/// Backend-agnostic record index.
#[async_trait]
pub trait RecordIndex: Send + Sync {
    /// Runs a direct offset/size search.
    ///
    /// Callers must keep `from + size` within the index's offset ceiling;
    /// windows beyond it belong to [`RecordIndex::scroll`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the index is unreachable or rejects the
    /// query.
    async fn search(
        &self,
        query: &RecordQuery,
        from: u64,
        size: u64,
    ) -> Result<SearchOutcome, QueryError>;

    /// Serves the same window through a cursor-based scroll.
    ///
    /// The cursor must not outlive `keep_alive_ms` and must be released once
    /// the window is drained.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the cursor cannot be opened, advanced, or
    /// released.
    async fn scroll(
        &self,
        query: &RecordQuery,
        from: u64,
        size: u64,
        keep_alive_ms: u64,
    ) -> Result<SearchOutcome, QueryError>;

    /// Indexes one record and reports whether it was created or replaced.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the index is unreachable.
    async fn index(&self, record: &OamRecord) -> Result<IndexOutcome, QueryError>;
}
