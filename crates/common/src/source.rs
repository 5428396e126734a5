//! Data Source Abstraction
//!
//! This module defines the traits `RecordSource`, `LabelSource`, and
//! `UsageSource` as the abstraction contracts for the external data
//! collaborators of the ranking pipeline. The traits let the pipeline
//! interact with different backends uniformly without being tied to a
//! specific implementation.

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// SUPPORTING TYPES
// ════════════════════════════════════════════════════════════════════════════

/// Well-known numeric field names returned by the primary data source.
///
/// Raw field values are decimal-string integers in 18-decimal minor units.
pub mod fields {
    /// Tokens staked by the indexer itself.
    pub const STAKED_TOKENS: &str = "stakedTokens";
    /// Tokens delegated to the indexer by third parties.
    pub const DELEGATED_TOKENS: &str = "delegatedTokens";
    /// Cumulative query fees the indexer has collected.
    pub const QUERY_FEES_COLLECTED: &str = "queryFeesCollected";
}

/// One record from the primary data source.
///
/// `id` is unique within a fetch batch. `fields` maps attribute names to
/// decimal-string integers in minor units; unparsable values are handled
/// downstream by the aggregation stage, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Address-like unique identifier within a batch.
    pub id: String,
    /// Named numeric-string attributes in minor units.
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// Creates a record with an empty field map.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style helper to attach a named numeric-string field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

/// One point of a protocol's daily usage series.
///
/// Recovered from the DEX dashboard feature set: a bounded time series of
/// daily swap counts, consumed by external presenters as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyUsagePoint {
    /// Unix timestamp (seconds) of the day the point describes.
    pub timestamp: u64,
    /// Number of swaps executed that day.
    pub swap_count: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// ERROR TYPES
// ════════════════════════════════════════════════════════════════════════════

/// Errors from the primary data source or the usage series source.
///
/// A `FetchError` fails the whole fetch cycle. It is surfaced to the
/// caller unchanged; the pipeline performs no automatic retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network-level failure reaching the endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The endpoint answered with a non-success HTTP status.
    #[error("unexpected status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The endpoint answered 200 but carried a query error payload.
    #[error("query error: {0}")]
    Query(String),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Errors from the label-resolution source.
///
/// Label errors are per-record and non-fatal: the fetch stage logs them
/// and degrades the affected record's label instead of failing the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LabelError {
    /// Network-level failure reaching the endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// The lookup exceeded the configured timeout.
    #[error("lookup timed out")]
    Timeout,

    /// The endpoint answered with a non-success HTTP status.
    #[error("unexpected status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The endpoint answered 200 but carried a query error payload.
    #[error("query error: {0}")]
    Query(String),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

// ════════════════════════════════════════════════════════════════════════════
// SOURCE TRAITS
// ════════════════════════════════════════════════════════════════════════════

/// Abstraction over the primary record source.
///
/// # Contract for Implementors
///
/// Implementors MUST:
/// - Be thread-safe (`Send + Sync`)
/// - Return at most `first` records, in the source's natural order
/// - Never block inside the async method
/// - Map every failure onto a `FetchError` variant
///
/// The returned order is load-bearing: it is the tie-break order for the
/// ranking stage, so implementations must not shuffle results.
pub trait RecordSource: Send + Sync {
    /// Fetches the first page of records from the source.
    ///
    /// # Arguments
    ///
    /// * `first` - Upper bound on the number of records returned.
    ///
    /// # Errors
    ///
    /// Any transport, status, query, or decode failure. The caller treats
    /// the error as fatal for the fetch cycle.
    fn fetch_records(
        &self,
        first: usize,
    ) -> impl Future<Output = Result<Vec<RawRecord>, FetchError>> + Send;
}

/// Abstraction over the label-resolution source.
///
/// Maps an address-like id to zero-or-one human-readable label. Queried
/// once per record per fetch cycle.
///
/// # Contract for Implementors
///
/// - `Ok(None)` means the id has no registered label; it is not an error.
/// - Implementations must be safe to call concurrently: the fetch stage
///   issues one lookup per record with unbounded fan-out.
pub trait LabelSource: Send + Sync {
    /// Looks up the display label for `id`.
    fn lookup_label(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<String>, LabelError>> + Send;
}

/// Abstraction over the daily usage series source.
pub trait UsageSource: Send + Sync {
    /// Fetches up to `first` daily usage points, oldest first.
    fn fetch_daily_usage(
        &self,
        first: usize,
    ) -> impl Future<Output = Result<Vec<DailyUsagePoint>, FetchError>> + Send;
}

// ════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════
