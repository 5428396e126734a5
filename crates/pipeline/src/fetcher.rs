//! # Batch Fetcher
//!
//! Retrieves the primary record batch and joins each record with its
//! auxiliary label lookup.
//!
//! ## Parallelism Model
//!
//! Label lookups are issued concurrently, one task per record, with
//! unbounded fan-out. Each task writes its outcome into its own
//! per-index slot, so no locking is needed; the join is the only
//! synchronization point.
//!
//! ## Settle-All Semantics
//!
//! The fetcher waits for every lookup to settle (success or failure)
//! before returning. This is a join barrier, not a race, and not
//! all-or-nothing: one lookup's failure never cancels or fails its
//! siblings. A failed or empty lookup degrades that record's label to
//! `None` and is logged, never propagated as a batch failure.
//!
//! ## Failure Model
//!
//! Only a primary source failure fails the fetch. It is surfaced to the
//! caller unchanged; retry policy is a caller concern.

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use subrank_common::{FetchError, LabelSource, RecordSource};

use crate::types::Record;

// ════════════════════════════════════════════════════════════════════════════
// FETCHER
// ════════════════════════════════════════════════════════════════════════════

/// Joins a primary record source with a label source.
#[derive(Debug, Clone)]
pub struct Fetcher<R, L> {
    source: R,
    labels: L,
}

impl<R: RecordSource, L: LabelSource> Fetcher<R, L> {
    /// Creates a fetcher over the two injected sources.
    pub fn new(source: R, labels: L) -> Self {
        Self { source, labels }
    }

    /// Fetches the first page of records and resolves their labels.
    ///
    /// Records are returned in the primary source's order; that order is
    /// the tie-break for the ranking stage.
    ///
    /// # Errors
    ///
    /// Only primary source failures. Label lookup failures degrade the
    /// affected record's label instead.
    pub async fn fetch(&self, first: usize) -> Result<Vec<Record>, FetchError> {
        let raw = self.source.fetch_records(first).await?;
        debug!("fetched {} primary records", raw.len());

        // One slot per record; each lookup task owns exactly one index.
        let mut slots: Vec<Option<String>> = vec![None; raw.len()];

        let mut pending: FuturesUnordered<_> = raw
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let id = record.id.clone();
                let labels = &self.labels;
                async move {
                    let outcome = labels.lookup_label(&id).await;
                    (idx, id, outcome)
                }
            })
            .collect();

        while let Some((idx, id, outcome)) = pending.next().await {
            match outcome {
                Ok(Some(label)) => {
                    slots[idx] = Some(label);
                }
                Ok(None) => {
                    debug!("no label registered for {}", id);
                }
                Err(e) => {
                    warn!("label lookup failed for {}: {}", id, e);
                }
            }
        }

        Ok(raw
            .into_iter()
            .zip(slots)
            .map(|(record, label)| Record {
                id: record.id,
                fields: record.fields,
                label,
            })
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════
