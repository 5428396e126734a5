//! Mock Source Implementations for Testing
//!
//! Fully in-memory implementations of the source traits. No network
//! calls are performed.
//!
//! # Features
//!
//! - Deterministic behavior for reproducible tests
//! - Configurable latency simulation (async, non-blocking)
//! - Explicit failure injection: whole-batch failure for the record
//!   source, per-id failure set for the label source
//!
//! # Example
//!
//! ```ignore
//! use subrank_common::{MockLabelSource, MockRecordSource, RawRecord};
//!
//! let source = MockRecordSource::new(vec![RawRecord::new("0xaa")]);
//! let mut labels = MockLabelSource::new();
//! labels.insert("0xaa", "alice.eth");
//! labels.fail_for("0xbb");
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::source::{
    DailyUsagePoint, FetchError, LabelError, LabelSource, RawRecord, RecordSource, UsageSource,
};

// ════════════════════════════════════════════════════════════════════════════
// MOCK RECORD SOURCE
// ════════════════════════════════════════════════════════════════════════════

/// In-memory primary record source.
#[derive(Debug, Clone, Default)]
pub struct MockRecordSource {
    records: Vec<RawRecord>,
    latency_ms: u64,
    fail: bool,
}

impl MockRecordSource {
    /// Creates a source that serves `records` in order.
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            latency_ms: 0,
            fail: false,
        }
    }

    /// Creates a source whose every fetch fails with a network error.
    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            latency_ms: 0,
            fail: true,
        }
    }

    /// Creates a source with simulated per-call latency.
    pub fn with_latency(records: Vec<RawRecord>, latency_ms: u64) -> Self {
        Self {
            records,
            latency_ms,
            fail: false,
        }
    }
}

impl RecordSource for MockRecordSource {
    async fn fetch_records(&self, first: usize) -> Result<Vec<RawRecord>, FetchError> {
        if self.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;
        }
        if self.fail {
            return Err(FetchError::Network(
                "simulated primary source failure".to_string(),
            ));
        }
        Ok(self.records.iter().take(first).cloned().collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MOCK LABEL SOURCE
// ════════════════════════════════════════════════════════════════════════════

/// In-memory label source with per-id failure injection.
#[derive(Debug, Clone, Default)]
pub struct MockLabelSource {
    labels: HashMap<String, String>,
    fail_ids: HashSet<String>,
    latency_ms: u64,
}

impl MockLabelSource {
    /// Creates an empty label source: every lookup resolves to `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a label for `id`.
    pub fn insert(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(id.into(), label.into());
    }

    /// Makes lookups for `id` fail with a network error.
    pub fn fail_for(&mut self, id: impl Into<String>) {
        self.fail_ids.insert(id.into());
    }

    /// Sets simulated per-lookup latency.
    pub fn set_latency(&mut self, latency_ms: u64) {
        self.latency_ms = latency_ms;
    }
}

impl LabelSource for MockLabelSource {
    async fn lookup_label(&self, id: &str) -> Result<Option<String>, LabelError> {
        if self.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;
        }
        if self.fail_ids.contains(id) {
            return Err(LabelError::Network(
                "simulated label lookup failure".to_string(),
            ));
        }
        Ok(self.labels.get(id).cloned())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MOCK USAGE SOURCE
// ════════════════════════════════════════════════════════════════════════════

/// In-memory daily usage series source.
#[derive(Debug, Clone, Default)]
pub struct MockUsageSource {
    points: Vec<DailyUsagePoint>,
}

impl MockUsageSource {
    /// Creates a source serving `points` as-is.
    pub fn new(points: Vec<DailyUsagePoint>) -> Self {
        Self { points }
    }
}

impl UsageSource for MockUsageSource {
    async fn fetch_daily_usage(&self, first: usize) -> Result<Vec<DailyUsagePoint>, FetchError> {
        Ok(self.points.iter().take(first).cloned().collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════
