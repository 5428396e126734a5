//! # RankingPipeline
//!
//! Composes the pipeline stages behind a single `run()` call:
//!
//! ```text
//! RecordSource + LabelSource
//!      │
//!      ▼ (1) Fetch batch + settle-all label join
//! Fetcher::fetch()
//!      │
//!      ▼ (2) Derive metrics (pure)
//! aggregate()
//!      │
//!      ▼ (3) Apply predicate set (pure)
//! apply_filters()
//!      │
//!      ▼ (4) Stable sort + assign ranks (pure)
//! rank()
//!      │
//!      ▼
//! Vec<RankedRecord>
//! ```
//!
//! ## Separation of Concerns
//!
//! `RankingPipeline` is a glue layer only. It does NOT:
//!
//! - Retry on failure (caller's responsibility).
//! - Cache results across cycles: every `run()` rebuilds the batch.
//! - Format output (presenter's responsibility).

use tracing::info;

use subrank_common::{FetchError, LabelSource, PipelineConfig, RecordSource};

use crate::aggregator::aggregate;
use crate::fetcher::Fetcher;
use crate::filter::{apply_filters, Predicate};
use crate::ranker::rank;
use crate::types::{EnrichedRecord, MetricKey, RankedRecord};

/// Ranked-aggregation pipeline over injected sources.
#[derive(Debug, Clone)]
pub struct RankingPipeline<R, L> {
    fetcher: Fetcher<R, L>,
    predicates: Vec<Predicate>,
    ranking_metric: MetricKey,
    scaling_decimals: u32,
    page_size: usize,
}

impl<R: RecordSource, L: LabelSource> RankingPipeline<R, L> {
    /// Creates a pipeline with the config's thresholds and the power
    /// ranking as the sort metric.
    pub fn new(source: R, labels: L, config: &PipelineConfig) -> Self {
        Self {
            fetcher: Fetcher::new(source, labels),
            predicates: Predicate::default_set(config.stake_threshold, config.fee_threshold),
            ranking_metric: MetricKey::PowerRanking,
            scaling_decimals: config.scaling_decimals,
            page_size: config.page_size,
        }
    }

    /// Replaces the predicate set.
    #[must_use]
    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates = predicates;
        self
    }

    /// Replaces the ranking metric.
    #[must_use]
    pub fn with_ranking_metric(mut self, metric: MetricKey) -> Self {
        self.ranking_metric = metric;
        self
    }

    /// Runs one full fetch cycle and returns the ranked records.
    ///
    /// # Errors
    ///
    /// Only primary source failures; label lookup failures have already
    /// been degraded inside the fetch stage.
    pub async fn run(&self) -> Result<Vec<RankedRecord>, FetchError> {
        let records = self.fetcher.fetch(self.page_size).await?;
        info!("fetched {} records", records.len());

        let enriched: Vec<EnrichedRecord> = records
            .iter()
            .map(|record| aggregate(record, self.scaling_decimals))
            .collect();

        let filtered = apply_filters(enriched, &self.predicates);
        info!(
            "{} of {} records passed {} predicates",
            filtered.len(),
            records.len(),
            self.predicates.len()
        );

        Ok(rank(filtered, self.ranking_metric))
    }

    /// Runs one fetch cycle and returns the enriched records unfiltered
    /// and unranked, for consumers that do their own selection.
    pub async fn run_unranked(&self) -> Result<Vec<EnrichedRecord>, FetchError> {
        let records = self.fetcher.fetch(self.page_size).await?;
        Ok(records
            .iter()
            .map(|record| aggregate(record, self.scaling_decimals))
            .collect())
    }
}
