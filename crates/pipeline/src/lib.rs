//! # subrank Pipeline Crate
//!
//! The ranked-aggregation pipeline: fetch a primary record batch, join
//! per-record labels, derive metrics, filter by declarative predicates,
//! and assign stable ranks.
//!
//! ## Modules
//! - `types`: record types flowing between stages
//! - `fetcher`: primary fetch + concurrent label join
//! - `aggregator`: pure metric derivation
//! - `filter`: declarative predicate filtering
//! - `ranker`: stable descending sort + rank assignment
//! - `pipeline`: glue layer composing the stages
//!
//! ## Usage
//! ```rust,ignore
//! let config = PipelineConfig::from_env()?;
//! let source = SubgraphSource::from_config(&config)?;
//! let labels = NameServiceSource::from_config(&config)?;
//! let ranked = RankingPipeline::new(source, labels, &config).run().await?;
//! ```

pub mod aggregator;
pub mod fetcher;
pub mod filter;
pub mod pipeline;
pub mod ranker;
pub mod types;

pub use aggregator::aggregate;
pub use fetcher::Fetcher;
pub use filter::{apply_filters, Op, Predicate};
pub use pipeline::RankingPipeline;
pub use ranker::rank;
pub use types::{DerivedMetrics, EnrichedRecord, MetricKey, RankedRecord, Record};
