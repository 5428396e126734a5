//! # subrank Common Crate
//!
//! Configuration, numeric parsing, and the data-source abstractions shared
//! by the ranking pipeline.
//!
//! ## Modules
//! - `source`: `RecordSource` / `LabelSource` / `UsageSource` trait definitions
//! - `subgraph`: live subgraph-gateway implementation
//! - `labels`: name-service lookup implementation
//! - `mock_source`: mock implementations for testing
//! - `numeric`: minor-unit token amount parsing
//! - `config`: configuration management
//!
//! ## Source Architecture
//! ```text
//! ┌──────────────┐          ┌─────────────┐
//! │ RecordSource │          │ LabelSource │     <- Abstract traits
//! └──────┬───────┘          └──────┬──────┘
//!        │                         │
//!   ┌────┴────────┐          ┌─────┴───────────┐
//!   │             │          │                 │
//! ┌─▼────────┐ ┌──▼───────┐ ┌▼──────────────┐ ┌▼───────────┐
//! │ Subgraph │ │ Mock     │ │ NameService   │ │ Mock       │
//! │ Source   │ │ Record   │ │ Source        │ │ Label      │
//! │          │ │ Source   │ │               │ │ Source     │
//! └──────────┘ └──────────┘ └───────────────┘ └────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = PipelineConfig::from_env()?;
//! let source = SubgraphSource::from_config(&config)?;
//! let batch = source.fetch_records(config.page_size).await?;
//! ```

pub mod config;
pub mod labels;
pub mod mock_source;
pub mod numeric;
pub mod source;
pub mod subgraph;

pub use config::{ConfigError, PipelineConfig};
pub use labels::NameServiceSource;
pub use mock_source::{MockLabelSource, MockRecordSource, MockUsageSource};
pub use source::{
    fields, DailyUsagePoint, FetchError, LabelError, LabelSource, RawRecord, RecordSource,
    UsageSource,
};
pub use subgraph::SubgraphSource;
