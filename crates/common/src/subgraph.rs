//! Subgraph Gateway Source
//!
//! Live implementation of [`RecordSource`] and [`UsageSource`] over a
//! hosted GraphQL gateway. Queries are POSTed as `{"query": "..."}` JSON
//! documents; responses arrive in the standard `data`/`errors` envelope.
//!
//! The source is read-only and stateless: every call issues one request
//! and maps the outcome onto [`FetchError`]. Retry policy, if any, is a
//! caller concern.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::source::{fields, DailyUsagePoint, FetchError, RawRecord, RecordSource, UsageSource};

// ════════════════════════════════════════════════════════════════════════════
// RESPONSE ENVELOPE
// ════════════════════════════════════════════════════════════════════════════

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct IndexerBatch {
    indexers: Vec<IndexerRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexerRow {
    id: String,
    staked_tokens: String,
    delegated_tokens: String,
    query_fees_collected: String,
}

impl IndexerRow {
    fn into_raw(self) -> RawRecord {
        RawRecord::new(self.id)
            .with_field(fields::STAKED_TOKENS, &self.staked_tokens)
            .with_field(fields::DELEGATED_TOKENS, &self.delegated_tokens)
            .with_field(fields::QUERY_FEES_COLLECTED, &self.query_fees_collected)
    }
}

#[derive(Debug, Deserialize)]
struct ProtocolBatch {
    #[serde(rename = "dexAmmProtocols")]
    protocols: Vec<ProtocolRow>,
}

#[derive(Debug, Deserialize)]
struct ProtocolRow {
    #[serde(rename = "dailyUsageMetrics")]
    daily_usage_metrics: Vec<UsageRow>,
}

#[derive(Debug, Deserialize)]
struct UsageRow {
    /// BigInt in the source schema, serialized as a decimal string.
    timestamp: String,
    #[serde(rename = "dailySwapCount")]
    daily_swap_count: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// SUBGRAPH SOURCE
// ════════════════════════════════════════════════════════════════════════════

/// GraphQL-backed record and usage source.
#[derive(Debug, Clone)]
pub struct SubgraphSource {
    endpoint: String,
    client: reqwest::Client,
}

impl SubgraphSource {
    /// Creates a source against `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Creates a source for the configured primary subgraph endpoint.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, FetchError> {
        Self::new(config.subgraph_endpoint(), config.timeout_ms)
    }

    /// POSTs a query document and decodes the `data` payload.
    async fn execute<T: DeserializeOwned>(&self, query: String) -> Result<T, FetchError> {
        debug!("posting query to {}", self.endpoint);
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse<T> = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("failed to parse response: {}", e)))?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(FetchError::Query(joined));
            }
        }

        envelope
            .data
            .ok_or_else(|| FetchError::Decode("missing data in response".to_string()))
    }
}

impl RecordSource for SubgraphSource {
    async fn fetch_records(&self, first: usize) -> Result<Vec<RawRecord>, FetchError> {
        let query = format!(
            "{{ indexers(first: {}) {{ id stakedTokens delegatedTokens queryFeesCollected }} }}",
            first
        );
        let batch: IndexerBatch = self.execute(query).await?;
        Ok(batch.indexers.into_iter().map(IndexerRow::into_raw).collect())
    }
}

impl UsageSource for SubgraphSource {
    async fn fetch_daily_usage(&self, first: usize) -> Result<Vec<DailyUsagePoint>, FetchError> {
        let query = format!(
            "{{ dexAmmProtocols(first: 1) {{ dailyUsageMetrics(first: {}) {{ timestamp dailySwapCount }} }} }}",
            first
        );
        let batch: ProtocolBatch = self.execute(query).await?;

        let protocol = match batch.protocols.into_iter().next() {
            Some(p) => p,
            None => {
                warn!("no protocol entities in response, returning empty series");
                return Ok(Vec::new());
            }
        };

        let mut points: Vec<DailyUsagePoint> = Vec::with_capacity(protocol.daily_usage_metrics.len());
        for row in protocol.daily_usage_metrics {
            match row.timestamp.parse::<u64>() {
                Ok(timestamp) => points.push(DailyUsagePoint {
                    timestamp,
                    swap_count: row.daily_swap_count,
                }),
                Err(_) => {
                    warn!("skipping usage point with unparsable timestamp '{}'", row.timestamp);
                }
            }
        }
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }
}
