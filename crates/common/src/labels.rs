//! Name-service label resolution.
//!
//! Maps an address-like id to zero-or-one registered display name by
//! querying a name-service subgraph. An empty result set is `Ok(None)`,
//! not an error; the fetch stage degrades the label for that record.

use std::time::Duration;

use serde::Deserialize;

use crate::config::PipelineConfig;
use crate::source::{LabelError, LabelSource};

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<DomainBatch>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DomainBatch {
    domains: Vec<DomainRow>,
}

#[derive(Debug, Deserialize)]
struct DomainRow {
    // Nullable in the source schema.
    name: Option<String>,
}

/// GraphQL-backed label source over a name-service subgraph.
#[derive(Debug, Clone)]
pub struct NameServiceSource {
    endpoint: String,
    client: reqwest::Client,
}

impl NameServiceSource {
    /// Creates a source against `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Result<Self, LabelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| LabelError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Creates a source for the configured label subgraph endpoint.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, LabelError> {
        Self::new(config.label_endpoint(), config.timeout_ms)
    }
}

impl LabelSource for NameServiceSource {
    async fn lookup_label(&self, id: &str) -> Result<Option<String>, LabelError> {
        let query = format!(
            r#"{{ domains(first: 1, where: {{ resolvedAddress: "{}" }}) {{ name }} }}"#,
            id
        );
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LabelError::Timeout
                } else {
                    LabelError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LabelError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse = resp
            .json()
            .await
            .map_err(|e| LabelError::Decode(format!("failed to parse response: {}", e)))?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(LabelError::Query(joined));
            }
        }

        let batch = match envelope.data {
            Some(b) => b,
            None => return Err(LabelError::Decode("missing data in response".to_string())),
        };

        Ok(batch.domains.into_iter().next().and_then(|d| d.name))
    }
}
