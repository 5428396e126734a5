//! Record types flowing through the pipeline stages.
//!
//! Each fetch cycle rebuilds these values from scratch; nothing is
//! mutated or cached across cycles.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A primary record joined with its auxiliary label lookup result.
///
/// `label` is `None` when the lookup failed or resolved nothing; the
/// aggregation stage falls back to the id for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Address-like unique identifier within a batch.
    pub id: String,
    /// Named numeric-string attributes in minor units.
    pub fields: HashMap<String, String>,
    /// Resolved display name, if any.
    pub label: Option<String>,
}

/// Key selecting one derived metric for filtering or ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Staked plus delegated tokens, in scaled token units.
    TotalStake,
    /// Cumulative query fees collected, in scaled token units.
    CollectedFees,
    /// Fees per unit of stake; absent when stake is zero.
    PowerRanking,
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKey::TotalStake => "total_stake",
            MetricKey::CollectedFees => "collected_fees",
            MetricKey::PowerRanking => "power_ranking",
        };
        write!(f, "{}", name)
    }
}

/// Metrics derived from a record's raw fields.
///
/// `power_ranking` is an explicit option, never a sentinel: a zero-stake
/// record has no defined ratio and must be excluded downstream rather
/// than ranked as infinitely powerful or silently zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Staked plus delegated tokens, in scaled token units.
    pub total_stake: f64,
    /// Cumulative query fees collected, in scaled token units.
    pub collected_fees: f64,
    /// `collected_fees / total_stake`, or `None` when `total_stake` is zero.
    pub power_ranking: Option<f64>,
}

impl DerivedMetrics {
    /// Keyed metric access for declarative predicates and ranking.
    #[must_use]
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::TotalStake => Some(self.total_stake),
            MetricKey::CollectedFees => Some(self.collected_fees),
            MetricKey::PowerRanking => self.power_ranking,
        }
    }
}

/// A record with derived metrics and a resolved display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// Address-like unique identifier within a batch.
    pub id: String,
    /// Display label: the resolved name, or the id when unresolved.
    pub label: String,
    /// Raw numeric-string attributes, kept for presenter access.
    pub fields: HashMap<String, String>,
    /// Metrics derived from `fields`.
    pub metrics: DerivedMetrics,
}

/// An enriched record with its 1-based position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    /// 1-based rank; contiguous within one ranking output.
    pub rank: u32,
    /// The ranked record.
    pub record: EnrichedRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_key_access() {
        let metrics = DerivedMetrics {
            total_stake: 1000.0,
            collected_fees: 5.0,
            power_ranking: Some(0.005),
        };
        assert_eq!(metrics.get(MetricKey::TotalStake), Some(1000.0));
        assert_eq!(metrics.get(MetricKey::CollectedFees), Some(5.0));
        assert_eq!(metrics.get(MetricKey::PowerRanking), Some(0.005));
    }

    #[test]
    fn test_power_ranking_can_be_absent() {
        let metrics = DerivedMetrics {
            total_stake: 0.0,
            collected_fees: 5.0,
            power_ranking: None,
        };
        assert_eq!(metrics.get(MetricKey::PowerRanking), None);
        // The always-present metrics stay available.
        assert_eq!(metrics.get(MetricKey::TotalStake), Some(0.0));
    }

    #[test]
    fn test_metric_key_display() {
        assert_eq!(format!("{}", MetricKey::PowerRanking), "power_ranking");
        assert_eq!(format!("{}", MetricKey::TotalStake), "total_stake");
    }

    #[test]
    fn test_ranked_record_serializes_absent_metric_as_null() {
        let ranked = RankedRecord {
            rank: 1,
            record: EnrichedRecord {
                id: "0xaa".to_string(),
                label: "0xaa".to_string(),
                fields: HashMap::new(),
                metrics: DerivedMetrics {
                    total_stake: 0.0,
                    collected_fees: 0.0,
                    power_ranking: None,
                },
            },
        };
        let json = serde_json::to_string(&ranked).expect("serialize");
        assert!(json.contains("\"power_ranking\":null"));
    }
}
