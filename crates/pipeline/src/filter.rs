//! Declarative record filtering.
//!
//! Predicates are configuration, not code: a predicate names a metric,
//! a comparison operator, and a threshold, and deserializes from the
//! same formats as the rest of the configuration so the one pipeline
//! serves different thresholds per deployment.

use serde::{Deserialize, Serialize};

use crate::types::{DerivedMetrics, EnrichedRecord, MetricKey};

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Strictly greater than the threshold.
    Gt,
    /// Greater than or equal to the threshold (inclusive bound).
    Gte,
    /// Strictly less than the threshold.
    Lt,
    /// Less than or equal to the threshold.
    Lte,
}

impl Op {
    fn eval(self, value: f64, threshold: f64) -> bool {
        match self {
            Op::Gt => value > threshold,
            Op::Gte => value >= threshold,
            Op::Lt => value < threshold,
            Op::Lte => value <= threshold,
        }
    }
}

/// One inclusion predicate over a derived metric.
///
/// A predicate over an absent metric evaluates false: a record whose
/// ranking metric is undefined can never reach the output through a
/// predicate set that references that metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Metric the predicate reads.
    pub metric: MetricKey,
    /// Comparison operator.
    pub op: Op,
    /// Threshold in the metric's own units.
    pub threshold: f64,
}

impl Predicate {
    /// `metric >= threshold`.
    #[must_use]
    pub fn at_least(metric: MetricKey, threshold: f64) -> Self {
        Self {
            metric,
            op: Op::Gte,
            threshold,
        }
    }

    /// `metric > threshold`.
    #[must_use]
    pub fn above(metric: MetricKey, threshold: f64) -> Self {
        Self {
            metric,
            op: Op::Gt,
            threshold,
        }
    }

    /// Evaluates the predicate against one record's metrics.
    #[must_use]
    pub fn matches(&self, metrics: &DerivedMetrics) -> bool {
        match metrics.get(self.metric) {
            Some(value) => self.op.eval(value, self.threshold),
            None => false,
        }
    }

    /// Default predicate set for the indexer use case: total stake at
    /// least `stake_threshold` (inclusive) and collected fees strictly
    /// above `fee_threshold`.
    #[must_use]
    pub fn default_set(stake_threshold: f64, fee_threshold: f64) -> Vec<Predicate> {
        vec![
            Predicate::at_least(MetricKey::TotalStake, stake_threshold),
            Predicate::above(MetricKey::CollectedFees, fee_threshold),
        ]
    }
}

/// Keeps the records satisfying every predicate, preserving order.
#[must_use]
pub fn apply_filters(records: Vec<EnrichedRecord>, predicates: &[Predicate]) -> Vec<EnrichedRecord> {
    records
        .into_iter()
        .filter(|record| predicates.iter().all(|p| p.matches(&record.metrics)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn enriched(id: &str, total_stake: f64, collected_fees: f64) -> EnrichedRecord {
        let power_ranking = if total_stake > 0.0 {
            Some(collected_fees / total_stake)
        } else {
            None
        };
        EnrichedRecord {
            id: id.to_string(),
            label: id.to_string(),
            fields: HashMap::new(),
            metrics: DerivedMetrics {
                total_stake,
                collected_fees,
                power_ranking,
            },
        }
    }

    #[test]
    fn test_default_set_keeps_qualifying_record() {
        let predicates = Predicate::default_set(100_000.0, 0.0);
        let kept = apply_filters(vec![enriched("a", 150_000.0, 10.0)], &predicates);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_stake_threshold_is_inclusive() {
        let predicates = Predicate::default_set(100_000.0, 0.0);

        let kept = apply_filters(vec![enriched("a", 100_000.0, 1.0)], &predicates);
        assert_eq!(kept.len(), 1, "exact threshold must be included");

        let kept = apply_filters(vec![enriched("b", 99_999.0, 1.0)], &predicates);
        assert!(kept.is_empty(), "below threshold must be excluded");
    }

    #[test]
    fn test_fee_threshold_is_exclusive() {
        let predicates = Predicate::default_set(100_000.0, 0.0);
        let kept = apply_filters(vec![enriched("a", 150_000.0, 0.0)], &predicates);
        assert!(kept.is_empty(), "zero fees must not pass fees > 0");
    }

    #[test]
    fn test_predicate_over_absent_metric_fails() {
        let p = Predicate::above(MetricKey::PowerRanking, 0.0);
        // Zero stake: power ranking is absent.
        assert!(!p.matches(&enriched("a", 0.0, 50.0).metrics));
    }

    #[test]
    fn test_filter_preserves_order() {
        let predicates = Predicate::default_set(100.0, 0.0);
        let records = vec![
            enriched("a", 200.0, 1.0),
            enriched("b", 50.0, 1.0),
            enriched("c", 300.0, 2.0),
            enriched("d", 150.0, 3.0),
        ];

        let kept = apply_filters(records, &predicates);
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_empty_predicate_set_keeps_everything() {
        let records = vec![enriched("a", 0.0, 0.0), enriched("b", 1.0, 0.0)];
        let kept = apply_filters(records, &[]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_op_semantics() {
        assert!(Op::Gt.eval(2.0, 1.0));
        assert!(!Op::Gt.eval(1.0, 1.0));
        assert!(Op::Gte.eval(1.0, 1.0));
        assert!(Op::Lt.eval(0.5, 1.0));
        assert!(!Op::Lt.eval(1.0, 1.0));
        assert!(Op::Lte.eval(1.0, 1.0));
    }

    #[test]
    fn test_predicate_deserializes_from_config() {
        let json = r#"{ "metric": "total_stake", "op": "gte", "threshold": 100000.0 }"#;
        let p: Predicate = serde_json::from_str(json).expect("deserialize");
        assert_eq!(p, Predicate::at_least(MetricKey::TotalStake, 100_000.0));
    }
}
