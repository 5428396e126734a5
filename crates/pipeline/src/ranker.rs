//! Stable ranking over a derived metric.
//!
//! Sorts descending by the chosen metric and assigns contiguous 1-based
//! ranks. The sort is stable, so records with equal metric values keep
//! their relative fetch order; that stability is load-bearing for
//! reproducible fixtures. Records whose chosen metric is absent are
//! excluded from the output entirely.

use crate::types::{EnrichedRecord, MetricKey, RankedRecord};

/// Ranks `records` descending by `metric`.
#[must_use]
pub fn rank(records: Vec<EnrichedRecord>, metric: MetricKey) -> Vec<RankedRecord> {
    let mut keyed: Vec<(f64, EnrichedRecord)> = records
        .into_iter()
        .filter_map(|record| record.metrics.get(metric).map(|value| (value, record)))
        .collect();

    // total_cmp gives a total order over f64, keeping the sort stable
    // even on exact ties.
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));

    keyed
        .into_iter()
        .enumerate()
        .map(|(idx, (_, record))| RankedRecord {
            rank: idx as u32 + 1,
            record,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DerivedMetrics;
    use std::collections::HashMap;

    fn with_ranking(id: &str, power_ranking: Option<f64>) -> EnrichedRecord {
        EnrichedRecord {
            id: id.to_string(),
            label: id.to_string(),
            fields: HashMap::new(),
            metrics: DerivedMetrics {
                total_stake: 1.0,
                collected_fees: 1.0,
                power_ranking,
            },
        }
    }

    #[test]
    fn test_ranks_descending() {
        let ranked = rank(
            vec![
                with_ranking("low", Some(0.001)),
                with_ranking("high", Some(0.01)),
                with_ranking("mid", Some(0.005)),
            ],
            MetricKey::PowerRanking,
        );

        let ids: Vec<&str> = ranked.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ranks_are_contiguous_from_one() {
        let ranked = rank(
            vec![
                with_ranking("a", Some(3.0)),
                with_ranking("b", Some(1.0)),
                with_ranking("c", Some(2.0)),
                with_ranking("d", Some(4.0)),
            ],
            MetricKey::PowerRanking,
        );

        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let ranked = rank(
            vec![
                with_ranking("first", Some(0.005)),
                with_ranking("second", Some(0.005)),
                with_ranking("third", Some(0.005)),
            ],
            MetricKey::PowerRanking,
        );

        let ids: Vec<&str> = ranked.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_tie_among_mixed_values_keeps_fetch_order() {
        let ranked = rank(
            vec![
                with_ranking("a", Some(0.002)),
                with_ranking("b", Some(0.009)),
                with_ranking("c", Some(0.002)),
            ],
            MetricKey::PowerRanking,
        );

        let ids: Vec<&str> = ranked.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_absent_metric_records_are_excluded() {
        let ranked = rank(
            vec![
                with_ranking("a", Some(0.002)),
                with_ranking("no-metric", None),
                with_ranking("b", Some(0.001)),
            ],
            MetricKey::PowerRanking,
        );

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.record.id != "no-metric"));
        // Ranks stay contiguous after the exclusion.
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_empty_input() {
        let ranked = rank(Vec::new(), MetricKey::PowerRanking);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_by_always_present_metric() {
        let mut a = with_ranking("a", None);
        a.metrics.total_stake = 10.0;
        let mut b = with_ranking("b", None);
        b.metrics.total_stake = 20.0;

        let ranked = rank(vec![a, b], MetricKey::TotalStake);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].record.id, "b");
    }
}
