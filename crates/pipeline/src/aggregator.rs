//! # Metric Aggregation
//!
//! Derives per-record metrics from raw minor-unit fields.
//!
//! ## Role
//!
//! The aggregator is a pure stage:
//!
//! - Does NOT perform IO
//! - Does NOT fail: an unparsable or missing numeric field is treated
//!   as zero and reported through the logging hook
//! - Only PRODUCES derived values
//!
//! ## Numeric Semantics
//!
//! Raw values are decimal-string integers in `10^decimals` minor units
//! and are converted integer-first (see `subrank_common::numeric`).
//! `total_stake` is staked plus delegated tokens. The power ranking is
//! `collected_fees / total_stake` when the stake is positive; a
//! zero-stake record gets `None`, never zero and never infinity.

use tracing::warn;

use subrank_common::numeric::parse_minor_units;
use subrank_common::fields;

use crate::types::{DerivedMetrics, EnrichedRecord, Record};

/// Derives metrics for one record.
///
/// The display label falls back to the record id when no auxiliary
/// label was resolved.
pub fn aggregate(record: &Record, decimals: u32) -> EnrichedRecord {
    let staked = parse_field(record, fields::STAKED_TOKENS, decimals);
    let delegated = parse_field(record, fields::DELEGATED_TOKENS, decimals);
    let collected_fees = parse_field(record, fields::QUERY_FEES_COLLECTED, decimals);

    let total_stake = staked + delegated;
    let power_ranking = if total_stake > 0.0 {
        Some(collected_fees / total_stake)
    } else {
        None
    };

    EnrichedRecord {
        id: record.id.clone(),
        label: record.label.clone().unwrap_or_else(|| record.id.clone()),
        fields: record.fields.clone(),
        metrics: DerivedMetrics {
            total_stake,
            collected_fees,
            power_ranking,
        },
    }
}

fn parse_field(record: &Record, name: &str, decimals: u32) -> f64 {
    match record.fields.get(name) {
        Some(raw) => match parse_minor_units(raw, decimals) {
            Some(value) => value,
            None => {
                warn!(
                    "unparsable field {} = '{}' on record {}, treating as zero",
                    name, raw, record.id
                );
                0.0
            }
        },
        None => {
            warn!("missing field {} on record {}, treating as zero", name, record.id);
            0.0
        }
    }
}
