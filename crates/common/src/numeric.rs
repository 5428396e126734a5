//! Minor-unit token amount parsing.
//!
//! Source ledgers store token amounts as decimal-string integers scaled by
//! `10^decimals` (18 by convention). Parsing those strings directly as
//! floating point loses precision for large values, so conversion goes
//! integer-first: parse the full string as `u128`, split into whole and
//! fractional minor-unit parts, and convert to `f64` last.

/// Largest decimal exponent whose power of ten fits in a `u128`.
const MAX_DECIMALS: u32 = 38;

/// Parses a decimal-string integer in `10^decimals` minor units into a
/// token quantity.
///
/// Returns `None` when the input is not a plain non-negative decimal
/// integer (or `decimals` exceeds [`MAX_DECIMALS`]). Callers decide the
/// fallback policy; the aggregation stage treats `None` as zero and logs
/// a warning.
///
/// # Examples
///
/// ```
/// use subrank_common::numeric::parse_minor_units;
///
/// assert_eq!(parse_minor_units("100000000000000000000", 18), Some(100.0));
/// assert_eq!(parse_minor_units("0", 18), Some(0.0));
/// assert_eq!(parse_minor_units("not-a-number", 18), None);
/// ```
pub fn parse_minor_units(raw: &str, decimals: u32) -> Option<f64> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let units: u128 = raw.trim().parse().ok()?;
    let scale = 10u128.pow(decimals);
    let whole = (units / scale) as f64;
    let frac = (units % scale) as f64 / scale as f64;
    Some(whole + frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_exact_whole_amount() {
        // 1e20 minor units at 18 decimals is exactly 100 tokens.
        assert_eq!(parse_minor_units("100000000000000000000", 18), Some(100.0));
    }

    #[test]
    fn test_zero_is_zero() {
        assert_eq!(parse_minor_units("0", 18), Some(0.0));
    }

    #[test]
    fn test_fractional_part() {
        // 1.5 tokens.
        assert_eq!(parse_minor_units("1500000000000000000", 18), Some(1.5));
    }

    #[test]
    fn test_sub_token_amount() {
        let value = parse_minor_units("250000000000000000", 18).expect("parse");
        assert!((value - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_large_amount_keeps_whole_precision() {
        // 100_000 tokens: the threshold boundary must come out exact.
        assert_eq!(
            parse_minor_units("100000000000000000000000", 18),
            Some(100_000.0)
        );
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(parse_minor_units("12345", 0), Some(12345.0));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_minor_units("not-a-number", 18), None);
        assert_eq!(parse_minor_units("", 18), None);
        assert_eq!(parse_minor_units("12.5", 18), None);
        assert_eq!(parse_minor_units("-5", 18), None);
        assert_eq!(parse_minor_units("0x1f", 18), None);
    }

    #[test]
    fn test_rejects_overflowing_input() {
        // 40 digits exceeds u128 range.
        let raw = "9".repeat(40);
        assert_eq!(parse_minor_units(&raw, 18), None);
    }

    #[test]
    fn test_rejects_unsupported_decimals() {
        assert_eq!(parse_minor_units("1000", 39), None);
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(parse_minor_units(" 1000000000000000000 ", 18), Some(1.0));
    }
}
