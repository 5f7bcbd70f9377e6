//! Decimal money amounts and the precision policy for stored prices.
//!
//! Prices are kept as exact decimals end to end; binary floating point never
//! touches an amount. Persisted amounts carry up to [`STORED_SCALE`] fractional
//! digits, while anything shown to (or compared on behalf of) an operator is
//! rounded to [`DISPLAY_SCALE`], currency cents.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};

/// Fractional digits retained by the storage layer.
pub const STORED_SCALE: u32 = 6;

/// Fractional digits used for display and cent-level comparison.
pub const DISPLAY_SCALE: u32 = 2;

/// Parse a boundary string into a decimal amount.
///
/// Fails with [`DomainError::MalformedNumber`] instead of coercing; `"12.5kg"`
/// is an error, not `12.5`.
pub fn parse_amount(input: &str) -> DomainResult<Decimal> {
    input
        .trim()
        .parse::<Decimal>()
        .map_err(|_| DomainError::malformed_number(input.trim().to_string()))
}

/// Round an amount to cent precision for display or comparison.
///
/// Half-way cases round away from zero, matching how storefront operators
/// expect `0.005` to become `0.01`.
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp an amount to the storage precision.
///
/// Intermediate arithmetic keeps full precision; this runs only when a price is
/// committed.
pub fn quantize_stored(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(STORED_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_amounts() {
        assert_eq!(parse_amount("19.99").unwrap(), Decimal::new(1999, 2));
        assert_eq!(parse_amount(" 100 ").unwrap(), Decimal::from(100));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_malformed_amounts() {
        for input in ["12.5kg", "", "1,000", "NaN"] {
            match parse_amount(input) {
                Err(DomainError::MalformedNumber(_)) => {}
                other => panic!("expected MalformedNumber for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn display_rounding_is_half_up() {
        assert_eq!(round_display(Decimal::new(5, 3)), Decimal::new(1, 2)); // 0.005 -> 0.01
        assert_eq!(round_display(Decimal::new(1249, 3)), Decimal::new(125, 2)); // 1.249 -> 1.25
        assert_eq!(round_display(Decimal::from(120)), Decimal::from(120));
    }

    #[test]
    fn stored_precision_keeps_six_places() {
        let third = Decimal::from(100) / Decimal::from(3);
        assert_eq!(quantize_stored(third), "33.333333".parse::<Decimal>().unwrap());
    }
}
