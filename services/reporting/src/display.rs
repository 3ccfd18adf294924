//! Decimal formatting for display columns

use rust_decimal::{Decimal, RoundingStrategy};

/// Quote assets whose prices are shown with two decimals
const FIAT_LIKE_QUOTES: [&str; 2] = ["USDT", "BUSD"];

/// Round half away from zero to `decimals` places and pad with zeros
#[must_use]
pub fn fixed(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}", prec = decimals as usize)
}

/// Like [`fixed`], but a negative value that rounds to zero keeps its `-`
#[must_use]
pub fn signed_fixed(value: Decimal, decimals: u32) -> String {
    let amount = fixed(value, decimals);
    if value.is_sign_negative() && !value.is_zero() && !amount.starts_with('-') {
        format!("-{amount}")
    } else {
        amount
    }
}

/// Value with trailing fractional zeros removed
#[must_use]
pub fn trimmed(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Significant fractional digits, ignoring trailing zeros
#[must_use]
pub fn fractional_digits(value: Decimal) -> u32 {
    value.normalize().scale()
}

/// Price precision for a symbol: 2 for USDT/BUSD quoted pairs, 8 otherwise
#[must_use]
pub fn price_decimals(symbol: &str) -> u32 {
    if FIAT_LIKE_QUOTES.iter().any(|quote| symbol.ends_with(quote)) {
        2
    } else {
        8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(27000.5), 2, "27000.50")]
    #[case(dec!(1.005), 2, "1.01")]
    #[case(dec!(-1.005), 2, "-1.01")]
    #[case(dec!(0.123456789), 8, "0.12345679")]
    #[case(dec!(10), 4, "10.0000")]
    #[case(dec!(0.5), 0, "1")]
    fn test_fixed(#[case] value: Decimal, #[case] decimals: u32, #[case] expected: &str) {
        assert_eq!(fixed(value, decimals), expected);
    }

    #[rstest]
    #[case(dec!(-0.001), "-0.00")]
    #[case(dec!(-0.004), "-0.00")]
    #[case(dec!(-0.005), "-0.01")]
    #[case(dec!(0.001), "0.00")]
    #[case(dec!(0), "0.00")]
    #[case(dec!(3.14159), "3.14")]
    fn test_signed_fixed(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(signed_fixed(value, 2), expected);
    }

    #[rstest]
    #[case(dec!(0.0010), "0.001")]
    #[case(dec!(100.000), "100")]
    #[case(dec!(1.5), "1.5")]
    fn test_trimmed(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(trimmed(value), expected);
    }

    #[rstest]
    #[case(dec!(0.01350000), 4)]
    #[case(dec!(0.00001234), 8)]
    #[case(dec!(5), 0)]
    #[case(dec!(0), 0)]
    fn test_fractional_digits(#[case] value: Decimal, #[case] expected: u32) {
        assert_eq!(fractional_digits(value), expected);
    }

    #[rstest]
    #[case("BTCUSDT", 2)]
    #[case("ETHBUSD", 2)]
    #[case("ETHBTC", 8)]
    #[case("BTCUSD_PERP", 8)]
    fn test_price_decimals(#[case] symbol: &str, #[case] expected: u32) {
        assert_eq!(price_decimals(symbol), expected);
    }
}
