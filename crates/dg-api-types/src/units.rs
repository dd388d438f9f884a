//! Exact conversion between base-unit integers and decimal strings.
//!
//! Works on digit strings rather than floats so that 18-decimal tokens keep
//! every digit.

use crate::TokenAmount;
use primitive_types::U256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount is not a decimal number: {0}")]
    Malformed(String),
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount has {digits} fractional digits but the token only has {decimals}")]
    ExcessPrecision { digits: usize, decimals: u8 },
    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// A strictly positive decimal typed by the user, not yet scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalAmount {
    whole: String,
    fraction: String,
}

impl DecimalAmount {
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountError::Malformed(trimmed.to_owned()));
        }

        let whole = whole.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');
        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountError::NotPositive);
        }

        Ok(Self {
            whole: whole.to_owned(),
            fraction: fraction.to_owned(),
        })
    }

    /// Scale by 10^decimals into base units.
    pub fn to_base_units(&self, decimals: u8) -> Result<TokenAmount, AmountError> {
        let scale = usize::from(decimals);
        if self.fraction.len() > scale {
            return Err(AmountError::ExcessPrecision {
                digits: self.fraction.len(),
                decimals,
            });
        }

        let mut digits = String::with_capacity(self.whole.len() + scale);
        digits.push_str(&self.whole);
        digits.push_str(&self.fraction);
        digits.extend(std::iter::repeat_n('0', scale - self.fraction.len()));

        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(TokenAmount::ZERO);
        }
        U256::from_dec_str(digits)
            .map(TokenAmount)
            .map_err(|_| AmountError::Overflow)
    }
}

/// Parse a user string straight into base units.
pub fn parse_units(input: &str, decimals: u8) -> Result<TokenAmount, AmountError> {
    DecimalAmount::parse(input)?.to_base_units(decimals)
}

/// Render `raw / 10^decimals` exactly. The fraction keeps at least one digit.
pub fn format_units(raw: &TokenAmount, decimals: u8) -> String {
    let digits = raw.0.to_string();
    let scale = usize::from(decimals);
    if scale == 0 {
        return format!("{digits}.0");
    }

    let padded = if digits.len() <= scale {
        let mut p = "0".repeat(scale + 1 - digits.len());
        p.push_str(&digits);
        p
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - scale);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_one_and_a_half_tokens_exactly() {
        let raw = TokenAmount::from_u128(1_500_000_000_000_000_000);
        assert_eq!(format_units(&raw, 18), "1.5");
    }

    #[test]
    fn formats_whole_and_tiny_values() {
        assert_eq!(format_units(&TokenAmount::from_u128(1_000_000_000_000_000_000), 18), "1.0");
        assert_eq!(format_units(&TokenAmount::ZERO, 18), "0.0");
        assert_eq!(format_units(&TokenAmount::from_u128(5), 18), "0.000000000000000005");
        assert_eq!(format_units(&TokenAmount::from_u128(1_234_567), 6), "1.234567");
        assert_eq!(format_units(&TokenAmount::from_u128(42), 0), "42.0");
    }

    #[test]
    fn formats_values_beyond_u128() {
        let raw = TokenAmount(U256::from_dec_str("340282366920938463463374607431768211456000").unwrap());
        assert_eq!(format_units(&raw, 18), "340282366920938463463374.607431768211456");
    }

    #[test]
    fn parses_plain_and_fractional_amounts() {
        assert_eq!(
            parse_units("1.5", 18).unwrap(),
            TokenAmount::from_u128(1_500_000_000_000_000_000)
        );
        assert_eq!(parse_units("  10 ", 6).unwrap(), TokenAmount::from_u128(10_000_000));
        assert_eq!(parse_units(".25", 2).unwrap(), TokenAmount::from_u128(25));
        assert_eq!(parse_units("007.10", 2).unwrap(), TokenAmount::from_u128(710));
    }

    #[test]
    fn rejects_non_positive_and_malformed_input() {
        assert_eq!(DecimalAmount::parse(""), Err(AmountError::Empty));
        assert_eq!(DecimalAmount::parse("0"), Err(AmountError::NotPositive));
        assert_eq!(DecimalAmount::parse("0.000"), Err(AmountError::NotPositive));
        for bad in ["-1", "abc", "1e5", "1,5", "1.2.3", ".", "+3"] {
            assert!(
                matches!(DecimalAmount::parse(bad), Err(AmountError::Malformed(_))),
                "{bad} should be malformed"
            );
        }
    }

    #[test]
    fn rejects_more_fraction_digits_than_decimals() {
        let amount = DecimalAmount::parse("0.123").unwrap();
        assert_eq!(
            amount.to_base_units(2),
            Err(AmountError::ExcessPrecision { digits: 3, decimals: 2 })
        );
    }

    #[test]
    fn rejects_overflowing_amounts() {
        let huge = "9".repeat(80);
        assert_eq!(parse_units(&huge, 0), Err(AmountError::Overflow));
    }
}
