//! Exact base-unit amount handling.
//!
//! Campaign amounts live on chain as unsigned integers in the token's
//! smallest denomination (micro units, 6 decimal places). User input is a
//! decimal string; conversion is pure digit-string arithmetic so that no
//! value ever passes through floating point.

use std::fmt;

use crate::error::ClientError;

/// Number of decimal places between the display unit and the base unit.
pub const BASE_UNIT_DECIMALS: u32 = 6;

const BASE_UNIT_FACTOR: u128 = 10u128.pow(BASE_UNIT_DECIMALS);

/// A non-negative amount in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    /// Wrap a raw base-unit value.
    pub const fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    /// Parse a user-facing decimal string (e.g. `"12.5"`) into base units.
    ///
    /// Accepts an optional fractional part of up to [`BASE_UNIT_DECIMALS`]
    /// digits. Rejects empty input, signs, exponents, and anything that
    /// would lose precision.
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ClientError::InvalidArgument(
                "amount must not be empty".to_string(),
            ));
        }

        let (whole, frac) = match input.split_once('.') {
            Some((w, f)) => (w, f),
            None => (input, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid(input));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid(input));
        }
        if frac.len() > BASE_UNIT_DECIMALS as usize {
            return Err(ClientError::InvalidArgument(format!(
                "amount '{}' has more than {} decimal places",
                input, BASE_UNIT_DECIMALS
            )));
        }

        let whole_units: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid(input))?
        };
        let frac_units: u128 = if frac.is_empty() {
            0
        } else {
            // Right-pad to the full decimal width: "5" at 6 decimals is 500000.
            let scale = 10u128.pow(BASE_UNIT_DECIMALS - frac.len() as u32);
            let digits: u128 = frac.parse().map_err(|_| invalid(input))?;
            digits * scale
        };

        whole_units
            .checked_mul(BASE_UNIT_FACTOR)
            .and_then(|w| w.checked_add(frac_units))
            .map(Self)
            .ok_or_else(|| {
                ClientError::InvalidArgument(format!("amount '{}' is too large", input))
            })
    }

    /// Raw value in base units.
    pub const fn base_units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    /// Renders in display units with trailing zeros trimmed (`1.5`, not
    /// `1.500000`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BASE_UNIT_FACTOR;
        let frac = self.0 % BASE_UNIT_FACTOR;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            let frac = format!("{:0width$}", frac, width = BASE_UNIT_DECIMALS as usize);
            write!(f, "{}.{}", whole, frac.trim_end_matches('0'))
        }
    }
}

fn invalid(input: &str) -> ClientError {
    ClientError::InvalidArgument(format!("amount '{}' is not a valid decimal number", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(Amount::parse("5").unwrap().base_units(), 5_000_000);
        assert_eq!(Amount::parse("0").unwrap().base_units(), 0);
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(Amount::parse("1.5").unwrap().base_units(), 1_500_000);
        assert_eq!(Amount::parse("0.000001").unwrap().base_units(), 1);
        assert_eq!(Amount::parse(".25").unwrap().base_units(), 250_000);
        assert_eq!(Amount::parse("3.").unwrap().base_units(), 3_000_000);
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        let err = Amount::parse("0.0000001").unwrap_err();
        assert!(err.to_string().contains("decimal places"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "abc", "-1", "+2", "1e6", "1.2.3", ".", "1,5"] {
            assert!(
                matches!(Amount::parse(bad), Err(ClientError::InvalidArgument(_))),
                "expected rejection for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(Amount::parse(&huge).is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for (input, rendered) in [("5", "5"), ("1.5", "1.5"), ("0.000001", "0.000001")] {
            let amount = Amount::parse(input).unwrap();
            assert_eq!(amount.to_string(), rendered);
        }
    }

    #[test]
    fn test_is_zero() {
        assert!(Amount::parse("0").unwrap().is_zero());
        assert!(Amount::parse("0.0").unwrap().is_zero());
        assert!(!Amount::parse("0.000001").unwrap().is_zero());
    }
}
