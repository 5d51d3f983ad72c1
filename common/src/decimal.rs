//! Fixed-point decimal with 18 fractional digits.
//!
//! Stored as the raw scaled integer, which is also what the ABI surface
//! carries: one share is `10^18`.

use alloy_primitives::{U256, U512};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

use crate::{
    config::DECIMAL_PRECISION,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("decimal overflow")]
    Overflow,
    #[error("decimal underflow")]
    Underflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid decimal string: {0}")]
    Parse(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Decimal(U256);

impl Decimal {
    pub fn precision_multiplier() -> U256 {
        U256::from(10).pow(U256::from(DECIMAL_PRECISION))
    }

    pub const fn zero() -> Self {
        Decimal(U256::ZERO)
    }

    pub fn one() -> Self {
        Decimal(Self::precision_multiplier())
    }

    /// Wrap an already scaled value
    pub const fn from_raw(raw: U256) -> Self {
        Decimal(raw)
    }

    pub fn from_int(value: U256) -> Result<Self, DecimalError> {
        value
            .checked_mul(Self::precision_multiplier())
            .map(Decimal)
            .ok_or(DecimalError::Overflow)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: &Decimal) -> Result<Self, DecimalError> {
        self.0
            .checked_add(other.0)
            .map(Decimal)
            .ok_or(DecimalError::Overflow)
    }

    pub fn checked_sub(&self, other: &Decimal) -> Result<Self, DecimalError> {
        self.0
            .checked_sub(other.0)
            .map(Decimal)
            .ok_or(DecimalError::Underflow)
    }

    /// `self * value / divisor`, exact intermediate product
    pub fn mul_div(&self, value: U256, divisor: U256) -> Result<Self, DecimalError> {
        if divisor.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        let product = U512::from(self.0) * U512::from(value) / U512::from(divisor);
        U256::checked_from_limbs_slice(product.as_limbs())
            .map(Decimal)
            .ok_or(DecimalError::Overflow)
    }

    /// `value * self / total`, truncated to an integer
    pub fn mul_int_div(&self, value: U256, total: &Decimal) -> Result<U256, DecimalError> {
        if total.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        let product = U512::from(self.0) * U512::from(value) / U512::from(total.0);
        U256::checked_from_limbs_slice(product.as_limbs()).ok_or(DecimalError::Overflow)
    }

    /// Integer part, fraction dropped
    pub fn truncate(&self) -> U256 {
        self.0 / Self::precision_multiplier()
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let multiplier = Self::precision_multiplier();
        let int = self.0 / multiplier;
        let frac = self.0 % multiplier;
        write!(
            f,
            "{}.{:0>width$}",
            int,
            frac.to_string(),
            width = DECIMAL_PRECISION as usize
        )
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (int, frac) = match s.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (s, ""),
        };
        if int.is_empty() || frac.len() > DECIMAL_PRECISION as usize {
            return Err(DecimalError::Parse(s.to_owned()));
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(DecimalError::Parse(s.to_owned()));
        }

        let int = U256::from_str_radix(int, 10).map_err(|_| DecimalError::Parse(s.to_owned()))?;
        let mut padded = frac.to_owned();
        while padded.len() < DECIMAL_PRECISION as usize {
            padded.push('0');
        }
        let frac = U256::from_str_radix(&padded, 10).map_err(|_| DecimalError::Parse(s.to_owned()))?;

        Decimal::from_int(int)?
            .checked_add(&Decimal(frac))
    }
}

impl Serializer for Decimal {
    fn write(&self, writer: &mut Writer) {
        writer.write_u256(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Decimal(reader.read_u256()?))
    }

    fn size(&self) -> usize {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_display_pads_fraction() {
        let d = Decimal::from_raw(U256::from(1_500_000_000_000_000_000u64));
        assert_eq!(d.to_string(), "1.500000000000000000");
        assert_eq!(Decimal::zero().to_string(), "0.000000000000000000");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Decimal::from_str("1").unwrap(), Decimal::one());
        assert_eq!(
            Decimal::from_str("0.000000000000000001").unwrap().raw(),
            U256::from(1)
        );
        assert!(Decimal::from_str("1.0000000000000000001").is_err());
        assert!(Decimal::from_str(".5").is_err());
        assert!(Decimal::from_str("1.-5").is_err());
    }

    #[test]
    fn test_mul_div() {
        let shares = Decimal::from_int(U256::from(10)).unwrap();
        // 10 shares * 3 / 2
        let out = shares.mul_div(U256::from(3), U256::from(2)).unwrap();
        assert_eq!(out, Decimal::from_int(U256::from(15)).unwrap());
        assert_eq!(
            shares.mul_div(U256::from(1), U256::ZERO),
            Err(DecimalError::DivisionByZero)
        );
    }

    #[test]
    fn test_sub_underflow() {
        assert_eq!(
            Decimal::zero().checked_sub(&Decimal::one()),
            Err(DecimalError::Underflow)
        );
    }

    proptest! {
        #[test]
        fn test_display_parse_preserves_precision(raw in any::<u128>()) {
            let d = Decimal::from_raw(U256::from(raw));
            prop_assert_eq!(Decimal::from_str(&d.to_string()).unwrap(), d);
        }
    }
}
