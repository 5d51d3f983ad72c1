use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::BondStatus;
use crate::{
    crypto::Address,
    decimal::{Decimal, DecimalError},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// Validator record as kept by the staking module
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: Address,
    /// Hex encoded consensus public key
    pub consensus_pubkey: String,
    pub jailed: bool,
    pub status: BondStatus,
    /// Bonded tokens backing the shares
    pub tokens: U256,
    pub delegator_shares: Decimal,
    pub description: String,
    pub unbonding_height: i64,
    pub unbonding_time: i64,
    /// Commission rate, scaled by 10^18
    pub commission: U256,
    pub min_self_delegation: U256,
}

impl Validator {
    pub fn new(operator_address: Address, consensus_pubkey: String, description: String) -> Self {
        Self {
            operator_address,
            consensus_pubkey,
            status: BondStatus::Unbonded,
            min_self_delegation: U256::from(1),
            description,
            ..Default::default()
        }
    }

    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded
    }

    /// Shares issued for `amount` tokens at the current exchange rate
    pub fn shares_from_tokens(&self, amount: U256) -> Result<Decimal, DecimalError> {
        if self.tokens.is_zero() {
            // First delegation is 1:1
            return Decimal::from_int(amount);
        }
        self.delegator_shares.mul_div(amount, self.tokens)
    }

    /// Tokens backing `shares`, truncated
    pub fn tokens_from_shares(&self, shares: &Decimal) -> Result<U256, DecimalError> {
        if self.delegator_shares.is_zero() {
            return Ok(U256::ZERO);
        }
        shares.mul_int_div(self.tokens, &self.delegator_shares)
    }

    pub fn add_tokens_from_delegation(&mut self, amount: U256) -> Result<Decimal, DecimalError> {
        let issued = self.shares_from_tokens(amount)?;
        self.tokens = self.tokens.checked_add(amount).ok_or(DecimalError::Overflow)?;
        self.delegator_shares = self.delegator_shares.checked_add(&issued)?;
        Ok(issued)
    }

    /// Burn `shares` and return the tokens they were worth
    pub fn remove_delegator_shares(&mut self, shares: &Decimal) -> Result<U256, DecimalError> {
        let remaining = self.delegator_shares.checked_sub(shares)?;
        let amount = if remaining.is_zero() {
            // Last delegator takes whatever is left
            self.tokens
        } else {
            self.tokens_from_shares(shares)?
        };
        self.tokens = self.tokens.checked_sub(amount).ok_or(DecimalError::Underflow)?;
        self.delegator_shares = remaining;
        Ok(amount)
    }
}

impl Serializer for Validator {
    fn write(&self, writer: &mut Writer) {
        self.operator_address.write(writer);
        self.consensus_pubkey.write(writer);
        self.jailed.write(writer);
        self.status.write(writer);
        self.tokens.write(writer);
        self.delegator_shares.write(writer);
        self.description.write(writer);
        self.unbonding_height.write(writer);
        self.unbonding_time.write(writer);
        self.commission.write(writer);
        self.min_self_delegation.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            operator_address: reader.read()?,
            consensus_pubkey: reader.read()?,
            jailed: reader.read()?,
            status: reader.read()?,
            tokens: reader.read()?,
            delegator_shares: reader.read()?,
            description: reader.read()?,
            unbonding_height: reader.read()?,
            unbonding_time: reader.read()?,
            commission: reader.read()?,
            min_self_delegation: reader.read()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(Address::new([1; 20]), "00".into(), "v".into())
    }

    #[test]
    fn test_first_delegation_is_one_to_one() {
        let mut v = validator();
        let shares = v.add_tokens_from_delegation(U256::from(5)).unwrap();
        assert_eq!(shares, Decimal::from_int(U256::from(5)).unwrap());
        assert_eq!(v.tokens, U256::from(5));
    }

    #[test]
    fn test_exchange_rate_after_slash() {
        let mut v = validator();
        v.add_tokens_from_delegation(U256::from(100)).unwrap();
        // Half the tokens gone, shares now worth 0.5 token
        v.tokens = U256::from(50);
        let shares = v.add_tokens_from_delegation(U256::from(10)).unwrap();
        assert_eq!(shares, Decimal::from_int(U256::from(20)).unwrap());
    }

    #[test]
    fn test_remove_all_shares_drains_tokens() {
        let mut v = validator();
        let shares = v.add_tokens_from_delegation(U256::from(7)).unwrap();
        assert_eq!(v.remove_delegator_shares(&shares).unwrap(), U256::from(7));
        assert!(v.tokens.is_zero());
        assert!(v.delegator_shares.is_zero());
    }

    #[test]
    fn test_serializer() {
        let mut v = validator();
        v.status = BondStatus::Bonded;
        v.add_tokens_from_delegation(U256::from(3)).unwrap();
        let bytes = v.to_bytes().unwrap();
        assert_eq!(Validator::from_bytes(&bytes).unwrap(), v);
    }
}
