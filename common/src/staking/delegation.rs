use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{
    crypto::Address,
    decimal::Decimal,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

// ===== Coin =====

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: U256,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

// ===== Delegation =====

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: Address,
    pub validator: Address,
    pub shares: Decimal,
}

impl Serializer for Delegation {
    fn write(&self, writer: &mut Writer) {
        self.delegator.write(writer);
        self.validator.write(writer);
        self.shares.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            delegator: reader.read()?,
            validator: reader.read()?,
            shares: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        20 + 20 + 32
    }
}

// ===== Unbonding =====

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDelegationEntry {
    pub creation_height: i64,
    /// Unix seconds at which the tokens are released
    pub completion_time: i64,
    pub initial_balance: U256,
    pub balance: U256,
    pub unbonding_id: u64,
    pub unbonding_on_hold_ref_count: i64,
}

impl UnbondingDelegationEntry {
    pub fn is_mature(&self, now: i64) -> bool {
        self.completion_time <= now
    }
}

impl Serializer for UnbondingDelegationEntry {
    fn write(&self, writer: &mut Writer) {
        self.creation_height.write(writer);
        self.completion_time.write(writer);
        self.initial_balance.write(writer);
        self.balance.write(writer);
        self.unbonding_id.write(writer);
        self.unbonding_on_hold_ref_count.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            creation_height: reader.read()?,
            completion_time: reader.read()?,
            initial_balance: reader.read()?,
            balance: reader.read()?,
            unbonding_id: reader.read()?,
            unbonding_on_hold_ref_count: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        8 + 8 + 32 + 32 + 8 + 8
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDelegation {
    pub delegator: Address,
    pub validator: Address,
    pub entries: Vec<UnbondingDelegationEntry>,
}

impl Serializer for UnbondingDelegation {
    fn write(&self, writer: &mut Writer) {
        self.delegator.write(writer);
        self.validator.write(writer);
        self.entries.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            delegator: reader.read()?,
            validator: reader.read()?,
            entries: reader.read()?,
        })
    }
}

// ===== Redelegation =====

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationEntry {
    pub creation_height: i64,
    pub completion_time: i64,
    pub initial_balance: U256,
    /// Shares created on the destination validator
    pub shares_dst: Decimal,
}

impl Serializer for RedelegationEntry {
    fn write(&self, writer: &mut Writer) {
        self.creation_height.write(writer);
        self.completion_time.write(writer);
        self.initial_balance.write(writer);
        self.shares_dst.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            creation_height: reader.read()?,
            completion_time: reader.read()?,
            initial_balance: reader.read()?,
            shares_dst: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        8 + 8 + 32 + 32
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redelegation {
    pub delegator: Address,
    pub validator_src: Address,
    pub validator_dst: Address,
    pub entries: Vec<RedelegationEntry>,
}

impl Serializer for Redelegation {
    fn write(&self, writer: &mut Writer) {
        self.delegator.write(writer);
        self.validator_src.write(writer);
        self.validator_dst.write(writer);
        self.entries.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            delegator: reader.read()?,
            validator_src: reader.read()?,
            validator_dst: reader.read()?,
            entries: reader.read()?,
        })
    }
}

/// Redelegation entry joined with its current token balance
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationEntryResponse {
    pub entry: RedelegationEntry,
    pub balance: U256,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationResponse {
    pub redelegation: Redelegation,
    pub entries: Vec<RedelegationEntryResponse>,
}
