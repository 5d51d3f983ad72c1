use bridge_common::{
    config::{
        MSG_CANCEL_UNDELEGATION_TYPE_URL, MSG_DELEGATE_TYPE_URL, MSG_REDELEGATE_TYPE_URL,
        MSG_UNDELEGATE_TYPE_URL,
    },
    crypto::Address,
    staking::Coin,
};

use super::StakingError;

/// State-changing staking message signed by a delegator
pub trait StakingMsg {
    /// Type URL, also the key of authorization grants for this message
    const TYPE_URL: &'static str;

    fn delegator(&self) -> &Address;

    fn amount(&self) -> &Coin;

    fn validate_basic(&self) -> Result<(), StakingError> {
        if self.amount().amount.is_zero() {
            return Err(StakingError::InvalidDelegationAmount);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgDelegate {
    pub delegator: Address,
    pub validator: Address,
    pub amount: Coin,
}

impl StakingMsg for MsgDelegate {
    const TYPE_URL: &'static str = MSG_DELEGATE_TYPE_URL;

    fn delegator(&self) -> &Address {
        &self.delegator
    }

    fn amount(&self) -> &Coin {
        &self.amount
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgUndelegate {
    pub delegator: Address,
    pub validator: Address,
    pub amount: Coin,
}

impl StakingMsg for MsgUndelegate {
    const TYPE_URL: &'static str = MSG_UNDELEGATE_TYPE_URL;

    fn delegator(&self) -> &Address {
        &self.delegator
    }

    fn amount(&self) -> &Coin {
        &self.amount
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgBeginRedelegate {
    pub delegator: Address,
    pub validator_src: Address,
    pub validator_dst: Address,
    pub amount: Coin,
}

impl StakingMsg for MsgBeginRedelegate {
    const TYPE_URL: &'static str = MSG_REDELEGATE_TYPE_URL;

    fn delegator(&self) -> &Address {
        &self.delegator
    }

    fn amount(&self) -> &Coin {
        &self.amount
    }

    fn validate_basic(&self) -> Result<(), StakingError> {
        if self.validator_src == self.validator_dst {
            return Err(StakingError::SelfRedelegation);
        }
        if self.amount.amount.is_zero() {
            return Err(StakingError::InvalidShares);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgCancelUnbondingDelegation {
    pub delegator: Address,
    pub validator: Address,
    pub amount: Coin,
    pub creation_height: i64,
}

impl StakingMsg for MsgCancelUnbondingDelegation {
    const TYPE_URL: &'static str = MSG_CANCEL_UNDELEGATION_TYPE_URL;

    fn delegator(&self) -> &Address {
        &self.delegator
    }

    fn amount(&self) -> &Coin {
        &self.amount
    }

    fn validate_basic(&self) -> Result<(), StakingError> {
        if self.amount.amount.is_zero() {
            return Err(StakingError::InvalidDelegationAmount);
        }
        if self.creation_height <= 0 {
            return Err(StakingError::UnbondingEntryNotFound {
                height: self.creation_height,
            });
        }
        Ok(())
    }
}
