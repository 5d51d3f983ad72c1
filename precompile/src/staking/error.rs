use bridge_common::{crypto::Address, decimal::DecimalError};
use alloy_primitives::U256;
use thiserror::Error;

use crate::state::StateError;

/// Failures reported by the native staking module.
///
/// Texts are user facing and surface unchanged in the revert reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("validator does not exist")]
    ValidatorNotFound,

    #[error("no delegation for (address, validator) tuple")]
    NoDelegation,

    #[error("invalid shares amount")]
    InvalidShares,

    #[error("invalid delegation amount")]
    InvalidDelegationAmount,

    #[error("invalid coin denomination: got {got}, expected {expected}")]
    InvalidDenom { got: String, expected: String },

    #[error("cannot redelegate to the same validator")]
    SelfRedelegation,

    #[error("redelegation to this validator already in progress; first redelegation to this validator must complete before next redelegation")]
    TransitiveRedelegation,

    #[error("too many unbonding delegation entries for (delegator, validator) tuple")]
    MaxUnbondingEntries,

    #[error("too many redelegation entries for (delegator, src-validator, dst-validator) tuple")]
    MaxRedelegationEntries,

    #[error("no unbonding delegation found")]
    NoUnbondingDelegation,

    #[error("unbonding delegation entry is not found at block height {height}")]
    UnbondingEntryNotFound { height: i64 },

    #[error("amount is greater than the unbonding delegation entry balance")]
    AmountExceedsEntryBalance,

    #[error("redelegation not found for delegator address {delegator} from validator address {validator}")]
    RedelegationNotFound {
        delegator: Address,
        validator: Address,
    },

    #[error("spendable balance {spendable}{denom} is smaller than {required}{denom}: insufficient funds")]
    InsufficientFunds {
        spendable: U256,
        required: U256,
        denom: String,
    },

    #[error("arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Decimal(#[from] DecimalError),

    #[error(transparent)]
    State(#[from] StateError),
}
