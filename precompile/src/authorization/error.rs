use bridge_common::crypto::Address;
use alloy_primitives::U256;
use thiserror::Error;

use crate::state::StateError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("authorization to {msg_type} for address {grantee} does not exist or is expired")]
    NotFound { msg_type: String, grantee: Address },

    #[error("amount {amount} greater than allowed limit {limit}")]
    LimitExceeded { amount: U256, limit: U256 },

    #[error("grantee and granter cannot be the same")]
    SelfGrant,

    #[error("invalid method: {0}")]
    InvalidMethod(String),

    #[error("amount by which the allowance should be decreased is greater than the authorization limit: {amount} > {limit}")]
    DecreaseExceedsLimit { amount: U256, limit: U256 },

    #[error("authorization to {msg_type} for address {grantee} has no limit and cannot be decreased")]
    UnlimitedDecrease { msg_type: String, grantee: Address },

    #[error("allowance overflow")]
    Overflow,

    #[error(transparent)]
    State(#[from] StateError),
}
