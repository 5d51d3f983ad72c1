//! Caller-visible failures of the precompile.
//!
//! Every failure aborts the call and discards its state changes. The message
//! of a [`PrecompileError`] is what the caller sees as the revert reason.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Selector;
use strum::Display;
use thiserror::Error;

use crate::{
    abi::{self, AbiError},
    authorization::AuthorizationError,
    staking::StakingError,
    state::StateError,
};

/// `Error(string)` revert selector
pub const REVERT_SELECTOR: Selector = Selector::new([0x08, 0xc3, 0x79, 0xa0]);

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// Wrong argument count or malformed value, detected before any state access
    Argument,
    /// Missing or insufficient grant for an on-behalf-of action
    Unauthorized,
    /// Well-formed query with insufficient criteria
    QueryValidation,
    /// Rejected by the staking module or the state backend
    NativeModule,
    /// Unknown selector, read-only violation, call depth or gas
    Dispatch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrecompileError {
    #[error("invalid number of arguments; expected {expected}; got: {got}")]
    InvalidNumberOfArgs { expected: usize, got: usize },

    #[error("invalid delegator address: {0}")]
    InvalidDelegator(String),

    #[error("invalid validator address: {0}")]
    InvalidValidator(String),

    #[error("invalid grantee address: {0}")]
    InvalidGrantee(String),

    #[error("invalid granter address: {0}")]
    InvalidGranter(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid type for {field}: {value}")]
    InvalidType { field: &'static str, value: String },

    #[error("invalid validator status: {0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("invalid query. Need to specify at least a source validator address or delegator address")]
    InvalidRedelegationQuery,

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Staking(#[from] StakingError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("invalid input length: {0}")]
    InputTooShort(usize),

    #[error("unknown method selector: 0x{}", hex::encode(.0))]
    UnknownMethod(Selector),

    #[error("write protection: {0} cannot be called in a read-only context")]
    WriteProtection(&'static str),

    #[error("max call depth {0} exceeded")]
    MaxCallDepth(usize),

    #[error("out of gas: required {required}, available {available}")]
    OutOfGas { required: u64, available: u64 },
}

impl PrecompileError {
    pub fn kind(&self) -> ErrorKind {
        use PrecompileError::*;

        match self {
            InvalidNumberOfArgs { .. }
            | InvalidDelegator(_)
            | InvalidValidator(_)
            | InvalidGrantee(_)
            | InvalidGranter(_)
            | InvalidAmount(_)
            | InvalidType { .. }
            | InvalidStatus(_)
            | Abi(_) => ErrorKind::Argument,
            InvalidRedelegationQuery => ErrorKind::QueryValidation,
            Authorization(err) => match err {
                AuthorizationError::NotFound { .. } | AuthorizationError::LimitExceeded { .. } => {
                    ErrorKind::Unauthorized
                }
                AuthorizationError::SelfGrant | AuthorizationError::InvalidMethod(_) => {
                    ErrorKind::Argument
                }
                AuthorizationError::DecreaseExceedsLimit { .. }
                | AuthorizationError::UnlimitedDecrease { .. }
                | AuthorizationError::Overflow
                | AuthorizationError::State(_) => ErrorKind::NativeModule,
            },
            Staking(_) | State(_) => ErrorKind::NativeModule,
            InputTooShort(_)
            | UnknownMethod(_)
            | WriteProtection(_)
            | MaxCallDepth(_)
            | OutOfGas { .. } => ErrorKind::Dispatch,
        }
    }

    /// Revert payload: `Error(string)` selector followed by the encoded message
    pub fn revert_data(&self) -> Vec<u8> {
        let mut data = REVERT_SELECTOR.to_vec();
        data.extend(abi::encode(&[DynSolValue::String(self.to_string())]));
        data
    }
}
