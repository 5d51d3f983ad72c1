//! Logs emitted by the precompile.
//!
//! Staking events are translated here into VM logs; their native layout
//! never reaches the caller directly.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};
use lazy_static::lazy_static;

use crate::{
    abi::{encode, event_topic, uint},
    staking::StakingEvent,
};

/// VM log entry: event topic first, then the indexed arguments
pub type Log = alloy_primitives::Log;

pub const DELEGATE_EVENT: &str = "Delegate(address,address,uint256,uint256)";
pub const UNBOND_EVENT: &str = "Unbond(address,address,uint256,uint256)";
pub const REDELEGATE_EVENT: &str = "Redelegate(address,address,address,uint256,uint256)";
pub const CANCEL_UNBONDING_EVENT: &str =
    "CancelUnbondingDelegation(address,address,uint256,uint256)";
pub const APPROVAL_EVENT: &str = "Approval(address,address,string[],uint256)";
pub const REVOCATION_EVENT: &str = "Revocation(address,address,string[])";
pub const ALLOWANCE_CHANGE_EVENT: &str = "AllowanceChange(address,address,string[],uint256[])";

lazy_static! {
    pub static ref DELEGATE_TOPIC: B256 = event_topic(DELEGATE_EVENT);
    pub static ref UNBOND_TOPIC: B256 = event_topic(UNBOND_EVENT);
    pub static ref REDELEGATE_TOPIC: B256 = event_topic(REDELEGATE_EVENT);
    pub static ref CANCEL_UNBONDING_TOPIC: B256 = event_topic(CANCEL_UNBONDING_EVENT);
    pub static ref APPROVAL_TOPIC: B256 = event_topic(APPROVAL_EVENT);
    pub static ref REVOCATION_TOPIC: B256 = event_topic(REVOCATION_EVENT);
    pub static ref ALLOWANCE_CHANGE_TOPIC: B256 = event_topic(ALLOWANCE_CHANGE_EVENT);
}

/// Indexed addresses are left padded to a word, non-indexed values are ABI encoded
fn new_log(contract: Address, topic: B256, indexed: &[Address], data: &[DynSolValue]) -> Log {
    let topics = std::iter::once(topic)
        .chain(indexed.iter().map(|address| address.into_word()))
        .collect();
    Log::new_unchecked(contract, topics, encode(data).into())
}

fn timestamp(value: i64) -> DynSolValue {
    uint(U256::from(value.max(0) as u64))
}

/// Log for a staking event, `None` for events with no caller-visible form
pub fn staking_log(contract: Address, event: &StakingEvent) -> Option<Log> {
    let log = match event {
        StakingEvent::Delegate {
            delegator,
            validator,
            amount,
            new_shares,
        } => new_log(
            contract,
            *DELEGATE_TOPIC,
            &[*delegator, *validator],
            &[uint(*amount), uint(new_shares.raw())],
        ),
        StakingEvent::Unbond {
            delegator,
            validator,
            amount,
            completion_time,
        } => new_log(
            contract,
            *UNBOND_TOPIC,
            &[*delegator, *validator],
            &[uint(*amount), timestamp(*completion_time)],
        ),
        StakingEvent::Redelegate {
            delegator,
            validator_src,
            validator_dst,
            amount,
            completion_time,
        } => new_log(
            contract,
            *REDELEGATE_TOPIC,
            &[*delegator, *validator_src, *validator_dst],
            &[uint(*amount), timestamp(*completion_time)],
        ),
        StakingEvent::CancelUnbondingDelegation {
            delegator,
            validator,
            amount,
            creation_height,
        } => new_log(
            contract,
            *CANCEL_UNBONDING_TOPIC,
            &[*delegator, *validator],
            &[uint(*amount), timestamp(*creation_height)],
        ),
        StakingEvent::CompleteUnbonding { .. } => return None,
    };
    Some(log)
}

fn method_list(methods: &[String]) -> DynSolValue {
    DynSolValue::Array(methods.iter().cloned().map(DynSolValue::String).collect())
}

pub fn approval_log(
    contract: Address,
    grantee: Address,
    granter: Address,
    methods: &[String],
    value: U256,
) -> Log {
    new_log(
        contract,
        *APPROVAL_TOPIC,
        &[grantee, granter],
        &[method_list(methods), uint(value)],
    )
}

pub fn revocation_log(
    contract: Address,
    grantee: Address,
    granter: Address,
    methods: &[String],
) -> Log {
    new_log(
        contract,
        *REVOCATION_TOPIC,
        &[grantee, granter],
        &[method_list(methods)],
    )
}

pub fn allowance_change_log(
    contract: Address,
    grantee: Address,
    granter: Address,
    methods: &[String],
    values: &[U256],
) -> Log {
    new_log(
        contract,
        *ALLOWANCE_CHANGE_TOPIC,
        &[grantee, granter],
        &[
            method_list(methods),
            DynSolValue::Array(values.iter().copied().map(uint).collect()),
        ],
    )
}
