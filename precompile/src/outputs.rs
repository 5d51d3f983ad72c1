//! Encoding of native read models into return values.
//!
//! Missing native data encodes to the zero value of the output type, so
//! callers never see an error for an account without on-chain history.

use bridge_common::{
    crypto::Address,
    decimal::Decimal,
    pagination::PageResponse,
    staking::{
        Coin, Redelegation, RedelegationEntry, RedelegationResponse, UnbondingDelegation,
        UnbondingDelegationEntry, Validator,
    },
};
use alloy_dyn_abi::DynSolValue;

use crate::abi::{int64, uint, uint64, uint8};

fn decimal(value: &Decimal) -> DynSolValue {
    uint(value.raw())
}

pub fn coin(coin: &Coin) -> DynSolValue {
    DynSolValue::Tuple(vec![DynSolValue::String(coin.denom.clone()), uint(coin.amount)])
}

pub fn page_response(page: &PageResponse) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Bytes(page.next_key.clone()),
        uint64(page.total),
    ])
}

/// `delegation` return values: raw shares and their token balance
pub fn delegation(shares: &Decimal, balance: &Coin) -> Vec<DynSolValue> {
    vec![decimal(shares), coin(balance)]
}

pub fn validator(validator: &Validator) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Address(validator.operator_address),
        DynSolValue::String(validator.consensus_pubkey.clone()),
        DynSolValue::Bool(validator.jailed),
        uint8(validator.status.as_u8()),
        uint(validator.tokens),
        decimal(&validator.delegator_shares),
        DynSolValue::String(validator.description.clone()),
        int64(validator.unbonding_height),
        int64(validator.unbonding_time),
        uint(validator.commission),
        uint(validator.min_self_delegation),
    ])
}

pub fn validators(validators: &[Validator], page: &PageResponse) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Array(validators.iter().map(validator).collect()),
        page_response(page),
    ]
}

fn unbonding_entry(entry: &UnbondingDelegationEntry) -> DynSolValue {
    DynSolValue::Tuple(vec![
        int64(entry.creation_height),
        int64(entry.completion_time),
        uint(entry.initial_balance),
        uint(entry.balance),
        uint64(entry.unbonding_id),
        int64(entry.unbonding_on_hold_ref_count),
    ])
}

pub fn unbonding_delegation(ubd: Option<&UnbondingDelegation>) -> DynSolValue {
    let (delegator, validator, entries) = match ubd {
        Some(ubd) => (
            ubd.delegator,
            ubd.validator,
            ubd.entries.iter().map(unbonding_entry).collect(),
        ),
        None => (Address::ZERO, Address::ZERO, Vec::new()),
    };
    DynSolValue::Tuple(vec![
        DynSolValue::Address(delegator),
        DynSolValue::Address(validator),
        DynSolValue::Array(entries),
    ])
}

fn redelegation_entry(entry: &RedelegationEntry) -> DynSolValue {
    DynSolValue::Tuple(vec![
        int64(entry.creation_height),
        int64(entry.completion_time),
        uint(entry.initial_balance),
        decimal(&entry.shares_dst),
    ])
}

pub fn redelegation(red: Option<&Redelegation>) -> DynSolValue {
    let Some(red) = red else {
        return DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Array(Vec::new()),
        ]);
    };
    DynSolValue::Tuple(vec![
        DynSolValue::Address(red.delegator),
        DynSolValue::Address(red.validator_src),
        DynSolValue::Address(red.validator_dst),
        DynSolValue::Array(red.entries.iter().map(redelegation_entry).collect()),
    ])
}

fn redelegation_response(response: &RedelegationResponse) -> DynSolValue {
    let entries = response
        .entries
        .iter()
        .map(|entry| {
            DynSolValue::Tuple(vec![
                redelegation_entry(&entry.entry),
                uint(entry.balance),
            ])
        })
        .collect();
    DynSolValue::Tuple(vec![
        redelegation(Some(&response.redelegation)),
        DynSolValue::Array(entries),
    ])
}

pub fn redelegations(responses: &[RedelegationResponse], page: &PageResponse) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Array(responses.iter().map(redelegation_response).collect()),
        page_response(page),
    ]
}
