//! Contract ABI surface.
//!
//! Arguments and return values travel as alloy [`DynSolValue`]s, checked
//! against the per-method [`DynSolType`] layouts registered in
//! [`crate::methods`]. This module adds the few helpers the precompile needs
//! on top: selector and topic hashing, head sizes, and the narrow integer
//! values of the staking structs.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Selector, B256, I256, U256};
use bridge_common::config::{ABI_WORD_SIZE, SELECTOR_SIZE};
use itertools::Itertools;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("abi decoding failed: {0}")]
    Decode(String),
}

/// First 4 bytes of keccak256 of the canonical signature
pub fn selector(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature)[..SELECTOR_SIZE])
}

/// Topic of an event, keccak256 of its canonical signature
pub fn event_topic(signature: &str) -> B256 {
    keccak256(signature)
}

/// Encode a list of values as a top-level sequence (arguments or return values)
pub fn encode(values: &[DynSolValue]) -> Vec<u8> {
    DynSolValue::Tuple(values.to_vec()).abi_encode_params()
}

/// Decode a top-level sequence of `types`
pub fn decode(types: &[DynSolType], data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    let decoded = DynSolType::Tuple(types.to_vec())
        .abi_decode_params(data)
        .map_err(|err| AbiError::Decode(err.to_string()))?;
    match decoded {
        DynSolValue::Tuple(values) => Ok(values),
        other => Ok(vec![other]),
    }
}

/// Bytes taken in the head of the enclosing sequence
pub fn head_size(ty: &DynSolType) -> usize {
    match ty {
        DynSolType::Tuple(items) if !ty.is_dynamic() => items.iter().map(head_size).sum(),
        DynSolType::FixedArray(inner, len) if !ty.is_dynamic() => head_size(inner) * len,
        _ => ABI_WORD_SIZE,
    }
}

pub fn array(inner: DynSolType) -> DynSolType {
    DynSolType::Array(Box::new(inner))
}

pub fn uint(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

pub fn uint64(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 64)
}

pub fn uint8(value: u8) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 8)
}

pub fn int64(value: i64) -> DynSolValue {
    let magnitude = I256::from_raw(U256::from(value.unsigned_abs()));
    let value = if value < 0 {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    DynSolValue::Int(value, 64)
}

/// Signed value, `None` if it is not an int or does not fit in an `i64`
pub fn as_int64(value: &DynSolValue) -> Option<i64> {
    match value {
        DynSolValue::Int(value, _) => i64::try_from(*value).ok(),
        _ => None,
    }
}

/// Human readable value, used to echo offending arguments in errors
pub fn describe(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Uint(value, _) => value.to_string(),
        DynSolValue::Int(value, _) => value.to_string(),
        DynSolValue::Bool(value) => value.to_string(),
        DynSolValue::String(value) => value.clone(),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::FixedBytes(word, _) => word.to_string(),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{}]", items.iter().map(describe).join(" "))
        }
        DynSolValue::Tuple(items) => format!("{{{}}}", items.iter().map(describe).join(" ")),
        other => format!("{:?}", other),
    }
}
