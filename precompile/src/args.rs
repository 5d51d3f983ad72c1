//! Typed extraction of decoded call arguments.
//!
//! Handlers receive the decoded values of their call and pull typed values
//! out of them position by position. Every failure names the role of the
//! argument and echoes the offending value.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};
use bridge_common::{config::ABI_WORD_SIZE, pagination::PageRequest};

use crate::{
    abi::{self, describe},
    error::PrecompileError,
    methods::Method,
};

/// Decode the arguments of `method` from the calldata that follows the selector.
///
/// Word-aligned calldata that does not fit the argument heads is reported as
/// an argument count mismatch rather than a decoding failure. For dynamic
/// inputs the first tail must start right after the heads: an extra head
/// word pushes every offset past them.
pub fn decode_args(method: &Method, data: &[u8]) -> Result<Vec<DynSolValue>, PrecompileError> {
    let expected = method.inputs.len();
    if data.len() % ABI_WORD_SIZE == 0 {
        let words = data.len() / ABI_WORD_SIZE;
        let heads = method.head_size() / ABI_WORD_SIZE;
        let got = if words < heads || (method.has_static_inputs() && words != heads) {
            Some(words)
        } else {
            first_tail_word(method, data).filter(|word| *word > heads)
        };
        if let Some(got) = got {
            return Err(PrecompileError::InvalidNumberOfArgs { expected, got });
        }
    }
    Ok(abi::decode(&method.inputs, data)?)
}

/// Smallest tail offset read from the dynamic argument heads, in words
fn first_tail_word(method: &Method, data: &[u8]) -> Option<usize> {
    let mut position = 0;
    let mut first: Option<usize> = None;
    for ty in &method.inputs {
        if ty.is_dynamic() {
            let word = data.get(position..position + ABI_WORD_SIZE)?;
            let offset = usize::try_from(U256::from_be_slice(word)).ok()?;
            let offset = offset / ABI_WORD_SIZE;
            first = Some(first.map_or(offset, |first| first.min(offset)));
        }
        position += abi::head_size(ty);
    }
    first
}

/// Split `args` into exactly `N` arguments
pub fn take<const N: usize>(args: Vec<DynSolValue>) -> Result<[DynSolValue; N], PrecompileError> {
    args.try_into()
        .map_err(|args: Vec<DynSolValue>| PrecompileError::InvalidNumberOfArgs {
            expected: N,
            got: args.len(),
        })
}

/// Delegator acting or being queried, the zero address is rejected
pub fn delegator(value: DynSolValue) -> Result<Address, PrecompileError> {
    match value {
        DynSolValue::Address(address) if !address.is_zero() => Ok(address),
        other => Err(PrecompileError::InvalidDelegator(describe(&other))),
    }
}

/// Optional delegator criterion, the zero address means "any"
pub fn delegator_filter(value: DynSolValue) -> Result<Option<Address>, PrecompileError> {
    match value {
        DynSolValue::Address(address) => Ok(Some(address).filter(|a| !a.is_zero())),
        other => Err(PrecompileError::InvalidDelegator(describe(&other))),
    }
}

pub fn validator(value: DynSolValue) -> Result<Address, PrecompileError> {
    match value {
        DynSolValue::Address(address) => Ok(address),
        other => Err(PrecompileError::InvalidValidator(describe(&other))),
    }
}

/// Validator that must be named explicitly
pub fn required_validator(value: DynSolValue) -> Result<Address, PrecompileError> {
    match value {
        DynSolValue::Address(address) if !address.is_zero() => Ok(address),
        other => Err(PrecompileError::InvalidValidator(describe(&other))),
    }
}

/// Optional validator criterion, the zero address means "any"
pub fn validator_filter(value: DynSolValue) -> Result<Option<Address>, PrecompileError> {
    validator(value).map(|address| Some(address).filter(|a| !a.is_zero()))
}

pub fn grantee(value: DynSolValue) -> Result<Address, PrecompileError> {
    match value {
        DynSolValue::Address(address) if !address.is_zero() => Ok(address),
        other => Err(PrecompileError::InvalidGrantee(describe(&other))),
    }
}

pub fn granter(value: DynSolValue) -> Result<Address, PrecompileError> {
    match value {
        DynSolValue::Address(address) if !address.is_zero() => Ok(address),
        other => Err(PrecompileError::InvalidGranter(describe(&other))),
    }
}

pub fn amount(value: DynSolValue) -> Result<U256, PrecompileError> {
    match value {
        DynSolValue::Uint(value, _) => Ok(value),
        other => Err(PrecompileError::InvalidAmount(describe(&other))),
    }
}

/// Block height carried as an `uint256`
pub fn height(value: DynSolValue) -> Result<i64, PrecompileError> {
    match value {
        DynSolValue::Uint(value, _) if value <= U256::from(i64::MAX) => Ok(value.to::<i64>()),
        other => Err(PrecompileError::InvalidType {
            field: "creation height",
            value: describe(&other),
        }),
    }
}

pub fn string(value: DynSolValue, field: &'static str) -> Result<String, PrecompileError> {
    match value {
        DynSolValue::String(value) => Ok(value),
        other => Err(PrecompileError::InvalidType {
            field,
            value: describe(&other),
        }),
    }
}

/// List of message type URLs
pub fn methods(value: DynSolValue) -> Result<Vec<String>, PrecompileError> {
    let invalid = |value: &DynSolValue| PrecompileError::InvalidType {
        field: "methods",
        value: describe(value),
    };

    let DynSolValue::Array(items) = value else {
        return Err(invalid(&value));
    };
    items
        .into_iter()
        .map(|item| match item {
            DynSolValue::String(value) => Ok(value),
            other => Err(invalid(&other)),
        })
        .collect()
}

/// `(bytes key, uint64 offset, uint64 limit, bool countTotal, bool reverse)`
pub fn page_request(value: DynSolValue) -> Result<PageRequest, PrecompileError> {
    let invalid = |value: &DynSolValue| PrecompileError::InvalidType {
        field: "pagination",
        value: describe(value),
    };

    let fields = match value {
        DynSolValue::Tuple(fields) if fields.len() == 5 => fields,
        other => return Err(invalid(&other)),
    };
    match <[DynSolValue; 5]>::try_from(fields) {
        Ok(
            [
                DynSolValue::Bytes(key),
                DynSolValue::Uint(offset, _),
                DynSolValue::Uint(limit, _),
                DynSolValue::Bool(count_total),
                DynSolValue::Bool(reverse),
            ],
        ) if offset.bit_len() <= 64 && limit.bit_len() <= 64 => Ok(PageRequest {
            key,
            offset: offset.to::<u64>(),
            limit: limit.to::<u64>(),
            count_total,
            reverse,
        }),
        Ok(fields) => Err(invalid(&DynSolValue::Tuple(fields.into()))),
        Err(fields) => Err(invalid(&DynSolValue::Tuple(fields))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::{methods as registered, MethodId};
    use alloy_dyn_abi::DynSolType;
    use proptest::prelude::*;

    fn address(n: u8) -> DynSolValue {
        DynSolValue::Address(Address::new([n; 20]))
    }

    fn sample(ty: &DynSolType) -> DynSolValue {
        match ty {
            DynSolType::Address => address(1),
            DynSolType::Uint(size) => DynSolValue::Uint(U256::from(1), *size),
            DynSolType::Bool => DynSolValue::Bool(true),
            DynSolType::String => DynSolValue::String("a".into()),
            DynSolType::Bytes => DynSolValue::Bytes(vec![1]),
            DynSolType::Array(inner) => DynSolValue::Array(vec![sample(inner)]),
            DynSolType::Tuple(items) => DynSolValue::Tuple(items.iter().map(sample).collect()),
            other => panic!("no sample value for {}", other),
        }
    }

    // ===== Counts =====

    #[test]
    fn test_take_exact_count() {
        let [a, b] = take::<2>(vec![address(1), address(2)]).unwrap();
        assert_eq!(a, address(1));
        assert_eq!(b, address(2));

        assert_eq!(
            take::<2>(vec![]).unwrap_err().to_string(),
            "invalid number of arguments; expected 2; got: 0"
        );
        assert_eq!(
            take::<2>(vec![address(1), address(2), address(3)]).unwrap_err(),
            PrecompileError::InvalidNumberOfArgs {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_decode_args_counts_words() {
        let method = MethodId::Delegation.method();
        let one_word = abi::encode(&[address(1)]);
        assert_eq!(
            decode_args(method, &one_word).unwrap_err().to_string(),
            "invalid number of arguments; expected 2; got: 1"
        );

        let three_words = abi::encode(&[address(1), address(2), address(3)]);
        assert_eq!(
            decode_args(method, &three_words).unwrap_err().to_string(),
            "invalid number of arguments; expected 2; got: 3"
        );

        let two_words = abi::encode(&[address(1), address(2)]);
        assert_eq!(decode_args(method, &two_words).unwrap(), vec![address(1), address(2)]);
    }

    #[test]
    fn test_decode_args_dynamic_short() {
        let method = MethodId::Allowance.method();
        let data = abi::encode(&[address(1), address(2)]);
        assert_eq!(
            decode_args(method, &data).unwrap_err(),
            PrecompileError::InvalidNumberOfArgs {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_decode_args_dynamic_extra_argument() {
        let dynamic: Vec<_> = registered().filter(|m| !m.has_static_inputs()).collect();
        assert_eq!(dynamic.len(), 7);

        for method in dynamic {
            let mut values: Vec<_> = method.inputs.iter().map(sample).collect();
            let exact = abi::encode(&values);
            assert_eq!(decode_args(method, &exact).unwrap(), values, "{}", method.name());

            values.push(address(9));
            let extra = abi::encode(&values);
            assert_eq!(
                decode_args(method, &extra).unwrap_err(),
                PrecompileError::InvalidNumberOfArgs {
                    expected: method.inputs.len(),
                    got: method.inputs.len() + 1
                },
                "{}",
                method.name()
            );
        }
    }

    #[test]
    fn test_decode_args_allowance_extra_address() {
        let method = MethodId::Allowance.method();
        let data = abi::encode(&[
            address(2),
            address(1),
            DynSolValue::String("/cosmos.staking.v1beta1.MsgDelegate".into()),
            address(3),
        ]);
        assert_eq!(
            decode_args(method, &data).unwrap_err().to_string(),
            "invalid number of arguments; expected 3; got: 4"
        );
    }

    proptest! {
        #[test]
        fn test_decode_args_rejects_any_extra_words(extra in 1usize..6, seed in any::<u8>()) {
            let method = MethodId::Allowance.method();
            let mut values = vec![
                address(2),
                address(1),
                DynSolValue::String("/cosmos.staking.v1beta1.MsgDelegate".into()),
            ];
            values.extend((0..extra).map(|i| address(seed.wrapping_add(i as u8))));

            let data = abi::encode(&values);
            prop_assert_eq!(
                decode_args(method, &data).unwrap_err(),
                PrecompileError::InvalidNumberOfArgs {
                    expected: 3,
                    got: 3 + extra
                }
            );
        }
    }

    #[test]
    fn test_decode_args_unaligned() {
        let method = MethodId::Validator.method();
        assert!(matches!(
            decode_args(method, &[0u8; 31]),
            Err(PrecompileError::Abi(_))
        ));
    }

    // ===== Roles =====

    #[test]
    fn test_role_specific_address_errors() {
        let bad = DynSolValue::String("invalid".into());
        assert_eq!(
            delegator(bad.clone()).unwrap_err().to_string(),
            "invalid delegator address: invalid"
        );
        assert_eq!(
            validator(bad.clone()).unwrap_err().to_string(),
            "invalid validator address: invalid"
        );
        assert_eq!(
            grantee(bad.clone()).unwrap_err().to_string(),
            "invalid grantee address: invalid"
        );
        assert_eq!(
            granter(bad).unwrap_err().to_string(),
            "invalid granter address: invalid"
        );
    }

    #[test]
    fn test_zero_addresses() {
        let zero = DynSolValue::Address(Address::ZERO);
        assert!(delegator(zero.clone()).is_err());
        assert_eq!(delegator_filter(zero.clone()).unwrap(), None);
        assert_eq!(validator(zero.clone()).unwrap(), Address::ZERO);
        assert_eq!(validator_filter(zero.clone()).unwrap(), None);
        assert_eq!(
            required_validator(zero).unwrap_err().to_string(),
            "invalid validator address: 0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(amount(abi::uint(U256::from(5))).unwrap(), U256::from(5));
        assert_eq!(
            amount(DynSolValue::Bool(true)).unwrap_err().to_string(),
            "invalid amount: true"
        );
        assert_eq!(height(abi::uint(U256::from(7))).unwrap(), 7);
        assert!(height(abi::uint(U256::MAX)).is_err());
        assert_eq!(
            string(abi::uint(U256::from(1)), "method").unwrap_err().to_string(),
            "invalid type for method: 1"
        );
    }

    #[test]
    fn test_methods_list() {
        let value = DynSolValue::Array(vec![DynSolValue::String("a".into()), DynSolValue::String("b".into())]);
        assert_eq!(methods(value).unwrap(), vec!["a".to_owned(), "b".to_owned()]);
        assert!(methods(DynSolValue::Array(vec![DynSolValue::Bool(false)])).is_err());
        assert!(methods(DynSolValue::String("a".into())).is_err());
    }

    #[test]
    fn test_page_request() {
        let value = DynSolValue::Tuple(vec![
            DynSolValue::Bytes(vec![1, 2]),
            abi::uint64(3),
            abi::uint64(10),
            DynSolValue::Bool(true),
            DynSolValue::Bool(false),
        ]);
        let page = page_request(value).unwrap();
        assert_eq!(page.key, vec![1, 2]);
        assert_eq!(page.offset, 3);
        assert_eq!(page.limit, 10);
        assert!(page.count_total);
        assert!(!page.reverse);

        let bad = DynSolValue::Tuple(vec![DynSolValue::Bool(true)]);
        assert!(matches!(
            page_request(bad),
            Err(PrecompileError::InvalidType { field: "pagination", .. })
        ));
    }
}
