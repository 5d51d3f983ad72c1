//! End-to-end tests driving raw calldata through the staking precompile.
//!
//! Every call goes through `StakingPrecompile::run`, the same path a VM
//! takes: selector routing, gas, argument decoding, handler, output encoding.

use bridge_common::{
    config::{MSG_DELEGATE_TYPE_URL, MSG_UNDELEGATE_TYPE_URL},
    crypto::Address,
    staking::{BondStatus, Validator},
};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::U256;
use bridge_precompile::{
    abi::{array, decode, encode, int64, uint, uint64},
    error::REVERT_SELECTOR,
    methods::methods,
    staking::{bank, NativeStakingKeeper},
    state::MemoryStore,
    BlockInfo, CallContext, CallOutput, ErrorKind, MethodId, PrecompileConfig, PrecompileError,
    StakingPrecompile,
};

const DENOM: &str = "astake";

fn addr(n: u8) -> Address {
    Address::new([n; 20])
}

fn address(n: u8) -> DynSolValue {
    DynSolValue::Address(addr(n))
}

fn amount(value: u64) -> DynSolValue {
    uint(U256::from(value))
}

fn call(caller: u8) -> CallContext {
    CallContext::new(addr(caller), 10_000_000, BlockInfo::new(5, 1_000))
}

fn calldata(id: MethodId, args: &[DynSolValue]) -> Vec<u8> {
    let mut data = id.selector().to_vec();
    data.extend(encode(args));
    data
}

fn page(key: Vec<u8>, limit: u64, count_total: bool) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Bytes(key),
        uint64(0),
        uint64(limit),
        DynSolValue::Bool(count_total),
        DynSolValue::Bool(false),
    ])
}

fn methods_arg(urls: &[&str]) -> DynSolValue {
    DynSolValue::Array(
        urls.iter()
            .map(|url| DynSolValue::String((*url).to_owned()))
            .collect(),
    )
}

fn coin(amount: u64) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::String(DENOM.to_owned()),
        uint(U256::from(amount)),
    ])
}

/// Any well-formed value of the given type
fn sample(ty: &DynSolType) -> DynSolValue {
    match ty {
        DynSolType::Address => address(1),
        DynSolType::Uint(size) => DynSolValue::Uint(U256::from(1), *size),
        DynSolType::Int(_) => int64(1),
        DynSolType::String => DynSolValue::String(String::new()),
        DynSolType::Bytes => DynSolValue::Bytes(Vec::new()),
        DynSolType::Array(_) => DynSolValue::Array(Vec::new()),
        DynSolType::Tuple(items) => DynSolValue::Tuple(items.iter().map(sample).collect()),
        _ => DynSolValue::Bool(false),
    }
}

struct Chain {
    precompile: StakingPrecompile<NativeStakingKeeper>,
    store: MemoryStore,
}

impl Chain {
    /// Bonded validators 10 and 11, funded accounts 1 and 2, account 1
    /// delegating 100 to validator 10
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let keeper = NativeStakingKeeper::default();
        let mut store = MemoryStore::new();
        for n in [10, 11] {
            let mut validator = Validator::new(addr(n), "00".into(), format!("val-{}", n));
            validator.status = BondStatus::Bonded;
            keeper.set_validator(&mut store, &validator).unwrap();
        }
        for n in [1, 2] {
            bank::mint(&mut store, &addr(n), DENOM, U256::from(1_000)).unwrap();
        }

        let mut chain = Self {
            precompile: StakingPrecompile::new(keeper, PrecompileConfig::default()),
            store,
        };
        chain
            .run(1, MethodId::Delegate, &[address(1), address(10), amount(100)])
            .unwrap();
        chain
    }

    fn run(
        &mut self,
        caller: u8,
        id: MethodId,
        args: &[DynSolValue],
    ) -> Result<CallOutput, PrecompileError> {
        self.precompile
            .run(&mut self.store, &call(caller), &calldata(id, args))
    }

    /// Run and decode the outputs
    fn query(
        &mut self,
        id: MethodId,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let output = self.run(1, id, args)?;
        Ok(decode(&id.outputs(), &output.data).unwrap())
    }

    fn allowance(&mut self, granter: u8, grantee: u8, msg_type: &str) -> U256 {
        let values = self
            .query(
                MethodId::Allowance,
                &[
                    address(grantee),
                    address(granter),
                    DynSolValue::String(msg_type.to_owned()),
                ],
            )
            .unwrap();
        values[0].as_uint().unwrap().0
    }
}

// ===== Argument counts =====

#[test]
fn test_every_method_rejects_wrong_argument_count() {
    let mut chain = Chain::new();
    let ctx = call(1);

    for method in methods() {
        let expected = method.inputs.len();
        let args: Vec<DynSolValue> = method.inputs.iter().map(sample).collect();

        let mut fewer = args.clone();
        fewer.pop();
        let mut more = args.clone();
        more.push(address(3));

        for args in [fewer, more] {
            let got = args.len();
            let err = chain
                .precompile
                .call_method(&mut chain.store, &ctx, method.id, args)
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("invalid number of arguments; expected {}; got: {}", expected, got),
                "{}",
                method.name()
            );
            assert_eq!(err.kind(), ErrorKind::Argument);
        }
    }
}

#[test]
fn test_static_methods_reject_wrong_word_count() {
    let mut chain = Chain::new();

    for method in methods().filter(|method| method.has_static_inputs()) {
        let expected = method.inputs.len();
        let args: Vec<DynSolValue> = method.inputs.iter().map(sample).collect();

        let err = chain.run(1, method.id, &args[..expected - 1]).unwrap_err();
        assert_eq!(
            err,
            PrecompileError::InvalidNumberOfArgs {
                expected,
                got: expected - 1
            }
        );

        let mut more = args.clone();
        more.push(amount(0));
        let err = chain.run(1, method.id, &more).unwrap_err();
        assert_eq!(
            err,
            PrecompileError::InvalidNumberOfArgs {
                expected,
                got: expected + 1
            }
        );
    }
}

#[test]
fn test_dynamic_methods_reject_extra_argument() {
    let mut chain = Chain::new();

    for method in methods().filter(|method| !method.has_static_inputs()) {
        let expected = method.inputs.len();
        let mut args: Vec<DynSolValue> = method.inputs.iter().map(sample).collect();

        if let Err(err) = chain.run(1, method.id, &args) {
            assert!(
                !matches!(err, PrecompileError::InvalidNumberOfArgs { .. }),
                "{}",
                method.name()
            );
        }

        args.push(address(3));
        let err = chain.run(1, method.id, &args).unwrap_err();
        assert_eq!(
            err,
            PrecompileError::InvalidNumberOfArgs {
                expected,
                got: expected + 1
            },
            "{}",
            method.name()
        );
    }
}

// ===== Queries =====

#[test]
fn test_no_history_is_zero_value() {
    let mut chain = Chain::new();

    let delegation = chain
        .query(MethodId::Delegation, &[address(7), address(10)])
        .unwrap();
    assert_eq!(delegation[0], amount(0));
    assert_eq!(delegation[1], coin(0));

    let ubd = chain
        .query(MethodId::UnbondingDelegation, &[address(7), address(10)])
        .unwrap();
    assert_eq!(
        ubd[0],
        DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Array(Vec::new()),
        ])
    );
}

#[test]
fn test_delegation_shares_and_balance() {
    let mut chain = Chain::new();
    let delegation = chain
        .query(MethodId::Delegation, &[address(1), address(10)])
        .unwrap();

    let precision = U256::from(10).pow(U256::from(18));
    assert_eq!(delegation[0], uint(U256::from(100) * precision));
    assert_eq!(delegation[1], coin(100));
}

#[test]
fn test_validators_page_with_total() {
    let mut chain = Chain::new();
    let values = chain
        .query(
            MethodId::Validators,
            &[DynSolValue::String(String::new()), page(Vec::new(), 1, true)],
        )
        .unwrap();

    assert_eq!(values[0].as_array().unwrap().len(), 1);
    let page_response = values[1].as_tuple().unwrap();
    assert!(!page_response[0].as_bytes().unwrap().is_empty());
    assert_eq!(page_response[1], uint64(2));
}

#[test]
fn test_redelegations_criteria() {
    let mut chain = Chain::new();
    chain
        .run(
            1,
            MethodId::Redelegate,
            &[address(1), address(10), address(11), amount(10)],
        )
        .unwrap();

    let zero = DynSolValue::Address(Address::ZERO);
    let rejected = [
        [zero.clone(), zero.clone(), zero.clone()],
        [zero.clone(), zero.clone(), address(11)],
    ];
    for [delegator, src, dst] in rejected {
        let err = chain
            .run(1, MethodId::Redelegations, &[delegator, src, dst, page(Vec::new(), 10, false)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryValidation);
        assert_eq!(
            err.to_string(),
            "invalid query. Need to specify at least a source validator address or delegator address"
        );
    }

    let accepted = [
        [zero.clone(), address(10), zero.clone()],
        [address(1), zero.clone(), zero.clone()],
    ];
    for [delegator, src, dst] in accepted {
        let values = chain
            .query(MethodId::Redelegations, &[delegator, src, dst, page(Vec::new(), 10, true)])
            .unwrap();
        assert_eq!(values[0].as_array().unwrap().len(), 1);
    }
}

// ===== Grants =====

#[test]
fn test_partial_consumption_and_overdraw() {
    let mut chain = Chain::new();
    chain
        .run(
            1,
            MethodId::Approve,
            &[address(2), amount(30), methods_arg(&[MSG_DELEGATE_TYPE_URL])],
        )
        .unwrap();

    chain
        .run(2, MethodId::Delegate, &[address(1), address(10), amount(12)])
        .unwrap();
    assert_eq!(chain.allowance(1, 2, MSG_DELEGATE_TYPE_URL), U256::from(18));

    let err = chain
        .run(2, MethodId::Delegate, &[address(1), address(10), amount(19)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.to_string(), "amount 19 greater than allowed limit 18");
    assert_eq!(chain.allowance(1, 2, MSG_DELEGATE_TYPE_URL), U256::from(18));

    // The grant covers delegation only
    let err = chain
        .run(2, MethodId::Undelegate, &[address(1), address(10), amount(1)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_single_token_grant_scenario() {
    let mut chain = Chain::new();
    chain
        .run(
            1,
            MethodId::Approve,
            &[address(2), amount(1), methods_arg(&[MSG_DELEGATE_TYPE_URL])],
        )
        .unwrap();

    let output = chain
        .run(2, MethodId::Delegate, &[address(1), address(10), amount(1)])
        .unwrap();
    assert_eq!(output.logs.len(), 1);
    assert_eq!(chain.allowance(1, 2, MSG_DELEGATE_TYPE_URL), U256::ZERO);

    let snapshot = chain.store.clone();
    let err = chain
        .run(2, MethodId::Delegate, &[address(1), address(10), amount(1)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(chain.store, snapshot);
}

#[test]
fn test_unlimited_grant() {
    let mut chain = Chain::new();
    let urls = methods_arg(&[MSG_DELEGATE_TYPE_URL, MSG_UNDELEGATE_TYPE_URL]);
    chain
        .run(1, MethodId::Approve, &[address(2), uint(U256::MAX), urls.clone()])
        .unwrap();

    for _ in 0..3 {
        chain
            .run(2, MethodId::Undelegate, &[address(1), address(10), amount(5)])
            .unwrap();
    }
    assert_eq!(chain.allowance(1, 2, MSG_UNDELEGATE_TYPE_URL), U256::MAX);

    let err = chain
        .run(1, MethodId::DecreaseAllowance, &[address(2), amount(1), urls])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NativeModule);
}

#[test]
fn test_grant_management_logs() {
    let mut chain = Chain::new();
    let urls = methods_arg(&[MSG_DELEGATE_TYPE_URL]);

    let output = chain
        .run(1, MethodId::Approve, &[address(2), amount(10), urls.clone()])
        .unwrap();
    assert_eq!(output.logs.len(), 1);
    assert_eq!(output.logs[0].topics().len(), 3);

    let output = chain
        .run(1, MethodId::IncreaseAllowance, &[address(2), amount(5), urls.clone()])
        .unwrap();
    let values = decode(
        &[array(DynSolType::String), array(DynSolType::Uint(256))],
        &output.logs[0].data.data,
    )
    .unwrap();
    assert_eq!(values[1], DynSolValue::Array(vec![amount(15)]));

    chain
        .run(1, MethodId::Revoke, &[address(2), urls])
        .unwrap();
    assert_eq!(chain.allowance(1, 2, MSG_DELEGATE_TYPE_URL), U256::ZERO);
}

// ===== Dispatch =====

#[test]
fn test_read_only_call() {
    let mut chain = Chain::new();
    let ctx = call(1).with_read_only(true);
    let input = calldata(
        MethodId::Approve,
        &[address(2), amount(1), methods_arg(&[MSG_DELEGATE_TYPE_URL])],
    );

    let err = chain.precompile.run(&mut chain.store, &ctx, &input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dispatch);
    assert_eq!(chain.allowance(1, 2, MSG_DELEGATE_TYPE_URL), U256::ZERO);
}

#[test]
fn test_revert_data() {
    let mut chain = Chain::new();
    let err = chain
        .run(1, MethodId::Delegate, &[address(1), address(99), amount(1)])
        .unwrap_err();
    let data = err.revert_data();

    assert_eq!(&data[..4], REVERT_SELECTOR.as_slice());
    let reason = decode(&[DynSolType::String], &data[4..]).unwrap();
    assert_eq!(
        reason,
        vec![DynSolValue::String("validator does not exist".to_owned())]
    );
}
