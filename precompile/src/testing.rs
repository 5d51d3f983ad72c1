//! Fixtures shared by the unit tests of this crate.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};
use bridge_common::staking::{BondStatus, Coin, Validator};

use crate::{
    abi::uint,
    context::{BlockInfo, CallContext},
    staking::{bank, EventManager, MsgDelegate, NativeStakingKeeper, StakingContext, StakingKeeper},
    state::MemoryStore,
};

pub const DENOM: &str = "astake";
pub const HEIGHT: i64 = 5;
pub const TIME: i64 = 1_000;
pub const GAS: u64 = 1_000_000;

pub fn addr(n: u8) -> Address {
    Address::new([n; 20])
}

/// `uint256` argument
pub fn amount(value: u64) -> DynSolValue {
    uint(U256::from(value))
}

pub fn tuple(value: &DynSolValue) -> &[DynSolValue] {
    value.as_tuple().expect("tuple value")
}

pub fn items(value: &DynSolValue) -> &[DynSolValue] {
    value.as_array().expect("array value")
}

pub fn coin(amount: u64) -> Coin {
    Coin::new(DENOM, U256::from(amount))
}

pub fn block() -> BlockInfo {
    BlockInfo::new(HEIGHT, TIME)
}

pub fn call(caller: Address) -> CallContext {
    CallContext::new(caller, GAS, block())
}

/// Two bonded validators `addr(10)` and `addr(11)`, accounts `addr(1)` and
/// `addr(2)` funded with 1000 tokens, `addr(1)` delegating 100 to `addr(10)`
pub fn setup() -> (NativeStakingKeeper, MemoryStore) {
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

    let mut events = EventManager::new();
    let mut ctx = StakingContext::new(&mut store, block(), &mut events);
    keeper
        .delegate(
            &mut ctx,
            &MsgDelegate {
                delegator: addr(1),
                validator: addr(10),
                amount: coin(100),
            },
        )
        .unwrap();
    (keeper, store)
}
