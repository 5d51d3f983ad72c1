//! Minimal bank ledger backing delegations.
//!
//! Balances are keyed by `0x02 | address | denom`. Bonded and not-bonded
//! tokens sit in two module accounts derived from their names.

use bridge_common::crypto::{keccak256, Address};
use lazy_static::lazy_static;
use alloy_primitives::U256;

use super::StakingError;
use crate::state::{KvStore, KvStoreExt};

pub const BALANCE_PREFIX: u8 = 0x02;

lazy_static! {
    pub static ref BONDED_POOL: Address = module_address("bonded_tokens_pool");
    pub static ref NOT_BONDED_POOL: Address = module_address("not_bonded_tokens_pool");
}

/// Last 20 bytes of keccak256(name)
pub fn module_address(name: &str) -> Address {
    let hash = keccak256(name.as_bytes());
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::new(bytes)
}

fn balance_key(address: &Address, denom: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 20 + denom.len());
    key.push(BALANCE_PREFIX);
    key.extend_from_slice(address.as_slice());
    key.extend_from_slice(denom.as_bytes());
    key
}

pub fn balance(store: &dyn KvStore, address: &Address, denom: &str) -> Result<U256, StakingError> {
    Ok(store
        .load::<U256>(&balance_key(address, denom))?
        .unwrap_or_default())
}

fn set_balance(
    store: &mut dyn KvStore,
    address: &Address,
    denom: &str,
    amount: U256,
) -> Result<(), StakingError> {
    let key = balance_key(address, denom);
    if amount.is_zero() {
        store.delete(&key)?;
    } else {
        store.store(key, &amount)?;
    }
    Ok(())
}

pub fn mint(
    store: &mut dyn KvStore,
    address: &Address,
    denom: &str,
    amount: U256,
) -> Result<(), StakingError> {
    let current = balance(store, address, denom)?;
    let updated = current.checked_add(amount).ok_or(StakingError::Overflow)?;
    set_balance(store, address, denom, updated)
}

pub fn send(
    store: &mut dyn KvStore,
    from: &Address,
    to: &Address,
    denom: &str,
    amount: U256,
) -> Result<(), StakingError> {
    if from == to || amount.is_zero() {
        return Ok(());
    }

    let spendable = balance(store, from, denom)?;
    if spendable < amount {
        return Err(StakingError::InsufficientFunds {
            spendable,
            required: amount,
            denom: denom.to_owned(),
        });
    }
    set_balance(store, from, denom, spendable - amount)?;
    mint(store, to, denom, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;

    #[test]
    fn test_send_moves_funds() {
        let mut store = MemoryStore::new();
        let alice = Address::new([1; 20]);
        let bob = Address::new([2; 20]);
        mint(&mut store, &alice, "astake", U256::from(10)).unwrap();
        send(&mut store, &alice, &bob, "astake", U256::from(4)).unwrap();

        assert_eq!(balance(&store, &alice, "astake").unwrap(), U256::from(6));
        assert_eq!(balance(&store, &bob, "astake").unwrap(), U256::from(4));
    }

    #[test]
    fn test_insufficient_funds_message() {
        let mut store = MemoryStore::new();
        let alice = Address::new([1; 20]);
        let err = send(&mut store, &alice, &BONDED_POOL, "astake", U256::from(5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "spendable balance 0astake is smaller than 5astake: insufficient funds"
        );
    }

    #[test]
    fn test_pools_are_distinct() {
        assert_ne!(*BONDED_POOL, *NOT_BONDED_POOL);
    }
}
