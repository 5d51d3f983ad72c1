//! Authorization grants ("allowances").
//!
//! A grant lets `grantee` send one message type on behalf of `granter`,
//! optionally capped by a spendable amount and an expiration. Grants are
//! stored under `0x01 | granter | grantee | msg_type`.
//!
//! Nothing in here commits: callers run these functions against the call's
//! [`CacheStore`](crate::state::CacheStore) so that a debit and the action it
//! pays for land together or not at all.

mod error;
mod grant;

use bridge_common::{
    config::{
        MSG_CANCEL_UNDELEGATION_TYPE_URL, MSG_DELEGATE_TYPE_URL, MSG_REDELEGATE_TYPE_URL,
        MSG_UNDELEGATE_TYPE_URL,
    },
    crypto::Address,
};
use log::trace;
use alloy_primitives::U256;

use crate::state::{KvStore, KvStoreExt};

pub use error::AuthorizationError;
pub use grant::Grant;

pub const GRANT_PREFIX: u8 = 0x01;

/// Message types a grant can be issued for
pub const SUPPORTED_MSG_TYPES: [&str; 4] = [
    MSG_DELEGATE_TYPE_URL,
    MSG_UNDELEGATE_TYPE_URL,
    MSG_REDELEGATE_TYPE_URL,
    MSG_CANCEL_UNDELEGATION_TYPE_URL,
];

pub fn grant_key(granter: &Address, grantee: &Address, msg_type: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 20 + 20 + msg_type.len());
    key.push(GRANT_PREFIX);
    key.extend_from_slice(granter.as_slice());
    key.extend_from_slice(grantee.as_slice());
    key.extend_from_slice(msg_type.as_bytes());
    key
}

pub fn check_msg_type(msg_type: &str) -> Result<(), AuthorizationError> {
    if !SUPPORTED_MSG_TYPES.contains(&msg_type) {
        return Err(AuthorizationError::InvalidMethod(msg_type.to_owned()));
    }
    Ok(())
}

fn not_found(grantee: &Address, msg_type: &str) -> AuthorizationError {
    AuthorizationError::NotFound {
        msg_type: msg_type.to_owned(),
        grantee: *grantee,
    }
}

/// Delete every expired grant from `granter` to `grantee`, returns how many
/// were removed
pub fn prune_expired(
    store: &mut dyn KvStore,
    granter: &Address,
    grantee: &Address,
    now: i64,
) -> Result<usize, AuthorizationError> {
    let mut pruned = 0;
    for msg_type in SUPPORTED_MSG_TYPES {
        let key = grant_key(granter, grantee, msg_type);
        let grant: Option<Grant> = store.load(&key)?;
        if grant.is_some_and(|grant| grant.is_expired(now)) {
            trace!("pruning expired {} grant from {} to {}", msg_type, granter, grantee);
            store.delete(&key)?;
            pruned += 1;
        }
    }
    Ok(pruned)
}

/// Create or overwrite a grant, pruning expired grants of the same pair
pub fn save_grant(
    store: &mut dyn KvStore,
    grant: &Grant,
    now: i64,
) -> Result<(), AuthorizationError> {
    if grant.granter == grant.grantee {
        return Err(AuthorizationError::SelfGrant);
    }
    check_msg_type(&grant.msg_type)?;
    prune_expired(store, &grant.granter, &grant.grantee, now)?;

    trace!(
        "grant {} from {} to {}, limit {:?}",
        grant.msg_type,
        grant.granter,
        grant.grantee,
        grant.limit
    );
    store.store(
        grant_key(&grant.granter, &grant.grantee, &grant.msg_type),
        grant,
    )?;
    Ok(())
}

/// Live grant, expired grants are reported as absent
pub fn get_grant(
    store: &dyn KvStore,
    granter: &Address,
    grantee: &Address,
    msg_type: &str,
    now: i64,
) -> Result<Option<Grant>, AuthorizationError> {
    let grant: Option<Grant> = store.load(&grant_key(granter, grantee, msg_type))?;
    Ok(grant.filter(|grant| !grant.is_expired(now)))
}

/// Delete a grant, expired or not
pub fn revoke(
    store: &mut dyn KvStore,
    granter: &Address,
    grantee: &Address,
    msg_type: &str,
) -> Result<(), AuthorizationError> {
    let key = grant_key(granter, grantee, msg_type);
    if !store.has(&key)? {
        return Err(not_found(grantee, msg_type));
    }
    store.delete(&key)?;
    Ok(())
}

/// Spendable amount, zero if there is no live grant
pub fn allowance(
    store: &dyn KvStore,
    granter: &Address,
    grantee: &Address,
    msg_type: &str,
    now: i64,
) -> Result<U256, AuthorizationError> {
    Ok(get_grant(store, granter, grantee, msg_type, now)?
        .map(|grant| grant.spendable())
        .unwrap_or_default())
}

/// Debit `amount` from the grant.
///
/// Fails without touching the store when the grant is missing, expired or
/// too small. A grant spent down to zero is deleted. Returns the remaining
/// limit, `None` for an unlimited grant.
pub fn consume(
    store: &mut dyn KvStore,
    granter: &Address,
    grantee: &Address,
    msg_type: &str,
    amount: U256,
    now: i64,
) -> Result<Option<U256>, AuthorizationError> {
    let mut grant = get_grant(&*store, granter, grantee, msg_type, now)?
        .ok_or_else(|| not_found(grantee, msg_type))?;

    let Some(limit) = grant.limit else {
        return Ok(None);
    };
    if amount > limit {
        return Err(AuthorizationError::LimitExceeded { amount, limit });
    }

    let remaining = limit - amount;
    let key = grant_key(granter, grantee, msg_type);
    if remaining.is_zero() {
        store.delete(&key)?;
    } else {
        grant.limit = Some(remaining);
        store.store(key, &grant)?;
    }

    trace!(
        "{} spent {} of {} allowance from {}, {} left",
        grantee,
        amount,
        msg_type,
        granter,
        remaining
    );
    Ok(Some(remaining))
}

/// Raise the limit of a live grant, returns the new spendable amount
pub fn increase(
    store: &mut dyn KvStore,
    granter: &Address,
    grantee: &Address,
    msg_type: &str,
    amount: U256,
    now: i64,
) -> Result<U256, AuthorizationError> {
    prune_expired(store, granter, grantee, now)?;
    let mut grant = get_grant(&*store, granter, grantee, msg_type, now)?
        .ok_or_else(|| not_found(grantee, msg_type))?;

    let Some(limit) = grant.limit else {
        return Ok(U256::MAX);
    };
    let updated = limit
        .checked_add(amount)
        .ok_or(AuthorizationError::Overflow)?;
    grant.limit = Some(updated);
    store.store(grant_key(granter, grantee, msg_type), &grant)?;
    Ok(updated)
}

/// Lower the limit of a live grant, deleting it when it reaches zero.
/// Returns the new spendable amount.
pub fn decrease(
    store: &mut dyn KvStore,
    granter: &Address,
    grantee: &Address,
    msg_type: &str,
    amount: U256,
    now: i64,
) -> Result<U256, AuthorizationError> {
    prune_expired(store, granter, grantee, now)?;
    let mut grant = get_grant(&*store, granter, grantee, msg_type, now)?
        .ok_or_else(|| not_found(grantee, msg_type))?;

    let Some(limit) = grant.limit else {
        return Err(AuthorizationError::UnlimitedDecrease {
            msg_type: msg_type.to_owned(),
            grantee: *grantee,
        });
    };
    if amount > limit {
        return Err(AuthorizationError::DecreaseExceedsLimit { amount, limit });
    }

    let updated = limit - amount;
    let key = grant_key(granter, grantee, msg_type);
    if updated.is_zero() {
        store.delete(&key)?;
    } else {
        grant.limit = Some(updated);
        store.store(key, &grant)?;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CacheStore, MemoryStore};

    const NOW: i64 = 1_000;

    fn granter() -> Address {
        Address::new([1; 20])
    }

    fn grantee() -> Address {
        Address::new([2; 20])
    }

    fn setup(limit: Option<u64>, expiration: Option<i64>) -> MemoryStore {
        let mut store = MemoryStore::new();
        let grant = Grant::new(
            granter(),
            grantee(),
            MSG_DELEGATE_TYPE_URL,
            limit.map(U256::from),
            expiration,
        );
        save_grant(&mut store, &grant, NOW).unwrap();
        store
    }

    fn current(store: &dyn KvStore) -> U256 {
        allowance(store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, NOW).unwrap()
    }

    // ===== Grant =====

    #[test]
    fn test_save_grant_rejects_self_and_unknown_type() {
        let mut store = MemoryStore::new();
        let own = Grant::new(granter(), granter(), MSG_DELEGATE_TYPE_URL, None, None);
        assert_eq!(save_grant(&mut store, &own, NOW), Err(AuthorizationError::SelfGrant));

        let unknown = Grant::new(granter(), grantee(), "/cosmos.bank.v1beta1.MsgSend", None, None);
        assert_eq!(
            save_grant(&mut store, &unknown, NOW).unwrap_err().to_string(),
            "invalid method: /cosmos.bank.v1beta1.MsgSend"
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_allowance_missing_unlimited_and_expired() {
        let store = MemoryStore::new();
        assert_eq!(current(&store), U256::ZERO);

        let store = setup(None, None);
        assert_eq!(current(&store), U256::MAX);

        let store = setup(Some(5), Some(NOW - 1));
        assert_eq!(current(&store), U256::ZERO);
    }

    // ===== Consume =====

    #[test]
    fn test_consume_within_limit() {
        let mut store = setup(Some(10), None);
        let remaining = consume(
            &mut store,
            &granter(),
            &grantee(),
            MSG_DELEGATE_TYPE_URL,
            U256::from(4),
            NOW,
        )
        .unwrap();
        assert_eq!(remaining, Some(U256::from(6)));
        assert_eq!(current(&store), U256::from(6));
    }

    #[test]
    fn test_consume_over_limit_leaves_grant() {
        let mut store = setup(Some(10), None);
        let err = consume(
            &mut store,
            &granter(),
            &grantee(),
            MSG_DELEGATE_TYPE_URL,
            U256::from(11),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "amount 11 greater than allowed limit 10");
        assert_eq!(current(&store), U256::from(10));
    }

    #[test]
    fn test_consume_exhausts_and_deletes() {
        let mut store = setup(Some(10), None);
        consume(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(10), NOW)
            .unwrap();
        assert!(store.is_empty());

        let err = consume(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(1), NOW)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "authorization to {} for address {} does not exist or is expired",
                MSG_DELEGATE_TYPE_URL,
                grantee()
            )
        );
    }

    #[test]
    fn test_consume_unlimited_keeps_grant() {
        let mut store = setup(None, None);
        let remaining = consume(
            &mut store,
            &granter(),
            &grantee(),
            MSG_DELEGATE_TYPE_URL,
            U256::from(1_000_000),
            NOW,
        )
        .unwrap();
        assert_eq!(remaining, None);
        assert_eq!(current(&store), U256::MAX);
    }

    #[test]
    fn test_consume_expired() {
        let mut store = setup(Some(10), Some(NOW - 1));
        assert!(matches!(
            consume(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(1), NOW),
            Err(AuthorizationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_consume_rolled_back_with_cache() {
        let mut store = setup(Some(10), None);
        {
            let mut cache = CacheStore::new(&mut store);
            consume(&mut cache, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(3), NOW)
                .unwrap();
            assert_eq!(current(&cache), U256::from(7));
        }
        assert_eq!(current(&store), U256::from(10));
    }

    // ===== Increase / decrease / revoke =====

    #[test]
    fn test_increase_and_decrease() {
        let mut store = setup(Some(10), None);
        let increased =
            increase(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(5), NOW)
                .unwrap();
        assert_eq!(increased, U256::from(15));

        let err =
            decrease(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(16), NOW)
                .unwrap_err();
        assert_eq!(err, AuthorizationError::DecreaseExceedsLimit {
            amount: U256::from(16),
            limit: U256::from(15),
        });

        let decreased =
            decrease(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(15), NOW)
                .unwrap();
        assert_eq!(decreased, U256::ZERO);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unlimited_grant_changes() {
        let mut store = setup(None, None);
        assert_eq!(
            increase(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(1), NOW)
                .unwrap(),
            U256::MAX
        );
        assert!(matches!(
            decrease(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL, U256::from(1), NOW),
            Err(AuthorizationError::UnlimitedDecrease { .. })
        ));
    }

    // ===== Expiration =====

    #[test]
    fn test_save_grant_prunes_expired_pair_grants() {
        let mut store = setup(Some(10), Some(NOW - 1));
        assert_eq!(store.len(), 1);

        let other = Grant::new(granter(), grantee(), MSG_UNDELEGATE_TYPE_URL, None, None);
        save_grant(&mut store, &other, NOW).unwrap();

        let key = grant_key(&granter(), &grantee(), MSG_DELEGATE_TYPE_URL);
        assert!(!store.has(&key).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_allowance_change_prunes_expired_grant() {
        for change in [increase, decrease] {
            let mut store = setup(Some(10), Some(NOW - 1));
            let err = change(
                &mut store,
                &granter(),
                &grantee(),
                MSG_DELEGATE_TYPE_URL,
                U256::from(1),
                NOW,
            )
            .unwrap_err();
            assert!(matches!(err, AuthorizationError::NotFound { .. }));
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_prune_keeps_live_grants() {
        let mut store = setup(Some(10), Some(NOW));
        assert_eq!(prune_expired(&mut store, &granter(), &grantee(), NOW).unwrap(), 0);
        assert_eq!(current(&store), U256::from(10));
        assert_eq!(prune_expired(&mut store, &granter(), &grantee(), NOW + 1).unwrap(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_revoke() {
        let mut store = setup(Some(10), None);
        revoke(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL).unwrap();
        assert_eq!(current(&store), U256::ZERO);
        assert!(matches!(
            revoke(&mut store, &granter(), &grantee(), MSG_DELEGATE_TYPE_URL),
            Err(AuthorizationError::NotFound { .. })
        ));
    }
}
