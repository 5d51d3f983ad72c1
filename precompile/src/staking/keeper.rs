use bridge_common::{
    crypto::Address,
    decimal::Decimal,
    pagination::{PageRequest, PageResponse},
    staking::{
        BondStatus, Coin, Delegation, Redelegation, RedelegationEntry, RedelegationEntryResponse,
        RedelegationResponse, UnbondingDelegation, UnbondingDelegationEntry, Validator,
    },
};
use log::{debug, trace};
use alloy_primitives::U256;

use super::{
    bank::{self, BONDED_POOL, NOT_BONDED_POOL},
    keys::*,
    MsgBeginRedelegate, MsgCancelUnbondingDelegation, MsgDelegate, MsgUndelegate,
    RedelegationFilter, StakingContext, StakingError, StakingEvent, StakingKeeper, StakingMsg,
    StakingParams,
};
use crate::state::{decode, paginate, KvStore, KvStoreExt};

/// Reference staking keeper over a [`KvStore`]
#[derive(Debug, Clone, Default)]
pub struct NativeStakingKeeper {
    params: StakingParams,
}

impl NativeStakingKeeper {
    pub fn new(params: StakingParams) -> Self {
        Self { params }
    }

    pub fn bond_denom(&self) -> &str {
        &self.params.bond_denom
    }

    /// Register or overwrite a validator record
    pub fn set_validator(
        &self,
        store: &mut dyn KvStore,
        validator: &Validator,
    ) -> Result<(), StakingError> {
        store.store(validator_key(&validator.operator_address), validator)?;
        Ok(())
    }

    /// Pay out every matured unbonding entry of the pair, returns the amount released
    pub fn complete_unbonding(
        &self,
        ctx: &mut StakingContext<'_>,
        delegator: &Address,
        validator: &Address,
    ) -> Result<U256, StakingError> {
        let key = unbonding_key(delegator, validator);
        let mut ubd: UnbondingDelegation = ctx
            .store
            .load(&key)?
            .ok_or(StakingError::NoUnbondingDelegation)?;

        let now = ctx.block.time;
        let mut released = U256::ZERO;
        for entry in ubd.entries.iter().filter(|e| e.is_mature(now)) {
            released = released
                .checked_add(entry.balance)
                .ok_or(StakingError::Overflow)?;
        }
        ubd.entries.retain(|e| !e.is_mature(now));

        if ubd.entries.is_empty() {
            ctx.store.delete(&key)?;
        } else {
            ctx.store.store(key, &ubd)?;
        }

        bank::send(
            &mut *ctx.store,
            &NOT_BONDED_POOL,
            delegator,
            &self.params.bond_denom,
            released,
        )?;

        if !released.is_zero() {
            ctx.events.emit(StakingEvent::CompleteUnbonding {
                delegator: *delegator,
                validator: *validator,
                amount: released,
            });
        }
        Ok(released)
    }

    fn check_denom(&self, coin: &Coin) -> Result<(), StakingError> {
        if coin.denom != self.params.bond_denom {
            return Err(StakingError::InvalidDenom {
                got: coin.denom.clone(),
                expected: self.params.bond_denom.clone(),
            });
        }
        Ok(())
    }

    fn get_validator(
        &self,
        store: &dyn KvStore,
        operator: &Address,
    ) -> Result<Validator, StakingError> {
        self.validator(store, operator)?
            .ok_or(StakingError::ValidatorNotFound)
    }

    fn pool_for(validator: &Validator) -> Address {
        if validator.is_bonded() {
            *BONDED_POOL
        } else {
            *NOT_BONDED_POOL
        }
    }

    fn next_unbonding_id(&self, store: &mut dyn KvStore) -> Result<u64, StakingError> {
        let key = vec![UNBONDING_ID_KEY];
        let id = store.load::<u64>(&key)?.unwrap_or(0) + 1;
        store.store(key, &id)?;
        Ok(id)
    }

    /// Issue shares of `validator` to `delegator` for `amount` tokens
    fn add_delegation(
        &self,
        store: &mut dyn KvStore,
        delegator: &Address,
        validator: &mut Validator,
        amount: U256,
    ) -> Result<Decimal, StakingError> {
        let issued = validator.add_tokens_from_delegation(amount)?;

        let key = delegation_key(delegator, &validator.operator_address);
        let mut delegation = store.load::<Delegation>(&key)?.unwrap_or_else(|| Delegation {
            delegator: *delegator,
            validator: validator.operator_address,
            shares: Decimal::zero(),
        });
        delegation.shares = delegation.shares.checked_add(&issued)?;

        store.store(key, &delegation)?;
        self.set_validator(store, validator)?;
        Ok(issued)
    }

    /// Burn `shares` of a delegation, returns the tokens they were worth
    fn unbond(
        &self,
        store: &mut dyn KvStore,
        delegator: &Address,
        validator: &mut Validator,
        shares: &Decimal,
    ) -> Result<U256, StakingError> {
        let key = delegation_key(delegator, &validator.operator_address);
        let mut delegation: Delegation = store.load(&key)?.ok_or(StakingError::NoDelegation)?;
        if shares.is_zero() || *shares > delegation.shares {
            return Err(StakingError::InvalidShares);
        }

        delegation.shares = delegation.shares.checked_sub(shares)?;
        if delegation.shares.is_zero() {
            store.delete(&key)?;
        } else {
            store.store(key, &delegation)?;
        }

        let amount = validator.remove_delegator_shares(shares)?;
        self.set_validator(store, validator)?;
        Ok(amount)
    }

    /// Whether `validator` is the destination of an immature redelegation of `delegator`
    fn has_receiving_redelegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator: &Address,
        now: i64,
    ) -> Result<bool, StakingError> {
        let prefix = redelegations_by_dst_prefix(validator, delegator);
        for (key, _) in store.iter_prefix(&prefix, Default::default())? {
            let Some([src]) = split_addresses::<1>(&key[prefix.len()..]) else {
                continue;
            };
            let red: Option<Redelegation> =
                store.load(&redelegation_key(delegator, &src, validator))?;
            if let Some(red) = red {
                if red.entries.iter().any(|e| e.completion_time > now) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn save_redelegation(
        &self,
        store: &mut dyn KvStore,
        red: &Redelegation,
    ) -> Result<(), StakingError> {
        let (del, src, dst) = (&red.delegator, &red.validator_src, &red.validator_dst);
        store.store(redelegation_key(del, src, dst), red)?;
        store.store(redelegation_by_src_key(src, del, dst), &Vec::<u8>::new())?;
        store.store(redelegation_by_dst_key(dst, del, src), &Vec::<u8>::new())?;
        Ok(())
    }

    fn redelegation_response(
        &self,
        store: &dyn KvStore,
        redelegation: Redelegation,
    ) -> Result<RedelegationResponse, StakingError> {
        let dst = self.validator(store, &redelegation.validator_dst)?;
        let entries = redelegation
            .entries
            .iter()
            .map(|entry| -> Result<_, StakingError> {
                let balance = match &dst {
                    Some(dst) => dst.tokens_from_shares(&entry.shares_dst)?,
                    None => U256::ZERO,
                };
                Ok(RedelegationEntryResponse {
                    entry: entry.clone(),
                    balance,
                })
            })
            .collect::<Result<Vec<_>, StakingError>>()?;

        Ok(RedelegationResponse {
            redelegation,
            entries,
        })
    }
}

impl StakingKeeper for NativeStakingKeeper {
    fn params(&self) -> &StakingParams {
        &self.params
    }

    fn validator(
        &self,
        store: &dyn KvStore,
        operator: &Address,
    ) -> Result<Option<Validator>, StakingError> {
        Ok(store.load(&validator_key(operator))?)
    }

    fn validators(
        &self,
        store: &dyn KvStore,
        status: Option<BondStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<Validator>, PageResponse), StakingError> {
        paginate(store, &validators_prefix(), page, |key, value| {
            let validator: Validator = decode(key, value)?;
            match status {
                Some(status) if validator.status != status => Ok(None),
                _ => Ok(Some(validator)),
            }
        })
    }

    fn delegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator: &Address,
    ) -> Result<Option<Delegation>, StakingError> {
        Ok(store.load(&delegation_key(delegator, validator))?)
    }

    fn unbonding_delegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator: &Address,
    ) -> Result<Option<UnbondingDelegation>, StakingError> {
        Ok(store.load(&unbonding_key(delegator, validator))?)
    }

    fn redelegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator_src: &Address,
        validator_dst: &Address,
    ) -> Result<Option<Redelegation>, StakingError> {
        Ok(store.load(&redelegation_key(delegator, validator_src, validator_dst))?)
    }

    fn redelegations(
        &self,
        store: &dyn KvStore,
        filter: &RedelegationFilter,
        page: &PageRequest,
    ) -> Result<(Vec<RedelegationResponse>, PageResponse), StakingError> {
        let matches = |src: &Address, dst: &Address| {
            filter.validator_src.map_or(true, |v| v == *src)
                && filter.validator_dst.map_or(true, |v| v == *dst)
        };

        match (&filter.delegator, &filter.validator_src) {
            (None, Some(src)) => {
                // Walk the source index, the primary key starts with the delegator
                paginate(
                    store,
                    &redelegations_by_src_prefix(src),
                    page,
                    |suffix, _| {
                        let Some([delegator, dst]) = split_addresses::<2>(suffix) else {
                            return Ok(None);
                        };
                        if !matches(src, &dst) {
                            return Ok(None);
                        }
                        match self.redelegation(store, &delegator, src, &dst)? {
                            Some(red) => self.redelegation_response(store, red).map(Some),
                            None => Ok(None),
                        }
                    },
                )
            }
            (delegator, _) => paginate(
                store,
                &redelegations_prefix(delegator.as_ref()),
                page,
                |suffix, value| {
                    let red: Redelegation = decode(suffix, value)?;
                    if !matches(&red.validator_src, &red.validator_dst) {
                        return Ok(None);
                    }
                    self.redelegation_response(store, red).map(Some)
                },
            ),
        }
    }

    fn delegate(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgDelegate,
    ) -> Result<Decimal, StakingError> {
        msg.validate_basic()?;
        self.check_denom(&msg.amount)?;

        let mut validator = self.get_validator(&*ctx.store, &msg.validator)?;
        let amount = msg.amount.amount;

        bank::send(
            &mut *ctx.store,
            &msg.delegator,
            &Self::pool_for(&validator),
            &self.params.bond_denom,
            amount,
        )?;
        let new_shares =
            self.add_delegation(&mut *ctx.store, &msg.delegator, &mut validator, amount)?;

        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "delegated {} from {} to {}, issued {} shares",
                amount, msg.delegator, msg.validator, new_shares
            );
        }

        ctx.events.emit(StakingEvent::Delegate {
            delegator: msg.delegator,
            validator: msg.validator,
            amount,
            new_shares,
        });
        Ok(new_shares)
    }

    fn undelegate(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgUndelegate,
    ) -> Result<i64, StakingError> {
        msg.validate_basic()?;
        self.check_denom(&msg.amount)?;

        let mut validator = self.get_validator(&*ctx.store, &msg.validator)?;
        let shares = validator.shares_from_tokens(msg.amount.amount)?;

        let key = unbonding_key(&msg.delegator, &msg.validator);
        let mut ubd = ctx
            .store
            .load::<UnbondingDelegation>(&key)?
            .unwrap_or_else(|| UnbondingDelegation {
                delegator: msg.delegator,
                validator: msg.validator,
                entries: Vec::new(),
            });
        if ubd.entries.len() >= self.params.max_entries as usize {
            return Err(StakingError::MaxUnbondingEntries);
        }

        let was_bonded = validator.is_bonded();
        let amount = self.unbond(&mut *ctx.store, &msg.delegator, &mut validator, &shares)?;
        if was_bonded {
            bank::send(
                &mut *ctx.store,
                &BONDED_POOL,
                &NOT_BONDED_POOL,
                &self.params.bond_denom,
                amount,
            )?;
        }

        let completion_time = ctx.block.time + self.params.unbonding_time;
        let unbonding_id = self.next_unbonding_id(&mut *ctx.store)?;
        ubd.entries.push(UnbondingDelegationEntry {
            creation_height: ctx.block.height,
            completion_time,
            initial_balance: amount,
            balance: amount,
            unbonding_id,
            unbonding_on_hold_ref_count: 0,
        });
        ctx.store.store(key, &ubd)?;

        trace!(
            "unbonding {} from {} on {} until {}",
            amount,
            msg.delegator,
            msg.validator,
            completion_time
        );

        ctx.events.emit(StakingEvent::Unbond {
            delegator: msg.delegator,
            validator: msg.validator,
            amount,
            completion_time,
        });
        Ok(completion_time)
    }

    fn begin_redelegate(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgBeginRedelegate,
    ) -> Result<i64, StakingError> {
        msg.validate_basic()?;
        self.check_denom(&msg.amount)?;

        let mut src = self.get_validator(&*ctx.store, &msg.validator_src)?;
        let mut dst = self.get_validator(&*ctx.store, &msg.validator_dst)?;

        let now = ctx.block.time;
        if self.has_receiving_redelegation(&*ctx.store, &msg.delegator, &msg.validator_src, now)? {
            return Err(StakingError::TransitiveRedelegation);
        }

        let mut red = self
            .redelegation(
                &*ctx.store,
                &msg.delegator,
                &msg.validator_src,
                &msg.validator_dst,
            )?
            .unwrap_or_else(|| Redelegation {
                delegator: msg.delegator,
                validator_src: msg.validator_src,
                validator_dst: msg.validator_dst,
                entries: Vec::new(),
            });
        red.entries.retain(|e| e.completion_time > now);
        if red.entries.len() >= self.params.max_entries as usize {
            return Err(StakingError::MaxRedelegationEntries);
        }

        let shares = src.shares_from_tokens(msg.amount.amount)?;
        let amount = self.unbond(&mut *ctx.store, &msg.delegator, &mut src, &shares)?;
        if amount.is_zero() {
            return Err(StakingError::InvalidShares);
        }

        bank::send(
            &mut *ctx.store,
            &Self::pool_for(&src),
            &Self::pool_for(&dst),
            &self.params.bond_denom,
            amount,
        )?;
        let shares_dst = self.add_delegation(&mut *ctx.store, &msg.delegator, &mut dst, amount)?;

        let completion_time = now + self.params.unbonding_time;
        red.entries.push(RedelegationEntry {
            creation_height: ctx.block.height,
            completion_time,
            initial_balance: amount,
            shares_dst,
        });
        self.save_redelegation(&mut *ctx.store, &red)?;

        ctx.events.emit(StakingEvent::Redelegate {
            delegator: msg.delegator,
            validator_src: msg.validator_src,
            validator_dst: msg.validator_dst,
            amount,
            completion_time,
        });
        Ok(completion_time)
    }

    fn cancel_unbonding_delegation(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgCancelUnbondingDelegation,
    ) -> Result<(), StakingError> {
        msg.validate_basic()?;
        self.check_denom(&msg.amount)?;

        let mut validator = self.get_validator(&*ctx.store, &msg.validator)?;

        let key = unbonding_key(&msg.delegator, &msg.validator);
        let mut ubd: UnbondingDelegation = ctx
            .store
            .load(&key)?
            .ok_or(StakingError::NoUnbondingDelegation)?;

        let index = ubd
            .entries
            .iter()
            .position(|e| e.creation_height == msg.creation_height && !e.is_mature(ctx.block.time))
            .ok_or(StakingError::UnbondingEntryNotFound {
                height: msg.creation_height,
            })?;

        let amount = msg.amount.amount;
        let balance = ubd.entries[index].balance;
        if amount > balance {
            return Err(StakingError::AmountExceedsEntryBalance);
        }
        if amount == balance {
            ubd.entries.remove(index);
        } else {
            let entry = &mut ubd.entries[index];
            entry.balance = balance - amount;
            entry.initial_balance = entry.initial_balance.saturating_sub(amount);
        }

        if ubd.entries.is_empty() {
            ctx.store.delete(&key)?;
        } else {
            ctx.store.store(key, &ubd)?;
        }

        // Tokens never left the not-bonded pool
        bank::send(
            &mut *ctx.store,
            &NOT_BONDED_POOL,
            &Self::pool_for(&validator),
            &self.params.bond_denom,
            amount,
        )?;
        self.add_delegation(&mut *ctx.store, &msg.delegator, &mut validator, amount)?;

        ctx.events.emit(StakingEvent::CancelUnbondingDelegation {
            delegator: msg.delegator,
            validator: msg.validator,
            amount,
            creation_height: msg.creation_height,
        });
        Ok(())
    }
}
