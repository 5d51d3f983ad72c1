//! State-changing methods.
//!
//! Each handler runs against the call's cache store. Grant debits, keeper
//! messages and the logs they produce are only kept if the dispatcher
//! commits the cache, so a failure anywhere leaves no trace.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};
use bridge_common::staking::Coin;
use log::{debug, log_enabled, Level};

use crate::{
    abi::int64,
    args,
    authorization::{self, AuthorizationError, Grant},
    config::PrecompileConfig,
    context::CallContext,
    error::PrecompileError,
    events::{allowance_change_log, approval_log, revocation_log, staking_log, Log},
    staking::{
        EventManager, MsgBeginRedelegate, MsgCancelUnbondingDelegation, MsgDelegate,
        MsgUndelegate, StakingContext, StakingError, StakingKeeper, StakingMsg,
    },
    state::KvStore,
};

pub struct TxAdapter<'a, K: StakingKeeper + ?Sized> {
    keeper: &'a K,
    store: &'a mut dyn KvStore,
    ctx: &'a CallContext,
    config: &'a PrecompileConfig,
    logs: Vec<Log>,
}

impl<'a, K: StakingKeeper + ?Sized> TxAdapter<'a, K> {
    pub fn new(
        keeper: &'a K,
        store: &'a mut dyn KvStore,
        ctx: &'a CallContext,
        config: &'a PrecompileConfig,
    ) -> Self {
        Self {
            keeper,
            store,
            ctx,
            config,
            logs: Vec::new(),
        }
    }

    /// Logs emitted so far, in order
    pub fn into_logs(self) -> Vec<Log> {
        self.logs
    }

    fn coin(&self, amount: U256) -> Coin {
        Coin::new(self.keeper.params().bond_denom.clone(), amount)
    }

    /// Debit the delegator's grant to the caller when the caller acts on
    /// someone else's behalf. Self-directed calls need no grant.
    fn authorize<M: StakingMsg>(&mut self, msg: &M) -> Result<(), PrecompileError> {
        let delegator = msg.delegator();
        if *delegator == self.ctx.caller {
            return Ok(());
        }

        let remaining = authorization::consume(
            &mut *self.store,
            delegator,
            &self.ctx.caller,
            M::TYPE_URL,
            msg.amount().amount,
            self.ctx.block.time,
        )?;
        if log_enabled!(Level::Debug) {
            debug!(
                "{} acting for {} on {}, remaining allowance {}",
                self.ctx.caller,
                delegator,
                M::TYPE_URL,
                remaining.map_or_else(|| "unlimited".to_owned(), |r| r.to_string())
            );
        }
        Ok(())
    }

    /// Run one keeper message and turn its events into logs
    fn execute<T, F>(&mut self, f: F) -> Result<T, PrecompileError>
    where
        F: FnOnce(&K, &mut StakingContext<'_>) -> Result<T, StakingError>,
    {
        let mut events = EventManager::new();
        let result = {
            let mut staking = StakingContext::new(&mut *self.store, self.ctx.block, &mut events);
            f(self.keeper, &mut staking)?
        };

        let contract = self.ctx.contract;
        self.logs.extend(
            events
                .events()
                .iter()
                .filter_map(|event| staking_log(contract, event)),
        );
        Ok(result)
    }

    // ===== Staking =====

    /// `delegate(address delegator, address validator, uint256 amount) -> bool`
    pub fn delegate(
        &mut self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, validator, amount] = args::take(args)?;
        let msg = MsgDelegate {
            delegator: args::delegator(delegator)?,
            validator: args::validator(validator)?,
            amount: self.coin(args::amount(amount)?),
        };

        self.authorize(&msg)?;
        self.execute(|keeper, ctx| keeper.delegate(ctx, &msg))?;
        Ok(vec![DynSolValue::Bool(true)])
    }

    /// `undelegate(address delegator, address validator, uint256 amount) -> int64 completionTime`
    pub fn undelegate(
        &mut self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, validator, amount] = args::take(args)?;
        let msg = MsgUndelegate {
            delegator: args::delegator(delegator)?,
            validator: args::validator(validator)?,
            amount: self.coin(args::amount(amount)?),
        };

        self.authorize(&msg)?;
        let completion_time = self.execute(|keeper, ctx| keeper.undelegate(ctx, &msg))?;
        Ok(vec![int64(completion_time)])
    }

    /// `redelegate(address delegator, address src, address dst, uint256 amount) -> int64 completionTime`
    pub fn redelegate(
        &mut self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, src, dst, amount] = args::take(args)?;
        let msg = MsgBeginRedelegate {
            delegator: args::delegator(delegator)?,
            validator_src: args::validator(src)?,
            validator_dst: args::validator(dst)?,
            amount: self.coin(args::amount(amount)?),
        };

        self.authorize(&msg)?;
        let completion_time = self.execute(|keeper, ctx| keeper.begin_redelegate(ctx, &msg))?;
        Ok(vec![int64(completion_time)])
    }

    /// `cancelUnbondingDelegation(address delegator, address validator, uint256 amount, uint256 creationHeight) -> bool`
    pub fn cancel_unbonding_delegation(
        &mut self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, validator, amount, height] = args::take(args)?;
        let msg = MsgCancelUnbondingDelegation {
            delegator: args::delegator(delegator)?,
            validator: args::validator(validator)?,
            amount: self.coin(args::amount(amount)?),
            creation_height: args::height(height)?,
        };

        self.authorize(&msg)?;
        self.execute(|keeper, ctx| keeper.cancel_unbonding_delegation(ctx, &msg))?;
        Ok(vec![DynSolValue::Bool(true)])
    }

    // ===== Grants =====

    /// Grantee and message types of a grant management call, the caller is the granter
    fn grant_target(
        &self,
        grantee: DynSolValue,
        methods: DynSolValue,
    ) -> Result<(Address, Vec<String>), PrecompileError> {
        let grantee = args::grantee(grantee)?;
        let methods = args::methods(methods)?;
        if grantee == self.ctx.caller {
            return Err(AuthorizationError::SelfGrant.into());
        }
        for method in &methods {
            authorization::check_msg_type(method)?;
        }
        Ok((grantee, methods))
    }

    /// `approve(address grantee, uint256 amount, string[] methods) -> bool`.
    ///
    /// `2^256-1` grants an unlimited allowance, zero removes existing grants.
    pub fn approve(&mut self, args: Vec<DynSolValue>) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [grantee, amount, methods] = args::take(args)?;
        let amount = args::amount(amount)?;
        let (grantee, methods) = self.grant_target(grantee, methods)?;
        let granter = self.ctx.caller;

        let limit = (amount != U256::MAX).then_some(amount);
        let expiration = self
            .ctx
            .block
            .time
            .saturating_add(self.config.grant_expiration_secs);

        for method in &methods {
            if amount.is_zero() {
                let key = authorization::grant_key(&granter, &grantee, method);
                if self.store.has(&key)? {
                    self.store.delete(&key)?;
                }
                continue;
            }
            let grant = Grant::new(granter, grantee, method.as_str(), limit, Some(expiration));
            authorization::save_grant(&mut *self.store, &grant, self.ctx.block.time)?;
        }

        self.logs
            .push(approval_log(self.ctx.contract, grantee, granter, &methods, amount));
        Ok(vec![DynSolValue::Bool(true)])
    }

    /// `revoke(address grantee, string[] methods) -> bool`
    pub fn revoke(&mut self, args: Vec<DynSolValue>) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [grantee, methods] = args::take(args)?;
        let (grantee, methods) = self.grant_target(grantee, methods)?;
        let granter = self.ctx.caller;

        for method in &methods {
            authorization::revoke(&mut *self.store, &granter, &grantee, method)?;
        }

        self.logs
            .push(revocation_log(self.ctx.contract, grantee, granter, &methods));
        Ok(vec![DynSolValue::Bool(true)])
    }

    /// `increaseAllowance(address grantee, uint256 amount, string[] methods) -> bool`
    pub fn increase_allowance(
        &mut self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        self.change_allowance(args, authorization::increase)
    }

    /// `decreaseAllowance(address grantee, uint256 amount, string[] methods) -> bool`
    pub fn decrease_allowance(
        &mut self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        self.change_allowance(args, authorization::decrease)
    }

    fn change_allowance<F>(
        &mut self,
        args: Vec<DynSolValue>,
        change: F,
    ) -> Result<Vec<DynSolValue>, PrecompileError>
    where
        F: Fn(
            &mut dyn KvStore,
            &Address,
            &Address,
            &str,
            U256,
            i64,
        ) -> Result<U256, AuthorizationError>,
    {
        let [grantee, amount, methods] = args::take(args)?;
        let amount = args::amount(amount)?;
        let (grantee, methods) = self.grant_target(grantee, methods)?;
        let granter = self.ctx.caller;

        let values = methods
            .iter()
            .map(|method| {
                change(
                    &mut *self.store,
                    &granter,
                    &grantee,
                    method,
                    amount,
                    self.ctx.block.time,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.logs.push(allowance_change_log(
            self.ctx.contract,
            grantee,
            granter,
            &methods,
            &values,
        ));
        Ok(vec![DynSolValue::Bool(true)])
    }
}
