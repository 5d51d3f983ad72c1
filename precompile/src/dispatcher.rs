//! Entry point of the precompile.
//!
//! A call is routed by its selector to a query or a transaction handler.
//! Checks run in a fixed order: call depth, input length, selector, gas,
//! write protection, argument decoding. Transactions execute against a
//! [`CacheStore`] that is committed only when the handler succeeds.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Selector;
use bridge_common::config::SELECTOR_SIZE;
use itertools::Itertools;
use log::{debug, log_enabled, Level};

use crate::{
    abi::{describe, encode},
    args,
    config::PrecompileConfig,
    context::CallContext,
    error::PrecompileError,
    events::Log,
    gas::required_gas,
    methods::{self, Method, MethodId},
    query::QueryAdapter,
    staking::StakingKeeper,
    state::{CacheStore, KvStore},
    tx::TxAdapter,
};

/// Result of a successful call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutput {
    /// ABI encoded return values
    pub data: Vec<u8>,
    pub logs: Vec<Log>,
    pub gas_used: u64,
}

pub struct StakingPrecompile<K: StakingKeeper> {
    keeper: K,
    config: PrecompileConfig,
}

impl<K: StakingKeeper> StakingPrecompile<K> {
    pub fn new(keeper: K, config: PrecompileConfig) -> Self {
        Self { keeper, config }
    }

    pub fn config(&self) -> &PrecompileConfig {
        &self.config
    }

    /// Gas a call with this input would be charged, 0 for an unroutable input
    pub fn required_gas(&self, input: &[u8]) -> u64 {
        match input.split_first_chunk::<SELECTOR_SIZE>() {
            Some((selector, data)) => methods::lookup(selector)
                .map_or(0, |method| required_gas(&self.config.gas, method, data.len())),
            None => 0,
        }
    }

    /// Execute raw calldata: a 4 byte selector followed by the encoded arguments
    pub fn run(
        &self,
        store: &mut dyn KvStore,
        ctx: &CallContext,
        input: &[u8],
    ) -> Result<CallOutput, PrecompileError> {
        let result = self.route(store, ctx, input);
        self.trace_result(ctx, &result);
        result
    }

    /// Execute an already decoded call
    pub fn call_method(
        &self,
        store: &mut dyn KvStore,
        ctx: &CallContext,
        id: MethodId,
        args: Vec<DynSolValue>,
    ) -> Result<CallOutput, PrecompileError> {
        let result = self.check_depth(ctx).and_then(|_| {
            let gas_used = self.prepare(ctx, id.method(), encode(&args).len())?;
            self.execute(store, ctx, id, args, gas_used)
        });
        self.trace_result(ctx, &result);
        result
    }

    fn route(
        &self,
        store: &mut dyn KvStore,
        ctx: &CallContext,
        input: &[u8],
    ) -> Result<CallOutput, PrecompileError> {
        self.check_depth(ctx)?;

        let Some((selector, data)) = input.split_first_chunk::<SELECTOR_SIZE>() else {
            return Err(PrecompileError::InputTooShort(input.len()));
        };
        let method = methods::lookup(selector)
            .ok_or(PrecompileError::UnknownMethod(Selector::from(*selector)))?;

        let gas_used = self.prepare(ctx, method, data.len())?;
        let args = args::decode_args(method, data)?;
        self.execute(store, ctx, method.id, args, gas_used)
    }

    fn check_depth(&self, ctx: &CallContext) -> Result<(), PrecompileError> {
        if ctx.depth > self.config.max_call_depth {
            return Err(PrecompileError::MaxCallDepth(self.config.max_call_depth));
        }
        Ok(())
    }

    /// Charge gas and enforce write protection, returns the gas used
    fn prepare(
        &self,
        ctx: &CallContext,
        method: &Method,
        args_len: usize,
    ) -> Result<u64, PrecompileError> {
        let required = required_gas(&self.config.gas, method, args_len);
        if required > ctx.gas_limit {
            return Err(PrecompileError::OutOfGas {
                required,
                available: ctx.gas_limit,
            });
        }
        if ctx.read_only && method.is_mutating() {
            return Err(PrecompileError::WriteProtection(method.name()));
        }
        Ok(required)
    }

    fn execute(
        &self,
        store: &mut dyn KvStore,
        ctx: &CallContext,
        id: MethodId,
        args: Vec<DynSolValue>,
        gas_used: u64,
    ) -> Result<CallOutput, PrecompileError> {
        if log_enabled!(Level::Debug) {
            debug!(
                "{} -> {}({})",
                ctx.caller,
                id.name(),
                args.iter().map(describe).join(", ")
            );
        }

        let (output, logs) = match id {
            MethodId::Delegation => self.query(store, ctx, |q| q.delegation(args)),
            MethodId::UnbondingDelegation => {
                self.query(store, ctx, |q| q.unbonding_delegation(args))
            }
            MethodId::Validator => self.query(store, ctx, |q| q.validator(args)),
            MethodId::Validators => self.query(store, ctx, |q| q.validators(args)),
            MethodId::Redelegation => self.query(store, ctx, |q| q.redelegation(args)),
            MethodId::Redelegations => self.query(store, ctx, |q| q.redelegations(args)),
            MethodId::Allowance => self.query(store, ctx, |q| q.allowance(args)),
            MethodId::Delegate => self.transact(store, ctx, |tx| tx.delegate(args)),
            MethodId::Undelegate => self.transact(store, ctx, |tx| tx.undelegate(args)),
            MethodId::Redelegate => self.transact(store, ctx, |tx| tx.redelegate(args)),
            MethodId::CancelUnbondingDelegation => {
                self.transact(store, ctx, |tx| tx.cancel_unbonding_delegation(args))
            }
            MethodId::Approve => self.transact(store, ctx, |tx| tx.approve(args)),
            MethodId::Revoke => self.transact(store, ctx, |tx| tx.revoke(args)),
            MethodId::IncreaseAllowance => {
                self.transact(store, ctx, |tx| tx.increase_allowance(args))
            }
            MethodId::DecreaseAllowance => {
                self.transact(store, ctx, |tx| tx.decrease_allowance(args))
            }
        }?;

        Ok(CallOutput {
            data: encode(&output),
            logs,
            gas_used,
        })
    }

    fn query<F>(
        &self,
        store: &dyn KvStore,
        ctx: &CallContext,
        f: F,
    ) -> Result<(Vec<DynSolValue>, Vec<Log>), PrecompileError>
    where
        F: FnOnce(&QueryAdapter<'_, K>) -> Result<Vec<DynSolValue>, PrecompileError>,
    {
        let query = QueryAdapter::new(&self.keeper, store, ctx.block);
        Ok((f(&query)?, Vec::new()))
    }

    fn transact<F>(
        &self,
        store: &mut dyn KvStore,
        ctx: &CallContext,
        f: F,
    ) -> Result<(Vec<DynSolValue>, Vec<Log>), PrecompileError>
    where
        F: FnOnce(&mut TxAdapter<'_, K>) -> Result<Vec<DynSolValue>, PrecompileError>,
    {
        let mut cache = CacheStore::new(store);
        let mut tx = TxAdapter::new(&self.keeper, &mut cache, ctx, &self.config);
        match f(&mut tx) {
            Ok(output) => {
                let logs = tx.into_logs();
                cache.commit()?;
                Ok((output, logs))
            }
            Err(err) => {
                drop(tx);
                cache.discard();
                Err(err)
            }
        }
    }

    fn trace_result(&self, ctx: &CallContext, result: &Result<CallOutput, PrecompileError>) {
        match result {
            Ok(output) => {
                if log_enabled!(Level::Debug) {
                    debug!(
                        "call from {} succeeded: {} bytes, {} logs, {} gas",
                        ctx.caller,
                        output.data.len(),
                        output.logs.len(),
                        output.gas_used
                    );
                }
            }
            Err(err) => debug!("call from {} failed ({}): {}", ctx.caller, err.kind(), err),
        }
    }
}
