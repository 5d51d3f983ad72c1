//! Read-only methods.
//!
//! Queries run directly against the caller's store and never write to it.
//! Any address is accepted, accounts without history get zero values.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use bridge_common::{
    decimal::Decimal,
    staking::{BondStatus, Coin},
};
use log::trace;

use crate::{
    abi::uint,
    args, authorization,
    context::BlockInfo,
    error::PrecompileError,
    outputs,
    staking::{RedelegationFilter, StakingError, StakingKeeper},
    state::KvStore,
};

/// Page key some encoders send for "no key"
const EMPTY_KEY_SENTINEL: [u8; 1] = [0];

pub struct QueryAdapter<'a, K: StakingKeeper + ?Sized> {
    keeper: &'a K,
    store: &'a dyn KvStore,
    block: BlockInfo,
}

impl<'a, K: StakingKeeper + ?Sized> QueryAdapter<'a, K> {
    pub fn new(keeper: &'a K, store: &'a dyn KvStore, block: BlockInfo) -> Self {
        Self {
            keeper,
            store,
            block,
        }
    }

    fn bond_denom(&self) -> String {
        self.keeper.params().bond_denom.clone()
    }

    /// `delegation(address delegator, address validator)`
    pub fn delegation(&self, args: Vec<DynSolValue>) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, validator] = args::take(args)?;
        let delegator = args::delegator(delegator)?;
        let validator = args::validator(validator)?;

        let Some(delegation) = self.keeper.delegation(self.store, &delegator, &validator)? else {
            return Ok(outputs::delegation(
                &Decimal::zero(),
                &Coin::new(self.bond_denom(), U256::ZERO),
            ));
        };

        let balance = match self.keeper.validator(self.store, &validator)? {
            Some(validator) => validator
                .tokens_from_shares(&delegation.shares)
                .map_err(StakingError::from)?,
            None => U256::ZERO,
        };
        Ok(outputs::delegation(
            &delegation.shares,
            &Coin::new(self.bond_denom(), balance),
        ))
    }

    /// `unbondingDelegation(address delegator, address validator)`
    pub fn unbonding_delegation(
        &self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, validator] = args::take(args)?;
        let delegator = args::delegator(delegator)?;
        let validator = args::validator(validator)?;

        let ubd = self
            .keeper
            .unbonding_delegation(self.store, &delegator, &validator)?;
        Ok(vec![outputs::unbonding_delegation(ubd.as_ref())])
    }

    /// `validator(address operator)`
    pub fn validator(&self, args: Vec<DynSolValue>) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [operator] = args::take(args)?;
        let operator = args::validator(operator)?;

        let validator = self
            .keeper
            .validator(self.store, &operator)?
            .unwrap_or_default();
        Ok(vec![outputs::validator(&validator)])
    }

    /// `validators(string status, PageRequest page)`, an empty status matches all
    pub fn validators(&self, args: Vec<DynSolValue>) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [status, page] = args::take(args)?;
        let status = args::string(status, "status")?;
        let mut page = args::page_request(page)?;

        let status = BondStatus::parse_filter(&status)
            .map_err(|_| PrecompileError::InvalidStatus(status.clone()))?;
        if page.key == EMPTY_KEY_SENTINEL {
            page.key.clear();
        }

        let (validators, page) = self.keeper.validators(self.store, status, &page)?;
        trace!("validators query returned {} items", validators.len());
        Ok(outputs::validators(&validators, &page))
    }

    /// `redelegation(address delegator, address src, address dst)`
    pub fn redelegation(
        &self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, src, dst] = args::take(args)?;
        let delegator = args::delegator(delegator)?;
        let src = args::required_validator(src)?;
        let dst = args::required_validator(dst)?;

        let red = self.keeper.redelegation(self.store, &delegator, &src, &dst)?;
        Ok(vec![outputs::redelegation(red.as_ref())])
    }

    /// `redelegations(address delegator, address src, address dst, PageRequest page)`.
    ///
    /// Zero addresses are wildcards. At least a delegator or a source
    /// validator must be given, the store has no destination-only index.
    pub fn redelegations(
        &self,
        args: Vec<DynSolValue>,
    ) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [delegator, src, dst, page] = args::take(args)?;
        let filter = RedelegationFilter {
            delegator: args::delegator_filter(delegator)?,
            validator_src: args::validator_filter(src)?,
            validator_dst: args::validator_filter(dst)?,
        };
        let page = args::page_request(page)?;

        match &filter {
            RedelegationFilter {
                delegator: None,
                validator_src: None,
                ..
            } => return Err(PrecompileError::InvalidRedelegationQuery),
            RedelegationFilter {
                delegator: Some(delegator),
                validator_src: Some(src),
                validator_dst: Some(dst),
            } => {
                if self
                    .keeper
                    .redelegation(self.store, delegator, src, dst)?
                    .is_none()
                {
                    return Err(StakingError::RedelegationNotFound {
                        delegator: *delegator,
                        validator: *src,
                    }
                    .into());
                }
            }
            _ => {}
        }

        let (responses, page) = self.keeper.redelegations(self.store, &filter, &page)?;
        Ok(outputs::redelegations(&responses, &page))
    }

    /// `allowance(address grantee, address granter, string msgType)`
    pub fn allowance(&self, args: Vec<DynSolValue>) -> Result<Vec<DynSolValue>, PrecompileError> {
        let [grantee, granter, msg_type] = args::take(args)?;
        let grantee = args::grantee(grantee)?;
        let granter = args::granter(granter)?;
        let msg_type = args::string(msg_type, "method")?;

        let remaining =
            authorization::allowance(self.store, &granter, &grantee, &msg_type, self.block.time)?;
        Ok(vec![uint(remaining)])
    }
}
