//! Native staking module, consumed by the bridge through [`StakingKeeper`].

pub mod bank;
mod error;
mod events;
mod keeper;
pub mod keys;
mod msgs;
mod params;

use bridge_common::{
    crypto::Address,
    decimal::Decimal,
    pagination::{PageRequest, PageResponse},
    staking::{BondStatus, Delegation, Redelegation, RedelegationResponse, UnbondingDelegation, Validator},
};

use crate::{context::BlockInfo, state::KvStore};

pub use error::StakingError;
pub use events::{EventManager, StakingEvent};
pub use keeper::NativeStakingKeeper;
pub use msgs::*;
pub use params::StakingParams;

/// Mutable view handed to the keeper for one message
pub struct StakingContext<'a> {
    pub store: &'a mut dyn KvStore,
    pub block: BlockInfo,
    pub events: &'a mut EventManager,
}

impl<'a> StakingContext<'a> {
    pub fn new(store: &'a mut dyn KvStore, block: BlockInfo, events: &'a mut EventManager) -> Self {
        Self {
            store,
            block,
            events,
        }
    }
}

/// Criteria of a redelegations lookup, `None` means "any"
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedelegationFilter {
    pub delegator: Option<Address>,
    pub validator_src: Option<Address>,
    pub validator_dst: Option<Address>,
}

/// Public interface of the staking module
pub trait StakingKeeper {
    fn params(&self) -> &StakingParams;

    fn validator(
        &self,
        store: &dyn KvStore,
        operator: &Address,
    ) -> Result<Option<Validator>, StakingError>;

    fn validators(
        &self,
        store: &dyn KvStore,
        status: Option<BondStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<Validator>, PageResponse), StakingError>;

    fn delegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator: &Address,
    ) -> Result<Option<Delegation>, StakingError>;

    fn unbonding_delegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator: &Address,
    ) -> Result<Option<UnbondingDelegation>, StakingError>;

    fn redelegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator_src: &Address,
        validator_dst: &Address,
    ) -> Result<Option<Redelegation>, StakingError>;

    fn redelegations(
        &self,
        store: &dyn KvStore,
        filter: &RedelegationFilter,
        page: &PageRequest,
    ) -> Result<(Vec<RedelegationResponse>, PageResponse), StakingError>;

    /// Returns the shares issued for the delegated amount
    fn delegate(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgDelegate,
    ) -> Result<Decimal, StakingError>;

    /// Returns the completion time of the unbonding entry
    fn undelegate(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgUndelegate,
    ) -> Result<i64, StakingError>;

    /// Returns the completion time of the redelegation entry
    fn begin_redelegate(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgBeginRedelegate,
    ) -> Result<i64, StakingError>;

    fn cancel_unbonding_delegation(
        &self,
        ctx: &mut StakingContext<'_>,
        msg: &MsgCancelUnbondingDelegation,
    ) -> Result<(), StakingError>;
}
