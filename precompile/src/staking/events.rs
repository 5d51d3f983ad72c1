use bridge_common::{crypto::Address, decimal::Decimal};
use alloy_primitives::U256;

/// Events emitted by the staking module while handling a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StakingEvent {
    Delegate {
        delegator: Address,
        validator: Address,
        amount: U256,
        new_shares: Decimal,
    },
    Unbond {
        delegator: Address,
        validator: Address,
        amount: U256,
        completion_time: i64,
    },
    Redelegate {
        delegator: Address,
        validator_src: Address,
        validator_dst: Address,
        amount: U256,
        completion_time: i64,
    },
    CancelUnbondingDelegation {
        delegator: Address,
        validator: Address,
        amount: U256,
        creation_height: i64,
    },
    CompleteUnbonding {
        delegator: Address,
        validator: Address,
        amount: U256,
    },
}

/// Collects events for one state transition, dropped with it on failure
#[derive(Debug, Default)]
pub struct EventManager {
    events: Vec<StakingEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: StakingEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[StakingEvent] {
        &self.events
    }
}
