use bridge_common::{
    config::STAKING_PRECOMPILE_ADDRESS,
    crypto::Address,
};

/// Ledger position of the enclosing transaction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockInfo {
    pub height: i64,
    /// Unix seconds
    pub time: i64,
}

impl BlockInfo {
    pub fn new(height: i64, time: i64) -> Self {
        Self { height, time }
    }
}

/// Per-call execution context, owned by the dispatcher for the call's duration
#[derive(Clone, Debug)]
pub struct CallContext {
    /// Direct caller (`msg.sender`)
    pub caller: Address,
    /// Account that signed the enclosing transaction
    pub origin: Address,
    /// Address the precompile was reached at
    pub contract: Address,
    pub gas_limit: u64,
    pub block: BlockInfo,
    /// Static call, state changes are forbidden
    pub read_only: bool,
    /// Nesting level of this call, 0 for a top-level call
    pub depth: usize,
}

impl CallContext {
    pub fn new(caller: Address, gas_limit: u64, block: BlockInfo) -> Self {
        Self {
            caller,
            origin: caller,
            contract: STAKING_PRECOMPILE_ADDRESS,
            gas_limit,
            block,
            read_only: false,
            depth: 0,
        }
    }

    pub fn with_origin(mut self, origin: Address) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }
}
