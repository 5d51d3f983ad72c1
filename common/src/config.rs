use crate::crypto::{address, Address};

// Compile-time check of protocol constants
#[macro_export]
macro_rules! static_assert {
    ($cond:expr, $msg:expr) => {
        const _: () = assert!($cond, $msg);
    };
}

// 20 bytes account addresses, same as the VM side
pub const ADDRESS_SIZE: usize = 20;

// keccak256 digests
pub const HASH_SIZE: usize = 32;

// Fixed-point decimals carry 18 fractional digits
pub const DECIMAL_PRECISION: u32 = 18;

// Size of one ABI word
pub const ABI_WORD_SIZE: usize = 32;

// Size of a method selector (first 4 bytes of keccak256(signature))
pub const SELECTOR_SIZE: usize = 4;

// Staking precompile is reachable at 0x0000000000000000000000000000000000000800
pub const STAKING_PRECOMPILE_ADDRESS: Address = address!("0000000000000000000000000000000000000800");

// Message type URLs used as authorization keys
pub const MSG_DELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgDelegate";
pub const MSG_UNDELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgUndelegate";
pub const MSG_REDELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgBeginRedelegate";
pub const MSG_CANCEL_UNDELEGATION_TYPE_URL: &str =
    "/cosmos.staking.v1beta1.MsgCancelUnbondingDelegation";

// Staking defaults
pub const DEFAULT_BOND_DENOM: &str = "astake";
// 21 days
pub const DEFAULT_UNBONDING_TIME: i64 = 21 * 24 * 60 * 60;
// Max entries per unbonding / redelegation pair
pub const DEFAULT_MAX_ENTRIES: u32 = 7;

// Call depth limit of the VM
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;
// Grants created from the call surface live one year
pub const DEFAULT_GRANT_EXPIRATION: i64 = 365 * 24 * 60 * 60;

// Default page size when a query doesn't set a limit
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

static_assert!(ADDRESS_SIZE < ABI_WORD_SIZE, "Address must fit in one ABI word");
static_assert!(
    SELECTOR_SIZE < ABI_WORD_SIZE,
    "Selector must be shorter than one ABI word"
);
static_assert!(
    DEFAULT_MAX_ENTRIES > 0,
    "Max entries must allow at least one entry"
);
