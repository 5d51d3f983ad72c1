//! Configuration for the staking precompile.

use bridge_common::config::{DEFAULT_GRANT_EXPIRATION, DEFAULT_MAX_CALL_DEPTH};
use serde::{Deserialize, Serialize};

/// Flat cost charged for a read-only call.
pub const DEFAULT_READ_COST_FLAT: u64 = 1000;
/// Cost per calldata byte for a read-only call.
pub const DEFAULT_READ_COST_PER_BYTE: u64 = 3;
/// Flat cost charged for a state-changing call.
pub const DEFAULT_WRITE_COST_FLAT: u64 = 2000;
/// Cost per calldata byte for a state-changing call.
pub const DEFAULT_WRITE_COST_PER_BYTE: u64 = 30;

const fn default_read_cost_flat() -> u64 {
    DEFAULT_READ_COST_FLAT
}

const fn default_read_cost_per_byte() -> u64 {
    DEFAULT_READ_COST_PER_BYTE
}

const fn default_write_cost_flat() -> u64 {
    DEFAULT_WRITE_COST_FLAT
}

const fn default_write_cost_per_byte() -> u64 {
    DEFAULT_WRITE_COST_PER_BYTE
}

const fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}

const fn default_grant_expiration() -> i64 {
    DEFAULT_GRANT_EXPIRATION
}

/// Gas schedule of the precompile.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
pub struct GasConfig {
    #[clap(name = "precompile-read-cost-flat", long, default_value_t = default_read_cost_flat())]
    #[serde(default = "default_read_cost_flat")]
    pub read_cost_flat: u64,

    #[clap(name = "precompile-read-cost-per-byte", long, default_value_t = default_read_cost_per_byte())]
    #[serde(default = "default_read_cost_per_byte")]
    pub read_cost_per_byte: u64,

    #[clap(name = "precompile-write-cost-flat", long, default_value_t = default_write_cost_flat())]
    #[serde(default = "default_write_cost_flat")]
    pub write_cost_flat: u64,

    #[clap(name = "precompile-write-cost-per-byte", long, default_value_t = default_write_cost_per_byte())]
    #[serde(default = "default_write_cost_per_byte")]
    pub write_cost_per_byte: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            read_cost_flat: DEFAULT_READ_COST_FLAT,
            read_cost_per_byte: DEFAULT_READ_COST_PER_BYTE,
            write_cost_flat: DEFAULT_WRITE_COST_FLAT,
            write_cost_per_byte: DEFAULT_WRITE_COST_PER_BYTE,
        }
    }
}

/// Configuration for the staking precompile.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
pub struct PrecompileConfig {
    /// Maximum nesting level at which the precompile still accepts calls.
    #[clap(name = "precompile-max-call-depth", long, default_value_t = default_max_call_depth())]
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    /// Lifetime in seconds of grants created through `approve`.
    #[clap(name = "precompile-grant-expiration", long, default_value_t = default_grant_expiration())]
    #[serde(default = "default_grant_expiration")]
    pub grant_expiration_secs: i64,

    #[clap(flatten)]
    #[serde(default)]
    pub gas: GasConfig,
}

impl Default for PrecompileConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            grant_expiration_secs: DEFAULT_GRANT_EXPIRATION,
            gas: GasConfig::default(),
        }
    }
}
