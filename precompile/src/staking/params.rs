use bridge_common::config::{DEFAULT_BOND_DENOM, DEFAULT_MAX_ENTRIES, DEFAULT_UNBONDING_TIME};
use serde::{Deserialize, Serialize};

fn default_bond_denom() -> String {
    DEFAULT_BOND_DENOM.to_owned()
}

const fn default_unbonding_time() -> i64 {
    DEFAULT_UNBONDING_TIME
}

const fn default_max_entries() -> u32 {
    DEFAULT_MAX_ENTRIES
}

/// Staking module parameters.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
pub struct StakingParams {
    /// Denomination accepted for delegations.
    #[clap(name = "staking-bond-denom", long, default_value_t = default_bond_denom())]
    #[serde(default = "default_bond_denom")]
    pub bond_denom: String,

    /// Seconds before unbonded tokens (and redelegations) mature.
    #[clap(name = "staking-unbonding-time", long, default_value_t = default_unbonding_time())]
    #[serde(default = "default_unbonding_time")]
    pub unbonding_time: i64,

    /// Max unbonding or redelegation entries per pair.
    #[clap(name = "staking-max-entries", long, default_value_t = default_max_entries())]
    #[serde(default = "default_max_entries")]
    pub max_entries: u32,
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            bond_denom: default_bond_denom(),
            unbonding_time: DEFAULT_UNBONDING_TIME,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = StakingParams::default();
        assert_eq!(params.bond_denom, "astake");
        assert_eq!(params.unbonding_time, 21 * 24 * 60 * 60);
        assert_eq!(params.max_entries, 7);
    }
}
