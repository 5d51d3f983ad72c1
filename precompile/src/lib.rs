#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod abi;
pub mod args;
pub mod authorization;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod gas;
pub mod methods;
pub mod outputs;
pub mod query;
pub mod staking;
pub mod state;
pub mod tx;

#[cfg(test)]
mod testing;

pub use config::{GasConfig, PrecompileConfig};
pub use context::{BlockInfo, CallContext};
pub use dispatcher::{CallOutput, StakingPrecompile};
pub use error::{ErrorKind, PrecompileError};
pub use events::Log;
pub use methods::MethodId;
