#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod crypto;
pub mod decimal;
pub mod pagination;
pub mod serializer;
pub mod staking;
