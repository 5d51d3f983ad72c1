//! Staking read models
//!
//! Projections of native staking state. The bridge only reads these, every
//! mutation goes through the staking keeper.

mod delegation;
mod status;
mod validator;

pub use delegation::*;
pub use status::BondStatus;
pub use validator::Validator;
