//! Gas charged for a precompile call.
//!
//! Required gas = flat cost + per-byte cost over the argument bytes (the
//! calldata without its selector). State-changing methods are charged the
//! write schedule, queries the read schedule.

use crate::{config::GasConfig, methods::Method};

pub fn required_gas(config: &GasConfig, method: &Method, args_len: usize) -> u64 {
    let (flat, per_byte) = if method.is_mutating() {
        (config.write_cost_flat, config.write_cost_per_byte)
    } else {
        (config.read_cost_flat, config.read_cost_per_byte)
    };
    flat.saturating_add(per_byte.saturating_mul(args_len as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::MethodId;

    #[test]
    fn test_read_and_write_schedules() {
        let config = GasConfig::default();

        assert_eq!(
            required_gas(&config, MethodId::Delegation.method(), 64),
            config.read_cost_flat + 64 * config.read_cost_per_byte
        );
        assert_eq!(
            required_gas(&config, MethodId::Delegate.method(), 96),
            config.write_cost_flat + 96 * config.write_cost_per_byte
        );
    }

    #[test]
    fn test_saturates() {
        let config = GasConfig {
            read_cost_per_byte: u64::MAX,
            ..GasConfig::default()
        };
        assert_eq!(
            required_gas(&config, MethodId::Validator.method(), 2),
            u64::MAX
        );
    }
}
