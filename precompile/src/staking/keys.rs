use bridge_common::{config::ADDRESS_SIZE, crypto::Address};

pub const VALIDATOR_PREFIX: u8 = 0x21;
pub const DELEGATION_PREFIX: u8 = 0x31;
pub const UNBONDING_PREFIX: u8 = 0x32;
pub const REDELEGATION_PREFIX: u8 = 0x34;
pub const REDELEGATION_BY_SRC_PREFIX: u8 = 0x35;
pub const REDELEGATION_BY_DST_PREFIX: u8 = 0x36;
pub const UNBONDING_ID_KEY: u8 = 0x37;

fn key(prefix: u8, parts: &[&Address]) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + parts.len() * ADDRESS_SIZE);
    key.push(prefix);
    for part in parts {
        key.extend_from_slice(part.as_slice());
    }
    key
}

pub fn validator_key(operator: &Address) -> Vec<u8> {
    key(VALIDATOR_PREFIX, &[operator])
}

pub fn validators_prefix() -> Vec<u8> {
    vec![VALIDATOR_PREFIX]
}

pub fn delegation_key(delegator: &Address, validator: &Address) -> Vec<u8> {
    key(DELEGATION_PREFIX, &[delegator, validator])
}

pub fn unbonding_key(delegator: &Address, validator: &Address) -> Vec<u8> {
    key(UNBONDING_PREFIX, &[delegator, validator])
}

pub fn redelegation_key(delegator: &Address, src: &Address, dst: &Address) -> Vec<u8> {
    key(REDELEGATION_PREFIX, &[delegator, src, dst])
}

pub fn redelegations_prefix(delegator: Option<&Address>) -> Vec<u8> {
    match delegator {
        Some(delegator) => key(REDELEGATION_PREFIX, &[delegator]),
        None => vec![REDELEGATION_PREFIX],
    }
}

pub fn redelegation_by_src_key(src: &Address, delegator: &Address, dst: &Address) -> Vec<u8> {
    key(REDELEGATION_BY_SRC_PREFIX, &[src, delegator, dst])
}

pub fn redelegations_by_src_prefix(src: &Address) -> Vec<u8> {
    key(REDELEGATION_BY_SRC_PREFIX, &[src])
}

pub fn redelegation_by_dst_key(dst: &Address, delegator: &Address, src: &Address) -> Vec<u8> {
    key(REDELEGATION_BY_DST_PREFIX, &[dst, delegator, src])
}

pub fn redelegations_by_dst_prefix(dst: &Address, delegator: &Address) -> Vec<u8> {
    key(REDELEGATION_BY_DST_PREFIX, &[dst, delegator])
}

/// Split a key suffix made of consecutive addresses
pub fn split_addresses<const N: usize>(suffix: &[u8]) -> Option<[Address; N]> {
    if suffix.len() != N * ADDRESS_SIZE {
        return None;
    }
    let mut out = [Address::ZERO; N];
    for (i, chunk) in suffix.chunks_exact(ADDRESS_SIZE).enumerate() {
        out[i] = Address::from_slice(chunk);
    }
    Some(out)
}
