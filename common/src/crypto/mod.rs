//! Account addresses and hashes, shared with the VM side.
//!
//! Validators and delegators live in the same 20-byte address space: an
//! operator address is just the account that runs the validator.

pub use alloy_primitives::{address, keccak256, Address, B256};

use crate::{
    config::{ADDRESS_SIZE, HASH_SIZE},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

impl Serializer for Address {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Address::new(reader.read_bytes_20()?))
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_address(self);
    }

    fn size(&self) -> usize {
        ADDRESS_SIZE
    }
}

impl Serializer for B256 {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(B256::new(reader.read_bytes_32()?))
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_hash(self);
    }

    fn size(&self) -> usize {
        HASH_SIZE
    }
}
