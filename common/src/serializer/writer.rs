use alloy_primitives::U256;
use thiserror::Error;

use super::MAX_ARRAY_SIZE;
use crate::crypto::{Address, B256};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriterError {
    #[error("length {len} does not fit a length prefix, max is {max}")]
    LengthOverflow { len: usize, max: usize },
}

#[derive(Default)]
pub struct Writer {
    bytes: Vec<u8>,
    // First length that didn't fit its prefix
    overflow: Option<WriterError>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u256(&mut self, value: &U256) {
        self.write_bytes(&value.to_be_bytes::<32>());
    }

    pub fn write_hash(&mut self, hash: &B256) {
        self.write_bytes(hash.as_slice());
    }

    pub fn write_address(&mut self, address: &Address) {
        self.write_bytes(address.as_slice());
    }

    /// u16 length prefix, a longer length poisons the writer
    pub fn write_len(&mut self, len: usize) {
        match u16::try_from(len) {
            Ok(len) => self.write_u16(len),
            Err(_) => {
                self.overflow.get_or_insert(WriterError::LengthOverflow {
                    len,
                    max: MAX_ARRAY_SIZE,
                });
                self.write_u16(u16::MAX);
            }
        }
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_len(value.len());
        self.write_bytes(value.as_bytes());
    }

    pub fn write_var_bytes(&mut self, value: &[u8]) {
        self.write_len(value.len());
        self.write_bytes(value);
    }

    pub fn total_write(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Written bytes, or the first length overflow met while writing
    pub fn finish(self) -> Result<Vec<u8>, WriterError> {
        match self.overflow {
            Some(err) => Err(err),
            None => Ok(self.bytes),
        }
    }
}
