//! Transactional key-value state.
//!
//! Every precompile call runs against a [`CacheStore`] stacked on top of the
//! enclosing transaction's store. Writes stay in the cache until `commit()`;
//! dropping the cache discards them.

mod cache;
mod changes;
mod memory;
mod pagination;

use bytes::Bytes;
use thiserror::Error;

use bridge_common::serializer::{ReaderError, Serializer, WriterError};

pub use cache::CacheStore;
pub use changes::Changes;
pub use memory::MemoryStore;
pub use pagination::{paginate, strip_prefix};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("corrupted entry at key {key}: {source}")]
    Corrupted {
        key: String,
        #[source]
        source: ReaderError,
    },
    #[error("entry at key {key} cannot be encoded: {source}")]
    Oversized {
        key: String,
        #[source]
        source: WriterError,
    },
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Represents the state of an entry in a write buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState<T> {
    /// The entry has been added/modified in the buffer
    Stored(T),
    /// The entry has been deleted in the buffer
    Deleted,
    /// The entry is not in the buffer, must fallback on the parent
    Absent,
}

/// Direction for prefix iteration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Ordered key-value store.
///
/// Iteration is always in key order so that results are identical on every
/// node.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StateError>;

    fn set(&mut self, key: Bytes, value: Bytes) -> Result<(), StateError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError>;

    /// All live entries whose key starts with `prefix`
    fn iter_prefix(
        &self,
        prefix: &[u8],
        direction: Direction,
    ) -> Result<Vec<(Bytes, Bytes)>, StateError>;

    fn has(&self, key: &[u8]) -> Result<bool, StateError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Typed access on top of any [`KvStore`]
pub trait KvStoreExt: KvStore {
    fn load<T: Serializer>(&self, key: &[u8]) -> Result<Option<T>, StateError> {
        match self.get(key)? {
            Some(bytes) => decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn store<T: Serializer>(&mut self, key: Vec<u8>, value: &T) -> Result<(), StateError> {
        let bytes = value.to_bytes().map_err(|source| StateError::Oversized {
            key: hex::encode(&key),
            source,
        })?;
        self.set(Bytes::from(key), Bytes::from(bytes))
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

pub fn decode<T: Serializer>(key: &[u8], bytes: &[u8]) -> Result<T, StateError> {
    T::from_bytes(bytes).map_err(|source| StateError::Corrupted {
        key: hex::encode(key),
        source,
    })
}
