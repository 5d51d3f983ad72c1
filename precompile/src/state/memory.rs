use std::collections::BTreeMap;

use bytes::Bytes;

use super::{Direction, KvStore, StateError};

/// In-memory ordered backend
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Bytes, Bytes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: Bytes, value: Bytes) -> Result<(), StateError> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.entries.remove(key);
        Ok(())
    }

    fn iter_prefix(
        &self,
        prefix: &[u8],
        direction: Direction,
    ) -> Result<Vec<(Bytes, Bytes)>, StateError> {
        let start = Bytes::copy_from_slice(prefix);
        let iter = self
            .entries
            .range(start..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()));

        Ok(match direction {
            Direction::Forward => iter.collect(),
            Direction::Reverse => {
                let mut entries: Vec<_> = iter.collect();
                entries.reverse();
                entries
            }
        })
    }
}
