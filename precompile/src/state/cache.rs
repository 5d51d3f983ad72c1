use bytes::Bytes;
use log::trace;

use super::{Changes, Direction, EntryState, KvStore, StateError};

/// Write buffer over a parent store.
///
/// Reads fall through to the parent for keys we haven't touched. Nothing
/// reaches the parent until [`CacheStore::commit`]; dropping the cache
/// discards every buffered write.
pub struct CacheStore<'a> {
    parent: &'a mut dyn KvStore,
    changes: Changes,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a mut dyn KvStore) -> Self {
        Self {
            parent,
            changes: Changes::default(),
        }
    }

    /// Flush all buffered writes into the parent
    pub fn commit(self) -> Result<usize, StateError> {
        let count = self.changes.len();
        trace!("committing {} buffered writes", count);
        for (key, value) in self.changes {
            match value {
                Some(value) => self.parent.set(key, value)?,
                None => self.parent.delete(&key)?,
            }
        }
        Ok(count)
    }

    /// Drop all buffered writes, same as dropping the cache
    pub fn discard(self) {
        if !self.changes.is_empty() {
            trace!("discarding {} buffered writes", self.changes.len());
        }
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StateError> {
        match self.changes.get(key) {
            EntryState::Stored(v) => Ok(Some(v.clone())),
            EntryState::Deleted => Ok(None),
            EntryState::Absent => self.parent.get(key),
        }
    }

    fn set(&mut self, key: Bytes, value: Bytes) -> Result<(), StateError> {
        self.changes.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.changes.remove(Bytes::copy_from_slice(key));
        Ok(())
    }

    fn iter_prefix(
        &self,
        prefix: &[u8],
        direction: Direction,
    ) -> Result<Vec<(Bytes, Bytes)>, StateError> {
        let parent = self.parent.iter_prefix(prefix, direction)?;
        Ok(self.changes.merge_prefix(prefix, parent, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;

    fn b(s: &'static str) -> Bytes {
        Bytes::from_static(s.as_bytes())
    }

    #[test]
    fn test_commit_flushes_writes_and_deletes() {
        let mut store = MemoryStore::new();
        store.set(b("a"), b("1")).unwrap();
        store.set(b("b"), b("2")).unwrap();

        let mut cache = CacheStore::new(&mut store);
        cache.set(b("c"), b("3")).unwrap();
        cache.delete(b"a").unwrap();
        assert_eq!(cache.get(b"a").unwrap(), None);
        assert_eq!(cache.commit().unwrap(), 2);

        assert_eq!(store.get(b"a").unwrap(), None);
        assert_eq!(store.get(b"c").unwrap(), Some(b("3")));
    }

    #[test]
    fn test_drop_discards_writes() {
        let mut store = MemoryStore::new();
        {
            let mut cache = CacheStore::new(&mut store);
            cache.set(b("a"), b("1")).unwrap();
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_nested_caches() {
        let mut store = MemoryStore::new();
        let mut outer = CacheStore::new(&mut store);
        outer.set(b("k1"), b("outer")).unwrap();
        {
            let mut inner = CacheStore::new(&mut outer);
            inner.set(b("k2"), b("inner")).unwrap();
            assert_eq!(inner.iter_prefix(b"k", Direction::Forward).unwrap().len(), 2);
            inner.discard();
        }
        assert_eq!(outer.get(b"k2").unwrap(), None);
        {
            let mut inner = CacheStore::new(&mut outer);
            inner.delete(b"k1").unwrap();
            inner.commit().unwrap();
        }
        assert_eq!(outer.get(b"k1").unwrap(), None);
        outer.commit().unwrap();
        assert!(store.is_empty());
    }
}
