use std::collections::{btree_map::IntoIter, BTreeMap};

use bytes::Bytes;

use super::{Direction, EntryState};

/// Changes represents a batch of pending writes for a store.
/// It tracks insertions and deletions before they reach the parent.
#[derive(Clone, Debug, Default)]
pub struct Changes {
    pub writes: BTreeMap<Bytes, Option<Bytes>>,
}

impl Changes {
    /// Set a key to a new value.
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        self.writes.insert(key.into(), Some(value.into()));
    }

    /// Mark a key as deleted, hiding any parent value.
    pub fn remove<K>(&mut self, key: K)
    where
        K: Into<Bytes>,
    {
        self.writes.insert(key.into(), None);
    }

    pub fn get(&self, key: &[u8]) -> EntryState<&Bytes> {
        match self.writes.get(key) {
            Some(Some(v)) => EntryState::Stored(v),
            Some(None) => EntryState::Deleted,
            None => EntryState::Absent,
        }
    }

    /// Overlay our writes on top of `parent` entries sharing `prefix`.
    /// Both inputs and output are in `direction` order.
    pub fn merge_prefix(
        &self,
        prefix: &[u8],
        parent: Vec<(Bytes, Bytes)>,
        direction: Direction,
    ) -> Vec<(Bytes, Bytes)> {
        let mut merged: BTreeMap<Bytes, Bytes> = parent
            .into_iter()
            .filter(|(k, _)| !self.writes.contains_key(k))
            .collect();

        for (k, v) in self.writes.iter() {
            if let Some(v) = v {
                if k.starts_with(prefix) {
                    merged.insert(k.clone(), v.clone());
                }
            }
        }

        match direction {
            Direction::Forward => merged.into_iter().collect(),
            Direction::Reverse => merged.into_iter().rev().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl IntoIterator for Changes {
    type Item = (Bytes, Option<Bytes>);
    type IntoIter = IntoIter<Bytes, Option<Bytes>>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}
