use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::topology::{LaneId, TimeKey};

/// Time-ordered snapshots of the dead lanes.
///
/// Each key carries the complete set of lanes considered dead from that key
/// until the next one; snapshots are independent and never diffs of each
/// other. Keys are kept in increasing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolvingMap {
    snapshots: BTreeMap<TimeKey, BTreeSet<LaneId>>,
}

impl EvolvingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `(key, lanes)` pairs; a repeated key keeps its last set.
    pub fn from_snapshots<I>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = (TimeKey, BTreeSet<LaneId>)>,
    {
        Self {
            snapshots: snapshots.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, key: TimeKey, lanes: BTreeSet<LaneId>) {
        self.snapshots.insert(key, lanes);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot keys in increasing order.
    pub fn keys(&self) -> impl Iterator<Item = TimeKey> + '_ {
        self.snapshots.keys().copied()
    }

    /// Snapshots in increasing key order.
    pub fn iter(&self) -> impl Iterator<Item = (TimeKey, &BTreeSet<LaneId>)> + '_ {
        self.snapshots.iter().map(|(key, lanes)| (*key, lanes))
    }

    pub fn snapshot(&self, key: TimeKey) -> Option<&BTreeSet<LaneId>> {
        self.snapshots.get(&key)
    }

    pub fn first_key(&self) -> Option<TimeKey> {
        self.snapshots.keys().next().copied()
    }

    pub fn last_key(&self) -> Option<TimeKey> {
        self.snapshots.keys().next_back().copied()
    }

    /// Most recent snapshot.
    pub fn last_snapshot(&self) -> Option<(TimeKey, &BTreeSet<LaneId>)> {
        self.snapshots
            .iter()
            .next_back()
            .map(|(key, lanes)| (*key, lanes))
    }

    /// Orbits between the first and the last key.
    pub fn span(&self) -> u64 {
        match (self.first_key(), self.last_key()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }
}

impl FromIterator<(TimeKey, BTreeSet<LaneId>)> for EvolvingMap {
    fn from_iter<I: IntoIterator<Item = (TimeKey, BTreeSet<LaneId>)>>(iter: I) -> Self {
        Self::from_snapshots(iter)
    }
}
