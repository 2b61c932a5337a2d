//! Last-seen aircraft snapshot and change detection.
//!
//! The poll loop owns one `Snapshot` and threads it through [`diff`] on every
//! fetch; there is no shared cache.

use std::collections::BTreeMap;

use crate::feed::FeedAircraft;

/// Aircraft keyed by feeder id, ordered by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    aircraft: BTreeMap<String, FeedAircraft>,
}

impl Snapshot {
    pub fn get(&self, key: &str) -> Option<&FeedAircraft> {
        self.aircraft.get(key)
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeedAircraft)> {
        self.aircraft.iter()
    }

    pub fn aircraft(&self) -> impl Iterator<Item = &FeedAircraft> {
        self.aircraft.values()
    }

    /// Keys present here but not in `other`.
    pub fn keys_not_in<'a>(&'a self, other: &'a Snapshot) -> impl Iterator<Item = &'a str> {
        self.aircraft
            .keys()
            .filter(move |k| !other.aircraft.contains_key(*k))
            .map(String::as_str)
    }
}

impl FromIterator<(String, FeedAircraft)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, FeedAircraft)>>(iter: I) -> Self {
        Snapshot {
            aircraft: iter.into_iter().collect(),
        }
    }
}

/// Compare a freshly fetched snapshot against the previous one.
///
/// Returns whether anything changed and the snapshot to keep for the next
/// round, which is always the fetched one.
pub fn diff(previous: &Snapshot, fetched: Snapshot) -> (bool, Snapshot) {
    let changed = *previous != fetched;
    (changed, fetched)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
