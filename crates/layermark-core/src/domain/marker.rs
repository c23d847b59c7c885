//! Layer marker keys and the ordered marker set.
//!
//! A layer marker is identified by nothing but its x-position.  [`MarkerKey`]
//! gives `f64` positions a total order so they can key a `BTreeMap`, and
//! [`MarkerSet`] stores one value per key (the application stores the
//! per-channel render handles there).
//!
//! # Invariants
//!
//! - Keys are finite and unique; iteration is strictly ascending.
//! - `-0.0` and `0.0` are the same key.
//! - [`MarkerSet::rekey`] never leaves both the old and the new key present.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Totally ordered, finite x-position of a layer marker.
#[derive(Debug, Clone, Copy)]
pub struct MarkerKey(f64);

impl MarkerKey {
    /// Wraps `x`, or returns `None` if it is NaN or infinite.
    pub fn new(x: f64) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        // Fold negative zero so both zeros compare equal under total_cmp.
        if x == 0.0 {
            return Some(Self(0.0));
        }
        Some(Self(x))
    }

    /// The wrapped position.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for MarkerKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MarkerKey {}

impl PartialOrd for MarkerKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MarkerKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of [`MarkerSet::rekey`].
#[derive(Debug, PartialEq)]
pub enum Rekey<H> {
    /// No marker exists at the source key; nothing changed.
    Missing,
    /// The marker now lives at the destination key.
    ///
    /// `displaced` holds the value of a different marker that previously sat
    /// exactly on the destination key and was replaced.
    Moved { displaced: Option<H> },
}

/// Ordered set of layer markers, each carrying a value of type `H`.
#[derive(Debug, Clone)]
pub struct MarkerSet<H> {
    markers: BTreeMap<MarkerKey, H>,
}

impl<H> MarkerSet<H> {
    pub fn new() -> Self {
        Self {
            markers: BTreeMap::new(),
        }
    }

    /// Inserts a marker, returning the value previously stored at `key`.
    pub fn insert(&mut self, key: MarkerKey, value: H) -> Option<H> {
        self.markers.insert(key, value)
    }

    /// Removes the marker at `key`, if any.
    pub fn remove(&mut self, key: MarkerKey) -> Option<H> {
        self.markers.remove(&key)
    }

    /// Moves the marker at `from` to `to` in one step.
    pub fn rekey(&mut self, from: MarkerKey, to: MarkerKey) -> Rekey<H> {
        if from == to {
            return if self.markers.contains_key(&from) {
                Rekey::Moved { displaced: None }
            } else {
                Rekey::Missing
            };
        }
        match self.markers.remove(&from) {
            Some(value) => {
                let displaced = self.markers.insert(to, value);
                Rekey::Moved { displaced }
            }
            None => Rekey::Missing,
        }
    }

    pub fn get(&self, key: MarkerKey) -> Option<&H> {
        self.markers.get(&key)
    }

    pub fn contains(&self, key: MarkerKey) -> bool {
        self.markers.contains_key(&key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = MarkerKey> + '_ {
        self.markers.keys().copied()
    }

    /// Sorted marker positions.
    pub fn positions(&self) -> Vec<f64> {
        self.markers.keys().map(|k| k.value()).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Removes every marker and returns them in ascending key order.
    pub fn drain(&mut self) -> Vec<(MarkerKey, H)> {
        std::mem::take(&mut self.markers).into_iter().collect()
    }
}

impl<H> Default for MarkerSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
