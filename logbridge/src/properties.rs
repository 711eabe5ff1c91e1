use crate::value::{fmt_pairs, Key, Value};
use std::fmt;
use std::sync::Arc;

/// Resolves key collisions in [`PropertyBag::merge`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Precedence {
    /// Values from the merged bag replace existing values.
    Overwrite,
    /// Existing values are kept.
    KeepExisting,
}

/// A small string-keyed map of properties.
///
/// Scopes and records typically carry a handful of properties, so entries live in
/// a vector and lookups are linear. Storage is not allocated until the first
/// write. Clones share storage; the first write to a shared bag copies it, so a
/// bag handed to a [`LogRecord`] is never affected by later writes elsewhere.
///
/// Equality ignores insertion order, iteration preserves it.
///
/// [`LogRecord`]: crate::LogRecord
#[derive(Clone, Default)]
pub struct PropertyBag {
    entries: Option<Arc<Vec<(Key, Value)>>>,
}

impl PropertyBag {
    /// Creates an empty bag. Does not allocate.
    pub const fn new() -> Self {
        PropertyBag { entries: None }
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| e.len())
    }

    /// Returns `true` if the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once backing storage exists, even if it holds nothing.
    pub fn is_allocated(&self) -> bool {
        self.entries.is_some()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .as_ref()?
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries
            .as_deref()
            .map(|e| e.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|(k, v)| (k, v))
    }

    /// Reserves room for `additional` more properties.
    ///
    /// Allocates only when `additional` is non-zero, so a bag stays in its
    /// unallocated state when there is nothing to add.
    pub fn reserve(&mut self, additional: usize) {
        if additional > 0 {
            self.entries_mut(additional);
        }
    }

    /// Sets `key` to `value`, replacing any existing value.
    pub fn overwrite(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let entries = self.entries_mut(1);
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => entries.push((key, value)),
        }
    }

    /// Sets `key` to `value` unless `key` is already present.
    ///
    /// Returns `true` if the value was stored.
    pub fn set_if_absent(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.contains_key(key.as_str()) {
            return false;
        }
        self.entries_mut(1).push((key, value.into()));
        true
    }

    /// Merges `other` into this bag.
    ///
    /// When this bag is still empty the other bag's storage is shared rather than
    /// copied.
    pub fn merge(&mut self, other: &PropertyBag, precedence: Precedence) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.entries.clone_from(&other.entries);
            return;
        }
        self.reserve(other.len());
        for (key, value) in other.iter() {
            match precedence {
                Precedence::Overwrite => self.overwrite(key.clone(), value.clone()),
                Precedence::KeepExisting => {
                    self.set_if_absent(key.clone(), value.clone());
                }
            }
        }
    }

    fn entries_mut(&mut self, additional: usize) -> &mut Vec<(Key, Value)> {
        let entries = Arc::make_mut(
            self.entries
                .get_or_insert_with(|| Arc::new(Vec::with_capacity(additional))),
        );
        entries.reserve(additional);
        entries
    }
}

impl PartialEq for PropertyBag {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k.as_str()) == Some(v))
    }
}

impl fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pairs(f, self.iter())
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
    /// Collects pairs with overwrite semantics: the last value for a key wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bag = PropertyBag::new();
        bag.reserve(iter.size_hint().0);
        for (k, v) in iter {
            bag.overwrite(k, v);
        }
        bag
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for PropertyBag {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.overwrite(k, v);
        }
    }
}
