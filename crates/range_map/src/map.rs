use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;

use bst::{Avl, Balance, RedBlack};
use log::trace;
use ordered_map::{Entry, TreeMap};

use crate::entry::RangeEntry;
use crate::error::RangeMapViolation;

/// Maps disjoint half-open intervals of `K` to values.
///
/// Entries are stored in a [`TreeMap`] keyed by their lower bound. Writing
/// an interval overwrites whatever it overlaps, trimming or splitting the
/// stored entries around it. Adjacent entries with equal values are never
/// merged.
///
/// `put` and `remove` need `V: Clone`: removing the middle of a stored
/// interval leaves two entries that both keep its value.
pub struct TreeRangeMap<K, V, B: Balance = RedBlack> {
    entries: TreeMap<K, RangeEntry<K, V>, B>,
}

pub type AvlRangeMap<K, V> = TreeRangeMap<K, V, Avl>;
pub type RbRangeMap<K, V> = TreeRangeMap<K, V, RedBlack>;

impl<K, V, B: Balance> TreeRangeMap<K, V, B> {
    pub fn new() -> Self {
        Self {
            entries: TreeMap::new(),
        }
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in ascending order of their lower bounds.
    pub fn iter(&self) -> Iter<'_, K, V, B> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn to_vec(&self) -> Vec<RangeEntry<K, V>>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<K: Ord, V, B: Balance> TreeRangeMap<K, V, B> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_entry(key).map(RangeEntry::value)
    }

    /// The entry whose interval contains `key`.
    pub fn get_entry(&self, key: &K) -> Option<&RangeEntry<K, V>> {
        self.entries
            .floor_entry(key)
            .map(Entry::value)
            .filter(|entry| entry.contains(key))
    }

    /// Checks the backing tree, then that stored intervals are non-empty,
    /// keyed by their lower bound and pairwise disjoint.
    pub fn check_invariants(&self) -> Result<(), RangeMapViolation> {
        self.entries.check_invariants()?;
        let mut previous: Option<&RangeEntry<K, V>> = None;
        for (position, entry) in self.entries.iter().enumerate() {
            let stored = entry.value();
            if stored.range().is_empty() {
                return Err(RangeMapViolation::EmptyInterval { position });
            }
            if entry.key() != stored.lower_bound() {
                return Err(RangeMapViolation::KeyMismatch { position });
            }
            if let Some(previous) = previous
                && previous.upper_bound() > stored.lower_bound()
            {
                return Err(RangeMapViolation::Overlap { position });
            }
            previous = Some(stored);
        }
        Ok(())
    }
}

impl<K: Ord + Clone, V: Clone, B: Balance> TreeRangeMap<K, V, B> {
    /// Maps every key in `range` to `value`, replacing any overlapped
    /// coverage. An empty range is ignored.
    pub fn put(&mut self, range: Range<K>, value: V) {
        if range.is_empty() {
            return;
        }
        self.remove(range.clone());
        self.put_entry(range, value);
    }

    /// Clears the coverage of `range`. Entries straddling either end are
    /// truncated; one spanning the whole range is split in two. An empty
    /// range is ignored.
    pub fn remove(&mut self, range: Range<K>) {
        if range.is_empty() {
            return;
        }

        if let Some(below) = self.entries.lower_entry(&range.start).map(Entry::value)
            && *below.upper_bound() > range.start
        {
            let lower = below.lower_bound().clone();
            let upper = below.upper_bound().clone();
            let value = below.value().clone();
            if upper > range.end {
                trace!("range_map: splitting an entry around the removed interval");
                self.put_entry(range.end.clone()..upper, value.clone());
            } else {
                trace!("range_map: truncating the entry below the removed interval");
            }
            self.put_entry(lower..range.start.clone(), value);
        }

        if let Some(above) = self.entries.lower_entry(&range.end).map(Entry::value)
            && *above.upper_bound() > range.end
        {
            let lower = above.lower_bound().clone();
            let upper = above.upper_bound().clone();
            let value = above.value().clone();
            trace!("range_map: truncating the entry above the removed interval");
            self.entries.remove(&lower);
            self.put_entry(range.end.clone()..upper, value);
        }

        // Everything left that starts inside `range` also ends inside it.
        while let Some(key) = self
            .entries
            .ceiling_key(&range.start)
            .filter(|key| **key < range.end)
            .cloned()
        {
            let removed = self.entries.remove(&key);
            debug_assert!(removed.is_some_and(|entry| entry.value().is_within(&range)));
        }
    }

    fn put_entry(&mut self, range: Range<K>, value: V) {
        self.entries
            .update(range.start.clone(), RangeEntry::new(range, value));
    }
}

impl<K, V, B: Balance> Default for TreeRangeMap<K, V, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, B> Clone for TreeRangeMap<K, V, B>
where
    K: Clone,
    V: Clone,
    B: Balance,
    B::Meta: Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

/// Applies `put` in order, so later intervals win where they overlap.
impl<K: Ord + Clone, V: Clone, B: Balance> FromIterator<(Range<K>, V)> for TreeRangeMap<K, V, B> {
    fn from_iter<I: IntoIterator<Item = (Range<K>, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord + Clone, V: Clone, B: Balance, const N: usize> From<[(Range<K>, V); N]>
    for TreeRangeMap<K, V, B>
{
    fn from(entries: [(Range<K>, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Ord + Clone, V: Clone, B: Balance> Extend<(Range<K>, V)> for TreeRangeMap<K, V, B> {
    fn extend<I: IntoIterator<Item = (Range<K>, V)>>(&mut self, iter: I) {
        for (range, value) in iter {
            self.put(range, value);
        }
    }
}

impl<K: PartialEq, V: PartialEq, B: Balance> PartialEq for TreeRangeMap<K, V, B> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, B: Balance> Eq for TreeRangeMap<K, V, B> {}

impl<K: fmt::Debug, V: fmt::Debug, B: Balance> fmt::Debug for TreeRangeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (entry.range(), entry.value())))
            .finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, B: Balance> fmt::Display for TreeRangeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        f.write_str("}")
    }
}

/// Iterator over the entries of a [`TreeRangeMap`], ascending.
pub struct Iter<'a, K, V, B: Balance = RedBlack> {
    inner: ordered_map::Iter<'a, K, RangeEntry<K, V>, B>,
}

impl<'a, K, V, B: Balance> Iterator for Iter<'a, K, V, B> {
    type Item = &'a RangeEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, B: Balance> FusedIterator for Iter<'_, K, V, B> {}

impl<'a, K, V, B: Balance> IntoIterator for &'a TreeRangeMap<K, V, B> {
    type Item = &'a RangeEntry<K, V>;
    type IntoIter = Iter<'a, K, V, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl<K, V, B> serde::Serialize for TreeRangeMap<K, V, B>
where
    K: serde::Serialize,
    V: serde::Serialize,
    B: Balance,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for entry in self {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct TreeRangeMapVisitor<K, V, B: Balance> {
    marker: std::marker::PhantomData<fn() -> TreeRangeMap<K, V, B>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, B> serde::de::Visitor<'de> for TreeRangeMapVisitor<K, V, B>
where
    K: serde::Deserialize<'de> + Ord + Clone,
    V: serde::Deserialize<'de> + Clone,
    B: Balance,
{
    type Value = TreeRangeMap<K, V, B>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of range entries")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut map = TreeRangeMap::new();
        while let Some(entry) = access.next_element::<RangeEntry<K, V>>()? {
            let (range, value) = entry.into_parts();
            map.put(range, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, B> serde::Deserialize<'de> for TreeRangeMap<K, V, B>
where
    K: serde::Deserialize<'de> + Ord + Clone,
    V: serde::Deserialize<'de> + Clone,
    B: Balance,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(TreeRangeMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
