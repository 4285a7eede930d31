use std::fmt;
use std::ops::Range;

/// A half-open interval `[lower_bound, upper_bound)` and the value it maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeEntry<K, V> {
    range: Range<K>,
    value: V,
}

impl<K, V> RangeEntry<K, V> {
    pub fn new(range: Range<K>, value: V) -> Self {
        Self { range, value }
    }

    pub fn range(&self) -> &Range<K> {
        &self.range
    }

    pub fn lower_bound(&self) -> &K {
        &self.range.start
    }

    pub fn upper_bound(&self) -> &K {
        &self.range.end
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (Range<K>, V) {
        (self.range, self.value)
    }
}

impl<K: Ord, V> RangeEntry<K, V> {
    pub fn contains(&self, key: &K) -> bool {
        self.range.start <= *key && *key < self.range.end
    }

    /// Whether the two intervals share at least one key.
    pub fn overlaps(&self, other: &Range<K>) -> bool {
        self.range.start < other.end && other.start < self.range.end
    }

    /// Whether every key of this entry also lies in `other`.
    pub fn is_within(&self, other: &Range<K>) -> bool {
        other.start <= self.range.start && self.range.end <= other.end
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for RangeEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}:{}", self.range.start, self.range.end, self.value)
    }
}
