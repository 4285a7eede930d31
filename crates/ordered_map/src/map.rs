use std::fmt;

use bst::{Avl, Balance, InvariantViolation, RedBlack, SearchTree};

use crate::entry::Entry;

/// In-order iterator over the entries of a [`TreeMap`].
pub type Iter<'a, K, V, B = RedBlack> = bst::Iter<'a, Entry<K, V>, <B as Balance>::Meta>;

/// Ordered map backed by a balanced binary search tree of [`Entry`] values.
///
/// - Keys are unique.
/// - `update` overwrites the existing value and returns the old one.
/// - `floor`, `lower` and `ceiling` queries run in O(height).
pub struct TreeMap<K, V, B: Balance = RedBlack> {
    tree: SearchTree<Entry<K, V>, B>,
}

pub type AvlTreeMap<K, V> = TreeMap<K, V, Avl>;
pub type RbTreeMap<K, V> = TreeMap<K, V, RedBlack>;

impl<K, V, B: Balance> TreeMap<K, V, B> {
    pub fn new() -> Self {
        Self {
            tree: SearchTree::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// The underlying search tree, for structural inspection.
    pub fn tree(&self) -> &SearchTree<Entry<K, V>, B> {
        &self.tree
    }

    pub fn iter(&self) -> Iter<'_, K, V, B> {
        self.tree.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(Entry::key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(Entry::value)
    }

    pub fn first_entry(&self) -> Option<&Entry<K, V>> {
        self.tree.first()
    }

    pub fn last_entry(&self) -> Option<&Entry<K, V>> {
        self.tree.last()
    }
}

impl<K: Ord, V, B: Balance> TreeMap<K, V, B> {
    /// Associates `value` with `key`, returning the value it replaced.
    ///
    /// An existing entry is overwritten in place without restructuring.
    pub fn update(&mut self, key: K, value: V) -> Option<V> {
        self.tree
            .insert(Entry::new(key, value))
            .map(Entry::into_value)
    }

    pub fn remove(&mut self, key: &K) -> Option<Entry<K, V>> {
        self.tree.remove(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_entry(key).map(Entry::value)
    }

    pub fn get_entry(&self, key: &K) -> Option<&Entry<K, V>> {
        self.tree.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Entry with the greatest key `<= key`.
    pub fn floor_entry(&self, key: &K) -> Option<&Entry<K, V>> {
        self.tree.floor(key)
    }

    pub fn floor_key(&self, key: &K) -> Option<&K> {
        self.floor_entry(key).map(Entry::key)
    }

    /// Entry with the greatest key `< key`.
    pub fn lower_entry(&self, key: &K) -> Option<&Entry<K, V>> {
        self.tree.lower(key)
    }

    pub fn lower_key(&self, key: &K) -> Option<&K> {
        self.lower_entry(key).map(Entry::key)
    }

    /// Entry with the least key `>= key`.
    pub fn ceiling_entry(&self, key: &K) -> Option<&Entry<K, V>> {
        self.tree.ceiling(key)
    }

    pub fn ceiling_key(&self, key: &K) -> Option<&K> {
        self.ceiling_entry(key).map(Entry::key)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.tree.check_invariants()
    }
}

impl<K, V, B: Balance> Default for TreeMap<K, V, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, B> Clone for TreeMap<K, V, B>
where
    K: Clone,
    V: Clone,
    B: Balance,
    B::Meta: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

/// Later pairs win over earlier pairs with the same key.
impl<K: Ord, V, B: Balance> FromIterator<(K, V)> for TreeMap<K, V, B> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().map(Entry::from).collect(),
        }
    }
}

impl<K: Ord, V, B: Balance, const N: usize> From<[(K, V); N]> for TreeMap<K, V, B> {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Ord, V, B: Balance> Extend<(K, V)> for TreeMap<K, V, B> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.update(key, value);
        }
    }
}

impl<'a, K, V, B: Balance> IntoIterator for &'a TreeMap<K, V, B> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq, B: Balance> PartialEq for TreeMap<K, V, B> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.key() == b.key() && a.value() == b.value())
    }
}

impl<K: Eq, V: Eq, B: Balance> Eq for TreeMap<K, V, B> {}

impl<K: fmt::Debug, V: fmt::Debug, B: Balance> fmt::Debug for TreeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (entry.key(), entry.value())))
            .finish()
    }
}

/// Renders the tree sideways with one `key:value` label per branch.
impl<K: fmt::Display, V: fmt::Display, B: Balance> fmt::Display for TreeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}

#[cfg(feature = "serde")]
impl<K, V, B> serde::Serialize for TreeMap<K, V, B>
where
    K: serde::Serialize,
    V: serde::Serialize,
    B: Balance,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for entry in self {
            map.serialize_entry(entry.key(), entry.value())?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct TreeMapVisitor<K, V, B: Balance> {
    marker: std::marker::PhantomData<fn() -> TreeMap<K, V, B>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, B> serde::de::Visitor<'de> for TreeMapVisitor<K, V, B>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
    B: Balance,
{
    type Value = TreeMap<K, V, B>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = TreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.update(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, B> serde::Deserialize<'de> for TreeMap<K, V, B>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
    B: Balance,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
