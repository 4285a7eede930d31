use std::borrow::Borrow;
use std::fmt;

use log::debug;

use crate::error::InvariantViolation;
use crate::impls::{avl::Avl, rb::RedBlack};
use crate::iter::Iter;
use crate::traits::Balance;
use crate::tree::Tree;

/// A binary search tree kept balanced by the strategy `B`.
///
/// Elements are unique under `Ord`; inserting an equal element replaces the
/// stored one. Not synchronized: callers serialize mutation themselves.
pub struct SearchTree<T, B: Balance = RedBlack> {
    root: Tree<T, B::Meta>,
    len: usize,
}

pub type AvlTree<T> = SearchTree<T, Avl>;
pub type RbTree<T> = SearchTree<T, RedBlack>;

impl<T, B: Balance> SearchTree<T, B> {
    pub fn new() -> Self {
        Self {
            root: Tree::Empty,
            len: 0,
        }
    }

    /// Bulk-loads elements the caller guarantees to be ascending. Runs of
    /// equal elements collapse to the last one, matching repeated `insert`.
    pub fn from_sorted<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Ord,
    {
        let mut sorted: Vec<T> = Vec::new();
        for element in elements {
            match sorted.last_mut() {
                Some(last) if *last == element => *last = element,
                _ => sorted.push(element),
            }
        }
        debug_assert!(
            sorted.windows(2).all(|pair| pair[0] < pair[1]),
            "from_sorted requires ascending input"
        );
        let len = sorted.len();
        debug!("bulk-loading {len} elements");
        Self {
            root: B::build_sorted(sorted),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = Tree::Empty;
        self.len = 0;
    }

    pub fn root(&self) -> &Tree<T, B::Meta> {
        &self.root
    }

    /// O(1) for [`Avl`], which caches heights; O(n) for [`RedBlack`].
    pub fn height(&self) -> usize {
        B::height(&self.root)
    }

    /// Inserts `element`, returning the equal element it replaced, if any.
    pub fn insert(&mut self, element: T) -> Option<T>
    where
        T: Ord,
    {
        let replaced = B::insert(&mut self.root, element);
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = B::remove(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.get(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.contains(key)
    }

    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.floor(key)
    }

    pub fn lower<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.lower(key)
    }

    pub fn ceiling<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.ceiling(key)
    }

    pub fn first(&self) -> Option<&T> {
        self.root.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.root.last()
    }

    pub fn iter(&self) -> Iter<'_, T, B::Meta> {
        Iter::new(&self.root, Some(self.len))
    }

    /// Checks ordering, the strategy's balance invariant and the tracked length.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        T: Ord,
    {
        B::validate(&self.root)?;
        let actual = self.root.count();
        if actual != self.len {
            return Err(InvariantViolation::LengthMismatch {
                tracked: self.len,
                actual,
            });
        }
        Ok(())
    }
}

impl<T, B: Balance> Default for SearchTree<T, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, B> Clone for SearchTree<T, B>
where
    T: Clone,
    B: Balance,
    B::Meta: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

/// Sorts, then bulk-loads. Later duplicates win.
impl<T: Ord, B: Balance> FromIterator<T> for SearchTree<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut elements: Vec<T> = iter.into_iter().collect();
        elements.sort();
        Self::from_sorted(elements)
    }
}

impl<T: Ord, B: Balance, const N: usize> From<[T; N]> for SearchTree<T, B> {
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<T: Ord, B: Balance> Extend<T> for SearchTree<T, B> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<'a, T, B: Balance> IntoIterator for &'a SearchTree<T, B> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, B::Meta>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq, B: Balance> PartialEq for SearchTree<T, B> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, B: Balance> Eq for SearchTree<T, B> {}

impl<T: fmt::Debug, B: Balance> fmt::Debug for SearchTree<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, B: Balance> fmt::Display for SearchTree<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
