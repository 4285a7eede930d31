use std::borrow::Borrow;

use crate::error::InvariantViolation;
use crate::tree::Tree;

/// A self-balancing insertion/removal strategy over [`Tree`].
///
/// Implementations decide what bookkeeping (`Meta`) each branch carries and
/// how rotations restore their invariant; searching and traversal are shared.
pub trait Balance {
    type Meta;

    /// Inserts `element`, rebalancing on the way back up. An equal element
    /// already present is replaced in place and returned; the shape of the
    /// tree does not change in that case.
    fn insert<T: Ord>(tree: &mut Tree<T, Self::Meta>, element: T) -> Option<T>;

    /// Removes the element equal to `key`, substituting the in-order
    /// successor when the branch has two children.
    fn remove<T, Q>(tree: &mut Tree<T, Self::Meta>, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Bulk-loads strictly ascending elements without per-element rebalancing.
    fn build_sorted<T>(elements: Vec<T>) -> Tree<T, Self::Meta>;

    fn validate<T: Ord>(tree: &Tree<T, Self::Meta>) -> Result<(), InvariantViolation>;

    /// Walks the whole tree unless the strategy caches heights.
    fn height<T>(tree: &Tree<T, Self::Meta>) -> usize {
        tree.height()
    }
}
