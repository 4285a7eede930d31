use std::iter::FusedIterator;

use crate::tree::{Branch, Tree};

/// In-order iterator over a [`Tree`].
///
/// Keeps the unvisited left spine on an explicit stack, so memory is bounded
/// by the tree height and no recursion happens regardless of shape.
pub struct Iter<'a, T, M> {
    stack: Vec<&'a Branch<T, M>>,
    remaining: Option<usize>,
}

impl<'a, T, M> Iter<'a, T, M> {
    pub(crate) fn new(root: &'a Tree<T, M>, len: Option<usize>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, mut tree: &'a Tree<T, M>) {
        while let Some(node) = tree.as_branch() {
            self.stack.push(node);
            tree = &node.left;
        }
    }
}

impl<'a, T, M> Iterator for Iter<'a, T, M> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(&node.right);
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        Some(&node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(remaining) => (remaining, Some(remaining)),
            None => (self.stack.len(), None),
        }
    }
}

impl<T, M> FusedIterator for Iter<'_, T, M> {}

impl<T, M> Clone for Iter<'_, T, M> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T, M> IntoIterator for &'a Tree<T, M> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::Tree;

    fn left_spine(len: usize) -> Tree<usize, ()> {
        (0..len).fold(Tree::Empty, |tree, element| Tree::branch(tree, element, Tree::Empty, ()))
    }

    #[test]
    fn degenerate_tree_iterates_without_recursion() {
        let tree = left_spine(2_000);
        let mut expected = 0;
        for &element in &tree {
            assert_eq!(element, expected);
            expected += 1;
        }
        assert_eq!(expected, 2_000);
    }

    #[test]
    fn fused_after_exhaustion() {
        let tree = left_spine(3);
        let mut iter = tree.iter();
        assert_eq!(iter.by_ref().count(), 3);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
