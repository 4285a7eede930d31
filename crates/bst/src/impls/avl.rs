use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use log::trace;

use crate::error::InvariantViolation;
use crate::traits::Balance;
use crate::tree::{Branch, Tree};

/// Height-balanced strategy: sibling subtree heights differ by at most one.
///
/// Each branch caches the height of its subtree, so balance factors are
/// available in O(1) while rebalancing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Avl;

type Node<T> = Box<Branch<T, u8>>;

fn height<T>(tree: &Tree<T, u8>) -> u8 {
    tree.as_branch().map(|node| node.meta).unwrap_or(0)
}

impl<T> Branch<T, u8> {
    fn recalc(&mut self) {
        self.meta = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i16 {
        i16::from(height(&self.right)) - i16::from(height(&self.left))
    }
}

impl Avl {
    fn rotate_left<T>(mut root: Node<T>) -> Node<T> {
        let mut right = root.right.take_branch().expect("rotate_left needs right");
        root.right = mem::take(&mut right.left);
        root.recalc();
        right.left = Tree::Branch(root);
        right.recalc();
        right
    }

    fn rotate_right<T>(mut root: Node<T>) -> Node<T> {
        let mut left = root.left.take_branch().expect("rotate_right needs left");
        root.left = mem::take(&mut left.right);
        root.recalc();
        left.right = Tree::Branch(root);
        left.recalc();
        left
    }

    fn rebalance<T>(mut node: Node<T>) -> Node<T> {
        node.recalc();
        let balance = node.balance_factor();
        if balance > 1 {
            if node.right.as_branch().is_some_and(|right| right.balance_factor() < 0)
                && let Some(right) = node.right.take_branch()
            {
                trace!("avl: right-left double rotation");
                node.right = Tree::Branch(Self::rotate_right(right));
            }
            trace!("avl: rotate left at balance {balance}");
            return Self::rotate_left(node);
        }
        if balance < -1 {
            if node.left.as_branch().is_some_and(|left| left.balance_factor() > 0)
                && let Some(left) = node.left.take_branch()
            {
                trace!("avl: left-right double rotation");
                node.left = Tree::Branch(Self::rotate_left(left));
            }
            trace!("avl: rotate right at balance {balance}");
            return Self::rotate_right(node);
        }
        node
    }

    fn insert_node<T: Ord>(tree: Tree<T, u8>, element: T) -> (Tree<T, u8>, Option<T>) {
        let Some(mut node) = tree.into_branch() else {
            return (Tree::branch(Tree::Empty, element, Tree::Empty, 1), None);
        };

        let replaced = match element.cmp(&node.element) {
            Ordering::Less => {
                let (left, replaced) = Self::insert_node(mem::take(&mut node.left), element);
                node.left = left;
                replaced
            }
            Ordering::Greater => {
                let (right, replaced) = Self::insert_node(mem::take(&mut node.right), element);
                node.right = right;
                replaced
            }
            Ordering::Equal => Some(mem::replace(&mut node.element, element)),
        };

        if replaced.is_some() {
            return (Tree::Branch(node), replaced);
        }
        (Tree::Branch(Self::rebalance(node)), None)
    }

    fn remove_min<T>(mut node: Node<T>) -> (Tree<T, u8>, T) {
        let Some(left) = node.left.take_branch() else {
            let Branch { right, element, .. } = *node;
            return (right, element);
        };
        let (left, min) = Self::remove_min(left);
        node.left = left;
        (Tree::Branch(Self::rebalance(node)), min)
    }

    fn remove_node<T, Q>(tree: Tree<T, u8>, key: &Q) -> (Tree<T, u8>, Option<T>)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut node) = tree.into_branch() else {
            return (Tree::Empty, None);
        };

        let removed = match key.cmp(node.element.borrow()) {
            Ordering::Less => {
                let (left, removed) = Self::remove_node(mem::take(&mut node.left), key);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove_node(mem::take(&mut node.right), key);
                node.right = right;
                removed
            }
            Ordering::Equal => {
                if node.left.is_empty() {
                    let Branch { right, element, .. } = *node;
                    return (right, Some(element));
                }
                let Some(right) = node.right.take_branch() else {
                    let Branch { left, element, .. } = *node;
                    return (left, Some(element));
                };
                let (right, successor) = Self::remove_min(right);
                node.right = right;
                Some(mem::replace(&mut node.element, successor))
            }
        };

        if removed.is_none() {
            return (Tree::Branch(node), None);
        }
        (Tree::Branch(Self::rebalance(node)), removed)
    }

    fn check_node<T>(tree: &Tree<T, u8>, depth: usize) -> Result<usize, InvariantViolation> {
        let Some(node) = tree.as_branch() else {
            return Ok(0);
        };
        let left = Self::check_node(&node.left, depth + 1)?;
        let right = Self::check_node(&node.right, depth + 1)?;
        let actual = 1 + left.max(right);
        if usize::from(node.meta) != actual {
            return Err(InvariantViolation::StaleHeight {
                depth,
                cached: usize::from(node.meta),
                actual,
            });
        }
        let balance = right as isize - left as isize;
        if balance.abs() > 1 {
            return Err(InvariantViolation::Unbalanced { depth, balance });
        }
        Ok(actual)
    }
}

impl Balance for Avl {
    type Meta = u8;

    fn insert<T: Ord>(tree: &mut Tree<T, u8>, element: T) -> Option<T> {
        let (root, replaced) = Self::insert_node(mem::take(tree), element);
        *tree = root;
        replaced
    }

    fn remove<T, Q>(tree: &mut Tree<T, u8>, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = Self::remove_node(mem::take(tree), key);
        *tree = root;
        removed
    }

    fn build_sorted<T>(elements: Vec<T>) -> Tree<T, u8> {
        let len = elements.len();
        Tree::build_balanced(&mut elements.into_iter(), len, 0, &mut |_, left, right| {
            1 + height(left).max(height(right))
        })
    }

    fn validate<T: Ord>(tree: &Tree<T, u8>) -> Result<(), InvariantViolation> {
        tree.check_order()?;
        Self::check_node(tree, 0).map(|_| ())
    }

    fn height<T>(tree: &Tree<T, u8>) -> usize {
        usize::from(height(tree))
    }
}
