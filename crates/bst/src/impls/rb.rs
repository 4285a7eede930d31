use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use log::trace;

use crate::error::InvariantViolation;
use crate::traits::Balance;
use crate::tree::{Branch, Tree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Color-balanced (red-black) strategy.
///
/// Invariants: the root is black, no red branch has a red child, and every
/// path from a branch down to a terminator crosses the same number of black
/// branches. Terminators count as black.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedBlack;

type Node<T> = Box<Branch<T, Color>>;

fn is_red<T>(tree: &Tree<T, Color>) -> bool {
    tree.as_branch().is_some_and(|node| node.meta == Color::Red)
}

fn paint<T>(tree: &mut Tree<T, Color>, color: Color) {
    if let Some(node) = tree.as_branch_mut() {
        node.meta = color;
    }
}

/// A red branch with a red child: the only violation insertion can leave.
fn has_red_pair<T>(tree: &Tree<T, Color>) -> bool {
    tree.as_branch().is_some_and(|node| {
        node.meta == Color::Red && (is_red(&node.left) || is_red(&node.right))
    })
}

impl RedBlack {
    fn rotate_left<T>(mut root: Node<T>) -> Node<T> {
        let mut right = root.right.take_branch().expect("rotate_left needs right");
        root.right = mem::take(&mut right.left);
        right.left = Tree::Branch(root);
        right
    }

    fn rotate_right<T>(mut root: Node<T>) -> Node<T> {
        let mut left = root.left.take_branch().expect("rotate_right needs left");
        root.left = mem::take(&mut left.right);
        left.right = Tree::Branch(root);
        left
    }

    fn insert_node<T: Ord>(tree: Tree<T, Color>, element: T) -> (Tree<T, Color>, Option<T>) {
        let Some(mut node) = tree.into_branch() else {
            return (
                Tree::branch(Tree::Empty, element, Tree::Empty, Color::Red),
                None,
            );
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
        (Tree::Branch(Self::fix_insert(node)), None)
    }

    /// Repairs a red-red pair among the children of the black branch `node`,
    /// which plays the grandparent. A red grandparent defers to its own parent.
    fn fix_insert<T>(mut node: Node<T>) -> Node<T> {
        if node.meta == Color::Red {
            return node;
        }

        if has_red_pair(&node.left) {
            if is_red(&node.right) {
                trace!("red-black: red uncle, recolor");
                node.meta = Color::Red;
                paint(&mut node.left, Color::Black);
                paint(&mut node.right, Color::Black);
                return node;
            }
            if node.left.as_branch().is_some_and(|parent| is_red(&parent.right))
                && let Some(parent) = node.left.take_branch()
            {
                trace!("red-black: inner child, rotate parent left");
                node.left = Tree::Branch(Self::rotate_left(parent));
            }
            trace!("red-black: outer child, rotate grandparent right");
            let mut root = Self::rotate_right(node);
            root.meta = Color::Black;
            paint(&mut root.right, Color::Red);
            return root;
        }

        if has_red_pair(&node.right) {
            if is_red(&node.left) {
                trace!("red-black: red uncle, recolor");
                node.meta = Color::Red;
                paint(&mut node.left, Color::Black);
                paint(&mut node.right, Color::Black);
                return node;
            }
            if node.right.as_branch().is_some_and(|parent| is_red(&parent.left))
                && let Some(parent) = node.right.take_branch()
            {
                trace!("red-black: inner child, rotate parent right");
                node.right = Tree::Branch(Self::rotate_right(parent));
            }
            trace!("red-black: outer child, rotate grandparent left");
            let mut root = Self::rotate_left(node);
            root.meta = Color::Black;
            paint(&mut root.left, Color::Red);
            return root;
        }

        node
    }

    /// Every path through `node.left` is one black short. Returns the repaired
    /// subtree and whether the deficit still has to move up.
    fn fix_left_deficit<T>(mut node: Node<T>) -> (Node<T>, bool) {
        if is_red(&node.right) {
            trace!("red-black: red sibling, rotate left");
            let mut root = Self::rotate_left(node);
            root.meta = Color::Black;
            let mut parent = root
                .left
                .take_branch()
                .expect("rotate_left leaves the old parent on the left");
            parent.meta = Color::Red;
            let (parent, deficit) = Self::fix_left_deficit(parent);
            root.left = Tree::Branch(parent);
            return (root, deficit);
        }

        let sibling = node
            .right
            .as_branch()
            .expect("a black deficit on the left implies a sibling");
        let near_red = is_red(&sibling.left);
        let far_red = is_red(&sibling.right);

        if !near_red && !far_red {
            paint(&mut node.right, Color::Red);
            if node.meta == Color::Red {
                node.meta = Color::Black;
                return (node, false);
            }
            return (node, true);
        }

        let parent_color = node.meta;
        if !far_red && let Some(sibling) = node.right.take_branch() {
            trace!("red-black: near nephew red, rotate sibling right");
            node.right = Tree::Branch(Self::rotate_right(sibling));
        }
        trace!("red-black: far nephew red, rotate parent left");
        let mut root = Self::rotate_left(node);
        root.meta = parent_color;
        paint(&mut root.left, Color::Black);
        paint(&mut root.right, Color::Black);
        (root, false)
    }

    fn fix_right_deficit<T>(mut node: Node<T>) -> (Node<T>, bool) {
        if is_red(&node.left) {
            trace!("red-black: red sibling, rotate right");
            let mut root = Self::rotate_right(node);
            root.meta = Color::Black;
            let mut parent = root
                .right
                .take_branch()
                .expect("rotate_right leaves the old parent on the right");
            parent.meta = Color::Red;
            let (parent, deficit) = Self::fix_right_deficit(parent);
            root.right = Tree::Branch(parent);
            return (root, deficit);
        }

        let sibling = node
            .left
            .as_branch()
            .expect("a black deficit on the right implies a sibling");
        let near_red = is_red(&sibling.right);
        let far_red = is_red(&sibling.left);

        if !near_red && !far_red {
            paint(&mut node.left, Color::Red);
            if node.meta == Color::Red {
                node.meta = Color::Black;
                return (node, false);
            }
            return (node, true);
        }

        let parent_color = node.meta;
        if !far_red && let Some(sibling) = node.left.take_branch() {
            trace!("red-black: near nephew red, rotate sibling left");
            node.left = Tree::Branch(Self::rotate_left(sibling));
        }
        trace!("red-black: far nephew red, rotate parent right");
        let mut root = Self::rotate_right(node);
        root.meta = parent_color;
        paint(&mut root.left, Color::Black);
        paint(&mut root.right, Color::Black);
        (root, false)
    }

    /// Replaces a branch of `color` by its only child (or a terminator).
    fn splice<T>(mut child: Tree<T, Color>, element: T, color: Color) -> (Tree<T, Color>, T, bool) {
        if color == Color::Red {
            return (child, element, false);
        }
        if is_red(&child) {
            paint(&mut child, Color::Black);
            return (child, element, false);
        }
        (child, element, true)
    }

    fn after_left<T>(node: Node<T>, deficit: bool) -> (Tree<T, Color>, bool) {
        if !deficit {
            return (Tree::Branch(node), false);
        }
        let (node, deficit) = Self::fix_left_deficit(node);
        (Tree::Branch(node), deficit)
    }

    fn after_right<T>(node: Node<T>, deficit: bool) -> (Tree<T, Color>, bool) {
        if !deficit {
            return (Tree::Branch(node), false);
        }
        let (node, deficit) = Self::fix_right_deficit(node);
        (Tree::Branch(node), deficit)
    }

    fn remove_min<T>(mut node: Node<T>) -> (Tree<T, Color>, T, bool) {
        let Some(left) = node.left.take_branch() else {
            let Branch {
                right,
                element,
                meta,
                ..
            } = *node;
            return Self::splice(right, element, meta);
        };
        let (left, min, deficit) = Self::remove_min(left);
        node.left = left;
        let (tree, deficit) = Self::after_left(node, deficit);
        (tree, min, deficit)
    }

    fn remove_node<T, Q>(tree: Tree<T, Color>, key: &Q) -> (Tree<T, Color>, Option<T>, bool)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut node) = tree.into_branch() else {
            return (Tree::Empty, None, false);
        };

        match key.cmp(node.element.borrow()) {
            Ordering::Less => {
                let (left, removed, deficit) = Self::remove_node(mem::take(&mut node.left), key);
                node.left = left;
                let (tree, deficit) = Self::after_left(node, deficit);
                (tree, removed, deficit)
            }
            Ordering::Greater => {
                let (right, removed, deficit) = Self::remove_node(mem::take(&mut node.right), key);
                node.right = right;
                let (tree, deficit) = Self::after_right(node, deficit);
                (tree, removed, deficit)
            }
            Ordering::Equal => {
                if node.left.is_empty() {
                    let Branch {
                        right,
                        element,
                        meta,
                        ..
                    } = *node;
                    let (tree, element, deficit) = Self::splice(right, element, meta);
                    return (tree, Some(element), deficit);
                }
                let Some(right) = node.right.take_branch() else {
                    let Branch {
                        left,
                        element,
                        meta,
                        ..
                    } = *node;
                    let (tree, element, deficit) = Self::splice(left, element, meta);
                    return (tree, Some(element), deficit);
                };
                let (right, successor, deficit) = Self::remove_min(right);
                node.right = right;
                let removed = mem::replace(&mut node.element, successor);
                let (tree, deficit) = Self::after_right(node, deficit);
                (tree, Some(removed), deficit)
            }
        }
    }

    /// Returns the black height of `tree`, terminators excluded.
    fn check_node<T>(tree: &Tree<T, Color>, depth: usize) -> Result<usize, InvariantViolation> {
        let Some(node) = tree.as_branch() else {
            return Ok(0);
        };
        if node.meta == Color::Red && (is_red(&node.left) || is_red(&node.right)) {
            return Err(InvariantViolation::RedRedViolation { depth });
        }
        let left = Self::check_node(&node.left, depth + 1)?;
        let right = Self::check_node(&node.right, depth + 1)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { depth, left, right });
        }
        Ok(left + usize::from(node.meta == Color::Black))
    }
}

impl Balance for RedBlack {
    type Meta = Color;

    fn insert<T: Ord>(tree: &mut Tree<T, Color>, element: T) -> Option<T> {
        let (mut root, replaced) = Self::insert_node(mem::take(tree), element);
        paint(&mut root, Color::Black);
        *tree = root;
        replaced
    }

    fn remove<T, Q>(tree: &mut Tree<T, Color>, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut root, removed, _deficit) = Self::remove_node(mem::take(tree), key);
        paint(&mut root, Color::Black);
        *tree = root;
        removed
    }

    /// Builds a minimal-height tree; when the deepest level is partial, its
    /// branches are red so every terminator path has the same black count.
    fn build_sorted<T>(elements: Vec<T>) -> Tree<T, Color> {
        let len = elements.len();
        let height = (usize::BITS - len.leading_zeros()) as usize;
        let perfect = (len + 1).is_power_of_two();
        let red_depth = (!perfect).then(|| height - 1);
        Tree::build_balanced(&mut elements.into_iter(), len, 0, &mut |depth, _, _| {
            if Some(depth) == red_depth {
                Color::Red
            } else {
                Color::Black
            }
        })
    }

    fn validate<T: Ord>(tree: &Tree<T, Color>) -> Result<(), InvariantViolation> {
        if is_red(tree) {
            return Err(InvariantViolation::RedRoot);
        }
        tree.check_order()?;
        Self::check_node(tree, 0).map(|_| ())
    }
}
