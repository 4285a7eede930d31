use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::error::InvariantViolation;
use crate::tree::Tree;

/// Ordered queries. Each is a single O(height) descent; `floor`, `lower` and
/// `ceiling` carry the best candidate seen on the way down.
impl<T, M> Tree<T, M> {
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self;
        while let Some(node) = current.as_branch() {
            match key.cmp(node.element.borrow()) {
                Ordering::Less => current = &node.left,
                Ordering::Greater => current = &node.right,
                Ordering::Equal => return Some(&node.element),
            }
        }
        None
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Greatest element strictly less than `key`.
    pub fn lower<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self;
        let mut candidate = None;
        while let Some(node) = current.as_branch() {
            if key.cmp(node.element.borrow()) == Ordering::Greater {
                candidate = Some(&node.element);
                current = &node.right;
            } else {
                current = &node.left;
            }
        }
        candidate
    }

    /// Greatest element less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self;
        let mut candidate = None;
        while let Some(node) = current.as_branch() {
            match key.cmp(node.element.borrow()) {
                Ordering::Greater => {
                    candidate = Some(&node.element);
                    current = &node.right;
                }
                Ordering::Equal => return Some(&node.element),
                Ordering::Less => current = &node.left,
            }
        }
        candidate
    }

    /// Least element greater than or equal to `key`.
    pub fn ceiling<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self;
        let mut candidate = None;
        while let Some(node) = current.as_branch() {
            match key.cmp(node.element.borrow()) {
                Ordering::Less => {
                    candidate = Some(&node.element);
                    current = &node.left;
                }
                Ordering::Equal => return Some(&node.element),
                Ordering::Greater => current = &node.right,
            }
        }
        candidate
    }

    pub fn first(&self) -> Option<&T> {
        self.leftmost_branch().element()
    }

    pub fn last(&self) -> Option<&T> {
        self.rightmost_branch().element()
    }

    pub(crate) fn check_order(&self) -> Result<(), InvariantViolation>
    where
        T: Ord,
    {
        let mut previous: Option<&T> = None;
        for (position, element) in self.iter().enumerate() {
            if previous.is_some_and(|previous| previous >= element) {
                return Err(InvariantViolation::OutOfOrder { position });
            }
            previous = Some(element);
        }
        Ok(())
    }
}
