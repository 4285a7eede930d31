mod entry;
mod map;

pub use bst::{Avl, Balance, InvariantViolation, RedBlack};
pub use entry::Entry;
pub use map::{AvlTreeMap, Iter, RbTreeMap, TreeMap};
