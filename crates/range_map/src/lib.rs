mod entry;
mod error;
mod map;

pub use bst::{Avl, Balance, RedBlack};
pub use entry::RangeEntry;
pub use error::RangeMapViolation;
pub use map::{AvlRangeMap, Iter, RbRangeMap, TreeRangeMap};
