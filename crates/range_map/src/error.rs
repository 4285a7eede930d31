use bst::InvariantViolation;
use thiserror::Error;

/// A broken interval-map invariant, reported by
/// [`TreeRangeMap::check_invariants`](crate::TreeRangeMap::check_invariants).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RangeMapViolation {
    #[error(transparent)]
    Tree(#[from] InvariantViolation),
    #[error("entry at position {position} holds an empty interval")]
    EmptyInterval { position: usize },
    #[error("entry at position {position} is stored under a key other than its lower bound")]
    KeyMismatch { position: usize },
    #[error("entry at position {position} overlaps its predecessor")]
    Overlap { position: usize },
}
