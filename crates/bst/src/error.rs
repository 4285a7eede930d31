use thiserror::Error;

/// A broken structural invariant, reported by `check_invariants`.
///
/// These never surface from ordinary operations; they exist so tests and
/// debug assertions can say which rule a tree broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("elements out of order at in-order position {position}")]
    OutOfOrder { position: usize },
    #[error("branch at depth {depth} has balance factor {balance}")]
    Unbalanced { depth: usize, balance: isize },
    #[error("branch at depth {depth} caches height {cached}, actual height is {actual}")]
    StaleHeight {
        depth: usize,
        cached: usize,
        actual: usize,
    },
    #[error("root is red")]
    RedRoot,
    #[error("red branch at depth {depth} has a red child")]
    RedRedViolation { depth: usize },
    #[error("branch at depth {depth} has black heights {left} (left) and {right} (right)")]
    BlackHeightMismatch {
        depth: usize,
        left: usize,
        right: usize,
    },
    #[error("tracked length {tracked} differs from element count {actual}")]
    LengthMismatch { tracked: usize, actual: usize },
}
