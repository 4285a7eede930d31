mod error;
mod iter;
mod search;
mod search_tree;
mod traits;
mod tree;

pub mod impls;

pub use error::InvariantViolation;
pub use impls::{
    avl::Avl,
    rb::{Color, RedBlack},
};
pub use iter::Iter;
pub use search_tree::{AvlTree, RbTree, SearchTree};
pub use traits::Balance;
pub use tree::{Branch, Tree};
