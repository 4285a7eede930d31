pub mod avl;
pub mod rb;
