use thiserror::Error;

/// Failures reported by [`RbTree`](crate::RbTree) operations.
///
/// None of them leave the tree in a modified state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RbTreeError {
    #[error("key {0} already exists")]
    KeyAlreadyExists(i64),
    #[error("key {0} not found")]
    KeyNotFound(i64),
    #[error("tree is empty")]
    EmptyTree,
}

pub type Result<T, E = RbTreeError> = std::result::Result<T, E>;
