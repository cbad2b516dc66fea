//! LIFO of transform snapshots for "relative to the current top" composition.
//!
//! [`MatrixStack`] stores [`Matrix4`] values, never references: `push` keeps
//! its own copy and `peek` hands out a copy, so editing a working matrix after
//! pushing it (or editing a peeked matrix) can never leak back into the stack.
//!
//! ```
//! use flatpack::{Matrix4, MatrixStack};
//!
//! let mut stack = MatrixStack::new();
//! let mut working = Matrix4::identity().translate(1.0, 0.0, 0.0);
//! stack.push(working);
//!
//! working = working.scale(3.0, 3.0, 3.0);
//! assert_ne!(stack.peek().unwrap(), working);
//!
//! stack.pop().unwrap();
//! assert!(stack.pop().is_err());
//! ```

use crate::matrix::Matrix4;

/// Which stack operation found the stack empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackOp {
    Pop,
    Peek,
}

impl std::fmt::Display for StackOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackOp::Pop => write!(f, "pop"),
            StackOp::Peek => write!(f, "peek"),
        }
    }
}

/// `pop` or `peek` on an empty [`MatrixStack`].
///
/// This signals a malformed part hierarchy. Composition for the frame is
/// abandoned instead of continuing with a substitute matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("matrix stack underflow: {op} on an empty stack")]
pub struct StackUnderflow {
    pub op: StackOp,
}

/// An explicit stack of transform snapshots.
#[derive(Clone, Debug, Default)]
pub struct MatrixStack {
    matrices: Vec<Matrix4>,
}

impl MatrixStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stack with room for `capacity` snapshots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matrices: Vec::with_capacity(capacity),
        }
    }

    /// Stores a copy of `matrix` on top of the stack.
    pub fn push(&mut self, matrix: Matrix4) {
        self.matrices.push(matrix);
    }

    /// Removes and returns the top snapshot.
    pub fn pop(&mut self) -> Result<Matrix4, StackUnderflow> {
        self.matrices
            .pop()
            .ok_or(StackUnderflow { op: StackOp::Pop })
    }

    /// Returns a copy of the top snapshot without removing it.
    pub fn peek(&self) -> Result<Matrix4, StackUnderflow> {
        self.matrices
            .last()
            .copied()
            .ok_or(StackUnderflow { op: StackOp::Peek })
    }

    /// Removes every snapshot, keeping the allocation.
    pub fn clear(&mut self) {
        self.matrices.clear();
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_pushes_then_n_pops_leaves_empty() {
        let mut stack = MatrixStack::new();
        for i in 0..8 {
            stack.push(Matrix4::identity().translate(i as f32, 0.0, 0.0));
        }
        for i in (0..8).rev() {
            let m = stack.pop().unwrap();
            assert_eq!(m.transform_point([0.0; 3])[0], i as f32);
        }
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), Err(StackUnderflow { op: StackOp::Pop }));
    }

    #[test]
    fn peek_on_empty_fails() {
        let stack = MatrixStack::new();
        assert_eq!(stack.peek(), Err(StackUnderflow { op: StackOp::Peek }));
    }

    #[test]
    fn push_stores_a_copy() {
        let mut stack = MatrixStack::new();
        let mut working = Matrix4::identity();
        stack.push(working);
        working = working.translate(5.0, 0.0, 0.0);

        assert_eq!(stack.peek().unwrap(), Matrix4::identity());
        assert_ne!(working, Matrix4::identity());
    }

    #[test]
    fn peek_returns_a_copy() {
        let mut stack = MatrixStack::new();
        stack.push(Matrix4::identity().translate(1.0, 2.0, 3.0));

        let first = stack.peek().unwrap();
        let _edited = first.rotate(90.0, 0.0, 1.0, 0.0).scale(2.0, 2.0, 2.0);

        assert_eq!(stack.peek().unwrap(), first);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn clear_empties_the_stack() {
        let mut stack = MatrixStack::with_capacity(4);
        stack.push(Matrix4::identity());
        stack.push(Matrix4::identity());
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.peek().is_err());
    }

    #[test]
    fn underflow_message_names_the_operation() {
        let err = MatrixStack::new().pop().unwrap_err();
        assert_eq!(err.to_string(), "matrix stack underflow: pop on an empty stack");
    }
}
