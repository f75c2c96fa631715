//! Error types for the IR crate: shape errors that can be caught without a
//! compile pass in scope (arity mismatches, unknown-gate inversion).

use thiserror::Error;

use crate::gate::BuiltinGate;

/// Errors raised by gate arithmetic and AST construction, independent of any
/// particular compile invocation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate was given the wrong number of parameters.
    #[error("gate '{gate}' expects {expected} parameters, got {got}")]
    ParamArityMismatch { gate: BuiltinGate, expected: usize, got: usize },

    /// `Match.controls.len() != Match.mask.len()`.
    #[error("match condition has {controls} controls but a mask of length {mask}")]
    MaskArityMismatch { controls: usize, mask: usize },

    /// A mask entry was neither 0 nor 1.
    #[error("match mask entry must be 0 or 1, got {0}")]
    InvalidMaskBit(u8),
}

/// Result type for IR-level operations.
pub type IrResult<T> = Result<T, IrError>;
