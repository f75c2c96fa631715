//! Error types for the compile pass.

use thiserror::Error;

use quasar_ir::ast::{CbitName, QubitName};
use quasar_ir::IrError;

/// Errors raised while lowering an AST to the Command IR.
///
/// `AllocatorUnderflow` and `AllocatorUnderflowBits` indicate a bug in the
/// compiler itself (a lowering scope released more ancillas than it
/// allocated) rather than a malformed user program; they are kept as
/// distinct, documented variants rather than a panic so a host embedding the
/// compiler can still recover the context of the failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A `Qubit`/`QubitDecl` reference used a name with no matching
    /// declaration reachable in scope.
    #[error("qubit {0:?} referenced before declaration")]
    UndeclaredQubit(QubitName),

    /// A `CBit` reference used a name with no matching declaration reachable
    /// in scope.
    #[error("classical bit {0:?} referenced before declaration")]
    UndeclaredCbit(CbitName),

    /// `Match.controls.len() != Match.mask.len()`, or a non-{0,1} mask bit.
    #[error(transparent)]
    Shape(#[from] IrError),

    /// A `Measurement` or `Reset` node was lowered under a non-empty
    /// control context.
    #[error("measurement/reset cannot be controlled (non-unitary operation)")]
    ControlledNonUnitary,

    /// `Inv(body)` contained a `Measurement` or `Reset`.
    #[error("cannot invert a measurement or reset")]
    InvertNonUnitary,

    /// The resource allocator's free-qubit count underflowed below zero —
    /// a lowering scope released more qubits than it allocated.
    #[error("qubit allocator underflow: freed more qubits than were allocated in scope")]
    AllocatorUnderflow,

    /// A `Qubit`/`Match`/`Not` condition node was encountered in statement
    /// position (e.g. directly inside a `Program`).
    #[error("condition node used as a statement")]
    NotAStatement,

    /// A statement node was passed to condition evaluation.
    #[error("statement node used as a condition")]
    NotACondition,

    /// `IfFlip` reduced its condition to zero surviving control qubits —
    /// there is no qubit left to apply the phase kick to.
    #[error("if-flip condition reduced to zero qubits")]
    EmptyFlipCondition,
}

/// Result type for compile-pass operations.
pub type CompileResult<T> = Result<T, CompileError>;
