//! Error types for the OPENQASM 2.0 back-end.

use thiserror::Error;

use quasar_ir::gate::BuiltinGate;

/// Errors raised while emitting a command list. The reducing compile pass
/// guarantees every `Gate` command it hands the emitter is already within
/// the control-count envelope of the chosen gate mapping, so these should
/// only ever surface when an emitter is fed hand-built commands directly.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// `gate` applied with `controls` controls has no entry in the emitter's
    /// gate-name mapping table.
    #[error("{gate} with {controls} controls is not representable in this back-end")]
    UnsupportedControlCount { gate: BuiltinGate, controls: usize },
}

/// Result type for emitter operations.
pub type EmitResult<T> = Result<T, EmitError>;
