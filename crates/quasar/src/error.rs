//! Unifies the compile pass's and the emitter's error types behind one
//! facade-level error, since a caller of `Quasar::compile` doesn't care
//! which stage failed.

use thiserror::Error;

use quasar_compile::CompileError;
use quasar_qasm::EmitError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuasarError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

pub type QuasarResult<T> = Result<T, QuasarError>;
