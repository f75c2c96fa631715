//! Quasar: an embedded quantum-circuit compiler.
//!
//! Ties together [`quasar_ir`]'s AST and gate catalog, [`quasar_compile`]'s
//! lowering pass and peephole optimiser, and [`quasar_qasm`]'s OPENQASM 2.0
//! emitter behind the two entry points a caller actually needs:
//! [`Quasar::compile`] (any [`Emitter`]) and [`Quasar::to_qasm_str`] (the
//! OPENQASM 2.0 back-end specifically, newline-joined).
//!
//! # Example
//!
//! ```rust
//! use quasar::Quasar;
//! use quasar_ir::ast::{AstNode, Program};
//! use quasar_ir::gate::BuiltinGate;
//!
//! let mut prog = Program::new();
//! let q0 = prog.qubit(false);
//! prog.append(AstNode::Gate { gate: BuiltinGate::H, target: q0, params: vec![] });
//!
//! let qasm = Quasar::new().to_qasm_str(&prog.into_ast(), true).unwrap();
//! assert!(qasm.contains("OPENQASM 2.0;"));
//! assert!(qasm.contains("h q[0];"));
//! ```

pub mod error;

use quasar_compile::{compile as compile_pass, optimize, OptimizeOptions};
use quasar_ir::ast::AstNode;
use quasar_qasm::emitter::{Emitter, Qasm2Emitter};

pub use error::{QuasarError, QuasarResult};

/// The compiler's single entry point. Stateless — every method takes the
/// program it operates on, rather than accumulating it across calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct Quasar;

impl Quasar {
    pub fn new() -> Self {
        Self
    }

    /// Lowers `program` to the Command IR, optionally runs the
    /// adjacent-inverse optimiser, and renders the result through
    /// `emitter`. Returns the emitted lines in order, headers first.
    pub fn compile(&self, program: &AstNode, emitter: &impl Emitter, optimize_program: bool) -> QuasarResult<Vec<String>> {
        let compiled = compile_pass(program)?;
        let commands = if optimize_program {
            optimize(&compiled.commands, compiled.num_qubits, OptimizeOptions::default())
        } else {
            compiled.commands
        };

        let mut lines = emitter.headers(compiled.num_qubits, compiled.num_cbits);
        for command in &commands {
            lines.extend(emitter.emit_command(command)?);
        }
        Ok(lines)
    }

    /// `compile` through the OPENQASM 2.0 back-end, newline-joined.
    pub fn to_qasm_str(&self, program: &AstNode, optimize_program: bool) -> QuasarResult<String> {
        Ok(self.compile(program, &Qasm2Emitter::new(), optimize_program)?.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quasar_dsl::{ccx, h, x};
    use quasar_ir::ast::Program;

    #[test]
    fn single_hadamard_round_trips_to_qasm() {
        let mut prog = Program::new();
        let q0 = prog.qubit(false);
        prog.append(h(q0));

        let qasm = Quasar::new().to_qasm_str(&prog.into_ast(), true).unwrap();
        assert!(qasm.lines().any(|line| line == "h q[0];"));
    }

    #[test]
    fn adjacent_self_inverse_optimizes_away() {
        let mut prog = Program::new();
        let q0 = prog.qubit(false);
        prog.append(x(q0));
        prog.append(x(q0));

        let unoptimized = Quasar::new().compile(&prog.clone().into_ast(), &quasar_qasm::Qasm2Emitter::new(), false).unwrap();
        let optimized = Quasar::new().compile(&prog.into_ast(), &quasar_qasm::Qasm2Emitter::new(), true).unwrap();

        assert!(unoptimized.iter().any(|l| l == "x q[0];"));
        assert!(!optimized.iter().any(|l| l == "x q[0];"));
    }

    #[test]
    fn multi_control_toffoli_emits_without_error() {
        let mut prog = Program::new();
        let c1 = prog.qubit(true);
        let c2 = prog.qubit(true);
        let t = prog.qubit(false);
        prog.append(ccx(c1, c2, t));

        let qasm = Quasar::new().to_qasm_str(&prog.into_ast(), true).unwrap();
        assert!(qasm.contains("ccx "));
    }
}
