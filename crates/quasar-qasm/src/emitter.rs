//! An abstract emitter interface plus the OPENQASM 2.0 back-end.
//!
//! Emission is append-only: every method returns the lines it produces and
//! nothing else is buffered by the trait itself, so a streaming
//! implementation is free to write those lines straight through.

use quasar_ir::command::{Command, GateCommand};
use quasar_ir::gate::BuiltinGate;
use quasar_ir::qubit::{CbitId, QubitId};

use crate::error::{EmitError, EmitResult};

/// A sink that turns a compiled command stream into textual lines. The
/// method set is deliberately small and fixed — callers never need more
/// than "declare the registers" and "render one command" to add a new
/// back-end.
pub trait Emitter {
    /// The header lines declaring the qubit/classical-bit registers, in
    /// emission order, including any trailing separator lines.
    fn headers(&self, num_qubits: u32, num_cbits: u32) -> Vec<String>;

    /// Renders a single command as zero or more lines (a `Gate` command is
    /// always exactly one line; `Measure`/`Reset` are each one line too, but
    /// the signature stays a `Vec` so back-ends that need preamble lines for
    /// a given command aren't boxed in).
    fn emit_command(&self, command: &Command) -> EmitResult<Vec<String>>;
}

/// The OPENQASM 2.0 back-end. Renders the bit-exact header/footer/gate-line
/// contract: `OPENQASM 2.0;` / `include "qelib1.inc";`, blank-line-separated
/// `qreg`/`creg` declarations, no footer, and gate lines of the form
/// `op(params_csv) controls_csv,target;`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Qasm2Emitter;

impl Qasm2Emitter {
    pub fn new() -> Self {
        Self
    }

    /// Maps a primitive gate plus its control count to the `qelib1.inc` gate
    /// name. `X/Y/Z/H` support zero or one control; `U3` supports zero or
    /// one. Any other combination is a back-end error — the compile pass
    /// guarantees it never hands this more than that by the time emission
    /// runs, since anything beyond a single control has already been
    /// reduced to a Toffoli tree over `X`.
    fn gate_name(gate: BuiltinGate, controls: usize) -> EmitResult<&'static str> {
        match (gate, controls) {
            (BuiltinGate::X, 0) => Ok("x"),
            (BuiltinGate::X, 1) => Ok("cx"),
            (BuiltinGate::X, 2) => Ok("ccx"),
            (BuiltinGate::Y, 0) => Ok("y"),
            (BuiltinGate::Y, 1) => Ok("cy"),
            (BuiltinGate::Z, 0) => Ok("z"),
            (BuiltinGate::Z, 1) => Ok("cz"),
            (BuiltinGate::H, 0) => Ok("h"),
            (BuiltinGate::H, 1) => Ok("ch"),
            (BuiltinGate::U3, 0) => Ok("u3"),
            (BuiltinGate::U3, 1) => Ok("cu3"),
            _ => Err(EmitError::UnsupportedControlCount { gate, controls }),
        }
    }

    fn qubit_ref(qubit: QubitId) -> String {
        format!("q[{}]", qubit.0)
    }

    fn cbit_ref(cbit: CbitId) -> String {
        format!("c[{}]", cbit.0)
    }

    fn emit_gate(&self, gate: &GateCommand) -> EmitResult<String> {
        let name = Self::gate_name(gate.gate, gate.controls.len())?;

        let params = if gate.params.is_empty() {
            String::new()
        } else {
            let csv = gate.params.iter().map(|p| format!("{p}")).collect::<Vec<_>>().join(", ");
            format!("({csv})")
        };

        let qubits = gate
            .controls
            .iter()
            .copied()
            .chain(std::iter::once(gate.target))
            .map(Self::qubit_ref)
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("{name}{params} {qubits};"))
    }
}

impl Emitter for Qasm2Emitter {
    fn headers(&self, num_qubits: u32, num_cbits: u32) -> Vec<String> {
        vec![
            "OPENQASM 2.0;".to_string(),
            "include \"qelib1.inc\";".to_string(),
            String::new(),
            format!("qreg q[{num_qubits}];"),
            format!("creg c[{num_cbits}];"),
            String::new(),
        ]
    }

    fn emit_command(&self, command: &Command) -> EmitResult<Vec<String>> {
        let line = match command {
            Command::Gate(gate) => self.emit_gate(gate)?,
            Command::Measure { qubit, cbit } => {
                format!("measure {} -> {};", Self::qubit_ref(*qubit), Self::cbit_ref(*cbit))
            }
            Command::Reset { qubit } => format!("reset {};", Self::qubit_ref(*qubit)),
        };
        Ok(vec![line])
    }
}

/// Renders a whole command list (with its register sizes) through an
/// emitter into newline-joined OPENQASM 2.0 text — the piece that
/// `quasar::Quasar::to_qasm_str` wraps.
pub fn emit_all(emitter: &impl Emitter, commands: &[Command], num_qubits: u32, num_cbits: u32) -> EmitResult<String> {
    let mut lines = emitter.headers(num_qubits, num_cbits);
    for command in commands {
        lines.extend(emitter.emit_command(command)?);
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    /// S1: a single Hadamard renders as exactly `h q[0];` in the body.
    #[test]
    fn single_hadamard_body_line() {
        let emitter = Qasm2Emitter::new();
        let commands = vec![Command::Gate(GateCommand::uncontrolled(BuiltinGate::H, QubitId(0), vec![]))];
        let text = emit_all(&emitter, &commands, 1, 0).unwrap();
        assert!(text.lines().any(|line| line == "h q[0];"));
    }

    #[test]
    fn headers_match_bit_exact_contract() {
        let emitter = Qasm2Emitter::new();
        let headers = emitter.headers(2, 2);
        assert_eq!(
            headers,
            vec![
                "OPENQASM 2.0;".to_string(),
                "include \"qelib1.inc\";".to_string(),
                String::new(),
                "qreg q[2];".to_string(),
                "creg c[2];".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn controls_sorted_before_target() {
        let emitter = Qasm2Emitter::new();
        let mut controls = BTreeSet::new();
        controls.insert(QubitId(3));
        controls.insert(QubitId(1));
        let gate = GateCommand::new(BuiltinGate::X, QubitId(2), controls, vec![]);
        let line = emitter.emit_gate(&gate).unwrap();
        assert_eq!(line, "ccx q[1], q[3], q[2];");
    }

    #[test]
    fn measure_and_reset_lines() {
        let emitter = Qasm2Emitter::new();
        assert_eq!(
            emitter.emit_command(&Command::Measure { qubit: QubitId(0), cbit: CbitId(1) }).unwrap(),
            vec!["measure q[0] -> c[1];".to_string()]
        );
        assert_eq!(
            emitter.emit_command(&Command::Reset { qubit: QubitId(0) }).unwrap(),
            vec!["reset q[0];".to_string()]
        );
    }

    #[test]
    fn three_control_y_is_rejected() {
        let mut controls = BTreeSet::new();
        controls.insert(QubitId(0));
        controls.insert(QubitId(1));
        controls.insert(QubitId(2));
        let gate = GateCommand::new(BuiltinGate::Y, QubitId(3), controls, vec![]);
        let emitter = Qasm2Emitter::new();
        assert!(matches!(emitter.emit_gate(&gate), Err(EmitError::UnsupportedControlCount { .. })));
    }

    /// U3 parameters use plain default `f64` formatting, not the symbolic
    /// pi-substitution some OPENQASM emitters use.
    #[test]
    fn u3_params_use_default_float_formatting() {
        let emitter = Qasm2Emitter::new();
        let gate = GateCommand::uncontrolled(BuiltinGate::U3, QubitId(0), vec![std::f64::consts::PI, 0.0, 1.5]);
        let line = emitter.emit_gate(&gate).unwrap();
        assert_eq!(line, format!("u3({}, 0, 1.5) q[0];", std::f64::consts::PI));
    }
}
