//! The flat Command IR produced by the compile pass.

use std::collections::BTreeSet;
use std::fmt;

use crate::gate::BuiltinGate;
use crate::qubit::{CbitId, QubitId};

/// A single lowered operation. A [`Command::Gate`] carries only *positive*
/// controls — any negative-polarity control has already been compiled away
/// into the surrounding X-flip sandwich by the time a `Command` exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Gate(GateCommand),
    Measure { qubit: QubitId, cbit: CbitId },
    Reset { qubit: QubitId },
}

/// A gate application: the primitive gate, its target, its (sorted, always
/// positive) control set, and its parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct GateCommand {
    pub gate: BuiltinGate,
    pub target: QubitId,
    pub controls: BTreeSet<QubitId>,
    pub params: Vec<f64>,
}

impl GateCommand {
    pub fn new(gate: BuiltinGate, target: QubitId, controls: BTreeSet<QubitId>, params: Vec<f64>) -> Self {
        Self { gate, target, controls, params }
    }

    pub fn uncontrolled(gate: BuiltinGate, target: QubitId, params: Vec<f64>) -> Self {
        Self::new(gate, target, BTreeSet::new(), params)
    }

    /// The set of all qubits this command reads or writes: target plus
    /// controls. Used both by the optimiser (affected-qubit stacks) and by
    /// `commutes` (support overlap).
    pub fn support(&self) -> BTreeSet<QubitId> {
        let mut qubits = self.controls.clone();
        qubits.insert(self.target);
        qubits
    }
}

impl Command {
    /// The qubits this command reads or writes, for optimiser bookkeeping.
    /// `Measure`/`Reset` touch only their single qubit.
    pub fn support(&self) -> BTreeSet<QubitId> {
        match self {
            Command::Gate(g) => g.support(),
            Command::Measure { qubit, .. } | Command::Reset { qubit } => {
                let mut s = BTreeSet::new();
                s.insert(*qubit);
                s
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Gate(g) => {
                write!(f, "{}", g.gate)?;
                if !g.params.is_empty() {
                    write!(f, "({} controls, {} params)", g.controls.len(), g.params.len())?;
                }
                write!(f, " -> {}", g.target)
            }
            Command::Measure { qubit, cbit } => write!(f, "measure {qubit} -> {cbit}"),
            Command::Reset { qubit } => write!(f, "reset {qubit}"),
        }
    }
}
