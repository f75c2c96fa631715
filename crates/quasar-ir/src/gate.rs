//! The primitive gate catalog.
//!
//! Everything the compiler can emit ultimately reduces to one of these five
//! gates plus positive control-qubit annotations. There is no open registry:
//! adding a gate is a compile-time exhaustiveness error everywhere it must
//! be handled, by design (see the AST and Command variants for the same
//! closed-enum treatment).

use std::fmt;

/// One of the five primitive gates `{X, Y, Z, H, U3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BuiltinGate {
    X,
    Y,
    Z,
    H,
    U3,
}

impl BuiltinGate {
    /// Number of real parameters this gate takes: 0 for the Paulis and H, 3
    /// (θ, φ, λ) for U3.
    pub const fn param_count(self) -> usize {
        match self {
            BuiltinGate::X | BuiltinGate::Y | BuiltinGate::Z | BuiltinGate::H => 0,
            BuiltinGate::U3 => 3,
        }
    }

    /// The lowercase name used by the OPENQASM 2.0 `qelib1.inc` library for
    /// the zero-control form of this gate.
    pub const fn qasm_name(self) -> &'static str {
        match self {
            BuiltinGate::X => "x",
            BuiltinGate::Y => "y",
            BuiltinGate::Z => "z",
            BuiltinGate::H => "h",
            BuiltinGate::U3 => "u3",
        }
    }
}

impl fmt::Display for BuiltinGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qasm_name())
    }
}
