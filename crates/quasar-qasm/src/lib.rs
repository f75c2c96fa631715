//! An abstract emitter trait plus the OPENQASM 2.0 back-end for Quasar's
//! compiled command stream.
//!
//! # Example
//!
//! ```rust
//! use quasar_ir::command::{Command, GateCommand};
//! use quasar_ir::gate::BuiltinGate;
//! use quasar_ir::qubit::QubitId;
//! use quasar_qasm::emitter::{emit_all, Qasm2Emitter};
//!
//! let commands = vec![Command::Gate(GateCommand::uncontrolled(BuiltinGate::H, QubitId(0), vec![]))];
//! let qasm = emit_all(&Qasm2Emitter::new(), &commands, 1, 0).unwrap();
//! assert!(qasm.contains("OPENQASM 2.0;"));
//! assert!(qasm.contains("h q[0];"));
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{emit_all, Emitter, Qasm2Emitter};
pub use error::{EmitError, EmitResult};
