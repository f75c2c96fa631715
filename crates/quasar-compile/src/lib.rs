//! Quasar compile pass: lowers a [`quasar_ir::AstNode`] program into a flat
//! [`quasar_ir::Command`] sequence, plus the peephole optimiser that runs
//! over that sequence afterwards.
//!
//! # Architecture
//!
//! Two independent steps, run in order:
//!
//! 1. [`compiler::compile`] walks the AST once, allocating qubits/cbits via a
//!    per-invocation [`allocator::ResourceAllocator`], synthesising
//!    multi-control gates down to the five-gate primitive catalog, and
//!    threading control polarity through `if`/`flip`/`inv` via a plain
//!    value-typed context map. It never mutates the AST.
//! 2. [`optimizer::optimize`] runs a per-qubit-stack adjacent-inverse
//!    cancellation pass over the resulting command list.
//!
//! There is no multi-pass pipeline, property bag, or pass-ordering
//! infrastructure here — both steps are plain functions over and returning
//! owned data, reflecting that this crate compiles a fixed two-stage
//! pipeline rather than an open-ended one.
//!
//! # Example
//!
//! ```rust
//! use quasar_ir::ast::{AstNode, Program};
//! use quasar_ir::gate::BuiltinGate;
//! use quasar_compile::compiler::compile;
//! use quasar_compile::optimizer::{optimize, OptimizeOptions};
//!
//! let mut prog = Program::new();
//! let q0 = prog.qubit(false);
//! prog.append(AstNode::Gate { gate: BuiltinGate::H, target: q0, params: vec![] });
//! prog.append(AstNode::Gate { gate: BuiltinGate::H, target: q0, params: vec![] });
//!
//! let compiled = compile(&prog.into_ast()).unwrap();
//! let optimized = optimize(&compiled.commands, compiled.num_qubits, OptimizeOptions::default());
//! assert!(optimized.is_empty(), "H . H cancels to the identity");
//! ```

pub mod allocator;
pub mod compiler;
pub mod error;
pub mod optimizer;

pub use compiler::{compile, CompiledProgram};
pub use error::{CompileError, CompileResult};
pub use optimizer::{optimize, OptimizeOptions};
