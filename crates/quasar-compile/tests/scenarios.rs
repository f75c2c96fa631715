//! End-to-end scenario tests exercising the public `compile`/`optimize` API
//! together, rather than the unit-level internals each module already
//! covers in isolation.

use std::collections::BTreeSet;

use quasar_compile::{compile, optimize, OptimizeOptions};
use quasar_ir::ast::{AstNode, Program};
use quasar_ir::command::Command;
use quasar_ir::gate::BuiltinGate;

/// S1: a single Hadamard on one declared qubit compiles to exactly one
/// unconditional `H` command and survives optimisation unchanged.
#[test]
fn single_hadamard_survives_optimization_untouched() {
    let mut prog = Program::new();
    let q0 = prog.qubit(false);
    prog.append(AstNode::Gate { gate: BuiltinGate::H, target: q0, params: vec![] });

    let compiled = compile(&prog.into_ast()).unwrap();
    assert_eq!(compiled.num_qubits, 1);
    assert_eq!(compiled.commands.len(), 1);

    let optimized = optimize(&compiled.commands, compiled.num_qubits, OptimizeOptions::default());
    assert_eq!(optimized, compiled.commands);
}

/// S6: X on a target controlled on the AND of four qubits compiles to a
/// forward Toffoli tree into an ancilla beyond the declared register, a
/// single CX from the ancilla to the target, and the mirrored uncompute
/// tree — and none of it is touched by the optimiser (the compute/uncompute
/// halves aren't adjacent inverses of each other on any shared qubit,
/// since the reversed tree is separated by the central CX).
#[test]
fn multi_control_toffoli_tree_structure_is_stable_under_optimization() {
    let mut prog = Program::new();
    let controls = prog.qubits(&[true, true, true, true]);
    let target = prog.qubit(false);
    let cond = AstNode::Match { controls: controls.clone(), mask: vec![1, 1, 1, 1] };
    prog.append(AstNode::IfThen {
        cond: Box::new(cond),
        body: Box::new(AstNode::Gate { gate: BuiltinGate::X, target, params: vec![] }),
    });

    let compiled = compile(&prog.into_ast()).unwrap();
    assert!(compiled.num_qubits > 6, "needs at least one ancilla beyond the 5 declared qubits");

    let ancillas: BTreeSet<_> = (6..compiled.num_qubits).collect();
    let has_ancilla_ccx = compiled.commands.iter().any(|c| match c {
        Command::Gate(g) => {
            g.gate == BuiltinGate::X
                && g.controls.len() == 2
                && g.target.0 >= 6
                && g.controls.iter().all(|c| !ancillas.contains(&c.0) || *c != g.target)
        }
        _ => false,
    });
    assert!(has_ancilla_ccx, "expects at least one CCX writing into an ancilla");

    let single_control_cx_into_target = compiled.commands.iter().any(|c| match c {
        Command::Gate(g) => g.gate == BuiltinGate::X && g.controls.len() == 1 && g.target.0 < 6,
        _ => false,
    });
    assert!(single_control_cx_into_target, "expects one CX from the aggregate ancilla into the target");

    let optimized = optimize(&compiled.commands, compiled.num_qubits, OptimizeOptions::default());
    assert_eq!(optimized, compiled.commands, "compute/uncompute halves are not adjacent on any shared qubit");
}
