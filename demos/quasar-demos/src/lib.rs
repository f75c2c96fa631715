//! Algorithm fixtures built on [`quasar_dsl`]: the quantum Fourier
//! transform and a Grover search/diffusion operator. Neither core crate
//! depends on this one — it exists so the rest of the workspace has a
//! couple of real, multi-qubit programs to exercise end to end in
//! integration tests, instead of only hand-built single-gate commands.
//!
//! # Example
//!
//! ```rust
//! use quasar_ir::ast::Program;
//! use quasar_demos::qft;
//!
//! let mut prog = Program::new();
//! let qs = prog.qubits(&[false; 4]);
//! prog.append(qft(&qs));
//! let ast = prog.into_ast();
//! ```

use std::f64::consts::PI;

use quasar_dsl::{all, flip, h, if_, swap, zero};
use quasar_ir::ast::{AstNode, QubitName};

fn program(nodes: Vec<AstNode>) -> AstNode {
    AstNode::Program(nodes)
}

/// The textbook quantum Fourier transform: per-qubit Hadamard followed by
/// a descending ladder of controlled phase rotations, then a final
/// register reversal so the output falls in the conventional bit order.
pub fn qft(qubits: &[QubitName]) -> AstNode {
    let n = qubits.len();
    let mut nodes = Vec::new();

    for i in 0..n {
        nodes.push(h(qubits[i]));
        for j in (i + 1)..n {
            let k = j - i + 1;
            let angle = 2.0 * PI / 2f64.powi(k as i32);
            nodes.push(if_(all(qubits[j])).then(quasar_dsl::u1(qubits[i], angle)));
        }
    }

    for i in 0..n / 2 {
        nodes.push(swap(qubits[i], qubits[n - 1 - i]));
    }

    program(nodes)
}

/// A single Grover diffusion-and-oracle round: flip the phase on states
/// matching `predicate`, then invert about the mean (the standard
/// Hadamard / zero-flip / Hadamard sandwich), then an unconditional
/// global phase kick to fix up the overall sign.
fn grover_iteration(qubits: &[QubitName], predicate: AstNode) -> Vec<AstNode> {
    let mut nodes = vec![if_(predicate).flip()];
    nodes.extend(qubits.iter().map(|&q| h(q)));
    nodes.push(if_(zero(qubits.to_vec())).flip());
    nodes.extend(qubits.iter().map(|&q| h(q)));
    nodes.extend(flip(qubits[0]));
    nodes
}

/// The number of Grover iterations that maximizes the success
/// probability for a search space of size `2^qubits.len()` with a single
/// marked state, per the standard `pi/4 / asin(sqrt(1/N))` formula.
fn optimal_iteration_count(num_qubits: usize) -> usize {
    let n = 2f64.powi(num_qubits as i32);
    (PI / 4.0 / (1.0 / n).sqrt().asin()) as usize
}

/// Grover search over `qubits`: an initial equal superposition followed
/// by the iteration count that maximizes the chance of finding a state
/// satisfying `predicate`, a condition built over `qubits` via
/// [`quasar_dsl`]'s condition helpers.
pub fn grover(qubits: &[QubitName], predicate: impl Fn() -> AstNode) -> AstNode {
    let mut nodes: Vec<AstNode> = qubits.iter().map(|&q| h(q)).collect();
    for _ in 0..optimal_iteration_count(qubits.len()) {
        nodes.extend(grover_iteration(qubits, predicate()));
    }
    program(nodes)
}
