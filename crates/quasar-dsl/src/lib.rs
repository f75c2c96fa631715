//! The Quasar builder DSL: free functions assembling [`AstNode`] subtrees
//! the way a user writes a program, instead of constructing node variants
//! by hand.
//!
//! Everything here is a pure function over `QubitName`/`CbitName` values
//! returning an `AstNode` (or a small fluent `If` builder) — no hidden
//! state, no implicit qubit allocation. Allocate qubits through
//! [`quasar_ir::ast::Program`] and pass the resulting names in.
//!
//! # Example
//!
//! ```rust
//! use quasar_ir::ast::Program;
//! use quasar_dsl::{ccx, h};
//!
//! let mut prog = Program::new();
//! let (c1, c2, t) = (prog.qubit(true), prog.qubit(true), prog.qubit(false));
//! prog.append(h(c1));
//! prog.append(ccx(c1, c2, t));
//! ```

use std::f64::consts::PI;

use quasar_ir::ast::{AstNode, QubitName};
use quasar_ir::gate::BuiltinGate;

/// Accepts either a single qubit or a list of qubits wherever the original
/// builder's conditions do — `all(q)` and `all([q0, q1])` both work.
pub trait IntoQubits {
    fn into_qubits(self) -> Vec<QubitName>;
}

impl IntoQubits for QubitName {
    fn into_qubits(self) -> Vec<QubitName> {
        vec![self]
    }
}

impl IntoQubits for &[QubitName] {
    fn into_qubits(self) -> Vec<QubitName> {
        self.to_vec()
    }
}

impl IntoQubits for Vec<QubitName> {
    fn into_qubits(self) -> Vec<QubitName> {
        self
    }
}

impl<const N: usize> IntoQubits for [QubitName; N] {
    fn into_qubits(self) -> Vec<QubitName> {
        self.to_vec()
    }
}

fn gate(gate: BuiltinGate, target: QubitName, params: Vec<f64>) -> AstNode {
    AstNode::Gate { gate, target, params }
}

fn program(nodes: Vec<AstNode>) -> AstNode {
    AstNode::Program(nodes)
}

// ---------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------

/// A condition matching every qubit in `qubits` as `|1>`.
pub fn all(qubits: impl IntoQubits) -> AstNode {
    let controls = qubits.into_qubits();
    let mask = vec![1u8; controls.len()];
    AstNode::Match { controls, mask }
}

/// A condition matching every qubit in `qubits` as `|0>`.
pub fn zero(qubits: impl IntoQubits) -> AstNode {
    let controls = qubits.into_qubits();
    let mask = vec![0u8; controls.len()];
    AstNode::Match { controls, mask }
}

/// A condition matching when at least one qubit in `qubits` is `|1>`
/// (De Morgan's dual of [`zero`]).
pub fn any(qubits: impl IntoQubits) -> AstNode {
    AstNode::Not(Box::new(zero(qubits)))
}

/// Negates a condition.
pub fn not(cond: AstNode) -> AstNode {
    AstNode::Not(Box::new(cond))
}

/// A fluent `if`/`then`/`else`/`flip` builder over a condition, mirroring
/// `If(cond).Then(body)` / `.Else(body)` / `.Flip()`.
pub struct If {
    cond: AstNode,
}

/// Starts a conditional block over `cond`.
pub fn if_(cond: AstNode) -> If {
    If { cond }
}

impl If {
    pub fn then(self, body: AstNode) -> AstNode {
        AstNode::IfThen { cond: Box::new(self.cond), body: Box::new(body) }
    }

    pub fn then_else(self, then_body: AstNode, else_body: AstNode) -> AstNode {
        AstNode::IfThenElse {
            cond: Box::new(self.cond),
            then_body: Box::new(then_body),
            else_body: Box::new(else_body),
        }
    }

    pub fn flip(self) -> AstNode {
        AstNode::IfFlip { cond: Box::new(self.cond) }
    }
}

/// The adjoint of `body`.
pub fn inv(body: AstNode) -> AstNode {
    AstNode::Inv(Box::new(body))
}

/// Unconditionally applies a global phase flip: `If(all(q)).Flip()` paired
/// with its negation always fires exactly one of the two, so the pair is a
/// no-op on every basis state while still routing through the `IfFlip`
/// machinery — useful as a phase-kick smoke test fixture.
pub fn flip(qubit: QubitName) -> Vec<AstNode> {
    vec![if_(all(qubit)).flip(), if_(not(all(qubit))).flip()]
}

// ---------------------------------------------------------------------
// Primitive gates
// ---------------------------------------------------------------------

pub fn x(target: QubitName) -> AstNode {
    gate(BuiltinGate::X, target, vec![])
}

pub fn y(target: QubitName) -> AstNode {
    gate(BuiltinGate::Y, target, vec![])
}

pub fn z(target: QubitName) -> AstNode {
    gate(BuiltinGate::Z, target, vec![])
}

pub fn h(target: QubitName) -> AstNode {
    gate(BuiltinGate::H, target, vec![])
}

pub fn u1(target: QubitName, lambda: f64) -> AstNode {
    gate(BuiltinGate::U3, target, vec![0.0, 0.0, lambda])
}

pub fn u2(target: QubitName, phi: f64, lambda: f64) -> AstNode {
    gate(BuiltinGate::U3, target, vec![PI / 2.0, phi, lambda])
}

pub fn u3(target: QubitName, theta: f64, phi: f64, lambda: f64) -> AstNode {
    gate(BuiltinGate::U3, target, vec![theta, phi, lambda])
}

// ---------------------------------------------------------------------
// Controlled forms
// ---------------------------------------------------------------------

pub fn cu1(control: QubitName, target: QubitName, lambda: f64) -> AstNode {
    if_(all(control)).then(u1(target, lambda))
}

pub fn cu2(control: QubitName, target: QubitName, phi: f64, lambda: f64) -> AstNode {
    if_(all(control)).then(u2(target, phi, lambda))
}

pub fn cu3(control: QubitName, target: QubitName, theta: f64, phi: f64, lambda: f64) -> AstNode {
    if_(all(control)).then(u3(target, theta, phi, lambda))
}

pub fn cx(control: QubitName, target: QubitName) -> AstNode {
    if_(all(control)).then(x(target))
}

pub use cx as cnot;

pub fn ccx(control1: QubitName, control2: QubitName, target: QubitName) -> AstNode {
    if_(all(vec![control1, control2])).then(x(target))
}

pub fn cz(control: QubitName, target: QubitName) -> AstNode {
    if_(all(control)).then(z(target))
}

pub fn ccz(control1: QubitName, control2: QubitName, target: QubitName) -> AstNode {
    program(vec![h(target), ccx(control1, control2, target), h(target)])
}

// ---------------------------------------------------------------------
// Rotations, phase shorthands
// ---------------------------------------------------------------------

pub fn phase(target: QubitName, lambda: f64) -> AstNode {
    u1(target, lambda)
}

pub fn id(target: QubitName) -> AstNode {
    u1(target, 0.0)
}

pub fn rx(target: QubitName, theta: f64) -> AstNode {
    u3(target, theta, -PI / 2.0, PI / 2.0)
}

pub fn crx(control: QubitName, target: QubitName, theta: f64) -> AstNode {
    if_(all(control)).then(rx(target, theta))
}

pub fn ry(target: QubitName, theta: f64) -> AstNode {
    u3(target, theta, 0.0, 0.0)
}

pub fn cry(control: QubitName, target: QubitName, theta: f64) -> AstNode {
    if_(all(control)).then(ry(target, theta))
}

/// `RZ(θ) = Phase(θ/2) . X . Phase(-θ/2) . X` — built from `U3`-backed
/// phase gates and `X`, not a sixth primitive.
pub fn rz(target: QubitName, theta: f64) -> AstNode {
    program(vec![phase(target, theta / 2.0), x(target), phase(target, -theta / 2.0), x(target)])
}

pub fn crz(control: QubitName, target: QubitName, theta: f64) -> AstNode {
    if_(all(control)).then(rz(target, theta))
}

pub fn s(target: QubitName) -> AstNode {
    phase(target, PI / 2.0)
}

pub fn sdg(target: QubitName) -> AstNode {
    phase(target, -PI / 2.0)
}

pub fn t(target: QubitName) -> AstNode {
    phase(target, PI / 4.0)
}

pub fn tdg(target: QubitName) -> AstNode {
    phase(target, -PI / 4.0)
}

pub fn swap(q1: QubitName, q2: QubitName) -> AstNode {
    program(vec![cx(q1, q2), cx(q2, q1), cx(q1, q2)])
}

// ---------------------------------------------------------------------
// Register arithmetic (supplemental helpers)
// ---------------------------------------------------------------------

/// Flips `qs` (big-endian, most significant qubit first) to the binary
/// representation of `value`, assuming every qubit starts at `|0>`.
pub fn set(qs: &[QubitName], value: u64) -> AstNode {
    if value == 0 || qs.is_empty() {
        return program(vec![]);
    }
    let (rest, last) = qs.split_at(qs.len() - 1);
    if value % 2 == 1 {
        let mut nodes = vec![x(last[0])];
        if let AstNode::Program(tail) = set(rest, value / 2) {
            nodes.extend(tail);
        }
        program(nodes)
    } else {
        set(rest, value / 2)
    }
}

/// Increments the big-endian binary counter held in `qs` by one, via a
/// ripple-carry chain of controlled flips.
pub fn inc(qs: &[QubitName]) -> AstNode {
    let mut nodes = Vec::new();
    for i in 0..qs.len().saturating_sub(1) {
        nodes.push(if_(all(qs[i + 1..].to_vec())).then(x(qs[i])));
    }
    if let Some(&last) = qs.last() {
        nodes.push(x(last));
    }
    program(nodes)
}

/// Decrements the big-endian binary counter held in `qs` by one: the
/// adjoint of [`inc`].
pub fn dec(qs: &[QubitName]) -> AstNode {
    inv(inc(qs))
}

/// Pairwise-swaps corresponding qubits of two equal-length registers.
pub fn swap_registers(qs1: &[QubitName], qs2: &[QubitName]) -> AstNode {
    let mut nodes = Vec::new();
    for (&q1, &q2) in qs1.iter().zip(qs2) {
        nodes.push(cx(q1, q2));
        nodes.push(cx(q2, q1));
        nodes.push(cx(q1, q2));
    }
    program(nodes)
}

/// Computes `qs1[i] == qs2[i]` for each pair into `qs2[i]` in place, via
/// the `X . CNOT . X` equality trick (equal bits leave `qs2` at `|0>`).
pub fn equal(qs1: &[QubitName], qs2: &[QubitName]) -> AstNode {
    let mut nodes = Vec::new();
    for (&q1, &q2) in qs1.iter().zip(qs2) {
        nodes.push(x(q1));
        nodes.push(cx(q1, q2));
        nodes.push(x(q1));
    }
    program(nodes)
}
