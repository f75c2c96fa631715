//! The lowering pass: AST to flat Command IR.
//!
//! The walk threads two pieces of state through recursion: the control
//! context (by value — sibling branches never see each other's mutations)
//! and, via `&mut`, the shared [`ResourceAllocator`] and name [`Resolver`]
//! (the analysis table that replaces writing resolved qubit IDs back onto
//! AST nodes).

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use quasar_ir::ast::{AstNode, CbitName, QubitName};
use quasar_ir::command::{Command, GateCommand};
use quasar_ir::{invert_gate, BuiltinGate, CbitId, IrError, QubitId};

use crate::allocator::ResourceAllocator;
use crate::error::{CompileError, CompileResult};

/// `QubitID -> {0, 1}`: the qubits a gate or body is currently controlled
/// on, and the polarity each must hold. Threaded by value through the walk.
pub type ControlContext = FxHashMap<QubitId, u8>;

/// The per-compile-invocation name resolution table. Maps builder-assigned
/// AST names to the register slots the allocator hands out during lowering.
/// Never written onto an `AstNode` — that mutation-in-place is exactly the
/// anti-pattern the source exhibited.
#[derive(Debug, Default)]
struct Resolver {
    qubits: FxHashMap<QubitName, QubitId>,
    cbits: FxHashMap<CbitName, CbitId>,
}

impl Resolver {
    fn declare_qubit(&mut self, name: QubitName, id: QubitId) {
        self.qubits.insert(name, id);
    }

    fn declare_cbit(&mut self, name: CbitName, id: CbitId) {
        self.cbits.insert(name, id);
    }

    fn resolve_qubit(&self, name: QubitName) -> CompileResult<QubitId> {
        self.qubits.get(&name).copied().ok_or(CompileError::UndeclaredQubit(name))
    }

    fn resolve_cbit(&self, name: CbitName) -> CompileResult<CbitId> {
        self.cbits.get(&name).copied().ok_or(CompileError::UndeclaredCbit(name))
    }
}

/// The result of a successful compile: the flat command stream plus the
/// register sizes the emitter must declare.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub commands: Vec<Command>,
    pub num_qubits: u32,
    pub num_cbits: u32,
}

/// Lowers a whole program to a flat command list. Owns a fresh allocator and
/// resolver for this invocation only.
#[instrument(skip_all)]
pub fn compile(ast: &AstNode) -> CompileResult<CompiledProgram> {
    let mut rsrc = ResourceAllocator::new();
    let mut resolver = Resolver::default();
    let commands = walk(ast, &mut rsrc, &mut resolver, &ControlContext::default())?;
    let program = CompiledProgram {
        commands,
        num_qubits: rsrc.high_water_qubit(),
        num_cbits: rsrc.bits_allocated(),
    };
    debug!(
        commands = program.commands.len(),
        qubits = program.num_qubits,
        cbits = program.num_cbits,
        "compiled program"
    );
    Ok(program)
}

/// Reverses a command list and inverts every `Gate` within it. `Measure`/
/// `Reset` cannot appear — that is a compile-time error, not a silent skip.
fn inverse_commands(commands: &[Command]) -> CompileResult<Vec<Command>> {
    commands
        .iter()
        .rev()
        .map(|cmd| match cmd {
            Command::Gate(g) => {
                let (gate, params) = invert_gate(g.gate, &g.params)?;
                Ok(Command::Gate(GateCommand::new(gate, g.target, g.controls.clone(), params)))
            }
            Command::Measure { .. } | Command::Reset { .. } => Err(CompileError::InvertNonUnitary),
        })
        .collect()
}

fn invert_polarities(ctx: &ControlContext) -> ControlContext {
    ctx.iter().map(|(&id, &bit)| (id, 1 - bit)).collect()
}

fn merge_contexts(parent: &ControlContext, child: &ControlContext) -> ControlContext {
    let mut merged = parent.clone();
    merged.extend(child.iter().map(|(&k, &v)| (k, v)));
    merged
}

/// Reduces `ctx` to at most `max_surviving` positive controls using a
/// logarithmic-depth Toffoli (CCX) tree over fresh ancillas. Any
/// negative-polarity entry in `ctx` is absorbed with a leading X. Returns
/// the reduced all-positive context and the commands that compute it; the
/// caller is responsible for uncomputing (via [`inverse_commands`]) and for
/// releasing the ancillas once the enclosing scope exits.
fn synthesise_and(ctx: &ControlContext, rsrc: &mut ResourceAllocator, max_surviving: usize) -> (ControlContext, Vec<Command>) {
    let mut commands = Vec::new();
    let mut work: Vec<QubitId> = ctx.keys().copied().collect();
    work.sort();

    for &id in &work {
        if ctx[&id] == 0 {
            commands.push(Command::Gate(GateCommand::uncontrolled(BuiltinGate::X, id, vec![])));
        }
    }

    while work.len() > max_surviving {
        // `work` stays sorted ascending: ancillas are allocated in strictly
        // increasing order, so appending one to the end never violates it.
        let q1 = work.remove(0);
        let q2 = work.remove(0);
        let q3 = rsrc.allocate_qubit();
        let mut controls = BTreeSet::new();
        controls.insert(q1);
        controls.insert(q2);
        commands.push(Command::Gate(GateCommand::new(BuiltinGate::X, q3, controls, vec![])));
        work.push(q3);
    }

    let result_ctx = work.into_iter().map(|id| (id, 1u8)).collect();
    (result_ctx, commands)
}

/// Evaluates a condition expression (`Qubit`, `Match`, or `Not`) into a
/// fresh control context and the commands needed to compute it. Always
/// evaluated independent of any enclosing context — conditions start from
/// nothing every time.
fn eval_condition(node: &AstNode, rsrc: &mut ResourceAllocator, resolver: &Resolver) -> CompileResult<(ControlContext, Vec<Command>)> {
    match node {
        AstNode::Qubit(name) => {
            let id = resolver.resolve_qubit(*name)?;
            let mut ctx = ControlContext::default();
            ctx.insert(id, 1);
            Ok((ctx, Vec::new()))
        }
        AstNode::Match { controls, mask } => {
            if controls.len() != mask.len() {
                return Err(IrError::MaskArityMismatch { controls: controls.len(), mask: mask.len() }.into());
            }
            let mut ctx = ControlContext::default();
            for (&qname, &bit) in controls.iter().zip(mask.iter()) {
                if bit > 1 {
                    return Err(IrError::InvalidMaskBit(bit).into());
                }
                let id = resolver.resolve_qubit(qname)?;
                ctx.insert(id, bit);
            }
            Ok((ctx, Vec::new()))
        }
        AstNode::Not(inner) => {
            let (sub_ctx, sub_commands) = eval_condition(inner, rsrc, resolver)?;
            if sub_ctx.len() <= 1 {
                Ok((invert_polarities(&sub_ctx), sub_commands))
            } else {
                let (reduced_ctx, mut reduce_commands) = synthesise_and(&sub_ctx, rsrc, 1);
                let mut commands = sub_commands;
                commands.append(&mut reduce_commands);
                // The aggregate is negative-polarity: `Not` means "the AND
                // did not hold".
                let ctx = invert_polarities(&reduced_ctx);
                Ok((ctx, commands))
            }
        }
        _ => Err(CompileError::NotACondition),
    }
}

/// Applies a primitive gate under the given control context, synthesising
/// the necessary Toffoli tree and X-flip sandwiches.
fn lower_gate(gate: BuiltinGate, target: QubitId, params: Vec<f64>, rsrc: &mut ResourceAllocator, ctx: &ControlContext) -> CompileResult<Vec<Command>> {
    if ctx.is_empty() {
        return Ok(vec![Command::Gate(GateCommand::uncontrolled(gate, target, params))]);
    }

    let snapshot = rsrc.snapshot();

    let mut negative_ids: Vec<QubitId> = ctx.iter().filter(|&(_, &bit)| bit == 0).map(|(&id, _)| id).collect();
    negative_ids.sort();
    let negate_commands: Vec<Command> = negative_ids
        .iter()
        .map(|&id| Command::Gate(GateCommand::uncontrolled(BuiltinGate::X, id, vec![])))
        .collect();

    let all_positive: ControlContext = ctx.keys().map(|&id| (id, 1u8)).collect();
    let max_controls_supported_natively = if gate == BuiltinGate::X { 2 } else { 1 };
    let (reduced_ctx, reduce_commands) = synthesise_and(&all_positive, rsrc, max_controls_supported_natively);

    let controls: BTreeSet<QubitId> = reduced_ctx.keys().copied().collect();
    let controlled_command = Command::Gate(GateCommand::new(gate, target, controls, params));

    let mut inner = reduce_commands.clone();
    inner.push(controlled_command);
    inner.extend(inverse_commands(&reduce_commands)?);

    rsrc.restore(snapshot)?;

    let mut result = negate_commands.clone();
    result.extend(inner);
    result.extend(inverse_commands(&negate_commands)?);
    Ok(result)
}

/// Lowers a statement-position AST node (everything except the
/// condition-only `Qubit`/`Match`/`Not` variants, handled by
/// [`eval_condition`]) to a flat command list, under `ctx`.
fn walk(node: &AstNode, rsrc: &mut ResourceAllocator, resolver: &mut Resolver, ctx: &ControlContext) -> CompileResult<Vec<Command>> {
    match node {
        AstNode::Program(nodes) => {
            let mut commands = Vec::new();
            for child in nodes {
                commands.extend(walk(child, rsrc, resolver, ctx)?);
            }
            Ok(commands)
        }

        AstNode::QubitDecl { name, .. } => {
            let id = rsrc.allocate_qubit();
            resolver.declare_qubit(*name, id);
            Ok(Vec::new())
        }

        AstNode::CBit(name) => {
            let id = rsrc.allocate_bit();
            resolver.declare_cbit(*name, id);
            Ok(Vec::new())
        }

        AstNode::Gate { gate, target, params } => {
            if params.len() != gate.param_count() {
                return Err(IrError::ParamArityMismatch { gate: *gate, expected: gate.param_count(), got: params.len() }.into());
            }
            let target_id = resolver.resolve_qubit(*target)?;
            lower_gate(*gate, target_id, params.clone(), rsrc, ctx)
        }

        AstNode::Measurement { qubit, cbit } => {
            if !ctx.is_empty() {
                return Err(CompileError::ControlledNonUnitary);
            }
            let qubit_id = resolver.resolve_qubit(*qubit)?;
            let cbit_id = resolver.resolve_cbit(*cbit)?;
            Ok(vec![Command::Measure { qubit: qubit_id, cbit: cbit_id }])
        }

        AstNode::Reset(qubit) => {
            if !ctx.is_empty() {
                return Err(CompileError::ControlledNonUnitary);
            }
            let qubit_id = resolver.resolve_qubit(*qubit)?;
            Ok(vec![Command::Reset { qubit: qubit_id }])
        }

        AstNode::Inv(body) => {
            let commands = walk(body, rsrc, resolver, ctx)?;
            inverse_commands(&commands)
        }

        AstNode::IfThen { cond, body } => {
            let snapshot = rsrc.snapshot();
            let (cond_ctx, cond_commands) = eval_condition(cond, rsrc, resolver)?;
            let merged = merge_contexts(ctx, &cond_ctx);
            let body_commands = walk(body, rsrc, resolver, &merged)?;

            let mut result = cond_commands.clone();
            result.extend(body_commands);
            result.extend(inverse_commands(&cond_commands)?);

            rsrc.restore(snapshot)?;
            Ok(result)
        }

        AstNode::IfThenElse { cond, then_body, else_body } => {
            let snapshot = rsrc.snapshot();
            let (cond_ctx, mut cond_commands) = eval_condition(cond, rsrc, resolver)?;
            let (reduced_ctx, reduce_commands) = synthesise_and(&cond_ctx, rsrc, 1);
            cond_commands.extend(reduce_commands);

            let result = if reduced_ctx.is_empty() {
                // Unconditional: `If(All([])).Then(t).Else(e)` — the else
                // branch is unreachable.
                let then_commands = walk(then_body, rsrc, resolver, ctx)?;
                let mut out = cond_commands.clone();
                out.extend(then_commands);
                out.extend(inverse_commands(&cond_commands)?);
                out
            } else {
                debug_assert_eq!(reduced_ctx.len(), 1);
                let merged_then = merge_contexts(ctx, &reduced_ctx);
                let then_commands = walk(then_body, rsrc, resolver, &merged_then)?;

                let merged_else = merge_contexts(ctx, &invert_polarities(&reduced_ctx));
                let else_commands = walk(else_body, rsrc, resolver, &merged_else)?;

                let mut out = cond_commands.clone();
                out.extend(then_commands);
                out.extend(else_commands);
                out.extend(inverse_commands(&cond_commands)?);
                out
            };

            rsrc.restore(snapshot)?;
            Ok(result)
        }

        AstNode::IfFlip { cond } => {
            let snapshot = rsrc.snapshot();
            let (cond_ctx, mut cond_commands) = eval_condition(cond, rsrc, resolver)?;
            let (reduced_ctx, reduce_commands) = synthesise_and(&cond_ctx, rsrc, 2);
            cond_commands.extend(reduce_commands);

            // Force every surviving control fully positive before the Z.
            let mut control_ids: Vec<QubitId> = reduced_ctx.keys().copied().collect();
            control_ids.sort();
            for &id in &control_ids {
                if reduced_ctx[&id] == 0 {
                    cond_commands.push(Command::Gate(GateCommand::uncontrolled(BuiltinGate::X, id, vec![])));
                }
            }

            let target = *control_ids.last().ok_or(CompileError::EmptyFlipCondition)?;
            let controls: BTreeSet<QubitId> = control_ids[..control_ids.len() - 1].iter().copied().collect();
            let flip_command = Command::Gate(GateCommand::new(BuiltinGate::Z, target, controls, vec![]));

            let mut result = cond_commands.clone();
            result.push(flip_command);
            result.extend(inverse_commands(&cond_commands)?);

            rsrc.restore(snapshot)?;
            Ok(result)
        }

        AstNode::Qubit(_) | AstNode::Match { .. } | AstNode::Not(_) => Err(CompileError::NotAStatement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quasar_ir::ast::Program;

    #[test]
    fn single_hadamard() {
        let mut prog = Program::new();
        let q0 = prog.qubit(false);
        prog.append(AstNode::Gate { gate: BuiltinGate::H, target: q0, params: vec![] });
        let compiled = compile(&prog.into_ast()).unwrap();
        assert_eq!(compiled.num_qubits, 1);
        assert_eq!(compiled.commands.len(), 1);
        assert!(matches!(&compiled.commands[0], Command::Gate(g) if g.gate == BuiltinGate::H));
    }

    #[test]
    fn measurement_under_control_is_rejected() {
        let mut prog = Program::new();
        let q0 = prog.qubit(false);
        let q1 = prog.qubit(false);
        let c0 = prog.cbit();
        let cond = AstNode::Match { controls: vec![q0], mask: vec![1] };
        let body = AstNode::Measurement { qubit: q1, cbit: c0 };
        prog.append(AstNode::IfThen { cond: Box::new(cond), body: Box::new(body) });
        let err = compile(&prog.into_ast()).unwrap_err();
        assert!(matches!(err, CompileError::ControlledNonUnitary));
    }

    #[test]
    fn toffoli_tree_over_four_controls() {
        let mut prog = Program::new();
        let controls = prog.qubits(&[true, true, true, true]);
        let target = prog.qubit(false);
        let cond = AstNode::Match { controls: controls.clone(), mask: vec![1, 1, 1, 1] };
        prog.append(AstNode::IfThen {
            cond: Box::new(cond),
            body: Box::new(AstNode::Gate { gate: BuiltinGate::X, target, params: vec![] }),
        });
        let compiled = compile(&prog.into_ast()).unwrap();
        assert!(compiled.num_qubits > 6, "expects ancillas beyond the 5 declared qubits");
        let ccx_count = compiled
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Gate(g) if g.gate == BuiltinGate::X && g.controls.len() == 2))
            .count();
        assert!(ccx_count >= 2, "expects at least the forward Toffoli tree (reverse doubles it)");
    }

    #[test]
    fn inv_of_inv_round_trips() {
        let mut prog_a = Program::new();
        let q0 = prog_a.qubit(false);
        prog_a.append(AstNode::Gate { gate: BuiltinGate::U3, target: q0, params: vec![0.1, 0.2, 0.3] });
        let direct = compile(&prog_a.into_ast()).unwrap();

        let mut prog_b = Program::new();
        let q0b = prog_b.qubit(false);
        let body = AstNode::Gate { gate: BuiltinGate::U3, target: q0b, params: vec![0.1, 0.2, 0.3] };
        prog_b.append(AstNode::Inv(Box::new(AstNode::Inv(Box::new(body)))));
        let via_double_inv = compile(&prog_b.into_ast()).unwrap();

        assert_eq!(direct.commands, via_double_inv.commands);
    }
}
