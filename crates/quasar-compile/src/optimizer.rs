//! The peephole optimiser: per-qubit-stack adjacent-inverse cancellation.
//!
//! One stack per qubit holds every command touching it, latest on top. A
//! new `Gate` command cancels only if *every* qubit it touches has the
//! exact inverse command sitting on top of its stack; otherwise the command
//! is pushed onto all of them. `Measure`/`Reset` always push — they are not
//! unitary and never cancel.

use rustc_hash::FxHashMap;

use quasar_ir::command::{Command, GateCommand};
use quasar_ir::invert_gate;

/// Controls whether the adjacent-inverse check on `U3` parameters is exact
/// (`f64` equality, the default — required for the bit-exact reference
/// scenarios) or approximate (within `1e-9`, addressing the source's
/// acknowledged-but-unfixed `TODO(adsz): Allow approx.` on floating-point
/// drift). Exact is the default so byte-identical emission is opt-out, not
/// opt-in.
#[derive(Debug, Clone, Copy)]
pub struct OptimizeOptions {
    pub approx_params: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self { approx_params: false }
    }
}

const PARAM_TOLERANCE: f64 = 1e-9;

fn params_match(options: OptimizeOptions, a: &[f64], b: &[f64]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if options.approx_params {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < PARAM_TOLERANCE)
    } else {
        a == b
    }
}

/// Runs the adjacent-inverse cancellation pass to a fixpoint of one full
/// left-to-right sweep (a single sweep is sufficient — see the module docs
/// on the stack-top cancellation window — repeating it does not change the
/// result, which is exactly the idempotence property under test).
pub fn optimize(commands: &[Command], num_qubits: u32, options: OptimizeOptions) -> Vec<Command> {
    let mut stacks: Vec<Vec<(usize, Command)>> = vec![Vec::new(); num_qubits as usize];

    for (index, command) in commands.iter().enumerate() {
        match command {
            Command::Gate(gate) => insert_gate(&mut stacks, index, gate, options),
            Command::Measure { qubit, .. } => stacks[qubit.0 as usize].push((index, command.clone())),
            Command::Reset { qubit } => stacks[qubit.0 as usize].push((index, command.clone())),
        }
    }

    serialize(stacks)
}

fn insert_gate(stacks: &mut [Vec<(usize, Command)>], index: usize, gate: &GateCommand, options: OptimizeOptions) {
    let affected = gate.support();
    let Ok((inverse_gate, inverse_params)) = invert_gate(gate.gate, &gate.params) else {
        // A gate arithmetic has no inverse for (shouldn't occur for the
        // closed primitive catalog) is treated like any non-cancellable
        // gate: just push it.
        for &qubit in &affected {
            stacks[qubit.0 as usize].push((index, Command::Gate(gate.clone())));
        }
        return;
    };

    let cancellable = affected.iter().all(|&qubit| {
        stacks[qubit.0 as usize]
            .last()
            .is_some_and(|(_, top)| match top {
                Command::Gate(top_gate) => {
                    top_gate.controls == gate.controls
                        && top_gate.target == gate.target
                        && top_gate.gate == inverse_gate
                        && params_match(options, &top_gate.params, &inverse_params)
                }
                _ => false,
            })
    });

    if cancellable {
        for &qubit in &affected {
            stacks[qubit.0 as usize].pop();
        }
    } else {
        for &qubit in &affected {
            stacks[qubit.0 as usize].push((index, Command::Gate(gate.clone())));
        }
    }
}

/// Flattens all per-qubit stacks, deduplicates by original index (a command
/// touching N qubits is pushed identically onto N stacks, sharing one
/// index), and emits in ascending index order.
fn serialize(stacks: Vec<Vec<(usize, Command)>>) -> Vec<Command> {
    let mut unique: FxHashMap<usize, Command> = FxHashMap::default();
    for stack in stacks {
        for (index, command) in stack {
            unique.insert(index, command);
        }
    }
    let mut entries: Vec<(usize, Command)> = unique.into_iter().collect();
    entries.sort_by_key(|(index, _)| *index);
    entries.into_iter().map(|(_, command)| command).collect()
}
