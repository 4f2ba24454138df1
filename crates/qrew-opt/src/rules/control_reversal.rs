//! Control-direction reversal.

use qrew_ir::{CircuitGraph, GateNode, GuardRelation, IrError, NodeIndex, StandardGate, WireId, WirePath};

use crate::error::{OptError, OptResult};
use crate::rule::Rule;

use super::{gate_window, is_plain};

/// Rewrites `(H⊗H)·CX(c→t)·(H⊗H)` into `CX(t→c)`.
///
/// Matched on the target wire `t` as the window `h t; CX; h t`. The CX is
/// either `cx c, t` or `ctrl @ x c, t`, and on wire `c` it must sit directly
/// between two unguarded `h c`. The CX keeps its surface form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlReversal;

impl ControlReversal {
    /// Window depth.
    pub const DEPTH: usize = 3;

    const NAME: &'static str = "control-reversal";
}

/// The control wire of a CX acting on `target`.
fn control_of(gate: &GateNode, target: WireId) -> Option<WireId> {
    match gate.gate.as_standard()? {
        StandardGate::CX => match gate.targets() {
            [control, t] if gate.is_unguarded() && *t == target && *control != target => {
                Some(*control)
            }
            _ => None,
        },
        StandardGate::X => match gate.guards() {
            [guard] if !guard.negated && guard.wire != target && gate.targets() == [target] => {
                Some(guard.wire)
            }
            _ => None,
        },
        _ => None,
    }
}

/// The Hadamards directly around `cx` on `control`, if both are there.
fn control_hadamards(
    graph: &CircuitGraph,
    cx: NodeIndex,
    control: WireId,
) -> OptResult<Option<(NodeIndex, NodeIndex)>> {
    let before = graph.prev_on(cx, control)?;
    let after = graph.next_on(cx, control)?;
    let plain_h = |node| {
        graph
            .gate(node)
            .is_some_and(|g| is_plain(g, &StandardGate::H, control))
    };
    Ok((plain_h(before) && plain_h(after)).then_some((before, after)))
}

impl Rule for ControlReversal {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_applicable(&self, graph: &CircuitGraph, path: &WirePath) -> OptResult<bool> {
        let Some(window) = gate_window(graph, path, Self::DEPTH) else {
            return Ok(false);
        };
        let [(_, open), (cx, gate), (_, close)] = window.as_slice() else {
            return Ok(false);
        };
        let target = path.wire();
        if !is_plain(open, &StandardGate::H, target) || !is_plain(close, &StandardGate::H, target) {
            return Ok(false);
        }
        let Some(control) = control_of(gate, target) else {
            return Ok(false);
        };
        Ok(control_hadamards(graph, *cx, control)?.is_some())
    }

    fn apply(&self, graph: &mut CircuitGraph, path: &WirePath) -> OptResult<()> {
        let [open, cx, close] = path.window() else {
            return Err(OptError::invariant(Self::NAME, "window is not three nodes"));
        };
        let target = path.wire();
        let gate = graph.gate(*cx).ok_or(IrError::InvalidNode)?;
        let control = control_of(gate, target)
            .ok_or_else(|| OptError::invariant(Self::NAME, "middle node is not a CX"))?;
        let (targets, guards) = if gate.is_unguarded() {
            (vec![target, control], vec![])
        } else {
            (
                vec![control],
                vec![GuardRelation {
                    wire: target,
                    negated: false,
                }],
            )
        };
        let (before, after) = control_hadamards(graph, *cx, control)?
            .ok_or_else(|| OptError::invariant(Self::NAME, "control wire lost its Hadamards"))?;

        for node in [*open, *close, before, after] {
            graph.remove(node)?;
        }
        graph.retarget(*cx, targets, guards)?;
        Ok(())
    }
}
