//! Projection of the recorded arena into Parity-shaped output
//!
//! A read-only fold over the arena in index order (which is pre-order with
//! respect to the execution tree): skipped precompile nodes are elided,
//! trace addresses are computed against the attached-children lists, and
//! `msg.sender` is resolved against the already-projected prefix so that
//! delegate frames inherit correctly.

use alloy::primitives::{Address, Log, U256};

use super::TxInspector;
use crate::errors::TraceError;
use crate::trace::types::{
    Action, CallAction, CallOutput, CreateAction, CreateOutput, SelfdestructAction, TraceOutput,
    TransactionTrace, TransactionTraceWithLogs, TxTrace,
};
use crate::types::{CallKind, CallTraceNode, ReceiptInfo};

impl TxInspector {
    /// Computes the Parity `traceAddress` of a node: sibling ordinals within
    /// the attached children of each ancestor, root to node. Detached
    /// precompile nodes get an empty path (projection elides them anyway).
    pub fn trace_address(&self, idx: usize) -> Vec<u64> {
        if idx == 0 {
            return Vec::new();
        }
        let nodes = self.traces.nodes();
        if nodes[idx].is_precompile() {
            return Vec::new();
        }

        let mut graph = Vec::new();
        let mut node = &nodes[idx];
        while let Some(parent_idx) = node.parent {
            let parent = &nodes[parent_idx];
            match parent.children.iter().position(|&child| child == node.idx) {
                Some(local_idx) => graph.push(local_idx as u64),
                None => {
                    // Attached nodes are always registered with their parent.
                    debug_assert!(false, "attached node missing from parent children");
                    break;
                }
            }
            node = parent;
        }
        graph.reverse();
        graph
    }

    /// Folds the arena into the Parity trace vector.
    ///
    /// Frames with a `SELFDESTRUCT` additionally project a synthetic
    /// selfdestruct entry directly after their own, addressed as one more
    /// sibling below the frame.
    pub fn build_trace(&self) -> Result<Vec<TransactionTraceWithLogs>, TraceError> {
        if self.traces.is_empty() {
            return Err(TraceError::NoTraces);
        }

        let mut traces = Vec::with_capacity(self.traces.len());
        for node in self.traces.nodes() {
            if node.is_precompile() {
                continue;
            }

            let trace_address = self.trace_address(node.idx);
            let trace = build_tx_trace(node, trace_address.clone());
            let logs = node
                .logs
                .iter()
                .map(|data| Log {
                    address: node.trace.address,
                    data: data.clone(),
                })
                .collect();
            let msg_sender = find_msg_sender(&traces, &trace)?;

            traces.push(TransactionTraceWithLogs {
                trace,
                logs,
                msg_sender,
                trace_idx: node.idx as u64,
                decoded_data: None,
            });

            if node.is_selfdestruct() {
                let trace = selfdestruct_trace(node, trace_address);
                let msg_sender = find_msg_sender(&traces, &trace)?;
                traces.push(TransactionTraceWithLogs {
                    trace,
                    logs: Vec::new(),
                    msg_sender,
                    trace_idx: node.idx as u64,
                    decoded_data: None,
                });
            }
        }
        Ok(traces)
    }

    /// Consumes the recorder and produces the final [`TxTrace`].
    ///
    /// When the host never delivered a receipt, gas and success fall back to
    /// the root frame's recorded outcome.
    pub fn into_trace_results(self, receipt: Option<&ReceiptInfo>) -> Result<TxTrace, TraceError> {
        let trace = self.build_trace()?;

        let root = &self.traces.node(0).trace;
        let (gas_used, is_success) = match receipt {
            Some(receipt) => (receipt.gas_used, receipt.success),
            None => (root.gas_used, root.success),
        };

        Ok(TxTrace {
            block_number: self.env.block_number.saturating_to(),
            tx_hash: self.tx.hash,
            tx_index: self.tx.index,
            gas_used,
            effective_price: U256::ZERO,
            is_success,
            trace,
        })
    }
}

fn build_tx_trace(node: &CallTraceNode, trace_address: Vec<u64>) -> TransactionTrace {
    let action = parity_action(node);
    // Frames that failed without reverting have nothing meaningful to report
    // as a result; reverts keep their output.
    let result = if node.trace.is_error() && !node.trace.is_revert() {
        None
    } else {
        Some(parity_trace_output(node))
    };

    TransactionTrace {
        ty: action.action_type(),
        action,
        error: node.trace.as_error_msg(),
        result,
        subtraces: node.children.len() as u64,
        trace_address,
    }
}

fn parity_action(node: &CallTraceNode) -> Action {
    let trace = &node.trace;
    match trace.kind {
        CallKind::Call | CallKind::StaticCall | CallKind::CallCode | CallKind::DelegateCall => {
            Action::Call(CallAction {
                from: trace.caller,
                to: trace.address,
                value: trace.value,
                gas: trace.gas_limit,
                input: trace.data.clone(),
                call_type: trace.kind,
            })
        }
        CallKind::Create | CallKind::Create2 => Action::Create(CreateAction {
            from: trace.caller,
            value: trace.value,
            gas: trace.gas_limit,
            init: trace.data.clone(),
        }),
    }
}

fn parity_trace_output(node: &CallTraceNode) -> TraceOutput {
    let trace = &node.trace;
    if trace.kind.is_any_create() {
        TraceOutput::Create(CreateOutput {
            gas_used: trace.gas_used,
            code: trace.output.clone(),
            address: trace.address,
        })
    } else {
        TraceOutput::Call(CallOutput {
            gas_used: trace.gas_used,
            output: trace.output.clone(),
        })
    }
}

/// Synthesizes the follow-up selfdestruct entry of a destructing frame,
/// positioned as one more sibling below the frame itself.
fn selfdestruct_trace(node: &CallTraceNode, mut trace_address: Vec<u64>) -> TransactionTrace {
    trace_address.push(node.children.len() as u64);
    let action = Action::SelfDestruct(SelfdestructAction {
        address: node.trace.address,
        refund_address: node.trace.selfdestruct_refund_target.unwrap_or_default(),
        balance: node.trace.selfdestruct_swept_value.unwrap_or_default(),
    });
    TransactionTrace {
        ty: action.action_type(),
        action,
        error: None,
        result: None,
        subtraces: 0,
        trace_address,
    }
}

/// Resolves the effective `msg.sender` of a trace being appended after
/// `projected`.
///
/// Delegate frames (`DELEGATECALL`/`CALLCODE`) inherit the sender of the
/// nearest preceding non-delegate call or create; everything else is the
/// action's own from-address. A delegate frame with no eligible predecessor
/// is structurally impossible in a well-formed trace.
fn find_msg_sender(
    projected: &[TransactionTraceWithLogs],
    trace: &TransactionTrace,
) -> Result<Address, TraceError> {
    match &trace.action {
        Action::Call(call) if call.call_type.is_delegate() => projected
            .iter()
            .rev()
            .find(|prev| match &prev.trace.action {
                Action::Call(prev_call) => !prev_call.call_type.is_delegate(),
                Action::Create(_) => true,
                Action::SelfDestruct(_) | Action::Reward(_) => false,
            })
            .map(|prev| prev.msg_sender)
            .ok_or(TraceError::MissingDelegatePredecessor),
        action => Ok(action.from_addr()),
    }
}
