//! The transaction-scoped trace recorder
//!
//! One [`TxInspector`] observes exactly one transaction: the host creates it
//! at tx-start, feeds it lifecycle events while the EVM runs, and consumes it
//! through [`TxInspector::into_trace_results`] once the receipt is known.
//!
//! The implementation is split across:
//! - `hooks`: the event-stream state machine (enter/exit/opcode/log)
//! - `project`: the fold from the recorded arena into Parity-shaped output

use std::collections::HashSet;

use alloy::primitives::{Address, Bytes};
use revm::primitives::hardfork::SpecId;

use crate::arena::CallTraceArena;
use crate::chain::{ChainConfig, VMContext};
use crate::errors::TraceError;
use crate::types::{CallTraceNode, TracingInspectorConfig, TransactionInfo};

mod hooks;
mod project;

/// Pairing of a recorded step with its owning trace, kept for hosts that
/// deliver a step-end signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackStep {
    pub trace_idx: usize,
    pub step_idx: usize,
}

/// Stateful recorder for a single transaction's call-trace tree.
///
/// The arena is exclusively owned here while recording; projection is a
/// read-only pass. The precompile set and fork id are captured once at
/// construction and never change.
#[derive(Debug, Clone)]
pub struct TxInspector {
    pub(crate) config: TracingInspectorConfig,
    pub(crate) traces: CallTraceArena,
    /// Indices of the currently open frames, innermost last.
    pub(crate) trace_stack: Vec<usize>,
    pub(crate) step_stack: Vec<StackStep>,
    pub(crate) last_call_return_data: Option<Bytes>,
    spec_id: SpecId,
    pub(crate) active_precompiles: HashSet<Address>,
    pub(crate) env: VMContext,
    pub(crate) tx: TransactionInfo,
    /// Transaction origin (the signer).
    from: Address,
}

impl TxInspector {
    /// Creates a recorder for one transaction, resolving the active
    /// precompile set and fork id from the chain configuration.
    pub fn new(
        config: TracingInspectorConfig,
        chain: &ChainConfig,
        env: VMContext,
        tx: TransactionInfo,
        from: Address,
    ) -> Self {
        let rules = chain.rules(env.block_number, env.random.is_some(), env.time, env.arbos_version);
        let active_precompiles = ChainConfig::active_precompiles(rules).iter().copied().collect();
        let spec_id = chain.latest_fork(env.time, env.arbos_version);

        Self {
            config,
            traces: CallTraceArena::new(),
            trace_stack: Vec::new(),
            step_stack: Vec::new(),
            last_call_return_data: None,
            spec_id,
            active_precompiles,
            env,
            tx,
            from,
        }
    }

    /// Whether execution is currently inside at least one frame.
    pub fn is_deep(&self) -> bool {
        !self.trace_stack.is_empty()
    }

    pub fn is_precompile(&self, address: &Address) -> bool {
        self.active_precompiles.contains(address)
    }

    /// The innermost open frame, if any.
    pub fn active_trace(&self) -> Option<&CallTraceNode> {
        self.trace_stack.last().map(|&idx| self.traces.node(idx))
    }

    /// Index of the innermost open frame. An event arriving while no frame
    /// is open is a structural violation.
    pub(crate) fn last_trace_idx(&self) -> Result<usize, TraceError> {
        self.trace_stack
            .last()
            .copied()
            .ok_or(TraceError::UnbalancedExit)
    }

    pub(crate) fn pop_trace_idx(&mut self) -> Result<usize, TraceError> {
        self.trace_stack.pop().ok_or(TraceError::UnbalancedExit)
    }

    pub fn traces(&self) -> &CallTraceArena {
        &self.traces
    }

    pub fn config(&self) -> &TracingInspectorConfig {
        &self.config
    }

    /// Fork id the trace was recorded under.
    pub fn spec_id(&self) -> SpecId {
        self.spec_id
    }

    /// Return data of the most recently closed frame, when configured.
    pub fn last_call_return_data(&self) -> Option<&Bytes> {
        self.last_call_return_data.as_ref()
    }

    /// The transaction origin supplied at tx-start.
    pub fn origin(&self) -> Address {
        self.from
    }
}
