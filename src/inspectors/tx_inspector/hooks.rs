//! Lifecycle-event hooks
//!
//! Each hook runs synchronously on the host's execution thread and returns
//! before the EVM advances. Hooks never block and never allocate beyond the
//! event payload.
//!
//! Per-frame EVM failures are recorded on the frame; any `Err` returned here
//! is structural and must latch the tracer (see [`crate::tracer::Tracer`]).

use alloy::primitives::{Address, Bytes, Log, U256};
use revm::bytecode::opcode::{self, OpCode};
use tracing::trace;

use super::{StackStep, TxInspector};
use crate::arena::PushTraceKind;
use crate::errors::TraceError;
use crate::types::{
    CallKind, CallTrace, CallTraceStep, LogCallOrder, OpContext, RecordedMemory,
    StackSnapshotKind, StorageChange, StorageChangeReason,
};

impl TxInspector {
    /// Frame entry: classifies the opcode and opens a new trace, except for
    /// `SELFDESTRUCT`, which is folded into the currently open frame.
    pub fn on_enter(
        &mut self,
        depth: u32,
        op_byte: u8,
        from: Address,
        to: Address,
        input: Bytes,
        gas: u64,
        value: U256,
    ) -> Result<(), TraceError> {
        trace!(depth, op = op_byte, %from, %to, gas, "enter frame");

        // SELFDESTRUCT arrives as an enter in this host convention but never
        // opens a frame: record the refund target on the open frame.
        if op_byte == opcode::SELFDESTRUCT {
            let idx = self.last_trace_idx()?;
            let frame = &mut self.traces.node_mut(idx).trace;
            frame.selfdestruct_refund_target = Some(to);
            frame.selfdestruct_swept_value = Some(value);
            return Ok(());
        }

        let kind = CallKind::from_op(op_byte).ok_or(TraceError::UnknownCallType(op_byte))?;

        // Precompile classification only applies to call variants; creates
        // can never target a precompile address.
        let maybe_precompile = if kind.is_any_call() && self.config.exclude_precompile_calls {
            Some(self.is_precompile(&to))
        } else {
            None
        };

        self.start_trace_on_call(to, input, value, kind, depth, from, gas, maybe_precompile);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn start_trace_on_call(
        &mut self,
        address: Address,
        data: Bytes,
        value: U256,
        kind: CallKind,
        depth: u32,
        caller: Address,
        gas_limit: u64,
        maybe_precompile: Option<bool>,
    ) {
        let push_kind = if maybe_precompile == Some(true) {
            PushTraceKind::PushOnly
        } else {
            PushTraceKind::PushAndAttachToParent
        };

        let trace = CallTrace {
            depth,
            address,
            kind,
            data,
            value,
            caller,
            maybe_precompile,
            gas_limit,
            ..Default::default()
        };

        let parent = self.trace_stack.last().copied();
        let idx = self.traces.push_trace(parent, push_kind, trace);
        self.trace_stack.push(idx);
    }

    /// Frame exit: closes the innermost frame and records its outcome. After
    /// this the frame is immutable.
    pub fn on_exit(
        &mut self,
        depth: u32,
        output: Bytes,
        gas_used: u64,
        err: Option<&str>,
        reverted: bool,
    ) -> Result<(), TraceError> {
        trace!(depth, gas_used, reverted, ?err, "exit frame");

        let idx = self.pop_trace_idx()?;
        let frame = &mut self.traces.node_mut(idx).trace;
        frame.gas_used = gas_used;
        frame.reverted = reverted;
        frame.success = !reverted && err.is_none();
        frame.error = if reverted {
            Some(TraceError::Reverted)
        } else if err.is_some() {
            Some(TraceError::InstructionFailed)
        } else {
            None
        };
        frame.output = output.clone();

        if self.config.record_call_return_data {
            self.last_call_return_data = Some(output);
        }
        Ok(())
    }

    /// Per-opcode step. A no-op unless step recording is enabled.
    #[allow(clippy::too_many_arguments)]
    pub fn on_opcode(
        &mut self,
        pc: u64,
        op: u8,
        gas: u64,
        cost: u64,
        scope: &dyn OpContext,
        _return_data: &[u8],
        depth: u32,
        _err: Option<&str>,
    ) -> Result<(), TraceError> {
        if !self.config.record_steps {
            return Ok(());
        }

        let trace_idx = self.last_trace_idx()?;
        let step_idx = self.traces.node(trace_idx).trace.steps.len();
        self.step_stack.push(StackStep { trace_idx, step_idx });

        let memory = if self.config.record_memory_snapshots {
            RecordedMemory::new(Bytes::copy_from_slice(scope.memory_data()))
        } else {
            RecordedMemory::default()
        };

        let stack = match self.config.record_stack_snapshots {
            StackSnapshotKind::Full => Some(scope.stack_data().to_vec()),
            // Pushed-value capture needs a step-end signal the host interface
            // does not deliver; see `CallTraceStep::push_stack`.
            StackSnapshotKind::Pushes | StackSnapshotKind::None => None,
        };

        let storage_change = if self.config.record_state_diff {
            storage_access(op, scope.stack_data())
        } else {
            None
        };

        let node = self.traces.node_mut(trace_idx);
        let memory_size = memory.len();
        node.trace.steps.push(CallTraceStep {
            depth,
            pc,
            op: OpCode::new(op).unwrap_or(OpCode::INVALID),
            contract: scope.contract_address(),
            stack,
            push_stack: None,
            memory,
            memory_size,
            gas_remaining: gas,
            gas_refund_counter: 0,
            gas_cost: cost,
            storage_change,
        });
        Ok(())
    }

    /// Log emission: recorded against the innermost open frame, interleaved
    /// with its subcalls in `ordering`.
    pub fn on_log(&mut self, log: &Log) -> Result<(), TraceError> {
        if !self.config.record_logs {
            return Ok(());
        }

        let idx = self.last_trace_idx()?;
        let node = self.traces.node_mut(idx);
        trace!(address = %log.address, topics = log.data.topics().len(), "log");
        node.ordering.push(LogCallOrder::Log(node.logs.len()));
        node.logs.push(log.data.clone());
        Ok(())
    }
}

/// Reads the slot access of an SLOAD/SSTORE step from the scope stack.
///
/// The step fires before the instruction executes: an SLOAD has only its key
/// on the stack (the loaded value does not exist yet), and the slot's
/// previous value is invisible to a pure observer either way.
fn storage_access(op: u8, stack: &[U256]) -> Option<StorageChange> {
    match op {
        opcode::SLOAD => {
            let key = *stack.last()?;
            Some(StorageChange {
                key,
                value: None,
                had_value: None,
                reason: StorageChangeReason::SLoad,
            })
        }
        opcode::SSTORE => {
            let key = *stack.last()?;
            let value = *stack.get(stack.len().checked_sub(2)?)?;
            Some(StorageChange {
                key,
                value: Some(value),
                had_value: None,
                reason: StorageChangeReason::SStore,
            })
        }
        _ => None,
    }
}
