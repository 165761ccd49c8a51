//! Core types for call-frame recording
//!
//! This module defines the data model the inspector populates while a
//! transaction executes:
//! - Call kinds and their predicates
//! - Per-frame traces and arena nodes
//! - Per-opcode step records
//! - Recorder configuration
//!
//! Everything here is host-agnostic: the inspector consumes plain lifecycle
//! events and never touches EVM internals directly.

use alloy::primitives::{Address, Bytes, LogData, B256, U256};
use revm::bytecode::opcode::{self, OpCode};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TraceError;
use crate::utils::error_utils::decode_revert_reason;

/// The kind of a call frame, classified from the opcode byte that opened it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    /// Plain `CALL`
    #[default]
    #[serde(rename = "call")]
    Call,
    /// `STATICCALL` (no state mutation, no value)
    #[serde(rename = "static")]
    StaticCall,
    /// `CALLCODE` (legacy delegate variant)
    #[serde(rename = "callcode")]
    CallCode,
    /// `DELEGATECALL` (caller context preserved)
    #[serde(rename = "delegatecall")]
    DelegateCall,
    /// `CREATE`
    #[serde(rename = "create")]
    Create,
    /// `CREATE2`
    #[serde(rename = "create2")]
    Create2,
}

impl CallKind {
    /// Classifies a raw opcode byte. Returns `None` for anything outside the
    /// call/create set; callers decide whether that is fatal.
    pub const fn from_op(op: u8) -> Option<Self> {
        match op {
            opcode::CALL => Some(Self::Call),
            opcode::STATICCALL => Some(Self::StaticCall),
            opcode::CALLCODE => Some(Self::CallCode),
            opcode::DELEGATECALL => Some(Self::DelegateCall),
            opcode::CREATE => Some(Self::Create),
            opcode::CREATE2 => Some(Self::Create2),
            _ => None,
        }
    }

    /// True for every `CALL*` variant.
    pub const fn is_any_call(&self) -> bool {
        matches!(
            self,
            Self::Call | Self::StaticCall | Self::CallCode | Self::DelegateCall
        )
    }

    /// True for `CREATE` and `CREATE2`.
    pub const fn is_any_create(&self) -> bool {
        matches!(self, Self::Create | Self::Create2)
    }

    /// True for the variants that execute in the caller's context.
    pub const fn is_delegate(&self) -> bool {
        matches!(self, Self::DelegateCall | Self::CallCode)
    }

    /// True for `STATICCALL`.
    pub const fn is_static(&self) -> bool {
        matches!(self, Self::StaticCall)
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Call => "call",
            Self::StaticCall => "static",
            Self::CallCode => "callcode",
            Self::DelegateCall => "delegatecall",
            Self::Create => "create",
            Self::Create2 => "create2",
        };
        f.write_str(s)
    }
}

/// Record of a single call frame, immutable once its exit hook has run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CallTrace {
    /// EVM depth at which the frame was entered.
    pub depth: u32,
    /// Whether the frame completed without revert or EVM error.
    pub success: bool,
    /// Address that issued the call or create.
    pub caller: Address,
    /// Callee for `CALL*`; the created contract for `CREATE*`; the precompile
    /// address for precompile calls.
    pub address: Address,
    /// Precompile verdict at enter time. `None` means classification was not
    /// requested; `Some(true)` keeps the node detached from its parent.
    pub maybe_precompile: Option<bool>,
    /// Refund target observed when this frame issued `SELFDESTRUCT`.
    pub selfdestruct_refund_target: Option<Address>,
    /// Balance swept by the `SELFDESTRUCT`, as reported by the host.
    pub selfdestruct_swept_value: Option<U256>,
    pub kind: CallKind,
    /// Value transferred into the frame.
    pub value: U256,
    /// Input data for calls, init code for creates.
    pub data: Bytes,
    /// Return data (or revert payload) captured at exit.
    pub output: Bytes,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub reverted: bool,
    /// Frame-level failure, if any. Only `InstructionFailed` and `Reverted`
    /// appear here.
    pub error: Option<TraceError>,
    /// Per-opcode records; populated only when step recording is enabled.
    pub steps: Vec<CallTraceStep>,
}

impl CallTrace {
    /// Whether the frame ended in any failure state.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the frame reverted (as opposed to halting).
    pub fn is_revert(&self) -> bool {
        self.reverted
    }

    /// The stable error string for the Parity `error` field.
    pub fn as_error_msg(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Decodes the revert payload into a human-readable reason, if this frame
    /// reverted with an `Error(string)` or `Panic(uint256)` payload.
    pub fn revert_reason(&self) -> Option<String> {
        if !self.reverted {
            return None;
        }
        decode_revert_reason(&self.output)
    }
}

/// Interleaving record of one frame's logs and attached subcalls, in the
/// order they were observed at that frame's depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCallOrder {
    /// Index into the node's `logs`.
    Log(usize),
    /// Index into the node's attached `children`.
    Call(usize),
}

/// Arena cell owning one [`CallTrace`] plus its tree edges and log records.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CallTraceNode {
    /// Back-pointer to the parent node. Present even for detached precompile
    /// nodes; attachment is decided by the parent's `children` list.
    pub parent: Option<usize>,
    /// Attached children in enter order. Skipped precompile frames never
    /// appear here.
    pub children: Vec<usize>,
    /// Own arena index; always equals the node's position.
    pub idx: usize,
    pub trace: CallTrace,
    /// Raw log payloads emitted at this frame's depth.
    pub logs: Vec<LogData>,
    /// Temporal interleaving of `logs` and attached `children`.
    pub ordering: Vec<LogCallOrder>,
}

impl CallTraceNode {
    /// The address whose storage the frame executes against. Delegate frames
    /// run in the caller's context.
    pub fn execution_address(&self) -> Address {
        if self.trace.kind.is_delegate() {
            self.trace.caller
        } else {
            self.trace.address
        }
    }

    /// Whether this node was classified as a precompile call and detached.
    pub fn is_precompile(&self) -> bool {
        self.trace.maybe_precompile.unwrap_or(false)
    }

    /// Whether this frame issued a `SELFDESTRUCT`.
    pub fn is_selfdestruct(&self) -> bool {
        self.trace.selfdestruct_refund_target.is_some()
    }

    pub fn kind(&self) -> CallKind {
        self.trace.kind
    }
}

/// Snapshot of interpreter memory captured at a step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordedMemory(pub Bytes);

impl RecordedMemory {
    pub fn new(mem: Bytes) -> Self {
        Self(mem)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Memory rendered as 32-byte word hex chunks, the layout debuggers
    /// expect.
    pub fn memory_chunks(&self) -> Vec<String> {
        self.0
            .chunks(32)
            .map(alloy::primitives::hex::encode)
            .collect()
    }
}

/// Why a storage slot appears in a step record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageChangeReason {
    SLoad,
    SStore,
}

/// A storage access observed at a step.
///
/// The step hook fires before the instruction executes, so only what is on
/// the stack at that point is visible: `value` is the written value for
/// `SSTORE` and `None` for `SLOAD` (the loaded value does not exist yet), and
/// `had_value` is the slot's previous value, which a pure observer cannot see
/// at all. Both stay `None` unless the host supplies them out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageChange {
    pub key: U256,
    pub value: Option<U256>,
    pub had_value: Option<U256>,
    pub reason: StorageChangeReason,
}

/// One executed opcode, captured when step recording is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTraceStep {
    pub depth: u32,
    pub pc: u64,
    pub op: OpCode,
    /// Contract whose code is executing.
    pub contract: Address,
    /// Full stack snapshot, bottom to top. `None` unless full stack
    /// recording is enabled.
    pub stack: Option<Vec<U256>>,
    /// Values pushed by this step. Requires a step-end signal the host
    /// interface does not carry today; kept for hosts that add one.
    pub push_stack: Option<Vec<U256>>,
    pub memory: RecordedMemory,
    pub memory_size: usize,
    pub gas_remaining: u64,
    pub gas_refund_counter: u64,
    pub gas_cost: u64,
    pub storage_change: Option<StorageChange>,
}

/// How much of the interpreter stack to capture per step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StackSnapshotKind {
    #[default]
    None,
    /// Only the values pushed by each step.
    Pushes,
    /// The entire stack at each step.
    Full,
}

/// Recorder configuration, snapshotted per tracer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingInspectorConfig {
    /// Capture a [`CallTraceStep`] per executed opcode.
    pub record_steps: bool,
    /// Copy interpreter memory into each step record.
    pub record_memory_snapshots: bool,
    pub record_stack_snapshots: StackSnapshotKind,
    /// Record storage accesses on SLOAD/SSTORE steps.
    pub record_state_diff: bool,
    /// Keep precompile sub-frames out of the projected trace. The frames are
    /// still pushed to the arena, just never attached to their parent.
    pub exclude_precompile_calls: bool,
    /// Publish each frame's return data as `last_call_return_data`.
    pub record_call_return_data: bool,
    pub record_logs: bool,
}

impl Default for TracingInspectorConfig {
    fn default() -> Self {
        Self {
            record_steps: false,
            record_memory_snapshots: false,
            record_stack_snapshots: StackSnapshotKind::None,
            record_state_diff: false,
            exclude_precompile_calls: true,
            record_call_return_data: true,
            record_logs: true,
        }
    }
}

impl TracingInspectorConfig {
    /// Everything on: steps, memory, full stacks, storage accesses.
    pub fn all() -> Self {
        Self {
            record_steps: true,
            record_memory_snapshots: true,
            record_stack_snapshots: StackSnapshotKind::Full,
            record_state_diff: true,
            exclude_precompile_calls: true,
            record_call_return_data: true,
            record_logs: true,
        }
    }
}

/// Identity of the transaction being traced, supplied by the host at
/// tx-start.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionInfo {
    pub hash: B256,
    pub index: u64,
}

/// The slice of the receipt the tracer consumes at tx-end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptInfo {
    pub gas_used: u64,
    pub success: bool,
}

/// Opcode-scope access the host exposes to the step hook.
///
/// Stack order is bottom to top: the last element is the top of the stack.
pub trait OpContext {
    fn memory_data(&self) -> &[u8];
    fn stack_data(&self) -> &[U256];
    /// Address of the contract whose code is executing.
    fn contract_address(&self) -> Address;
}
