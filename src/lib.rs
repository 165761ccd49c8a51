//! # Transaction-level EVM call tracer
//!
//! A tracer that attaches to an EVM execution pipeline and, for each
//! processed transaction, emits a hierarchical Parity-style trace: every
//! call/create/selfdestruct frame, the logs emitted within each frame, the
//! interleaved ordering of logs and subcalls, optional per-opcode step
//! records, and a success/revert/halt outcome.
//!
//! ## How it fits together
//!
//! The host drives a [`Tracer`] with synchronous lifecycle events
//! (`on_tx_start`, `on_enter`, `on_opcode`, `on_log`, `on_exit`,
//! `on_tx_end`). Internally a [`TxInspector`] maintains an arena-backed call
//! tree ([`CallTraceArena`]) plus a per-frame ordering log; `get_result`
//! folds that tree into a [`TxTrace`] whose `traceAddress` numbering,
//! `msg_sender` attribution, and precompile filtering follow the Parity
//! `trace_*` conventions downstream MEV/analytics consumers expect. The
//! `trace::clickhouse` module flattens a finished trace into columnar
//! arrays.
//!
//! One tracer instance observes one transaction at a time; tracing multiple
//! transactions concurrently requires distinct instances.
//!
//! ## Module structure
//!
//! - `arena`: dense index-addressed storage for the call tree
//! - `chain`: fork schedule and active precompile sets
//! - `inspectors`: the event-consuming recorder and its projection
//! - `tracer`: host-facing handle with the interrupt latch
//! - `trace`: Parity-shaped output types and columnar emitters
//! - `types`: frame, step, and configuration types
//! - `errors`: the stable error taxonomy
//! - `utils`: revert-payload decoding

pub mod arena;
pub mod chain;
pub mod errors;
pub mod inspectors;
pub mod trace;
pub mod tracer;
pub mod types;
pub mod utils;

// Re-export core types for easier access
pub use arena::{CallTraceArena, PushTraceKind};
pub use chain::{ChainConfig, ForkCondition, VMContext};
pub use errors::TraceError;
pub use inspectors::TxInspector;
pub use trace::{
    Action, ActionType, TraceOutput, TransactionTrace, TransactionTraceWithLogs, TxTrace,
};
pub use tracer::Tracer;
pub use types::{
    CallKind, CallTrace, CallTraceNode, CallTraceStep, LogCallOrder, OpContext, ReceiptInfo,
    StackSnapshotKind, TracingInspectorConfig, TransactionInfo,
};

// Re-export core libraries for convenience
pub use alloy;
pub use revm;
