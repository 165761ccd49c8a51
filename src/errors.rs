//! Error taxonomy for the tracer
//!
//! One enum covers both per-frame EVM failures and structural tracer
//! failures. Per-frame errors (`InstructionFailed`, `Reverted`) are recorded
//! on the frame and end up in the Parity `error` field; everything else is
//! fatal, latches the tracer, and is returned from `get_result` instead of a
//! partial trace.
//!
//! The `Display` strings are stable: downstream consumers grep for them.

use thiserror::Error;

/// Errors produced while recording or projecting a transaction trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Frame exited with a non-revert EVM error (out-of-gas, invalid jump,
    /// stack underflow, ...). Sub-classification is intentionally collapsed.
    #[error("InstructionFailed")]
    InstructionFailed,

    /// Frame reverted. The frame's output is still projected.
    #[error("Reverted")]
    Reverted,

    /// An enter hook carried an opcode byte outside the recognized
    /// call/create/selfdestruct set.
    #[error("unknown call type: 0x{0:02x}")]
    UnknownCallType(u8),

    /// An exit (or log/step) arrived while no frame was open.
    #[error("exit without a matching enter")]
    UnbalancedExit,

    /// A delegate-call frame reached projection with no non-delegate
    /// predecessor to inherit `msg.sender` from.
    #[error("delegate call frame has no non-delegate predecessor")]
    MissingDelegatePredecessor,

    /// `get_result` was called with an empty arena.
    #[error("no traces were recorded")]
    NoTraces,

    /// A trace result object matched neither the call nor the create output
    /// shape.
    #[error("unknown trace output type")]
    UnknownTraceOutputType,

    /// The host stopped the tracer before the transaction completed.
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl TraceError {
    /// Whether this error latches the tracer. Frame-level EVM failures are
    /// recorded and tracing continues; everything else is terminal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InstructionFailed | Self::Reverted)
    }
}
