//! Parity-shaped output model and its columnar projections
//!
//! `types` holds the wire shapes downstream consumers parse; `clickhouse`
//! flattens a finished [`types::TxTrace`] into per-kind column arrays.

pub mod clickhouse;
pub mod types;

pub use types::{
    Action, ActionType, CallAction, CallFrameInfo, CallOutput, CreateAction, CreateOutput,
    DecodedCallData, DecodedParams, RewardAction, RewardType, SelfdestructAction, TraceOutput,
    TransactionTrace, TransactionTraceWithLogs, TxTrace,
};
