//! Execution inspectors
//!
//! `tx_inspector` holds the transaction-scoped recorder that consumes host
//! lifecycle events and owns the call-trace arena.

pub mod tx_inspector;

pub use tx_inspector::TxInspector;
