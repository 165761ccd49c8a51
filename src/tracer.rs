//! Host-facing tracer handle
//!
//! The host registers its EVM lifecycle hooks against one [`Tracer`] per
//! traced transaction. The handle owns the interrupt latch: once a
//! structural error is detected (or the host calls [`Tracer::stop`]), every
//! subsequent hook becomes a no-op and [`Tracer::get_result`] surfaces the
//! latched error instead of a partial trace.

use alloy::primitives::{Address, Bytes, Log, U256};
use tracing::debug;

use crate::chain::{ChainConfig, VMContext};
use crate::errors::TraceError;
use crate::inspectors::TxInspector;
use crate::trace::types::TxTrace;
use crate::types::{OpContext, ReceiptInfo, TracingInspectorConfig, TransactionInfo};

/// Tracer bound to a single EVM execution.
///
/// A fresh [`TxInspector`] is created at each tx-start; the handle itself is
/// reusable across transactions as long as `get_result` is called between
/// them.
#[derive(Debug)]
pub struct Tracer {
    config: TracingInspectorConfig,
    chain: ChainConfig,
    inspector: Option<TxInspector>,
    receipt: Option<ReceiptInfo>,
    interrupt: bool,
    reason: Option<TraceError>,
}

impl Tracer {
    pub fn new(config: TracingInspectorConfig, chain: ChainConfig) -> Self {
        Self {
            config,
            chain,
            inspector: None,
            receipt: None,
            interrupt: false,
            reason: None,
        }
    }

    /// Begins tracing a transaction: resolves the precompile set and fork id
    /// for the block and resets all per-transaction state.
    pub fn on_tx_start(&mut self, env: VMContext, tx: TransactionInfo, from: Address) {
        debug!(block = %env.block_number, tx = %tx.hash, "tx start");
        self.inspector = Some(TxInspector::new(self.config, &self.chain, env, tx, from));
        self.receipt = None;
        self.interrupt = false;
        self.reason = None;
    }

    pub fn on_enter(
        &mut self,
        depth: u32,
        op_byte: u8,
        from: Address,
        to: Address,
        input: Bytes,
        gas: u64,
        value: U256,
    ) {
        if self.interrupt {
            return;
        }
        if let Some(inspector) = self.inspector.as_mut() {
            if let Err(err) = inspector.on_enter(depth, op_byte, from, to, input, gas, value) {
                self.latch(err);
            }
        }
    }

    pub fn on_exit(
        &mut self,
        depth: u32,
        output: Bytes,
        gas_used: u64,
        err: Option<&str>,
        reverted: bool,
    ) {
        if self.interrupt {
            return;
        }
        if let Some(inspector) = self.inspector.as_mut() {
            if let Err(err) = inspector.on_exit(depth, output, gas_used, err, reverted) {
                self.latch(err);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn on_opcode(
        &mut self,
        pc: u64,
        op: u8,
        gas: u64,
        cost: u64,
        scope: &dyn OpContext,
        return_data: &[u8],
        depth: u32,
        err: Option<&str>,
    ) {
        if self.interrupt {
            return;
        }
        if let Some(inspector) = self.inspector.as_mut() {
            if let Err(err) = inspector.on_opcode(pc, op, gas, cost, scope, return_data, depth, err)
            {
                self.latch(err);
            }
        }
    }

    pub fn on_log(&mut self, log: &Log) {
        if self.interrupt {
            return;
        }
        if let Some(inspector) = self.inspector.as_mut() {
            if let Err(err) = inspector.on_log(log) {
                self.latch(err);
            }
        }
    }

    /// Ends the transaction. The receipt supplies the authoritative gas and
    /// success flag for the top-level trace.
    pub fn on_tx_end(&mut self, receipt: Option<ReceiptInfo>, err: Option<&str>) {
        if self.interrupt {
            return;
        }
        debug!(?receipt, ?err, "tx end");
        self.receipt = receipt;
    }

    /// Terminates tracing at the first opportune moment. All subsequent
    /// hooks become no-ops and `get_result` reports the reason.
    pub fn stop(&mut self, reason: impl Into<String>) {
        self.latch(TraceError::Cancelled(reason.into()));
    }

    /// Consumes the recorded state and produces the transaction trace, or
    /// the latched error if tracing was interrupted.
    pub fn get_result(&mut self) -> Result<TxTrace, TraceError> {
        if let Some(reason) = self.reason.take() {
            self.inspector = None;
            self.interrupt = false;
            return Err(reason);
        }
        let inspector = self.inspector.take().ok_or(TraceError::NoTraces)?;
        inspector.into_trace_results(self.receipt.take().as_ref())
    }

    fn latch(&mut self, err: TraceError) {
        debug!(%err, "tracer interrupted");
        self.interrupt = true;
        if self.reason.is_none() {
            self.reason = Some(err);
        }
    }
}
