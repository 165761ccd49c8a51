//! Columnar projections of a finished trace
//!
//! One struct per action kind and per output kind, plus logs and decoded
//! call data. Each struct holds parallel arrays of equal length; row `i`
//! across the arrays of a single struct pertains to the same `trace_idx`.
//! There is no logic here beyond filtering by kind and encoding: addresses
//! and topics as prefixed hex strings, byte blobs as bare hex, big-ints as
//! 32-byte big-endian buffers.

use alloy::primitives::hex;

use super::types::{Action, DecodedParams, RewardType, TraceOutput, TxTrace};

/// Decoded function-call columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseDecodedCallData {
    pub trace_idx: Vec<u64>,
    pub function_name: Vec<String>,
    pub call_data: Vec<Vec<DecodedParams>>,
    pub return_data: Vec<Vec<DecodedParams>>,
}

impl From<&TxTrace> for ClickhouseDecodedCallData {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            if let Some(decoded) = &trace.decoded_data {
                this.trace_idx.push(trace.trace_idx);
                this.function_name.push(decoded.function_name.clone());
                this.call_data.push(decoded.call_data.clone());
                this.return_data.push(decoded.return_data.clone());
            }
        }
        this
    }
}

/// Log columns. `log_idx` is the log's position within its frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseLogs {
    pub trace_idx: Vec<u64>,
    pub log_idx: Vec<u64>,
    pub address: Vec<String>,
    pub topics: Vec<Vec<String>>,
    pub data: Vec<String>,
}

impl From<&TxTrace> for ClickhouseLogs {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            for (log_idx, log) in trace.logs.iter().enumerate() {
                this.trace_idx.push(trace.trace_idx);
                this.log_idx.push(log_idx as u64);
                this.address.push(log.address.to_string());
                this.topics
                    .push(log.data.topics().iter().map(ToString::to_string).collect());
                this.data.push(hex::encode(&log.data.data));
            }
        }
        this
    }
}

/// Call-action columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseCallAction {
    pub trace_idx: Vec<u64>,
    pub from: Vec<String>,
    pub call_type: Vec<String>,
    pub gas: Vec<u64>,
    pub input: Vec<String>,
    pub to: Vec<String>,
    pub value: Vec<[u8; 32]>,
}

impl From<&TxTrace> for ClickhouseCallAction {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            if let Action::Call(call) = &trace.trace.action {
                this.trace_idx.push(trace.trace_idx);
                this.from.push(call.from.to_string());
                this.call_type.push(call.call_type.to_string());
                this.gas.push(call.gas);
                this.input.push(hex::encode(&call.input));
                this.to.push(call.to.to_string());
                this.value.push(call.value.to_be_bytes());
            }
        }
        this
    }
}

/// Create-action columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseCreateAction {
    pub trace_idx: Vec<u64>,
    pub from: Vec<String>,
    pub gas: Vec<u64>,
    pub init: Vec<String>,
    pub value: Vec<[u8; 32]>,
}

impl From<&TxTrace> for ClickhouseCreateAction {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            if let Action::Create(create) = &trace.trace.action {
                this.trace_idx.push(trace.trace_idx);
                this.from.push(create.from.to_string());
                this.gas.push(create.gas);
                this.init.push(hex::encode(&create.init));
                this.value.push(create.value.to_be_bytes());
            }
        }
        this
    }
}

/// Selfdestruct-action columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseSelfDestructAction {
    pub trace_idx: Vec<u64>,
    pub address: Vec<String>,
    pub balance: Vec<[u8; 32]>,
    pub refund_address: Vec<String>,
}

impl From<&TxTrace> for ClickhouseSelfDestructAction {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            if let Action::SelfDestruct(sd) = &trace.trace.action {
                this.trace_idx.push(trace.trace_idx);
                this.address.push(sd.address.to_string());
                this.balance.push(sd.balance.to_be_bytes());
                this.refund_address.push(sd.refund_address.to_string());
            }
        }
        this
    }
}

/// Reward-action columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseRewardAction {
    pub trace_idx: Vec<u64>,
    pub author: Vec<String>,
    pub value: Vec<[u8; 32]>,
    pub reward_type: Vec<String>,
}

impl From<&TxTrace> for ClickhouseRewardAction {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            if let Action::Reward(reward) = &trace.trace.action {
                this.trace_idx.push(trace.trace_idx);
                this.author.push(reward.author.to_string());
                this.value.push(reward.value.to_be_bytes());
                this.reward_type.push(
                    match reward.reward_type {
                        RewardType::Block => "Block",
                        RewardType::Uncle => "Uncle",
                    }
                    .to_string(),
                );
            }
        }
        this
    }
}

/// Call-output columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseCallOutput {
    pub trace_idx: Vec<u64>,
    pub gas_used: Vec<u64>,
    pub output: Vec<String>,
}

impl From<&TxTrace> for ClickhouseCallOutput {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            if let Some(TraceOutput::Call(output)) = &trace.trace.result {
                this.trace_idx.push(trace.trace_idx);
                this.gas_used.push(output.gas_used);
                this.output.push(hex::encode(&output.output));
            }
        }
        this
    }
}

/// Create-output columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClickhouseCreateOutput {
    pub trace_idx: Vec<u64>,
    pub address: Vec<String>,
    pub code: Vec<String>,
    pub gas_used: Vec<u64>,
}

impl From<&TxTrace> for ClickhouseCreateOutput {
    fn from(value: &TxTrace) -> Self {
        let mut this = Self::default();
        for trace in &value.trace {
            if let Some(TraceOutput::Create(output)) = &trace.trace.result {
                this.trace_idx.push(trace.trace_idx);
                this.address.push(output.address.to_string());
                this.code.push(hex::encode(&output.code));
                this.gas_used.push(output.gas_used);
            }
        }
        this
    }
}
