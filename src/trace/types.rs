//! Parity-shaped trace output model
//!
//! These are the wire types downstream consumers parse. `Action` serializes
//! as a flat object carrying only the fields appropriate to its variant (the
//! classic Parity `trace_*` marshaling), and `TraceOutput` serializes as the
//! inner call/create output object. The top-level [`TxTrace`] uses snake_case
//! keys.

use alloy::primitives::{Address, Bytes, Log, B256, U256};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::TraceError;
use crate::types::CallKind;

/// Discriminator of a Parity trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Call,
    Create,
    SelfDestruct,
    Reward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Block,
    Uncle,
}

/// A `CALL*` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallAction {
    pub from: Address,
    pub call_type: CallKind,
    pub gas: u64,
    pub input: Bytes,
    pub to: Address,
    pub value: U256,
}

/// A `CREATE`/`CREATE2` action. The created address lives on the result side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAction {
    pub from: Address,
    pub value: U256,
    pub gas: u64,
    pub init: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfdestructAction {
    /// The contract being destroyed.
    pub address: Address,
    pub refund_address: Address,
    /// Balance swept to the refund address.
    pub balance: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardAction {
    pub author: Address,
    pub reward_type: RewardType,
    pub value: U256,
}

/// The action side of a trace entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Call(CallAction),
    Create(CreateAction),
    SelfDestruct(SelfdestructAction),
    Reward(RewardAction),
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Call(_) => ActionType::Call,
            Self::Create(_) => ActionType::Create,
            Self::SelfDestruct(_) => ActionType::SelfDestruct,
            Self::Reward(_) => ActionType::Reward,
        }
    }

    /// The acting address: caller for calls/creates, the destroyed contract
    /// for selfdestructs, the author for rewards.
    pub fn from_addr(&self) -> Address {
        match self {
            Self::Call(call) => call.from,
            Self::Create(create) => create.from,
            Self::SelfDestruct(sd) => sd.address,
            Self::Reward(reward) => reward.author,
        }
    }

    /// The target address, zero where the variant has none.
    pub fn to_addr(&self) -> Address {
        match self {
            Self::Call(call) => call.to,
            Self::SelfDestruct(sd) => sd.address,
            Self::Create(_) | Self::Reward(_) => Address::ZERO,
        }
    }

    /// The message value, zero where the variant has none.
    pub fn msg_value(&self) -> U256 {
        match self {
            Self::Call(call) => call.value,
            Self::Create(create) => create.value,
            Self::Reward(reward) => reward.value,
            Self::SelfDestruct(_) => U256::ZERO,
        }
    }

    /// Call input or init code, empty where the variant has none.
    pub fn call_data(&self) -> Bytes {
        match self {
            Self::Call(call) => call.input.clone(),
            Self::Create(create) => create.init.clone(),
            Self::SelfDestruct(_) | Self::Reward(_) => Bytes::new(),
        }
    }
}

/// The flat field set of the Parity action object. One struct both ways:
/// serialization fills only the variant's fields, deserialization classifies
/// by which fields are present.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reward_type: Option<RewardType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    balance: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    call_type: Option<CallKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<Address>,
    #[serde(
        default,
        with = "alloy::serde::quantity::opt",
        skip_serializing_if = "Option::is_none"
    )]
    gas: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    init: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refund_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<U256>,
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = ActionFields::default();
        match self {
            Self::Call(call) => {
                fields.call_type = Some(call.call_type);
                fields.from = Some(call.from);
                fields.to = Some(call.to);
                fields.value = Some(call.value);
                fields.gas = Some(call.gas);
                fields.input = Some(call.input.clone());
            }
            Self::Create(create) => {
                fields.from = Some(create.from);
                fields.value = Some(create.value);
                fields.gas = Some(create.gas);
                fields.init = Some(create.init.clone());
            }
            Self::SelfDestruct(sd) => {
                fields.address = Some(sd.address);
                fields.balance = Some(sd.balance);
                fields.refund_address = Some(sd.refund_address);
            }
            Self::Reward(reward) => {
                fields.author = Some(reward.author);
                fields.reward_type = Some(reward.reward_type);
                fields.value = Some(reward.value);
            }
        }
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        fn req<T, E: DeError>(value: Option<T>, field: &'static str) -> Result<T, E> {
            value.ok_or_else(|| E::missing_field(field))
        }

        let fields = ActionFields::deserialize(deserializer)?;
        if let Some(call_type) = fields.call_type {
            Ok(Self::Call(CallAction {
                from: req(fields.from, "from")?,
                call_type,
                gas: req(fields.gas, "gas")?,
                input: req(fields.input, "input")?,
                to: req(fields.to, "to")?,
                value: fields.value.unwrap_or_default(),
            }))
        } else if let Some(init) = fields.init {
            Ok(Self::Create(CreateAction {
                from: req(fields.from, "from")?,
                value: fields.value.unwrap_or_default(),
                gas: req(fields.gas, "gas")?,
                init,
            }))
        } else if let Some(refund_address) = fields.refund_address {
            Ok(Self::SelfDestruct(SelfdestructAction {
                address: req(fields.address, "address")?,
                refund_address,
                balance: fields.balance.unwrap_or_default(),
            }))
        } else if let Some(author) = fields.author {
            Ok(Self::Reward(RewardAction {
                author,
                reward_type: req(fields.reward_type, "rewardType")?,
                value: fields.value.unwrap_or_default(),
            }))
        } else {
            Err(D::Error::custom("action object matches no known variant"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOutput {
    #[serde(with = "alloy::serde::quantity")]
    pub gas_used: u64,
    pub output: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutput {
    #[serde(with = "alloy::serde::quantity")]
    pub gas_used: u64,
    /// Deployed runtime code, or the revert payload for reverted creates.
    pub code: Bytes,
    pub address: Address,
}

/// The result side of a trace entry; serializes as the inner output object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOutput {
    Call(CallOutput),
    Create(CreateOutput),
}

impl TraceOutput {
    pub fn gas_used(&self) -> u64 {
        match self {
            Self::Call(output) => output.gas_used,
            Self::Create(output) => output.gas_used,
        }
    }
}

impl Serialize for TraceOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Call(output) => output.serialize(serializer),
            Self::Create(output) => output.serialize(serializer),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TraceOutputFields {
    #[serde(default, with = "alloy::serde::quantity::opt")]
    gas_used: Option<u64>,
    #[serde(default)]
    output: Option<Bytes>,
    #[serde(default)]
    code: Option<Bytes>,
    #[serde(default)]
    address: Option<Address>,
}

impl<'de> Deserialize<'de> for TraceOutput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = TraceOutputFields::deserialize(deserializer)?;
        let gas_used = fields
            .gas_used
            .ok_or_else(|| D::Error::missing_field("gasUsed"))?;
        match (fields.code, fields.address, fields.output) {
            (Some(code), Some(address), _) => Ok(Self::Create(CreateOutput {
                gas_used,
                code,
                address,
            })),
            (None, None, Some(output)) => Ok(Self::Call(CallOutput { gas_used, output })),
            _ => Err(D::Error::custom(TraceError::UnknownTraceOutputType)),
        }
    }
}

/// One Parity trace entry: action, optional result, optional error, and the
/// position of the frame in the call tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionTrace {
    #[serde(rename = "type")]
    pub ty: ActionType,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TraceOutput>,
    pub subtraces: u64,
    #[serde(rename = "traceAddress")]
    pub trace_address: Vec<u64>,
}

impl TransactionTrace {
    pub fn is_create(&self) -> bool {
        self.ty == ActionType::Create
    }

    pub fn is_static_call(&self) -> bool {
        matches!(&self.action, Action::Call(call) if call.call_type.is_static())
    }

    pub fn is_delegate_call(&self) -> bool {
        matches!(&self.action, Action::Call(call) if call.call_type.is_delegate())
    }
}

/// Decoded parameter attached by an external ABI decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedParams {
    pub field_name: String,
    pub field_type: String,
    pub value: String,
}

/// Decoded function call attached by an external ABI decoder. The tracer
/// treats this as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCallData {
    pub function_name: String,
    pub call_data: Vec<DecodedParams>,
    pub return_data: Vec<DecodedParams>,
}

/// A trace entry together with the logs its frame emitted, the resolved
/// `msg.sender`, and the arena index it was projected from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionTraceWithLogs {
    pub trace: TransactionTrace,
    pub logs: Vec<Log>,
    pub msg_sender: Address,
    pub trace_idx: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoded_data: Option<DecodedCallData>,
}

impl TransactionTraceWithLogs {
    pub fn action_type(&self) -> ActionType {
        self.trace.action.action_type()
    }

    pub fn from_addr(&self) -> Address {
        self.trace.action.from_addr()
    }

    pub fn to_addr(&self) -> Address {
        self.trace.action.to_addr()
    }

    pub fn msg_sender(&self) -> Address {
        self.msg_sender
    }

    pub fn msg_value(&self) -> U256 {
        self.trace.action.msg_value()
    }

    pub fn call_data(&self) -> Bytes {
        self.trace.action.call_data()
    }

    /// Return data of a call frame; empty for creates and failed frames.
    pub fn return_call_data(&self) -> Bytes {
        match &self.trace.result {
            Some(TraceOutput::Call(output)) => output.output.clone(),
            _ => Bytes::new(),
        }
    }

    /// The address created by this frame, zero when it is not a successful
    /// create.
    pub fn create_output(&self) -> Address {
        match &self.trace.result {
            Some(TraceOutput::Create(output)) => output.address,
            _ => Address::ZERO,
        }
    }

    pub fn is_static_call(&self) -> bool {
        self.trace.is_static_call()
    }

    pub fn is_create(&self) -> bool {
        self.trace.is_create()
    }

    pub fn is_delegate_call(&self) -> bool {
        self.trace.is_delegate_call()
    }

    /// Bundles the frame facts downstream classifiers consume.
    pub fn call_frame_info(&self) -> CallFrameInfo {
        CallFrameInfo {
            trace_idx: self.trace_idx,
            call_data: self.call_data(),
            return_data: self.return_call_data(),
            target_address: self.to_addr(),
            from_address: self.from_addr(),
            logs: self.logs.clone(),
            delegate_logs: Vec::new(),
            msg_sender: self.msg_sender,
            msg_value: self.msg_value(),
        }
    }
}

/// Flattened view of one call frame for downstream consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrameInfo {
    pub trace_idx: u64,
    pub call_data: Bytes,
    pub return_data: Bytes,
    pub target_address: Address,
    pub from_address: Address,
    pub logs: Vec<Log>,
    /// Logs emitted by frames delegate-calling into this one; populated by
    /// downstream aggregation, empty here.
    pub delegate_logs: Vec<Log>,
    pub msg_sender: Address,
    pub msg_value: U256,
}

/// The complete trace of one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxTrace {
    pub block_number: u64,
    pub tx_hash: B256,
    pub tx_index: u64,
    pub gas_used: u64,
    /// Always zero: gas pricing re-derivation is out of scope.
    pub effective_price: U256,
    pub is_success: bool,
    pub trace: Vec<TransactionTraceWithLogs>,
}

impl TxTrace {
    /// Attaches decoder output to the call/create entry projected from
    /// `trace_idx`. This is the only mutation permitted after projection.
    /// Returns whether an entry accepted the attachment.
    pub fn attach_decoded_data(&mut self, trace_idx: u64, decoded: DecodedCallData) -> bool {
        for entry in &mut self.trace {
            let accepts = matches!(entry.trace.action, Action::Call(_) | Action::Create(_));
            if entry.trace_idx == trace_idx && accepts {
                entry.decoded_data = Some(decoded);
                return true;
            }
        }
        false
    }
}
