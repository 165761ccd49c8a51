//! End-to-end tracer tests
//!
//! Every test drives the tracer with a synthetic host event stream, the same
//! hook sequence a real EVM integration produces, and checks the projected
//! Parity trace (or the recorded arena) against literal expectations:
//!
//! - Simple transfers, precompile elision, delegate `msg.sender` inheritance
//! - Reverts with output, log/call interleaving, selfdestruct projection
//! - Structural-error latching and cancellation
//! - Tree invariants, JSON round-trips, and determinism

use alloy::primitives::{address, Address, Bytes, Log, B256, U256};
use revm::bytecode::opcode;

use tx_tracer::{
    Action, CallKind, ChainConfig, LogCallOrder, OpContext, ReceiptInfo, StackSnapshotKind,
    TraceError, TraceOutput, Tracer, TracingInspectorConfig, TransactionInfo, TxInspector, TxTrace,
    VMContext,
};

const EOA: Address = address!("7156526fbd7a3c72969b54f64e42c10fbb768c8a");
const TRANSFER_TARGET: Address = address!("00000000000000000000000000000000deadbeef");
const CONTRACT_A: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const CONTRACT_B: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
const CONTRACT_C: Address = address!("cccccccccccccccccccccccccccccccccccccccc");
const CONTRACT_D: Address = address!("dddddddddddddddddddddddddddddddddddddddd");
const ECRECOVER: Address = address!("0000000000000000000000000000000000000001");
const SHA256: Address = address!("0000000000000000000000000000000000000002");

fn vm_context() -> VMContext {
    VMContext {
        block_number: U256::from(19_500_000u64),
        time: 1_712_000_000,
        random: Some(B256::ZERO),
        arbos_version: 0,
    }
}

fn tx_info() -> TransactionInfo {
    TransactionInfo {
        hash: B256::with_last_byte(0xab),
        index: 3,
    }
}

fn receipt(gas_used: u64, success: bool) -> ReceiptInfo {
    ReceiptInfo { gas_used, success }
}

fn tracer() -> Tracer {
    Tracer::new(TracingInspectorConfig::default(), ChainConfig::mainnet())
}

fn inspector(config: TracingInspectorConfig) -> TxInspector {
    TxInspector::new(config, &ChainConfig::mainnet(), vm_context(), tx_info(), EOA)
}

fn log(address: Address, topic_byte: u8, data: &[u8]) -> Log {
    Log::new_unchecked(
        address,
        vec![B256::with_last_byte(topic_byte)],
        Bytes::copy_from_slice(data),
    )
}

#[test]
fn simple_value_transfer() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(
        0,
        opcode::CALL,
        EOA,
        TRANSFER_TARGET,
        Bytes::new(),
        50_000,
        U256::from(1000),
    );
    tracer.on_exit(0, Bytes::new(), 21_000, None, false);
    tracer.on_tx_end(Some(receipt(21_000, true)), None);

    let result = tracer.get_result().unwrap();
    assert_eq!(result.block_number, 19_500_000);
    assert_eq!(result.tx_hash, B256::with_last_byte(0xab));
    assert_eq!(result.tx_index, 3);
    assert_eq!(result.gas_used, 21_000);
    assert_eq!(result.effective_price, U256::ZERO);
    assert!(result.is_success);

    assert_eq!(result.trace.len(), 1);
    let entry = &result.trace[0];
    assert_eq!(entry.trace_idx, 0);
    assert!(entry.trace.trace_address.is_empty());
    assert_eq!(entry.trace.subtraces, 0);
    assert!(entry.logs.is_empty());
    assert_eq!(entry.msg_sender, EOA);

    let Action::Call(call) = &entry.trace.action else {
        panic!("expected a call action");
    };
    assert_eq!(call.from, EOA);
    assert_eq!(call.to, TRANSFER_TARGET);
    assert_eq!(call.value, U256::from(1000));
    assert_eq!(call.gas, 50_000);
    assert_eq!(call.call_type, CallKind::Call);

    let Some(TraceOutput::Call(output)) = &entry.trace.result else {
        panic!("expected a call output");
    };
    assert!(output.gas_used > 0);
    assert!(entry.trace.error.is_none());
}

#[test]
fn precompile_frames_are_elided_but_kept_in_arena() {
    let mut insp = inspector(TracingInspectorConfig::default());
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();
    insp.on_enter(
        1,
        opcode::STATICCALL,
        CONTRACT_A,
        ECRECOVER,
        Bytes::from(vec![0u8; 128]),
        10_000,
        U256::ZERO,
    )
    .unwrap();
    insp.on_exit(1, Bytes::from(vec![0u8; 32]), 3_000, None, false)
        .unwrap();
    insp.on_enter(1, opcode::CALL, CONTRACT_A, SHA256, Bytes::new(), 10_000, U256::ZERO)
        .unwrap();
    insp.on_exit(1, Bytes::from(vec![0u8; 32]), 60, None, false)
        .unwrap();
    insp.on_exit(0, Bytes::new(), 30_000, None, false).unwrap();

    // The skipped frames stay in the arena, detached from their parent.
    let nodes = insp.traces().nodes();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1].trace.maybe_precompile, Some(true));
    assert_eq!(nodes[2].trace.maybe_precompile, Some(true));
    assert_eq!(nodes[1].parent, Some(0));
    assert_eq!(nodes[2].parent, Some(0));
    assert!(nodes[0].children.is_empty());
    assert!(nodes[0].ordering.is_empty());

    let result = insp.into_trace_results(Some(&receipt(30_000, true))).unwrap();
    assert_eq!(result.trace.len(), 1);
    assert_eq!(result.trace[0].trace.subtraces, 0);
}

#[test]
fn precompile_frames_attach_when_exclusion_is_off() {
    let config = TracingInspectorConfig {
        exclude_precompile_calls: false,
        ..Default::default()
    };
    let mut insp = inspector(config);
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();
    insp.on_enter(1, opcode::CALL, CONTRACT_A, ECRECOVER, Bytes::new(), 10_000, U256::ZERO)
        .unwrap();
    insp.on_exit(1, Bytes::new(), 3_000, None, false).unwrap();
    insp.on_exit(0, Bytes::new(), 30_000, None, false).unwrap();

    assert_eq!(insp.traces().node(1).trace.maybe_precompile, None);
    let result = insp.into_trace_results(Some(&receipt(30_000, true))).unwrap();
    assert_eq!(result.trace.len(), 2);
    assert_eq!(result.trace[0].trace.subtraces, 1);
    assert_eq!(result.trace[1].trace.trace_address, vec![0]);
}

#[test]
fn delegate_call_inherits_msg_sender() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 200_000, U256::ZERO);
    tracer.on_enter(
        1,
        opcode::DELEGATECALL,
        CONTRACT_A,
        CONTRACT_B,
        Bytes::new(),
        150_000,
        U256::ZERO,
    );
    // A CALL issued from the delegated context: the caller is A, not B.
    tracer.on_enter(2, opcode::CALL, CONTRACT_A, CONTRACT_C, Bytes::new(), 100_000, U256::ZERO);
    tracer.on_exit(2, Bytes::new(), 1_000, None, false);
    tracer.on_exit(1, Bytes::new(), 5_000, None, false);
    tracer.on_exit(0, Bytes::new(), 20_000, None, false);
    tracer.on_tx_end(Some(receipt(20_000, true)), None);

    let result = tracer.get_result().unwrap();
    assert_eq!(result.trace.len(), 3);
    assert_eq!(result.trace[0].msg_sender, EOA);
    // The delegate frame inherits its caller's sender.
    assert_eq!(result.trace[1].msg_sender, EOA);
    assert!(result.trace[1].is_delegate_call());
    // The nested plain call starts a fresh sender context.
    assert_eq!(result.trace[2].msg_sender, CONTRACT_A);
    let Action::Call(call) = &result.trace[2].trace.action else {
        panic!("expected a call action");
    };
    assert_eq!(call.from, CONTRACT_A);
}

#[test]
fn reverted_create_keeps_output() {
    let created = address!("1234000000000000000000000000000000001234");
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(
        0,
        opcode::CREATE,
        EOA,
        created,
        Bytes::from_static(&[0x60, 0x80]),
        300_000,
        U256::ZERO,
    );
    tracer.on_exit(
        0,
        Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
        120_000,
        Some("execution reverted"),
        true,
    );
    tracer.on_tx_end(Some(receipt(120_000, false)), None);

    let result = tracer.get_result().unwrap();
    assert!(!result.is_success);
    let entry = &result.trace[0];
    assert!(entry.trace.is_create());
    assert_eq!(entry.trace.error.as_deref(), Some("Reverted"));

    let Some(TraceOutput::Create(output)) = &entry.trace.result else {
        panic!("reverts must keep their output");
    };
    assert_eq!(output.code, Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]));
    assert_eq!(output.address, created);
    assert_eq!(output.gas_used, 120_000);
}

#[test]
fn halted_frame_has_no_result() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 50_000, U256::ZERO);
    tracer.on_exit(0, Bytes::new(), 50_000, Some("out of gas"), false);
    tracer.on_tx_end(Some(receipt(50_000, false)), None);

    let result = tracer.get_result().unwrap();
    let entry = &result.trace[0];
    assert_eq!(entry.trace.error.as_deref(), Some("InstructionFailed"));
    assert!(entry.trace.result.is_none());
}

#[test]
fn logs_and_calls_interleave_in_ordering() {
    let mut insp = inspector(TracingInspectorConfig::default());
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();
    insp.on_log(&log(CONTRACT_A, 0x01, b"first")).unwrap();
    insp.on_enter(1, opcode::CALL, CONTRACT_A, CONTRACT_B, Bytes::new(), 50_000, U256::ZERO)
        .unwrap();
    insp.on_exit(1, Bytes::new(), 1_000, None, false).unwrap();
    insp.on_log(&log(CONTRACT_A, 0x02, b"second")).unwrap();
    insp.on_exit(0, Bytes::new(), 30_000, None, false).unwrap();

    let root = insp.traces().node(0);
    assert_eq!(
        root.ordering,
        vec![
            LogCallOrder::Log(0),
            LogCallOrder::Call(0),
            LogCallOrder::Log(1)
        ]
    );
    assert_eq!(root.logs.len(), 2);
    assert_eq!(root.children.len(), 1);

    // Projected logs carry the emitting frame's address.
    let result = insp.into_trace_results(Some(&receipt(30_000, true))).unwrap();
    assert_eq!(result.trace[0].logs.len(), 2);
    assert!(result.trace[0].logs.iter().all(|l| l.address == CONTRACT_A));
}

#[test]
fn selfdestruct_projects_a_follow_up_entry() {
    let refund = address!("9999999999999999999999999999999999999999");
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 80_000, U256::ZERO);
    tracer.on_enter(
        1,
        opcode::SELFDESTRUCT,
        CONTRACT_A,
        refund,
        Bytes::new(),
        0,
        U256::from(777),
    );
    tracer.on_exit(0, Bytes::new(), 10_000, None, false);
    tracer.on_tx_end(Some(receipt(10_000, true)), None);

    let result = tracer.get_result().unwrap();
    assert_eq!(result.trace.len(), 2);

    // The destructing frame keeps its normal action and subtrace count.
    let frame = &result.trace[0];
    assert_eq!(frame.trace.subtraces, 0);
    assert!(matches!(frame.trace.action, Action::Call(_)));

    let sd = &result.trace[1];
    assert_eq!(sd.trace_idx, frame.trace_idx);
    assert_eq!(sd.trace.trace_address, vec![0]);
    assert!(sd.trace.result.is_none());
    assert!(sd.trace.error.is_none());
    assert_eq!(sd.msg_sender, CONTRACT_A);
    let Action::SelfDestruct(action) = &sd.trace.action else {
        panic!("expected a selfdestruct action");
    };
    assert_eq!(action.address, CONTRACT_A);
    assert_eq!(action.refund_address, refund);
    assert_eq!(action.balance, U256::from(777));
}

/// Drives a four-frame tree with one detached precompile child and returns
/// the projected result alongside the arena.
fn nested_tree() -> (TxInspector, TxTrace) {
    let mut insp = inspector(TracingInspectorConfig::default());
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 500_000, U256::ZERO)
        .unwrap();
    insp.on_enter(1, opcode::CALL, CONTRACT_A, CONTRACT_B, Bytes::new(), 300_000, U256::ZERO)
        .unwrap();
    insp.on_log(&log(CONTRACT_B, 0x01, b"inner")).unwrap();
    insp.on_enter(2, opcode::CALL, CONTRACT_B, CONTRACT_C, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();
    insp.on_exit(2, Bytes::new(), 2_000, None, false).unwrap();
    insp.on_exit(1, Bytes::new(), 10_000, None, false).unwrap();
    insp.on_enter(1, opcode::CALL, CONTRACT_A, ECRECOVER, Bytes::new(), 10_000, U256::ZERO)
        .unwrap();
    insp.on_exit(1, Bytes::new(), 3_000, None, false).unwrap();
    insp.on_enter(1, opcode::STATICCALL, CONTRACT_A, CONTRACT_D, Bytes::new(), 50_000, U256::ZERO)
        .unwrap();
    insp.on_exit(1, Bytes::new(), 1_000, None, false).unwrap();
    insp.on_exit(0, Bytes::new(), 50_000, None, false).unwrap();

    let result = insp
        .clone()
        .into_trace_results(Some(&receipt(50_000, true)))
        .unwrap();
    (insp, result)
}

#[test]
fn arena_invariants_hold() {
    let (insp, _) = nested_tree();
    for (position, node) in insp.traces().nodes().iter().enumerate() {
        assert_eq!(node.idx, position);
        if let Some(parent) = node.parent {
            assert!(parent < node.idx);
        }
        for &child in &node.children {
            let child_node = insp.traces().node(child);
            assert_eq!(child_node.parent, Some(node.idx));
            assert_ne!(child_node.trace.maybe_precompile, Some(true));
        }
        assert!(node.trace.gas_used <= node.trace.gas_limit);

        // Ordering covers every log and every attached child exactly once.
        let logs: Vec<_> = node
            .ordering
            .iter()
            .filter_map(|o| match o {
                LogCallOrder::Log(i) => Some(*i),
                LogCallOrder::Call(_) => None,
            })
            .collect();
        let calls: Vec<_> = node
            .ordering
            .iter()
            .filter_map(|o| match o {
                LogCallOrder::Call(i) => Some(*i),
                LogCallOrder::Log(_) => None,
            })
            .collect();
        assert_eq!(node.ordering.len(), node.logs.len() + node.children.len());
        assert_eq!(logs.len(), node.logs.len());
        assert_eq!(calls.len(), node.children.len());
        for (expected, &got) in logs.iter().enumerate() {
            assert_eq!(got, expected);
        }
        for (expected, &got) in calls.iter().enumerate() {
            assert_eq!(got, expected);
        }
    }
}

#[test]
fn trace_addresses_form_preorder_dfs() {
    let (_, result) = nested_tree();
    let addresses: Vec<_> = result
        .trace
        .iter()
        .map(|t| t.trace.trace_address.clone())
        .collect();
    assert_eq!(
        addresses,
        vec![vec![], vec![0], vec![0, 0], vec![1]],
    );

    // Subtrace counts match the attached-children counts.
    let subtraces: Vec<_> = result.trace.iter().map(|t| t.trace.subtraces).collect();
    assert_eq!(subtraces, vec![2, 1, 0, 0]);
}

#[test]
fn json_round_trip_preserves_the_trace() -> anyhow::Result<()> {
    let (_, result) = nested_tree();
    let encoded = serde_json::to_string(&result)?;
    let decoded: TxTrace = serde_json::from_str(&encoded)?;
    assert_eq!(decoded, result);
    Ok(())
}

#[test]
fn reprojecting_the_same_arena_is_idempotent() {
    let (insp, _) = nested_tree();
    let first = insp.build_trace().unwrap();
    let second = insp.build_trace().unwrap();
    assert_eq!(first, second);
}

#[test]
fn identical_event_streams_are_deterministic() -> anyhow::Result<()> {
    let (_, first) = nested_tree();
    let (_, second) = nested_tree();
    assert_eq!(
        serde_json::to_string(&first)?,
        serde_json::to_string(&second)?
    );
    Ok(())
}

#[test]
fn delegate_frames_inherit_nearest_non_delegate_sender() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 500_000, U256::ZERO);
    tracer.on_enter(1, opcode::DELEGATECALL, CONTRACT_A, CONTRACT_B, Bytes::new(), 400_000, U256::ZERO);
    tracer.on_enter(2, opcode::CALLCODE, CONTRACT_A, CONTRACT_C, Bytes::new(), 300_000, U256::ZERO);
    tracer.on_exit(2, Bytes::new(), 1_000, None, false);
    tracer.on_exit(1, Bytes::new(), 2_000, None, false);
    tracer.on_exit(0, Bytes::new(), 10_000, None, false);
    tracer.on_tx_end(Some(receipt(10_000, true)), None);

    let result = tracer.get_result().unwrap();
    let senders: Vec<_> = result.trace.iter().map(|t| t.msg_sender).collect();
    // Both delegate variants chain back to the root call's sender.
    assert_eq!(senders, vec![EOA, EOA, EOA]);

    for entry in result.trace.iter().filter(|t| t.is_delegate_call()) {
        let predecessors: Vec<_> = result
            .trace
            .iter()
            .take_while(|t| t.trace_idx < entry.trace_idx)
            .filter(|t| !t.is_delegate_call())
            .collect();
        let nearest = predecessors.last().unwrap();
        assert_eq!(entry.msg_sender, nearest.msg_sender);
    }
}

#[test]
fn root_delegate_call_is_a_structural_error() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::DELEGATECALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO);
    tracer.on_exit(0, Bytes::new(), 1_000, None, false);
    tracer.on_tx_end(Some(receipt(1_000, true)), None);

    assert_eq!(
        tracer.get_result(),
        Err(TraceError::MissingDelegatePredecessor)
    );
}

#[test]
fn unbalanced_exit_latches_the_tracer() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_exit(0, Bytes::new(), 0, None, false);
    // Later hooks are inert once latched.
    tracer.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO);
    tracer.on_tx_end(Some(receipt(0, true)), None);

    assert_eq!(tracer.get_result(), Err(TraceError::UnbalancedExit));
}

#[test]
fn unknown_enter_opcode_is_fatal() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::ADD, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO);

    assert_eq!(
        tracer.get_result(),
        Err(TraceError::UnknownCallType(opcode::ADD))
    );
}

#[test]
fn stop_cancels_tracing() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO);
    tracer.stop("execution timeout");
    tracer.on_exit(0, Bytes::new(), 1_000, None, false);

    assert_eq!(
        tracer.get_result(),
        Err(TraceError::Cancelled("execution timeout".into()))
    );
}

#[test]
fn empty_arena_yields_no_traces() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_tx_end(Some(receipt(21_000, true)), None);

    assert_eq!(tracer.get_result(), Err(TraceError::NoTraces));
}

#[test]
fn missing_receipt_falls_back_to_root_frame() {
    let mut tracer = tracer();
    tracer.on_tx_start(vm_context(), tx_info(), EOA);
    tracer.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 50_000, U256::ZERO);
    tracer.on_exit(0, Bytes::new(), 42_000, None, false);

    let result = tracer.get_result().unwrap();
    assert_eq!(result.gas_used, 42_000);
    assert!(result.is_success);
}

struct TestScope {
    memory: Vec<u8>,
    stack: Vec<U256>,
    contract: Address,
}

impl OpContext for TestScope {
    fn memory_data(&self) -> &[u8] {
        &self.memory
    }

    fn stack_data(&self) -> &[U256] {
        &self.stack
    }

    fn contract_address(&self) -> Address {
        self.contract
    }
}

#[test]
fn step_recording_captures_memory_stack_and_storage() {
    let config = TracingInspectorConfig {
        record_steps: true,
        record_memory_snapshots: true,
        record_stack_snapshots: StackSnapshotKind::Full,
        record_state_diff: true,
        ..Default::default()
    };
    let mut insp = inspector(config);
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();

    let scope = TestScope {
        memory: vec![0xaa; 64],
        // Bottom to top: SSTORE sees key 7 on top, value 42 beneath it.
        stack: vec![U256::from(42), U256::from(7)],
        contract: CONTRACT_A,
    };
    insp.on_opcode(0, opcode::PUSH1, 99_000, 3, &scope, &[], 0, None)
        .unwrap();
    insp.on_opcode(2, opcode::SSTORE, 98_000, 20_000, &scope, &[], 0, None)
        .unwrap();
    insp.on_opcode(3, opcode::SLOAD, 78_000, 2_100, &scope, &[], 0, None)
        .unwrap();
    insp.on_exit(0, Bytes::new(), 30_000, None, false).unwrap();

    let steps = &insp.traces().node(0).trace.steps;
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].contract, CONTRACT_A);
    assert_eq!(steps[0].memory.len(), 64);
    assert_eq!(steps[0].memory_size, 64);
    assert_eq!(steps[0].stack.as_deref(), Some(&[U256::from(42), U256::from(7)][..]));
    assert_eq!(steps[0].gas_remaining, 99_000);
    assert_eq!(steps[0].gas_cost, 3);
    assert!(steps[0].storage_change.is_none());

    let change = steps[1].storage_change.expect("sstore records a change");
    assert_eq!(change.key, U256::from(7));
    assert_eq!(change.value, Some(U256::from(42)));
    assert_eq!(change.had_value, None);

    // An SLOAD step knows its key but not yet the value it will load.
    let change = steps[2].storage_change.expect("sload records an access");
    assert_eq!(change.key, U256::from(7));
    assert_eq!(change.value, None);
    assert_eq!(change.had_value, None);
}

#[test]
fn steps_are_skipped_by_default() {
    let mut insp = inspector(TracingInspectorConfig::default());
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();
    let scope = TestScope {
        memory: Vec::new(),
        stack: Vec::new(),
        contract: CONTRACT_A,
    };
    insp.on_opcode(0, opcode::PUSH1, 99_000, 3, &scope, &[], 0, None)
        .unwrap();
    insp.on_exit(0, Bytes::new(), 1_000, None, false).unwrap();

    assert!(insp.traces().node(0).trace.steps.is_empty());
}

#[test]
fn disabled_log_recording_drops_logs() {
    let config = TracingInspectorConfig {
        record_logs: false,
        ..Default::default()
    };
    let mut insp = inspector(config);
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();
    insp.on_log(&log(CONTRACT_A, 0x01, b"dropped")).unwrap();
    insp.on_exit(0, Bytes::new(), 1_000, None, false).unwrap();

    let root = insp.traces().node(0);
    assert!(root.logs.is_empty());
    assert!(root.ordering.is_empty());
}

#[test]
fn last_call_return_data_tracks_latest_exit() {
    let mut insp = inspector(TracingInspectorConfig::default());
    insp.on_enter(0, opcode::CALL, EOA, CONTRACT_A, Bytes::new(), 100_000, U256::ZERO)
        .unwrap();
    insp.on_enter(1, opcode::CALL, CONTRACT_A, CONTRACT_B, Bytes::new(), 50_000, U256::ZERO)
        .unwrap();
    insp.on_exit(1, Bytes::from_static(&[0x01]), 1_000, None, false)
        .unwrap();
    assert_eq!(
        insp.last_call_return_data().map(|b| b.as_ref()),
        Some(&[0x01][..])
    );
    insp.on_exit(0, Bytes::from_static(&[0x02]), 10_000, None, false)
        .unwrap();
    assert_eq!(
        insp.last_call_return_data().map(|b| b.as_ref()),
        Some(&[0x02][..])
    );
}
