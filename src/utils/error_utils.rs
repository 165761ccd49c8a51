//! Revert-payload decoding
//!
//! Failed frames carry their raw revert payload in `output`. This module
//! turns the two standard Solidity encodings into readable strings:
//! `Error(string)` (selector `0x08c379a0`) and `Panic(uint256)` (selector
//! `0x4e487b71`). Anything else is left to custom-error decoders downstream.

use alloy::sol_types::{Panic, Revert, SolError};

/// Decodes a revert payload into a readable reason.
///
/// Returns `None` when the payload is empty, truncated, or uses a custom
/// error selector.
pub fn decode_revert_reason(output: &[u8]) -> Option<String> {
    if output.len() < 4 {
        return None;
    }

    if let Ok(revert) = Revert::abi_decode(output) {
        return Some(revert.reason);
    }
    if let Ok(panic) = Panic::abi_decode(output) {
        return Some(panic_message(panic.code.saturating_to::<u64>()));
    }
    None
}

fn panic_message(code: u64) -> String {
    let reason = match code {
        0x01 => "assertion failed",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division by zero",
        0x21 => "invalid enum conversion",
        0x22 => "corrupted storage byte array",
        0x31 => "pop on empty array",
        0x32 => "array index out of bounds",
        0x41 => "allocation too large",
        0x51 => "call to uninitialized function pointer",
        _ => return format!("panic (0x{code:x})"),
    };
    format!("panic: {reason} (0x{code:x})")
}
