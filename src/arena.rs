//! Arena storage for the call-trace tree
//!
//! Frames live in a dense, append-only vector and reference each other by
//! index. Children vectors are the authoritative tree edges; the parent index
//! is only a back-pointer and says nothing about attachment (detached
//! precompile nodes keep their parent index but never appear in the parent's
//! `children`).

use crate::types::{CallTrace, CallTraceNode, LogCallOrder};

/// How a new frame is inserted into the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushTraceKind {
    /// Insert the node but leave it detached: it keeps a parent back-pointer
    /// yet is invisible to the parent's `children` and `ordering`. Used for
    /// precompile sub-frames.
    PushOnly,
    /// Insert the node and register it with its parent, appending to the
    /// parent's `children` and `ordering`.
    PushAndAttachToParent,
}

impl PushTraceKind {
    pub const fn is_attach_to_parent(&self) -> bool {
        matches!(self, Self::PushAndAttachToParent)
    }
}

/// Dense, append-only arena of [`CallTraceNode`]s.
///
/// Invariants:
/// - `nodes[i].idx == i`
/// - a node's parent index is strictly smaller than its own
/// - insertion order is pre-order with respect to the execution tree
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CallTraceArena {
    nodes: Vec<CallTraceNode>,
}

impl CallTraceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[CallTraceNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &CallTraceNode {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: usize) -> &mut CallTraceNode {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a new frame and returns its index.
    ///
    /// `parent` is the currently open frame (the recorder's stack top), or
    /// `None` for the root push. Attachment happens only for
    /// [`PushTraceKind::PushAndAttachToParent`]; the parent's `ordering`
    /// records the child at its position within the attached children.
    pub fn push_trace(
        &mut self,
        parent: Option<usize>,
        kind: PushTraceKind,
        trace: CallTrace,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(CallTraceNode {
            parent,
            idx,
            trace,
            ..Default::default()
        });

        if let Some(parent_idx) = parent {
            if kind.is_attach_to_parent() {
                let parent = &mut self.nodes[parent_idx];
                let local_idx = parent.children.len();
                parent.children.push(idx);
                parent.ordering.push(LogCallOrder::Call(local_idx));
            }
        }
        idx
    }
}
