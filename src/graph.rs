//! Graph primitives for network genomes.
//!
//! This module defines the building blocks of a genome's graph:
//! - [`Node`]: a computational unit with a bias and a double-buffered value
//! - [`Edge`]: a directed, weighted connection between two nodes

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a node within a genome.
    ///
    /// Uses SlotMap's generational indices for safe, cache-friendly storage.
    pub struct NodeId;

    /// Unique identifier for an edge within a genome.
    pub struct EdgeId;
}

/// A node in the network graph.
///
/// Nodes are stored in a `SlotMap` arena owned by the genome. A node's role
/// (input, output, hidden) is tracked by the genome, not by the node itself.
/// The two value buffers implement synchronous activation: `next_value`
/// accumulates the tick in progress while `value` still holds the previous
/// tick's result, and the genome commits all nodes at once.
#[derive(Debug, Clone)]
pub struct Node {
    /// Constant added to the node's weighted input sum on every tick.
    pub bias: f64,
    /// Output of the most recently completed tick.
    pub(crate) value: f64,
    /// Accumulator for the tick in progress. Never read externally.
    pub(crate) next_value: f64,
    /// Edges that end at this node, in attachment order. Attachment order
    /// fixes the floating-point summation order.
    pub(crate) incoming: Vec<EdgeId>,
}

impl Node {
    /// Create a node with the given bias and zeroed activation state.
    #[must_use]
    pub(crate) fn new(bias: f64) -> Self {
        Self {
            bias,
            value: 0.0,
            next_value: 0.0,
            incoming: Vec::new(),
        }
    }

    /// The node's output after the most recently completed tick.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Ids of the edges that end at this node, in attachment order.
    #[must_use]
    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }

    /// Register an edge that ends at this node.
    ///
    /// Must always pair with [`detach_incoming`](Self::detach_incoming);
    /// only the genome's edge insertion/removal may call these.
    pub(crate) fn attach_incoming(&mut self, edge: EdgeId) {
        self.incoming.push(edge);
    }

    /// Deregister an edge that no longer ends at this node.
    pub(crate) fn detach_incoming(&mut self, edge: EdgeId) {
        if let Some(position) = self.incoming.iter().position(|&id| id == edge) {
            self.incoming.remove(position);
        }
    }
}

/// A directed, weighted connection between two nodes.
///
/// An edge carries `weight * source.value` into its target's accumulation.
/// Endpoints are immutable after creation: rewiring one would desynchronize
/// the target's incoming list, so edits go through the genome instead.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Multiplier applied to the source node's value.
    pub weight: f64,
    source: NodeId,
    target: NodeId,
    /// Creation-order stamp. Arena slots are reused after removals, so this
    /// is what keeps serialized edge indices in creation order.
    pub(crate) seq: u64,
}

impl Edge {
    /// Create an edge. The caller is responsible for attaching it to the
    /// target's incoming list.
    #[must_use]
    pub(crate) fn new(source: NodeId, target: NodeId, weight: f64, seq: u64) -> Self {
        Self {
            weight,
            source,
            target,
            seq,
        }
    }

    /// The node whose value this edge reads.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The node this edge feeds into.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.target
    }
}
