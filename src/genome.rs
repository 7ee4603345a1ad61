//! Genome construction, graph editing, and tick-based activation.
//!
//! The [`Genome`] uses SlotMap-based arena storage for nodes and edges,
//! providing cache-friendly access and safe generational ids instead of
//! shared references. All graph edits go through the genome so that an edge
//! is registered in its target's incoming list for exactly its lifetime.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::graph::{Edge, EdgeId, Node, NodeId};

/// Mutation policy applied when a genome produces offspring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeConfig {
    /// Standard deviation of the Gaussian noise added to every bias and
    /// weight of an offspring.
    pub value_mutation_deviation: f64,
    /// Probability that an offspring gains a new random edge.
    pub offspring_edge_chance: f64,
    /// Probability that an offspring splits an existing edge.
    pub offspring_split_chance: f64,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            value_mutation_deviation: 0.1,
            offspring_edge_chance: 0.6,
            offspring_split_chance: 0.5,
        }
    }
}

/// Draw from N(0, deviation).
pub(crate) fn gaussian<R: Rng>(rng: &mut R, deviation: f64) -> f64 {
    let unit: f64 = rng.sample(StandardNormal);
    deviation * unit
}

/// A recurrent network genome: a weighted directed graph evolved through
/// mutation and run one synchronous tick at a time.
///
/// Nodes are partitioned into inputs, outputs, and hidden nodes. Input and
/// output counts are fixed at construction; hidden nodes appear only through
/// [`add_hidden_node`](Self::add_hidden_node), edge splitting, or decoding a
/// record. Cycles and self-loops are permitted and run deterministically
/// because every tick reads only the previous tick's values.
#[derive(Debug, Clone)]
pub struct Genome {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) edges: SlotMap<EdgeId, Edge>,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) outputs: Vec<NodeId>,
    pub(crate) hidden: Vec<NodeId>,
    /// Stamp handed to the next edge; see [`Edge`] on encode ordering.
    pub(crate) next_edge_seq: u64,
    pub(crate) config: GenomeConfig,
}

impl Genome {
    /// Create a genome with the given input/output counts and no edges.
    ///
    /// Inputs start with bias 0 and keep it for life; each output draws its
    /// bias from N(0, 1).
    #[must_use]
    pub fn new<R: Rng>(input_count: usize, output_count: usize, rng: &mut R) -> Self {
        Self::with_config(input_count, output_count, GenomeConfig::default(), rng)
    }

    /// Create a genome with an explicit mutation policy.
    #[must_use]
    pub fn with_config<R: Rng>(
        input_count: usize,
        output_count: usize,
        config: GenomeConfig,
        rng: &mut R,
    ) -> Self {
        let mut genome = Self {
            nodes: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            inputs: Vec::with_capacity(input_count),
            outputs: Vec::with_capacity(output_count),
            hidden: Vec::new(),
            next_edge_seq: 0,
            config,
        };

        for _ in 0..input_count {
            let id = genome.nodes.insert(Node::new(0.0));
            genome.inputs.push(id);
        }
        for _ in 0..output_count {
            let id = genome.nodes.insert(Node::new(gaussian(rng, 1.0)));
            genome.outputs.push(id);
        }

        genome
    }

    /// Append a hidden node with the given bias.
    pub fn add_hidden_node(&mut self, bias: f64) -> NodeId {
        let id = self.nodes.insert(Node::new(bias));
        self.hidden.push(id);
        id
    }

    /// Insert an edge from `source` to `target` and attach it to `target`'s
    /// incoming list.
    ///
    /// Parallel edges between the same pair and self-loops are permitted.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is not a node of this genome.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> EdgeId {
        assert!(
            self.nodes.contains_key(source),
            "edge source is not a node of this genome"
        );
        assert!(
            self.nodes.contains_key(target),
            "edge target is not a node of this genome"
        );

        let seq = self.next_edge_seq;
        self.next_edge_seq += 1;

        let id = self.edges.insert(Edge::new(source, target, weight, seq));
        self.nodes[target].attach_incoming(id);
        id
    }

    /// Remove an edge, detaching it from its target's incoming list.
    ///
    /// Returns the removed edge, or `None` if the id is stale. Removal and
    /// detachment happen together; there is no way to end up with a dangling
    /// backlink.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(id)?;
        if let Some(target) = self.nodes.get_mut(edge.target()) {
            target.detach_incoming(id);
        }
        Some(edge)
    }

    /// Advance the network by exactly one synchronous tick.
    ///
    /// The input values are written directly to the input nodes, every node
    /// then computes `bias + sum(weight * source value)` over its incoming
    /// edges against the previous tick's values, and all nodes commit at
    /// once. Returns the output node values in declaration order.
    ///
    /// Values persist across calls, so cyclic structures behave as recurrent
    /// state; there is no implicit reset between ticks.
    ///
    /// # Errors
    ///
    /// Returns [`ActivateError::InvalidInputShape`] if `input_values` does
    /// not match the genome's input count. No node state is touched in that
    /// case.
    pub fn activate(&mut self, input_values: &[f64]) -> Result<Vec<f64>, ActivateError> {
        if input_values.len() != self.inputs.len() {
            return Err(ActivateError::InvalidInputShape {
                expected: self.inputs.len(),
                actual: input_values.len(),
            });
        }

        for (&id, &value) in self.inputs.iter().zip(input_values) {
            self.nodes[id].value = value;
        }

        // Accumulate every node against the previous tick's values. Nothing
        // is committed until all sums are done, which is what makes cycles
        // and self-loops well-defined.
        let order: Vec<NodeId> = self.node_order().collect();
        for &id in &order {
            let mut sum = self.nodes[id].bias;
            for &edge_id in &self.nodes[id].incoming {
                let edge = &self.edges[edge_id];
                sum += edge.weight * self.nodes[edge.source()].value;
            }
            self.nodes[id].next_value = sum;
        }

        for node in self.nodes.values_mut() {
            node.value = node.next_value;
            node.next_value = 0.0;
        }

        Ok(self.outputs.iter().map(|&id| self.nodes[id].value).collect())
    }

    /// Ids of input nodes, in declaration order.
    #[must_use]
    pub fn input_ids(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Ids of output nodes, in declaration order.
    #[must_use]
    pub fn output_ids(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Ids of hidden nodes, in the order they were added.
    #[must_use]
    pub fn hidden_ids(&self) -> &[NodeId] {
        &self.hidden
    }

    /// Total number of nodes across all roles.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges currently in the genome.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node, e.g. to pin a known bias.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Look up an edge by id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Mutable access to an edge, e.g. to pin a known weight.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    /// Iterate over all nodes with their ids, in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Iterate over all edges with their ids, in arena order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter()
    }

    /// The genome's mutation policy.
    #[must_use]
    pub fn config(&self) -> &GenomeConfig {
        &self.config
    }

    /// Mutable access to the mutation policy.
    pub fn config_mut(&mut self) -> &mut GenomeConfig {
        &mut self.config
    }

    /// Node ids in genome order: inputs, then outputs, then hidden. This
    /// order defines both the tick accumulation order and record indices.
    pub(crate) fn node_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .chain(&self.hidden)
            .copied()
    }
}

/// Error type for activation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivateError {
    /// The input vector's length does not match the genome's input count.
    InvalidInputShape {
        /// The genome's declared input count.
        expected: usize,
        /// The length of the vector the caller passed.
        actual: usize,
    },
}

impl std::fmt::Display for ActivateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivateError::InvalidInputShape { expected, actual } => {
                write!(
                    f,
                    "input length {} does not fit a network with {} input nodes",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for ActivateError {}
