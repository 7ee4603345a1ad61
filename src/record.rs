//! Genome serialization to and from an explicit record schema.
//!
//! Records address nodes by their genome-order position (inputs, then
//! outputs, then hidden) and edges by creation order, with decimal-string
//! map keys. The field names and shape are the crate's wire contract:
//! genomes stored by other tooling decode here and vice versa.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::genome::{Genome, GenomeConfig};
use crate::graph::{Edge, Node, NodeId};

/// Serialized form of a [`Genome`].
///
/// `BTreeMap` keeps key order deterministic, so encoding the same genome
/// twice produces identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeRecord {
    /// Number of input nodes; indices `0..input_count` in genome order.
    pub input_count: usize,
    /// Number of output nodes; they follow the inputs in genome order.
    pub output_count: usize,
    /// Total number of nodes; must equal the size of `nodes`.
    pub node_count: usize,
    /// Total number of edges; must equal the size of `edges`.
    pub edge_count: usize,
    /// Node entries keyed by decimal genome-order index.
    pub nodes: BTreeMap<String, NodeRecord>,
    /// Edge entries keyed by decimal creation-order index.
    pub edges: BTreeMap<String, EdgeRecord>,
}

/// One node's bias and role flags. Exactly one flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// The node's bias; always 0 for inputs.
    pub bias: f64,
    /// Set when the node is an input.
    pub is_input: bool,
    /// Set when the node is an output.
    pub is_output: bool,
    /// Set when the node is hidden.
    pub is_hidden: bool,
}

/// One edge's weight and positional endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Multiplier applied to the source node's value.
    pub weight: f64,
    /// Genome-order index of the source node.
    pub start: usize,
    /// Genome-order index of the target node.
    pub end: usize,
}

/// Error type for record decoding failures.
///
/// Malformed records are rejected outright; decoding never patches an
/// inconsistent record into a genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// `node_count` does not match the number of node entries.
    NodeCountMismatch { declared: usize, found: usize },
    /// `edge_count` does not match the number of edge entries.
    EdgeCountMismatch { declared: usize, found: usize },
    /// The declared input and output counts do not fit in `node_count`.
    RoleCountsExceedNodes {
        input_count: usize,
        output_count: usize,
        node_count: usize,
    },
    /// A node index in `0..node_count` has no entry.
    MissingNode(usize),
    /// An edge index in `0..edge_count` has no entry.
    MissingEdge(usize),
    /// A node's role flags disagree with its genome-order position.
    NodeRoleMismatch { index: usize },
    /// An edge endpoint points past the node sequence.
    EdgeEndpointOutOfRange {
        edge: usize,
        endpoint: usize,
        node_count: usize,
    },
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::NodeCountMismatch { declared, found } => {
                write!(f, "node_count {} does not match {} node entries", declared, found)
            }
            RecordError::EdgeCountMismatch { declared, found } => {
                write!(f, "edge_count {} does not match {} edge entries", declared, found)
            }
            RecordError::RoleCountsExceedNodes {
                input_count,
                output_count,
                node_count,
            } => write!(
                f,
                "{} inputs and {} outputs do not fit in node_count {}",
                input_count, output_count, node_count
            ),
            RecordError::MissingNode(index) => {
                write!(f, "node index {} is missing from the record", index)
            }
            RecordError::MissingEdge(index) => {
                write!(f, "edge index {} is missing from the record", index)
            }
            RecordError::NodeRoleMismatch { index } => {
                write!(f, "role flags of node {} do not match its position", index)
            }
            RecordError::EdgeEndpointOutOfRange {
                edge,
                endpoint,
                node_count,
            } => write!(
                f,
                "edge {} references node {}, but the record has {} nodes",
                edge, endpoint, node_count
            ),
        }
    }
}

impl std::error::Error for RecordError {}

impl Genome {
    /// Encode the genome into its record form.
    ///
    /// Only the evolvable parameters are captured: biases, weights, and the
    /// graph shape. Activation state and the mutation policy stay behind.
    #[must_use]
    pub fn to_record(&self) -> GenomeRecord {
        let order: Vec<NodeId> = self.node_order().collect();
        let index_of: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut nodes = BTreeMap::new();
        for (index, &id) in order.iter().enumerate() {
            nodes.insert(
                index.to_string(),
                NodeRecord {
                    bias: self.nodes[id].bias,
                    is_input: self.inputs.contains(&id),
                    is_output: self.outputs.contains(&id),
                    is_hidden: self.hidden.contains(&id),
                },
            );
        }

        // Arena slots are reused after removals; the seq stamp restores
        // creation order.
        let mut by_creation: Vec<&Edge> = self.edges.values().collect();
        by_creation.sort_by_key(|edge| edge.seq);

        let mut edges = BTreeMap::new();
        for (index, edge) in by_creation.iter().enumerate() {
            edges.insert(
                index.to_string(),
                EdgeRecord {
                    weight: edge.weight,
                    start: index_of[&edge.source()],
                    end: index_of[&edge.target()],
                },
            );
        }

        GenomeRecord {
            input_count: self.inputs.len(),
            output_count: self.outputs.len(),
            node_count: order.len(),
            edge_count: by_creation.len(),
            nodes,
            edges,
        }
    }

    /// Decode a record into a fresh genome.
    ///
    /// Nodes are rebuilt positionally: inputs (bias pinned to 0), then
    /// outputs and hidden nodes with their recorded biases, then edges in
    /// creation order. The decoded genome starts with zeroed activation
    /// state and a default [`GenomeConfig`]; records do not carry either.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if counts, indices, role flags, or edge
    /// endpoints are inconsistent.
    pub fn from_record(record: &GenomeRecord) -> Result<Genome, RecordError> {
        if record.nodes.len() != record.node_count {
            return Err(RecordError::NodeCountMismatch {
                declared: record.node_count,
                found: record.nodes.len(),
            });
        }
        if record.edges.len() != record.edge_count {
            return Err(RecordError::EdgeCountMismatch {
                declared: record.edge_count,
                found: record.edges.len(),
            });
        }
        // An overflowing sum cannot fit in node_count either.
        let output_end = record
            .input_count
            .checked_add(record.output_count)
            .filter(|&roles| roles <= record.node_count)
            .ok_or(RecordError::RoleCountsExceedNodes {
                input_count: record.input_count,
                output_count: record.output_count,
                node_count: record.node_count,
            })?;

        let mut genome = Genome {
            nodes: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            inputs: Vec::with_capacity(record.input_count),
            outputs: Vec::with_capacity(record.output_count),
            hidden: Vec::new(),
            next_edge_seq: 0,
            config: GenomeConfig::default(),
        };

        let input_end = record.input_count;
        let mut ids: Vec<NodeId> = Vec::with_capacity(record.node_count);

        for index in 0..record.node_count {
            let node = record
                .nodes
                .get(&index.to_string())
                .ok_or(RecordError::MissingNode(index))?;

            let id = if index < input_end {
                if !node.is_input || node.is_output || node.is_hidden {
                    return Err(RecordError::NodeRoleMismatch { index });
                }
                // Inputs are bias-0 by construction on every path; a
                // recorded input bias is ignored.
                let id = genome.nodes.insert(Node::new(0.0));
                genome.inputs.push(id);
                id
            } else if index < output_end {
                if node.is_input || !node.is_output || node.is_hidden {
                    return Err(RecordError::NodeRoleMismatch { index });
                }
                let id = genome.nodes.insert(Node::new(node.bias));
                genome.outputs.push(id);
                id
            } else {
                if node.is_input || node.is_output || !node.is_hidden {
                    return Err(RecordError::NodeRoleMismatch { index });
                }
                genome.add_hidden_node(node.bias)
            };
            ids.push(id);
        }

        for index in 0..record.edge_count {
            let edge = record
                .edges
                .get(&index.to_string())
                .ok_or(RecordError::MissingEdge(index))?;

            if edge.start >= ids.len() {
                return Err(RecordError::EdgeEndpointOutOfRange {
                    edge: index,
                    endpoint: edge.start,
                    node_count: ids.len(),
                });
            }
            if edge.end >= ids.len() {
                return Err(RecordError::EdgeEndpointOutOfRange {
                    edge: index,
                    endpoint: edge.end,
                    node_count: ids.len(),
                });
            }

            genome.add_edge(ids[edge.start], ids[edge.end], edge.weight);
        }

        tracing::debug!(
            nodes = record.node_count,
            edges = record.edge_count,
            "decoded genome record"
        );
        Ok(genome)
    }
}
