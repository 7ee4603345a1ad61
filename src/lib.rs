//! # Tick NEAT
//!
//! A recurrent NEAT-style (`NeuroEvolution` of Augmenting Topologies) genome:
//! a weighted directed graph that is run one synchronous tick at a time and
//! evolved through stochastic structural mutation.
//!
//! ## Features
//!
//! - **Double-Buffered Activation**: every node updates against the previous
//!   tick's values, so cycles and self-loops are well-defined and the graph
//!   behaves as a recurrent network across successive calls
//! - **Arena-Graph Model**: cache-friendly `SlotMap` storage for nodes and
//!   edges; edge removal and target backlinks stay consistent by construction
//! - **Asexual Reproduction**: offspring are deep copies perturbed with
//!   Gaussian value noise, random edge insertion, and edge splitting
//! - **Portable Records**: positional-index serialization via Serde, with a
//!   wire shape that is stable across tooling and process boundaries
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tick_neat::Genome;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! // Two inputs, one output, no structure yet.
//! let mut genome = Genome::new(2, 1, &mut rng);
//!
//! // Grow some topology.
//! genome.add_random_edge(1.0, &mut rng);
//! genome.split_random_edge(1.0, &mut rng);
//!
//! // Drive the network one tick at a time.
//! let outputs = genome.activate(&[0.5, -0.5]).unwrap();
//! assert_eq!(outputs.len(), 1);
//!
//! // Reproduce asexually; the parent is untouched.
//! let child = genome.get_offspring(&mut rng);
//! assert!(child.node_count() >= genome.node_count());
//! ```
//!
//! ## Activation Model
//!
//! One call to [`Genome::activate`] advances the whole network by exactly
//! one tick. Each node's new value is its bias plus the weighted sum of its
//! incoming edges, where every source value is read from the previous tick.
//! There is no nonlinearity and no implicit reset between ticks: feeding a
//! sequence of inputs through repeated calls runs the graph as a linear
//! recurrent network.
//!
//! ## Records
//!
//! [`Genome::to_record`] and [`Genome::from_record`] convert genomes to and
//! from [`GenomeRecord`], which indexes nodes positionally (inputs, then
//! outputs, then hidden) and edges in creation order. Decoding validates the
//! record and rejects inconsistent data with a [`RecordError`].

pub mod genome;
pub mod graph;
mod mutation;
pub mod record;

// Re-exports for convenience
pub use genome::{ActivateError, Genome, GenomeConfig};
pub use graph::{Edge, EdgeId, Node, NodeId};
pub use record::{EdgeRecord, GenomeRecord, NodeRecord, RecordError};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_evolution_smoke() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut genome = Genome::new(3, 2, &mut rng);

        for _ in 0..20 {
            genome = genome.get_offspring(&mut rng);
        }

        let outputs = genome.activate(&[0.1, -0.2, 0.3]).unwrap();
        assert_eq!(outputs.len(), 2);
        for value in outputs {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_record_roundtrip_preserves_structure() {
        let mut rng = ChaCha8Rng::seed_from_u64(123);
        let mut genome = Genome::new(3, 2, &mut rng);
        genome.add_random_edge(1.0, &mut rng);
        genome.add_random_edge(1.0, &mut rng);
        genome.split_random_edge(1.0, &mut rng);

        let restored = Genome::from_record(&genome.to_record()).unwrap();

        assert_eq!(restored.node_count(), genome.node_count());
        assert_eq!(restored.edge_count(), genome.edge_count());
        assert_eq!(restored.input_ids().len(), genome.input_ids().len());
        assert_eq!(restored.output_ids().len(), genome.output_ids().len());
        assert_eq!(restored.hidden_ids().len(), genome.hidden_ids().len());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let build = || {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let mut genome = Genome::new(2, 1, &mut rng);
            for _ in 0..10 {
                genome = genome.get_offspring(&mut rng);
            }
            genome.to_record()
        };

        assert_eq!(build(), build());
    }
}
