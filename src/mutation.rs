//! Stochastic mutation operators and asexual reproduction.
//!
//! Structural mutation follows the classic NEAT moves: inserting a random
//! edge and splitting an existing edge through a new hidden node. Numeric
//! mutation perturbs every bias and weight with Gaussian noise. Every
//! operator rolls a single draw against its `chance` threshold and is a
//! no-op when the draw fails; all randomness comes from a caller-supplied
//! [`Rng`], so seeded runs are reproducible.

use rand::Rng;

use crate::genome::{gaussian, Genome};
use crate::graph::{EdgeId, NodeId};

impl Genome {
    /// Perturb every hidden and output bias and every edge weight with an
    /// independent N(0, deviation) sample.
    ///
    /// Input biases are never touched; the pass does not visit them.
    pub fn mutate_all_values<R: Rng>(&mut self, deviation: f64, rng: &mut R) {
        for &id in self.hidden.iter().chain(&self.outputs) {
            self.nodes[id].bias += gaussian(rng, deviation);
        }
        for edge in self.edges.values_mut() {
            edge.weight += gaussian(rng, deviation);
        }
    }

    /// With probability `chance`, add an edge between random nodes.
    ///
    /// The source is drawn from all nodes, the target from hidden and output
    /// nodes only (inputs stay source-only), and the weight from N(0, 1).
    /// No duplicate check is made: repeated calls can stack parallel edges
    /// between the same pair, and their contributions accumulate.
    ///
    /// Returns the new edge's id, or `None` when the draw fails or the
    /// genome has no legal endpoints.
    pub fn add_random_edge<R: Rng>(&mut self, chance: f64, rng: &mut R) -> Option<EdgeId> {
        if rng.random::<f64>() > chance {
            return None;
        }

        let sources: Vec<NodeId> = self.node_order().collect();
        let targets: Vec<NodeId> = self.hidden.iter().chain(&self.outputs).copied().collect();
        if sources.is_empty() || targets.is_empty() {
            return None;
        }

        let source = sources[rng.random_range(0..sources.len())];
        let target = targets[rng.random_range(0..targets.len())];
        let weight = gaussian(rng, 1.0);

        let id = self.add_edge(source, target, weight);
        tracing::debug!(?source, ?target, weight, "added random edge");
        Some(id)
    }

    /// With probability `chance`, split a random existing edge.
    ///
    /// The chosen edge `a -> b` is replaced by `a -> new -> b` through a
    /// fresh hidden node; the new bias and both weights are drawn from
    /// N(0, 1). Net effect: one more node, one more edge, and the direct
    /// edge is gone.
    ///
    /// Returns the new node's id, or `None` when the draw fails or the
    /// genome has no edges.
    pub fn split_random_edge<R: Rng>(&mut self, chance: f64, rng: &mut R) -> Option<NodeId> {
        if rng.random::<f64>() > chance {
            return None;
        }

        let edge_ids: Vec<EdgeId> = self.edges.keys().collect();
        if edge_ids.is_empty() {
            return None;
        }

        let edge_id = edge_ids[rng.random_range(0..edge_ids.len())];
        let (source, target) = {
            let edge = &self.edges[edge_id];
            (edge.source(), edge.target())
        };

        let node = self.add_hidden_node(gaussian(rng, 1.0));
        self.add_edge(source, node, gaussian(rng, 1.0));
        self.add_edge(node, target, gaussian(rng, 1.0));
        self.remove_edge(edge_id);

        tracing::debug!(?source, ?target, new_node = ?node, "split edge");
        Some(node)
    }

    /// Produce a mutated deep copy of this genome; the parent is never
    /// modified.
    ///
    /// The copy receives Gaussian noise on every bias and weight, then one
    /// chance at a new random edge and one at an edge split, using the
    /// thresholds in the genome's [`GenomeConfig`](crate::GenomeConfig).
    #[must_use]
    pub fn get_offspring<R: Rng>(&self, rng: &mut R) -> Genome {
        let mut offspring = self.clone();
        offspring.mutate_all_values(self.config.value_mutation_deviation, rng);
        offspring.add_random_edge(self.config.offspring_edge_chance, rng);
        offspring.split_random_edge(self.config.offspring_split_chance, rng);
        offspring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_mutate_all_values_skips_inputs() {
        let mut rng = test_rng();
        let mut genome = Genome::new(2, 1, &mut rng);
        let hidden = genome.add_hidden_node(0.25);
        let output = genome.output_ids()[0];
        let edge = genome.add_edge(genome.input_ids()[0], output, 1.0);

        let output_bias = genome.node(output).unwrap().bias;

        genome.mutate_all_values(0.1, &mut rng);

        for &id in genome.input_ids() {
            assert_eq!(genome.node(id).unwrap().bias, 0.0);
        }
        assert_ne!(genome.node(hidden).unwrap().bias, 0.25);
        assert_ne!(genome.node(output).unwrap().bias, output_bias);
        assert_ne!(genome.edge(edge).unwrap().weight, 1.0);
    }

    #[test]
    fn test_add_random_edge_never_targets_inputs() {
        let mut rng = test_rng();
        let mut genome = Genome::new(2, 2, &mut rng);

        for round in 0..100 {
            let id = genome.add_random_edge(1.0, &mut rng).unwrap();
            assert_eq!(genome.edge_count(), round + 1);

            let target = genome.edge(id).unwrap().target();
            assert!(!genome.input_ids().contains(&target));
        }
    }

    #[test]
    fn test_add_random_edge_without_targets_is_noop() {
        let mut rng = test_rng();
        let mut genome = Genome::new(3, 0, &mut rng);

        assert!(genome.add_random_edge(1.0, &mut rng).is_none());
        assert_eq!(genome.edge_count(), 0);
    }

    #[test]
    fn test_split_random_edge_requires_an_edge() {
        let mut rng = test_rng();
        let mut genome = Genome::new(2, 1, &mut rng);

        assert!(genome.split_random_edge(1.0, &mut rng).is_none());
        assert_eq!(genome.node_count(), 3);
    }

    #[test]
    fn test_split_replaces_edge_with_two_hop_path() {
        let mut rng = test_rng();
        let mut genome = Genome::new(1, 1, &mut rng);
        let input = genome.input_ids()[0];
        let output = genome.output_ids()[0];
        let original = genome.add_edge(input, output, 3.0);

        let node = genome.split_random_edge(1.0, &mut rng).unwrap();

        assert_eq!(genome.node_count(), 3);
        assert_eq!(genome.edge_count(), 2);
        assert!(genome.edge(original).is_none());
        assert!(genome
            .edges()
            .any(|(_, e)| e.source() == input && e.target() == node));
        assert!(genome
            .edges()
            .any(|(_, e)| e.source() == node && e.target() == output));
        assert!(!genome
            .edges()
            .any(|(_, e)| e.source() == input && e.target() == output));
    }

    #[test]
    fn test_split_self_loop_keeps_loop_through_new_node() {
        let mut rng = test_rng();
        let mut genome = Genome::new(1, 1, &mut rng);
        let hidden = genome.add_hidden_node(0.0);
        genome.add_edge(hidden, hidden, 0.5);

        let node = genome.split_random_edge(1.0, &mut rng).unwrap();

        assert_eq!(genome.edge_count(), 2);
        assert!(genome
            .edges()
            .any(|(_, e)| e.source() == hidden && e.target() == node));
        assert!(genome
            .edges()
            .any(|(_, e)| e.source() == node && e.target() == hidden));
    }

    #[test]
    fn test_get_offspring_leaves_parent_untouched() {
        let mut rng = test_rng();
        let mut genome = Genome::new(2, 1, &mut rng);
        genome.add_random_edge(1.0, &mut rng);
        genome.split_random_edge(1.0, &mut rng);

        let node_count = genome.node_count();
        let edge_count = genome.edge_count();
        let weights: Vec<f64> = genome.edges().map(|(_, e)| e.weight).collect();

        for _ in 0..10 {
            let _offspring = genome.get_offspring(&mut rng);
        }

        assert_eq!(genome.node_count(), node_count);
        assert_eq!(genome.edge_count(), edge_count);
        let after: Vec<f64> = genome.edges().map(|(_, e)| e.weight).collect();
        assert_eq!(weights, after);
    }

    #[test]
    fn test_offspring_uses_config_thresholds() {
        let mut rng = test_rng();
        let mut genome = Genome::new(2, 1, &mut rng);
        genome.add_edge(genome.input_ids()[0], genome.output_ids()[0], 1.0);

        // Force both structural mutations on every offspring.
        genome.config_mut().offspring_edge_chance = 1.0;
        genome.config_mut().offspring_split_chance = 1.0;

        let offspring = genome.get_offspring(&mut rng);
        assert_eq!(offspring.node_count(), genome.node_count() + 1);
        assert_eq!(offspring.edge_count(), genome.edge_count() + 2);
    }
}
