//! Hill-climbing a linear map with asexual reproduction.
//!
//! The target is y = 0.5*x1 - 2.0*x2 + 1.0. Networks here compute pure
//! weighted sums, so an exact solution is reachable; a champion genome
//! breeds a batch of offspring each generation and is replaced whenever a
//! child scores better.
//!
//! Run with: `cargo run --example hill_climb`

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tick_neat::Genome;

/// Output after four settling ticks on a fresh clone, so signals have time
/// to cross hidden hops and no recurrent state leaks between samples.
fn settled_output(genome: &Genome, input: &[f64; 2]) -> f64 {
    let mut net = genome.clone();
    let mut output = 0.0;
    for _ in 0..4 {
        output = net.activate(input).unwrap()[0];
    }
    output
}

/// Mean squared error of `genome` against the target over a sample grid.
fn mean_squared_error(genome: &Genome, samples: &[([f64; 2], f64)]) -> f64 {
    let total: f64 = samples
        .iter()
        .map(|(input, expected)| (settled_output(genome, input) - expected).powi(2))
        .sum();
    total / samples.len() as f64
}

fn target(x1: f64, x2: f64) -> f64 {
    0.5 * x1 - 2.0 * x2 + 1.0
}

fn main() {
    println!("Hill Climbing a Linear Map");
    println!("==========================\n");

    let generations = 300;
    let offspring_per_generation = 16;
    let seed = 42;

    // Sample the target on a 5x5 grid over [-1, 1]^2.
    let grid = [-1.0, -0.5, 0.0, 0.5, 1.0];
    let mut samples = Vec::new();
    for &x1 in &grid {
        for &x2 in &grid {
            samples.push(([x1, x2], target(x1, x2)));
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut champion = Genome::new(2, 1, &mut rng);
    let mut champion_error = mean_squared_error(&champion, &samples);

    println!("Target: y = 0.5*x1 - 2.0*x2 + 1.0");
    println!("Offspring per generation: {}", offspring_per_generation);
    println!("Starting error: {:.6}\n", champion_error);

    // Evolution loop
    let mut solved_at = None;

    for gen in 0..generations {
        for _ in 0..offspring_per_generation {
            let child = champion.get_offspring(&mut rng);
            let error = mean_squared_error(&child, &samples);
            if error < champion_error {
                champion = child;
                champion_error = error;
            }
        }

        if champion_error < 1e-4 && solved_at.is_none() {
            solved_at = Some(gen);
        }

        // Print progress every 30 generations
        if gen % 30 == 0 || gen == generations - 1 {
            println!(
                "Gen {:3}: error={:.6}, nodes={}, edges={}",
                gen,
                champion_error,
                champion.node_count(),
                champion.edge_count()
            );
        }
    }

    println!();

    // Final results
    println!("Evolution Complete!");
    println!("==================");
    println!("Final error: {:.6}", champion_error);
    println!("Nodes: {}", champion.node_count());
    println!("Edges: {}", champion.edge_count());
    println!("Hidden nodes: {}", champion.hidden_ids().len());

    if let Some(gen) = solved_at {
        println!("Error dropped below 1e-4 at generation: {}", gen);
    }

    // Test the champion
    println!("\nChampion predictions:");
    let spot_checks = [[-1.0, -1.0], [-1.0, 1.0], [0.0, 0.0], [1.0, -1.0], [1.0, 1.0]];

    for input in &spot_checks {
        let expected = target(input[0], input[1]);
        let output = settled_output(&champion, input);
        let status = if (output - expected).abs() < 0.05 {
            "✓"
        } else {
            "✗"
        };
        println!(
            "  f({:+.1}, {:+.1}) = {:+.4} (target {:+.4}) {}",
            input[0], input[1], output, expected, status
        );
    }
}
