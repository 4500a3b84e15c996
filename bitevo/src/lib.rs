//! A genetic algorithm over fixed-width binary chromosomes.
//!
//! Individuals are any type implementing the [`Genome`] trait: something
//! that can be decoded from a [`Chromosome`] under a configuration. A
//! [`Population`] of them is scored by a caller-supplied fitness function
//! and advanced through [selection], [crossover] and [mutation], one
//! generation at a time. All randomness flows from a single seedable
//! generator, so runs with a configured seed are reproducible.
//!
//! Binary-encoded feed-forward neural networks are supplied via the
//! `bitevo-nn` crate.
//!
//! [selection]: operators::select
//! [crossover]: operators::crossover
//! [mutation]: operators::mutate
//!
//! # Example usage: Evolution of an XOR classifier, using `bitevo-nn`
//! ```
//! use bitevo::{Population, PopulationConfig};
//! use bitevo::operators::{CrossoverScheme, SelectionScheme};
//! use bitevo_nn::{
//!     genomics::{GeneticConfig, HiddenLayers},
//!     networks::Network,
//! };
//! use std::num::NonZeroUsize;
//!
//! // Fitness is the probability mass placed on the right class.
//! fn evaluate_xor(network: &Network) -> f64 {
//!     let cases = [
//!         ([0.0, 0.0], 0),
//!         ([0.0, 1.0], 1),
//!         ([1.0, 0.0], 1),
//!         ([1.0, 1.0], 0),
//!     ];
//!     cases
//!         .iter()
//!         .map(|(input, class)| network.evaluate(input).unwrap()[*class])
//!         .sum()
//! }
//!
//! fn main() {
//!     let genetic_config = GeneticConfig {
//!         bits_per_weight: 8,
//!         min_weight: -5.0,
//!         max_weight: 5.0,
//!         ..GeneticConfig::new(2, HiddenLayers::Single(3), 2)
//!     };
//!
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(100).unwrap(),
//!         num_parents: NonZeroUsize::new(2).unwrap(),
//!         num_offspring: NonZeroUsize::new(2).unwrap(),
//!         selection: SelectionScheme::Tournament {
//!             size: NonZeroUsize::new(3).unwrap(),
//!         },
//!         crossover: CrossoverScheme::Uniform,
//!         crossover_chance: 0.9,
//!         mutation_rate: 0.008,
//!         elitism: 2,
//!         seed: Some(42),
//!     };
//!
//!     let mut population = Population::<_, Network>::new(population_config, genetic_config).unwrap();
//!     for _ in 0..20 {
//!         population.evaluate_fitness(evaluate_xor).unwrap();
//!         let (_, fitness) = population.champion().unwrap();
//!         if fitness > 3.6 {
//!             println!("Solution found in generation {}", population.generation());
//!             break;
//!         }
//!         population.evolve().unwrap();
//!     }
//! }
//! ```

mod chromosome;
mod errors;
mod genome;
pub mod operators;
mod populations;
mod rng;

pub use chromosome::Chromosome;
pub use errors::{Error, Result};
pub use genome::{Genome, Identity};
pub use populations::*;
