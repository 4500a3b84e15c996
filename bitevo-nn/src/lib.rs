//! # BitEvo-NN
//! Binary-encoded feed-forward neural networks implementing
//! the [`bitevo` crate](https://crates.io/crates/bitevo)'s `Genome` trait.
//!
//! Provides the [`genomics`] module, which fixes how a network's
//! weights are quantized into a chromosome, and the [`Network`]
//! type, which decodes a chromosome and evaluates inputs with
//! sigmoid hidden units and a softmax output layer.
//!
//! [`Network`]: crate::networks::Network
//!
//! # Example usage: Evolution of an XOR classifier
//! ```
//! use bitevo::{Population, PopulationConfig};
//! use bitevo::operators::{CrossoverScheme, SelectionScheme};
//! use bitevo_nn::{
//!     genomics::{GeneticConfig, HiddenLayers},
//!     networks::Network,
//! };
//! use serde_json;
//! use std::num::NonZeroUsize;
//!
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
//!         min_weight: -4.0,
//!         max_weight: 4.0,
//!         ..GeneticConfig::new(2, HiddenLayers::Single(2), 2)
//!     };
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(50).unwrap(),
//!         num_parents: NonZeroUsize::new(10).unwrap(),
//!         selection: SelectionScheme::Rank,
//!         crossover: CrossoverScheme::TwoPoint,
//!         crossover_chance: 0.8,
//!         mutation_rate: 0.01,
//!         seed: Some(7),
//!         ..PopulationConfig::zero()
//!     };
//!
//!     let mut population = Population::<_, Network>::new(population_config, genetic_config).unwrap();
//!     for _ in 0..10 {
//!         population.evaluate_fitness_par(evaluate_xor).unwrap();
//!         population.evolve().unwrap();
//!     }
//!     population.evaluate_fitness(evaluate_xor).unwrap();
//!
//!     let (champion, fitness) = population.champion().unwrap();
//!     assert!(fitness <= 4.0);
//!     println!("{}", serde_json::to_string(champion).unwrap());
//! }
//! ```
pub mod genomics;
pub mod networks;
