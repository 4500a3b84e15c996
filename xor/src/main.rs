use bitevo::logging::{EvolutionLogger, ReportingLevel, Stats};
use bitevo::operators::{CrossoverScheme, SelectionScheme};
use bitevo::{Population, PopulationConfig};
use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
use bitevo_nn::networks::Network;

use std::num::NonZeroUsize;

use rayon::prelude::*;

const TARGET_FITNESS: f64 = 3.6;
const MAX_GENERATIONS: usize = 200;

fn evaluate_xor(network: &Network) -> f64 {
    let values = [
        ([0.0, 0.0], 0),
        ([0.0, 1.0], 1),
        ([1.0, 0.0], 1),
        ([1.0, 1.0], 0),
    ];

    values
        .iter()
        .map(|(input, class)| match network.evaluate(input) {
            Ok(outputs) => outputs[*class],
            Err(_) => 0.0,
        })
        .sum()
}

fn main() {
    env_logger::init();

    let genetic_config = GeneticConfig {
        bits_per_weight: 10,
        min_weight: -6.0,
        max_weight: 6.0,
        ..GeneticConfig::new(2, HiddenLayers::Single(2), 2)
    };
    let population_config = PopulationConfig {
        size: NonZeroUsize::new(150).unwrap(),
        num_parents: NonZeroUsize::new(2).unwrap(),
        num_offspring: NonZeroUsize::new(2).unwrap(),
        selection: SelectionScheme::Tournament {
            size: NonZeroUsize::new(3).unwrap(),
        },
        crossover: CrossoverScheme::Uniform,
        crossover_chance: 0.9,
        mutation_rate: 0.01,
        elitism: 2,
        seed: Some(1),
    };

    champion_test(&genetic_config, &population_config);
    stress_test(&genetic_config, &population_config);
}

/// Runs until the target fitness is reached or the generation
/// limit is hit, returning the generation that reached it.
fn run(
    population: &mut Population<GeneticConfig, Network>,
    mut logger: Option<&mut EvolutionLogger<Network>>,
) -> Option<usize> {
    for _ in 0..MAX_GENERATIONS {
        if let Err(e) = population.evaluate_fitness_par(evaluate_xor) {
            eprintln!("{}", e);
            return None;
        }
        if let Some(logger) = logger.as_deref_mut() {
            logger.log(population);
        }
        if matches!(population.champion(), Some((_, f)) if f >= TARGET_FITNESS) {
            return Some(population.generation());
        }
        if let Err(e) = population.evolve() {
            eprintln!("{}", e);
            return None;
        }
    }
    None
}

fn champion_test(genetic_config: &GeneticConfig, population_config: &PopulationConfig) {
    let mut population = match Population::new(population_config.clone(), genetic_config.clone()) {
        Ok(population) => population,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    let mut logger = EvolutionLogger::new(ReportingLevel::Champion);

    match run(&mut population, Some(&mut logger)) {
        Some(generation) => println!("Solved XOR in generation {}", generation),
        None => println!("No solution within {} generations", MAX_GENERATIONS),
    }
    log::info!("logged {} generations", logger.iter().count());
    if let Some(log) = logger.iter().last() {
        println!("{}", log);
    }

    let (champion, fitness) = match population.champion() {
        Some(champion) => champion,
        None => return,
    };
    println!("Champion ({:.4}): {}", fitness, champion);
    for input in [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]] {
        if let Ok(outputs) = champion.evaluate(&input) {
            println!("  {:?} -> {:.3?}", input, outputs);
        }
    }

    match ron::to_string(champion) {
        Ok(serialized) => println!("{}", serialized),
        Err(e) => eprintln!("{}", e),
    }
}

fn stress_test(genetic_config: &GeneticConfig, population_config: &PopulationConfig) {
    const ITERATIONS: u64 = 50;

    let generations: Vec<Option<usize>> = (0..ITERATIONS)
        .into_par_iter()
        .map(|seed| {
            let config = PopulationConfig {
                seed: Some(seed),
                ..population_config.clone()
            };
            let mut population = Population::new(config, genetic_config.clone()).ok()?;
            run(&mut population, None)
        })
        .collect();

    println!(
        "Successful run generation count {:?}, {}% failure rate over {} iterations",
        Stats::from(generations.iter().filter_map(|g| g.map(|g| g as f64))),
        generations.iter().filter(|g| g.is_none()).count() as f64 * 100.0 / ITERATIONS as f64,
        ITERATIONS
    );
}
