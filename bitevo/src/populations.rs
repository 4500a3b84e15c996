//! A Population is a fixed-size, ordered collection of
//! individuals sharing one genetic configuration. It is
//! advanced one generation at a time: fitness evaluation,
//! then selection, crossover and mutation of chromosomes,
//! and finally materialization of the next generation.
mod config;
pub mod logging;

pub use config::PopulationConfig;

use crate::operators::{crossover, mutate, select};
use crate::rng::{roll, seeded_rng};
use crate::{Chromosome, Error, Genome, Identity, Result};

use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a population stands within its current generation.
///
/// Selection, recombination and mutation happen inside
/// [`Population::evolve`], which returns the population to
/// `Initialized` with its generation number incremented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationState {
    /// Members exist but have not been scored.
    Initialized,
    /// Every member has a fitness score.
    Evaluated,
}

/// A population of genomes.
pub struct Population<C, G> {
    members: Vec<G>,
    fitness: Option<Vec<f64>>,
    generation: usize,
    population_config: PopulationConfig,
    genetic_config: C,
    rng: ChaCha8Rng,
}

impl<C, G> Population<C, G>
where
    G: Genome<Config = C>,
{
    /// Creates a new population of random chromosomes
    /// using the passed configurations.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid, or if
    /// any individual fails to decode.
    ///
    /// # Examples
    /// ```
    /// use bitevo::{Genome, Population, PopulationConfig};
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    /// use bitevo_nn::networks::Network;
    /// use std::num::NonZeroUsize;
    ///
    /// let population = Population::<_, Network>::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(20).unwrap(),
    ///         seed: Some(1),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     GeneticConfig::new(2, HiddenLayers::Single(2), 2),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(population.genomes().count(), 20);
    /// assert!(population.genomes().all(|n| n.chromosome().len() == 96));
    /// ```
    pub fn new(population_config: PopulationConfig, genetic_config: C) -> Result<Population<C, G>> {
        Self::new_seeded(vec![], population_config, genetic_config)
    }

    /// Creates a new population using the passed configurations,
    /// and seeds it with the specified chromosomes. If the number
    /// of seed chromosomes is smaller than the configured
    /// population size, the remaining space is filled with
    /// random chromosomes.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if there are more
    /// seed chromosomes than the configured population size, and a
    /// [`LengthMismatch`](Error::LengthMismatch) error if any seed
    /// has the wrong length for `genetic_config`.
    ///
    /// # Examples
    /// ```
    /// use bitevo::{Chromosome, Genome, Population, PopulationConfig};
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    /// use bitevo_nn::networks::Network;
    /// use std::num::NonZeroUsize;
    ///
    /// let genetic_config = GeneticConfig::new(2, HiddenLayers::Single(2), 2);
    /// let zeros = Chromosome::from_bits(vec![false; 96]);
    ///
    /// let population = Population::<_, Network>::new_seeded(
    ///     vec![zeros.clone()],
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(5).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     genetic_config,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(population.genomes().next().unwrap().chromosome(), &zeros);
    /// assert_eq!(population.genomes().count(), 5);
    /// ```
    pub fn new_seeded(
        chromosomes: Vec<Chromosome>,
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, G>> {
        population_config.validate()?;
        let size = population_config.size.get();
        if chromosomes.len() > size {
            return Err(Error::domain(format!(
                "{} seed chromosomes exceed population size {}",
                chromosomes.len(),
                size
            )));
        }

        let chromosome_length = G::chromosome_length(&genetic_config)?;
        if let Some(c) = chromosomes.iter().find(|c| c.len() != chromosome_length) {
            return Err(Error::LengthMismatch {
                expected: chromosome_length,
                actual: c.len(),
            });
        }

        let mut rng = seeded_rng(population_config.seed);
        let seed_count = chromosomes.len();
        let chromosomes: Vec<Chromosome> = chromosomes
            .into_iter()
            .chain((seed_count..size).map(|_| Chromosome::random(chromosome_length, &mut rng)))
            .collect();
        let members = materialize(chromosomes, &genetic_config, 0)?;

        log::debug!(
            "generated population of {} ({} seeded) with {}-bit chromosomes",
            size,
            seed_count,
            chromosome_length
        );

        Ok(Population {
            members,
            fitness: None,
            generation: 0,
            population_config,
            genetic_config,
            rng,
        })
    }

    /// Evaluates the fitness of each genome in the
    /// population using the passed evaluator, called
    /// once per individual in population order.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if the
    /// evaluator returns NaN for any individual.
    ///
    /// # Examples
    /// ```
    /// use bitevo::{Population, PopulationConfig};
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    /// use bitevo_nn::networks::Network;
    ///
    /// let mut population = Population::<_, Network>::new(
    ///     PopulationConfig::zero(),
    ///     GeneticConfig::new(2, HiddenLayers::Single(2), 2),
    /// )
    /// .unwrap();
    ///
    /// population
    ///     .evaluate_fitness(|network| {
    ///         // Networks whose first output is larger are fitter.
    ///         network.evaluate(&[1.0, 0.0]).unwrap()[0]
    ///     })
    ///     .unwrap();
    /// assert_eq!(population.fitness().unwrap().len(), 1);
    /// ```
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E) -> Result<()>
    where
        E: FnMut(&G) -> f64,
    {
        let fitness = self.members.iter().map(|g| evaluator(g)).collect();
        self.set_fitness(fitness)
    }

    /// Evaluates the fitness of each genome using a fallible
    /// evaluator. The first failure aborts the evaluation and
    /// leaves the population's state as it was.
    ///
    /// # Errors
    /// Returns an [`Evaluation`](Error::Evaluation) error carrying
    /// the failing individual's index, or a [`Domain`](Error::Domain)
    /// error if any score is NaN.
    pub fn try_evaluate_fitness<E, X>(&mut self, mut evaluator: E) -> Result<()>
    where
        E: FnMut(&G) -> std::result::Result<f64, X>,
        X: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let fitness = self
            .members
            .iter()
            .enumerate()
            .map(|(index, g)| {
                evaluator(g).map_err(|e| Error::Evaluation {
                    index,
                    source: e.into(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        self.set_fitness(fitness)
    }

    /// Evaluates the fitness of each genome in parallel on the
    /// rayon thread pool. Scores are stored in population order,
    /// and become visible only once every evaluation has finished.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if the
    /// evaluator returns NaN for any individual.
    pub fn evaluate_fitness_par<E>(&mut self, evaluator: E) -> Result<()>
    where
        E: Fn(&G) -> f64 + Sync,
        G: Sync,
    {
        let fitness = self.members.par_iter().map(|g| evaluator(g)).collect();
        self.set_fitness(fitness)
    }

    fn set_fitness(&mut self, fitness: Vec<f64>) -> Result<()> {
        if let Some(i) = fitness.iter().position(|f| f.is_nan()) {
            return Err(Error::domain(format!(
                "NaN fitness for individual {} of generation {}",
                i, self.generation
            )));
        }
        log::debug!(
            "evaluated generation {}, best fitness {:?}",
            self.generation,
            fitness.iter().copied().reduce(f64::max)
        );
        self.fitness = Some(fitness);
        Ok(())
    }

    /// Advances the population by one generation.
    ///
    /// Groups of parents are [selected] by fitness, [recombined]
    /// with the configured [crossover chance], and every child is
    /// [mutated]. The configured number of elite chromosomes is
    /// carried over first, unmutated. The offspring replace the
    /// whole population and are tagged with the next generation
    /// number, after which fitness must be evaluated again.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if the population
    /// has not been evaluated, or any error raised while
    /// materializing offspring. The population is left unchanged
    /// on error.
    ///
    /// [selected]: crate::operators::select
    /// [recombined]: crate::operators::crossover
    /// [crossover chance]: PopulationConfig::crossover_chance
    /// [mutated]: crate::operators::mutate
    ///
    /// # Examples
    /// ```
    /// use bitevo::{Genome, GenerationState, Population, PopulationConfig};
    /// use bitevo::operators::SelectionScheme;
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    /// use bitevo_nn::networks::Network;
    /// use std::num::NonZeroUsize;
    ///
    /// let mut population = Population::<_, Network>::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(10).unwrap(),
    ///         num_parents: NonZeroUsize::new(2).unwrap(),
    ///         num_offspring: NonZeroUsize::new(2).unwrap(),
    ///         selection: SelectionScheme::Rank,
    ///         crossover_chance: 0.9,
    ///         mutation_rate: 0.008,
    ///         ..PopulationConfig::zero()
    ///     },
    ///     GeneticConfig::new(2, HiddenLayers::Single(2), 2),
    /// )
    /// .unwrap();
    ///
    /// // Evolution requires scores.
    /// assert!(population.evolve().is_err());
    ///
    /// population
    ///     .evaluate_fitness(|n| n.evaluate(&[0.0, 1.0]).unwrap()[1])
    ///     .unwrap();
    /// population.evolve().unwrap();
    ///
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!(population.state(), GenerationState::Initialized);
    /// assert!(population.genomes().all(|n| n.identity().generation == Some(1)));
    /// ```
    pub fn evolve(&mut self) -> Result<()> {
        let fitness = match &self.fitness {
            Some(fitness) => fitness,
            None => {
                return Err(Error::domain(format!(
                    "evolution of unevaluated generation {}",
                    self.generation
                )))
            }
        };
        let config = &self.population_config;
        let size = config.size.get();

        let mut next: Vec<Chromosome> = ranked_indices(fitness)
            .into_iter()
            .take(config.elitism)
            .map(|i| self.members[i].chromosome().clone())
            .collect();

        while next.len() < size {
            let parents = select(fitness, config.num_parents.get(), config.selection, &mut self.rng)?;
            let parents: Vec<&Chromosome> =
                parents.iter().map(|&i| self.members[i].chromosome()).collect();

            let offspring = if roll(&mut self.rng, config.crossover_chance) {
                crossover(&parents, config.num_offspring.get(), config.crossover, &mut self.rng)?
            } else {
                parents
                    .iter()
                    .cycle()
                    .take(config.num_offspring.get())
                    .map(|&c| c.clone())
                    .collect()
            };

            for child in offspring.iter().take(size - next.len()) {
                next.push(mutate(child, config.mutation_rate, &mut self.rng)?);
            }
            log::trace!("generation {}: {} of {} offspring", self.generation + 1, next.len(), size);
        }

        self.members = materialize(next, &self.genetic_config, self.generation + 1)?;
        self.fitness = None;
        self.generation += 1;
        log::debug!("advanced to generation {}", self.generation);
        Ok(())
    }

    /// Resets the population to a freshly generated state.
    /// With a configured seed, this reproduces generation 0.
    ///
    /// # Errors
    /// Returns any error [`Population::new`] would.
    pub fn reset(&mut self) -> Result<()>
    where
        C: Clone,
    {
        *self = Population::new(self.population_config.clone(), self.genetic_config.clone())?;
        Ok(())
    }

    /// Returns the best-performing genome and its fitness,
    /// or `None` if the current generation is unevaluated.
    /// Ties go to the earliest individual.
    pub fn champion(&self) -> Option<(&G, f64)> {
        let fitness = self.fitness.as_ref()?;
        ranked_indices(fitness)
            .first()
            .map(|&i| (&self.members[i], fitness[i]))
    }

    /// Returns an iterator over all current genomes,
    /// in population order.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.members.iter()
    }

    /// Returns the current fitness scores, parallel to
    /// [`genomes`](Population::genomes), if evaluated.
    pub fn fitness(&self) -> Option<&[f64]> {
        self.fitness.as_deref()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns whether the current generation has been evaluated.
    pub fn state(&self) -> GenerationState {
        match self.fitness {
            Some(_) => GenerationState::Evaluated,
            None => GenerationState::Initialized,
        }
    }

    /// Returns the population's configuration.
    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the configuration shared by every genome.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

/// Wraps each chromosome into an individual of `generation`,
/// indexed by position.
fn materialize<C, G>(chromosomes: Vec<Chromosome>, config: &C, generation: usize) -> Result<Vec<G>>
where
    G: Genome<Config = C>,
{
    chromosomes
        .into_iter()
        .enumerate()
        .map(|(i, c)| G::from_chromosome(c, config, Identity::new(generation, i)))
        .collect()
}

/// Indices sorted by decreasing fitness, ties in population order.
fn ranked_indices(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
    order
}
