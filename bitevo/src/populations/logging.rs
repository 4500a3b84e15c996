use super::Population;

use crate::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones only the population champion.
    Champion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord<G>,
    /// `None` if the generation had not been evaluated.
    pub fitness_stats: Option<Stats>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tfitness: {}\n\
            }}",
            &self.generation_number,
            match &self.fitness_stats {
                Some(stats) => format!("{:?}", stats),
                None => "unevaluated".to_string(),
            }
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use bitevo::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return None;
        }
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f64;
        data.sort_by(|a, b| a.total_cmp(b));
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        })
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// Every genome, in population order.
    All(Vec<G>),
    /// The population champion and its fitness.
    Champion(G, f64),
    /// Empty, or the generation had no champion yet.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome + Clone> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use bitevo::logging::{EvolutionLogger, ReportingLevel};
    /// use bitevo_nn::networks::Network;
    ///
    /// let logger = EvolutionLogger::<Network>::new(ReportingLevel::NoGenomes);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population, and report
    /// its fitness statistics through the `log` facade.
    ///
    /// # Examples
    /// ```
    /// use bitevo::{Population, PopulationConfig};
    /// use bitevo::logging::{EvolutionLogger, GenerationMemberRecord, ReportingLevel};
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    /// use bitevo_nn::networks::Network;
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::Champion);
    /// let mut population = Population::<_, Network>::new(
    ///     PopulationConfig::zero(),
    ///     GeneticConfig::new(1, HiddenLayers::Multiple(vec![]), 1),
    /// )
    /// .unwrap();
    ///
    /// population.evaluate_fitness(|_| 1.0).unwrap();
    /// logger.log(&population);
    ///
    /// let log = logger.iter().next().unwrap();
    /// assert_eq!(log.fitness_stats.as_ref().unwrap().maximum, 1.0);
    /// assert!(matches!(log.generation_sample, GenerationMemberRecord::Champion(_, f) if f == 1.0));
    /// ```
    pub fn log<C>(&mut self, population: &Population<C, G>)
    where
        G: Genome<Config = C>,
    {
        let fitness_stats = population
            .fitness()
            .and_then(|f| Stats::from(f.iter().copied()));
        match &fitness_stats {
            Some(stats) => log::info!(
                "generation {}: max {:.4}, mean {:.4}, median {:.4}, min {:.4}",
                population.generation(),
                stats.maximum,
                stats.mean,
                stats.median,
                stats.minimum
            ),
            None => log::info!("generation {}: unevaluated", population.generation()),
        }

        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => {
                    GenerationMemberRecord::All(population.genomes().cloned().collect())
                }
                ReportingLevel::Champion => match population.champion() {
                    Some((g, fitness)) => GenerationMemberRecord::Champion(g.clone(), fitness),
                    None => GenerationMemberRecord::None,
                },
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            fitness_stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_even_median() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied()).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.maximum, 4.0);
        assert_eq!(stats.minimum, 1.0);
    }

    #[test]
    fn stats_single_and_empty() {
        let stats = Stats::from(std::iter::once(7.0)).unwrap();
        assert_eq!(stats.median, 7.0);
        assert!(Stats::from(std::iter::empty()).is_none());
    }
}
