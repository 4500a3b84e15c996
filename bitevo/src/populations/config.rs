use crate::operators::{CrossoverScheme, SelectionScheme};
use crate::{Error, Result};

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities must be
/// in the range [0.0, 1.0]; [`validate`] rejects
/// anything else.
///
/// [`validate`]: PopulationConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Number of parents chosen for each group of offspring.
    pub num_parents: NonZeroUsize,
    /// Number of offspring produced by each group of parents.
    pub num_offspring: NonZeroUsize,
    /// Parent selection scheme.
    pub selection: SelectionScheme,
    /// Parent recombination scheme.
    pub crossover: CrossoverScheme,
    /// Chance that a group of parents is recombined;
    /// otherwise its offspring are copies of the parents.
    pub crossover_chance: f64,
    /// Per-bit chance of a flip during mutation.
    pub mutation_rate: f64,
    /// Top n chromosomes copied unmutated into
    /// the next generation.
    pub elitism: usize,
    /// Seed for the population's random generator.
    /// If `None`, the generator is seeded from entropy.
    pub seed: Option<u64>,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, `None`, the first variant of
    /// each scheme, or in the case of `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use bitevo::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     mutation_rate: 0.008,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 1 is a valid NonZeroUsize.
            size: unsafe { NonZeroUsize::new_unchecked(1) },
            num_parents: unsafe { NonZeroUsize::new_unchecked(1) },
            num_offspring: unsafe { NonZeroUsize::new_unchecked(1) },
            selection: SelectionScheme::Roulette,
            crossover: CrossoverScheme::SinglePoint,
            crossover_chance: 0.0,
            mutation_rate: 0.0,
            elitism: 0,
            seed: None,
        }
    }

    /// Checks that the configuration can drive evolution.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if a probability
    /// lies outside [0, 1], if more parents are requested than
    /// the population holds, or if elitism exceeds the population.
    ///
    /// # Examples
    /// ```
    /// use bitevo::PopulationConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = PopulationConfig {
    ///     size: NonZeroUsize::new(10).unwrap(),
    ///     num_parents: NonZeroUsize::new(11).unwrap(),
    ///     ..PopulationConfig::zero()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("crossover_chance", self.crossover_chance),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::domain(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.num_parents > self.size {
            return Err(Error::domain(format!(
                "{} parents requested from a population of {}",
                self.num_parents, self.size
            )));
        }
        if self.elitism > self.size.get() {
            return Err(Error::domain(format!(
                "elitism of {} exceeds population size {}",
                self.elitism, self.size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid() {
        assert!(PopulationConfig::zero().validate().is_ok());
    }

    #[test]
    fn probabilities_are_bounded() {
        let config = PopulationConfig {
            mutation_rate: 1.01,
            ..PopulationConfig::zero()
        };
        assert!(matches!(config.validate(), Err(Error::Domain(_))));

        let config = PopulationConfig {
            crossover_chance: f64::NAN,
            ..PopulationConfig::zero()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn elitism_is_bounded() {
        let config = PopulationConfig {
            elitism: 2,
            ..PopulationConfig::zero()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let config: PopulationConfig = serde_json::from_str(
            r#"{
                "size": 50,
                "num_parents": 2,
                "num_offspring": 2,
                "selection": { "Tournament": { "size": 3 } },
                "crossover": "Uniform",
                "crossover_chance": 0.9,
                "mutation_rate": 0.008,
                "elitism": 1,
                "seed": 42
            }"#,
        )
        .unwrap();
        assert_eq!(config.size.get(), 50);
        assert_eq!(
            config.selection,
            SelectionScheme::Tournament {
                size: NonZeroUsize::new(3).unwrap()
            }
        );
        assert_eq!(config.crossover, CrossoverScheme::Uniform);
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }
}
