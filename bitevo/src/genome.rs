use crate::{Chromosome, Result};

use serde::{Deserialize, Serialize};

/// Identifies an individual by the generation it
/// was born in and its position within that generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub generation: Option<usize>,
    pub index: Option<usize>,
}

impl Identity {
    /// Returns an identity with both fields set.
    pub fn new(generation: usize, index: usize) -> Identity {
        Identity {
            generation: Some(generation),
            index: Some(index),
        }
    }

    /// Returns an identity with neither field set,
    /// for individuals built outside a population.
    pub fn anonymous() -> Identity {
        Identity::default()
    }
}

/// An interface for phenotypes that can be built from
/// a chromosome and evolved by a [`Population`].
///
/// Implementors are immutable once constructed: genetic
/// operators act on chromosomes and produce new individuals
/// through [`Genome::from_chromosome`].
///
/// [`Population`]: crate::Population
pub trait Genome: Sized {
    type Config;

    /// Returns the exact chromosome length required by `config`.
    fn chromosome_length(config: &Self::Config) -> Result<usize>;

    /// Decodes a chromosome into an individual.
    ///
    /// Should fail rather than produce a partially
    /// decoded individual when the chromosome does not
    /// fit the configuration.
    fn from_chromosome(
        chromosome: Chromosome,
        config: &Self::Config,
        identity: Identity,
    ) -> Result<Self>;

    /// Returns the chromosome the individual was built from.
    fn chromosome(&self) -> &Chromosome;

    /// Returns the individual's identity.
    fn identity(&self) -> Identity;
}
