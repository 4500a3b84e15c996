use super::{codec, resolve, HiddenLayers, Topology};

use bitevo::Result;
use serde::{Deserialize, Serialize};

/// Configuration data shared by every network
/// in a population: its shape and the encoding
/// of its weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs to the network.
    pub input_count: usize,
    /// Width(s) of the hidden layer(s).
    pub hidden: HiddenLayers,
    /// Number of outputs from the network.
    pub output_count: usize,
    /// Whether each non-input unit has a bias weight.
    pub bias: bool,
    /// Number of bits encoding each weight.
    pub bits_per_weight: usize,
    /// Minimum possible value of a weight.
    pub min_weight: f64,
    /// Maximum possible value of a weight.
    pub max_weight: f64,
}

impl GeneticConfig {
    /// Returns a configuration for the given shape, with
    /// bias enabled and 8-bit weights in `[-1, 1]`.
    ///
    /// # Examples
    /// ```
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    ///
    /// let config = GeneticConfig {
    ///     // Specify some values here...
    ///     bits_per_weight: 16,
    ///     // Default the rest...
    ///     ..GeneticConfig::new(3, HiddenLayers::Multiple(vec![4, 5]), 1)
    /// };
    /// assert_eq!(config.topology().unwrap().layers(), &[3, 4, 5, 1]);
    /// ```
    pub fn new(input_count: usize, hidden: HiddenLayers, output_count: usize) -> GeneticConfig {
        GeneticConfig {
            input_count,
            hidden,
            output_count,
            bias: true,
            bits_per_weight: 8,
            min_weight: -1.0,
            max_weight: 1.0,
        }
    }

    /// Resolves the configured shape into a topology.
    ///
    /// # Errors
    /// Returns a [`Domain`](bitevo::Error::Domain) error if
    /// any layer would have zero units.
    pub fn topology(&self) -> Result<Topology> {
        resolve(self.input_count, &self.hidden, self.output_count)
    }

    /// Returns the chromosome length this configuration requires.
    ///
    /// # Examples
    /// ```
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    ///
    /// assert_eq!(GeneticConfig::new(2, HiddenLayers::Single(2), 2).chrom_length().unwrap(), 96);
    /// ```
    pub fn chrom_length(&self) -> Result<usize> {
        self.topology()?.chrom_length(self.bias, self.bits_per_weight)
    }

    /// Checks that networks can be built from this configuration.
    ///
    /// # Errors
    /// Returns a [`Domain`](bitevo::Error::Domain) error for an
    /// invalid shape, precision or weight range.
    pub fn validate(&self) -> Result<()> {
        self.topology()?;
        codec::check_bits(self.bits_per_weight)?;
        codec::check_range(self.min_weight, self.max_weight)
    }
}
