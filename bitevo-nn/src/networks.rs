//! A Network is the phenotype of a chromosome: a fully
//! connected feed-forward network whose weights are
//! decoded from the chromosome under a [`GeneticConfig`].
//!
//! Hidden layers apply a [`sigmoid`] to each unit, and
//! the output layer applies a [`softmax`] across units.
//!
//! [`GeneticConfig`]: crate::genomics::GeneticConfig
mod activation;

pub use activation::{sigmoid, softmax};

use crate::genomics::{chromosome_to_weight_matrices, weight_matrices_to_chromosome, GeneticConfig, Topology};

use bitevo::{Chromosome, Error, Genome, Identity, Result};
use serde::{Deserialize, Serialize};

use std::fmt;

/// The weights feeding one layer, stored row-major:
/// one row per output unit, one column per input unit,
/// plus a final bias column if bias is enabled.
///
/// The flat order is exactly the order in which the
/// weights are encoded in a chromosome.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerMatrix {
    rows: usize,
    columns: usize,
    weights: Box<[f64]>,
}

impl LayerMatrix {
    /// Returns the number of output units.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of weights per output unit.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns the weights feeding output unit `row`.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.weights[row * self.columns..(row + 1) * self.columns]
    }

    /// Returns all weights in encoding order.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Linear transform of `inputs`. A trailing bias
    /// column, if present, is added to each sum.
    fn apply(&self, inputs: &[f64]) -> Vec<f64> {
        (0..self.rows)
            .map(|r| {
                let row = self.row(r);
                let sum: f64 = row.iter().zip(inputs).map(|(w, x)| w * x).sum();
                if self.columns > inputs.len() {
                    sum + row[inputs.len()]
                } else {
                    sum
                }
            })
            .collect()
    }
}

/// A feed-forward network decoded from a chromosome.
///
/// Networks are immutable: evolution produces new
/// chromosomes, and from them new networks.
///
/// A network serializes as its chromosome, configuration
/// and identity. Deserialization decodes the chromosome
/// again, and fails as [`Network::new`] would.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkRecord", into = "NetworkRecord")]
pub struct Network {
    chromosome: Chromosome,
    config: GeneticConfig,
    identity: Identity,
    topology: Topology,
    layers: Vec<LayerMatrix>,
}

#[derive(Serialize, Deserialize)]
struct NetworkRecord {
    chromosome: Chromosome,
    config: GeneticConfig,
    identity: Identity,
}

impl TryFrom<NetworkRecord> for Network {
    type Error = Error;

    fn try_from(record: NetworkRecord) -> Result<Network> {
        Network::new(record.chromosome, &record.config, record.identity)
    }
}

impl From<Network> for NetworkRecord {
    fn from(network: Network) -> NetworkRecord {
        NetworkRecord {
            chromosome: network.chromosome,
            config: network.config,
            identity: network.identity,
        }
    }
}

impl Network {
    /// Decodes a chromosome into a network.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error for an invalid
    /// configuration, and a [`LengthMismatch`](Error::LengthMismatch)
    /// error if the chromosome does not fit it.
    ///
    /// # Examples
    /// ```
    /// use bitevo::{Chromosome, Identity};
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    /// use bitevo_nn::networks::Network;
    ///
    /// let config = GeneticConfig {
    ///     bias: false,
    ///     ..GeneticConfig::new(2, HiddenLayers::Single(3), 2)
    /// };
    /// let chromosome = Chromosome::from_bits(vec![false; 12 * 8]);
    ///
    /// let network = Network::new(chromosome, &config, Identity::new(0, 7)).unwrap();
    ///
    /// assert_eq!(network.population_index(), Some(7));
    /// // An all-zero chromosome decodes every weight to the minimum.
    /// assert!(network.layers().iter().all(|l| l.as_slice().iter().all(|w| *w == -1.0)));
    /// ```
    pub fn new(chromosome: Chromosome, config: &GeneticConfig, identity: Identity) -> Result<Network> {
        let topology = config.topology()?;
        let weights = chromosome_to_weight_matrices(
            &chromosome,
            &topology,
            config.bias,
            config.bits_per_weight,
            config.min_weight,
            config.max_weight,
        )?;
        let layers = weights
            .into_iter()
            .zip(topology.transitions())
            .map(|(weights, (from, to))| LayerMatrix {
                rows: to,
                columns: from + config.bias as usize,
                weights: weights.into_boxed_slice(),
            })
            .collect();
        log::trace!(
            "decoded {} bits into network {:?}",
            chromosome.len(),
            topology.layers()
        );

        Ok(Network {
            chromosome,
            config: config.clone(),
            identity,
            topology,
            layers,
        })
    }

    /// Encodes per-layer weights, in [`LayerMatrix`] order,
    /// and decodes the result into a network. Weights are
    /// quantized, so the network's weights differ from those
    /// given by at most one quantization step.
    ///
    /// # Errors
    /// Returns the errors of [`Network::new`] and
    /// [`weight_matrices_to_chromosome`].
    pub fn from_weights(
        weights: &[Vec<f64>],
        config: &GeneticConfig,
        identity: Identity,
    ) -> Result<Network> {
        let chromosome = weight_matrices_to_chromosome(
            weights,
            config.bits_per_weight,
            config.min_weight,
            config.max_weight,
        )?;
        Network::new(chromosome, config, identity)
    }

    /// Propagates `inputs` through the network and returns
    /// the output layer's activations, which sum to one.
    ///
    /// # Errors
    /// Returns a [`ShapeMismatch`](Error::ShapeMismatch) error if
    /// the number of inputs differs from the input layer's width.
    ///
    /// # Examples
    /// ```
    /// use bitevo::{Chromosome, Identity};
    /// use bitevo_nn::genomics::{GeneticConfig, HiddenLayers};
    /// use bitevo_nn::networks::Network;
    ///
    /// let config = GeneticConfig::new(2, HiddenLayers::Single(2), 2);
    /// let chromosome = Chromosome::random(96, &mut rand::thread_rng());
    /// let network = Network::new(chromosome, &config, Identity::anonymous()).unwrap();
    ///
    /// let outputs = network.evaluate(&[0.0, 1.0]).unwrap();
    /// assert_eq!(outputs.len(), 2);
    /// assert!((outputs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    ///
    /// assert!(network.evaluate(&[0.0]).is_err());
    /// ```
    pub fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.topology.input_width() {
            return Err(Error::ShapeMismatch {
                expected: self.topology.input_width(),
                actual: inputs.len(),
            });
        }

        let (output_layer, hidden_layers) = match self.layers.split_last() {
            Some(split) => split,
            None => return Ok(inputs.to_vec()),
        };
        let mut activations = inputs.to_vec();
        for layer in hidden_layers {
            activations = layer.apply(&activations).into_iter().map(sigmoid).collect();
        }
        Ok(softmax(&output_layer.apply(&activations)))
    }

    /// Returns the network's layer matrices, input side first.
    pub fn layers(&self) -> &[LayerMatrix] {
        &self.layers
    }

    /// Returns each layer's weights as a flat slice, in
    /// the order they are encoded in the chromosome.
    pub fn weights(&self) -> impl Iterator<Item = &[f64]> {
        self.layers.iter().map(LayerMatrix::as_slice)
    }

    /// Returns the configuration the network was decoded under.
    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    /// Returns the network's topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the generation the network was born in, if any.
    pub fn generation(&self) -> Option<usize> {
        self.identity.generation
    }

    /// Returns the network's index within its generation, if any.
    pub fn population_index(&self) -> Option<usize> {
        self.identity.index
    }
}

impl Genome for Network {
    type Config = GeneticConfig;

    fn chromosome_length(config: &GeneticConfig) -> Result<usize> {
        config.validate()?;
        config.chrom_length()
    }

    fn from_chromosome(
        chromosome: Chromosome,
        config: &GeneticConfig,
        identity: Identity,
    ) -> Result<Network> {
        Network::new(chromosome, config, identity)
    }

    fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    fn identity(&self) -> Identity {
        self.identity
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = |field: Option<usize>| field.map_or("-".to_string(), |v| v.to_string());
        write!(
            f,
            "Network {{ generation: {}, index: {}, topology: {:?}, chromosome: {} }}",
            id(self.identity.generation),
            id(self.identity.index),
            self.topology.layers(),
            self.chromosome
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::HiddenLayers;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Two-bit weights over [-3, 3] decode exactly to -3, -1, 1 and 3.
    fn exact_config(inputs: usize, hidden: HiddenLayers, outputs: usize, bias: bool) -> GeneticConfig {
        GeneticConfig {
            bias,
            bits_per_weight: 2,
            min_weight: -3.0,
            max_weight: 3.0,
            ..GeneticConfig::new(inputs, hidden, outputs)
        }
    }

    #[test]
    fn all_zero_chromosome_without_bias_decodes_to_minimum() {
        let config = GeneticConfig {
            bias: false,
            ..GeneticConfig::new(3, HiddenLayers::Multiple(vec![4, 5]), 1)
        };
        let len = Network::chromosome_length(&config).unwrap();
        let network = Network::new(
            Chromosome::from_bits(vec![false; len]),
            &config,
            Identity::anonymous(),
        )
        .unwrap();
        for layer in network.layers() {
            assert!(layer.as_slice().iter().all(|w| *w == -1.0));
        }
    }

    #[test]
    fn layer_shapes_follow_topology() {
        for bias in [false, true] {
            let config = GeneticConfig {
                bias,
                ..GeneticConfig::new(3, HiddenLayers::Multiple(vec![4, 5]), 2)
            };
            let len = Network::chromosome_length(&config).unwrap();
            let chromosome = Chromosome::random(len, &mut ChaCha8Rng::seed_from_u64(0));
            let network = Network::new(chromosome, &config, Identity::anonymous()).unwrap();

            let shapes: Vec<(usize, usize)> = network
                .layers()
                .iter()
                .map(|l| (l.rows(), l.columns()))
                .collect();
            let b = bias as usize;
            assert_eq!(shapes, vec![(4, 3 + b), (5, 4 + b), (2, 5 + b)]);
        }
    }

    #[test]
    fn rows_follow_encoding_order() {
        let config = exact_config(2, HiddenLayers::Multiple(vec![]), 2, true);
        let weights = vec![vec![-3.0, -1.0, 1.0, 3.0, 1.0, -1.0]];
        let network = Network::from_weights(&weights, &config, Identity::anonymous()).unwrap();
        let layer = &network.layers()[0];
        assert_eq!(layer.row(0), &[-3.0, -1.0, 1.0]);
        assert_eq!(layer.row(1), &[3.0, 1.0, -1.0]);
        assert_eq!(layer.as_slice(), &weights[0][..]);
        assert_eq!(network.weights().collect::<Vec<_>>(), vec![&weights[0][..]]);
    }

    #[test]
    fn evaluate_hidden_sigmoid_then_softmax() {
        let config = exact_config(1, HiddenLayers::Single(1), 2, false);
        let network = Network::from_weights(
            &[vec![1.0], vec![3.0, -1.0]],
            &config,
            Identity::anonymous(),
        )
        .unwrap();

        for x in [-2.0, -0.5, 0.0, 0.75, 3.0] {
            let h = sigmoid(x);
            let expected = softmax(&[3.0 * h, -h]);
            let outputs = network.evaluate(&[x]).unwrap();
            for (o, e) in outputs.iter().zip(&expected) {
                assert!((o - e).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn evaluate_adds_bias() {
        let config = exact_config(1, HiddenLayers::Multiple(vec![]), 2, true);
        let network = Network::from_weights(
            &[vec![1.0, 3.0, -1.0, -3.0]],
            &config,
            Identity::anonymous(),
        )
        .unwrap();
        let outputs = network.evaluate(&[0.5]).unwrap();
        let expected = softmax(&[3.5, -3.5]);
        assert!((outputs[0] - expected[0]).abs() < 1e-12);
        assert!((outputs[1] - expected[1]).abs() < 1e-12);
    }

    #[test]
    fn evaluate_rejects_wrong_input_width() {
        let config = GeneticConfig::new(3, HiddenLayers::Single(2), 2);
        let len = config.chrom_length().unwrap();
        let network = Network::new(
            Chromosome::from_bits(vec![true; len]),
            &config,
            Identity::anonymous(),
        )
        .unwrap();
        for width in [0, 2, 4] {
            assert!(matches!(
                network.evaluate(&vec![1.0; width]),
                Err(Error::ShapeMismatch { expected: 3, actual }) if actual == width
            ));
        }
    }

    #[test]
    fn evaluate_is_deterministic() {
        let config = GeneticConfig::new(4, HiddenLayers::Multiple(vec![6, 3]), 3);
        let len = config.chrom_length().unwrap();
        let network = Network::new(
            Chromosome::random(len, &mut ChaCha8Rng::seed_from_u64(8)),
            &config,
            Identity::anonymous(),
        )
        .unwrap();
        let input = [0.1, -0.4, 0.9, 0.0];
        let first = network.evaluate(&input).unwrap();
        assert_eq!(first, network.evaluate(&input).unwrap());
        assert_eq!(first.len(), 3);
        assert!((first.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_length_chromosome_is_rejected() {
        let config = GeneticConfig::new(2, HiddenLayers::Single(2), 2);
        let result = Network::from_chromosome(
            Chromosome::from_bits(vec![false; 95]),
            &config,
            Identity::new(0, 0),
        );
        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                expected: 96,
                actual: 95
            })
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GeneticConfig {
            min_weight: 2.0,
            ..GeneticConfig::new(2, HiddenLayers::Single(2), 2)
        };
        assert!(matches!(
            Network::chromosome_length(&config),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn identity_accessors() {
        let config = GeneticConfig::new(1, HiddenLayers::Multiple(vec![]), 1);
        let network = Network::new(
            Chromosome::from_bits(vec![true; 16]),
            &config,
            Identity::new(4, 9),
        )
        .unwrap();
        assert_eq!(network.generation(), Some(4));
        assert_eq!(network.population_index(), Some(9));
        assert_eq!(network.identity(), Identity::new(4, 9));
        assert_eq!(
            network.to_string(),
            "Network { generation: 4, index: 9, topology: [1, 1], chromosome: 1111111111111111 }"
        );
    }

    #[test]
    fn serde_round_trip_decodes_again() {
        let config = GeneticConfig::new(2, HiddenLayers::Single(2), 2);
        let network = Network::new(
            Chromosome::random(96, &mut ChaCha8Rng::seed_from_u64(1)),
            &config,
            Identity::new(0, 3),
        )
        .unwrap();
        let json = serde_json::to_value(&network).unwrap();
        assert_eq!(json["chromosome"], network.chromosome().to_string());
        assert!(json.get("layers").is_none());

        let restored: Network = serde_json::from_value(json).unwrap();
        assert_eq!(restored.chromosome(), network.chromosome());
        assert_eq!(restored.identity(), network.identity());
        assert_eq!(restored.topology(), network.topology());
        assert_eq!(restored.layers().len(), network.layers().len());
    }

    #[test]
    fn deserialization_rejects_inconsistent_records() {
        let config = GeneticConfig::new(2, HiddenLayers::Single(2), 2);
        let network = Network::new(
            Chromosome::from_bits(vec![false; 96]),
            &config,
            Identity::anonymous(),
        )
        .unwrap();

        let mut short = serde_json::to_value(&network).unwrap();
        short["chromosome"] = serde_json::Value::from("01");
        assert!(serde_json::from_value::<Network>(short).is_err());

        let mut bad_range = serde_json::to_value(&network).unwrap();
        bad_range["config"]["min_weight"] = serde_json::Value::from(5.0);
        assert!(serde_json::from_value::<Network>(bad_range).is_err());

        let mut reshaped = serde_json::to_value(&network).unwrap();
        reshaped["config"]["input_count"] = serde_json::Value::from(3);
        assert!(serde_json::from_value::<Network>(reshaped).is_err());
    }
}
