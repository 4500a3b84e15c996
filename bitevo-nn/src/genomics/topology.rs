use bitevo::{Error, Result};

use serde::{Deserialize, Serialize};

/// The hidden part of a network shape: either a single
/// hidden layer given by its width, or a sequence of widths.
///
/// Deserializes from either form, so configuration files
/// may write `3` or `[4, 5]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HiddenLayers {
    Single(usize),
    Multiple(Vec<usize>),
}

impl HiddenLayers {
    /// Returns the hidden widths as a flat sequence.
    pub fn widths(&self) -> &[usize] {
        match self {
            HiddenLayers::Single(width) => std::slice::from_ref(width),
            HiddenLayers::Multiple(widths) => widths,
        }
    }
}

impl From<usize> for HiddenLayers {
    fn from(width: usize) -> HiddenLayers {
        HiddenLayers::Single(width)
    }
}

impl From<Vec<usize>> for HiddenLayers {
    fn from(widths: Vec<usize>) -> HiddenLayers {
        HiddenLayers::Multiple(widths)
    }
}

/// The widths of a feed-forward network's layers, from
/// input to output. Always holds at least two layers, each
/// at least one unit wide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology(Vec<usize>);

/// Flattens a network shape into its layer widths:
/// `[num_inputs] + hidden + [num_outputs]`.
///
/// # Errors
/// Returns a [`Domain`](Error::Domain) error if any width is zero.
///
/// # Examples
/// ```
/// use bitevo_nn::genomics::{resolve, HiddenLayers};
///
/// let topology = resolve(3, &HiddenLayers::Multiple(vec![4, 5]), 1).unwrap();
/// assert_eq!(topology.layers(), &[3, 4, 5, 1]);
///
/// let topology = resolve(2, &HiddenLayers::Single(2), 2).unwrap();
/// assert_eq!(topology.layers(), &[2, 2, 2]);
///
/// assert!(resolve(2, &HiddenLayers::Single(0), 2).is_err());
/// ```
pub fn resolve(num_inputs: usize, num_hidden: &HiddenLayers, num_outputs: usize) -> Result<Topology> {
    let mut layers = Vec::with_capacity(num_hidden.widths().len() + 2);
    layers.push(num_inputs);
    layers.extend_from_slice(num_hidden.widths());
    layers.push(num_outputs);
    Topology::new(layers)
}

impl Topology {
    /// Wraps a sequence of layer widths.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if there are
    /// fewer than two layers or any width is zero.
    pub fn new(layers: Vec<usize>) -> Result<Topology> {
        if layers.len() < 2 {
            return Err(Error::domain(format!(
                "topology needs an input and an output layer, got {:?}",
                layers
            )));
        }
        if let Some(i) = layers.iter().position(|w| *w < 1) {
            return Err(Error::domain(format!(
                "layer {} of topology {:?} has no units",
                i, layers
            )));
        }
        Ok(Topology(layers))
    }

    /// Returns the layer widths, input first.
    pub fn layers(&self) -> &[usize] {
        &self.0
    }

    /// Returns the width of the input layer.
    pub fn input_width(&self) -> usize {
        self.0[0]
    }

    /// Returns the width of the output layer.
    pub fn output_width(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Returns each consecutive `(from, to)` pair of widths.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Returns the number of weights feeding each non-input layer:
    /// `(from + 1) × to` with bias, `from × to` without.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if a count
    /// does not fit in a `usize`.
    ///
    /// # Examples
    /// ```
    /// use bitevo_nn::genomics::Topology;
    ///
    /// let topology = Topology::new(vec![2, 3, 1]).unwrap();
    /// assert_eq!(topology.weight_counts(true).unwrap(), vec![9, 4]);
    /// assert_eq!(topology.weight_counts(false).unwrap(), vec![6, 3]);
    /// ```
    pub fn weight_counts(&self, bias: bool) -> Result<Vec<usize>> {
        self.transitions()
            .map(|(from, to)| {
                from.checked_add(bias as usize)
                    .and_then(|columns| columns.checked_mul(to))
                    .ok_or_else(|| self.overflow())
            })
            .collect()
    }

    /// Returns the number of bits needed to encode every weight
    /// of the network at `num_bits` bits per weight.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if `num_bits`
    /// is not a supported precision, or if the length does not
    /// fit in a `usize`.
    ///
    /// # Examples
    /// ```
    /// use bitevo_nn::genomics::Topology;
    ///
    /// let topology = Topology::new(vec![2, 2, 2]).unwrap();
    /// assert_eq!(topology.chrom_length(true, 8).unwrap(), ((2 + 1) * 2 + (2 + 1) * 2) * 8);
    /// ```
    pub fn chrom_length(&self, bias: bool, num_bits: usize) -> Result<usize> {
        super::codec::check_bits(num_bits)?;
        self.weight_counts(bias)?
            .into_iter()
            .try_fold(0usize, |total, count| total.checked_add(count))
            .and_then(|weights| weights.checked_mul(num_bits))
            .ok_or_else(|| self.overflow())
    }

    fn overflow(&self) -> Error {
        Error::domain(format!(
            "topology {:?} has more weights than can be addressed",
            self.0
        ))
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = Error;

    fn try_from(layers: Vec<usize>) -> Result<Topology> {
        Topology::new(layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.0
    }
}

/// Returns the chromosome length for a topology:
/// the sum over consecutive layers of
/// `(from + bias) × to × num_bits`.
///
/// # Errors
/// Returns a [`Domain`](Error::Domain) error if `num_bits`
/// is not a supported precision.
pub fn chrom_length(topology: &Topology, bias: bool, num_bits: usize) -> Result<usize> {
    topology.chrom_length(bias, num_bits)
}
