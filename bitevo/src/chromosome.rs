//! Chromosomes are the fixed-length bit strings that
//! genetic operators act upon. They are immutable values:
//! every operator returns a new chromosome and leaves
//! its inputs untouched.
use crate::{Error, Result};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A string of bits, most significant first within each
/// encoded field.
///
/// Serializes as its `'0'`/`'1'` text form.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Chromosome {
    bits: Vec<bool>,
}

impl Chromosome {
    /// Wraps a vector of bits.
    pub fn from_bits(bits: Vec<bool>) -> Chromosome {
        Chromosome { bits }
    }

    /// Returns a chromosome of `len` bits, each drawn
    /// independently and uniformly from `{0, 1}`.
    ///
    /// # Examples
    /// ```
    /// use bitevo::Chromosome;
    ///
    /// let chromosome = Chromosome::random(96, &mut rand::thread_rng());
    /// assert_eq!(chromosome.len(), 96);
    /// ```
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Chromosome {
        (0..len).map(|_| rng.gen::<bool>()).collect()
    }

    /// Returns the number of bits in the chromosome.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if the chromosome holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the chromosome's bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Consumes the chromosome, returning its bits.
    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }

    /// Returns a chromosome with every bit flipped.
    ///
    /// # Examples
    /// ```
    /// use bitevo::Chromosome;
    ///
    /// let chromosome: Chromosome = "0101".parse().unwrap();
    /// assert_eq!(chromosome.complement().to_string(), "1010");
    /// ```
    pub fn complement(&self) -> Chromosome {
        self.bits.iter().map(|b| !b).collect()
    }

    /// Returns the number of positions at which the two
    /// chromosomes differ.
    ///
    /// # Errors
    /// Returns a [`Domain`](Error::Domain) error if the
    /// chromosomes have different lengths.
    ///
    /// # Examples
    /// ```
    /// use bitevo::Chromosome;
    ///
    /// let a: Chromosome = "0011".parse().unwrap();
    /// let b: Chromosome = "0110".parse().unwrap();
    /// assert_eq!(a.hamming_distance(&b).unwrap(), 2);
    /// ```
    pub fn hamming_distance(&self, other: &Chromosome) -> Result<usize> {
        if self.len() != other.len() {
            return Err(Error::domain(format!(
                "hamming distance between chromosomes of lengths {} and {}",
                self.len(),
                other.len()
            )));
        }
        Ok(self
            .bits
            .iter()
            .zip(&other.bits)
            .filter(|(a, b)| a != b)
            .count())
    }
}

impl FromIterator<bool> for Chromosome {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Chromosome {
        Chromosome {
            bits: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[bool]> for Chromosome {
    fn as_ref(&self) -> &[bool] {
        &self.bits
    }
}

impl FromStr for Chromosome {
    type Err = Error;

    /// Parses a string of `'0'` and `'1'` characters.
    ///
    /// # Errors
    /// Returns a [`Format`](Error::Format) error naming the
    /// first character that is not a binary digit.
    fn from_str(s: &str) -> Result<Chromosome> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::Format(format!(
                    "invalid character {:?} at position {}",
                    other, position
                ))),
            })
            .collect()
    }
}

impl TryFrom<String> for Chromosome {
    type Error = Error;

    fn try_from(s: String) -> Result<Chromosome> {
        s.parse()
    }
}

impl From<Chromosome> for String {
    fn from(chromosome: Chromosome) -> String {
        chromosome.to_string()
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
