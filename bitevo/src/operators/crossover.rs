use crate::{Chromosome, Error, Result};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rules for recombining parent chromosomes.
///
/// Every scheme is length-preserving and positional:
/// each offspring bit is copied from the bit at the same
/// position in one of the parents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverScheme {
    /// One cut point; the prefix comes from one parent
    /// and the suffix from the other.
    SinglePoint,
    /// Two cut points; the middle segment is swapped.
    TwoPoint,
    /// Each bit is taken from either parent with equal chance.
    Uniform,
}

/// Recombines `parents` into `num_offspring` children.
///
/// Offspring are produced in complementary pairs: pair `j`
/// recombines parents `j % p` and `(j + 1) % p`, where `p` is
/// the number of parents, and its second child takes every bit
/// the first did not. An odd `num_offspring` drops the last
/// pair's second child. A single parent yields clones.
///
/// # Errors
/// Returns a [`Domain`](Error::Domain) error, before consuming
/// any randomness, if there are no parents, no offspring are
/// requested, or the parents' lengths differ.
///
/// # Examples
/// ```
/// use bitevo::Chromosome;
/// use bitevo::operators::{crossover, CrossoverScheme};
///
/// let a: Chromosome = "00000000".parse().unwrap();
/// let b: Chromosome = "11111111".parse().unwrap();
///
/// let children = crossover(&[&a, &b], 2, CrossoverScheme::SinglePoint, &mut rand::thread_rng()).unwrap();
///
/// // Complementary children of complementary parents.
/// assert_eq!(children[0].complement(), children[1]);
/// ```
pub fn crossover<R: Rng + ?Sized>(
    parents: &[&Chromosome],
    num_offspring: usize,
    scheme: CrossoverScheme,
    rng: &mut R,
) -> Result<Vec<Chromosome>> {
    let len = check_arguments(parents, num_offspring)?;

    let mut offspring = Vec::with_capacity(num_offspring);
    let mut pair = 0;
    while offspring.len() < num_offspring {
        let first = parents[pair % parents.len()];
        let second = parents[(pair + 1) % parents.len()];
        let mask = inheritance_mask(len, scheme, rng);

        offspring.push(recombine(first, second, &mask));
        if offspring.len() < num_offspring {
            offspring.push(recombine(second, first, &mask));
        }
        pair += 1;
    }

    Ok(offspring)
}

/// Returns the shared chromosome length.
fn check_arguments(parents: &[&Chromosome], num_offspring: usize) -> Result<usize> {
    let len = match parents.first() {
        Some(p) => p.len(),
        None => return Err(Error::domain("crossover without parents")),
    };
    if num_offspring < 1 {
        return Err(Error::domain("crossover producing zero offspring"));
    }
    if let Some(p) = parents.iter().find(|p| p.len() != len) {
        return Err(Error::domain(format!(
            "crossover between parents of lengths {} and {}",
            len,
            p.len()
        )));
    }
    Ok(len)
}

/// `true` marks positions inherited from the first parent.
fn inheritance_mask<R: Rng + ?Sized>(len: usize, scheme: CrossoverScheme, rng: &mut R) -> Vec<bool> {
    match scheme {
        CrossoverScheme::SinglePoint => {
            let cut = single_cut(len, rng);
            (0..len).map(|i| i < cut).collect()
        }
        CrossoverScheme::TwoPoint if len >= 3 => {
            let lo = rng.gen_range(1..len - 1);
            let hi = rng.gen_range(lo + 1..len);
            (0..len).map(|i| i < lo || i >= hi).collect()
        }
        CrossoverScheme::TwoPoint => {
            let cut = single_cut(len, rng);
            (0..len).map(|i| i < cut).collect()
        }
        CrossoverScheme::Uniform => (0..len).map(|_| rng.gen::<bool>()).collect(),
    }
}

/// A cut strictly inside the chromosome, so both parents
/// contribute. Chromosomes too short to cut are copied whole.
fn single_cut<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    if len >= 2 {
        rng.gen_range(1..len)
    } else {
        len
    }
}

fn recombine(first: &Chromosome, second: &Chromosome, mask: &[bool]) -> Chromosome {
    mask.iter()
        .zip(first.bits().iter().zip(second.bits()))
        .map(|(from_first, (a, b))| if *from_first { *a } else { *b })
        .collect()
}
