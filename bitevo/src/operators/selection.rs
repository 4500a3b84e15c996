use crate::{Error, Result};

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Fitness-biased parent selection schemes.
///
/// All schemes sample *with* replacement: the same
/// individual may be chosen more than once for a
/// single group of parents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionScheme {
    /// Probability proportional to fitness. Requires
    /// non-negative fitness; if every score is zero,
    /// selection is uniform.
    Roulette,
    /// Probability proportional to rank, the least fit
    /// individual having rank 1. Accepts any ordering
    /// of finite or infinite scores.
    Rank,
    /// The fittest of `size` uniformly drawn contestants.
    Tournament { size: NonZeroUsize },
}

/// Chooses `num_parents` individuals from a population,
/// given their fitness scores in population order, and
/// returns their indices.
///
/// # Errors
/// Returns a [`Domain`](Error::Domain) error, before consuming
/// any randomness, if `num_parents` is zero or exceeds the
/// population size, if any score is NaN, or if roulette
/// selection is given a negative or infinite score or scores
/// whose total is not finite.
///
/// # Examples
/// ```
/// use bitevo::operators::{select, SelectionScheme};
///
/// let fitness = [0.0, 3.0, 0.0, 1.0];
/// let parents = select(&fitness, 2, SelectionScheme::Roulette, &mut rand::thread_rng()).unwrap();
///
/// assert_eq!(parents.len(), 2);
/// // Zero-fitness individuals are never chosen by the roulette.
/// assert!(parents.iter().all(|&i| i == 1 || i == 3));
///
/// assert!(select(&fitness, 5, SelectionScheme::Rank, &mut rand::thread_rng()).is_err());
/// ```
pub fn select<R: Rng + ?Sized>(
    fitness: &[f64],
    num_parents: usize,
    scheme: SelectionScheme,
    rng: &mut R,
) -> Result<Vec<usize>> {
    check_arguments(fitness, num_parents, scheme)?;

    match scheme {
        SelectionScheme::Roulette => roulette(fitness, num_parents, rng),
        SelectionScheme::Rank => rank(fitness, num_parents, rng),
        SelectionScheme::Tournament { size } => {
            Ok(tournament(fitness, num_parents, size.get(), rng))
        }
    }
}

fn check_arguments(fitness: &[f64], num_parents: usize, scheme: SelectionScheme) -> Result<()> {
    if num_parents < 1 {
        return Err(Error::domain("selection of zero parents"));
    }
    if num_parents > fitness.len() {
        return Err(Error::domain(format!(
            "selection of {} parents from a population of {}",
            num_parents,
            fitness.len()
        )));
    }
    if let Some(i) = fitness.iter().position(|f| f.is_nan()) {
        return Err(Error::domain(format!("NaN fitness for individual {}", i)));
    }
    if scheme == SelectionScheme::Roulette {
        if let Some(i) = fitness.iter().position(|f| *f < 0.0 || f.is_infinite()) {
            return Err(Error::domain(format!(
                "roulette selection requires finite non-negative fitness, individual {} has {}",
                i, fitness[i]
            )));
        }
        if !fitness.iter().sum::<f64>().is_finite() {
            return Err(Error::domain(
                "roulette selection requires fitness with a finite total",
            ));
        }
    }
    Ok(())
}

fn roulette<R: Rng + ?Sized>(fitness: &[f64], num_parents: usize, rng: &mut R) -> Result<Vec<usize>> {
    if fitness.iter().all(|f| *f == 0.0) {
        log::warn!("roulette selection over all-zero fitness, choosing uniformly");
        return Ok((0..num_parents)
            .map(|_| rng.gen_range(0..fitness.len()))
            .collect());
    }
    let wheel = WeightedIndex::new(fitness)
        .map_err(|e| Error::domain(format!("roulette selection: {}", e)))?;
    Ok((0..num_parents).map(|_| wheel.sample(rng)).collect())
}

fn rank<R: Rng + ?Sized>(fitness: &[f64], num_parents: usize, rng: &mut R) -> Result<Vec<usize>> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
    let mut ranks = vec![0usize; fitness.len()];
    for (rank, &individual) in order.iter().enumerate() {
        ranks[individual] = rank + 1;
    }
    let wheel = WeightedIndex::new(&ranks)
        .map_err(|e| Error::domain(format!("rank selection: {}", e)))?;
    Ok((0..num_parents).map(|_| wheel.sample(rng)).collect())
}

fn tournament<R: Rng + ?Sized>(
    fitness: &[f64],
    num_parents: usize,
    size: usize,
    rng: &mut R,
) -> Vec<usize> {
    (0..num_parents)
        .map(|_| {
            let mut winner = rng.gen_range(0..fitness.len());
            for _ in 1..size {
                let contestant = rng.gen_range(0..fitness.len());
                if fitness[contestant] > fitness[winner] {
                    winner = contestant;
                }
            }
            winner
        })
        .collect()
}
