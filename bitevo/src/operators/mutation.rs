use crate::rng::roll;
use crate::{Chromosome, Error, Result};

use rand::Rng;

/// Returns a copy of `chromosome` in which each bit has been
/// flipped independently with probability `rate`.
///
/// A rate of `0.0` returns the chromosome unchanged, and a
/// rate of `1.0` returns its complement, whatever the state
/// of `rng`. The expected Hamming distance to the input is
/// `rate * chromosome.len()`.
///
/// # Errors
/// Returns a [`Domain`](Error::Domain) error if `rate` is not
/// in `[0, 1]`.
///
/// # Examples
/// ```
/// use bitevo::Chromosome;
/// use bitevo::operators::mutate;
///
/// let chromosome: Chromosome = "0101".parse().unwrap();
/// let mut rng = rand::thread_rng();
///
/// assert_eq!(mutate(&chromosome, 0.0, &mut rng).unwrap(), chromosome);
/// assert_eq!(mutate(&chromosome, 1.0, &mut rng).unwrap().to_string(), "1010");
/// ```
pub fn mutate<R: Rng + ?Sized>(chromosome: &Chromosome, rate: f64, rng: &mut R) -> Result<Chromosome> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(Error::domain(format!(
            "mutation rate {} outside [0, 1]",
            rate
        )));
    }
    if rate == 0.0 {
        return Ok(chromosome.clone());
    }
    Ok(chromosome
        .bits()
        .iter()
        .map(|bit| bit ^ roll(rng, rate))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_rate_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..20 {
            let chromosome = Chromosome::random(64, &mut rng);
            assert_eq!(mutate(&chromosome, 0.0, &mut rng).unwrap(), chromosome);
        }
    }

    #[test]
    fn full_rate_complements() {
        // A generator that always yields its maximum still flips every bit.
        let mut rng = StepRng::new(u64::MAX, 0);
        let chromosome: Chromosome = "0101".parse().unwrap();
        assert_eq!(
            mutate(&chromosome, 1.0, &mut rng).unwrap().to_string(),
            "1010"
        );
    }

    #[test]
    fn input_is_untouched() {
        let chromosome: Chromosome = "0011".parse().unwrap();
        let copy = chromosome.clone();
        let _ = mutate(&chromosome, 1.0, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(chromosome, copy);
    }

    #[test]
    fn expected_hamming_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let chromosome = Chromosome::random(10_000, &mut rng);
        for rate in [0.01, 0.1, 0.5] {
            let mutated = mutate(&chromosome, rate, &mut rng).unwrap();
            let distance = chromosome.hamming_distance(&mutated).unwrap() as f64;
            let expected = rate * 10_000.0;
            // Well over four standard deviations for each rate.
            assert!(
                (distance - expected).abs() < 250.0,
                "rate {}: {} flips",
                rate,
                distance
            );
        }
    }

    #[test]
    fn rate_out_of_range_is_rejected() {
        let chromosome: Chromosome = "01".parse().unwrap();
        let mut rng = StepRng::new(0, 1);
        for rate in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                mutate(&chromosome, rate, &mut rng),
                Err(Error::Domain(_))
            ));
        }
    }
}
