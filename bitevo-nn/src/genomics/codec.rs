//! Conversions between weights and their fixed-width binary
//! encodings. A weight in `[min_w, max_w]` is quantized
//! uniformly into `2^num_bits` levels and written most
//! significant bit first. Decoding inverts the quantization
//! to within one level.
//!
//! A chromosome is the concatenation of every weight's
//! encoding, layer by layer from the input side. Within a
//! layer, weights are grouped by output unit: the incoming
//! weights of output 0 in input order, followed by its bias
//! weight if enabled, then those of output 1, and so on.
use super::Topology;

use bitevo::{Chromosome, Error, Result};

/// Largest supported number of bits per weight.
pub const MAX_BITS_PER_WEIGHT: usize = 32;

pub(crate) fn check_bits(num_bits: usize) -> Result<()> {
    if (1..=MAX_BITS_PER_WEIGHT).contains(&num_bits) {
        Ok(())
    } else {
        Err(Error::domain(format!(
            "{} bits per weight is outside 1..={}",
            num_bits, MAX_BITS_PER_WEIGHT
        )))
    }
}

pub(crate) fn check_range(min_w: f64, max_w: f64) -> Result<()> {
    if min_w.is_finite() && max_w.is_finite() && min_w < max_w {
        Ok(())
    } else {
        Err(Error::domain(format!(
            "invalid weight range [{}, {}]",
            min_w, max_w
        )))
    }
}

fn max_level(num_bits: usize) -> u64 {
    (1u64 << num_bits) - 1
}

/// Encodes a weight as `num_bits` bits.
///
/// Weights outside `[min_w, max_w]` are clamped to the
/// nearest end of the range.
///
/// # Errors
/// Returns a [`Domain`](Error::Domain) error if `num_bits` is
/// not in `1..=`[`MAX_BITS_PER_WEIGHT`], if `min_w >= max_w`
/// or either bound is not finite, or if `weight` is NaN.
///
/// # Examples
/// ```
/// use bitevo_nn::genomics::weight_to_bits;
///
/// assert_eq!(weight_to_bits(-1.0, 4, -1.0, 1.0).unwrap(), vec![false; 4]);
/// assert_eq!(weight_to_bits(1.0, 4, -1.0, 1.0).unwrap(), vec![true; 4]);
/// // Out-of-range weights saturate.
/// assert_eq!(weight_to_bits(7.5, 4, -1.0, 1.0).unwrap(), vec![true; 4]);
/// ```
pub fn weight_to_bits(weight: f64, num_bits: usize, min_w: f64, max_w: f64) -> Result<Vec<bool>> {
    check_bits(num_bits)?;
    check_range(min_w, max_w)?;
    if weight.is_nan() {
        return Err(Error::domain("cannot encode a NaN weight"));
    }

    let max = max_level(num_bits) as f64;
    let level = (max * (weight - min_w) / (max_w - min_w))
        .round()
        .clamp(0.0, max) as u64;

    Ok((0..num_bits).rev().map(|i| (level >> i) & 1 == 1).collect())
}

/// Decodes a weight from its bits. The precision is the
/// number of bits given.
///
/// # Errors
/// Returns a [`Format`](Error::Format) error if `bits` is empty,
/// and a [`Domain`](Error::Domain) error if there are more than
/// [`MAX_BITS_PER_WEIGHT`] bits or the range is invalid.
///
/// # Examples
/// ```
/// use bitevo_nn::genomics::bits_to_weight;
///
/// assert_eq!(bits_to_weight(&[false, false], -3.0, 3.0).unwrap(), -3.0);
/// assert_eq!(bits_to_weight(&[false, true], -3.0, 3.0).unwrap(), -1.0);
/// assert_eq!(bits_to_weight(&[true, true], -3.0, 3.0).unwrap(), 3.0);
/// ```
pub fn bits_to_weight(bits: &[bool], min_w: f64, max_w: f64) -> Result<f64> {
    if bits.is_empty() {
        return Err(Error::Format("cannot decode a weight from zero bits".into()));
    }
    check_bits(bits.len())?;
    check_range(min_w, max_w)?;

    let level = bits
        .iter()
        .fold(0u64, |level, bit| (level << 1) | *bit as u64);
    Ok(min_w + (max_w - min_w) * level as f64 / max_level(bits.len()) as f64)
}

/// Decodes a chromosome into one flat weight sequence per
/// layer transition of `topology`, consuming the chromosome
/// left to right with no gaps or overlaps.
///
/// # Errors
/// Returns a [`LengthMismatch`](Error::LengthMismatch) error if
/// the chromosome is not exactly as long as [`chrom_length`]
/// predicts, or a [`Domain`](Error::Domain) error for an
/// invalid precision or range.
///
/// [`chrom_length`]: super::chrom_length
///
/// # Examples
/// ```
/// use bitevo::Chromosome;
/// use bitevo_nn::genomics::{chromosome_to_weight_matrices, Topology};
///
/// let topology = Topology::new(vec![2, 1]).unwrap();
/// let chromosome: Chromosome = "00_01_11".replace('_', "").parse().unwrap();
///
/// let weights = chromosome_to_weight_matrices(&chromosome, &topology, true, 2, -3.0, 3.0).unwrap();
/// // Two inputs plus a bias feeding the single output.
/// assert_eq!(weights, vec![vec![-3.0, -1.0, 3.0]]);
/// ```
pub fn chromosome_to_weight_matrices(
    chromosome: &Chromosome,
    topology: &Topology,
    bias: bool,
    num_bits: usize,
    min_w: f64,
    max_w: f64,
) -> Result<Vec<Vec<f64>>> {
    let expected = topology.chrom_length(bias, num_bits)?;
    check_range(min_w, max_w)?;
    if chromosome.len() != expected {
        return Err(Error::LengthMismatch {
            expected,
            actual: chromosome.len(),
        });
    }

    let mut fields = chromosome.bits().chunks_exact(num_bits);
    topology
        .weight_counts(bias)?
        .into_iter()
        .map(|count| {
            fields
                .by_ref()
                .take(count)
                .map(|field| bits_to_weight(field, min_w, max_w))
                .collect::<Result<Vec<f64>>>()
        })
        .collect()
}

/// Encodes per-layer weight sequences into a chromosome,
/// in the same order [`chromosome_to_weight_matrices`] reads them.
///
/// # Errors
/// Returns the errors of [`weight_to_bits`].
///
/// # Examples
/// ```
/// use bitevo_nn::genomics::weight_matrices_to_chromosome;
///
/// let chromosome = weight_matrices_to_chromosome(&[vec![-3.0, -1.0, 3.0]], 2, -3.0, 3.0).unwrap();
/// assert_eq!(chromosome.to_string(), "000111");
/// ```
pub fn weight_matrices_to_chromosome(
    matrices: &[Vec<f64>],
    num_bits: usize,
    min_w: f64,
    max_w: f64,
) -> Result<Chromosome> {
    check_bits(num_bits)?;
    check_range(min_w, max_w)?;

    let mut bits = Vec::with_capacity(matrices.iter().map(Vec::len).sum::<usize>() * num_bits);
    for weight in matrices.iter().flatten() {
        bits.extend(weight_to_bits(*weight, num_bits, min_w, max_w)?);
    }
    Ok(Chromosome::from_bits(bits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const RANGES: [(f64, f64); 3] = [(-1.0, 1.0), (-3.0, 3.0), (0.5, 2.0)];

    /// Every topology with 2 to 4 layers of widths 1 to 3.
    fn small_topologies() -> Vec<Topology> {
        let mut topologies = vec![];
        for layer_count in 2..=4u32 {
            for code in 0..3usize.pow(layer_count) {
                let layers = (0..layer_count)
                    .map(|i| code / 3usize.pow(i) % 3 + 1)
                    .collect();
                topologies.push(Topology::new(layers).unwrap());
            }
        }
        topologies
    }

    #[test]
    fn encoding_has_exact_width() {
        for num_bits in 1..=MAX_BITS_PER_WEIGHT {
            for (min_w, max_w) in RANGES {
                for step in 0..=20 {
                    let w = min_w + (max_w - min_w) * step as f64 / 20.0;
                    assert_eq!(weight_to_bits(w, num_bits, min_w, max_w).unwrap().len(), num_bits);
                }
            }
        }
    }

    #[test]
    fn round_trip_within_one_step() {
        for num_bits in 1..=16 {
            for (min_w, max_w) in RANGES {
                let step = (max_w - min_w) / max_level(num_bits) as f64;
                for i in 0..=200 {
                    let w = min_w + (max_w - min_w) * i as f64 / 200.0;
                    let bits = weight_to_bits(w, num_bits, min_w, max_w).unwrap();
                    let decoded = bits_to_weight(&bits, min_w, max_w).unwrap();
                    assert!(
                        (decoded - w).abs() <= step,
                        "{} bits, [{}, {}]: {} -> {}",
                        num_bits,
                        min_w,
                        max_w,
                        w,
                        decoded
                    );
                }
            }
        }
    }

    #[test]
    fn encoding_is_msb_first() {
        // Level 5 of 15 over [0, 15].
        assert_eq!(
            weight_to_bits(5.0, 4, 0.0, 15.0).unwrap(),
            vec![false, true, false, true]
        );
        assert_eq!(bits_to_weight(&[false, true, false, true], 0.0, 15.0).unwrap(), 5.0);
    }

    #[test]
    fn encoding_clamps_out_of_range() {
        assert_eq!(weight_to_bits(-10.0, 3, -1.0, 1.0).unwrap(), vec![false; 3]);
        assert_eq!(weight_to_bits(10.0, 3, -1.0, 1.0).unwrap(), vec![true; 3]);
        assert_eq!(
            weight_to_bits(f64::INFINITY, 3, -1.0, 1.0).unwrap(),
            vec![true; 3]
        );
    }

    #[test]
    fn invalid_parameters_are_domain_errors() {
        for (num_bits, min_w, max_w) in [
            (0, -1.0, 1.0),
            (MAX_BITS_PER_WEIGHT + 1, -1.0, 1.0),
            (8, 1.0, 1.0),
            (8, 1.0, -1.0),
            (8, f64::NEG_INFINITY, 1.0),
        ] {
            assert!(matches!(
                weight_to_bits(0.0, num_bits, min_w, max_w),
                Err(Error::Domain(_))
            ));
        }
        assert!(matches!(
            weight_to_bits(f64::NAN, 8, -1.0, 1.0),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            bits_to_weight(&[true], 2.0, -2.0),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn empty_bits_are_a_format_error() {
        assert!(matches!(bits_to_weight(&[], -1.0, 1.0), Err(Error::Format(_))));
    }

    #[test]
    fn decode_consumes_exactly_chrom_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for topology in small_topologies() {
            for bias in [false, true] {
                for num_bits in [1, 2, 3, 8, 12] {
                    let len = topology.chrom_length(bias, num_bits).unwrap();
                    let chromosome = Chromosome::random(len, &mut rng);
                    let weights = chromosome_to_weight_matrices(
                        &chromosome, &topology, bias, num_bits, -1.0, 1.0,
                    )
                    .unwrap();

                    assert_eq!(weights.len(), topology.layers().len() - 1);
                    for (layer, (from, to)) in weights.iter().zip(topology.transitions()) {
                        assert_eq!(layer.len(), (from + bias as usize) * to);
                    }
                    assert_eq!(weights.iter().map(Vec::len).sum::<usize>() * num_bits, len);

                    let encoded = weight_matrices_to_chromosome(&weights, num_bits, -1.0, 1.0).unwrap();
                    assert_eq!(encoded.len(), len);
                    // Decoded levels re-encode to the same bits.
                    assert_eq!(encoded, chromosome);
                }
            }
        }
    }

    #[test]
    fn wrong_length_is_rejected_before_decoding() {
        let topology = Topology::new(vec![2, 2, 2]).unwrap();
        for len in [0, 95, 97, 192] {
            let chromosome = Chromosome::from_bits(vec![true; len]);
            assert!(matches!(
                chromosome_to_weight_matrices(&chromosome, &topology, true, 8, -1.0, 1.0),
                Err(Error::LengthMismatch { expected: 96, actual }) if actual == len
            ));
        }
    }

    #[test]
    fn all_zero_chromosome_decodes_to_minimum() {
        let topology = Topology::new(vec![3, 4, 2]).unwrap();
        let len = topology.chrom_length(false, 8).unwrap();
        let weights = chromosome_to_weight_matrices(
            &Chromosome::from_bits(vec![false; len]),
            &topology,
            false,
            8,
            -1.0,
            1.0,
        )
        .unwrap();
        assert!(weights.iter().flatten().all(|w| *w == -1.0));
    }
}
