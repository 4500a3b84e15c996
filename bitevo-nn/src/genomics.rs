//! Genomics covers how a network is written into a chromosome:
//! the network's shape, resolved into a [`Topology`], and the
//! binary encoding of its weights.
mod codec;
mod config;
mod topology;

pub use codec::{
    bits_to_weight, chromosome_to_weight_matrices, weight_matrices_to_chromosome, weight_to_bits,
    MAX_BITS_PER_WEIGHT,
};
pub use config::GeneticConfig;
pub use topology::{chrom_length, resolve, HiddenLayers, Topology};
