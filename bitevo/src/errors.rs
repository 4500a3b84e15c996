use thiserror::Error;

/// Errors raised while encoding, decoding, evaluating
/// or evolving chromosomes.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid numeric range, bit-width, topology, or
    /// operator argument.
    #[error("domain error: {0}")]
    Domain(String),

    /// A chromosome's length does not match the length
    /// implied by its topology and precision.
    #[error("chromosome length mismatch: expected {expected} bits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A bit string contained something other than `'0'` and `'1'`,
    /// or was empty where bits were required.
    #[error("malformed bit string: {0}")]
    Format(String),

    /// An input vector's width does not match the network's input layer.
    #[error("input width mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The externally supplied fitness function failed.
    #[error("fitness evaluation failed for individual {index}: {source}")]
    Evaluation {
        index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::Domain`].
    pub fn domain(msg: impl Into<String>) -> Error {
        Error::Domain(msg.into())
    }
}
