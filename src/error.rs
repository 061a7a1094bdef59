//! Precondition errors
//!
//! Every prover, setup routine and shape-checking verifier reports malformed
//! inputs through [`Error`]. Cryptographic rejection is *not* an error: the
//! verifiers return `false` for a well-typed proof that does not check out.

#![forbid(unsafe_code)]

/// Precondition violations raised by the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transform or domain was requested with a length that is not a power of two.
    #[error("length {len} is not a power of two")]
    NotPowerOfTwo {
        /// Offending length.
        len: usize,
    },
    /// An index does not address an element of the domain, vector or tree.
    #[error("index {index} is out of range for size {size}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Size of the indexed object.
        size: usize,
    },
    /// Two inputs that must pair up element-wise have different lengths.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Provided length.
        got: usize,
    },
    /// A polynomial does not fit under the SRS.
    #[error("{len} scalars exceed the {max} available SRS bases")]
    DegreeTooLarge {
        /// Number of scalars to commit.
        len: usize,
        /// Number of bases available.
        max: usize,
    },
    /// FRI only folds by 2, 4, 8 or 16.
    #[error("unsupported folding factor {0}")]
    UnsupportedFoldingFactor(usize),
    /// FRI remainder must hold at least one full folding group.
    #[error("max remainder size {max_remainder_size} is smaller than folding factor {folding_factor}")]
    RemainderTooSmall {
        /// Configured maximum remainder size.
        max_remainder_size: usize,
        /// Configured folding factor.
        folding_factor: usize,
    },
    /// The Merkle tree has no free leaf slot left.
    #[error("merkle tree is full (capacity {capacity})")]
    TreeFull {
        /// Leaf capacity of the tree.
        capacity: usize,
    },
    /// A division by zero would occur, e.g. a point coincides with the domain.
    #[error("zero divisor: {0}")]
    ZeroDivisor(&'static str),
    /// An operation that needs at least one element received none.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    /// Imported or generated parameters violate their structural invariants.
    #[error("malformed parameters: {0}")]
    MalformedParams(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
