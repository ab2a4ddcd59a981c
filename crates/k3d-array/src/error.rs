//! Error types for array operations.
//!
//! Only programmer errors surface here. Shape mismatches between data sets
//! are measured through [`Accumulator`](k3d_core::Accumulator) instead.

/// Errors arising from array construction or element access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArrayError {
    /// A half-open range did not satisfy `begin <= end <= len`.
    #[error("invalid range {begin}..{end} for array of length {len}")]
    InvalidRange {
        /// Start of the requested range.
        begin: usize,
        /// End of the requested range (exclusive).
        end: usize,
        /// Length of the array.
        len: usize,
    },
    /// A type string does not name a registered element type.
    #[error("unregistered array type: {type_string}")]
    UnregisteredType {
        /// The unrecognized type string.
        type_string: String,
    },
    /// Two arrays that must share a concrete type do not.
    #[error("array type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type string of the destination.
        expected: String,
        /// Type string of the source.
        found: String,
    },
    /// An element index was past the end of an array.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the array.
        len: usize,
    },
    /// A row copy found no source array for a target array.
    #[error("no source array named {name}")]
    MissingArray {
        /// Name of the unmatched target array.
        name: String,
    },
    /// A weighted copy was given different numbers of indices and weights.
    #[error("weighted copy given {indices} indices but {weights} weights")]
    WeightCountMismatch {
        /// Number of source indices.
        indices: usize,
        /// Number of weights.
        weights: usize,
    },
}

impl ArrayError {
    /// Check `begin <= end <= len`.
    pub fn check_range(begin: usize, end: usize, len: usize) -> Result<(), Self> {
        if begin <= end && end <= len {
            Ok(())
        } else {
            Err(Self::InvalidRange { begin, end, len })
        }
    }

    /// Check `index < len`.
    pub fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfBounds { index, len })
        }
    }
}
