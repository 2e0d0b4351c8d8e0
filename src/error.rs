//! Error type shared by every collection in the crate.
//!
//! Lookups that can simply miss return `Option`. `CollectionError` is reserved for
//! operations whose *arguments* can be invalid: a load factor outside `(0, 1]`, a
//! front-coding ratio of zero, an index past the end of an indirect queue's
//! reference array, or a table that would exceed the maximum size. Binary dumps
//! report their failures as [`CollectionError::Io`].

use thiserror::Error;

/// Main error type for prim-collections.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    /// Load factor not in `(0, 1]`.
    #[error("Illegal load factor: {load_factor} (must be greater than 0 and at most 1)")]
    InvalidLoadFactor {
        /// The rejected load factor
        load_factor: f32,
    },

    /// A table or array would need more slots than the crate allows.
    #[error("Capacity overflow: {requested} elements requested")]
    CapacityOverflow {
        /// Number of elements that were requested
        requested: usize,
    },

    /// Negative or otherwise unusable initial capacity.
    #[error("Illegal capacity: {capacity}")]
    InvalidCapacity {
        /// The rejected capacity
        capacity: usize,
    },

    /// Front-coding block ratio must be at least one.
    #[error("Illegal ratio: {ratio}")]
    InvalidRatio {
        /// The rejected ratio
        ratio: usize,
    },

    /// Index outside `0..len`.
    #[error("Index out of bounds: index {index}, len {len}")]
    IndexOutOfBounds {
        /// The invalid index
        index: u64,
        /// The valid length
        len: u64,
    },

    /// An indirect queue already holds this reference index.
    #[error("Index {index} is already in the queue")]
    DuplicateIndex {
        /// The rejected index
        index: usize,
    },

    /// Operation requires a non-empty collection.
    #[error("No such element")]
    NoSuchElement,

    /// Reading or writing a binary dump failed.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the failure
        message: String,
    },
}

impl CollectionError {
    /// Create an invalid load factor error
    pub fn invalid_load_factor(load_factor: f32) -> Self {
        Self::InvalidLoadFactor { load_factor }
    }

    /// Create a capacity overflow error
    pub fn capacity_overflow(requested: usize) -> Self {
        Self::CapacityOverflow { requested }
    }

    /// Create an invalid ratio error
    pub fn invalid_ratio(ratio: usize) -> Self {
        Self::InvalidRatio { ratio }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::big_out_of_bounds(index as u64, len as u64)
    }

    /// Create an out of bounds error for a `u64`-indexed big array
    pub fn big_out_of_bounds(index: u64, len: u64) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create an I/O error
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Short category name, handy for log lines.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidLoadFactor { .. } => "load_factor",
            Self::CapacityOverflow { .. } => "capacity",
            Self::InvalidCapacity { .. } => "capacity",
            Self::InvalidRatio { .. } => "ratio",
            Self::IndexOutOfBounds { .. } => "bounds",
            Self::DuplicateIndex { .. } => "bounds",
            Self::NoSuchElement => "empty",
            Self::Io { .. } => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Checks that `index < len`.
#[inline]
pub fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        Err(CollectionError::out_of_bounds(index, len))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = CollectionError::out_of_bounds(5, 3);
        assert_eq!(err.to_string(), "Index out of bounds: index 5, len 3");

        let err = CollectionError::invalid_ratio(0);
        assert_eq!(err.to_string(), "Illegal ratio: 0");

        let err = CollectionError::DuplicateIndex { index: 2 };
        assert_eq!(err.to_string(), "Index 2 is already in the queue");

        let err = CollectionError::invalid_load_factor(1.5);
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_error_category() {
        assert_eq!(CollectionError::NoSuchElement.category(), "empty");
        assert_eq!(CollectionError::capacity_overflow(1).category(), "capacity");
        assert_eq!(CollectionError::out_of_bounds(0, 0).category(), "bounds");
        assert_eq!(CollectionError::io_error("truncated").category(), "io");
    }

    #[test]
    fn test_error_check_index() {
        assert!(check_index(0, 1).is_ok());
        assert_eq!(check_index(1, 1), Err(CollectionError::out_of_bounds(1, 1)));
    }
}
