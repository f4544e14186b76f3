//! Error types.

use core::alloc::Layout;
use core::fmt;

/// Returned by unique-key inserts.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertError<T> {
    /// An equal element is already resident. Carries the rejected value;
    /// the table is unchanged.
    DuplicateKey(T),
}

impl<T> InsertError<T> {
    /// Recover the value that was not inserted.
    pub fn into_inner(self) -> T {
        match self {
            InsertError::DuplicateKey(value) => value,
        }
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey(_) => f.write_str("an equal key is already present"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for InsertError<T> {}

/// The error type for fallible bucket-array allocation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The requested bucket count does not fit in `usize`, or no prime
    /// at or above it does.
    CapacityOverflow,

    /// The allocator returned an error.
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
}

impl TryReserveError {
    /// Classify a failed `Vec` reservation of `elems` elements of `E`.
    ///
    /// `Vec` reports a capacity overflow exactly when the array layout cannot
    /// be formed, so the layout alone decides the variant.
    pub(crate) fn for_array<E>(_err: std::collections::TryReserveError, elems: usize) -> Self {
        match Layout::array::<E>(elems) {
            Ok(layout) => TryReserveError::AllocError { layout },
            Err(_) => TryReserveError::CapacityOverflow,
        }
    }
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryReserveError::CapacityOverflow => {
                f.write_str("bucket count exceeds the maximum table capacity")
            }
            TryReserveError::AllocError { layout } => write!(
                f,
                "memory allocation of {} bytes for the bucket array failed",
                layout.size()
            ),
        }
    }
}

impl std::error::Error for TryReserveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_returns_value() {
        let err = InsertError::DuplicateKey(String::from("k"));
        assert_eq!(err.to_string(), "an equal key is already present");
        assert_eq!(err.into_inner(), "k");
    }

    #[test]
    fn std_overflow_maps_to_capacity_overflow() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve_exact(usize::MAX).unwrap_err();
        assert_eq!(
            TryReserveError::for_array::<u64>(err, usize::MAX),
            TryReserveError::CapacityOverflow
        );
    }
}
