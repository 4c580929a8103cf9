//! Error types for the hashkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (zero capacity, zero cache bound, shrinking a table below its entry
//!   count).
//! - [`InvariantError`]: Returned when internal data-structure invariants
//!   are violated (debug-only `check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use hashkit::error::ConfigError;
//! use hashkit::cache::mru::MruCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<MruCache<i32>, ConfigError> = MruCache::with_bound(4);
//! assert!(cache.is_ok());
//!
//! // Invalid bound is caught without panicking
//! let bad = MruCache::<i32>::with_bound(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`OpenAddressingTable::with_capacity`](crate::table::open_addressing::OpenAddressingTable::with_capacity)
/// and [`MruCache::with_bound`](crate::cache::mru::MruCache::with_bound), and
/// by explicit `resize` calls that cannot be honored. Carries a
/// human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use hashkit::hash::FxSeedHasher;
/// use hashkit::table::chained::ChainedTable;
///
/// let err = ChainedTable::<i32>::with_capacity(0, FxSeedHasher::new(1)).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal structure invariants are violated.
///
/// Produced by debug-only `check_invariants` methods on the table and cache
/// types. Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("capacity must be > 0");
        assert_eq!(err.to_string(), "capacity must be > 0");
    }

    #[test]
    fn config_debug_includes_message() {
        let err = ConfigError::new("bad bound");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("bad bound"));
    }

    #[test]
    fn config_message_accessor() {
        let err = ConfigError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("index/list length mismatch");
        assert_eq!(err.to_string(), "index/list length mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
