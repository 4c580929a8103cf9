//! Bounded caches composed from a hash index and an ordering structure.

pub mod mru;

pub use mru::MruCache;
