// # Response Cache Implementations
//
// This module provides implementations of the ResponseCache trait.

pub mod memory;

pub use memory::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, MemoryResponseCache};
