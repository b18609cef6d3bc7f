//! Generation ID allocation.
//!
//! IDs are sequence numbers handed out by a per-session allocator, so they are
//! unique within a session and increase with submission order. They render with
//! a `gen-` prefix.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix used when displaying a generation ID.
pub const PREFIX_GENERATION: &str = "gen";

/// Identity of one generation. Never changes once assigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct GenerationId(u64);

impl GenerationId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX_GENERATION}-{}", self.0)
    }
}

/// Monotonic ID source. Starts at 1.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Allocate the next ID.
    pub const fn next_id(&mut self) -> GenerationId {
        self.last += 1;
        GenerationId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_monotonic_and_unique() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
        assert_eq!(a.get(), 1);
    }

    #[test]
    fn display_uses_prefix() {
        assert_eq!(GenerationId::new(42).to_string(), "gen-42");
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&GenerationId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
