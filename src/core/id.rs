/*!
 * ID Generation System
 * Type-safe identifiers for simulated processes and free regions
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::num::ParseIntError;
use std::str::FromStr;

// ============================================================================
// Type-Safe ID Wrappers
// ============================================================================

/// Identity of a live simulated process
///
/// Rendered as `process-<n>`; parsing accepts either that form or the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u64);

/// Identity of a free region in the first-fit free list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl ProcessId {
    const PREFIX: &'static str = "process-";
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "free-{}", self.0)
    }
}

impl FromStr for ProcessId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix(Self::PREFIX).unwrap_or(s.trim());
        digits.parse::<u64>().map(ProcessId)
    }
}

impl From<u64> for ProcessId {
    fn from(raw: u64) -> Self {
        ProcessId(raw)
    }
}

impl From<u64> for RegionId {
    fn from(raw: u64) -> Self {
        RegionId(raw)
    }
}

// ============================================================================
// ID Generator Trait
// ============================================================================

/// Generic ID generator interface
pub trait IdGenerator<T> {
    /// Generate next ID
    fn next(&mut self) -> T;

    /// Rewind to the initial value
    ///
    /// Only for counters whose values may repeat, such as display names.
    fn reset(&mut self);
}

// ============================================================================
// Sequential Generator
// ============================================================================

/// Monotonic counter generator
///
/// Values repeat only after an explicit `reset`.
#[derive(Debug, Clone)]
pub struct SequentialGenerator<T> {
    start: u64,
    counter: u64,
    _marker: PhantomData<T>,
}

impl<T> SequentialGenerator<T> {
    /// Create new generator starting at given value
    #[inline]
    pub fn new(start: u64) -> Self {
        Self {
            start,
            counter: start,
            _marker: PhantomData,
        }
    }

    /// Create new generator starting at 1
    #[inline]
    pub fn default_start() -> Self {
        Self::new(1)
    }
}

impl<T: From<u64>> IdGenerator<T> for SequentialGenerator<T> {
    #[inline]
    fn next(&mut self) -> T {
        let id = self.counter;
        self.counter += 1;
        T::from(id)
    }

    #[inline]
    fn reset(&mut self) {
        self.counter = self.start;
    }
}

// ============================================================================
// Convenience Type Aliases
// ============================================================================

/// Process ID generator (allocators never rewind it)
pub type ProcessIdGenerator = SequentialGenerator<ProcessId>;

/// Free region ID generator
pub type RegionIdGenerator = SequentialGenerator<RegionId>;

/// Plain counter behind `P{n}` display names
pub type NameCounter = SequentialGenerator<u64>;

// ============================================================================
// Tests
// ============================================================================
