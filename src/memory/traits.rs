/*!
 * Memory Traits
 * Allocator abstractions shared by both simulated disciplines
 */

use super::types::*;
use crate::core::id::ProcessId;
use crate::core::types::{Size, SizeRequest};
use serde::Serialize;

/// Simulated allocator interface
///
/// Every operation is atomic: it either fully applies or leaves state untouched.
pub trait Allocator {
    /// Place a new process of `request` units
    fn allocate(&mut self, request: SizeRequest) -> MemoryResult<Process>;

    /// Release a live process, returning it
    ///
    /// Unknown ids are a no-op, so duplicate or late releases are harmless.
    fn deallocate(&mut self, id: ProcessId) -> Option<Process>;

    /// Return to the freshly constructed state
    fn reset(&mut self);

    /// Live processes in allocation order
    fn processes(&self) -> &[Process];

    /// Total capacity of the address space
    fn capacity(&self) -> Size;

    /// Verify the structural invariants of the allocator
    fn check_invariants(&self) -> MemoryResult<()>;
}

/// Memory statistics provider
pub trait MemoryInfo: Allocator {
    type Stats: Clone + Serialize;

    /// Statistics derived from the current live sets
    fn stats(&self) -> Self::Stats;

    /// Units currently charged against capacity
    fn allocated_memory(&self) -> Size;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        MemoryPressure::from_usage(self.allocated_memory(), self.capacity())
    }
}
