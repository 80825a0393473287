/*!
 * Shared Allocator
 * One exclusive writer lock per simulated address space
 */

use super::traits::{Allocator, MemoryInfo};
use super::types::{MemoryPressure, MemoryResult, Process};
use crate::core::id::ProcessId;
use crate::core::types::{Size, SizeRequest};
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle to a single allocator instance
///
/// Clones share the same allocator. Mutations hold the write lock for the whole
/// read-modify-write, so every operation stays atomic across threads.
pub struct SharedAllocator<A> {
    inner: Arc<RwLock<A>>,
}

impl<A: Allocator> SharedAllocator<A> {
    pub fn new(allocator: A) -> Self {
        Self {
            inner: Arc::new(RwLock::new(allocator)),
        }
    }

    pub fn allocate(&self, request: SizeRequest) -> MemoryResult<Process> {
        self.inner.write().allocate(request)
    }

    pub fn deallocate(&self, id: ProcessId) -> Option<Process> {
        self.inner.write().deallocate(id)
    }

    pub fn reset(&self) {
        self.inner.write().reset()
    }

    /// Copy of the live process list
    pub fn processes(&self) -> Vec<Process> {
        self.inner.read().processes().to_vec()
    }

    pub fn capacity(&self) -> Size {
        self.inner.read().capacity()
    }

    pub fn check_invariants(&self) -> MemoryResult<()> {
        self.inner.read().check_invariants()
    }

    /// Run `f` against a consistent view of the allocator
    pub fn with<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<A: MemoryInfo> SharedAllocator<A> {
    pub fn stats(&self) -> A::Stats {
        self.inner.read().stats()
    }

    pub fn pressure(&self) -> MemoryPressure {
        self.inner.read().pressure()
    }
}

impl<A> Clone for SharedAllocator<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
