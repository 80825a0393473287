/*!
 * Fixed-Block Allocation
 *
 * Divides the address space into equal-size blocks and places each process in
 * a contiguous run of whole blocks.
 *
 * ## Placement
 *
 * - A request of `size` units needs `ceil(size / block_size)` blocks
 * - Start indices are scanned in ascending order; the first fully free run wins
 * - The process occupies the run from its first byte, so the tail of its last
 *   block is wasted (internal fragmentation)
 *
 * ## Bookkeeping
 *
 * Only the live process list is stored. Block occupancy is derived from it on
 * demand, so releasing a process frees its blocks implicitly.
 */

mod allocator;
mod stats;

use super::address_space::AddressSpace;
use super::traits::{Allocator, MemoryInfo};
use super::types::{FixedBlockStats, MemoryResult, Process};
use crate::config::{ConfigError, FixedBlockConfig};
use crate::core::id::{NameCounter, ProcessId, ProcessIdGenerator};
use crate::core::types::{Size, SizeRequest};
use tracing::info;

/// Fixed-size block allocator
#[derive(Debug, Clone)]
pub struct FixedBlockAllocator {
    space: AddressSpace,
    block_size: Size,
    total_blocks: usize,
    max_request: Option<Size>,
    processes: Vec<Process>,
    /// Never rewound, so an id is unique for the allocator's lifetime
    ids: ProcessIdGenerator,
    /// Display-name counter (`P{n}`), rewound on reset
    names: NameCounter,
}

impl FixedBlockAllocator {
    /// Create an allocator over `total_memory` units split into `block_size` blocks
    ///
    /// A trailing partial block, when `block_size` does not divide
    /// `total_memory`, is never handed out.
    ///
    /// Zero sizes, or a block larger than the space, are rejected as [`ConfigError`]s.
    pub fn new(total_memory: Size, block_size: Size) -> Result<Self, ConfigError> {
        Self::with_config(&FixedBlockConfig {
            total_memory,
            block_size,
            max_request: None,
        })
    }

    /// Create an allocator from validated configuration
    pub fn with_config(config: &FixedBlockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let total_blocks = config.total_memory / config.block_size;
        info!(
            total_memory = config.total_memory,
            block_size = config.block_size,
            total_blocks,
            "Fixed-block allocator initialized"
        );
        Ok(Self {
            space: AddressSpace::new(config.total_memory),
            block_size: config.block_size,
            total_blocks,
            max_request: config.max_request,
            processes: Vec::new(),
            ids: ProcessIdGenerator::default_start(),
            names: NameCounter::default_start(),
        })
    }

    /// Cap the size of a single request
    pub fn with_max_request(mut self, max_request: Option<Size>) -> Self {
        self.max_request = max_request;
        self
    }

    #[inline]
    pub fn block_size(&self) -> Size {
        self.block_size
    }

    #[inline]
    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    #[inline]
    pub fn max_request(&self) -> Option<Size> {
        self.max_request
    }
}

// Implement trait interfaces
impl Allocator for FixedBlockAllocator {
    fn allocate(&mut self, request: SizeRequest) -> MemoryResult<Process> {
        FixedBlockAllocator::allocate(self, request)
    }

    fn deallocate(&mut self, id: ProcessId) -> Option<Process> {
        FixedBlockAllocator::deallocate(self, id)
    }

    fn reset(&mut self) {
        FixedBlockAllocator::reset(self)
    }

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn capacity(&self) -> Size {
        self.space.capacity()
    }

    fn check_invariants(&self) -> MemoryResult<()> {
        FixedBlockAllocator::check_invariants(self)
    }
}

impl MemoryInfo for FixedBlockAllocator {
    type Stats = FixedBlockStats;

    fn stats(&self) -> FixedBlockStats {
        FixedBlockAllocator::stats(self)
    }

    fn allocated_memory(&self) -> Size {
        FixedBlockAllocator::allocated_memory(self)
    }
}
