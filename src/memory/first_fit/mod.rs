/*!
 * First-Fit Allocation
 *
 * Variable-size allocator over an explicit free list.
 *
 * ## Placement
 *
 * Among free regions large enough for a request, the smallest is chosen (ties
 * go to the lowest address). The process takes the front of that region and
 * any remainder goes back on the free list, so each allocation consumes one
 * region and produces at most one.
 *
 * ## Release
 *
 * A released process becomes a free region of exactly its range, then the
 * free list is coalesced: every run of adjacent regions collapses into one.
 * Free regions are therefore never adjacent between operations.
 *
 * ## Reporting
 *
 * Regions smaller than `fragment_threshold` are counted as external
 * fragmentation. The threshold only affects reporting, never placement.
 */

mod allocator;
mod free_list;
mod stats;

use super::address_space::AddressSpace;
use super::traits::{Allocator, MemoryInfo};
use super::types::{FirstFitStats, FreeRegion, MemoryResult, Process};
use crate::config::{ConfigError, FirstFitConfig};
use crate::core::id::{NameCounter, ProcessId, ProcessIdGenerator, RegionId, RegionIdGenerator};
use crate::core::limits::DEFAULT_FRAGMENT_THRESHOLD;
use crate::core::types::{Size, SizeRequest};
use free_list::FreeList;
use tracing::info;

/// Id of the region spanning the whole space after construction or reset
pub const INITIAL_REGION_ID: RegionId = RegionId(0);

/// First-fit (smallest sufficient region) allocator
#[derive(Debug, Clone)]
pub struct FirstFitAllocator {
    space: AddressSpace,
    fragment_threshold: Size,
    max_request: Option<Size>,
    processes: Vec<Process>,
    free_list: FreeList,
    /// Never rewound, so an id is unique for the allocator's lifetime
    process_ids: ProcessIdGenerator,
    /// Display-name counter (`P{n}`), rewound on reset
    names: NameCounter,
    region_ids: RegionIdGenerator,
}

impl FirstFitAllocator {
    /// Create an allocator whose free list is one region spanning `total_memory`
    ///
    /// A zero-sized space is rejected with [`ConfigError::ZeroCapacity`].
    pub fn new(total_memory: Size) -> Result<Self, ConfigError> {
        Self::with_config(&FirstFitConfig {
            total_memory,
            fragment_threshold: DEFAULT_FRAGMENT_THRESHOLD,
            max_request: None,
        })
    }

    /// Create an allocator from validated configuration
    pub fn with_config(config: &FirstFitConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            total_memory = config.total_memory,
            "First-fit allocator initialized with a single free region"
        );
        let space = AddressSpace::new(config.total_memory);
        Ok(Self {
            space,
            fragment_threshold: config.fragment_threshold,
            max_request: config.max_request,
            processes: Vec::new(),
            free_list: Self::initial_free_list(space),
            process_ids: ProcessIdGenerator::default_start(),
            names: NameCounter::default_start(),
            region_ids: RegionIdGenerator::default_start(),
        })
    }

    /// Set the size below which free regions are reported as fragmented
    pub fn with_fragment_threshold(mut self, threshold: Size) -> Self {
        self.fragment_threshold = threshold;
        self
    }

    /// Cap the size of a single request
    pub fn with_max_request(mut self, max_request: Option<Size>) -> Self {
        self.max_request = max_request;
        self
    }

    fn initial_free_list(space: AddressSpace) -> FreeList {
        let span = space.full_span();
        FreeList::spanning(FreeRegion {
            id: INITIAL_REGION_ID,
            start_address: span.start,
            size: span.len,
        })
    }

    #[inline]
    pub fn fragment_threshold(&self) -> Size {
        self.fragment_threshold
    }

    #[inline]
    pub fn max_request(&self) -> Option<Size> {
        self.max_request
    }

    /// Free regions in address order
    pub fn free_regions(&self) -> Vec<FreeRegion> {
        self.free_list.iter().cloned().collect()
    }
}

// Implement trait interfaces
impl Allocator for FirstFitAllocator {
    fn allocate(&mut self, request: SizeRequest) -> MemoryResult<Process> {
        FirstFitAllocator::allocate(self, request)
    }

    fn deallocate(&mut self, id: ProcessId) -> Option<Process> {
        FirstFitAllocator::deallocate(self, id)
    }

    fn reset(&mut self) {
        FirstFitAllocator::reset(self)
    }

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn capacity(&self) -> Size {
        self.space.capacity()
    }

    fn check_invariants(&self) -> MemoryResult<()> {
        FirstFitAllocator::check_invariants(self)
    }
}

impl MemoryInfo for FirstFitAllocator {
    type Stats = FirstFitStats;

    fn stats(&self) -> FirstFitStats {
        FirstFitAllocator::stats(self)
    }

    fn allocated_memory(&self) -> Size {
        FirstFitAllocator::allocated_memory(self)
    }
}
