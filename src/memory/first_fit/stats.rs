/*!
 * First-Fit Statistics
 * Derived-on-read accounting, address layout, and invariant checks
 */

use super::super::address_space::Span;
use super::super::types::{
    fragmentation_ratio, FirstFitStats, FreeRegion, MemoryError, MemoryResult, Segment,
};
use super::FirstFitAllocator;
use crate::core::types::{percentage, Size};

impl FirstFitAllocator {
    /// Sum of live process sizes
    pub fn allocated_memory(&self) -> Size {
        self.processes.iter().map(|p| p.size).sum()
    }

    pub fn total_free_memory(&self) -> Size {
        self.free_list.total_free()
    }

    /// Free regions strictly smaller than the fragment threshold
    pub fn fragmented_regions(&self) -> impl Iterator<Item = &FreeRegion> + '_ {
        self.free_list
            .iter()
            .filter(move |region| region.size < self.fragment_threshold)
    }

    pub fn external_fragmentation(&self) -> Size {
        self.fragmented_regions().map(|region| region.size).sum()
    }

    pub fn stats(&self) -> FirstFitStats {
        let total_memory = self.space.capacity();
        let allocated_memory = self.allocated_memory();
        let total_free_memory = self.free_list.total_free();
        let largest_free_region = self.free_list.largest();
        let external_fragmentation = self.external_fragmentation();

        FirstFitStats {
            total_memory,
            allocated_memory,
            total_free_memory,
            free_regions: self.free_list.len(),
            largest_free_region,
            fragment_threshold: self.fragment_threshold,
            fragmented_regions: self.fragmented_regions().count(),
            external_fragmentation,
            process_count: self.processes.len(),
            allocated_percentage: percentage(allocated_memory, total_memory),
            free_percentage: percentage(total_free_memory, total_memory),
            external_fragmentation_percentage: percentage(external_fragmentation, total_memory),
            fragmentation_ratio: fragmentation_ratio(total_free_memory, largest_free_region),
        }
    }

    /// Processes and free regions merged into one address-ordered sequence
    pub fn layout(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = self
            .processes
            .iter()
            .cloned()
            .map(Segment::Process)
            .chain(self.free_list.iter().cloned().map(Segment::Free))
            .collect();
        segments.sort_by_key(Segment::start_address);
        segments
    }

    /// Verify the exact partition of the address space and non-adjacency of free regions
    pub fn check_invariants(&self) -> MemoryResult<()> {
        let spans = self
            .processes
            .iter()
            .map(|p| Span::new(p.start_address, p.size))
            .chain(
                self.free_list
                    .iter()
                    .map(|r| Span::new(r.start_address, r.size)),
            );
        self.space.verify_partition(spans)?;

        let regions: Vec<&FreeRegion> = self.free_list.iter().collect();
        for pair in regions.windows(2) {
            if pair[0].is_adjacent_to(pair[1]) {
                return Err(MemoryError::corruption(
                    pair[1].start_address,
                    format!("free regions {} and {} are adjacent", pair[0].id, pair[1].id),
                ));
            }
        }
        Ok(())
    }
}
