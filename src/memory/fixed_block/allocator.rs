/*!
 * Fixed-Block Allocator Implementation
 * Allocation and deallocation logic
 */

use super::super::types::{validate_request, MemoryError, MemoryPressure, MemoryResult, Process};
use super::FixedBlockAllocator;
use crate::core::id::{IdGenerator, ProcessId};
use crate::core::types::{div_ceil, percentage, InlineString, SizeRequest};
use tracing::{debug, info, warn};

impl FixedBlockAllocator {
    /// Allocate the lowest run of free blocks that fits `request`
    pub fn allocate(&mut self, request: SizeRequest) -> MemoryResult<Process> {
        let size = validate_request(request, self.max_request).map_err(|err| {
            warn!(requested = request, "Rejected fixed-block request: {}", err);
            err
        })?;

        let blocks_needed = div_ceil(size, self.block_size);
        let occupancy = self.occupancy();

        let Some(start_block) = Self::first_free_run(&occupancy, blocks_needed) else {
            let free_blocks = occupancy.iter().filter(|used| !**used).count();
            let largest_run = Self::longest_free_run(&occupancy);
            warn!(
                "OOM: {} units need {} contiguous blocks, longest free run is {} blocks ({} of {} blocks free)",
                size, blocks_needed, largest_run, free_blocks, self.total_blocks
            );
            return Err(MemoryError::OutOfMemory {
                requested: size,
                available: free_blocks * self.block_size,
                largest_free: largest_run * self.block_size,
                total: self.space.capacity(),
            });
        };

        let id = self.ids.next();
        let process = Process {
            id,
            name: InlineString::from(format!("P{}", self.names.next())),
            size,
            start_address: start_block * self.block_size,
            block_index: Some(start_block),
        };
        self.processes.push(process.clone());

        let allocated = self.allocated_memory();
        let waste = blocks_needed * self.block_size - size;
        match MemoryPressure::from_usage(allocated, self.space.capacity()) {
            MemoryPressure::Low => info!(
                "Allocated {} ({} units) in blocks {}..{} ({} units wasted)",
                process.name,
                size,
                start_block,
                start_block + blocks_needed,
                waste
            ),
            level => warn!(
                "Memory pressure {}: allocated {} ({} units) in blocks {}..{} ({:.1}% used: {} / {})",
                level,
                process.name,
                size,
                start_block,
                start_block + blocks_needed,
                percentage(allocated, self.space.capacity()),
                allocated,
                self.space.capacity()
            ),
        }

        debug_assert!(self.check_invariants().is_ok());
        Ok(process)
    }

    /// Release a live process; its blocks become free implicitly
    pub fn deallocate(&mut self, id: ProcessId) -> Option<Process> {
        let Some(position) = self.processes.iter().position(|p| p.id == id) else {
            debug!("Ignoring release of {}: not a live process", id);
            return None;
        };

        let process = self.processes.remove(position);
        info!(
            "Deallocated {} ({} units) from block {}",
            process.name,
            process.size,
            process.block_index.unwrap_or_default()
        );

        debug_assert!(self.check_invariants().is_ok());
        Some(process)
    }

    /// Clear every process and rewind the naming counter
    pub fn reset(&mut self) {
        let released = self.processes.len();
        self.processes.clear();
        self.names.reset();
        info!(released, "Fixed-block allocator reset");
    }

    /// Per-block occupancy derived from the live process list
    pub(super) fn occupancy(&self) -> Vec<bool> {
        let mut used = vec![false; self.total_blocks];
        for process in &self.processes {
            let start = process.block_index.unwrap_or_default();
            let end = (start + self.blocks_for(process.size)).min(self.total_blocks);
            used[start..end].iter_mut().for_each(|slot| *slot = true);
        }
        used
    }

    /// Lowest start index of `needed` consecutive free blocks
    fn first_free_run(occupancy: &[bool], needed: usize) -> Option<usize> {
        let last_start = occupancy.len().checked_sub(needed)?;
        (0..=last_start).find(|&start| occupancy[start..start + needed].iter().all(|used| !used))
    }

    fn longest_free_run(occupancy: &[bool]) -> usize {
        occupancy
            .split(|used| *used)
            .map(|run| run.len())
            .max()
            .unwrap_or(0)
    }
}
