/*!
 * First-Fit Allocator Implementation
 * Placement, splitting, release, and coalescing
 */

use super::super::types::{
    validate_request, FreeRegion, MemoryError, MemoryPressure, MemoryResult, Process,
};
use super::FirstFitAllocator;
use crate::core::id::{IdGenerator, ProcessId};
use crate::core::types::{percentage, InlineString, SizeRequest};
use tracing::{debug, info, warn};

impl FirstFitAllocator {
    /// Place `request` units in the smallest free region that can hold them
    pub fn allocate(&mut self, request: SizeRequest) -> MemoryResult<Process> {
        let size = validate_request(request, self.max_request).map_err(|err| {
            warn!(requested = request, "Rejected first-fit request: {}", err);
            err
        })?;

        let Some(region) = self.free_list.take_best_fit(size) else {
            let available = self.free_list.total_free();
            let largest_free = self.free_list.largest();
            warn!(
                "OOM: requested {} units, largest free region is {} units ({} units free in {} regions)",
                size,
                largest_free,
                available,
                self.free_list.len()
            );
            return Err(MemoryError::OutOfMemory {
                requested: size,
                available,
                largest_free,
                total: self.space.capacity(),
            });
        };

        let id = self.process_ids.next();
        let process = Process {
            id,
            name: InlineString::from(format!("P{}", self.names.next())),
            size,
            start_address: region.start_address,
            block_index: None,
        };

        // Return the unused tail of the chosen region to the free list
        if region.size > size {
            let remainder = FreeRegion {
                id: self.region_ids.next(),
                start_address: region.start_address + size,
                size: region.size - size,
            };
            debug!(
                "Split region at 0x{:x}: keeping {} units, returning {} units at 0x{:x}",
                region.start_address, size, remainder.size, remainder.start_address
            );
            self.free_list.insert(remainder);
        }
        self.processes.push(process.clone());

        let allocated = self.allocated_memory();
        match MemoryPressure::from_usage(allocated, self.space.capacity()) {
            MemoryPressure::Low => info!(
                "Allocated {} ({} units) at 0x{:x} from a {} unit region",
                process.name, size, process.start_address, region.size
            ),
            level => warn!(
                "Memory pressure {}: allocated {} ({} units) at 0x{:x} ({:.1}% used: {} / {})",
                level,
                process.name,
                size,
                process.start_address,
                percentage(allocated, self.space.capacity()),
                allocated,
                self.space.capacity()
            ),
        }

        debug_assert!(self.check_invariants().is_ok());
        Ok(process)
    }

    /// Release a live process and coalesce its range into the free list
    pub fn deallocate(&mut self, id: ProcessId) -> Option<Process> {
        let Some(position) = self.processes.iter().position(|p| p.id == id) else {
            debug!("Ignoring release of {}: not a live process", id);
            return None;
        };

        let process = self.processes.remove(position);
        self.free_list.insert(FreeRegion {
            id: self.region_ids.next(),
            start_address: process.start_address,
            size: process.size,
        });
        let merged = self.free_list.coalesce();

        info!(
            "Deallocated {} ({} units at 0x{:x}), merged {} regions ({} free regions, {} units free)",
            process.name,
            process.size,
            process.start_address,
            merged,
            self.free_list.len(),
            self.free_list.total_free()
        );

        debug_assert!(self.check_invariants().is_ok());
        Some(process)
    }

    /// Drop every process and restore a single free region
    pub fn reset(&mut self) {
        let released = self.processes.len();
        self.processes.clear();
        self.free_list = Self::initial_free_list(self.space);
        self.names.reset();
        self.region_ids.reset();
        info!(released, "First-fit allocator reset");
    }
}
