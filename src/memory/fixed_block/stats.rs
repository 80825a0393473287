/*!
 * Fixed-Block Statistics
 * Derived-on-read accounting, block map, and invariant checks
 */

use super::super::address_space::{AddressSpace, Span};
use super::super::types::{BlockSlot, FixedBlockStats, MemoryError, MemoryResult};
use super::FixedBlockAllocator;
use crate::core::types::{div_ceil, percentage, Size};

impl FixedBlockAllocator {
    /// Number of blocks a request of `size` units occupies
    #[inline]
    pub fn blocks_for(&self, size: Size) -> usize {
        div_ceil(size, self.block_size)
    }

    /// Block-rounded footprint of every live process
    pub fn allocated_memory(&self) -> Size {
        self.processes
            .iter()
            .map(|p| self.blocks_for(p.size) * self.block_size)
            .sum()
    }

    /// Sum of the sizes processes actually asked for
    pub fn requested_memory(&self) -> Size {
        self.processes.iter().map(|p| p.size).sum()
    }

    /// Unused tails of every process's last block
    pub fn internal_fragmentation(&self) -> Size {
        self.allocated_memory() - self.requested_memory()
    }

    pub fn stats(&self) -> FixedBlockStats {
        let total_memory = self.space.capacity();
        let allocated_memory = self.allocated_memory();
        let requested_memory = self.requested_memory();
        let internal_fragmentation = allocated_memory - requested_memory;
        let used_blocks = allocated_memory / self.block_size;
        let free_memory = total_memory.saturating_sub(allocated_memory);

        FixedBlockStats {
            total_memory,
            block_size: self.block_size,
            total_blocks: self.total_blocks,
            used_blocks,
            free_blocks: self.total_blocks - used_blocks,
            allocated_memory,
            requested_memory,
            free_memory,
            internal_fragmentation,
            process_count: self.processes.len(),
            allocated_percentage: percentage(allocated_memory, total_memory),
            free_percentage: percentage(free_memory, total_memory),
            internal_fragmentation_percentage: percentage(internal_fragmentation, total_memory),
        }
    }

    /// Occupancy of every block, in index order
    ///
    /// Only the last block of a process can carry waste.
    pub fn block_map(&self) -> Vec<BlockSlot> {
        let mut slots: Vec<BlockSlot> = (0..self.total_blocks)
            .map(|index| BlockSlot {
                index,
                start_address: index * self.block_size,
                occupant: None,
                occupant_name: None,
                used: 0,
                waste: 0,
            })
            .collect();

        for process in &self.processes {
            let first = process.block_index.unwrap_or_default();
            let blocks = self.blocks_for(process.size);
            for offset in 0..blocks {
                let Some(slot) = slots.get_mut(first + offset) else {
                    break;
                };
                let used = if offset + 1 == blocks {
                    process.size - offset * self.block_size
                } else {
                    self.block_size
                };
                slot.occupant = Some(process.id);
                slot.occupant_name = Some(process.name.clone());
                slot.used = used;
                slot.waste = self.block_size - used;
            }
        }

        slots
    }

    /// Verify block runs are disjoint, in range, and consistent with addresses
    pub fn check_invariants(&self) -> MemoryResult<()> {
        let mut runs = Vec::with_capacity(self.processes.len());
        for process in &self.processes {
            let Some(block_index) = process.block_index else {
                return Err(MemoryError::corruption(
                    process.start_address,
                    format!("{} has no block index", process.name),
                ));
            };
            if process.start_address != block_index * self.block_size {
                return Err(MemoryError::corruption(
                    process.start_address,
                    format!("{} does not start at block {}", process.name, block_index),
                ));
            }
            runs.push(Span::new(block_index, self.blocks_for(process.size)));
        }

        // Block runs are checked in block-index space
        AddressSpace::new(self.total_blocks).verify_disjoint(runs)?;

        let allocated = self.allocated_memory();
        if allocated > self.space.capacity() {
            return Err(MemoryError::corruption(
                self.space.capacity(),
                format!("{} units allocated beyond capacity", allocated - self.space.capacity()),
            ));
        }
        Ok(())
    }
}
