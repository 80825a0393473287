/*!
 * Address-Ordered Free List
 * Free region bookkeeping for the first-fit allocator
 */

use super::super::types::FreeRegion;
use crate::core::types::{Address, Size};
use std::collections::BTreeMap;
use tracing::debug;

/// Free regions keyed by start address
///
/// Address order makes both the best-fit scan and coalescing a single linear walk.
#[derive(Debug, Clone, Default)]
pub(super) struct FreeList {
    regions: BTreeMap<Address, FreeRegion>,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free list holding a single region
    pub fn spanning(region: FreeRegion) -> Self {
        let mut free_list = Self::new();
        free_list.insert(region);
        free_list
    }

    pub fn insert(&mut self, region: FreeRegion) {
        debug_assert!(region.size > 0, "free regions are never empty");
        self.regions.insert(region.start_address, region);
    }

    /// Remove and return the smallest region of at least `size` units
    ///
    /// Ties go to the lowest start address.
    pub fn take_best_fit(&mut self, size: Size) -> Option<FreeRegion> {
        let address = self
            .regions
            .values()
            .filter(|region| region.size >= size)
            .min_by_key(|region| (region.size, region.start_address))
            .map(|region| region.start_address)?;
        self.regions.remove(&address)
    }

    /// Merge every run of adjacent regions into one
    ///
    /// Merging is transitive, so any number of contiguous regions collapse in
    /// one pass. The merged region keeps the id of its lowest-addressed member.
    /// Returns the number of merges performed.
    pub fn coalesce(&mut self) -> usize {
        if self.regions.len() < 2 {
            return 0;
        }

        let before = self.regions.len();
        let mut merged: Vec<FreeRegion> = Vec::with_capacity(before);
        for region in std::mem::take(&mut self.regions).into_values() {
            match merged.last_mut() {
                Some(current) if current.is_adjacent_to(&region) => {
                    current.size += region.size;
                }
                _ => merged.push(region),
            }
        }

        let coalesced_count = before - merged.len();
        if coalesced_count > 0 {
            debug!(
                "Coalesced {} adjacent free regions, reduced from {} to {} regions",
                coalesced_count,
                before,
                merged.len()
            );
        }

        self.regions = merged
            .into_iter()
            .map(|region| (region.start_address, region))
            .collect();
        coalesced_count
    }

    /// Regions in address order
    pub fn iter(&self) -> impl Iterator<Item = &FreeRegion> + '_ {
        self.regions.values()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn total_free(&self) -> Size {
        self.regions.values().map(|region| region.size).sum()
    }

    pub fn largest(&self) -> Size {
        self.regions
            .values()
            .map(|region| region.size)
            .max()
            .unwrap_or(0)
    }
}
