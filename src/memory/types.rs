/*!
 * Memory Types
 * Entities, errors, and statistics shared by both allocator variants
 */

use crate::core::id::{ProcessId, RegionId};
use crate::core::limits::{PRESSURE_CRITICAL_RATIO, PRESSURE_HIGH_RATIO, PRESSURE_MEDIUM_RATIO};
use crate::core::types::{Address, InlineString, Size, SizeRequest};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Every variant is recoverable: a failed operation leaves allocator state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("{}", invalid_size_message(.requested, .limit))]
    #[diagnostic(
        code(memory::invalid_size),
        help("Request a positive number of units within the configured request limit.")
    )]
    InvalidSize {
        requested: SizeRequest,
        limit: Option<Size>,
    },

    #[error("Out of memory: requested {requested} units, {available} units free, largest contiguous run {largest_free} units ({total} total)")]
    #[diagnostic(
        code(memory::out_of_memory),
        help("Free a process or request fewer units. Free space may exist but be too fragmented.")
    )]
    OutOfMemory {
        requested: Size,
        available: Size,
        largest_free: Size,
        total: Size,
    },

    #[error("Memory corruption detected at 0x{address:x}: {reason}")]
    #[diagnostic(code(memory::corruption_detected))]
    CorruptionDetected { address: Address, reason: String },
}

fn invalid_size_message(requested: &SizeRequest, limit: &Option<Size>) -> String {
    match limit {
        Some(limit) if *requested > 0 => format!(
            "Invalid size: requested {} units exceeds the request limit of {} units",
            requested, limit
        ),
        _ => format!("Invalid size: requested {} units, size must be positive", requested),
    }
}

/// Turn a raw caller request into a usable size
///
/// Non-positive requests, and requests above `limit` when one is set, are `InvalidSize`.
pub(crate) fn validate_request(requested: SizeRequest, limit: Option<Size>) -> MemoryResult<Size> {
    let size = match Size::try_from(requested) {
        Ok(size) if size > 0 => size,
        _ => return Err(MemoryError::InvalidSize { requested, limit }),
    };
    match limit {
        Some(max) if size > max => Err(MemoryError::InvalidSize { requested, limit }),
        _ => Ok(size),
    }
}

impl MemoryError {
    pub(crate) fn corruption(address: Address, reason: impl Into<String>) -> Self {
        MemoryError::CorruptionDetected {
            address,
            reason: reason.into(),
        }
    }
}

/// A live simulated process
///
/// Fields are fixed at allocation time and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub name: InlineString,
    pub size: Size,
    pub start_address: Address,
    /// First occupied block (fixed-block variant only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_index: Option<usize>,
}

impl Process {
    /// One past the last address requested by the process
    #[inline]
    pub fn end_address(&self) -> Address {
        self.start_address + self.size
    }
}

/// A free region in the first-fit free list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeRegion {
    pub id: RegionId,
    pub start_address: Address,
    pub size: Size,
}

impl FreeRegion {
    #[inline]
    pub fn end_address(&self) -> Address {
        self.start_address + self.size
    }

    /// True when `other` begins exactly where this region ends
    #[inline]
    pub fn is_adjacent_to(&self, other: &FreeRegion) -> bool {
        self.end_address() == other.start_address
    }
}

/// One entry of the address-ordered first-fit layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Process(Process),
    Free(FreeRegion),
}

impl Segment {
    pub fn start_address(&self) -> Address {
        match self {
            Segment::Process(process) => process.start_address,
            Segment::Free(region) => region.start_address,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            Segment::Process(process) => process.size,
            Segment::Free(region) => region.size,
        }
    }
}

/// Occupancy of a single fixed-size block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSlot {
    pub index: usize,
    pub start_address: Address,
    pub occupant: Option<ProcessId>,
    pub occupant_name: Option<InlineString>,
    /// Units of the block holding process data
    pub used: Size,
    /// Units of the block lost to internal fragmentation
    pub waste: Size,
}

impl BlockSlot {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Fixed-block allocator statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedBlockStats {
    pub total_memory: Size,
    pub block_size: Size,
    pub total_blocks: usize,
    pub used_blocks: usize,
    pub free_blocks: usize,
    /// Block-rounded footprint of all live processes
    pub allocated_memory: Size,
    /// Sum of requested sizes
    pub requested_memory: Size,
    pub free_memory: Size,
    pub internal_fragmentation: Size,
    pub process_count: usize,
    pub allocated_percentage: f64,
    pub free_percentage: f64,
    pub internal_fragmentation_percentage: f64,
}

impl FixedBlockStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_usage(self.allocated_memory, self.total_memory)
    }
}

/// First-fit allocator statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstFitStats {
    pub total_memory: Size,
    pub allocated_memory: Size,
    pub total_free_memory: Size,
    pub free_regions: usize,
    pub largest_free_region: Size,
    /// Regions strictly smaller than this count as fragmented
    pub fragment_threshold: Size,
    pub fragmented_regions: usize,
    pub external_fragmentation: Size,
    pub process_count: usize,
    pub allocated_percentage: f64,
    pub free_percentage: f64,
    pub external_fragmentation_percentage: f64,
    /// `1 - largest / total_free`, 0 when nothing is free
    pub fragmentation_ratio: f64,
}

impl FirstFitStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_usage(self.allocated_memory, self.total_memory)
    }
}

/// Observational fragmentation ratio in `[0, 1]`
///
/// 0 means all free space is one contiguous run.
pub fn fragmentation_ratio(total_free: Size, largest_free: Size) -> f64 {
    if total_free == 0 {
        return 0.0;
    }
    let largest = largest_free.min(total_free) as f64;
    (1.0 - largest / total_free as f64).clamp(0.0, 1.0)
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_usage(used: Size, total: Size) -> Self {
        if total == 0 {
            return MemoryPressure::Critical;
        }
        let usage_ratio = used as f64 / total as f64;

        if usage_ratio >= PRESSURE_CRITICAL_RATIO {
            MemoryPressure::Critical
        } else if usage_ratio >= PRESSURE_HIGH_RATIO {
            MemoryPressure::High
        } else if usage_ratio >= PRESSURE_MEDIUM_RATIO {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
