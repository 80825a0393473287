/*!
 * fragsim Library
 * Memory fragmentation simulator exposed as a library
 */

pub mod config;
pub mod core;
pub mod memory;
pub mod monitoring;
pub mod simulation;

// Re-exports
pub use config::{ConfigError, FirstFitConfig, FixedBlockConfig, SimulationConfig};
pub use crate::core::errors::{SimulatorError, SimulatorResult};
pub use crate::core::id::{ProcessId, RegionId};
pub use memory::{
    AddressSpace, Allocator, BlockSlot, FirstFitAllocator, FirstFitStats, FixedBlockAllocator,
    FixedBlockStats, FreeRegion, MemoryError, MemoryInfo, MemoryPressure, MemoryResult, Process,
    Segment, SharedAllocator,
};
pub use monitoring::init_tracing;
pub use simulation::{parse_script, Command, CommandError, Outcome, Simulation, Snapshot, Variant};
