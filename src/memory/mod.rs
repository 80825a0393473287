/*!
 * Memory Module
 * Simulated allocation disciplines over a fixed address space
 */

pub mod address_space;
pub mod first_fit;
pub mod fixed_block;
pub mod shared;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use address_space::{AddressSpace, Span};
pub use first_fit::{FirstFitAllocator, INITIAL_REGION_ID};
pub use fixed_block::FixedBlockAllocator;
pub use shared::SharedAllocator;
pub use traits::*;
pub use types::*;
