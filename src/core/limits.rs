/*!
 * Simulation Limits and Constants
 *
 * Centralized location for default sizes, thresholds, and policy numbers.
 * Grouped by the allocator variant that consumes them.
 */

use super::types::Size;

// =============================================================================
// ADDRESS SPACE
// =============================================================================

/// Default simulated address space (100 units)
/// Small enough that every unit can be drawn
pub const DEFAULT_TOTAL_MEMORY: Size = 100;

// =============================================================================
// FIXED-BLOCK ALLOCATOR
// =============================================================================

/// Default fixed block size (20 units, five blocks in the default space)
pub const DEFAULT_BLOCK_SIZE: Size = 20;

// =============================================================================
// FIRST-FIT ALLOCATOR
// =============================================================================

/// Free regions strictly smaller than this are reported as fragmented
/// Reporting policy only; such regions still satisfy small requests
pub const DEFAULT_FRAGMENT_THRESHOLD: Size = 5;

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Usage ratio at which pressure is reported as MEDIUM
pub const PRESSURE_MEDIUM_RATIO: f64 = 0.60;

/// Usage ratio at which pressure is reported as HIGH
pub const PRESSURE_HIGH_RATIO: f64 = 0.80;

/// Usage ratio at which pressure is reported as CRITICAL
pub const PRESSURE_CRITICAL_RATIO: f64 = 0.95;
