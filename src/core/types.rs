/*!
 * Core Types
 * Common types used across the simulator
 */

/// Address type for simulated memory (offset into the address space)
pub type Address = usize;

/// Size type for simulated memory, in abstract units
pub type Size = usize;

/// Raw size request as supplied by a caller
///
/// Signed so that non-positive requests can reach the allocator and be rejected there.
pub type SizeRequest = i64;

/// Inline string for short display names ("P1", "P2", ...)
pub type InlineString = smartstring::alias::String;

/// Compute `ceil(size / unit)` for positive `unit`
#[inline]
pub fn div_ceil(size: Size, unit: Size) -> Size {
    size.div_ceil(unit)
}

/// Express `part` as a percentage of `whole`
#[inline]
pub fn percentage(part: Size, whole: Size) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 100.0) / whole as f64
}
