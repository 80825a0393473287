/*!
 * Address Space
 * Capacity bookkeeping and partition checks shared by both allocator variants
 */

use super::types::{MemoryError, MemoryResult};
use crate::core::types::{Address, Size};
use serde::{Deserialize, Serialize};

/// Half-open range `[start, start + len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Address,
    pub len: Size,
}

impl Span {
    #[inline]
    pub fn new(start: Address, len: Size) -> Self {
        Self { start, len }
    }

    #[inline]
    pub fn end(&self) -> Address {
        self.start + self.len
    }
}

/// A simulated linear address space `[0, capacity)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSpace {
    capacity: Size,
}

impl AddressSpace {
    pub fn new(capacity: Size) -> Self {
        Self { capacity }
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.capacity
    }

    /// The whole space as a single span
    #[inline]
    pub fn full_span(&self) -> Span {
        Span::new(0, self.capacity)
    }

    #[inline]
    pub fn contains(&self, span: &Span) -> bool {
        span.end() <= self.capacity
    }

    /// Verify spans are non-empty, in bounds, and pairwise non-overlapping
    pub fn verify_disjoint<I>(&self, spans: I) -> MemoryResult<()>
    where
        I: IntoIterator<Item = Span>,
    {
        self.verify(spans, false)
    }

    /// Verify spans tile `[0, capacity)` exactly: no gaps, no overlaps
    pub fn verify_partition<I>(&self, spans: I) -> MemoryResult<()>
    where
        I: IntoIterator<Item = Span>,
    {
        self.verify(spans, true)
    }

    fn verify<I>(&self, spans: I, require_cover: bool) -> MemoryResult<()>
    where
        I: IntoIterator<Item = Span>,
    {
        let mut sorted: Vec<Span> = spans.into_iter().collect();
        sorted.sort_unstable_by_key(|span| span.start);

        let mut cursor: Address = 0;
        for span in &sorted {
            if span.len == 0 {
                return Err(MemoryError::corruption(span.start, "empty range"));
            }
            if !self.contains(span) {
                return Err(MemoryError::corruption(
                    span.start,
                    format!(
                        "range of {} units ends at {} beyond capacity {}",
                        span.len,
                        span.end(),
                        self.capacity
                    ),
                ));
            }
            if span.start < cursor {
                return Err(MemoryError::corruption(
                    span.start,
                    format!("range overlaps previous range ending at {}", cursor),
                ));
            }
            if require_cover && span.start > cursor {
                return Err(MemoryError::corruption(
                    cursor,
                    format!("{} units unaccounted for", span.start - cursor),
                ));
            }
            cursor = span.end();
        }

        if require_cover && cursor != self.capacity {
            return Err(MemoryError::corruption(
                cursor,
                format!("{} units unaccounted for", self.capacity - cursor),
            ));
        }

        Ok(())
    }
}
