// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-capacity pool with first-fit placement.
//!
//! The [`Pool`] owns one contiguous byte region that never grows, plus the
//! list of active allocations sorted by offset. It:
//!
//! 1. Places new allocations in the lowest-offset gap that fits (first-fit,
//!    never best-fit).
//! 2. Resizes in place when the following gap allows it, and relocates
//!    otherwise, copying the old contents.
//! 3. Derives free space from the gaps between allocations instead of
//!    keeping a separate free list.
//!
//! # Invariants
//! Before and after every operation:
//! - allocations are strictly ascending by offset,
//! - consecutive allocations do not overlap,
//! - the last allocation ends at or before `capacity`.
//!
//! Every failing operation leaves the allocation list and region untouched.
//!
//! # Thread Safety
//! None. Mutation goes through `&mut Pool`; callers sharing a pool across
//! threads must serialise access themselves.

use crate::region::{ActiveRegions, FreeRegions, Region};
use crate::{DestroyError, PoolError, PoolStats};
use std::fmt;

/// Opaque identifier of an active allocation: its offset in the region.
///
/// A handle is not stable across a realloc that relocates the allocation;
/// always keep the handle returned by the most recent successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Handle(usize);

impl Handle {
    /// Wraps a raw offset. The result only means something if an
    /// allocation actually starts there.
    pub fn from_offset(offset: usize) -> Self {
        Self(offset)
    }

    /// Returns the offset of the allocation within the region.
    pub fn offset(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// One active sub-range of the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Allocation {
    pub(crate) offset: usize,
    pub(crate) length: usize,
}

impl Allocation {
    pub(crate) fn end(&self) -> usize {
        self.offset + self.length
    }

    pub(crate) fn region(&self) -> Region {
        Region {
            offset: self.offset,
            length: self.length,
        }
    }
}

/// A point-in-time copy of the pool's layout and counters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PoolSnapshot {
    pub capacity: usize,
    pub active: Vec<Region>,
    pub free: Vec<Region>,
    pub stats: PoolStats,
}

/// A fixed-capacity sub-allocator over one owned byte region.
///
/// # Example
/// ```
/// use memory_pool::{Pool, PoolError};
///
/// let mut pool = Pool::create(10).unwrap();
/// let a = pool.alloc(4).unwrap();
/// let b = pool.alloc(4).unwrap();
/// assert_eq!((a.offset(), b.offset()), (0, 4));
/// assert!(matches!(pool.alloc(4), Err(PoolError::AllocationFailed { .. })));
///
/// pool.free(a).unwrap();
/// assert_eq!(pool.alloc(4).unwrap().offset(), 0);
/// assert_eq!(pool.list_free().to_string(), "8 [2]");
/// ```
pub struct Pool {
    capacity: usize,
    region: Box<[u8]>,
    /// Sorted by offset, non-overlapping.
    allocations: Vec<Allocation>,
    stats: PoolStats,
}

impl Pool {
    /// Creates a pool with a zeroed backing region of `capacity` bytes.
    pub fn create(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::InvalidCapacity);
        }
        let mut region = Vec::new();
        if region.try_reserve_exact(capacity).is_err() {
            tracing::debug!(capacity, "region could not be reserved");
            return Err(PoolError::RegionUnavailable { capacity });
        }
        region.resize(capacity, 0u8);
        tracing::debug!(capacity, "pool created");
        Ok(Self {
            capacity,
            region: region.into_boxed_slice(),
            allocations: Vec::new(),
            stats: PoolStats::default(),
        })
    }

    /// Destroys the pool, releasing its region.
    ///
    /// Fails while any allocation is active; the error gives the pool back
    /// unchanged.
    pub fn destroy(self) -> Result<(), DestroyError> {
        if !self.allocations.is_empty() {
            tracing::debug!(active = self.allocations.len(), "destroy refused");
            return Err(DestroyError::new(self));
        }
        tracing::debug!(capacity = self.capacity, "pool destroyed");
        Ok(())
    }

    /// Allocates `size` bytes in the first gap large enough to hold them.
    pub fn alloc(&mut self, size: usize) -> Result<Handle, PoolError> {
        if size == 0 {
            self.stats.record_failed_allocation();
            return Err(PoolError::InvalidSize);
        }

        let Some((index, offset)) = self.find_gap(size) else {
            self.stats.record_failed_allocation();
            return Err(PoolError::AllocationFailed {
                requested: size,
                largest_gap: self.largest_free_gap(),
            });
        };

        self.allocations.insert(index, Allocation { offset, length: size });
        self.stats.record_allocation();
        self.stats.update_peak(self.used_bytes(), self.active_count());
        tracing::debug!(offset, size, "allocated");
        Ok(Handle(offset))
    }

    /// Releases the allocation identified by `handle`.
    pub fn free(&mut self, handle: Handle) -> Result<(), PoolError> {
        let Some(index) = self.position(handle) else {
            self.stats.record_failed_free();
            return Err(PoolError::InvalidFree {
                offset: handle.offset(),
            });
        };

        let removed = self.allocations.remove(index);
        self.stats.record_free();
        tracing::debug!(offset = removed.offset, length = removed.length, "freed");
        Ok(())
    }

    /// Resizes the allocation identified by `handle` to `new_size` bytes.
    ///
    /// Shrinking and growth into the adjacent gap keep the handle. Otherwise
    /// the allocation moves to the first gap that fits and its old contents
    /// are copied over; the returned handle replaces the old one. On failure
    /// the original allocation is untouched.
    pub fn realloc(&mut self, handle: Handle, new_size: usize) -> Result<Handle, PoolError> {
        if new_size == 0 {
            self.stats.record_failed_realloc();
            return Err(PoolError::InvalidSize);
        }

        let failed = PoolError::ReallocFailed {
            offset: handle.offset(),
            requested: new_size,
        };

        let Some(index) = self.position(handle) else {
            self.stats.record_failed_realloc();
            return Err(failed);
        };
        let current = self.allocations[index];

        // Room up to the next allocation, or to the end of the region.
        let limit = self
            .allocations
            .get(index + 1)
            .map_or(self.capacity, |next| next.offset);

        if new_size <= current.length || limit - current.offset >= new_size {
            self.allocations[index].length = new_size;
            self.stats.record_in_place_realloc();
            self.stats.update_peak(self.used_bytes(), self.active_count());
            tracing::debug!(
                offset = current.offset,
                from = current.length,
                to = new_size,
                "resized in place"
            );
            return Ok(handle);
        }

        // The old allocation stays in place while searching, so the new
        // range can never overlap it and the copy is a plain memmove.
        let Some((_, new_offset)) = self.find_gap(new_size) else {
            self.stats.record_failed_realloc();
            tracing::trace!(offset = current.offset, new_size, "no gap for relocation");
            return Err(failed);
        };

        self.region
            .copy_within(current.offset..current.end(), new_offset);
        self.allocations.remove(index);
        let insert_at = self
            .allocations
            .partition_point(|a| a.offset < new_offset);
        self.allocations.insert(
            insert_at,
            Allocation {
                offset: new_offset,
                length: new_size,
            },
        );

        self.stats.record_relocation();
        self.stats.update_peak(self.used_bytes(), self.active_count());
        tracing::debug!(
            from = current.offset,
            to = new_offset,
            size = new_size,
            "relocated"
        );
        Ok(Handle(new_offset))
    }

    /// Active allocations as `(offset, length)` regions in ascending order.
    pub fn list_active(&self) -> ActiveRegions<'_> {
        ActiveRegions::new(&self.allocations)
    }

    /// Free gaps as `(offset, length)` regions in ascending order.
    pub fn list_free(&self) -> FreeRegions<'_> {
        FreeRegions::new(&self.allocations, self.capacity)
    }

    /// Returns the bytes of an active allocation.
    pub fn bytes(&self, handle: Handle) -> Option<&[u8]> {
        let allocation = self.allocations[self.position(handle)?];
        Some(&self.region[allocation.offset..allocation.end()])
    }

    /// Returns the bytes of an active allocation for writing.
    pub fn bytes_mut(&mut self, handle: Handle) -> Option<&mut [u8]> {
        let allocation = self.allocations[self.position(handle)?];
        Some(&mut self.region[allocation.offset..allocation.end()])
    }

    /// Returns the fixed size of the backing region.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of live allocations.
    pub fn active_count(&self) -> usize {
        self.allocations.len()
    }

    /// Returns `true` when no allocation is live.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Returns the number of bytes covered by live allocations.
    pub fn used_bytes(&self) -> usize {
        self.allocations.iter().map(|a| a.length).sum()
    }

    /// Returns the number of bytes not covered by any allocation.
    pub fn free_bytes(&self) -> usize {
        self.capacity - self.used_bytes()
    }

    /// Returns the length of the largest free gap, or 0 when full.
    pub fn largest_free_gap(&self) -> usize {
        self.list_free().map(|r| r.length).max().unwrap_or(0)
    }

    /// Returns the operation counters.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Copies the current layout and counters into an owned value.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            capacity: self.capacity,
            active: self.list_active().collect(),
            free: self.list_free().collect(),
            stats: self.stats.clone(),
        }
    }

    /// Index of the allocation starting exactly at `handle`.
    fn position(&self, handle: Handle) -> Option<usize> {
        self.allocations
            .iter()
            .position(|a| a.offset == handle.offset())
    }

    /// First-fit scan over the implicit gaps.
    ///
    /// Returns the insertion index and the offset of the first gap with at
    /// least `size` bytes: before the first allocation, between neighbours,
    /// then after the last one.
    fn find_gap(&self, size: usize) -> Option<(usize, usize)> {
        let mut cursor = 0;
        for (index, allocation) in self.allocations.iter().enumerate() {
            if allocation.offset - cursor >= size {
                tracing::trace!(
                    offset = cursor,
                    gap = allocation.offset - cursor,
                    size,
                    "gap fits"
                );
                return Some((index, cursor));
            }
            cursor = allocation.end();
        }
        (self.capacity - cursor >= size).then_some((self.allocations.len(), cursor))
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity)
            .field("active_count", &self.active_count())
            .field("used_bytes", &self.used_bytes())
            .finish()
    }
}
