// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Region reporting: lazy views over occupied and free space.
//!
//! Both views borrow the pool's ordered allocation list. Free space is
//! never stored; [`FreeRegions`] derives it on the fly as the complement
//! of the active intervals inside `[0, capacity)`.
//!
//! ```text
//!  offset 0                                             capacity
//!  ┌──────┬───────────┬──────┬────────────────┬─────────┐
//!  │ free │  active   │ free │     active     │  free   │
//!  └──────┴───────────┴──────┴────────────────┴─────────┘
//! ```
//!
//! Each view renders as `"none"` when empty, otherwise as
//! `"offset [length]"` entries joined by `", "`.

use crate::pool::Allocation;
use std::fmt;
use std::iter::FusedIterator;

/// A contiguous byte range `[offset, offset + length)` within a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub offset: usize,
    pub length: usize,
}

impl Region {
    /// One past the last byte of the region.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.offset, self.length)
    }
}

/// Writes `"none"` or the regions joined by `", "`.
fn write_list<I>(f: &mut fmt::Formatter<'_>, regions: I) -> fmt::Result
where
    I: Iterator<Item = Region>,
{
    let mut count = 0;
    for region in regions {
        if count > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{region}")?;
        count += 1;
    }
    if count == 0 {
        f.write_str("none")?;
    }
    Ok(())
}

/// Active allocations in ascending offset order.
///
/// Cloning restarts the sequence from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct ActiveRegions<'a> {
    inner: std::slice::Iter<'a, Allocation>,
}

impl<'a> ActiveRegions<'a> {
    pub(crate) fn new(allocations: &'a [Allocation]) -> Self {
        Self {
            inner: allocations.iter(),
        }
    }
}

impl Iterator for ActiveRegions<'_> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        self.inner.next().map(Allocation::region)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ActiveRegions<'_> {}
impl FusedIterator for ActiveRegions<'_> {}

impl fmt::Display for ActiveRegions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, self.clone())
    }
}

/// Gaps between active allocations in ascending offset order.
///
/// Zero-length gaps are skipped. The trailing gap after the last
/// allocation is emitted when non-empty.
#[derive(Debug, Clone)]
pub struct FreeRegions<'a> {
    inner: std::slice::Iter<'a, Allocation>,
    cursor: usize,
    capacity: usize,
    done: bool,
}

impl<'a> FreeRegions<'a> {
    pub(crate) fn new(allocations: &'a [Allocation], capacity: usize) -> Self {
        Self {
            inner: allocations.iter(),
            cursor: 0,
            capacity,
            done: false,
        }
    }
}

impl Iterator for FreeRegions<'_> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        if self.done {
            return None;
        }
        for allocation in self.inner.by_ref() {
            let start = self.cursor;
            self.cursor = allocation.end();
            if allocation.offset > start {
                return Some(Region {
                    offset: start,
                    length: allocation.offset - start,
                });
            }
        }
        self.done = true;
        (self.capacity > self.cursor).then(|| Region {
            offset: self.cursor,
            length: self.capacity - self.cursor,
        })
    }
}

impl FusedIterator for FreeRegions<'_> {}

impl fmt::Display for FreeRegions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, self.clone())
    }
}
