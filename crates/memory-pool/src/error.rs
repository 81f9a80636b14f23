// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the fixed-capacity pool.

use crate::Pool;

/// Errors that can occur while operating on a [`Pool`].
///
/// Every variant is reported to the caller as a value; none of them leave
/// the pool in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// A pool cannot be created with zero capacity.
    #[error("pool capacity must be positive")]
    InvalidCapacity,

    /// The backing region of the requested size could not be reserved.
    #[error("cannot reserve a {capacity}-byte region")]
    RegionUnavailable { capacity: usize },

    /// A requested allocation size was zero.
    #[error("requested size must be positive")]
    InvalidSize,

    /// No gap in the pool is large enough for the request.
    #[error("allocation failed: requested {requested} bytes, largest free gap is {largest_gap}")]
    AllocationFailed { requested: usize, largest_gap: usize },

    /// The handle does not match any active allocation.
    #[error("invalid free: no active allocation at offset {offset}")]
    InvalidFree { offset: usize },

    /// The handle is unknown, or the allocation cannot grow in place or move.
    #[error("realloc failed: cannot resize allocation at offset {offset} to {requested} bytes")]
    ReallocFailed { offset: usize, requested: usize },

    /// The pool still holds live allocations.
    #[error("cannot destroy pool: {active} allocation(s) still active")]
    DestroyNotEmpty { active: usize },

    /// A capacity string could not be parsed.
    #[error("invalid capacity string: {0}")]
    CapacityParse(String),
}

/// Returned by [`Pool::destroy`] when allocations are still live.
///
/// Ownership of the untouched pool travels back to the caller inside the
/// error so it can free the outstanding allocations and try again.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct DestroyError {
    pool: Pool,
    #[source]
    source: PoolError,
}

impl DestroyError {
    pub(crate) fn new(pool: Pool) -> Self {
        let active = pool.active_count();
        Self {
            pool,
            source: PoolError::DestroyNotEmpty { active },
        }
    }

    /// Returns the underlying error.
    pub fn error(&self) -> &PoolError {
        &self.source
    }

    /// Recovers the pool that could not be destroyed.
    pub fn into_pool(self) -> Pool {
        self.pool
    }
}
