// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-pool
//!
//! A fixed-capacity sub-allocator: one pre-reserved byte region, carved
//! into allocations with first-fit placement and never grown.
//!
//! # Key Components
//!
//! - [`Pool`]: owns the region and the sorted list of active allocations;
//!   `alloc`, `free`, `realloc`, `destroy`.
//! - [`Handle`]: the offset identifying an allocation to callers.
//! - [`ActiveRegions`] / [`FreeRegions`]: lazy reports of occupied and
//!   free space. Free space is derived, never stored.
//! - [`Capacity`]: region size with human-readable parsing (`"4K"`, `"1M"`).
//! - [`PoolStats`]: operation counters and high-water marks.
//!
//! # Layout
//!
//! ```text
//!   allocations: [(0,4), (6,2)]           capacity = 10
//!
//!   0   1   2   3   4   5   6   7   8   9
//!   ┌───────────────┬───────┬───────┬───────┐
//!   │   @0 [4]      │ free  │ @6[2] │ free  │
//!   └───────────────┴───────┴───────┴───────┘
//!
//!   active:    0 [4], 6 [2]
//!   available: 4 [2], 8 [2]
//! ```
//!
//! # Example
//! ```
//! use memory_pool::Pool;
//!
//! let mut pool = Pool::create(10).unwrap();
//! let a = pool.alloc(8).unwrap();
//! let a = pool.realloc(a, 3).unwrap();
//! assert_eq!(a.offset(), 0);
//! assert_eq!(pool.list_active().to_string(), "0 [3]");
//!
//! pool.free(a).unwrap();
//! pool.destroy().unwrap();
//! ```

mod capacity;
mod error;
pub mod pool;
pub mod region;
mod stats;

pub use capacity::Capacity;
pub use error::{DestroyError, PoolError};
pub use pool::{Handle, Pool, PoolSnapshot};
pub use region::{ActiveRegions, FreeRegions, Region};
pub use stats::PoolStats;
