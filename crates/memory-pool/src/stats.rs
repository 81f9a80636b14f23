// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operation statistics for diagnostics.
//!
//! [`PoolStats`] counts how a pool has been exercised: successful and
//! failed requests per operation, how reallocs were satisfied, and the
//! occupancy high-water marks. Counters are observability only; they are
//! not part of the pool's data model, so failed operations still bump them.

/// Cumulative statistics about pool usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PoolStats {
    /// Total number of allocation requests (successful or not).
    pub total_allocations: u64,
    /// Allocation requests rejected for size or lack of space.
    pub failed_allocations: u64,
    /// Successful frees.
    pub total_frees: u64,
    /// Frees of unknown handles.
    pub failed_frees: u64,
    /// Reallocs satisfied without moving (shrink, exact fit or grow in place).
    pub in_place_reallocs: u64,
    /// Reallocs that moved the allocation to a new offset.
    pub relocations: u64,
    /// Reallocs that left the allocation untouched because they failed.
    pub failed_reallocs: u64,
    /// Highest number of bytes in use at once.
    pub peak_used_bytes: usize,
    /// Highest number of simultaneously active allocations.
    pub peak_active_count: usize,
}

impl PoolStats {
    pub(crate) fn record_allocation(&mut self) {
        self.total_allocations += 1;
    }

    pub(crate) fn record_failed_allocation(&mut self) {
        self.total_allocations += 1;
        self.failed_allocations += 1;
    }

    pub(crate) fn record_free(&mut self) {
        self.total_frees += 1;
    }

    pub(crate) fn record_failed_free(&mut self) {
        self.failed_frees += 1;
    }

    pub(crate) fn record_in_place_realloc(&mut self) {
        self.in_place_reallocs += 1;
    }

    pub(crate) fn record_relocation(&mut self) {
        self.relocations += 1;
    }

    pub(crate) fn record_failed_realloc(&mut self) {
        self.failed_reallocs += 1;
    }

    /// Updates the high-water marks if needed.
    pub(crate) fn update_peak(&mut self, used_bytes: usize, active_count: usize) {
        self.peak_used_bytes = self.peak_used_bytes.max(used_bytes);
        self.peak_active_count = self.peak_active_count.max(active_count);
    }

    /// Fraction of allocation requests that failed, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` if nothing has been requested yet.
    pub fn allocation_failure_ratio(&self) -> f64 {
        if self.total_allocations == 0 {
            return 0.0;
        }
        self.failed_allocations as f64 / self.total_allocations as f64
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Allocations: {} total ({} failed, {:.0}% failure rate), \
             {} frees ({} invalid), reallocs: {} in place, {} relocated, {} failed, \
             peak {} bytes across {} allocations",
            self.total_allocations,
            self.failed_allocations,
            self.allocation_failure_ratio() * 100.0,
            self.total_frees,
            self.failed_frees,
            self.in_place_reallocs,
            self.relocations,
            self.failed_reallocs,
            self.peak_used_bytes,
            self.peak_active_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let s = PoolStats::default();
        assert_eq!(s.total_allocations, 0);
        assert_eq!(s.allocation_failure_ratio(), 0.0);
    }

    #[test]
    fn test_failure_ratio() {
        let mut s = PoolStats::default();
        s.record_allocation();
        s.record_allocation();
        s.record_failed_allocation();
        assert_eq!(s.total_allocations, 3);
        assert!((s.allocation_failure_ratio() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_peak_tracking() {
        let mut s = PoolStats::default();
        s.update_peak(100, 2);
        s.update_peak(50, 3);
        assert_eq!(s.peak_used_bytes, 100);
        assert_eq!(s.peak_active_count, 3);
    }

    #[test]
    fn test_summary() {
        let mut s = PoolStats::default();
        s.record_allocation();
        s.record_failed_allocation();
        s.record_free();
        s.record_relocation();
        s.update_peak(8, 1);
        let summary = s.summary();
        assert!(summary.contains("2 total"));
        assert!(summary.contains("1 failed"));
        assert!(summary.contains("1 relocated"));
        assert!(summary.contains("peak 8 bytes"));
    }
}
