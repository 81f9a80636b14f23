// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pool capacity configuration and parsing.
//!
//! A [`Capacity`] is the fixed size of a pool's backing region. It supports
//! human-readable string parsing so drivers and config files can say `"4K"`
//! instead of `4096`.

use crate::PoolError;
use std::fmt;

const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;
const GIB: usize = 1024 * MIB;

/// The size of a pool's backing region in bytes. Never zero.
///
/// # Parsing
/// Supports human-readable strings with binary suffixes:
/// - `"4K"` or `"4KB"` → 4 × 1024 bytes
/// - `"2M"` or `"2MB"` → 2 × 1024² bytes
/// - `"1G"` or `"1GB"` → 1 × 1024³ bytes
/// - `"10"` or `"10B"` → raw byte count
///
/// # Examples
/// ```
/// use memory_pool::Capacity;
///
/// let c = Capacity::parse("4K").unwrap();
/// assert_eq!(c.as_bytes(), 4096);
/// assert_eq!(c.to_string(), "4 KB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Capacity {
    bytes: usize,
}

impl Capacity {
    /// Creates a capacity from a byte count.
    pub fn from_bytes(bytes: usize) -> Result<Self, PoolError> {
        if bytes == 0 {
            return Err(PoolError::InvalidCapacity);
        }
        Ok(Self { bytes })
    }

    /// Returns the capacity in bytes.
    pub fn as_bytes(&self) -> usize {
        self.bytes
    }

    /// Parses a human-readable capacity string. Case-insensitive.
    pub fn parse(s: &str) -> Result<Self, PoolError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PoolError::CapacityParse("empty string".into()));
        }

        let upper = s.to_uppercase();
        let (num_str, multiplier) = if upper.ends_with("GB") {
            (&s[..s.len() - 2], GIB)
        } else if upper.ends_with('G') {
            (&s[..s.len() - 1], GIB)
        } else if upper.ends_with("MB") {
            (&s[..s.len() - 2], MIB)
        } else if upper.ends_with('M') {
            (&s[..s.len() - 1], MIB)
        } else if upper.ends_with("KB") {
            (&s[..s.len() - 2], KIB)
        } else if upper.ends_with('K') {
            (&s[..s.len() - 1], KIB)
        } else if upper.ends_with('B') {
            (&s[..s.len() - 1], 1)
        } else {
            (s, 1)
        };

        let value: usize = num_str.trim().parse().map_err(|_| {
            PoolError::CapacityParse(format!(
                "'{s}': expected a number followed by an optional suffix (K, M, G)"
            ))
        })?;

        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| PoolError::CapacityParse(format!("'{s}' overflows usize")))?;

        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bytes % GIB == 0 {
            write!(f, "{} GB", self.bytes / GIB)
        } else if self.bytes % MIB == 0 {
            write!(f, "{} MB", self.bytes / MIB)
        } else if self.bytes % KIB == 0 {
            write!(f, "{} KB", self.bytes / KIB)
        } else {
            write!(f, "{} B", self.bytes)
        }
    }
}

impl TryFrom<usize> for Capacity {
    type Error = PoolError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl From<Capacity> for usize {
    fn from(capacity: Capacity) -> Self {
        capacity.bytes
    }
}

impl std::str::FromStr for Capacity {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        assert_eq!(Capacity::from_bytes(10).unwrap().as_bytes(), 10);
        assert!(matches!(
            Capacity::from_bytes(0),
            Err(PoolError::InvalidCapacity)
        ));
    }

    #[test]
    fn test_parse_raw_bytes() {
        assert_eq!(Capacity::parse("10").unwrap().as_bytes(), 10);
        assert_eq!(Capacity::parse("10b").unwrap().as_bytes(), 10);
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(Capacity::parse("4K").unwrap().as_bytes(), 4 * 1024);
        assert_eq!(Capacity::parse("4kb").unwrap().as_bytes(), 4 * 1024);
        assert_eq!(Capacity::parse("2M").unwrap().as_bytes(), 2 * 1024 * 1024);
        assert_eq!(Capacity::parse("1GB").unwrap().as_bytes(), 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(Capacity::parse("  64K ").unwrap().as_bytes(), 64 * 1024);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Capacity::parse("").is_err());
        assert!(Capacity::parse("abc").is_err());
        assert!(Capacity::parse("-4K").is_err());
        assert!(matches!(
            Capacity::parse("0K"),
            Err(PoolError::InvalidCapacity)
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Capacity::parse("1G").unwrap().to_string(), "1 GB");
        assert_eq!(Capacity::parse("3M").unwrap().to_string(), "3 MB");
        assert_eq!(Capacity::parse("2048").unwrap().to_string(), "2 KB");
        assert_eq!(Capacity::parse("10").unwrap().to_string(), "10 B");
    }

    #[test]
    fn test_from_str() {
        let c: Capacity = "8K".parse().unwrap();
        assert_eq!(c.as_bytes(), 8192);
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = Capacity::from_bytes(4096).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: Capacity = serde_json::from_str(&json).unwrap();
        assert_eq!(json, "4096");
        assert_eq!(c, back);
    }

    #[test]
    fn test_serde_rejects_zero() {
        assert!(serde_json::from_str::<Capacity>("0").is_err());
    }
}
