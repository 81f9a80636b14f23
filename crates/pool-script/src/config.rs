// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Driver configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! default_capacity = "4K"
//! echo_commands = true
//! fail_on_invalid_command = false
//! ```

use crate::ScriptError;
use memory_pool::Capacity;
use std::path::Path;

/// Configuration for a driver [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DriverConfig {
    /// Pool to create before the first command (human-readable, e.g. `"4K"`).
    /// When unset the script must issue `c` itself.
    pub default_capacity: Option<String>,
    /// Write each command to the transcript, prefixed with `> `.
    #[serde(default)]
    pub echo_commands: bool,
    /// Stop at the first unknown command letter.
    #[serde(default = "default_true")]
    pub fail_on_invalid_command: bool,
}

fn default_true() -> bool {
    true
}

impl DriverConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScriptError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ScriptError> {
        toml::from_str(toml_str)
            .map_err(|e| ScriptError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ScriptError> {
        toml::to_string_pretty(self)
            .map_err(|e| ScriptError::Config(format!("TOML serialise error: {e}")))
    }

    /// Parses the default capacity, if one is configured.
    pub fn parse_capacity(&self) -> Result<Option<Capacity>, ScriptError> {
        self.default_capacity
            .as_deref()
            .map(|s| {
                Capacity::parse(s)
                    .map_err(|e| ScriptError::Config(format!("invalid default_capacity: {e}")))
            })
            .transpose()
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            default_capacity: None,
            echo_commands: false,
            fail_on_invalid_command: true,
        }
    }
}
