// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the command driver.

/// Malformed operands that abort a script.
///
/// The `Display` text is what the driver prints after `exit: `.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Expected a lowercase letter `a..z`.
    #[error("invalid letter")]
    InvalidLetter,

    /// Expected a decimal integer.
    #[error("invalid number")]
    InvalidNumber,
}

/// Errors that stop the driver itself (as opposed to failed commands,
/// which are reported in the transcript).
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Writing the transcript failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// The driver configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The pool rejected a configured value.
    #[error("pool error: {0}")]
    Pool(#[from] memory_pool::PoolError),
}
