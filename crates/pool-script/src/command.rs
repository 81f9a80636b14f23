// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Command syntax and the token scanner.
//!
//! A script is a stream of whitespace-separated tokens; line breaks carry
//! no meaning. Each command is one letter followed by its operands:
//!
//! | Command | Operands | Meaning |
//! |---|---|---|
//! | `c` | `INT` | create the pool |
//! | `d` | | destroy the pool |
//! | `a` | `LET INT` | allocate `INT` bytes to slot `LET` |
//! | `f` | `LET` | free slot `LET` |
//! | `r` | `LET INT` | resize slot `LET` to `INT` bytes |
//! | `m` | | print active allocations |
//! | `n` | | print available regions |
//! | `q` | | quit |
//!
//! Numbers are read like `%d`: optional sign, then digits, stopping at the
//! first non-digit.

use crate::ParseError;
use std::fmt;

/// Number of named slots (`a` through `z`).
pub const SLOT_COUNT: usize = 26;

/// A named allocation slot, `a` through `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(u8);

impl Slot {
    /// Maps a lowercase ASCII letter to its slot.
    pub fn from_letter(c: char) -> Option<Self> {
        c.is_ascii_lowercase().then(|| Self(c as u8 - b'a'))
    }

    /// Index into a `[_; SLOT_COUNT]` table.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The lowercase letter naming this slot.
    pub fn letter(&self) -> char {
        (b'a' + self.0) as char
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One parsed driver command.
///
/// Sizes stay signed so negative requests reach the session and are
/// reported as failed commands instead of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create { capacity: i64 },
    Destroy,
    Alloc { slot: Slot, size: i64 },
    Free { slot: Slot },
    Realloc { slot: Slot, size: i64 },
    PrintActive,
    PrintAvailable,
    Quit,
    Unknown(char),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Create { capacity } => write!(f, "c {capacity}"),
            Command::Destroy => f.write_str("d"),
            Command::Alloc { slot, size } => write!(f, "a {slot} {size}"),
            Command::Free { slot } => write!(f, "f {slot}"),
            Command::Realloc { slot, size } => write!(f, "r {slot} {size}"),
            Command::PrintActive => f.write_str("m"),
            Command::PrintAvailable => f.write_str("n"),
            Command::Quit => f.write_str("q"),
            Command::Unknown(c) => write!(f, "{c}"),
        }
    }
}

/// Streams [`Command`]s out of script text.
///
/// Yields `Err` once for a malformed operand; the caller is expected to
/// stop there, since the rest of the stream can no longer be trusted.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    /// Starts scanning at the beginning of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn next_char(&mut self) -> Option<char> {
        self.rest = self.rest.trim_start();
        let c = self.rest.chars().next()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn slot(&mut self) -> Result<Slot, ParseError> {
        self.next_char()
            .and_then(Slot::from_letter)
            .ok_or(ParseError::InvalidLetter)
    }

    fn number(&mut self) -> Result<i64, ParseError> {
        self.rest = self.rest.trim_start();
        let bytes = self.rest.as_bytes();
        let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
        let digits = bytes[sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return Err(ParseError::InvalidNumber);
        }
        let (token, rest) = self.rest.split_at(sign + digits);
        self.rest = rest;
        token.parse().map_err(|_| ParseError::InvalidNumber)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Command, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let command = match self.next_char()? {
            'c' => self.number().map(|capacity| Command::Create { capacity }),
            'd' => Ok(Command::Destroy),
            'a' => self.slot().and_then(|slot| {
                self.number().map(|size| Command::Alloc { slot, size })
            }),
            'f' => self.slot().map(|slot| Command::Free { slot }),
            'r' => self.slot().and_then(|slot| {
                self.number().map(|size| Command::Realloc { slot, size })
            }),
            'm' => Ok(Command::PrintActive),
            'n' => Ok(Command::PrintAvailable),
            'q' => Ok(Command::Quit),
            other => Ok(Command::Unknown(other)),
        };
        Some(command)
    }
}
