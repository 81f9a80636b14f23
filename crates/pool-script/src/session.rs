// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Script execution against a single pool.
//!
//! A [`Session`] owns at most one [`Pool`] and a table of 26 slots, each
//! holding the latest handle returned for that letter. Successful commands
//! are silent; failures and reports are written to the transcript in the
//! fixed formats below.
//!
//! ```text
//! create: fail (already created)      c while a pool exists
//! destroy: fail                       d with live allocations (or no pool)
//! malloc x 4: fail (already allocated)
//! malloc x 4: fail
//! free x: fail
//! realloc x 4: fail
//! active: 0 [4], 6 [2]                m
//! available: 4 [2], 8 [2]             n
//! Invalid command (z).
//! exit: invalid letter                aborts the script
//! ERROR: did not destroy pool        pool left empty but never destroyed
//! ERROR: did not free all allocations  pool left with live allocations
//! ```

use crate::command::{Command, Scanner, Slot, SLOT_COUNT};
use crate::{DriverConfig, ParseError, ScriptError};
use memory_pool::{Handle, Pool};
use std::io::Write;

/// State of the pool when the script stopped issuing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// No pool was left: never created, or destroyed by the script.
    Clean,
    /// An empty pool was left for the driver to destroy.
    Undestroyed,
    /// The pool still held live allocations and was kept.
    Leaked,
}

/// How a script run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input ran out or `q` was read.
    Completed { teardown: Teardown },
    /// An unknown command letter stopped the run.
    Stopped { command: char, teardown: Teardown },
    /// A malformed operand aborted the run immediately.
    Aborted(ParseError),
}

impl Outcome {
    /// Whether a driver process should exit successfully.
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Aborted(_))
    }
}

/// Executes driver commands and writes the transcript to `out`.
pub struct Session<W: Write> {
    pool: Option<Pool>,
    slots: [Option<Handle>; SLOT_COUNT],
    config: DriverConfig,
    out: W,
}

impl<W: Write> Session<W> {
    /// Creates a session, pre-creating the pool if the config names a capacity.
    pub fn new(config: DriverConfig, out: W) -> Result<Self, ScriptError> {
        let pool = config
            .parse_capacity()?
            .map(|capacity| Pool::create(capacity.as_bytes()))
            .transpose()?;
        Ok(Self {
            pool,
            slots: [None; SLOT_COUNT],
            config,
            out,
        })
    }

    /// Returns the pool, if one currently exists.
    pub fn pool(&self) -> Option<&Pool> {
        self.pool.as_ref()
    }

    /// Returns the handle currently bound to `slot`.
    pub fn handle(&self, slot: Slot) -> Option<Handle> {
        self.slots[slot.index()]
    }

    /// Consumes the session, returning the transcript writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Runs every command in `input`, then checks the pool for leaks.
    pub fn run(&mut self, input: &str) -> Result<Outcome, ScriptError> {
        for parsed in Scanner::new(input) {
            let command = match parsed {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "exit: {e}")?;
                    tracing::warn!("script aborted: {e}");
                    return Ok(Outcome::Aborted(e));
                }
            };

            if self.config.echo_commands {
                writeln!(self.out, "> {command}")?;
            }

            match command {
                Command::Quit => break,
                Command::Unknown(c) => {
                    writeln!(self.out, "Invalid command ({c}).")?;
                    if self.config.fail_on_invalid_command {
                        let teardown = self.finish()?;
                        return Ok(Outcome::Stopped {
                            command: c,
                            teardown,
                        });
                    }
                }
                other => self.execute(other)?,
            }
        }

        let teardown = self.finish()?;
        Ok(Outcome::Completed { teardown })
    }

    /// Applies one command to the pool.
    pub fn execute(&mut self, command: Command) -> Result<(), ScriptError> {
        match command {
            Command::Create { capacity } => self.create(capacity),
            Command::Destroy => self.destroy(),
            Command::Alloc { slot, size } => self.alloc(slot, size),
            Command::Free { slot } => self.free(slot),
            Command::Realloc { slot, size } => self.realloc(slot, size),
            Command::PrintActive => {
                match &self.pool {
                    Some(pool) => writeln!(self.out, "active: {}", pool.list_active())?,
                    None => writeln!(self.out, "active: none")?,
                }
                Ok(())
            }
            Command::PrintAvailable => {
                match &self.pool {
                    Some(pool) => writeln!(self.out, "available: {}", pool.list_free())?,
                    None => writeln!(self.out, "available: none")?,
                }
                Ok(())
            }
            Command::Quit | Command::Unknown(_) => Ok(()),
        }
    }

    fn create(&mut self, capacity: i64) -> Result<(), ScriptError> {
        if self.pool.is_some() {
            writeln!(self.out, "create: fail (already created)")?;
            return Ok(());
        }
        match usize::try_from(capacity).map(Pool::create) {
            Ok(Ok(pool)) => self.pool = Some(pool),
            Ok(Err(e)) => {
                tracing::info!("create {capacity}: {e}");
                writeln!(self.out, "create: fail")?;
            }
            Err(_) => {
                tracing::info!("create {capacity}: negative capacity");
                writeln!(self.out, "create: fail")?;
            }
        }
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), ScriptError> {
        let Some(pool) = self.pool.take() else {
            writeln!(self.out, "destroy: fail")?;
            return Ok(());
        };
        match pool.destroy() {
            Ok(()) => self.slots = [None; SLOT_COUNT],
            Err(e) => {
                tracing::info!("destroy: {e}");
                self.pool = Some(e.into_pool());
                writeln!(self.out, "destroy: fail")?;
            }
        }
        Ok(())
    }

    fn alloc(&mut self, slot: Slot, size: i64) -> Result<(), ScriptError> {
        if self.slots[slot.index()].is_some() {
            writeln!(self.out, "malloc {slot} {size}: fail (already allocated)")?;
            return Ok(());
        }
        let result = match (&mut self.pool, usize::try_from(size)) {
            (Some(pool), Ok(size)) => pool.alloc(size).map_err(|e| e.to_string()),
            (None, _) => Err("no pool".to_string()),
            (_, Err(_)) => Err("negative size".to_string()),
        };
        match result {
            Ok(handle) => self.slots[slot.index()] = Some(handle),
            Err(reason) => {
                tracing::info!("malloc {slot} {size}: {reason}");
                writeln!(self.out, "malloc {slot} {size}: fail")?;
            }
        }
        Ok(())
    }

    fn free(&mut self, slot: Slot) -> Result<(), ScriptError> {
        let result = match (&mut self.pool, self.slots[slot.index()]) {
            (Some(pool), Some(handle)) => pool.free(handle).map_err(|e| e.to_string()),
            (None, _) => Err("no pool".to_string()),
            (_, None) => Err("slot is empty".to_string()),
        };
        match result {
            Ok(()) => self.slots[slot.index()] = None,
            Err(reason) => {
                tracing::info!("free {slot}: {reason}");
                writeln!(self.out, "free {slot}: fail")?;
            }
        }
        Ok(())
    }

    fn realloc(&mut self, slot: Slot, size: i64) -> Result<(), ScriptError> {
        let result = match (&mut self.pool, self.slots[slot.index()], usize::try_from(size)) {
            (Some(pool), Some(handle), Ok(size)) => {
                pool.realloc(handle, size).map_err(|e| e.to_string())
            }
            (None, _, _) => Err("no pool".to_string()),
            (_, None, _) => Err("slot is empty".to_string()),
            (_, _, Err(_)) => Err("negative size".to_string()),
        };
        match result {
            Ok(handle) => self.slots[slot.index()] = Some(handle),
            Err(reason) => {
                tracing::info!("realloc {slot} {size}: {reason}");
                writeln!(self.out, "realloc {slot} {size}: fail")?;
            }
        }
        Ok(())
    }

    /// Tears down whatever pool the script left behind.
    ///
    /// A leftover pool is always reported: it is destroyed when empty and
    /// kept, with its allocations, otherwise.
    fn finish(&mut self) -> Result<Teardown, ScriptError> {
        let Some(pool) = self.pool.take() else {
            return Ok(Teardown::Clean);
        };
        match pool.destroy() {
            Ok(()) => {
                self.slots = [None; SLOT_COUNT];
                tracing::warn!("pool was not destroyed by the script");
                writeln!(self.out, "ERROR: did not destroy pool")?;
                Ok(Teardown::Undestroyed)
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.pool = Some(e.into_pool());
                writeln!(self.out, "ERROR: did not free all allocations")?;
                Ok(Teardown::Leaked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (Outcome, String) {
        run_with(DriverConfig::default(), script)
    }

    fn run_with(config: DriverConfig, script: &str) -> (Outcome, String) {
        let mut session = Session::new(config, Vec::new()).unwrap();
        let outcome = session.run(script).unwrap();
        let out = String::from_utf8(session.into_inner()).unwrap();
        (outcome, out)
    }

    #[test]
    fn test_silent_on_success() {
        let (outcome, out) = run("c 10 a a 4 f a d q");
        assert_eq!(
            outcome,
            Outcome::Completed {
                teardown: Teardown::Clean
            }
        );
        assert_eq!(out, "");
    }

    #[test]
    fn test_undestroyed_pool_reported() {
        let (outcome, out) = run("c 10 a a 4 f a");
        assert_eq!(out, "ERROR: did not destroy pool\n");
        assert_eq!(
            outcome,
            Outcome::Completed {
                teardown: Teardown::Undestroyed
            }
        );
    }

    #[test]
    fn test_reports() {
        let (_, out) = run("c 10 m n a a 4 a b 2 m n f a f b");
        assert_eq!(
            out,
            "active: none\n\
             available: 0 [10]\n\
             active: 0 [4], 4 [2]\n\
             available: 6 [4]\n\
             ERROR: did not destroy pool\n"
        );
    }

    #[test]
    fn test_reports_without_pool() {
        let (_, out) = run("m n");
        assert_eq!(out, "active: none\navailable: none\n");
    }

    #[test]
    fn test_create_twice() {
        let (_, out) = run("c 10 c 20");
        assert_eq!(
            out,
            "create: fail (already created)\nERROR: did not destroy pool\n"
        );
    }

    #[test]
    fn test_create_invalid_capacity() {
        let (_, out) = run("c 0 c -3");
        assert_eq!(out, "create: fail\ncreate: fail\n");
    }

    #[test]
    fn test_create_unreservable_capacity() {
        let (_, out) = run("c 4611686018427387904 m");
        assert_eq!(out, "create: fail\nactive: none\n");
    }

    #[test]
    fn test_alloc_failures() {
        let (_, out) = run("a a 4 c 10 a a 4 a a 2 a b 8 a c -1 a d 0 f a");
        assert_eq!(
            out,
            "malloc a 4: fail\n\
             malloc a 2: fail (already allocated)\n\
             malloc b 8: fail\n\
             malloc c -1: fail\n\
             malloc d 0: fail\n\
             ERROR: did not destroy pool\n"
        );
    }

    #[test]
    fn test_free_failures() {
        let (_, out) = run("f a c 10 f a a a 2 f a f a");
        assert_eq!(
            out,
            "free a: fail\n\
             free a: fail\n\
             free a: fail\n\
             ERROR: did not destroy pool\n"
        );
    }

    #[test]
    fn test_realloc_updates_slot() {
        let mut session = Session::new(DriverConfig::default(), Vec::new()).unwrap();
        for command in Scanner::new("c 16 a a 3 a b 2") {
            session.execute(command.unwrap()).unwrap();
        }
        let a = Slot::from_letter('a').unwrap();
        assert_eq!(session.handle(a).unwrap().offset(), 0);

        session.execute(Command::Realloc { slot: a, size: 6 }).unwrap();
        assert_eq!(session.handle(a).unwrap().offset(), 5);
        assert_eq!(
            session.pool().unwrap().list_active().to_string(),
            "3 [2], 5 [6]"
        );
    }

    #[test]
    fn test_realloc_failures() {
        let (_, out) = run("r a 4 c 10 r a 4 a a 4 a b 4 r a 6 r a -2 f a f b");
        assert_eq!(
            out,
            "realloc a 4: fail\n\
             realloc a 4: fail\n\
             realloc a 6: fail\n\
             realloc a -2: fail\n\
             ERROR: did not destroy pool\n"
        );
    }

    #[test]
    fn test_destroy_guard() {
        let (outcome, out) = run("d c 10 a a 4 d f a d");
        assert_eq!(out, "destroy: fail\ndestroy: fail\n");
        assert_eq!(
            outcome,
            Outcome::Completed {
                teardown: Teardown::Clean
            }
        );
    }

    #[test]
    fn test_destroy_then_recreate() {
        let (_, out) = run("c 10 d c 4 a a 4 n f a d");
        assert_eq!(out, "available: none\n");
    }

    #[test]
    fn test_leak_reported_at_end() {
        let (outcome, out) = run("c 10 a a 4");
        assert_eq!(out, "ERROR: did not free all allocations\n");
        assert_eq!(
            outcome,
            Outcome::Completed {
                teardown: Teardown::Leaked
            }
        );
    }

    #[test]
    fn test_quit_stops_reading() {
        let (_, out) = run("c 10 q m");
        assert_eq!(out, "ERROR: did not destroy pool\n");
    }

    #[test]
    fn test_invalid_command_stops() {
        let (outcome, out) = run("c 10 a a 2 x m");
        assert_eq!(
            out,
            "Invalid command (x).\nERROR: did not free all allocations\n"
        );
        assert_eq!(
            outcome,
            Outcome::Stopped {
                command: 'x',
                teardown: Teardown::Leaked
            }
        );
    }

    #[test]
    fn test_invalid_command_skipped_when_lenient() {
        let config = DriverConfig {
            fail_on_invalid_command: false,
            ..Default::default()
        };
        let (outcome, out) = run_with(config, "c 10 x m");
        assert_eq!(
            out,
            "Invalid command (x).\nactive: none\nERROR: did not destroy pool\n"
        );
        assert_eq!(
            outcome,
            Outcome::Completed {
                teardown: Teardown::Undestroyed
            }
        );
    }

    #[test]
    fn test_parse_error_aborts_without_teardown() {
        let (outcome, out) = run("c 10 a a 4 a B 4 m");
        assert_eq!(out, "exit: invalid letter\n");
        assert_eq!(outcome, Outcome::Aborted(ParseError::InvalidLetter));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_echo_commands() {
        let config = DriverConfig {
            echo_commands: true,
            ..Default::default()
        };
        let (_, out) = run_with(config, "c 10 m d");
        assert_eq!(out, "> c 10\n> m\nactive: none\n> d\n");
    }

    #[test]
    fn test_default_capacity_creates_pool() {
        let config = DriverConfig {
            default_capacity: Some("10".into()),
            ..Default::default()
        };
        let (_, out) = run_with(config, "n c 5 d");
        assert_eq!(out, "available: 0 [10]\ncreate: fail (already created)\n");
    }

    #[test]
    fn test_invalid_default_capacity() {
        let config = DriverConfig {
            default_capacity: Some("lots".into()),
            ..Default::default()
        };
        assert!(matches!(
            Session::new(config, Vec::new()),
            Err(ScriptError::Config(_))
        ));
    }
}
