// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: whole scripts and their transcripts.
//!
//! These drive the pool through the command layer exactly as a user
//! script would, checking both what is printed and the pool layout left
//! behind.

use pool_script::{DriverConfig, Outcome, ParseError, Session, Slot, Teardown};

// ── Helpers ────────────────────────────────────────────────────

fn transcript(script: &str) -> (Outcome, String) {
    let mut session = Session::new(DriverConfig::default(), Vec::new()).unwrap();
    let outcome = session.run(script).unwrap();
    (outcome, String::from_utf8(session.into_inner()).unwrap())
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_first_fit_walkthrough() {
    let script = "
        c 10
        a a 4
        a b 4
        a c 4
        m n
        f a
        a c 4
        m n
        f b f c
        d
    ";
    let (outcome, out) = transcript(script);
    assert_eq!(
        out,
        "malloc c 4: fail\n\
         active: 0 [4], 4 [4]\n\
         available: 8 [2]\n\
         active: 0 [4], 4 [4]\n\
         available: 8 [2]\n"
    );
    assert_eq!(
        outcome,
        Outcome::Completed {
            teardown: Teardown::Clean
        }
    );
}

#[test]
fn test_fragmentation_and_relocation() {
    let script = "
        c 20
        a a 5 a b 5 a c 5
        f b
        n
        r a 8
        m n
        r c 12
        m n
        f a f c
        d
    ";
    let (_, out) = transcript(script);
    assert_eq!(
        out,
        "available: 5 [5], 15 [5]\n\
         active: 0 [8], 10 [5]\n\
         available: 8 [2], 15 [5]\n\
         realloc c 12: fail\n\
         active: 0 [8], 10 [5]\n\
         available: 8 [2], 15 [5]\n"
    );
}

#[test]
fn test_relocating_realloc_moves_slot() {
    let script = "
        c 16
        a a 4 a b 2
        r a 8
        m
        a c 4
        m
        f a f b f c
    ";
    let (outcome, out) = transcript(script);
    assert_eq!(
        out,
        "active: 4 [2], 6 [8]\n\
         active: 0 [4], 4 [2], 6 [8]\n\
         ERROR: did not destroy pool\n"
    );
    assert_eq!(
        outcome,
        Outcome::Completed {
            teardown: Teardown::Undestroyed
        }
    );
}

#[test]
fn test_shrink_then_grow_in_place() {
    let script = "c 10 a a 8 r a 3 m n r a 10 m n f a d";
    let (_, out) = transcript(script);
    assert_eq!(
        out,
        "active: 0 [3]\n\
         available: 3 [7]\n\
         active: 0 [10]\n\
         available: none\n"
    );
}

#[test]
fn test_leak_and_abort_paths() {
    let (outcome, out) = transcript("c 8 a a 3 q f a");
    assert_eq!(out, "ERROR: did not free all allocations\n");
    assert_eq!(
        outcome,
        Outcome::Completed {
            teardown: Teardown::Leaked
        }
    );

    let (outcome, out) = transcript("c 8 a a three");
    assert_eq!(out, "exit: invalid number\n");
    assert_eq!(outcome, Outcome::Aborted(ParseError::InvalidNumber));
}

#[test]
fn test_session_exposes_state_after_run() {
    let mut session = Session::new(DriverConfig::default(), std::io::sink()).unwrap();
    session.run("c 10 a k 4 a m 2 f k").unwrap();

    // m is still live, so the pool survives the end-of-script teardown.
    let pool = session.pool().unwrap();
    assert_eq!(pool.list_active().to_string(), "4 [2]");
    assert!(session.handle(Slot::from_letter('k').unwrap()).is_none());
    assert_eq!(
        session.handle(Slot::from_letter('m').unwrap()).unwrap().offset(),
        4
    );
}
