// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `pool-cli demo` command: walk through first-fit placement.
//!
//! Fills the pool with quarter-sized blocks, frees the first one, and shows
//! that the next request reuses the earliest gap. Then grows a block in
//! place, relocates another, and tears everything down.

use memory_pool::{Capacity, Handle, Pool};

pub fn execute(capacity: String, json: bool) -> anyhow::Result<()> {
    let capacity = Capacity::parse(&capacity)?;
    let mut pool = Pool::create(capacity.as_bytes())?;
    let block = (capacity.as_bytes() / 4).max(1);

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            pool-cli · First-Fit Walkthrough          ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Pool:  {capacity} ({} bytes), block size {block}", capacity.as_bytes());
    println!();

    // ── Fill ───────────────────────────────────────────────────
    println!("  [1/4] Allocating {block}-byte blocks until the pool refuses...");
    let mut handles: Vec<Handle> = Vec::new();
    loop {
        match pool.alloc(block) {
            Ok(h) => {
                println!("        alloc {block:>6} -> offset {}", h.offset());
                handles.push(h);
            }
            Err(e) => {
                println!("        alloc {block:>6} -> {e}");
                break;
            }
        }
    }
    print_layout(&pool);

    // ── Reuse ──────────────────────────────────────────────────
    println!("  [2/4] Freeing the first block and allocating again...");
    let first = handles.remove(0);
    pool.free(first)?;
    let reused = pool.alloc(block)?;
    println!(
        "        alloc {block:>6} -> offset {} (earliest gap wins)",
        reused.offset()
    );
    handles.insert(0, reused);
    print_layout(&pool);

    // ── Resize ─────────────────────────────────────────────────
    println!("  [3/4] Shrinking the first block, then growing it back in place...");
    let shrunk = pool.realloc(handles[0], (block / 2).max(1))?;
    let regrown = pool.realloc(shrunk, block)?;
    println!(
        "        offset {} -> {} -> {} (handle kept)",
        handles[0].offset(),
        shrunk.offset(),
        regrown.offset()
    );
    handles[0] = regrown;

    if let Some(&last) = handles.last() {
        // Open a two-block hole behind the first block, then grow the last
        // block into it.
        if handles.len() > 3 {
            pool.free(handles.remove(1))?;
            pool.free(handles.remove(1))?;
            match pool.realloc(last, block * 2) {
                Ok(moved) => {
                    println!(
                        "        grow offset {} to {} bytes -> offset {}",
                        last.offset(),
                        block * 2,
                        moved.offset()
                    );
                    if let Some(slot) = handles.last_mut() {
                        *slot = moved;
                    }
                }
                Err(e) => println!("        grow offset {}: {e}", last.offset()),
            }
        }
    }
    print_layout(&pool);

    // ── Teardown ───────────────────────────────────────────────
    println!("  [4/4] Releasing everything...");
    if json {
        println!("{}", serde_json::to_string_pretty(&pool.snapshot())?);
    }
    for h in handles {
        pool.free(h)?;
    }
    let stats = pool.stats().clone();
    pool.destroy()?;
    println!("        Pool destroyed.");
    println!();
    println!("  Stats:");
    println!("   {}", stats.summary());

    Ok(())
}

fn print_layout(pool: &Pool) {
    println!("        active:    {}", pool.list_active());
    println!("        available: {}", pool.list_free());
    println!(
        "        used {} / {} bytes, largest gap {}",
        pool.used_bytes(),
        pool.capacity(),
        pool.largest_free_gap()
    );
    println!();
}
