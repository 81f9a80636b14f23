// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # pool-cli
//!
//! Command-line front end for the fixed-capacity memory pool.
//!
//! ## Usage
//! ```bash
//! # Run a command script (stdin when no file is given)
//! pool-cli run ./scripts/fragmentation.txt
//! echo "c 10 a a 4 m n f a" | pool-cli run
//!
//! # Walk through first-fit placement and print the pool layout
//! pool-cli demo --capacity 10
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pool-cli",
    about = "Fixed-capacity memory pool driver",
    version,
    author
)]
struct Cli {
    /// Path to a TOML driver configuration file.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pool command script and print its transcript.
    Run {
        /// Script file; reads stdin when omitted.
        script: Option<std::path::PathBuf>,

        /// Echo each command before its output.
        #[arg(long)]
        echo: bool,
    },

    /// Run the first-fit walk-through and print layouts and statistics.
    Demo {
        /// Pool capacity (e.g., "10", "4K").
        #[arg(short = 'n', long, default_value = "10")]
        capacity: String,

        /// Print the final snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { script, echo } => {
            let code = commands::run::execute(cli.config, script, echo)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Demo { capacity, json } => commands::demo::execute(capacity, json),
    }
}
