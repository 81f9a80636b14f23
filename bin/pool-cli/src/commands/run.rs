// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `pool-cli run` command: execute a command script.
//!
//! The transcript goes to stdout. The process exits with status 1 when a
//! malformed letter or number aborts the script, and 0 otherwise.

use anyhow::Context;
use pool_script::{DriverConfig, Outcome, Session};
use std::io::{Read, Write};
use std::path::PathBuf;

pub fn execute(config: Option<PathBuf>, script: Option<PathBuf>, echo: bool) -> anyhow::Result<i32> {
    let mut config = match config {
        Some(path) => DriverConfig::from_file(&path)?,
        None => DriverConfig::default(),
    };
    config.echo_commands |= echo;

    let input = match &script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read script '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read script from stdin")?;
            buf
        }
    };

    let stdout = std::io::stdout();
    let mut session = Session::new(config, stdout.lock())?;
    let outcome = session.run(&input)?;
    session.into_inner().flush()?;

    match outcome {
        Outcome::Completed { teardown } => {
            tracing::info!(?teardown, "script completed");
        }
        Outcome::Stopped { command, teardown } => {
            tracing::info!(?teardown, "script stopped at invalid command '{command}'");
        }
        Outcome::Aborted(e) => {
            tracing::info!("script aborted: {e}");
        }
    }

    Ok(if outcome.is_success() { 0 } else { 1 })
}
