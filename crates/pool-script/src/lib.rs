// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # pool-script
//!
//! A line-oriented command driver for [`memory_pool::Pool`].
//!
//! Scripts name allocations with single letters and the driver keeps the
//! letter → handle mapping, so the pool itself never sees names. The
//! transcript format is fixed, which makes scripts usable as golden tests.
//!
//! # Example
//! ```
//! use pool_script::{DriverConfig, Outcome, Session, Teardown};
//!
//! let mut session = Session::new(DriverConfig::default(), Vec::new()).unwrap();
//! let outcome = session.run("c 10 a x 4 a y 4 a z 4 m f x f y d").unwrap();
//! assert_eq!(outcome, Outcome::Completed { teardown: Teardown::Clean });
//!
//! let transcript = String::from_utf8(session.into_inner()).unwrap();
//! assert_eq!(transcript, "malloc z 4: fail\nactive: 0 [4], 4 [4]\n");
//! ```

pub mod command;
mod config;
mod error;
mod session;

pub use command::{Command, Scanner, Slot};
pub use config::DriverConfig;
pub use error::{ParseError, ScriptError};
pub use session::{Outcome, Session, Teardown};
