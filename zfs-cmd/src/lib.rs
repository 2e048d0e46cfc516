//! Thin wrapper around the `zfs(8)` command-line tool
//!
//! Every operation builds an argument list, runs the tool once and parses
//! its text output. The library is split into several modules:
//! - `zfs`: argument builders, the command runner, output parsers and the
//!   `ZfsManager` client
//! - `config`: resolution of the zfs binary path
//! - `metrics`: per-command counters and timings

pub mod config;
pub mod metrics;
pub mod zfs;

pub use config::ZfsConfig;
pub use zfs::{CommandRunner, SystemRunner, ZfsError, ZfsManager};
