//! Metrics for zfs command execution
//!
//! Recorded through the `metrics` facade; the embedding application decides
//! whether and where to export them.

use std::time::Instant;

use metrics::{counter, histogram};

/// Metric names
pub mod names {
    /// Counter: Total zfs commands by subcommand and status
    pub const COMMANDS_TOTAL: &str = "zfs_cmd_commands_total";
    /// Histogram: Duration of zfs commands in seconds
    pub const COMMAND_DURATION_SECONDS: &str = "zfs_cmd_command_duration_seconds";
}

/// Record a finished zfs command with its result
pub fn record_command(subcommand: &str, status: &str, duration_secs: f64) {
    counter!(names::COMMANDS_TOTAL, "subcommand" => subcommand.to_string(), "status" => status.to_string())
        .increment(1);
    histogram!(names::COMMAND_DURATION_SECONDS, "subcommand" => subcommand.to_string())
        .record(duration_secs);
}

/// Helper for timing a single zfs invocation
pub struct CommandTimer {
    subcommand: String,
    start: Instant,
}

impl CommandTimer {
    pub fn new(subcommand: &str) -> Self {
        Self {
            subcommand: subcommand.to_string(),
            start: Instant::now(),
        }
    }

    pub fn success(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_command(&self.subcommand, "success", duration);
    }

    /// Complete with a failure reason (`exit`, `spawn`)
    pub fn failure(self, reason: &str) {
        let duration = self.start.elapsed().as_secs_f64();
        record_command(&self.subcommand, reason, duration);
    }
}
