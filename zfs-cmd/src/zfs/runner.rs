//! Subprocess execution for the zfs tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use super::error::{Result, ZfsError};
use crate::metrics::CommandTimer;

/// Runs the zfs tool with a list of arguments and returns captured stdout.
///
/// Implementations must report a non-zero exit as [`ZfsError::CommandFailed`]
/// with the captured stderr intact.
pub trait CommandRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<Vec<u8>>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        (**self).run(args)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        (**self).run(args)
    }
}

/// Runs the real zfs binary at a fixed path.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    binary: PathBuf,
}

impl SystemRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        let command = render_command(&self.binary, args);
        let subcommand = args.first().map(String::as_str).unwrap_or("");
        let timer = CommandTimer::new(subcommand);
        debug!(command = %command, "Running zfs command");

        let output = match Command::new(&self.binary).args(args).output() {
            Ok(output) => output,
            Err(e) => {
                timer.failure("spawn");
                warn!(command = %command, error = %e, "Failed to spawn zfs");
                return Err(ZfsError::Io(e));
            }
        };

        if output.status.success() {
            timer.success();
            return Ok(output.stdout);
        }

        timer.failure("exit");
        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        warn!(command = %command, status = %output.status, stderr = %stderr, "zfs command failed");
        Err(ZfsError::CommandFailed {
            command,
            stderr,
            status: output.status.to_string(),
        })
    }
}

/// Human-readable command line for error messages and logs.
pub fn render_command(binary: &Path, args: &[String]) -> String {
    let mut rendered = binary.display().to_string();
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push_str(&format!("{:?}", arg));
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}
