use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZfsError {
    #[error("dataset '{0}' not found")]
    DatasetNotFound(String),

    #[error("snapshot '{0}' not found")]
    SnapshotNotFound(String),

    #[error("zfs binary not found: {0}")]
    BinaryNotFound(String),

    /// Non-zero exit from the zfs tool.
    #[error("zfs command failed ({status}): {command}: {stderr}")]
    CommandFailed {
        /// Full command line that was run
        command: String,
        /// Captured standard error
        stderr: String,
        /// Exit status description
        status: String,
    },

    #[error("failed to parse zfs output: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZfsError {
    /// Whether this error means the target dataset or snapshot does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            ZfsError::DatasetNotFound(_) | ZfsError::SnapshotNotFound(_) => true,
            ZfsError::CommandFailed { stderr, .. } => {
                stderr.contains("does not exist") || stderr.contains("not found")
            }
            _ => false,
        }
    }

    /// Captured stderr for command failures.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ZfsError::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZfsError>;
