//! Location of the zfs binary.
//!
//! The path is resolved once by the caller and handed to
//! [`SystemRunner`](crate::zfs::SystemRunner); nothing here is global.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::zfs::{Result, SystemRunner, ZfsError, ZfsManager};

/// Well-known install locations, checked in order before `PATH`
pub const DEFAULT_ZFS_PATHS: &[&str] = &[
    "/sbin/zfs",
    "/usr/sbin/zfs",
    "/usr/local/sbin/zfs",
    "/bin/zfs",
    "/usr/bin/zfs",
];

const ZFS_BINARY_NAME: &str = "zfs";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZfsConfig {
    /// Explicit path to the zfs binary. When unset, the default locations
    /// and then `PATH` are searched.
    #[serde(default)]
    pub binary: Option<PathBuf>,
}

impl ZfsConfig {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(binary.into()),
        }
    }

    /// Resolve the zfs binary path, failing if it cannot be found.
    pub fn resolve_binary(&self) -> Result<PathBuf> {
        if let Some(path) = self
            .binary
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
        {
            if !path.exists() {
                return Err(ZfsError::BinaryNotFound(format!(
                    "no zfs binary at {}",
                    path.display()
                )));
            }
            return Ok(path.to_path_buf());
        }

        for candidate in DEFAULT_ZFS_PATHS {
            let p = Path::new(candidate);
            if p.exists() {
                debug!(path = %p.display(), "Found zfs binary");
                return Ok(p.to_path_buf());
            }
        }

        find_in_path(ZFS_BINARY_NAME).ok_or_else(|| {
            ZfsError::BinaryNotFound(format!(
                "unable to locate zfs binary; tried {:?} and PATH",
                DEFAULT_ZFS_PATHS
            ))
        })
    }

    /// Resolve the binary and build a manager around it.
    pub fn manager(&self) -> Result<ZfsManager<SystemRunner>> {
        Ok(ZfsManager::with_binary(self.resolve_binary()?))
    }
}

fn find_in_path(binary: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(binary);
        if candidate.is_file() {
            Some(candidate)
        } else {
            None
        }
    })
}
