//! Per-subcommand option sets.
//!
//! Every struct implements `Default`; a defaulted field never emits a flag.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Property assignments passed at create/set time (`key=value`).
pub type PropertySet = BTreeMap<String, String>;

/// Dataset types accepted by `-t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Filesystem,
    Volume,
    Snapshot,
    Bookmark,
    All,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Filesystem => "filesystem",
            DatasetType::Volume => "volume",
            DatasetType::Snapshot => "snapshot",
            DatasetType::Bookmark => "bookmark",
            DatasetType::All => "all",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "filesystem" => Ok(DatasetType::Filesystem),
            "volume" => Ok(DatasetType::Volume),
            "snapshot" => Ok(DatasetType::Snapshot),
            "bookmark" => Ok(DatasetType::Bookmark),
            "all" => Ok(DatasetType::All),
            other => Err(format!("unknown dataset type '{}'", other)),
        }
    }
}

/// Sort key for `zfs list` (`-s` ascending, `-S` descending)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOrder {
    Ascending(String),
    Descending(String),
}

/// Convert a signed depth into an optional one. Any negative value
/// (conventionally `-1`) means unlimited, so no `-d` flag is emitted.
pub fn depth_from_signed(depth: i32) -> Option<u32> {
    u32::try_from(depth).ok()
}

/// `zfs create` for a filesystem
#[derive(Debug, Clone, Default)]
pub struct CreateFilesystemOpts {
    /// `-o key=value` per entry. Default: none.
    pub properties: PropertySet,
    /// `-u`: do not mount the new filesystem. Default: false.
    pub no_mount: bool,
    /// `-p`: create missing parent datasets. Default: false.
    pub create_parents: bool,
}

/// `zfs create -V` for a volume
#[derive(Debug, Clone, Default)]
pub struct CreateVolumeOpts {
    /// `-o key=value` per entry. Default: none.
    pub properties: PropertySet,
    /// `-p`: create missing parent datasets. Default: false.
    pub create_parents: bool,
    /// `-b`: volume block size. Default: tool default.
    pub block_size: Option<String>,
    /// `-s`: sparse volume (no reservation). Default: false.
    pub sparse: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DestroyOpts {
    /// `-r`: destroy all children
    pub destroy_children: bool,
    /// `-R`: destroy all dependents, including clones outside the hierarchy
    pub destroy_clones: bool,
    /// `-f`: force unmount
    pub force_unmount: bool,
    /// `-d`: defer snapshot destruction
    pub defer: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotOpts {
    /// `-r`: snapshot all descendants
    pub recurse: bool,
    /// `-o key=value` per entry
    pub properties: PropertySet,
}

#[derive(Debug, Clone, Default)]
pub struct RollbackOpts {
    /// `-r`: destroy snapshots newer than the target
    pub destroy_later: bool,
    /// `-R`: also destroy clones of those snapshots
    pub destroy_clones: bool,
    /// `-f`: force unmount
    pub force_unmount: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CloneOpts {
    /// `-p`: create missing parent datasets
    pub create_parents: bool,
    /// `-o key=value` per entry
    pub properties: PropertySet,
}

#[derive(Debug, Clone, Default)]
pub struct RenameOpts {
    /// `-p`: create missing parent datasets
    pub create_parents: bool,
    /// `-u`: do not remount
    pub no_remount: bool,
    /// `-f`: force unmount
    pub force_unmount: bool,
    /// `-r`: rename snapshots recursively
    pub recurse: bool,
}

/// `zfs list`
///
/// The output always starts with the `name` column, so `properties` is
/// normalized by [`ListOpts::columns`].
#[derive(Debug, Clone, Default)]
pub struct ListOpts {
    /// `-r`. Default: false.
    pub recurse: bool,
    /// `-d <depth>`. Default: `None` (flag omitted).
    pub depth: Option<u32>,
    /// `-o` columns. Default: `name` only.
    pub properties: Vec<String>,
    /// `-t` types. Default: tool default (filesystems and volumes).
    pub types: Vec<DatasetType>,
    /// `-s`/`-S`. Default: unsorted.
    pub sort: Option<SortOrder>,
}

impl ListOpts {
    /// Set the depth using the signed convention where negative means "no depth flag".
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth_from_signed(depth);
        self
    }

    /// Output columns in order, with `name` first and not repeated.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["name".to_string()];
        columns.extend(
            self.properties
                .iter()
                .filter(|p| p.as_str() != "name" && !p.is_empty())
                .cloned(),
        );
        columns
    }
}

/// `zfs get`
#[derive(Debug, Clone, Default)]
pub struct GetOpts {
    /// `-r`. Default: false.
    pub recurse: bool,
    /// `-d <depth>`. Default: `None` (flag omitted).
    pub depth: Option<u32>,
    /// `-t` types. Default: all types.
    pub types: Vec<DatasetType>,
    /// `-s` sources (`local`, `default`, `inherited`, `temporary`, `received`, `none`).
    /// Default: all sources.
    pub sources: Vec<String>,
}

impl GetOpts {
    /// Set the depth using the signed convention where negative means "no depth flag".
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth_from_signed(depth);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct InheritOpts {
    /// `-r`
    pub recurse: bool,
    /// `-S`: revert to the received value
    pub received: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MountOpts {
    /// `-o` temporary mount options, comma-joined
    pub options: Vec<String>,
    /// `-a`: mount all filesystems
    pub mount_all: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UnmountOpts {
    /// `-f`
    pub force_unmount: bool,
    /// `-a`: unmount all filesystems
    pub unmount_all: bool,
}
