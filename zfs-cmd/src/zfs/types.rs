//! Value types returned by zfs queries

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A zfs dataset (filesystem or volume), identified by its full name.
///
/// Holding a `Dataset` says nothing about whether it still exists; re-query
/// with [`crate::zfs::ZfsManager::dataset_exists`] when that matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dataset {
    /// Full dataset name (e.g., "tank/data/home")
    pub name: String,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Full name of a snapshot of this dataset
    pub fn snapshot_name(&self, snap_name: &str) -> String {
        format!("{}@{}", self.name, snap_name)
    }

    /// Name of the pool this dataset lives in
    pub fn pool(&self) -> &str {
        self.name.split('/').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A zfs snapshot (`dataset@name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
}

impl Snapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Dataset part of the snapshot name
    pub fn dataset_name(&self) -> &str {
        self.name
            .split_once('@')
            .map(|(dataset, _)| dataset)
            .unwrap_or(&self.name)
    }

    /// Snapshot part after `@`, if present
    pub fn short_name(&self) -> Option<&str> {
        self.name.split_once('@').map(|(_, snap)| snap)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One row of `zfs list -H` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    /// Remaining requested columns keyed by property name
    pub properties: BTreeMap<String, String>,
}

impl ListEntry {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }
}

/// A mounted zfs filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountEntry {
    pub name: String,
    pub mountpoint: String,
}
