//! Property values returned by `zfs get`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value and source of one property on one dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub value: String,
    /// Source tag printed by zfs (`local`, `default`, `inherited from pool`, `-`, ...)
    pub source: String,
}

impl Property {
    pub fn is_local(&self) -> bool {
        self.source == "local"
    }

    pub fn is_inherited(&self) -> bool {
        self.source.starts_with("inherited")
    }
}

/// One row of `zfs get -H` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Dataset, snapshot or bookmark name
    pub name: String,
    pub property: String,
    pub value: String,
    pub source: String,
}

/// Properties grouped by entity name, then by property name
pub type PropertyMap = BTreeMap<String, BTreeMap<String, Property>>;

/// Group records by entity and property; a later duplicate row wins.
pub fn group_records(records: impl IntoIterator<Item = PropertyRecord>) -> PropertyMap {
    let mut map = PropertyMap::new();
    for record in records {
        map.entry(record.name).or_default().insert(
            record.property,
            Property {
                value: record.value,
                source: record.source,
            },
        );
    }
    map
}

/// Property holding the mount location of a filesystem
pub const MOUNTPOINT_PROPERTY: &str = "mountpoint";
