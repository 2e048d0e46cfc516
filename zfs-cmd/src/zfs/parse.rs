//! Parsers for `zfs` text output.
//!
//! `list` and `get` are run with `-H`, giving one record per line with
//! tab-separated columns. The `mount` listing pads its two columns with
//! runs of spaces.

use tracing::debug;

use super::error::{Result, ZfsError};
use super::properties::{PropertyMap, PropertyRecord, group_records};
use super::types::{ListEntry, MountEntry};

/// Parse `zfs list -H -o <columns>` output.
///
/// `columns` must match the `-o` list, starting with `name`. Blank lines are
/// dropped; missing trailing columns are left out of the entry.
pub fn parse_list(output: &str, columns: &[String]) -> Vec<ListEntry> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.split('\t');
            let name = fields.next().unwrap_or_default().to_string();
            let properties = columns
                .iter()
                .skip(1)
                .zip(fields)
                .map(|(column, value)| (column.clone(), value.to_string()))
                .collect();
            ListEntry { name, properties }
        })
        .collect()
}

/// Parse a single-column name listing, trimming each row.
pub fn parse_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `zfs get -H` output into records.
///
/// Rows with fewer than four columns are skipped. A value containing tabs
/// is kept whole; the source is always the last column.
pub fn parse_get_records(output: &str) -> Vec<PropertyRecord> {
    let mut records = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        // Values of user properties are printed raw and may contain tabs, so
        // the value is everything between the property and the last column.
        let mut fields = line.splitn(3, '\t');
        let (Some(name), Some(property), Some(rest)) = (fields.next(), fields.next(), fields.next())
        else {
            debug!(line = %line, "Skipping malformed zfs get row");
            continue;
        };
        let Some((value, source)) = rest.rsplit_once('\t') else {
            debug!(line = %line, "Skipping malformed zfs get row");
            continue;
        };

        records.push(PropertyRecord {
            name: name.to_string(),
            property: property.to_string(),
            value: value.to_string(),
            source: source.to_string(),
        });
    }
    records
}

/// Parse `zfs get -H` output grouped by entity then property.
pub fn parse_get(output: &str) -> PropertyMap {
    group_records(parse_get_records(output))
}

/// Parse the `zfs mount` listing (`name  mountpoint`).
pub fn parse_mounts(output: &str) -> Result<Vec<MountEntry>> {
    let mut entries = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let (name, mountpoint) = line.split_once("  ").ok_or_else(|| {
            ZfsError::ParseError(format!("expected two space-separated columns: {}", line))
        })?;

        entries.push(MountEntry {
            name: name.trim().to_string(),
            mountpoint: mountpoint.trim().to_string(),
        });
    }
    Ok(entries)
}

/// Parse a bare value from `zfs get -H -o value`.
pub fn parse_value(output: &str) -> String {
    output.trim().to_string()
}
