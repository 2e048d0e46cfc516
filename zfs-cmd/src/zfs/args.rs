//! Argument construction for `zfs(8)` subcommands.
//!
//! Each builder function is pure: it returns the full token list (subcommand
//! first) for a single invocation and never touches shared state.

use super::options::{
    CloneOpts, CreateFilesystemOpts, CreateVolumeOpts, DatasetType, DestroyOpts, GetOpts,
    InheritOpts, ListOpts, MountOpts, PropertySet, RenameOpts, RollbackOpts, SnapshotOpts,
    SortOrder, UnmountOpts,
};

/// Ordered token list for one zfs invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    args: Vec<String>,
}

impl CommandArgs {
    pub fn new(subcommand: &str) -> Self {
        Self {
            args: vec![subcommand.to_string()],
        }
    }

    /// Append `token` only when `enabled` is set.
    pub fn flag(mut self, enabled: bool, token: &str) -> Self {
        if enabled {
            self.args.push(token.to_string());
        }
        self
    }

    /// Append `flag value` when a value is present and non-empty.
    pub fn option(mut self, flag: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.args.push(flag.to_string());
            self.args.push(value.to_string());
        }
        self
    }

    /// `-o key=value` per property (create, snapshot, clone).
    pub fn create_properties(mut self, properties: &PropertySet) -> Self {
        for (key, value) in properties {
            self.args.push("-o".to_string());
            self.args.push(format!("{}={}", key, value));
        }
        self
    }

    /// Bare `key=value` per property (set).
    pub fn set_properties(mut self, properties: &PropertySet) -> Self {
        for (key, value) in properties {
            self.args.push(format!("{}={}", key, value));
        }
        self
    }

    /// Single comma-joined token; nothing for an empty list.
    pub fn comma_list<S: AsRef<str>>(mut self, items: &[S]) -> Self {
        if !items.is_empty() {
            self.args.push(join_comma(items));
        }
        self
    }

    /// `flag a,b,c`; nothing for an empty list.
    pub fn comma_option<S: AsRef<str>>(mut self, flag: &str, items: &[S]) -> Self {
        if !items.is_empty() {
            self.args.push(flag.to_string());
            self.args.push(join_comma(items));
        }
        self
    }

    pub fn types(self, types: &[DatasetType]) -> Self {
        let names: Vec<&str> = types.iter().map(DatasetType::as_str).collect();
        self.comma_option("-t", &names)
    }

    /// `-d <depth>` unless the depth is absent.
    pub fn depth(mut self, depth: Option<u32>) -> Self {
        if let Some(depth) = depth {
            self.args.push("-d".to_string());
            self.args.push(depth.to_string());
        }
        self
    }

    /// Append positional identifiers in order, skipping empty ones.
    pub fn positional(mut self, values: &[&str]) -> Self {
        self.args.extend(
            values
                .iter()
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string()),
        );
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    pub fn into_vec(self) -> Vec<String> {
        self.args
    }
}

fn join_comma<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<&str>>()
        .join(",")
}

pub fn create_filesystem(name: &str, opts: &CreateFilesystemOpts) -> CommandArgs {
    CommandArgs::new("create")
        .flag(opts.no_mount, "-u")
        .flag(opts.create_parents, "-p")
        .create_properties(&opts.properties)
        .positional(&[name])
}

pub fn create_volume(name: &str, size: &str, opts: &CreateVolumeOpts) -> CommandArgs {
    CommandArgs::new("create")
        .flag(opts.create_parents, "-p")
        .option("-V", Some(size))
        .create_properties(&opts.properties)
        .option("-b", opts.block_size.as_deref())
        .flag(opts.sparse, "-s")
        .positional(&[name])
}

pub fn destroy(name: &str, opts: &DestroyOpts) -> CommandArgs {
    CommandArgs::new("destroy")
        .flag(opts.destroy_children, "-r")
        .flag(opts.destroy_clones, "-R")
        .flag(opts.force_unmount, "-f")
        .flag(opts.defer, "-d")
        .positional(&[name])
}

pub fn snapshot(name: &str, opts: &SnapshotOpts) -> CommandArgs {
    CommandArgs::new("snapshot")
        .flag(opts.recurse, "-r")
        .create_properties(&opts.properties)
        .positional(&[name])
}

pub fn rollback(snapshot: &str, opts: &RollbackOpts) -> CommandArgs {
    CommandArgs::new("rollback")
        .flag(opts.destroy_later, "-r")
        .flag(opts.destroy_clones, "-R")
        .flag(opts.force_unmount, "-f")
        .positional(&[snapshot])
}

pub fn clone(snapshot: &str, target: &str, opts: &CloneOpts) -> CommandArgs {
    CommandArgs::new("clone")
        .flag(opts.create_parents, "-p")
        .create_properties(&opts.properties)
        .positional(&[snapshot, target])
}

pub fn promote(name: &str) -> CommandArgs {
    CommandArgs::new("promote").positional(&[name])
}

pub fn rename(name: &str, new_name: &str, opts: &RenameOpts) -> CommandArgs {
    CommandArgs::new("rename")
        .flag(opts.create_parents, "-p")
        .flag(opts.no_remount, "-u")
        .flag(opts.force_unmount, "-f")
        .flag(opts.recurse, "-r")
        .positional(&[name, new_name])
}

/// `name` may be empty to list every dataset.
pub fn list(name: &str, opts: &ListOpts) -> CommandArgs {
    let args = CommandArgs::new("list")
        .flag(true, "-H")
        .flag(true, "-p")
        .flag(opts.recurse, "-r")
        .depth(opts.depth)
        .comma_option("-o", &opts.columns())
        .types(&opts.types);

    let args = match &opts.sort {
        Some(SortOrder::Ascending(key)) => args.option("-s", Some(key.as_str())),
        Some(SortOrder::Descending(key)) => args.option("-S", Some(key.as_str())),
        None => args,
    };

    args.positional(&[name])
}

pub fn set(name: &str, properties: &PropertySet) -> CommandArgs {
    CommandArgs::new("set")
        .set_properties(properties)
        .positional(&[name])
}

/// An empty property list queries `name`.
pub fn get<S: AsRef<str>>(name: &str, properties: &[S], opts: &GetOpts) -> CommandArgs {
    let args = CommandArgs::new("get")
        .flag(true, "-H")
        .flag(true, "-p")
        .flag(opts.recurse, "-r")
        .depth(opts.depth)
        .types(&opts.types)
        .comma_option("-s", &opts.sources);

    let args = if properties.is_empty() {
        args.comma_list(&["name"])
    } else {
        args.comma_list(properties)
    };

    args.positional(&[name])
}

/// Single property value with no header, as printed by `get -H -o value`.
pub fn get_value(name: &str, property: &str) -> CommandArgs {
    CommandArgs::new("get")
        .flag(true, "-H")
        .option("-o", Some("value"))
        .positional(&[property, name])
}

pub fn inherit(name: &str, property: &str, opts: &InheritOpts) -> CommandArgs {
    CommandArgs::new("inherit")
        .flag(opts.recurse, "-r")
        .flag(opts.received, "-S")
        .positional(&[property, name])
}

/// `zfs mount` with no arguments lists mounted filesystems.
pub fn mounts() -> CommandArgs {
    CommandArgs::new("mount")
}

pub fn mount(name: &str, opts: &MountOpts) -> CommandArgs {
    CommandArgs::new("mount")
        .comma_option("-o", &opts.options)
        .flag(opts.mount_all, "-a")
        .positional(&[name])
}

pub fn unmount(name: &str, opts: &UnmountOpts) -> CommandArgs {
    CommandArgs::new("unmount")
        .flag(opts.force_unmount, "-f")
        .flag(opts.unmount_all, "-a")
        .positional(&[name])
}

pub fn bookmark(snapshot: &str, bookmark: &str) -> CommandArgs {
    CommandArgs::new("bookmark").positional(&[snapshot, bookmark])
}

/// Existence probe used by `dataset_exists` / `snapshot_exists`.
pub fn exists(name: &str, dataset_type: DatasetType) -> CommandArgs {
    CommandArgs::new("list")
        .flag(true, "-H")
        .option("-o", Some("name"))
        .types(&[dataset_type])
        .positional(&[name])
}
