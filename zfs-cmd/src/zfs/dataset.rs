use std::path::Path;

use tracing::{debug, info, instrument};

use super::args::{self, CommandArgs};
use super::error::{Result, ZfsError};
use super::options::{
    CloneOpts, CreateFilesystemOpts, CreateVolumeOpts, DatasetType, DestroyOpts, GetOpts,
    InheritOpts, ListOpts, MountOpts, PropertySet, RenameOpts, RollbackOpts, SnapshotOpts,
    UnmountOpts,
};
use super::parse;
use super::properties::{MOUNTPOINT_PROPERTY, PropertyMap};
use super::runner::{CommandRunner, SystemRunner};
use super::types::{Dataset, ListEntry, MountEntry, Snapshot};

/// Client for the zfs tool.
///
/// Every call builds an argument list, runs it through the injected
/// [`CommandRunner`] and parses the output. Nothing is cached.
pub struct ZfsManager<R = SystemRunner> {
    runner: R,
}

impl ZfsManager<SystemRunner> {
    /// Manager running the zfs binary at `binary`
    pub fn with_binary(binary: impl Into<std::path::PathBuf>) -> Self {
        Self::new(SystemRunner::new(binary))
    }
}

impl<R: CommandRunner> ZfsManager<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn exec(&self, args: CommandArgs) -> Result<Vec<u8>> {
        self.runner.run(args.as_slice())
    }

    /// Run and decode stdout. User property values are arbitrary bytes, so
    /// invalid UTF-8 is replaced rather than failing the whole listing.
    fn exec_text(&self, args: CommandArgs) -> Result<String> {
        let stdout = self.exec(args)?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn exec_no_out(&self, args: CommandArgs) -> Result<()> {
        self.exec(args).map(|_| ())
    }

    /// Create a filesystem (`zfs create`)
    #[instrument(skip(self, opts))]
    pub fn create_filesystem(&self, name: &str, opts: &CreateFilesystemOpts) -> Result<()> {
        info!(dataset = %name, "Creating ZFS filesystem");
        self.exec_no_out(args::create_filesystem(name, opts))?;
        info!(dataset = %name, "ZFS filesystem created successfully");
        Ok(())
    }

    /// Create a volume (`zfs create -V`)
    #[instrument(skip(self, opts))]
    pub fn create_volume(&self, name: &str, size: &str, opts: &CreateVolumeOpts) -> Result<()> {
        info!(volume = %name, size = %size, "Creating ZFS volume");
        self.exec_no_out(args::create_volume(name, size, opts))?;
        info!(volume = %name, "ZFS volume created successfully");
        Ok(())
    }

    #[instrument(skip(self, opts))]
    pub fn destroy(&self, name: &str, opts: &DestroyOpts) -> Result<()> {
        info!(dataset = %name, "Destroying ZFS dataset");
        self.exec_no_out(args::destroy(name, opts))?;
        info!(dataset = %name, "ZFS dataset destroyed");
        Ok(())
    }

    /// Take a snapshot; `name` is the full `dataset@snap` name
    #[instrument(skip(self, opts))]
    pub fn snapshot(&self, name: &str, opts: &SnapshotOpts) -> Result<()> {
        info!(snapshot = %name, recurse = opts.recurse, "Creating ZFS snapshot");
        self.exec_no_out(args::snapshot(name, opts))?;
        info!(snapshot = %name, "ZFS snapshot created successfully");
        Ok(())
    }

    #[instrument(skip(self, opts))]
    pub fn rollback(&self, snapshot: &str, opts: &RollbackOpts) -> Result<()> {
        info!(snapshot = %snapshot, "Rolling back to ZFS snapshot");
        self.exec_no_out(args::rollback(snapshot, opts))
    }

    /// Clone a snapshot into a new dataset (`zfs clone`)
    #[instrument(skip(self, opts))]
    pub fn create_clone(&self, snapshot: &str, target: &str, opts: &CloneOpts) -> Result<()> {
        info!(snapshot = %snapshot, target = %target, "Cloning ZFS snapshot");
        self.exec_no_out(args::clone(snapshot, target, opts))?;
        info!(target = %target, "ZFS clone created successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn promote(&self, name: &str) -> Result<()> {
        info!(dataset = %name, "Promoting ZFS clone");
        self.exec_no_out(args::promote(name))
    }

    #[instrument(skip(self, opts))]
    pub fn rename(&self, name: &str, new_name: &str, opts: &RenameOpts) -> Result<()> {
        info!(from = %name, to = %new_name, "Renaming ZFS dataset");
        self.exec_no_out(args::rename(name, new_name, opts))
    }

    /// List datasets (`zfs list -H -p`).
    ///
    /// An empty `name` lists everything. Each entry carries the columns
    /// requested in `opts.properties`.
    #[instrument(skip(self, opts))]
    pub fn list(&self, name: &str, opts: &ListOpts) -> Result<Vec<ListEntry>> {
        let columns = opts.columns();
        let output = self.exec_text(args::list(name, opts))?;
        let entries = parse::parse_list(&output, &columns);
        debug!(count = entries.len(), "Listed datasets");
        Ok(entries)
    }

    /// Set properties (`zfs set key=value ...`).
    ///
    /// An empty property set is a no-op: zfs is not invoked, since
    /// `zfs set` with no assignments only prints usage and fails.
    #[instrument(skip(self, properties))]
    pub fn set(&self, name: &str, properties: &PropertySet) -> Result<()> {
        if properties.is_empty() {
            return Ok(());
        }
        info!(dataset = %name, count = properties.len(), "Setting ZFS properties");
        self.exec_no_out(args::set(name, properties))
    }

    /// Get properties (`zfs get -H -p`), grouped by entity then property.
    ///
    /// An empty property list queries `name` only.
    #[instrument(skip(self, opts))]
    pub fn get(&self, name: &str, properties: &[String], opts: &GetOpts) -> Result<PropertyMap> {
        let output = self.exec_text(args::get(name, properties, opts))?;
        let map = parse::parse_get(&output);
        debug!(entities = map.len(), "Fetched ZFS properties");
        Ok(map)
    }

    #[instrument(skip(self, opts))]
    pub fn inherit(&self, name: &str, property: &str, opts: &InheritOpts) -> Result<()> {
        info!(dataset = %name, property = %property, "Inheriting ZFS property");
        self.exec_no_out(args::inherit(name, property, opts))
    }

    /// Currently mounted zfs filesystems (`zfs mount` with no arguments)
    #[instrument(skip(self))]
    pub fn mounts(&self) -> Result<Vec<MountEntry>> {
        let output = self.exec_text(args::mounts())?;
        parse::parse_mounts(&output)
    }

    #[instrument(skip(self, opts))]
    pub fn mount(&self, name: &str, opts: &MountOpts) -> Result<()> {
        info!(dataset = %name, all = opts.mount_all, "Mounting ZFS filesystem");
        self.exec_no_out(args::mount(name, opts))
    }

    #[instrument(skip(self, opts))]
    pub fn unmount(&self, name: &str, opts: &UnmountOpts) -> Result<()> {
        info!(dataset = %name, all = opts.unmount_all, "Unmounting ZFS filesystem");
        self.exec_no_out(args::unmount(name, opts))
    }

    #[instrument(skip(self))]
    pub fn bookmark(&self, snapshot: &str, bookmark: &str) -> Result<()> {
        info!(snapshot = %snapshot, bookmark = %bookmark, "Creating ZFS bookmark");
        self.exec_no_out(args::bookmark(snapshot, bookmark))
    }

    /// Check whether a filesystem exists.
    ///
    /// A failed probe counts as "does not exist"; only spawn errors propagate.
    pub fn dataset_exists(&self, name: &str) -> Result<bool> {
        self.probe(name, DatasetType::Filesystem)
    }

    /// Check whether a snapshot exists
    pub fn snapshot_exists(&self, name: &str) -> Result<bool> {
        self.probe(name, DatasetType::Snapshot)
    }

    fn probe(&self, name: &str, dataset_type: DatasetType) -> Result<bool> {
        match self.exec(args::exists(name, dataset_type)) {
            Ok(_) => Ok(true),
            Err(ZfsError::CommandFailed { stderr, .. }) => {
                debug!(name = %name, kind = %dataset_type, stderr = %stderr, "Existence probe failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Handle for an existing filesystem
    pub fn get_dataset(&self, name: &str) -> Result<Dataset> {
        if !self.dataset_exists(name)? {
            return Err(ZfsError::DatasetNotFound(name.to_string()));
        }
        Ok(Dataset::new(name))
    }

    /// Handle for an existing snapshot
    pub fn get_snapshot(&self, name: &str) -> Result<Snapshot> {
        if !self.snapshot_exists(name)? {
            return Err(ZfsError::SnapshotNotFound(name.to_string()));
        }
        Ok(Snapshot::new(name))
    }

    /// Every filesystem on the system
    pub fn list_datasets(&self) -> Result<Vec<Dataset>> {
        self.list_filesystems("")
    }

    /// Filesystems below `dataset`, excluding `dataset` itself
    pub fn list_child_datasets(&self, dataset: &Dataset) -> Result<Vec<Dataset>> {
        self.list_filesystems(&dataset.name)
    }

    fn list_filesystems(&self, name: &str) -> Result<Vec<Dataset>> {
        let opts = ListOpts {
            recurse: true,
            types: vec![DatasetType::Filesystem],
            ..Default::default()
        };
        let output = self.exec_text(args::list(name, &opts))?;
        Ok(parse::parse_names(&output)
            .into_iter()
            .filter(|child| child != name)
            .map(Dataset::new)
            .collect())
    }

    /// Single property value, trimmed
    pub fn get_property(&self, name: &str, property: &str) -> Result<String> {
        let output = self.exec_text(args::get_value(name, property))?;
        Ok(parse::parse_value(&output))
    }

    pub fn mountpoint(&self, dataset: &Dataset) -> Result<String> {
        self.get_property(&dataset.name, MOUNTPOINT_PROPERTY)
    }

    /// Create a filesystem with the given properties and return its handle
    pub fn create_dataset(&self, name: &str, properties: &PropertySet) -> Result<Dataset> {
        let opts = CreateFilesystemOpts {
            properties: properties.clone(),
            ..Default::default()
        };
        self.create_filesystem(name, &opts)?;
        self.get_dataset(name)
    }

    /// Destroy a dataset along with all dependents (`destroy -R`)
    pub fn destroy_dataset(&self, dataset: &Dataset) -> Result<()> {
        let opts = DestroyOpts {
            destroy_clones: true,
            ..Default::default()
        };
        self.destroy(&dataset.name, &opts)
    }

    /// Snapshot `dataset@snap_name` and return its handle
    pub fn snapshot_dataset(&self, dataset: &Dataset, snap_name: &str) -> Result<Snapshot> {
        let name = dataset.snapshot_name(snap_name);
        self.snapshot(&name, &SnapshotOpts::default())?;
        self.get_snapshot(&name)
    }

    /// Clone `snapshot` into `target` and return the new dataset
    pub fn clone_snapshot(&self, snapshot: &Snapshot, target: &str) -> Result<Dataset> {
        self.create_clone(&snapshot.name, target, &CloneOpts::default())?;
        self.get_dataset(target)
    }

    pub fn promote_dataset(&self, dataset: &Dataset) -> Result<()> {
        self.promote(&dataset.name)
    }
}

/// Whether a directory has no entries. Errors if it cannot be read.
pub fn is_empty_dir(path: impl AsRef<Path>) -> Result<bool> {
    let mut entries = std::fs::read_dir(path)?;
    Ok(entries.next().is_none())
}
