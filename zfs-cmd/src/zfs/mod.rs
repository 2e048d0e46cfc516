pub mod args;
pub mod dataset;
pub mod error;
pub mod options;
pub mod parse;
pub mod properties;
pub mod runner;
pub mod types;

pub use args::CommandArgs;
pub use dataset::{ZfsManager, is_empty_dir};
pub use error::{Result, ZfsError};
pub use options::{
    CloneOpts, CreateFilesystemOpts, CreateVolumeOpts, DatasetType, DestroyOpts, GetOpts,
    InheritOpts, ListOpts, MountOpts, PropertySet, RenameOpts, RollbackOpts, SnapshotOpts,
    SortOrder, UnmountOpts,
};
pub use properties::{Property, PropertyMap, PropertyRecord};
pub use runner::{CommandRunner, SystemRunner};
pub use types::{Dataset, ListEntry, MountEntry, Snapshot};
