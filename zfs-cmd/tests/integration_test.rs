//! Integration tests for zfs-cmd
//!
//! These tests drive `ZfsManager` through a fake `CommandRunner`, so no zfs
//! pool or root privileges are needed. They check the exact argument lists
//! handed to the tool and how canned output and failures come back.

use std::collections::VecDeque;
use std::sync::Mutex;

use zfs_cmd::zfs::{
    CloneOpts, CreateFilesystemOpts, CreateVolumeOpts, Dataset, DatasetType, DestroyOpts,
    GetOpts, InheritOpts, ListOpts, MountOpts, PropertySet, RenameOpts, RollbackOpts,
    SnapshotOpts, SortOrder, UnmountOpts,
};
use zfs_cmd::{CommandRunner, ZfsError, ZfsManager};

/// Fake runner that records every invocation and replays queued replies.
#[derive(Default)]
struct FakeRunner {
    calls: Mutex<Vec<Vec<String>>>,
    replies: Mutex<VecDeque<Result<String, String>>>,
}

impl FakeRunner {
    fn with_output(self, stdout: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(stdout.to_string()));
        self
    }

    fn with_failure(self, stderr: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(stderr.to_string()));
        self
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    fn last_call(&self) -> Vec<String> {
        self.calls().pop().expect("no zfs invocation recorded")
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, args: &[String]) -> zfs_cmd::zfs::Result<Vec<u8>> {
        self.calls.lock().unwrap().push(args.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(stdout)) => Ok(stdout.into_bytes()),
            Some(Err(stderr)) => Err(ZfsError::CommandFailed {
                command: format!("zfs {}", args.join(" ")),
                stderr,
                status: "exit status: 1".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

fn props(pairs: &[(&str, &str)]) -> PropertySet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// State-changing operations
// ============================================================================

#[test]
fn test_create_filesystem_and_volume() {
    let zfs = ZfsManager::new(FakeRunner::default());

    let opts = CreateFilesystemOpts {
        properties: props(&[("compression", "lz4")]),
        no_mount: true,
        create_parents: true,
    };
    zfs.create_filesystem("tank/a/b", &opts).unwrap();
    assert_eq!(
        zfs.runner().last_call(),
        vec!["create", "-u", "-p", "-o", "compression=lz4", "tank/a/b"]
    );

    let opts = CreateVolumeOpts {
        sparse: true,
        ..Default::default()
    };
    zfs.create_volume("tank/vol", "1G", &opts).unwrap();
    assert_eq!(
        zfs.runner().last_call(),
        vec!["create", "-V", "1G", "-s", "tank/vol"]
    );

    let opts = CreateVolumeOpts {
        create_parents: true,
        ..Default::default()
    };
    zfs.create_volume("tank/a/vol", "10G", &opts).unwrap();
    assert_eq!(
        zfs.runner().last_call(),
        vec!["create", "-p", "-V", "10G", "tank/a/vol"]
    );
}

#[test]
fn test_destroy_recursive_force() {
    let zfs = ZfsManager::new(FakeRunner::default());
    let opts = DestroyOpts {
        destroy_children: true,
        force_unmount: true,
        ..Default::default()
    };
    zfs.destroy("pool/ds", &opts).unwrap();
    assert_eq!(zfs.runner().last_call(), vec!["destroy", "-r", "-f", "pool/ds"]);
}

#[test]
fn test_snapshot_rollback_clone_promote() {
    let zfs = ZfsManager::new(FakeRunner::default());

    zfs.snapshot(
        "tank/a@s1",
        &SnapshotOpts {
            recurse: true,
            ..Default::default()
        },
    )
    .unwrap();
    zfs.rollback(
        "tank/a@s1",
        &RollbackOpts {
            destroy_later: true,
            destroy_clones: true,
            force_unmount: true,
        },
    )
    .unwrap();
    zfs.create_clone(
        "tank/a@s1",
        "tank/b",
        &CloneOpts {
            create_parents: true,
            properties: props(&[("mountpoint", "/mnt/b")]),
        },
    )
    .unwrap();
    zfs.promote("tank/b").unwrap();

    assert_eq!(
        zfs.runner().calls(),
        vec![
            vec!["snapshot", "-r", "tank/a@s1"],
            vec!["rollback", "-r", "-R", "-f", "tank/a@s1"],
            vec!["clone", "-p", "-o", "mountpoint=/mnt/b", "tank/a@s1", "tank/b"],
            vec!["promote", "tank/b"],
        ]
    );
}

#[test]
fn test_rename_set_inherit() {
    let zfs = ZfsManager::new(FakeRunner::default());

    zfs.rename(
        "tank/a",
        "tank/x/a",
        &RenameOpts {
            create_parents: true,
            ..Default::default()
        },
    )
    .unwrap();
    zfs.set("tank/x/a", &props(&[("atime", "off"), ("quota", "10G")]))
        .unwrap();
    zfs.inherit("tank/x/a", "atime", &InheritOpts::default())
        .unwrap();

    assert_eq!(
        zfs.runner().calls(),
        vec![
            vec!["rename", "-p", "tank/a", "tank/x/a"],
            vec!["set", "atime=off", "quota=10G", "tank/x/a"],
            vec!["inherit", "atime", "tank/x/a"],
        ]
    );
}

#[test]
fn test_mount_unmount_bookmark() {
    let zfs = ZfsManager::new(FakeRunner::default());

    zfs.mount(
        "tank/a",
        &MountOpts {
            options: vec!["ro".into()],
            mount_all: false,
        },
    )
    .unwrap();
    zfs.unmount(
        "tank/a",
        &UnmountOpts {
            force_unmount: true,
            unmount_all: false,
        },
    )
    .unwrap();
    zfs.bookmark("tank/a@s1", "tank/a#s1").unwrap();

    assert_eq!(
        zfs.runner().calls(),
        vec![
            vec!["mount", "-o", "ro", "tank/a"],
            vec!["unmount", "-f", "tank/a"],
            vec!["bookmark", "tank/a@s1", "tank/a#s1"],
        ]
    );
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_get_groups_by_dataset() {
    let zfs = ZfsManager::new(FakeRunner::default().with_output(
        "pool/a\tmountpoint\t/mnt/a\tlocal\npool/b\tmountpoint\t/mnt/b\tdefault\n",
    ));
    let opts = GetOpts {
        recurse: true,
        ..Default::default()
    };
    let map = zfs
        .get("pool", &["mountpoint".to_string()], &opts)
        .unwrap();

    assert_eq!(
        zfs.runner().last_call(),
        vec!["get", "-H", "-p", "-r", "mountpoint", "pool"]
    );
    assert_eq!(map.len(), 2);
    assert_eq!(map["pool/a"]["mountpoint"].value, "/mnt/a");
    assert_eq!(map["pool/a"]["mountpoint"].source, "local");
    assert_eq!(map["pool/b"]["mountpoint"].value, "/mnt/b");
    assert_eq!(map["pool/b"]["mountpoint"].source, "default");
}

#[test]
fn test_get_ignores_blank_and_short_rows() {
    let zfs = ZfsManager::new(
        FakeRunner::default().with_output("pool/a\tused\t4096\t-\n\npool/a\tbroken\n\n"),
    );
    let map = zfs.get("pool/a", &[], &GetOpts::default()).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["pool/a"].len(), 1);
    assert_eq!(map["pool/a"]["used"].value, "4096");
    assert_eq!(
        zfs.runner().last_call(),
        vec!["get", "-H", "-p", "name", "pool/a"]
    );
}

#[test]
fn test_list_with_columns() {
    let zfs = ZfsManager::new(
        FakeRunner::default().with_output("tank\t8192\t/tank\ntank/a\t4096\t/tank/a\n"),
    );
    let opts = ListOpts {
        recurse: true,
        properties: vec!["used".into(), "mountpoint".into()],
        types: vec![DatasetType::Filesystem],
        sort: Some(SortOrder::Ascending("name".into())),
        ..Default::default()
    }
    .with_depth(1);

    let entries = zfs.list("tank", &opts).unwrap();
    assert_eq!(
        zfs.runner().last_call(),
        vec![
            "list",
            "-H",
            "-p",
            "-r",
            "-d",
            "1",
            "-o",
            "name,used,mountpoint",
            "-t",
            "filesystem",
            "-s",
            "name",
            "tank"
        ]
    );
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].name, "tank/a");
    assert_eq!(entries[1].get("used"), Some("4096"));
    assert_eq!(entries[1].get("mountpoint"), Some("/tank/a"));
}

#[test]
fn test_mounts() {
    let zfs =
        ZfsManager::new(FakeRunner::default().with_output("pool/a  /mnt/a\npool/b  /mnt/b\n"));
    let mounts = zfs.mounts().unwrap();
    assert_eq!(zfs.runner().last_call(), vec!["mount"]);
    assert_eq!(mounts.len(), 2);
    assert_eq!(mounts[0].name, "pool/a");
    assert_eq!(mounts[0].mountpoint, "/mnt/a");
    assert_eq!(mounts[1].name, "pool/b");
    assert_eq!(mounts[1].mountpoint, "/mnt/b");
}

#[test]
fn test_mounts_malformed_output() {
    let zfs = ZfsManager::new(FakeRunner::default().with_output("pool/a\t/mnt/a\n"));
    assert!(matches!(zfs.mounts(), Err(ZfsError::ParseError(_))));
}

// ============================================================================
// Failures and existence
// ============================================================================

#[test]
fn test_command_failure_keeps_stderr() {
    let zfs = ZfsManager::new(
        FakeRunner::default().with_failure("cannot open 'x': dataset does not exist"),
    );
    let err = zfs.destroy("x", &DestroyOpts::default()).unwrap_err();

    match &err {
        ZfsError::CommandFailed {
            command, stderr, ..
        } => {
            assert_eq!(stderr, "cannot open 'x': dataset does not exist");
            assert_eq!(command, "zfs destroy x");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_not_found());
}

#[test]
fn test_existence_checks() {
    let zfs = ZfsManager::new(
        FakeRunner::default()
            .with_output("tank/a\n")
            .with_failure("cannot open 'tank/b': dataset does not exist")
            .with_output("tank/a@s1\n"),
    );
    assert!(zfs.dataset_exists("tank/a").unwrap());
    assert!(!zfs.dataset_exists("tank/b").unwrap());
    assert!(zfs.snapshot_exists("tank/a@s1").unwrap());

    let calls = zfs.runner().calls();
    assert_eq!(calls[1], vec!["list", "-H", "-o", "name", "-t", "filesystem", "tank/b"]);
    assert_eq!(calls[2], vec!["list", "-H", "-o", "name", "-t", "snapshot", "tank/a@s1"]);
}

#[test]
fn test_handles_are_plain_values() {
    let zfs = ZfsManager::new(FakeRunner::default().with_output("tank/a\n"));
    let ds = zfs.get_dataset("tank/a").unwrap();
    zfs.destroy_dataset(&ds).unwrap();

    // The handle still names the dataset; validity is re-checked by querying.
    assert_eq!(ds, Dataset::new("tank/a"));
    let zfs = ZfsManager::new(FakeRunner::default().with_failure("dataset does not exist"));
    assert!(!zfs.dataset_exists(&ds.name).unwrap());
}
