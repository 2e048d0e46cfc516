use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use zfs_cmd::ZfsConfig;
use zfs_cmd::zfs::{DatasetType, GetOpts, ListOpts, SortOrder, options::depth_from_signed};

#[derive(Parser, Debug)]
#[command(name = "zfs-cmd")]
#[command(about = "Query ZFS datasets and print the results as JSON")]
struct Args {
    /// Path to the zfs binary (searched in default locations and PATH if unset)
    #[arg(long, env = "ZFS_BINARY")]
    zfs_binary: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List datasets (zfs list)
    List {
        /// Dataset to start from; all datasets if omitted
        name: Option<String>,

        /// Recurse into children
        #[arg(short, long)]
        recursive: bool,

        /// Maximum depth; -1 for unlimited
        #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
        depth: i32,

        /// Extra columns to report after the name
        #[arg(short = 'o', long, value_delimiter = ',')]
        properties: Vec<String>,

        /// Dataset types (filesystem, volume, snapshot, bookmark, all)
        #[arg(short = 't', long = "type", value_delimiter = ',')]
        types: Vec<DatasetType>,

        /// Sort ascending by property
        #[arg(short = 's', long, conflicts_with = "sort_desc")]
        sort: Option<String>,

        /// Sort descending by property
        #[arg(short = 'S', long)]
        sort_desc: Option<String>,
    },

    /// Get properties (zfs get)
    Get {
        /// Comma-separated property names
        #[arg(value_delimiter = ',')]
        properties: Vec<String>,

        /// Dataset to query; all datasets if omitted
        #[arg(long)]
        name: Option<String>,

        /// Recurse into children
        #[arg(short, long)]
        recursive: bool,

        /// Maximum depth; -1 for unlimited
        #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
        depth: i32,

        /// Dataset types (filesystem, volume, snapshot, bookmark, all)
        #[arg(short = 't', long = "type", value_delimiter = ',')]
        types: Vec<DatasetType>,

        /// Property sources (local, default, inherited, temporary, received, none)
        #[arg(short = 's', long = "source", value_delimiter = ',')]
        sources: Vec<String>,
    },

    /// Mounted zfs filesystems (zfs mount)
    Mounts,

    /// Check whether a filesystem or snapshot exists
    Exists {
        name: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing with configured log level
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ZfsConfig {
        binary: args.zfs_binary.clone(),
    };
    let binary = config
        .resolve_binary()
        .map_err(|e| format!("Startup failed: {}", e))?;
    info!("Using zfs binary: {}", binary.display());
    let zfs = zfs_cmd::ZfsManager::with_binary(binary);

    match args.command {
        Commands::List {
            name,
            recursive,
            depth,
            properties,
            types,
            sort,
            sort_desc,
        } => {
            let sort = match (sort, sort_desc) {
                (Some(key), _) => Some(SortOrder::Ascending(key)),
                (None, Some(key)) => Some(SortOrder::Descending(key)),
                (None, None) => None,
            };
            let opts = ListOpts {
                recurse: recursive,
                depth: depth_from_signed(depth),
                properties,
                types,
                sort,
            };
            let entries = zfs.list(name.as_deref().unwrap_or(""), &opts)?;
            debug!(count = entries.len(), "list complete");
            print_json(&entries, args.pretty)?;
        }
        Commands::Get {
            properties,
            name,
            recursive,
            depth,
            types,
            sources,
        } => {
            let opts = GetOpts {
                recurse: recursive,
                depth: depth_from_signed(depth),
                types,
                sources,
            };
            let map = zfs.get(name.as_deref().unwrap_or(""), &properties, &opts)?;
            print_json(&map, args.pretty)?;
        }
        Commands::Mounts => {
            let mounts = zfs.mounts()?;
            print_json(&mounts, args.pretty)?;
        }
        Commands::Exists { name } => {
            let exists = if name.contains('@') {
                zfs.snapshot_exists(&name)?
            } else {
                zfs.dataset_exists(&name)?
            };
            print_json(&serde_json::json!({ "name": name, "exists": exists }), args.pretty)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}
