use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vvs_core::OutputFormat;

#[derive(Parser)]
#[command(name = "vvs", version = env!("VVS_VERSION"))]
#[command(about = "VolView session manifests and folder configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Settings file (defaults to ~/.config/volview-session/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
}

/// Resource snapshot to operate on.
#[derive(Args, Clone)]
pub struct TreeArgs {
    /// JSON snapshot of folders, items, files and users
    #[arg(long)]
    pub tree: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a session manifest for an item or a folder selection
    Generate {
        #[command(flatten)]
        tree: TreeArgs,

        /// Item whose files form the volume
        #[arg(long, conflicts_with = "folder", required_unless_present = "folder")]
        item: Option<String>,

        /// Folder whose items form the volume
        #[arg(long)]
        folder: Option<String>,

        /// Restrict a folder to these items (comma-separated ids)
        #[arg(long, requires = "folder", default_value = "")]
        items: String,

        /// Restrict a folder to the items of these folders (comma-separated ids)
        #[arg(long, requires = "folder", default_value = "")]
        folders: String,

        /// JSON array of annotations
        #[arg(long)]
        annotations: Option<PathBuf>,

        /// JSON array of label maps
        #[arg(long)]
        labelmaps: Option<PathBuf>,

        /// Output path (defaults to the package file name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve the files a folder or selection opens as
    Resolve {
        #[command(flatten)]
        tree: TreeArgs,

        /// Folder the selection was made in
        #[arg(long)]
        folder: String,

        /// Selected folders (comma-separated ids)
        #[arg(long, default_value = "")]
        folders: String,

        /// Selected items (comma-separated ids)
        #[arg(long, default_value = "")]
        items: String,

        /// Only accept a saved session; fail if there is none
        #[arg(long)]
        session: bool,
    },

    /// Folder configuration and tool settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Resolve the effective viewer configuration for a folder
    Resolve {
        #[command(flatten)]
        tree: TreeArgs,

        #[arg(long)]
        folder: String,

        /// Login of the requesting user (anonymous if omitted)
        #[arg(long)]
        user: Option<String>,

        /// Config item name (defaults to the configured file name)
        #[arg(long)]
        file_name: Option<String>,
    },
    /// Show effective tool settings
    Show,
    /// Print a commented settings template
    Template,
}
