use clap::{Parser, Subcommand};
use compressx_store::UserId;
use std::path::PathBuf;

/// Account used when no user is given
pub const DEMO_USER: &str = "demo@compressx.com";

#[derive(Parser)]
#[command(name = "compressx")]
#[command(version)]
#[command(about = "Simulated file compression with per-user statistics")]
pub struct Cli {
    /// User whose statistics are read and updated
    #[arg(short, long, global = true, default_value = DEMO_USER)]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress files (simulated) and record the results
    Compress {
        /// Images (jpg, png, gif, webp, bmp) or documents (pdf)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show recent compressions, most recent first
    History {
        /// Number of entries to show (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the statistics summary
    Stats,

    /// Delete one history entry by its index
    Delete { index: usize },

    /// Delete the whole history
    Clear,

    /// Analytics across all users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Totals over every user
    Stats,
    /// Activity per day
    Daily,
    /// Compressed files per extension
    Types,
    /// Most active users
    Top {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Find users by id
    Search { query: String },
    /// Dump all data as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove a user's statistics
    DeleteUser {
        #[arg(id = "target_user", value_name = "USER")]
        user: UserId,
    },
    /// Show or change configuration
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current configuration
    Show,
    /// Change one setting (lists are comma separated)
    Set { key: String, value: String },
    /// Restore every setting to its default
    Reset,
}
