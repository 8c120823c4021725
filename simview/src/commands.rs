use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_SETTINGS_FILE: &str = "simview-settings.json";

#[derive(Parser)]
#[command(name = "simview", version, about = "Inspect plot data and GUI settings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the samples a plot would show for a slider position
    Slice {
        /// JSON lines file, one `[t, v0, v1, ...]` row per sample
        #[arg(long)]
        input: PathBuf,
        /// First shown time in seconds
        #[arg(long)]
        start: f64,
        /// Shown time span in seconds
        #[arg(long)]
        span: f64,
        /// How far before the window samples are retained
        #[arg(long, default_value_t = simview_core::window::DEFAULT_RETENTION_MARGIN)]
        margin: f64,
    },
    /// Validate a "<min>,<max>" plot range
    Range {
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    Config {
        #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
        file: PathBuf,
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    Show,
    Get {
        key: String,
    },
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}
