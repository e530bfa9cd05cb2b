use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "library-checker")]
#[command(about = "Check which local artist folders already exist on Spotify", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Match every artist folder in a music directory against Spotify
    Scan(ScanArgs),
    /// Delete matched folders one by one, after confirmation
    Delete,
    /// Store Spotify API credentials
    Configure,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Root music directory, one sub-folder per artist
    pub music_dir: Option<PathBuf>,
}
