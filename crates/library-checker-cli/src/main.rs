mod commands;
mod logging;
mod progress;
mod prompt;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use library_checker_core::credentials::{self, CredentialStore, Credentials};
use library_checker_core::{
    scanner, AppConfig, DeletionWorkflow, Prompt, ScanPipeline, SpotifyClient,
};
use progress::CliReporter;
use prompt::TerminalPrompt;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match library_checker_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Scan(scan)) => match scan.music_dir {
            Some(music_dir) => run_scan(&config, &music_dir),
            None => {
                eprintln!("Please provide the music directory path as an argument.");
                eprintln!("Usage: library-checker scan /path/to/music/directory");
                process::exit(1);
            }
        },
        Some(Commands::Delete) => run_delete(&config),
        Some(Commands::Configure) => run_configure(),
        Some(Commands::PrintConfig) => run_print_config(&config),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_scan(config: &AppConfig, music_dir: &Path) -> anyhow::Result<()> {
    scanner::validate_root(music_dir)?;

    let store = CredentialStore::default_location()?;
    let credentials = credentials::resolve_credentials(&store)?;
    let client = SpotifyClient::connect(credentials, config)?;

    let reporter = CliReporter::new();
    let summary = ScanPipeline::new(&client)
        .with_log_paths(&config.matches_file, &config.no_matches_file)
        .run(music_dir, &reporter)
        .with_context(|| format!("scan of {} failed", music_dir.display()))?;

    println!();
    info!(
        "{} matched, {} unmatched of {} artist folders",
        format!("{}", summary.matched).green(),
        format!("{}", summary.unmatched).yellow(),
        summary.folders,
    );
    if summary.lookup_failures > 0 {
        info!(
            "{} lookups failed and were recorded as unmatched",
            format!("{}", summary.lookup_failures).red(),
        );
    }
    info!(
        "Matches written to {}, unmatched folders to {}",
        config.matches_file.cyan(),
        config.no_matches_file.cyan(),
    );
    println!("Processing complete!");

    Ok(())
}

fn run_delete(config: &AppConfig) -> anyhow::Result<()> {
    let matches_path = PathBuf::from(&config.matches_file);
    let mut workflow = DeletionWorkflow::new(TerminalPrompt::new());
    let report = workflow.run(&matches_path)?;

    println!();
    info!(
        "{} deleted, {} skipped, {} already gone, {} failed",
        format!("{}", report.deleted()).green(),
        report.declined(),
        format!("{}", report.missing()).yellow(),
        format!("{}", report.failed()).red(),
    );
    println!("Deletion process complete!");

    Ok(())
}

fn run_configure() -> anyhow::Result<()> {
    let store = CredentialStore::default_location()?;
    let mut prompt = TerminalPrompt::new();

    println!("\nSpotify Library Checker - Configuration\n");
    println!("Please enter your Spotify API credentials.");
    println!("You can get these from https://developer.spotify.com/dashboard\n");

    let client_id = prompt
        .ask("Client ID: ")
        .context("failed to read the client id")?;
    let client_secret = prompt
        .ask_secret("Client Secret: ")
        .context("failed to read the client secret")?;

    let (client_id, client_secret) = (client_id.trim(), client_secret.trim());
    if client_id.is_empty() || client_secret.is_empty() {
        bail!("Both Client ID and Client Secret are required.");
    }

    store
        .save(&Credentials::new(client_id, client_secret))
        .context("failed to save configuration")?;

    println!("\n{}", "Configuration saved successfully!".green());
    println!("Configuration file created at: {}", store.path().display());

    Ok(())
}

fn run_print_config(config: &AppConfig) -> anyhow::Result<()> {
    println!("Configuration: {:?}", config);

    let store = CredentialStore::default_location()?;
    let state = if store.exists() { "present" } else { "missing" };
    println!("Credentials: {} ({})", store.path().display(), state);

    Ok(())
}
