//! topweek CLI
//!
//! One binary, two scheduled invocations: `collect` writes the snapshot
//! files, `publish` mirrors the latest snapshot to a Drive folder.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use topweek::{
    config::{CollectorConfig, PublisherConfig, RedditCredentials},
    error::Result,
    pipeline,
    storage::LocalStore,
};

/// topweek - Weekly Reddit top-post snapshots
#[derive(Parser, Debug)]
#[command(
    name = "topweek",
    version,
    about = "Collects weekly top Reddit posts and publishes them to Google Drive"
)]
struct Cli {
    /// Directory holding config.toml and snapshot output
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch top posts and comments, write the dated and latest snapshots
    Collect,

    /// Upload the latest snapshot to the Drive folder
    Publish,

    /// Validate configuration without any network call
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load collector tunables (file, then env overlay) and validate them.
fn load_collector_config(data_dir: &Path) -> Result<CollectorConfig> {
    let mut config = CollectorConfig::load_or_default(data_dir.join("config.toml"));
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = LocalStore::new(&cli.data_dir);

    match cli.command {
        Command::Collect => {
            let config = load_collector_config(&cli.data_dir)?;
            let credentials = RedditCredentials::from_env()?;

            log::info!("Collecting {} subreddits...", config.subs.len());
            let outcome = pipeline::run_collector(&config, credentials, &store).await?;

            log::info!(
                "Collected {} posts ({} comment fetches failed)",
                outcome.post_count,
                outcome.comment_failures
            );
        }

        Command::Publish => {
            let config = PublisherConfig::from_env()?;
            let outcome = pipeline::run_publisher(&config, &store).await?;

            log::info!(
                "Published latest.json ({:?}); archive {}: {}",
                outcome.latest,
                outcome.archive_name,
                if outcome.archived {
                    "uploaded"
                } else {
                    "already present"
                }
            );
        }

        Command::Validate => {
            let config = load_collector_config(&cli.data_dir)?;
            log::info!("Config OK ({} subreddits)", config.subs.len());
        }
    }

    Ok(())
}
