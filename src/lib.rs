pub mod catalog;
pub mod error;
pub mod export;
pub mod interaction;
pub mod models;
pub mod navigation;
pub mod placement;
pub mod replay;
pub mod settings;
pub mod store;
pub mod survey;
pub mod timescale;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use catalog::FileSource;
use replay::Script;
use settings::{EngineSettings, SettingsStore};
use survey::Survey;

pub use error::{ConfigError, PlacementRejection};

/// Replay a scripted diary session and print the exported intervals.
#[derive(Debug, Parser)]
#[command(name = "timeuse", version, about)]
struct ReplayArgs {
    /// Survey configuration document (JSON)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Replay script (JSON list of steps)
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Engine settings file; defaults apply when omitted
    #[arg(value_name = "SETTINGS")]
    settings: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = ReplayArgs::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let exported = runtime.block_on(replay_session(args))?;
    println!("{exported}");
    Ok(())
}

async fn replay_session(args: ReplayArgs) -> Result<String> {
    let engine = match &args.settings {
        Some(path) => SettingsStore::new(path.clone())?.engine(),
        None => EngineSettings::default(),
    };

    let contents = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read script from {}", args.script.display()))?;
    let script = Script::from_json(&contents)?;

    let mut survey = Survey::bootstrap(FileSource::new(&args.config), engine).await?;
    log::info!(
        "Replaying {} steps against {}",
        script.steps.len(),
        args.config.display()
    );
    let summary = replay::replay(&mut survey, &script).await?;
    log::info!(
        "Replay finished: {} steps, {} created, {} rejected, {} store changes, {} transitions, {} refusals",
        summary.steps,
        summary.created,
        summary.rejected,
        summary.mutations,
        summary.transitions,
        summary.refusals
    );

    Ok(survey.export_json()?)
}
