//! Plant manager - watering reminders in the terminal
//!
//! This is the binary entry point. All logic lives in the library.

use anyhow::Context;
use clap::{Parser, Subcommand};
use plantmanager::app::{self, AppState};
use plantmanager::config::LOG_DIR;
use plantmanager::database::NewPlant;
use plantmanager::locale::Locale;
use plantmanager::logging;
use plantmanager::services::scheduler::FiredNotification;
use plantmanager::services::SettingsService;
use plantmanager::tui::{self, App};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Plant manager - watering reminders in the terminal
#[derive(Parser, Debug)]
#[command(name = "plantmanager")]
#[command(about = "Keep track of your plants and when to water them", long_about = None)]
struct Cli {
    /// Directory holding the database, settings and logs
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Display locale (pt-BR or en-US); saved for later runs
    #[arg(long)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the plant screens (default)
    Run,
    /// Load a user name and plants from a JSON file
    Seed {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the plants ordered by next watering
    List,
}

/// Contents of a seed file
#[derive(Debug, Deserialize)]
struct SeedFile {
    user: Option<String>,
    #[serde(default)]
    plants: BTreeMap<String, NewPlant>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => app::default_data_dir()?,
    };

    let settings_service = SettingsService::new(data_dir.clone());
    if let Some(locale) = cli.locale {
        settings_service
            .update_locale(locale)
            .await
            .context("Failed to save locale")?;
    }
    let settings = settings_service
        .load()
        .await
        .context("Failed to load settings")?;

    logging::init(&data_dir.join(LOG_DIR), &settings.log_filter)?;
    tracing::info!("Starting plant manager");

    let (state, fired_rx) = app::setup(&data_dir, settings).await?;

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&state, fired_rx).await,
        Command::Seed { file } => seed(&state, &file).await,
        Command::List => list(&state).await,
    };

    if let Err(e) = state.scheduler.shutdown().await {
        tracing::warn!("Scheduler shutdown failed: {}", e);
    }

    result
}

async fn run(
    state: &AppState,
    fired_rx: mpsc::UnboundedReceiver<FiredNotification>,
) -> anyhow::Result<()> {
    if let Err(e) = state.plants.restore_notifications().await {
        tracing::error!("Failed to restore reminders: {}", e);
    }

    tui::run(App::new(state.plants.clone()), fired_rx).await
}

async fn seed(state: &AppState, file: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read seed file {:?}", file))?;
    let seed: SeedFile = serde_json::from_str(&content).context("Failed to parse seed file")?;

    if let Some(user) = seed.user {
        state.plants.save_user_name(&user).await?;
    }

    let count = seed.plants.len();
    for (id, plant) in seed.plants {
        let saved = state.plants.save_plant(&id, plant).await?;
        tracing::info!("Seeded plant {} ({})", id, saved.name);
    }

    println!("Seeded {} plants", count);
    Ok(())
}

async fn list(state: &AppState) -> anyhow::Result<()> {
    let listing = state.plants.load_plants().await?;
    let strings = state.settings.locale.strings();

    match listing.next_watered {
        Some(message) => println!("{}", message),
        None => println!("{}", strings.no_plants),
    }
    for plant in &listing.plants {
        println!(
            "{:<12} {:<24} {} {} {}",
            plant.id, plant.name, strings.water_at, plant.day, plant.hour
        );
    }
    Ok(())
}
