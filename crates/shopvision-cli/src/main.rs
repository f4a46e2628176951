//! shopvision CLI: submit one image for shop classification or similarity search.
//!
//! The backend is chosen from ENVIRONMENT / SHOPVISION_API_URL / SHOPVISION_ORIGIN,
//! defaulting to the local development server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shopvision_api_client::api::health_notification;
use shopvision_api_client::{ApiClient, TaskDispatcher};
use shopvision_cli::{init_tracing, load_raw_file, print_json, Driver, Report};
use shopvision_core::{Action, ClientConfig, DragEvent, FileIntake, Session, TaskKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shopvision", about = "Shop classification and similarity search client")]
struct Cli {
    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an image as shop or not shop
    Classify {
        /// Image to submit; extra files are treated as a drop and ignored
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Find previously indexed images similar to this one
    Search {
        /// Image to submit; extra files are treated as a drop and ignored
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Validate an image and show its preview details without contacting the backend
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check that the backend is reachable
    Health,
}

/// Hand the files to the session: one file is a pick, several are a drop.
async fn select_files(driver: &mut Driver, paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_raw_file(path).await?);
    }

    let action = if files.len() == 1 {
        Action::SelectFile(files.pop())
    } else {
        Action::Drag(DragEvent::Drop { files })
    };
    driver.apply(action).await;

    if let Some(err) = driver.session().validation_error() {
        anyhow::bail!("{}", err);
    }
    Ok(())
}

fn print_report(driver: &Driver, json: bool) -> anyhow::Result<()> {
    let report = Report::from_session(driver.session());
    if json {
        print_json(&report)
    } else {
        print!("{}", report.to_text());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    config.validate()?;
    let client = ApiClient::from_config(&config).context(
        "Failed to create API client. Check SHOPVISION_API_URL or SHOPVISION_ORIGIN",
    )?;

    if let Commands::Health = cli.command {
        let outcome = client.health().await;
        let message = health_notification(&outcome);
        if outcome.is_err() {
            anyhow::bail!("{}", message);
        }
        println!("{}", message);
        return Ok(());
    }

    let session = Session::new(FileIntake::from_config(&config));
    let mut driver = Driver::new(session, TaskDispatcher::new(client));

    let task = match &cli.command {
        Commands::Classify { files } => {
            select_files(&mut driver, files).await?;
            Some(TaskKind::Classify)
        }
        Commands::Search { files } => {
            select_files(&mut driver, files).await?;
            Some(TaskKind::Search)
        }
        Commands::Inspect { files } => {
            select_files(&mut driver, files).await?;
            None
        }
        Commands::Health => None,
    };

    if let Some(kind) = task {
        driver.apply(Action::StartTask(kind)).await;
        let notifications = driver.take_notifications();
        if !notifications.is_empty() {
            anyhow::bail!("{}", notifications.join("\n"));
        }
    }

    print_report(&driver, cli.json)
}
