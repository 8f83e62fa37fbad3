use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cityweather_core::{Config, FetchState, WeatherController, provider_from_config};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tokio::sync::mpsc;
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for any location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com API key in the config file.
    Configure,

    /// Show current weather for a location.
    Show {
        /// Location name, e.g. "Paris" or "New York".
        #[arg(required = true, num_args = 1..)]
        location: Vec<String>,

        /// Print the raw record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search for locations from a prompt until Esc or Ctrl-C.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, json } => show(&location.join(" "), json).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("weatherapi.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    let path = config.save()?;
    println!("Saved API key to {}", path.display());

    Ok(())
}

fn controller_from_config() -> anyhow::Result<WeatherController> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    debug!(?provider, "provider ready");
    Ok(WeatherController::from_boxed(provider))
}

async fn show(location: &str, json: bool) -> anyhow::Result<()> {
    let controller = controller_from_config()?;

    if let Some(request) = controller.submit(location) {
        if !json {
            render::print_state(&controller.state());
        }
        request.await.context("Weather request task failed")?;
    }

    match controller.state() {
        FetchState::Success(record) if json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        FetchState::Error(message) => bail!(message),
        state => {
            render::print_state(&state);
            Ok(())
        }
    }
}

async fn interactive() -> anyhow::Result<()> {
    let controller = controller_from_config()?;

    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
    let _observer = controller.observe(move |state| {
        render::print_state(state);
        if state.is_settled() {
            let _ = settled_tx.send(());
        }
    });

    loop {
        let input = tokio::task::spawn_blocking(|| {
            Text::new("Search for any location:").prompt()
        })
        .await
        .context("Prompt task failed")?;

        let query = match input {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read location"),
        };

        controller.submit(&query);
        if settled_rx.recv().await.is_none() {
            break;
        }
        println!();
    }

    Ok(())
}
