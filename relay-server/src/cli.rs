use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use relay_core::{Config, Validator, WeatherRelay, providers_from_config};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-relay", version, about = "Historical weather relay server")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the access token and listen address.
    Configure,

    /// Run the HTTP server.
    Serve {
        /// Listen address, overrides the configured one.
        #[arg(long)]
        bind: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(self.config),
            Command::Serve { bind } => serve(self.config, bind).await,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config(path.as_ref())?;

    let token = Password::new("Access token clients must send:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Token prompt was cancelled")?;
    config.set_api_token(token);

    let bind = Text::new("Listen address:")
        .with_default(&config.bind)
        .prompt()
        .context("Listen address prompt was cancelled")?;
    config.bind = bind;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

async fn serve(path: Option<PathBuf>, bind: Option<String>) -> anyhow::Result<()> {
    let mut config = load_config(path.as_ref())?;
    config.apply_env_overrides();
    if let Some(bind) = bind {
        config.bind = bind;
    }

    let validator = Validator::new(config.api_token()?);
    let (geocoder, archive) = providers_from_config(&config)?;
    let relay = WeatherRelay::new(validator, Arc::new(geocoder), Arc::new(archive));

    let app = routes::create_router(relay).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    info!(
        bind = %config.bind,
        geocoding_url = %config.geocoding_url,
        archive_url = %config.archive_url,
        "Weather relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Weather relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
