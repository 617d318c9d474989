use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, Coordinates, fetcher_from_config};
use inquire::Text;
use std::{path::PathBuf, sync::Arc};
use tracing::info;

use crate::{api::AppState, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Short-term forecasts from api.weather.gov")]
pub struct Cli {
    /// Path to the config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Override `server.listen` from the config, e.g. "127.0.0.1:8080".
        #[arg(long)]
        listen: Option<String>,
    },

    /// Fetch and print the forecast for a point.
    Show {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Interactively write the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;

        match self.command {
            Command::Serve { listen } => {
                if let Some(listen) = listen {
                    config.server.listen = listen;
                }
                let fetcher = fetcher_from_config(&config)?;
                let state = AppState::new(Arc::from(fetcher));
                server::run(config.listen_addr()?, state).await?;
            }
            Command::Show { latitude, longitude } => {
                let fetcher = fetcher_from_config(&config)?;
                let forecast = fetcher.forecast(Coordinates::new(latitude, longitude)).await?;

                println!("Forecast for {latitude}, {longitude}");
                println!("  Short term:  {}", forecast.short_term);
                println!("  Temperature: {}", forecast.temperature);
                println!("  Feels:       {}", forecast.temperature_feels);
            }
            Command::Configure => {
                let config = prompt_config(config)?;
                let path = match &self.config {
                    Some(path) => {
                        config.save_to(path)?;
                        path.clone()
                    }
                    None => config.save()?,
                };
                info!(path = %path.display(), "configuration saved");
                println!("Configuration saved to {}", path.display());
            }
        }

        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

fn prompt_config(mut config: Config) -> anyhow::Result<Config> {
    config.server.listen = Text::new("Listen address:")
        .with_default(&config.server.listen)
        .prompt()
        .context("Failed to read listen address")?;

    config.upstream.user_agent = Text::new("User-Agent (api.weather.gov asks for contact info):")
        .with_default(&config.upstream.user_agent)
        .prompt()
        .context("Failed to read user agent")?;

    config.upstream.base_url = Text::new("Upstream base URL:")
        .with_default(&config.upstream.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["forecast", "show", "39.7456", "-97.0892"]).unwrap();

        match cli.command {
            Command::Show { latitude, longitude } => {
                assert_eq!(latitude, 39.7456);
                assert_eq!(longitude, -97.0892);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_rejects_non_numeric_coordinates() {
        assert!(Cli::try_parse_from(["forecast", "show", "north", "-97.0892"]).is_err());
    }

    #[test]
    fn serve_takes_listen_override_and_global_config() {
        let cli = Cli::try_parse_from([
            "forecast",
            "serve",
            "--listen",
            "127.0.0.1:9000",
            "--config",
            "/tmp/forecast.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/forecast.toml")));
        match cli.command {
            Command::Serve { listen } => assert_eq!(listen.as_deref(), Some("127.0.0.1:9000")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["forecast"]).is_err());
    }
}
