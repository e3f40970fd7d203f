use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use skyview_core::{
    Action, Config, Effect, WeatherClient, WeatherView, client_from_config, render_screen,
    view::WeatherStatus,
};
use tracing::info;

use crate::screen;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Current weather and a 3-day forecast")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the WeatherAPI key and the location to show.
    Configure,

    /// Print the weather once and exit.
    Show {
        /// Location query, overrides the configured one for this run.
        #[arg(long)]
        location: Option<String>,

        /// Also fetch and print the 3-day forecast.
        #[arg(long)]
        forecast: bool,
    },

    /// Open the interactive weather screen.
    Screen {
        /// Location query, overrides the configured one for this run.
        #[arg(long)]
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, forecast } => {
                let config = load_config(location)?;
                let client = client_from_config(&config)?;
                show(&config, &client, forecast).await
            }
            Command::Screen { location } => {
                let config = load_config(location)?;
                let client = client_from_config(&config)?;
                screen::run(config, client).await
            }
        }
    }
}

fn load_config(location: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(location) = location {
        config.set_location(location);
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let location = Text::new("Location:")
        .with_default(&config.location)
        .with_help_message("City name, postcode or \"lat,lon\"")
        .prompt()
        .context("Failed to read location")?;

    config.set_api_key(api_key.trim().to_string());
    config.set_location(location.trim().to_string());

    let display_name = Text::new("Display name:")
        .with_default(config.heading())
        .prompt()
        .context("Failed to read display name")?;
    config.display_name = Some(display_name.trim().to_string()).filter(|name| !name.is_empty());

    let path = config.save()?;
    info!(path = %path.display(), "Configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

/// Runs the view to completion without user input and prints a single frame.
async fn show(config: &Config, client: &dyn WeatherClient, forecast: bool) -> anyhow::Result<()> {
    let mut view = WeatherView::new(config.slide_duration());

    settle(&mut view, client, &config.location, Action::Mount).await;
    if forecast {
        settle(&mut view, client, &config.location, Action::ToggleForecast).await;
    }

    print!("{}", render_screen(view.state(), config.heading(), 0));

    if let WeatherStatus::Failed(message) = &view.state().weather {
        bail!("Could not load weather for '{}': {message}", config.location);
    }
    Ok(())
}

/// Dispatches `action` and performs the fetches it triggers, one after another.
async fn settle(view: &mut WeatherView, client: &dyn WeatherClient, location: &str, action: Action) {
    let mut pending = vec![action];
    while let Some(action) = pending.pop() {
        for effect in view.dispatch(action) {
            match effect {
                Effect::Fetch(request) => pending.push(request.run(client, location).await),
                // Nothing to animate for a single frame.
                Effect::Slide(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_accepts_location_and_forecast() {
        let cli = Cli::try_parse_from(["skyview", "show", "--location", "Kandy", "--forecast"])
            .expect("valid arguments");

        match cli.command {
            Command::Show { location, forecast } => {
                assert_eq!(location.as_deref(), Some("Kandy"));
                assert!(forecast);
            }
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn verbosity_is_global_and_counted() {
        let cli = Cli::try_parse_from(["skyview", "screen", "-vv"]).expect("valid arguments");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["skyview"]).is_err());
    }
}
