use anyhow::Context;
use chrono::{Local, Timelike};
use citycast_core::{
    Config, DisplayText, SystemClock, UnitSystem, WeatherError, WeatherPresenter,
    presenter::{FORECAST_PLACEHOLDER, TimeOfDay},
    provider::provider_from_config,
};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::error;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default units.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "New York".
        city: String,

        /// metric or imperial; defaults to the configured units.
        #[arg(long)]
        units: Option<UnitSystem>,
    },

    /// Search repeatedly, keeping a history for the session.
    Interactive {
        /// metric or imperial; defaults to the configured units.
        #[arg(long)]
        units: Option<UnitSystem>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => {
                let config = Config::load()?;
                let units = units.unwrap_or(config.units);
                let mut presenter = WeatherPresenter::new(provider_from_config(&config)?);

                match presenter.fetch_and_format(&city, units, &SystemClock).await {
                    Ok(text) => {
                        print_display(&text);
                        Ok(())
                    }
                    Err(e) => Err(report(&e)),
                }
            }
            Command::Interactive { units } => {
                let config = Config::load()?;
                let units = units.unwrap_or(config.units);
                let presenter = WeatherPresenter::new(provider_from_config(&config)?);
                session(presenter, units).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Default units:", UnitSystem::all().to_vec())
        .with_starting_cursor(if config.units == UnitSystem::Imperial { 1 } else { 0 })
        .prompt()
        .context("Failed to read unit choice")?;

    config.api_key = Some(api_key.trim().to_string());
    config.units = units;
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// One line of input in an interactive session.
#[derive(Debug, PartialEq, Eq)]
enum SessionInput {
    Search(String),
    Units(UnitSystem),
    History,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> SessionInput {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return SessionInput::Search(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "q" | "exit"), None) => SessionInput::Quit,
        (Some("history" | "h"), None) => SessionInput::History,
        (Some("units" | "u"), Some(value)) => match value.parse() {
            Ok(units) => SessionInput::Units(units),
            Err(_) => SessionInput::Unknown(line.to_string()),
        },
        _ => SessionInput::Unknown(line.to_string()),
    }
}

async fn session(mut presenter: WeatherPresenter, mut units: UnitSystem) -> anyhow::Result<()> {
    let theme = match TimeOfDay::from_hour(Local::now().hour()) {
        TimeOfDay::Day => "day",
        TimeOfDay::Night => "night",
    };
    println!("citycast ({theme} theme). Units: {}.", units.label());
    println!("Type a city, `:units metric|imperial`, `:history` or `:quit`.");

    loop {
        let line = match Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match parse_input(&line) {
            SessionInput::Quit => break,
            SessionInput::History => print_history(&presenter),
            SessionInput::Units(next) => {
                units = next;
                println!("Units: {}", units.label());
            }
            SessionInput::Unknown(cmd) => println!("Unknown command: {cmd}"),
            SessionInput::Search(city) => {
                match presenter.fetch_and_format(&city, units, &SystemClock).await {
                    Ok(text) => {
                        print_display(&text);
                        print_history(&presenter);
                    }
                    Err(e) => {
                        eprintln!("Error: {}", report(&e));
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_display(text: &DisplayText) {
    println!("{text}");
    println!("Icon: {}", text.icon_url);
    println!("{FORECAST_PLACEHOLDER}");
}

fn print_history(presenter: &WeatherPresenter) {
    println!("Search History:");
    for entry in presenter.history().iter() {
        println!("  {entry}");
    }
}

/// Log the full error; the returned error carries only the generic message.
fn report(e: &WeatherError) -> anyhow::Error {
    error!(error = ?e, "search failed");
    anyhow::anyhow!(e.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(parse_input("  New York "), SessionInput::Search("New York".into()));
    }

    #[test]
    fn blank_line_is_still_a_search() {
        // The presenter rejects it, so the user sees the empty-city message.
        assert_eq!(parse_input("   "), SessionInput::Search(String::new()));
    }

    #[test]
    fn unit_toggle_commands() {
        assert_eq!(parse_input(":units imperial"), SessionInput::Units(UnitSystem::Imperial));
        assert_eq!(parse_input(":u metric"), SessionInput::Units(UnitSystem::Metric));
        assert!(matches!(parse_input(":units kelvin"), SessionInput::Unknown(_)));
    }

    #[test]
    fn history_and_quit_commands() {
        assert_eq!(parse_input(":history"), SessionInput::History);
        assert_eq!(parse_input(":quit"), SessionInput::Quit);
        assert!(matches!(parse_input(":quit now"), SessionInput::Unknown(_)));
    }

    #[test]
    fn reported_error_hides_remote_detail() {
        let e = WeatherError::Remote {
            status_code: 404,
            body: r#"{"cod":"404","message":"city not found"}"#.into(),
        };

        let shown = report(&e).to_string();
        assert_eq!(shown, e.user_message());
        assert!(!shown.contains("404"));
    }

    #[test]
    fn cli_parses_show_with_units() {
        let cli = Cli::try_parse_from(["citycast", "show", "Paris", "--units", "imperial"]).unwrap();
        match cli.command {
            Command::Show { city, units } => {
                assert_eq!(city, "Paris");
                assert_eq!(units, Some(UnitSystem::Imperial));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
