use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, Select};
use weatherapp_core::{
    Config, FetchOutcome, LocationQuery, UnitPreference, WeatherSession, provider_from_config,
};

use crate::form;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherapp", version, about = "Current weather by city or ZIP code")]
pub struct Cli {
    /// Log pipeline steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// OpenWeather API key; overrides the configured one.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default units.
    Configure,

    /// Show current weather for one location.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Unit system; defaults to the configured one.
        #[arg(long, value_enum)]
        units: Option<UnitsArg>,
    },

    /// Open the interactive weather form.
    Interactive {
        /// Initial unit system; defaults to the configured one.
        #[arg(long, value_enum)]
        units: Option<UnitsArg>,
    },
}

#[derive(Debug, clap::Args)]
pub struct LocationArgs {
    /// City name.
    #[arg(long)]
    pub city: Option<String>,

    /// Country code qualifying the city or ZIP, e.g. "GB".
    #[arg(long)]
    pub country: Option<String>,

    /// ZIP / postal code; takes precedence over the city.
    #[arg(long)]
    pub zip: Option<String>,
}

impl From<LocationArgs> for LocationQuery {
    fn from(args: LocationArgs) -> Self {
        LocationQuery::new(args.city, args.country, args.zip)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for UnitPreference {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Metric => UnitPreference::Metric,
            UnitsArg::Imperial => UnitPreference::Imperial,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, units } => {
                let config = load_config(self.api_key)?;
                let unit = units.map(UnitPreference::from).unwrap_or(config.units);
                let session = WeatherSession::new(provider_from_config(&config)?);

                match session.fetch(location.into(), unit).await {
                    Ok(outcome) => {
                        print_outcome(&outcome);
                        Ok(())
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "fetch failed");
                        Err(anyhow!("{}: {}", err.title(), err.user_message()))
                    }
                }
            }
            Command::Interactive { units } => {
                let config = load_config(self.api_key)?;
                let unit = units.map(UnitPreference::from).unwrap_or(config.units);
                let session = WeatherSession::new(provider_from_config(&config)?);
                form::run(&session, unit).await
            }
        }
    }
}

/// Load the stored config and apply the command-line key, if any.
fn load_config(api_key: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(key) = api_key {
        config.set_api_key(key);
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let labels: Vec<&str> = UnitPreference::all().iter().map(UnitPreference::label).collect();
    let start = UnitPreference::all().iter().position(|u| *u == config.units).unwrap_or(0);
    let choice = Select::new("Default temperature unit:", labels)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit selection")?;
    config.units = unit_from_label(choice);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

pub(crate) fn unit_from_label(label: &str) -> UnitPreference {
    UnitPreference::all()
        .iter()
        .copied()
        .find(|u| u.label() == label)
        .unwrap_or_default()
}

pub(crate) fn print_outcome(outcome: &FetchOutcome) {
    for line in outcome.display.lines() {
        println!("{line}");
    }
    println!();
    println!("{}", outcome.history_line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_arguments() {
        let cli = Cli::try_parse_from([
            "weatherapp", "show", "--city", "London", "--country", "GB", "--units", "imperial",
        ])
        .unwrap();

        let Command::Show { location, units } = cli.command else {
            panic!("expected show");
        };
        let query = LocationQuery::from(location);
        assert_eq!(query.city_value(), Some("London"));
        assert_eq!(query.country_value(), Some("GB"));
        assert_eq!(query.zip_value(), None);
        assert_eq!(units.map(UnitPreference::from), Some(UnitPreference::Imperial));
    }

    #[test]
    fn rejects_unknown_units() {
        let args = ["weatherapp", "show", "--zip", "1", "--units", "kelvin"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn unit_labels_map_back() {
        assert_eq!(unit_from_label("Celsius"), UnitPreference::Metric);
        assert_eq!(unit_from_label("Fahrenheit"), UnitPreference::Imperial);
    }
}
