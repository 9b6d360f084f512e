use clap::{Args, Parser, Subcommand};
use skyboard_core::{Config, Dashboard, DashboardError, Session, UnitSystem};

use crate::{configure, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyboard", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Log requests and fallbacks to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set units, clock style, home location and panels interactively.
    Configure,

    /// Show weather for coordinates, or for the configured home location.
    Show {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show weather for a place name, e.g. "Lisbon" or "Springfield, IL".
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Unit system; defaults to the configured one.
    #[arg(long)]
    pub units: Option<UnitSystem>,

    /// Print the presentation model as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure::run(),
            Command::Show { lat, lon, display } => {
                let dashboard = dashboard(&display)?;
                let result = match (lat, lon) {
                    (Some(lat), Some(lon)) => dashboard.load_coordinates(lat, lon).await,
                    _ => dashboard.load_current().await,
                };
                present(result, &display)
            }
            Command::Search { query, display } => {
                let dashboard = dashboard(&display)?;
                let result = dashboard.search(&query.join(" ")).await;
                present(result, &display)
            }
        }
    }
}

fn dashboard(display: &DisplayArgs) -> anyhow::Result<Dashboard> {
    let config = Config::load()?;
    let units = display.units.unwrap_or(config.units);

    Ok(Dashboard::new(&config).with_units(units))
}

fn present(result: Result<Session, DashboardError>, display: &DisplayArgs) -> anyhow::Result<()> {
    let session = result.map_err(|e| {
        tracing::warn!("{}", e);
        anyhow::anyhow!(e.user_message())
    })?;

    let view = session.render()?;

    if display.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render(&view));
    }

    Ok(())
}
