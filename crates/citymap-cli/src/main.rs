mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use citymap_cli::output::OutputFormat;
use citymap_lib::Relaxation;

use crate::commands::cities::handle_cities_command;
use crate::commands::route::{handle_route_command, RouteCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "City road map utilities and A* routing")]
struct Cli {
    /// Road map file to load.
    #[arg(long, env = "CITYMAP_MAP")]
    map: PathBuf,

    /// Output format for command results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route between two cities with A* search.
    Route {
        /// Starting city name.
        #[arg(long = "from")]
        from: String,
        /// Destination city name.
        #[arg(long = "to")]
        to: String,
        /// How successor costs are relaxed during the search.
        #[arg(long, value_enum, default_value_t = RelaxationArg::AsObserved)]
        relaxation: RelaxationArg,
        /// Give up after this many search iterations.
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Print the route from the destination back to the start.
        #[arg(long)]
        reverse: bool,
    },
    /// List every city of the map with its roads.
    Cities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RelaxationArg {
    /// Never update a city already waiting in the open set.
    AsObserved,
    /// Re-queue a waiting city when a strictly cheaper path is found.
    Canonical,
}

impl From<RelaxationArg> for Relaxation {
    fn from(value: RelaxationArg) -> Self {
        match value {
            RelaxationArg::AsObserved => Relaxation::AsObserved,
            RelaxationArg::Canonical => Relaxation::Canonical,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Route {
            from,
            to,
            relaxation,
            max_iterations,
            reverse,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                relaxation: relaxation.into(),
                max_iterations,
                reverse,
            };
            handle_route_command(&cli.map, cli.format, &args)
        }
        Command::Cities => handle_cities_command(&cli.map, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
