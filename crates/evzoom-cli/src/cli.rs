use super::commands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a coupling dataset to a static SVG.
    Render {
        /// Data file, highest priority.
        #[arg(short, long)]
        data: Option<String>,
        /// Value of the host element's data attribute.
        #[arg(long)]
        attribute: Option<String>,
        /// Page query string, e.g. `?data=couplings.json`.
        #[arg(long)]
        query: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
        /// JSON file overriding viewer defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Hover this pixel and let the dwell timer settle before writing.
        #[arg(long, num_args = 2, value_names = ["X", "Y"])]
        hover: Option<Vec<f64>>,
    },
    /// Play a JSON list of viewer events and write the final frame.
    Replay {
        #[arg(short, long)]
        data: String,
        #[arg(short, long)]
        events: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write every applied request as JSON.
        #[arg(long)]
        trace: Option<PathBuf>,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Render {
                data,
                attribute,
                query,
                output,
                config,
                hover,
            } => {
                let hover = hover.map(|xy| (xy[0], xy[1]));
                commands::render(
                    data.as_deref(),
                    attribute.as_deref(),
                    query.as_deref(),
                    &output,
                    config.as_deref(),
                    hover,
                )
            }
            Commands::Replay {
                data,
                events,
                output,
                config,
                trace,
            } => commands::replay(
                &data,
                &events,
                &output,
                config.as_deref(),
                trace.as_deref(),
            ),
        }
    }
}
