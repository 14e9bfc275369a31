use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

mod commands;
mod error;
mod utils;

#[derive(Parser, Debug)]
#[command(name = "hydra")]
#[command(about = "C++ binding generator: symbol graph, type resolution and binding plans", long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Write the umbrella header for the project's binding headers
    Umbrella {
        /// Project file (defaults to the nearest hydra.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Build the model of a parsed unit and report diagnostics
    Check {
        /// AST dump written by the front-end adapter
        #[arg(value_name = "UNIT")]
        unit: PathBuf,
    },

    /// Print the model tree of a parsed unit
    Dump {
        /// AST dump written by the front-end adapter
        #[arg(value_name = "UNIT")]
        unit: PathBuf,
        /// Only the subtree at this qualified name
        #[arg(short, long, value_name = "NAME")]
        path: Option<String>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Compute the binding closure and order and print the plan
    Plan {
        /// AST dump written by the front-end adapter
        #[arg(value_name = "UNIT")]
        unit: PathBuf,
        /// Project file (defaults to the nearest hydra.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Roots to bind instead of the project's [[bindings]]
        #[arg(value_name = "ROOT")]
        roots: Vec<String>,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new().filter_level(args.verbose.log_level_filter()).init();

    match args.command {
        Command::Umbrella { config, output } => commands::umbrella::handle_umbrella(config, output)?,
        Command::Check { unit } => commands::check::handle_check(&unit)?,
        Command::Dump { unit, path, output } => commands::dump::handle_dump(&unit, path.as_deref(), output.as_deref())?,
        Command::Plan { unit, config, output, roots } => {
            commands::plan::handle_plan(&unit, config, &roots, output.as_deref())?
        }
    }
    Ok(())
}
