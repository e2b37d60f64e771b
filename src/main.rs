use clap::{CommandFactory, Parser, Subcommand};
use coinconv::cli::convert::is_reported;
use coinconv::core::log::init_logging;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coinconv::AppCommand {
    fn from(cmd: Commands) -> coinconv::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                fiat,
                crypto,
            } => coinconv::AppCommand::Convert {
                amount,
                fiat,
                crypto,
            },
            Commands::List => coinconv::AppCommand::List,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert a fiat amount into a cryptocurrency at the current price
    Convert {
        /// Amount of fiat currency, e.g. 100
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Fiat currency id or name, e.g. usd
        #[arg(short, long)]
        fiat: String,
        /// Cryptocurrency id or name, e.g. bitcoin
        #[arg(short = 'x', long)]
        crypto: String,
    },
    /// List supported currencies
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinconv::cli::setup::setup(),
        Some(cmd) => coinconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => Cli::command().print_help().map_err(anyhow::Error::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            if !is_reported(&e) {
                eprintln!("Error: {e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
