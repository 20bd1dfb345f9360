use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use finpanel::core::log::init_logging;
use finpanel::panels::PanelKind;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging; repeat for HTTP traces
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display every panel
    Dashboard,
    /// Display a single panel
    Panel {
        #[arg(value_enum)]
        panel: PanelArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PanelArg {
    Balance,
    Portfolio,
    Rewards,
    Transactions,
    Investments,
}

impl From<PanelArg> for PanelKind {
    fn from(arg: PanelArg) -> PanelKind {
        match arg {
            PanelArg::Balance => PanelKind::Balance,
            PanelArg::Portfolio => PanelKind::Portfolio,
            PanelArg::Rewards => PanelKind::Rewards,
            PanelArg::Transactions => PanelKind::Transactions,
            PanelArg::Investments => PanelKind::Investments,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => finpanel::cli::setup::run(config_path),
        Some(Commands::Dashboard) => {
            finpanel::run_command(finpanel::AppCommand::Dashboard, config_path).await
        }
        Some(Commands::Panel { panel }) => {
            finpanel::run_command(finpanel::AppCommand::Panel(panel.into()), config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
