use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rwatrack::core::log::init_logging;
use rwatrack::core::timeframe::Timeframe;

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

impl From<Commands> for rwatrack::AppCommand {
    fn from(cmd: Commands) -> rwatrack::AppCommand {
        match cmd {
            Commands::Track => rwatrack::AppCommand::Track,
            Commands::Report { timeframe, json } => {
                rwatrack::AppCommand::Report { timeframe, json }
            }
            Commands::Trends { timeframe } => rwatrack::AppCommand::Trends { timeframe },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch current prices and record premium observations
    Track,
    /// Display premium statistics per instrument
    Report {
        /// Timeframe: daily, weekly, monthly, or all
        #[arg(short, long, default_value = "all")]
        timeframe: Timeframe,

        /// Also write the report as JSON to this path
        #[arg(short, long, value_name = "PATH")]
        json: Option<std::path::PathBuf>,
    },
    /// Display trend, correlation, and risk analysis
    Trends {
        /// Timeframe: daily, weekly, monthly, or all
        #[arg(short, long, default_value = "all")]
        timeframe: Timeframe,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => rwatrack::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = rwatrack::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
instruments:
  - label: "hvb_drop"
    pool_id: "0x4cA805cE8EcE2E63FfC1F9f8F2731D3F48DF89Df"
    tranche: senior
  - label: "usdy"
    contract_address: "0x96F6eF951840721AdBF73e6C389f4e6954294985"

providers:
  coingecko:
    base_url: "https://api.coingecko.com"
  centrifuge:
    base_url: "https://api.centrifuge.io"
  treasury:
    base_url: "https://api.fiscaldata.treasury.gov"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
