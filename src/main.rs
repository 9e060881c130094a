use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tenki::{ForecastService, TenkiConfig, telemetry, web};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "tenki",
    version,
    about = "Japanese region code lookup and multi-day weather forecasts"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up the region code for a city, e.g. `tenki city-id 神奈川県 横浜`
    CityId {
        /// Prefecture title; Hokkaido uses 道南, 道央, 道北 or 道東
        pref: String,
        /// Primary subdivision title, usually without the 市 suffix
        city: String,
    },

    /// Show the forecast report for a region code, e.g. `tenki alerts 400010`
    Alerts {
        /// Region code
        code: String,
    },

    /// Serve both operations over HTTP
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = TenkiConfig::load_from_path(cli.config.clone())
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .context("Failed to load configuration")?;
    if let Err(e) = telemetry::init(&config.logging, cli.verbose) {
        eprintln!("Logging disabled: {e}");
    }

    let service = ForecastService::new(&config)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let outcome = match cli.command {
        Command::CityId { pref, city } => service
            .get_city_id(&pref, &city)
            .await
            .map(|code| code.to_string()),
        Command::Alerts { code } => service.get_alerts(&code).await,
        Command::Serve { port } => {
            web::run(service, port)
                .await
                .context("Tool host terminated")?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    match outcome {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
