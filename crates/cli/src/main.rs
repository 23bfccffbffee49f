//! cardkit - exercise card building blocks against a live pipeline host.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use cardkit_observability::{LogConfig, LogFormat};

mod commands;
mod settings;

use commands::DateStyle;
use settings::CliSettings;

#[derive(Parser, Debug)]
#[command(name = "cardkit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    log_format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a user through the user-map pipeline
    Lookup {
        /// Username, id or institutional email
        query: String,

        /// Entity key the identity is written to
        #[arg(long)]
        entity: Option<String>,
    },

    /// Check whether a set of roles may view a page
    Access {
        /// Page name
        page: String,

        /// Comma-separated roles (defaults to CARDKIT_ROLES)
        #[arg(long)]
        roles: Option<String>,
    },

    /// GET a pipeline endpoint by configuration key or path
    Get {
        /// Endpoint key (e.g. PIPELINE_GET_TERMS) or a path starting with '/'
        endpoint: String,

        /// Query parameter, repeatable
        #[arg(short, long = "param", value_parser = commands::parse_param)]
        params: Vec<(String, String)>,

        /// Refresh interval in seconds
        #[arg(long)]
        interval: Option<u64>,

        /// Number of refreshes to print when polling
        #[arg(long, default_value_t = 1)]
        polls: u32,
    },

    /// Format a date with one of the display styles
    Date {
        input: String,

        #[arg(long, value_enum, default_value_t)]
        style: DateStyle,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.log_format {
        Format::Json => LogFormat::Json,
        Format::Pretty => LogFormat::Pretty,
    };
    cardkit_observability::tracing::init_with(
        &LogConfig::default().with_level(cli.log_level).with_format(format),
    );

    match cli.command {
        Commands::Lookup { query, entity } => {
            let settings = CliSettings::from_env()?;
            commands::lookup(&settings, &query, entity).await
        }
        Commands::Access { page, roles } => {
            let settings = CliSettings::from_env()?;
            commands::access(&settings, &page, roles).await
        }
        Commands::Get {
            endpoint,
            params,
            interval,
            polls,
        } => {
            let settings = CliSettings::from_env()?;
            commands::get(
                &settings,
                &endpoint,
                params,
                interval.map(Duration::from_secs),
                polls,
            )
            .await
        }
        Commands::Date { input, style } => {
            println!("{}", commands::format_date(&input, style)?);
            Ok(())
        }
    }
}
