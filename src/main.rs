use clap::{Parser, Subcommand};
use placefinder::config::Settings;
use placefinder::location::{LocationResolver, NominatimProvider, DEFAULT_LIMIT};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Placefinder: resolve free-text place queries and detect ambiguity.
///
/// Examples:
///   placefinder resolve "Brooklyn, NY"
///   placefinder resolve                 (configured default location)
///   placefinder disambiguate Springfield --limit 8
///   placefinder serve --bind 0.0.0.0:8000
#[derive(Parser)]
#[command(name = "placefinder", version, about, long_about = None)]
struct Cli {
    /// Read settings from this env file (process variables still win).
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a query to its single best match.
    Resolve {
        /// Place query. Omit to get the configured default location.
        query: Option<String>,
    },
    /// List every distinct place a query may denote.
    Disambiguate {
        query: String,

        /// Maximum number of candidates.
        #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Run the HTTP API.
    Serve {
        /// Listen address, overrides PLACEFINDER_BIND_ADDR.
        #[arg(long)]
        bind: Option<std::net::SocketAddr>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.env_file {
        Some(path) => Settings::load_with_env_file(path),
        None => Settings::load(),
    };
    let mut settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings.log_level);

    match run(cli.command, &mut settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_resolver(settings: &Settings) -> Result<LocationResolver<NominatimProvider>, Box<dyn std::error::Error>> {
    let provider = NominatimProvider::from_settings(settings)?;
    Ok(LocationResolver::new(provider, settings.default_location.clone()))
}

async fn run(command: Command, settings: &mut Settings) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Serve { bind } => {
            if let Some(addr) = bind {
                settings.bind_addr = addr;
            }
            placefinder::server::start(settings).await?;
        }
        Command::Resolve { query } => {
            let resolver = build_resolver(settings)?;
            let candidate = resolver.resolve(query.as_deref()).await?;
            eprintln!(
                "  {} ({:.4}, {:.4}) [{}]",
                candidate.short_name, candidate.latitude, candidate.longitude, candidate.confidence
            );
            println!("{}", serde_json::to_string_pretty(&candidate)?);
        }
        Command::Disambiguate { query, limit } => {
            let resolver = build_resolver(settings)?;
            let result = resolver.disambiguate(&query, limit).await?;
            if result.candidates.is_empty() {
                eprintln!("  No matches for '{}'", query);
            } else if result.is_ambiguous {
                eprintln!("  '{}' is ambiguous, {} matches:", query, result.candidates.len());
            }
            for (i, c) in result.candidates.iter().enumerate() {
                eprintln!(
                    "    {}. {} ({:.4}, {:.4}) [{}, {}]",
                    i + 1,
                    c.short_name,
                    c.latitude,
                    c.longitude,
                    c.confidence,
                    c.location_type
                );
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
