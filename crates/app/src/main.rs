use std::fmt;
use std::time::Duration;

use gateway::HttpGatewayConfig;
use services::{AppServices, Clock};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{Config, ConfigError, parse_positive, parse_url};
use console::Console;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    Invalid(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  pmp-quiz [--api-url <url>] [--timeout <secs>] [--max-questions <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:8000/api");
    eprintln!("  --timeout 30");
    eprintln!("  --max-questions 100");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  API_URL, API_TIMEOUT, MAX_QUESTIONS, RUST_LOG");
}

/// Flags override whatever the environment provided.
fn apply_args(
    mut config: Config,
    args: &mut impl Iterator<Item = String>,
) -> Result<Option<Config>, ArgsError> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api-url" => {
                let value = require_value(args, "--api-url")?;
                config.api_url = parse_url("--api-url", &value).map_err(ArgsError::Invalid)?;
            }
            "--timeout" => {
                let value = require_value(args, "--timeout")?;
                let secs = parse_positive("--timeout", &value).map_err(ArgsError::Invalid)?;
                config.timeout = Duration::from_secs(secs);
            }
            "--max-questions" => {
                let value = require_value(args, "--max-questions")?;
                let max = parse_positive("--max-questions", &value).map_err(ArgsError::Invalid)?;
                config.max_questions = usize::try_from(max).unwrap_or(usize::MAX);
            }
            "--help" | "-h" => return Ok(None),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Some(config))
}

fn init_tracing(filter: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| ConfigError::InvalidValue("RUST_LOG", e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let mut argv = std::env::args().skip(1);
    let Some(config) = apply_args(config, &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    init_tracing(&config.log_filter)?;
    info!(api_url = %config.api_url, timeout = ?config.timeout, "configuration loaded");

    let services = AppServices::http(
        HttpGatewayConfig::new(config.api_url, config.timeout),
        Clock::default(),
        config.max_questions,
    )?;
    Console::new(services).run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
