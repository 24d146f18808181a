//! Quote Engine - command-line binary
//!
//! # Usage
//!
//! ```bash
//! # Price a scenario
//! cargo run --bin quote-engine -- quote scenario.json
//!
//! # Check a promo code
//! cargo run --bin quote-engine -- validate-promo scenario.json BIG1000 1050 RUB
//!
//! # Explicit configuration file
//! cargo run --bin quote-engine -- --config engine.toml quote scenario.json
//!
//! # Generated help
//! cargo run --bin quote-engine -- --help
//! ```
//!
//! # Environment Variables
//!
//! * `QUOTE_QUOTE_TTL_MINUTES` - Quote lifetime in minutes (default: 30)
//! * `QUOTE_STRICT_PROMO_CODES` - Fail on rejected promo codes (default: false)
//! * `QUOTE_ROUNDING__DEFAULT_SCALE` - Decimal places of totals (default: 2)
//! * `QUOTE_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! * `QUOTE_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use interface_cli::{init_tracing, run, Cli, CliError};
use app_quote::EngineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => fail(&CliError::from(e)),
    };

    let config = match EngineConfig::load(cli.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&CliError::from(e)),
    };

    init_tracing(&config)?;

    tracing::debug!(
        ttl_minutes = config.quote_ttl_minutes,
        strict_promo_codes = config.strict_promo_codes,
        "configuration loaded"
    );

    match run(&cli.command, &config).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            fail(&e)
        }
    }
}

/// Prints the error as JSON on stderr and exits
fn fail(err: &CliError) -> ! {
    let body = serde_json::to_string_pretty(&err.to_response())
        .unwrap_or_else(|_| format!("{{\"error\":\"internal\",\"message\":{:?}}}", err.to_string()));
    eprintln!("{}", body);
    std::process::exit(err.exit_code())
}
