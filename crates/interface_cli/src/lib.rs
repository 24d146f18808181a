//! Command-line front end
//!
//! Reads a JSON scenario (reference data plus a request), runs it through
//! an in-memory quote engine and prints the result as JSON.
//!
//! # Example
//!
//! ```bash
//! quote-engine quote scenario.json
//! quote-engine validate-promo scenario.json BIG1000 1050 RUB
//! QUOTE_STRICT_PROMO_CODES=true quote-engine quote scenario.json
//! ```

pub mod command;
pub mod error;
pub mod logging;
pub mod runner;
pub mod scenario;

pub use command::{Cli, Command};
pub use error::{CliError, ErrorResponse};
pub use logging::init_tracing;
pub use runner::{build_service, run, run_quote};
pub use scenario::Scenario;
