//! Command-line parsing

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::ffi::OsString;
use std::path::PathBuf;

use core_kernel::Currency;

use crate::error::CliError;

/// A full invocation
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "quote-engine", version)]
#[command(about = "Window and door price quotes from JSON scenarios", long_about = None)]
pub struct Cli {
    /// Explicit configuration file, overriding `quote-engine.toml`
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// A parsed sub-command
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Price the request in the scenario and print the quote
    Quote {
        /// Scenario file with reference data and a request
        scenario: PathBuf,
    },
    /// Check a promo code against a subtotal
    ValidatePromo {
        /// Scenario file with the promo code catalogue
        scenario: PathBuf,
        code: String,
        subtotal: Decimal,
        /// ISO 4217 code, case-insensitive
        currency: Currency,
    },
}

impl Cli {
    /// Parses a full argument list, program name first
    ///
    /// Help and version requests come back as errors too; the binary
    /// lets clap print those itself.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Like [`Cli::try_parse_args`], with rejections mapped to usage errors
    pub fn parse_args<I, T>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_args(args).map_err(CliError::from)
    }
}
