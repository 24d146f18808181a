//! Command execution

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use app_quote::{EngineConfig, QuoteService, ReferenceData};
use domain_pricing::adapters::InMemoryReferenceData;
use domain_pricing::LoggingEventPublisher;
use infra_cache::InMemoryQuoteCache;

use crate::command::Command;
use crate::error::CliError;
use crate::scenario::Scenario;

/// Wires a quote service over the scenario's reference data
pub fn build_service(scenario: &Scenario, config: &EngineConfig) -> Result<QuoteService, CliError> {
    let clock = scenario.clock();
    let reference = Arc::new(InMemoryReferenceData::from_data_set(
        scenario.reference_data.clone(),
    ));

    Ok(QuoteService::new(
        ReferenceData::from_adapter(reference),
        Arc::new(InMemoryQuoteCache::new(clock.clone())),
        Arc::new(LoggingEventPublisher),
        clock,
        config,
    )?)
}

/// Runs a command and returns its JSON output
pub async fn run(command: &Command, config: &EngineConfig) -> Result<Value, CliError> {
    match command {
        Command::Quote { scenario } => {
            let scenario = Scenario::load(scenario)?;
            run_quote(&scenario, config).await
        }

        Command::ValidatePromo {
            scenario,
            code,
            subtotal,
            currency,
        } => {
            let scenario = Scenario::load(scenario)?;
            let service = build_service(&scenario, config)?;
            let validation = service.validate_promo_code(code, *subtotal, *currency).await?;
            Ok(serde_json::to_value(validation)?)
        }
    }
}

/// Prices the scenario's request
pub async fn run_quote(scenario: &Scenario, config: &EngineConfig) -> Result<Value, CliError> {
    let request = scenario.request()?;
    let service = build_service(scenario, config)?;
    let quote = service.calculate_quote(request).await?;

    info!(quote_id = %quote.quote_id(), total = %quote.total(), "quote ready");
    Ok(serde_json::to_value(quote)?)
}
