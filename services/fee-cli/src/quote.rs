use crate::infra::{catalog_path, load_catalog, parse_date, parse_registration_type, pricing_date};
use chrono::NaiveDate;
use clap::Args;
use registration_fees::config::AppConfig;
use registration_fees::error::AppError;
use registration_fees::relaxation::{
    validate_national_envelope, validate_state_bounds, BaseFeeSource, CriterionId,
    FeeQuoteService, QuoteRequest, RegistrationType, Scope, ScopedQuote, ValidationResult,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Catalog snapshot (JSON). Defaults to FEES_CATALOG.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Council the applicant registers with
    #[arg(long)]
    pub(crate) council: String,
    /// Registration type (REGULAR, PROVISIONAL, TEMPORARY, INTERIM)
    #[arg(long, value_parser = parse_registration_type)]
    pub(crate) registration_type: RegistrationType,
    /// Comma-separated criterion ids held by the applicant
    #[arg(long, value_delimiter = ',')]
    pub(crate) criteria: Vec<String>,
    /// Pricing date (YYYY-MM-DD). Defaults to FEES_PRICING_DATE, then today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Print the quote as JSON instead of a calculation trail
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BoundsArgs {
    /// Catalog snapshot (JSON). Defaults to FEES_CATALOG.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Council whose override should be checked
    #[arg(long)]
    pub(crate) council: String,
    /// Registration type (REGULAR, PROVISIONAL, TEMPORARY, INTERIM)
    #[arg(long, value_parser = parse_registration_type)]
    pub(crate) registration_type: RegistrationType,
}

pub(crate) fn run_quote(args: QuoteArgs, config: &AppConfig) -> Result<(), AppError> {
    let QuoteArgs {
        catalog,
        council,
        registration_type,
        criteria,
        date,
        json,
    } = args;

    let catalog = load_catalog(&catalog_path(catalog, config)?)?;
    let service = FeeQuoteService::new(Arc::new(catalog));
    let request = QuoteRequest {
        scope: Scope::new(council, registration_type),
        held_criteria: held_criteria(&criteria),
        on: pricing_date(date, config),
    };

    let scoped = service.quote(&request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&scoped)?);
    } else {
        render_quote(&scoped, request.on);
    }

    Ok(())
}

pub(crate) fn run_bounds(args: BoundsArgs, config: &AppConfig) -> Result<(), AppError> {
    let BoundsArgs {
        catalog,
        council,
        registration_type,
    } = args;

    let catalog = load_catalog(&catalog_path(catalog, config)?)?;
    let scope = Scope::new(council, registration_type);
    let national = catalog.national_config(registration_type).ok_or_else(|| {
        AppError::Input(format!(
            "catalog has no national fee configuration for {registration_type}"
        ))
    })?;

    let envelope = &national.envelope;
    println!(
        "National {} envelope: min {} | default {} | max {}",
        registration_type.label(),
        envelope.min_amount,
        envelope.default_amount,
        envelope.max_amount
    );
    render_validation("National configuration", &validate_national_envelope(national));

    match catalog.state_config(&scope) {
        Some(state) => {
            let proposed = &state.envelope;
            println!(
                "\n{scope} override: min {} | default {} | max {}",
                proposed.min_amount, proposed.default_amount, proposed.max_amount
            );
            render_validation("State override", &validate_state_bounds(envelope, proposed));
        }
        None => println!(
            "\n{scope} has no override; the national default of {} applies",
            envelope.default_amount
        ),
    }

    Ok(())
}

fn held_criteria(raw: &[String]) -> BTreeSet<CriterionId> {
    raw.iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(CriterionId::new)
        .collect()
}

fn render_quote(scoped: &ScopedQuote, on: NaiveDate) {
    let source = match scoped.base_fee_source {
        BaseFeeSource::National => "national default",
        BaseFeeSource::State => "state override",
    };
    println!("Fee quote for {} on {on} ({source})", scoped.scope);
    for line in scoped.quote.details() {
        println!("  {line}");
    }

    if !scoped.ignored_state_override.is_empty() {
        println!("State override ignored:");
        for violation in &scoped.ignored_state_override {
            println!("  - {violation}");
        }
    }
    if !scoped.unknown_criteria.is_empty() {
        let unknown: Vec<String> = scoped
            .unknown_criteria
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Unknown criteria (no relaxation): {}", unknown.join(", "));
    }
    if !scoped.quote.conflicting_rule_ids.is_empty() {
        let conflicting: Vec<String> = scoped
            .quote
            .conflicting_rule_ids
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            "Also matching (skipped) combination rules: {}",
            conflicting.join(", ")
        );
    }
}

fn render_validation(label: &str, result: &ValidationResult) {
    if result.valid {
        println!("{label}: valid");
        return;
    }
    println!("{label}: invalid");
    for message in result.messages() {
        println!("  - {message}");
    }
}
