use chrono::{Local, NaiveDate};
use registration_fees::config::AppConfig;
use registration_fees::error::AppError;
use registration_fees::relaxation::{FeeCatalog, RegistrationType};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_registration_type(raw: &str) -> Result<RegistrationType, String> {
    RegistrationType::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = RegistrationType::ALL
            .iter()
            .map(RegistrationType::code)
            .collect();
        format!(
            "unknown registration type '{raw}' (expected one of {})",
            known.join(", ")
        )
    })
}

/// Explicit `--catalog` wins over `FEES_CATALOG`.
pub(crate) fn catalog_path(
    explicit: Option<PathBuf>,
    config: &AppConfig,
) -> Result<PathBuf, AppError> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(config.catalog.require_path()?.clone()),
    }
}

pub(crate) fn load_catalog(path: &Path) -> Result<FeeCatalog, AppError> {
    let file = File::open(path)?;
    let catalog = FeeCatalog::from_reader(BufReader::new(file))?;
    info!(
        path = %path.display(),
        criteria = catalog.criteria.len(),
        policies = catalog.policies.len(),
        rules = catalog.combination_rules.len(),
        "fee catalog loaded"
    );
    Ok(catalog)
}

/// `--date`, then `FEES_PRICING_DATE`, then today.
pub(crate) fn pricing_date(explicit: Option<NaiveDate>, config: &AppConfig) -> NaiveDate {
    explicit
        .or(config.catalog.pricing_date)
        .unwrap_or_else(|| Local::now().date_naive())
}
