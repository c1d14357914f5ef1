use std::env;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

/// Distinguishes runtime behavior for different stages of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the fee tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub catalog: CatalogConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("FEES_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let path = env::var("FEES_CATALOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let pricing_date = match env::var("FEES_PRICING_DATE") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|source| ConfigError::InvalidPricingDate { value: raw, source })?,
            ),
            _ => None,
        };

        let log_level = env::var("FEES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("FEES_LOG_FORMAT")
            .ok()
            .and_then(|raw| LogFormat::parse(&raw))
            .unwrap_or_else(|| LogFormat::for_environment(environment));

        Ok(Self {
            environment,
            catalog: CatalogConfig { path, pricing_date },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
        })
    }
}

/// Where the fee catalog snapshot lives and which date quotes are priced on.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
    /// Fixed pricing date; `None` prices on the current local date.
    pub pricing_date: Option<NaiveDate>,
}

impl CatalogConfig {
    pub fn require_path(&self) -> Result<&PathBuf, ConfigError> {
        self.path.as_ref().ok_or(ConfigError::MissingCatalogPath)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Line layout for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Level and message only.
    Compact,
    /// Adds targets and thread names for collected production logs.
    Full,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    fn for_environment(environment: AppEnvironment) -> Self {
        match environment {
            AppEnvironment::Production => Self::Full,
            AppEnvironment::Development | AppEnvironment::Test => Self::Compact,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingCatalogPath,
    InvalidPricingDate {
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCatalogPath => {
                write!(f, "no fee catalog given; pass --catalog or set FEES_CATALOG")
            }
            ConfigError::InvalidPricingDate { value, .. } => {
                write!(f, "FEES_PRICING_DATE '{}' must be formatted as YYYY-MM-DD", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::MissingCatalogPath => None,
            ConfigError::InvalidPricingDate { source, .. } => Some(source),
        }
    }
}
