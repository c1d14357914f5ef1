//! National and state fee envelopes.
//!
//! The national office fixes a `(min, default, max)` envelope per registration type and each
//! state council may publish its own envelope inside it. Validation never fails fast: every
//! violated check is collected so an admin screen can list all fixes at once.

use serde::{Deserialize, Serialize};

use super::domain::{CouncilId, RegistrationType, Scope};

/// Allowed fee range together with the fee charged when nothing else applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEnvelope {
    pub min_amount: u64,
    pub default_amount: u64,
    pub max_amount: u64,
}

impl FeeEnvelope {
    pub fn new(min_amount: u64, default_amount: u64, max_amount: u64) -> Self {
        Self {
            min_amount,
            default_amount,
            max_amount,
        }
    }

    /// Pull a proposal inside `national`, keeping `min <= default <= max`.
    pub fn clamp_within(&self, national: &FeeEnvelope) -> FeeEnvelope {
        let floor = national.min_amount.min(national.max_amount);
        let ceiling = national.max_amount.max(floor);
        let default_amount = self.default_amount.clamp(floor, ceiling);
        FeeEnvelope {
            min_amount: self.min_amount.clamp(floor, default_amount),
            default_amount,
            max_amount: self.max_amount.clamp(default_amount, ceiling),
        }
    }
}

/// Fee bounds set by the national office for one registration type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalFeeConfig {
    pub registration_type: RegistrationType,
    #[serde(flatten)]
    pub envelope: FeeEnvelope,
    pub gst_applicable: bool,
    pub gst_percentage: f64,
}

/// Override published by a state council inside the national envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFeeConfig {
    pub council_id: CouncilId,
    pub registration_type: RegistrationType,
    #[serde(flatten)]
    pub envelope: FeeEnvelope,
}

impl StateFeeConfig {
    pub fn scope(&self) -> Scope {
        Scope {
            council_id: self.council_id.clone(),
            registration_type: self.registration_type,
        }
    }
}

/// Individual bounds check that failed.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundsViolation {
    #[error("default fee {default} must lie within the national range {min}..={max}")]
    DefaultOutsideNationalRange { default: u64, min: u64, max: u64 },
    #[error("state min below national minimum ({min} < {national_min})")]
    MinBelowNationalMinimum { min: u64, national_min: u64 },
    #[error("state min {min} must be less than or equal to default {default}")]
    MinAboveDefault { min: u64, default: u64 },
    #[error("state max above national maximum ({max} > {national_max})")]
    MaxAboveNationalMaximum { max: u64, national_max: u64 },
    #[error("state max {max} must be greater than or equal to default {default}")]
    MaxBelowDefault { max: u64, default: u64 },
    #[error("national min {min} must be strictly below default {default}")]
    NationalMinNotBelowDefault { min: u64, default: u64 },
    #[error("national default {default} must be strictly below max {max}")]
    NationalDefaultNotBelowMax { default: u64, max: u64 },
    #[error("GST percentage {percent} must be between 0 and 100")]
    GstPercentOutOfRange { percent: f64 },
}

/// Outcome of a bounds check: `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<BoundsViolation>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<BoundsViolation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Check a proposed state envelope against the national one.
pub fn validate_state_bounds(national: &FeeEnvelope, proposed: &FeeEnvelope) -> ValidationResult {
    let mut errors = Vec::new();

    if proposed.default_amount < national.min_amount
        || proposed.default_amount > national.max_amount
    {
        errors.push(BoundsViolation::DefaultOutsideNationalRange {
            default: proposed.default_amount,
            min: national.min_amount,
            max: national.max_amount,
        });
    }

    if proposed.min_amount < national.min_amount {
        errors.push(BoundsViolation::MinBelowNationalMinimum {
            min: proposed.min_amount,
            national_min: national.min_amount,
        });
    }

    if proposed.min_amount > proposed.default_amount {
        errors.push(BoundsViolation::MinAboveDefault {
            min: proposed.min_amount,
            default: proposed.default_amount,
        });
    }

    if proposed.max_amount > national.max_amount {
        errors.push(BoundsViolation::MaxAboveNationalMaximum {
            max: proposed.max_amount,
            national_max: national.max_amount,
        });
    }

    if proposed.max_amount < proposed.default_amount {
        errors.push(BoundsViolation::MaxBelowDefault {
            max: proposed.max_amount,
            default: proposed.default_amount,
        });
    }

    ValidationResult::from_errors(errors)
}

/// Check the national record's own ordering and GST rate.
pub fn validate_national_envelope(config: &NationalFeeConfig) -> ValidationResult {
    let envelope = &config.envelope;
    let mut errors = Vec::new();

    if envelope.min_amount >= envelope.default_amount {
        errors.push(BoundsViolation::NationalMinNotBelowDefault {
            min: envelope.min_amount,
            default: envelope.default_amount,
        });
    }

    if envelope.default_amount >= envelope.max_amount {
        errors.push(BoundsViolation::NationalDefaultNotBelowMax {
            default: envelope.default_amount,
            max: envelope.max_amount,
        });
    }

    if !(0.0..=100.0).contains(&config.gst_percentage) {
        errors.push(BoundsViolation::GstPercentOutOfRange {
            percent: config.gst_percentage,
        });
    }

    ValidationResult::from_errors(errors)
}

/// Base fee charged for a scope: the state default when a valid override exists.
pub fn effective_base_fee(national: &FeeEnvelope, state: Option<&FeeEnvelope>) -> u64 {
    match state {
        Some(envelope) if validate_state_bounds(national, envelope).valid => {
            envelope.default_amount
        }
        _ => national.default_amount,
    }
}
