use serde::Serialize;

use super::super::domain::{CriterionId, RuleId};
use super::FeeRequest;

/// Largest base fee quoted exactly; above this whole units no longer survive `f64` arithmetic.
pub const MAX_BASE_FEE: u64 = 1 << 53;

/// Input problem detected before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputViolation {
    #[error("base fee must be positive")]
    NonPositiveBaseFee,
    #[error("base fee {base_fee} exceeds the supported maximum of {max}")]
    BaseFeeTooLarge { base_fee: u64, max: u64 },
    #[error("GST percentage {percent} must be between 0 and 100")]
    GstPercentOutOfRange { percent: f64 },
    #[error("relaxation percentage {percent} for criterion {criterion_id} must be between 0 and 100")]
    PolicyPercentOutOfRange {
        criterion_id: CriterionId,
        percent: f64,
    },
    #[error("combined percentage {percent} for rule {rule_id} must be between 0 and 100")]
    RulePercentOutOfRange { rule_id: RuleId, percent: f64 },
}

fn is_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

pub(crate) fn check_request(request: &FeeRequest<'_>) -> Vec<InputViolation> {
    let mut violations = Vec::new();

    if request.base_fee == 0 {
        violations.push(InputViolation::NonPositiveBaseFee);
    } else if request.base_fee > MAX_BASE_FEE {
        violations.push(InputViolation::BaseFeeTooLarge {
            base_fee: request.base_fee,
            max: MAX_BASE_FEE,
        });
    }

    if !is_percentage(request.gst.percent) {
        violations.push(InputViolation::GstPercentOutOfRange {
            percent: request.gst.percent,
        });
    }

    for policy in request.policies {
        if !is_percentage(policy.relaxation_percent) {
            violations.push(InputViolation::PolicyPercentOutOfRange {
                criterion_id: policy.criterion_id.clone(),
                percent: policy.relaxation_percent,
            });
        }
    }

    for rule in request.combination_rules {
        if !is_percentage(rule.combined_percent) {
            violations.push(InputViolation::RulePercentOutOfRange {
                rule_id: rule.id.clone(),
                percent: rule.combined_percent,
            });
        }
    }

    violations
}

pub(crate) fn summarize(violations: &[InputViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
