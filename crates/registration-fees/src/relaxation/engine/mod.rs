//! Fee quote calculation.
//!
//! [`calculate_fee`] is a pure function over caller-supplied snapshots: the same request always
//! yields the same quote, so previews can recompute on every toggle without coordination.

mod rules;
mod tax;
mod validation;

pub use tax::round_half_up;
pub use validation::{InputViolation, MAX_BASE_FEE};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{CombinationRule, CriterionId, RelaxationPolicy, RuleId};
use rules::{discount_from_policies, match_combination_rule, DiscountSource};

/// GST settings copied from the national configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GstTerms {
    pub applicable: bool,
    pub percent: f64,
}

impl GstTerms {
    pub fn exempt() -> Self {
        Self {
            applicable: false,
            percent: 0.0,
        }
    }
}

/// Everything a single quote depends on. Policies and rules must already be scoped to one
/// council and registration type.
#[derive(Debug, Clone, Copy)]
pub struct FeeRequest<'a> {
    pub base_fee: u64,
    pub held_criteria: &'a BTreeSet<CriterionId>,
    pub policies: &'a [RelaxationPolicy],
    pub combination_rules: &'a [CombinationRule],
    pub gst: GstTerms,
}

/// Per-criterion relaxation line shown alongside the quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyContribution {
    pub criterion_id: CriterionId,
    pub percent: f64,
    pub amount: u64,
    pub min_final_amount: u64,
}

/// Fully itemized fee quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeQuote {
    pub base_fee: u64,
    pub total_discount_percent: f64,
    pub discount_amount: u64,
    pub fee_after_discount: u64,
    pub cgst: u64,
    pub sgst: u64,
    pub total_tax: u64,
    pub total_payable: u64,
    pub applied_rule: Option<CombinationRule>,
    /// Minimum final amount configured on the matched rule or contributing policies when it is
    /// above `fee_after_discount`. Reported only; the subtotal is never raised to it.
    pub applied_floor: Option<u64>,
    pub contributions: Vec<PolicyContribution>,
    /// Further rules matching the same criteria set, skipped in favour of `applied_rule`.
    pub conflicting_rule_ids: Vec<RuleId>,
}

impl FeeQuote {
    /// Human-readable calculation trail.
    pub fn details(&self) -> Vec<String> {
        let mut lines = vec![format!("Base fee: {}", self.base_fee)];

        for contribution in &self.contributions {
            let line = match &self.applied_rule {
                Some(_) => format!(
                    "Relaxation {} ({}%): {} not applied",
                    contribution.criterion_id, contribution.percent, contribution.amount
                ),
                None => format!(
                    "Relaxation {} ({}%): -{}",
                    contribution.criterion_id, contribution.percent, contribution.amount
                ),
            };
            lines.push(line);
        }

        match &self.applied_rule {
            Some(rule) => lines.push(format!(
                "Combination rule {} applied: {}% instead of summing individual percentages",
                rule.id, self.total_discount_percent
            )),
            None if self.contributions.len() > 1 => lines.push(format!(
                "Using SUM method ({}%); no combination rule exists for this set",
                self.total_discount_percent
            )),
            None => {}
        }

        lines.push(format!(
            "Discount {}%: -{}",
            self.total_discount_percent, self.discount_amount
        ));
        lines.push(format!("Subtotal: {}", self.fee_after_discount));
        if let Some(floor) = self.applied_floor {
            lines.push(format!("Configured minimum final amount {floor} not enforced"));
        }
        if self.total_tax > 0 {
            lines.push(format!("CGST: {}", self.cgst));
            lines.push(format!("SGST: {}", self.sgst));
        }
        lines.push(format!("Total payable: {}", self.total_payable));
        lines
    }
}

/// Rejections raised before or during calculation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error("invalid quote input: {}", validation::summarize(.0))]
    InvalidInput(Vec<InputViolation>),
    #[error("combined discount of {percent}% exceeds the base fee")]
    DiscountExceedsFee { percent: f64 },
}

/// Compute the discount, tax split, and payable total for one applicant.
pub fn calculate_fee(request: &FeeRequest<'_>) -> Result<FeeQuote, QuoteError> {
    let violations = validation::check_request(request);
    if !violations.is_empty() {
        return Err(QuoteError::InvalidInput(violations));
    }

    let contributions = discount_from_policies(request);
    let matched = match_combination_rule(request.held_criteria, request.combination_rules);

    let source = match &matched {
        Some(found) => DiscountSource::Rule(found.rule),
        None => DiscountSource::Policies(&contributions),
    };

    let total_discount_percent = source.percent();
    if total_discount_percent > 100.0 {
        return Err(QuoteError::DiscountExceedsFee {
            percent: total_discount_percent,
        });
    }

    // Float rounding near the ceiling can overshoot by a unit.
    let discount_amount =
        tax::percent_of(request.base_fee, total_discount_percent).min(request.base_fee);
    let fee_after_discount = request.base_fee - discount_amount;

    let (cgst, sgst) = tax::gst_split(fee_after_discount, &request.gst);
    let total_tax = cgst + sgst;

    let applied_floor = source
        .floor()
        .filter(|floor| *floor > fee_after_discount);

    Ok(FeeQuote {
        base_fee: request.base_fee,
        total_discount_percent,
        discount_amount,
        fee_after_discount,
        cgst,
        sgst,
        total_tax,
        total_payable: fee_after_discount + total_tax,
        applied_floor,
        applied_rule: matched.as_ref().map(|found| found.rule.clone()),
        conflicting_rule_ids: matched
            .map(|found| found.conflicting)
            .unwrap_or_default(),
        contributions,
    })
}
