use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationMethod, CombinationRule, ConfigStatus, CriterionId, RelaxationPolicy, RuleId,
    Scope,
};
use super::engine::round_half_up;

/// Validation errors raised while accepting a combination rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleDraftViolation {
    #[error("a combination rule needs at least two distinct criteria (found {found})")]
    TooFewCriteria { found: usize },
    #[error("combined percentage {percent} must be between 0 and 100")]
    PercentOutOfRange { percent: f64 },
    #[error("a combination rule for this criteria set already exists in {scope}")]
    DuplicateCriteriaSet { scope: Scope },
}

/// Admin input for creating or editing a combination rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRuleDraft {
    pub id: RuleId,
    pub scope: Scope,
    pub criteria_ids: Vec<CriterionId>,
    pub application_method: ApplicationMethod,
    /// Ignored for [`ApplicationMethod::Sum`]; the sum of enabled policies is stored instead.
    pub combined_percent: f64,
    pub min_final_amount: u64,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

/// True when another rule in `scope` already targets exactly `candidate`. Pass the rule's own
/// id as `editing` during an update so it does not conflict with itself.
pub fn has_conflict(
    existing: &[CombinationRule],
    scope: &Scope,
    candidate: &BTreeSet<CriterionId>,
    editing: Option<&RuleId>,
) -> bool {
    existing.iter().any(|rule| {
        &rule.scope == scope
            && rule.status != ConfigStatus::Expired
            && editing.map(|id| &rule.id != id).unwrap_or(true)
            && rule.matches_exactly(candidate)
    })
}

/// Sum of enabled policy percentages for `criteria`; unknown or disabled criteria add nothing.
pub fn sum_of_enabled<'a>(
    policies: &[RelaxationPolicy],
    criteria: impl IntoIterator<Item = &'a CriterionId>,
) -> f64 {
    criteria
        .into_iter()
        .filter_map(|criterion_id| {
            policies
                .iter()
                .find(|policy| policy.is_enabled && &policy.criterion_id == criterion_id)
        })
        .map(|policy| policy.relaxation_percent)
        .sum()
}

/// For `Sum` rules the stored percentage must still equal the live policy sum. `Custom` rules
/// are always consistent.
pub fn is_sum_consistent(rule: &CombinationRule, policies: &[RelaxationPolicy]) -> bool {
    match rule.application_method {
        ApplicationMethod::Custom => true,
        ApplicationMethod::Sum => {
            let expected = sum_of_enabled(policies, rule.criteria_set());
            (expected - rule.combined_percent).abs() < 1e-9
        }
    }
}

/// Whether a preview selection could become a new rule.
pub fn can_suggest_rule(held: &BTreeSet<CriterionId>, existing: &[CombinationRule]) -> bool {
    held.len() >= 2 && !existing.iter().any(|rule| rule.matches_exactly(held))
}

/// Validate a draft and produce the rule to persist.
pub fn validate_rule_draft(
    draft: CombinationRuleDraft,
    existing: &[CombinationRule],
    policies: &[RelaxationPolicy],
) -> Result<CombinationRule, Vec<RuleDraftViolation>> {
    let mut violations = Vec::new();
    let criteria: BTreeSet<CriterionId> = draft.criteria_ids.iter().cloned().collect();

    if criteria.len() < 2 {
        violations.push(RuleDraftViolation::TooFewCriteria {
            found: criteria.len(),
        });
    }

    let combined_percent = match draft.application_method {
        ApplicationMethod::Sum => sum_of_enabled(policies, &criteria),
        ApplicationMethod::Custom => draft.combined_percent,
    };
    if !(0.0..=100.0).contains(&combined_percent) {
        violations.push(RuleDraftViolation::PercentOutOfRange {
            percent: combined_percent,
        });
    }

    if criteria.len() >= 2 && has_conflict(existing, &draft.scope, &criteria, Some(&draft.id)) {
        violations.push(RuleDraftViolation::DuplicateCriteriaSet {
            scope: draft.scope.clone(),
        });
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(CombinationRule {
        id: draft.id,
        scope: draft.scope,
        criteria_ids: criteria.into_iter().collect(),
        application_method: draft.application_method,
        combined_percent,
        min_final_amount: draft.min_final_amount,
        effective_from: draft.effective_from,
        effective_to: draft.effective_to,
        status: ConfigStatus::Active,
    })
}

/// Side-by-side effect of a rule compared to summing its criteria's policies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleComparison {
    pub sum_percent: f64,
    pub combined_percent: f64,
    pub amount_without_rule: u64,
    pub amount_with_rule: u64,
    /// Positive when the rule charges more than the plain sum would.
    pub difference: i64,
}

pub fn compare_with_sum(
    rule: &CombinationRule,
    policies: &[RelaxationPolicy],
    base_fee: u64,
) -> RuleComparison {
    let sum_percent = sum_of_enabled(policies, rule.criteria_set());
    let after = |percent: f64| -> u64 {
        let discount = round_half_up(base_fee as f64 * percent / 100.0);
        base_fee.saturating_sub(discount)
    };
    let amount_without_rule = after(sum_percent);
    let amount_with_rule = after(rule.combined_percent);

    RuleComparison {
        sum_percent,
        combined_percent: rule.combined_percent,
        amount_without_rule,
        amount_with_rule,
        difference: amount_with_rule as i64 - amount_without_rule as i64,
    }
}
