use std::collections::BTreeSet;

use super::super::domain::{CombinationRule, CriterionId, RuleId};
use super::tax::percent_of;
use super::{FeeRequest, PolicyContribution};

pub(crate) struct MatchedRule<'a> {
    pub rule: &'a CombinationRule,
    pub conflicting: Vec<RuleId>,
}

/// Where the effective discount percentage comes from.
pub(crate) enum DiscountSource<'a> {
    Rule(&'a CombinationRule),
    Policies(&'a [PolicyContribution]),
}

impl DiscountSource<'_> {
    pub fn percent(&self) -> f64 {
        match self {
            DiscountSource::Rule(rule) => rule.combined_percent,
            DiscountSource::Policies(contributions) => contributions
                .iter()
                .map(|contribution| contribution.percent)
                .sum(),
        }
    }

    pub fn floor(&self) -> Option<u64> {
        match self {
            DiscountSource::Rule(rule) => Some(rule.min_final_amount),
            DiscountSource::Policies(contributions) => contributions
                .iter()
                .map(|contribution| contribution.min_final_amount)
                .max(),
        }
    }
}

/// First rule in catalog order whose criteria set equals `held`; later matches are returned
/// as conflicts rather than failing the quote.
pub(crate) fn match_combination_rule<'a>(
    held: &BTreeSet<CriterionId>,
    rules: &'a [CombinationRule],
) -> Option<MatchedRule<'a>> {
    if held.len() < 2 {
        return None;
    }

    let mut matches = rules.iter().filter(|rule| rule.matches_exactly(held));
    let rule = matches.next()?;
    let conflicting = matches.map(|other| other.id.clone()).collect();

    Some(MatchedRule { rule, conflicting })
}

/// One line per held criterion that has an enabled policy. Criteria without one are skipped.
pub(crate) fn discount_from_policies(request: &FeeRequest<'_>) -> Vec<PolicyContribution> {
    request
        .held_criteria
        .iter()
        .filter_map(|criterion_id| {
            request
                .policies
                .iter()
                .find(|policy| policy.is_enabled && &policy.criterion_id == criterion_id)
        })
        .map(|policy| PolicyContribution {
            criterion_id: policy.criterion_id.clone(),
            percent: policy.relaxation_percent,
            amount: percent_of(request.base_fee, policy.relaxation_percent),
            min_final_amount: policy.min_final_amount,
        })
        .collect()
}
