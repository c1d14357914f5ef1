use super::common::*;
use crate::relaxation::domain::{ApplicationMethod, ConfigStatus, RegistrationType, RuleId, Scope};
use crate::relaxation::guard::{
    can_suggest_rule, compare_with_sum, has_conflict, is_sum_consistent, validate_rule_draft,
    CombinationRuleDraft, RuleDraftViolation,
};

fn draft(criteria: &[&str], method: ApplicationMethod, percent: f64) -> CombinationRuleDraft {
    CombinationRuleDraft {
        id: RuleId("rule-new".to_string()),
        scope: scope(),
        criteria_ids: criteria.iter().map(|raw| id(raw)).collect(),
        application_method: method,
        combined_percent: percent,
        min_final_amount: 0,
        effective_from: date(2025, 4, 1),
        effective_to: None,
    }
}

#[test]
fn conflict_detected_for_identical_set_in_same_scope() {
    let existing = vec![rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Custom, 22.0)];

    assert!(has_conflict(&existing, &scope(), &held(&["SC", "FEMALE"]), None));
    assert!(!has_conflict(&existing, &scope(), &held(&["FEMALE", "SC", "PWD"]), None));
    assert!(!has_conflict(&existing, &scope(), &held(&["FEMALE"]), None));
}

#[test]
fn conflict_is_scoped_to_council_and_registration_type() {
    let existing = vec![rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Custom, 22.0)];
    let other_council = Scope::new("council-ka", RegistrationType::Regular);
    let other_type = Scope::new("council-mh", RegistrationType::Interim);

    assert!(!has_conflict(&existing, &other_council, &held(&["FEMALE", "SC"]), None));
    assert!(!has_conflict(&existing, &other_type, &held(&["FEMALE", "SC"]), None));
}

#[test]
fn rule_being_edited_does_not_conflict_with_itself() {
    let existing = vec![rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Custom, 22.0)];
    let editing = RuleId("rule-1".to_string());

    assert!(!has_conflict(
        &existing,
        &scope(),
        &held(&["FEMALE", "SC"]),
        Some(&editing)
    ));
}

#[test]
fn expired_rules_do_not_block_new_ones() {
    let mut expired = rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Custom, 22.0);
    expired.status = ConfigStatus::Expired;

    assert!(!has_conflict(&[expired], &scope(), &held(&["FEMALE", "SC"]), None));
}

#[test]
fn sum_draft_stores_the_policy_sum() {
    let rule = validate_rule_draft(
        draft(&["FEMALE", "PWD"], ApplicationMethod::Sum, 99.0),
        &[],
        &policies(),
    )
    .expect("valid draft");

    assert_eq!(rule.combined_percent, 30.0);
    assert_eq!(rule.status, ConfigStatus::Active);
    assert!(is_sum_consistent(&rule, &policies()));
}

#[test]
fn sum_rule_goes_stale_when_a_policy_changes() {
    let summed = rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Sum, 25.0);
    assert!(is_sum_consistent(&summed, &policies()));

    let mut changed = policies();
    changed[1].relaxation_percent = 18.0;
    assert!(!is_sum_consistent(&summed, &changed));

    let custom = rule("rule-2", &["FEMALE", "SC"], ApplicationMethod::Custom, 5.0);
    assert!(is_sum_consistent(&custom, &changed));
}

#[test]
fn draft_violations_are_collected() {
    let existing = vec![rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Custom, 22.0)];

    let violations = validate_rule_draft(
        draft(&["FEMALE", "SC"], ApplicationMethod::Custom, 120.0),
        &existing,
        &policies(),
    )
    .expect_err("duplicate and out of range");

    assert_eq!(
        violations,
        vec![
            RuleDraftViolation::PercentOutOfRange { percent: 120.0 },
            RuleDraftViolation::DuplicateCriteriaSet { scope: scope() },
        ]
    );
}

#[test]
fn draft_requires_two_distinct_criteria() {
    let violations = validate_rule_draft(
        draft(&["FEMALE", "FEMALE"], ApplicationMethod::Custom, 12.0),
        &[],
        &policies(),
    )
    .expect_err("single criterion");

    assert_eq!(violations, vec![RuleDraftViolation::TooFewCriteria { found: 1 }]);
}

#[test]
fn suggestions_need_an_uncovered_multi_criteria_set() {
    let existing = vec![rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Custom, 22.0)];

    assert!(!can_suggest_rule(&held(&["FEMALE"]), &existing));
    assert!(!can_suggest_rule(&held(&["FEMALE", "SC"]), &existing));
    assert!(can_suggest_rule(&held(&["FEMALE", "PWD"]), &existing));
}

#[test]
fn comparison_reports_extra_charge_of_custom_rule() {
    let custom = rule("rule-1", &["FEMALE", "SC"], ApplicationMethod::Custom, 22.0);

    let comparison = compare_with_sum(&custom, &policies(), BASE_FEE);

    assert_eq!(comparison.sum_percent, 25.0);
    assert_eq!(comparison.amount_without_rule, 3750);
    assert_eq!(comparison.amount_with_rule, 3900);
    assert_eq!(comparison.difference, 150);
}
