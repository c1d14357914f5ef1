use super::common::*;
use crate::relaxation::catalog::FeeCatalog;
use crate::relaxation::domain::{
    ApplicationMethod, ConfigStatus, PolicyId, RegistrationType, RelaxationPolicy, RuleId, Scope,
};

#[test]
fn latest_effective_policy_is_authoritative() {
    let mut catalog = catalog();
    let mut revised = policy("FEMALE", 12.0, true);
    revised.id = PolicyId("policy-FEMALE-v2".to_string());
    revised.effective_from = date(2025, 5, 1);
    catalog.policies.push(revised);

    let before = catalog.policies_for(&scope(), date(2025, 4, 30));
    let after = catalog.policies_for(&scope(), pricing_date());

    let female = |policies: &[RelaxationPolicy]| {
        policies
            .iter()
            .find(|policy| policy.criterion_id == id("FEMALE"))
            .map(|policy| policy.relaxation_percent)
    };
    assert_eq!(female(before.as_slice()), Some(10.0));
    assert_eq!(female(after.as_slice()), Some(12.0));
    assert_eq!(after.len(), 4);
}

#[test]
fn expired_policy_windows_are_excluded() {
    let mut catalog = catalog();
    catalog.policies[2].effective_to = Some(date(2025, 3, 31));

    let policies = catalog.policies_for(&scope(), pricing_date());

    assert!(policies.iter().all(|policy| policy.criterion_id != id("PWD")));
}

#[test]
fn policies_for_inactive_or_unknown_criteria_are_dropped() {
    let mut catalog = catalog();
    catalog.criteria[0].is_active = false;
    catalog.policies.push(policy("GHOST", 40.0, true));

    let policies = catalog.policies_for(&scope(), pricing_date());

    assert!(policies.iter().all(|policy| policy.criterion_id != id("FEMALE")));
    assert!(policies.iter().all(|policy| policy.criterion_id != id("GHOST")));
}

#[test]
fn rules_filter_by_scope_status_and_date() {
    let mut catalog = catalog();
    let mut expired = rule("rule-old", &["SC", "PWD"], ApplicationMethod::Custom, 30.0);
    expired.status = ConfigStatus::Expired;
    let mut scheduled = rule("rule-next", &["FEMALE", "PWD"], ApplicationMethod::Sum, 30.0);
    scheduled.status = ConfigStatus::Scheduled;
    scheduled.effective_from = date(2026, 1, 1);
    let mut elsewhere = rule("rule-ka", &["FEMALE", "PWD"], ApplicationMethod::Sum, 30.0);
    elsewhere.scope = Scope::new("council-ka", RegistrationType::Regular);
    catalog
        .combination_rules
        .extend([expired, scheduled, elsewhere]);

    let rules = catalog.rules_for(&scope(), pricing_date());

    let ids: Vec<RuleId> = rules.into_iter().map(|rule| rule.id).collect();
    assert_eq!(ids, vec![RuleId("rule-female-sc".to_string())]);
}

#[test]
fn catalog_loads_from_json() {
    let raw = r#"{
        "criteria": [{
            "id": "FEMALE",
            "code": "FEMALE",
            "name": "Female",
            "category": "GENDER",
            "field_mapping": { "user_field_name": "gender", "expected_value": "Female" },
            "is_active": true
        }],
        "national_configs": [{
            "registration_type": "REGULAR",
            "min_amount": 3000,
            "default_amount": 5000,
            "max_amount": 8000,
            "gst_applicable": true,
            "gst_percentage": 18.0
        }],
        "policies": [{
            "id": "policy-1",
            "criterion_id": "FEMALE",
            "scope": { "council_id": "council-mh", "registration_type": "REGULAR" },
            "is_enabled": true,
            "relaxation_percent": 10.0,
            "min_final_amount": 0,
            "effective_from": "2025-01-01"
        }]
    }"#;

    let catalog = FeeCatalog::from_json(raw).expect("catalog parses");

    assert_eq!(catalog.criteria.len(), 1);
    assert!(catalog.state_configs.is_empty());
    assert!(catalog.combination_rules.is_empty());
    let national = catalog
        .national_config(RegistrationType::Regular)
        .expect("national config");
    assert_eq!(national.envelope.default_amount, 5000);
    assert_eq!(catalog.policies_for(&scope(), pricing_date()).len(), 1);
}
