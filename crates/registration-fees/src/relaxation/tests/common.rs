use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::relaxation::bounds::{FeeEnvelope, NationalFeeConfig, StateFeeConfig};
use crate::relaxation::catalog::FeeCatalog;
use crate::relaxation::domain::{
    ApplicationMethod, CombinationRule, ConfigStatus, CouncilId, CriterionCategory, CriterionId,
    FieldMapping, PolicyId, RegistrationType, RelaxationCriterion, RelaxationPolicy, RuleId,
    Scope,
};
use crate::relaxation::engine::{FeeRequest, GstTerms};

pub(super) const BASE_FEE: u64 = 5000;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn pricing_date() -> NaiveDate {
    date(2025, 6, 1)
}

pub(super) fn scope() -> Scope {
    Scope::new("council-mh", RegistrationType::Regular)
}

pub(super) fn id(raw: &str) -> CriterionId {
    CriterionId::new(raw)
}

pub(super) fn held(ids: &[&str]) -> BTreeSet<CriterionId> {
    ids.iter().map(|raw| id(raw)).collect()
}

pub(super) fn gst_18() -> GstTerms {
    GstTerms {
        applicable: true,
        percent: 18.0,
    }
}

pub(super) fn criterion(
    raw_id: &str,
    code: &str,
    category: CriterionCategory,
    field: &str,
    expected: &str,
) -> RelaxationCriterion {
    RelaxationCriterion {
        id: id(raw_id),
        code: code.to_string(),
        name: code.to_string(),
        category,
        field_mapping: FieldMapping {
            user_field_name: field.to_string(),
            expected_value: expected.to_string(),
        },
        description: None,
        is_active: true,
    }
}

pub(super) fn criteria() -> Vec<RelaxationCriterion> {
    vec![
        criterion("FEMALE", "FEMALE", CriterionCategory::Gender, "gender", "Female"),
        criterion("SC", "SC", CriterionCategory::Category, "category", "SC"),
        criterion("PWD", "PWD", CriterionCategory::Ability, "disability_status", "PWD"),
        criterion("SENIOR", "SENIOR_60", CriterionCategory::Age, "age", ">=60"),
    ]
}

pub(super) fn policy(criterion_id: &str, percent: f64, enabled: bool) -> RelaxationPolicy {
    RelaxationPolicy {
        id: PolicyId(format!("policy-{criterion_id}")),
        criterion_id: id(criterion_id),
        scope: scope(),
        is_enabled: enabled,
        relaxation_percent: percent,
        min_final_amount: 0,
        effective_from: date(2025, 1, 1),
        effective_to: None,
    }
}

pub(super) fn policies() -> Vec<RelaxationPolicy> {
    vec![
        policy("FEMALE", 10.0, true),
        policy("SC", 15.0, true),
        policy("PWD", 20.0, true),
        policy("SENIOR", 25.0, false),
    ]
}

pub(super) fn rule(
    raw_id: &str,
    criteria: &[&str],
    method: ApplicationMethod,
    percent: f64,
) -> CombinationRule {
    CombinationRule {
        id: RuleId(raw_id.to_string()),
        scope: scope(),
        criteria_ids: criteria.iter().map(|raw| id(raw)).collect(),
        application_method: method,
        combined_percent: percent,
        min_final_amount: 0,
        effective_from: date(2025, 1, 1),
        effective_to: None,
        status: ConfigStatus::Active,
    }
}

pub(super) fn request<'a>(
    held: &'a BTreeSet<CriterionId>,
    policies: &'a [RelaxationPolicy],
    rules: &'a [CombinationRule],
) -> FeeRequest<'a> {
    FeeRequest {
        base_fee: BASE_FEE,
        held_criteria: held,
        policies,
        combination_rules: rules,
        gst: gst_18(),
    }
}

pub(super) fn national(registration_type: RegistrationType) -> NationalFeeConfig {
    NationalFeeConfig {
        registration_type,
        envelope: FeeEnvelope::new(3000, 5000, 8000),
        gst_applicable: true,
        gst_percentage: 18.0,
    }
}

pub(super) fn state_override(envelope: FeeEnvelope) -> StateFeeConfig {
    StateFeeConfig {
        council_id: CouncilId("council-mh".to_string()),
        registration_type: RegistrationType::Regular,
        envelope,
    }
}

pub(super) fn catalog() -> FeeCatalog {
    FeeCatalog {
        criteria: criteria(),
        national_configs: vec![
            national(RegistrationType::Regular),
            national(RegistrationType::Provisional),
        ],
        state_configs: Vec::new(),
        policies: policies(),
        combination_rules: vec![rule(
            "rule-female-sc",
            &["FEMALE", "SC"],
            ApplicationMethod::Custom,
            22.0,
        )],
    }
}
