use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{CriterionId, FieldMapping, RelaxationCriterion};

/// Applicant attributes that relaxation criteria are mapped against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub disability_status: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub residential_state: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

/// Decides whether a profile satisfies one field mapping.
pub trait EligibilityEvaluator: Send + Sync {
    fn is_eligible(&self, profile: &ApplicantProfile, mapping: &FieldMapping) -> bool;
}

/// Evaluates mappings against the named [`ApplicantProfile`] fields.
///
/// Expected values starting with `>=`, `>`, `<=` or `<` compare numerically against the field
/// (only `age` is numeric); anything else is a case-insensitive equality check. Unknown fields
/// and missing values never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileFieldEvaluator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    AtLeast(u32),
    Above(u32),
    AtMost(u32),
    Below(u32),
}

impl Comparison {
    fn parse(expected: &str) -> Option<Self> {
        let expected = expected.trim();
        let (build, rest): (fn(u32) -> Comparison, &str) =
            if let Some(rest) = expected.strip_prefix(">=") {
                (Comparison::AtLeast, rest)
            } else if let Some(rest) = expected.strip_prefix("<=") {
                (Comparison::AtMost, rest)
            } else if let Some(rest) = expected.strip_prefix('>') {
                (Comparison::Above, rest)
            } else if let Some(rest) = expected.strip_prefix('<') {
                (Comparison::Below, rest)
            } else {
                return None;
            };
        rest.trim().parse().ok().map(build)
    }

    fn holds(&self, value: u32) -> bool {
        match *self {
            Comparison::AtLeast(bound) => value >= bound,
            Comparison::Above(bound) => value > bound,
            Comparison::AtMost(bound) => value <= bound,
            Comparison::Below(bound) => value < bound,
        }
    }
}

impl ProfileFieldEvaluator {
    fn text_field<'a>(profile: &'a ApplicantProfile, field: &str) -> Option<&'a str> {
        let value = match field {
            "gender" => &profile.gender,
            "category" => &profile.category,
            "disability_status" => &profile.disability_status,
            "occupation" => &profile.occupation,
            "residential_state" => &profile.residential_state,
            _ => return None,
        };
        value.as_deref()
    }
}

impl EligibilityEvaluator for ProfileFieldEvaluator {
    fn is_eligible(&self, profile: &ApplicantProfile, mapping: &FieldMapping) -> bool {
        let field = mapping.user_field_name.trim();
        let expected = mapping.expected_value.trim();

        if field == "age" {
            let Some(age) = profile.age else {
                return false;
            };
            return match Comparison::parse(expected) {
                Some(comparison) => comparison.holds(age),
                None => expected.parse::<u32>().map(|exact| exact == age).unwrap_or(false),
            };
        }

        Self::text_field(profile, field)
            .map(|actual| actual.trim().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }
}

/// Ids of the active criteria the profile satisfies.
pub fn resolve_held_criteria(
    criteria: &[RelaxationCriterion],
    profile: &ApplicantProfile,
    evaluator: &dyn EligibilityEvaluator,
) -> BTreeSet<CriterionId> {
    criteria
        .iter()
        .filter(|criterion| criterion.is_active)
        .filter(|criterion| evaluator.is_eligible(profile, &criterion.field_mapping))
        .map(|criterion| criterion.id.clone())
        .collect()
}
