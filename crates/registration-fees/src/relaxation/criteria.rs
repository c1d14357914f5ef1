use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{
    CouncilId, CriterionCategory, CriterionId, FieldMapping, RelaxationCriterion, RelaxationPolicy,
};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const CODE_MIN_CHARS: usize = 2;

/// Admin input for a new or edited criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionDraft {
    pub name: String,
    pub code: String,
    pub category: CriterionCategory,
    pub user_field_name: String,
    pub expected_value: String,
}

impl CriterionDraft {
    /// Build the stored criterion from a draft that passed [`validate_criterion`].
    pub fn into_criterion(self, id: CriterionId, is_active: bool) -> RelaxationCriterion {
        RelaxationCriterion {
            id,
            code: self.code,
            name: self.name.trim().to_string(),
            category: self.category,
            field_mapping: FieldMapping {
                user_field_name: self.user_field_name,
                expected_value: self.expected_value.trim().to_string(),
            },
            description: None,
            is_active,
        }
    }
}

/// Validation errors for criterion master data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriterionViolation {
    #[error("name must be between 2 and 50 characters")]
    NameLength,
    #[error("code must be at least 2 characters")]
    CodeTooShort,
    #[error("code must be uppercase letters, numbers, and underscores only")]
    CodeFormat,
    #[error("code {0} already exists")]
    DuplicateCode(String),
    #[error("{category} criteria map to the {expected} field, not {found}")]
    FieldMismatch {
        category: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("an expected value is required")]
    MissingExpectedValue,
    #[error("{value} is not a valid {category} value")]
    ExpectedValueNotAllowed {
        category: &'static str,
        value: String,
    },
    #[error("criterion is used by {usage} council(s); deactivate it instead")]
    InUse { usage: usize },
}

/// Check a draft against the existing catalog. `editing` is the id of the criterion being
/// updated, whose own code does not count as a duplicate. The field name and expected value must
/// come from the category's mapping table.
pub fn validate_criterion(
    draft: &CriterionDraft,
    existing: &[RelaxationCriterion],
    editing: Option<&CriterionId>,
) -> Result<(), Vec<CriterionViolation>> {
    let mut violations = Vec::new();

    let name_chars = draft.name.trim().chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_chars) {
        violations.push(CriterionViolation::NameLength);
    }

    if draft.code.chars().count() < CODE_MIN_CHARS {
        violations.push(CriterionViolation::CodeTooShort);
    } else if !draft
        .code
        .chars()
        .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
    {
        violations.push(CriterionViolation::CodeFormat);
    } else if existing.iter().any(|criterion| {
        criterion.code == draft.code && editing.map(|id| &criterion.id != id).unwrap_or(true)
    }) {
        violations.push(CriterionViolation::DuplicateCode(draft.code.clone()));
    }

    let field = draft.category.profile_field();
    if draft.user_field_name != field {
        violations.push(CriterionViolation::FieldMismatch {
            category: draft.category.label(),
            expected: field,
            found: draft.user_field_name.clone(),
        });
    }

    let value = draft.expected_value.trim();
    if value.is_empty() {
        violations.push(CriterionViolation::MissingExpectedValue);
    } else if !draft
        .category
        .allowed_values()
        .iter()
        .any(|allowed| *allowed == value)
    {
        violations.push(CriterionViolation::ExpectedValueNotAllowed {
            category: draft.category.label(),
            value: value.to_string(),
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Number of distinct councils with a policy for the criterion.
pub fn usage_count(criterion_id: &CriterionId, policies: &[RelaxationPolicy]) -> usize {
    policies
        .iter()
        .filter(|policy| &policy.criterion_id == criterion_id)
        .map(|policy| &policy.scope.council_id)
        .collect::<BTreeSet<&CouncilId>>()
        .len()
}

pub fn ensure_deletable(
    criterion_id: &CriterionId,
    policies: &[RelaxationPolicy],
) -> Result<(), CriterionViolation> {
    match usage_count(criterion_id, policies) {
        0 => Ok(()),
        usage => Err(CriterionViolation::InUse { usage }),
    }
}
