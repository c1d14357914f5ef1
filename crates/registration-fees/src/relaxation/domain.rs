use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for relaxation criteria.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CriterionId(pub String);

impl CriterionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for state medical councils.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CouncilId(pub String);

impl fmt::Display for CouncilId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for relaxation policies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyId(pub String);

/// Identifier wrapper for combination rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub String);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registration tracks offered by the councils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationType {
    Regular,
    Provisional,
    Temporary,
    Interim,
}

impl RegistrationType {
    pub const ALL: [RegistrationType; 4] = [
        RegistrationType::Regular,
        RegistrationType::Provisional,
        RegistrationType::Temporary,
        RegistrationType::Interim,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegistrationType::Regular => "Regular Registration",
            RegistrationType::Provisional => "Provisional Registration",
            RegistrationType::Temporary => "Temporary Registration",
            RegistrationType::Interim => "Interim Registration",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RegistrationType::Regular => "REGULAR",
            RegistrationType::Provisional => "PROVISIONAL",
            RegistrationType::Temporary => "TEMPORARY",
            RegistrationType::Interim => "INTERIM",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Council plus registration type: the unit every policy and rule is configured for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub council_id: CouncilId,
    pub registration_type: RegistrationType,
}

impl Scope {
    pub fn new(council_id: impl Into<String>, registration_type: RegistrationType) -> Self {
        Self {
            council_id: CouncilId(council_id.into()),
            registration_type,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.council_id, self.registration_type)
    }
}

/// Grouping used when presenting and mapping criteria to profile fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionCategory {
    Gender,
    Category,
    Ability,
    Occupation,
    Age,
}

impl CriterionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CriterionCategory::Gender => "Gender",
            CriterionCategory::Category => "Category",
            CriterionCategory::Ability => "Ability",
            CriterionCategory::Occupation => "Occupation",
            CriterionCategory::Age => "Age",
        }
    }

    /// Applicant profile field the category is normally mapped against.
    pub fn profile_field(&self) -> &'static str {
        match self {
            CriterionCategory::Gender => "gender",
            CriterionCategory::Category => "category",
            CriterionCategory::Ability => "disability_status",
            CriterionCategory::Occupation => "occupation",
            CriterionCategory::Age => "age",
        }
    }

    pub fn allowed_values(&self) -> &'static [&'static str] {
        match self {
            CriterionCategory::Gender => &["Female", "Male", "Other"],
            CriterionCategory::Category => &["SC", "ST", "OBC", "General", "EWS"],
            CriterionCategory::Ability => &["PWD", "None"],
            CriterionCategory::Occupation => &[
                "Armed_Forces",
                "Ex_Serviceman",
                "Central_Govt",
                "State_Govt",
                "Private",
            ],
            CriterionCategory::Age => &[">=60", ">=65", ">=70"],
        }
    }
}

/// Profile field and expected value an applicant must match to hold a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub user_field_name: String,
    pub expected_value: String,
}

/// Named eligibility condition maintained by the national office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaxationCriterion {
    pub id: CriterionId,
    pub code: String,
    pub name: String,
    pub category: CriterionCategory,
    pub field_mapping: FieldMapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

/// Discount a council grants for one criterion within one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxationPolicy {
    pub id: PolicyId,
    pub criterion_id: CriterionId,
    pub scope: Scope,
    pub is_enabled: bool,
    pub relaxation_percent: f64,
    pub min_final_amount: u64,
    pub effective_from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,
}

impl RelaxationPolicy {
    pub fn is_effective_on(&self, on: NaiveDate) -> bool {
        within_window(self.effective_from, self.effective_to, on)
    }
}

/// How a combination rule's percentage was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationMethod {
    Sum,
    Custom,
}

/// Publication state of a configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigStatus {
    #[default]
    Active,
    Scheduled,
    Expired,
}

/// Override discount applied when an exact set of criteria is held together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRule {
    pub id: RuleId,
    pub scope: Scope,
    pub criteria_ids: Vec<CriterionId>,
    pub application_method: ApplicationMethod,
    pub combined_percent: f64,
    pub min_final_amount: u64,
    pub effective_from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,
    #[serde(default)]
    pub status: ConfigStatus,
}

impl CombinationRule {
    /// Criteria as an unordered set; duplicates in the stored list collapse.
    pub fn criteria_set(&self) -> BTreeSet<&CriterionId> {
        self.criteria_ids.iter().collect()
    }

    /// Set equality against `held`. Subsets and supersets never match.
    pub fn matches_exactly(&self, held: &BTreeSet<CriterionId>) -> bool {
        let own = self.criteria_set();
        own.len() == held.len() && held.iter().all(|id| own.contains(id))
    }

    pub fn is_active_on(&self, on: NaiveDate) -> bool {
        self.status != ConfigStatus::Expired
            && within_window(self.effective_from, self.effective_to, on)
    }
}

fn within_window(from: NaiveDate, to: Option<NaiveDate>, on: NaiveDate) -> bool {
    from <= on && to.map(|end| on <= end).unwrap_or(true)
}
