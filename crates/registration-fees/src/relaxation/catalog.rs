use std::collections::BTreeSet;
use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bounds::{NationalFeeConfig, StateFeeConfig};
use super::domain::{
    CombinationRule, CriterionId, RegistrationType, RelaxationCriterion, RelaxationPolicy, Scope,
};

/// Read-only snapshot of everything a quote can depend on.
///
/// The catalog is handed to the service whole and never mutated; whoever edits fees or policies
/// publishes a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeCatalog {
    #[serde(default)]
    pub criteria: Vec<RelaxationCriterion>,
    #[serde(default)]
    pub national_configs: Vec<NationalFeeConfig>,
    #[serde(default)]
    pub state_configs: Vec<StateFeeConfig>,
    #[serde(default)]
    pub policies: Vec<RelaxationPolicy>,
    #[serde(default)]
    pub combination_rules: Vec<CombinationRule>,
}

impl FeeCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn national_config(&self, registration_type: RegistrationType) -> Option<&NationalFeeConfig> {
        self.national_configs
            .iter()
            .find(|config| config.registration_type == registration_type)
    }

    pub fn state_config(&self, scope: &Scope) -> Option<&StateFeeConfig> {
        self.state_configs.iter().find(|config| {
            config.council_id == scope.council_id
                && config.registration_type == scope.registration_type
        })
    }

    pub fn criterion(&self, id: &CriterionId) -> Option<&RelaxationCriterion> {
        self.criteria.iter().find(|criterion| &criterion.id == id)
    }

    fn active_criteria(&self) -> BTreeSet<&CriterionId> {
        self.criteria
            .iter()
            .filter(|criterion| criterion.is_active)
            .map(|criterion| &criterion.id)
            .collect()
    }

    /// Authoritative policies for `scope` on `on`: one per criterion, the latest
    /// `effective_from` winning and ties going to catalog order. Policies pointing at missing or
    /// inactive criteria are left out.
    pub fn policies_for(&self, scope: &Scope, on: NaiveDate) -> Vec<RelaxationPolicy> {
        let active = self.active_criteria();
        let mut selected: Vec<&RelaxationPolicy> = Vec::new();

        for policy in self.policies.iter().filter(|policy| {
            &policy.scope == scope
                && policy.is_effective_on(on)
                && active.contains(&policy.criterion_id)
        }) {
            match selected
                .iter_mut()
                .find(|current| current.criterion_id == policy.criterion_id)
            {
                Some(current) if policy.effective_from > current.effective_from => {
                    *current = policy;
                }
                Some(_) => {}
                None => selected.push(policy),
            }
        }

        selected.into_iter().cloned().collect()
    }

    /// Combination rules live in `scope` on `on`, in catalog order.
    pub fn rules_for(&self, scope: &Scope, on: NaiveDate) -> Vec<CombinationRule> {
        self.combination_rules
            .iter()
            .filter(|rule| &rule.scope == scope && rule.is_active_on(on))
            .cloned()
            .collect()
    }
}
