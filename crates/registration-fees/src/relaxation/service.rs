use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::bounds::{effective_base_fee, validate_state_bounds, BoundsViolation};
use super::catalog::FeeCatalog;
use super::domain::{CriterionId, RegistrationType, Scope};
use super::eligibility::{resolve_held_criteria, ApplicantProfile, EligibilityEvaluator};
use super::engine::{calculate_fee, FeeQuote, FeeRequest, GstTerms, QuoteError};

/// Quote request addressed by scope rather than by raw fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub scope: Scope,
    pub held_criteria: BTreeSet<CriterionId>,
    pub on: NaiveDate,
}

/// Where the base fee of a scoped quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseFeeSource {
    National,
    State,
}

/// Quote plus the context it was resolved in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopedQuote {
    pub scope: Scope,
    pub base_fee_source: BaseFeeSource,
    /// Problems with the state override that caused the national default to be used.
    pub ignored_state_override: Vec<BoundsViolation>,
    /// Held ids the catalog does not know; they contribute nothing.
    pub unknown_criteria: Vec<CriterionId>,
    pub quote: FeeQuote,
}

/// Error raised by the quote service.
#[derive(Debug, thiserror::Error)]
pub enum QuoteServiceError {
    #[error("no national fee configuration for registration type {0}")]
    MissingNationalConfig(RegistrationType),
    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Service composing catalog lookup, fee bounds, and the calculation engine.
#[derive(Clone)]
pub struct FeeQuoteService {
    catalog: Arc<FeeCatalog>,
}

impl FeeQuoteService {
    pub fn new(catalog: Arc<FeeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FeeCatalog {
        &self.catalog
    }

    /// Quote for an explicit set of held criteria.
    pub fn quote(&self, request: &QuoteRequest) -> Result<ScopedQuote, QuoteServiceError> {
        let scope = &request.scope;
        let national = self
            .catalog
            .national_config(scope.registration_type)
            .ok_or(QuoteServiceError::MissingNationalConfig(
                scope.registration_type,
            ))?;

        let state = self.catalog.state_config(scope);
        let ignored_state_override = state
            .map(|config| validate_state_bounds(&national.envelope, &config.envelope).errors)
            .unwrap_or_default();
        if !ignored_state_override.is_empty() {
            warn!(
                %scope,
                violations = ignored_state_override.len(),
                "state fee override outside national bounds; using national default"
            );
        }

        let base_fee = effective_base_fee(
            &national.envelope,
            state.map(|config| &config.envelope),
        );
        let base_fee_source = if state.is_some() && ignored_state_override.is_empty() {
            BaseFeeSource::State
        } else {
            BaseFeeSource::National
        };

        let unknown_criteria: Vec<CriterionId> = request
            .held_criteria
            .iter()
            .filter(|id| self.catalog.criterion(id).is_none())
            .cloned()
            .collect();

        let policies = self.catalog.policies_for(scope, request.on);
        let rules = self.catalog.rules_for(scope, request.on);

        let quote = calculate_fee(&FeeRequest {
            base_fee,
            held_criteria: &request.held_criteria,
            policies: &policies,
            combination_rules: &rules,
            gst: GstTerms {
                applicable: national.gst_applicable,
                percent: national.gst_percentage,
            },
        })?;

        if !quote.conflicting_rule_ids.is_empty() {
            warn!(
                %scope,
                applied = ?quote.applied_rule.as_ref().map(|rule| &rule.id),
                conflicting = ?quote.conflicting_rule_ids,
                "multiple combination rules match the same criteria set"
            );
        }

        debug!(
            %scope,
            base_fee,
            discount_percent = quote.total_discount_percent,
            total_payable = quote.total_payable,
            "fee quote computed"
        );

        Ok(ScopedQuote {
            scope: scope.clone(),
            base_fee_source,
            ignored_state_override,
            unknown_criteria,
            quote,
        })
    }

    /// Resolve held criteria from an applicant profile, then quote.
    pub fn quote_for_profile(
        &self,
        scope: Scope,
        profile: &ApplicantProfile,
        evaluator: &dyn EligibilityEvaluator,
        on: NaiveDate,
    ) -> Result<ScopedQuote, QuoteServiceError> {
        let held_criteria = resolve_held_criteria(&self.catalog.criteria, profile, evaluator);
        self.quote(&QuoteRequest {
            scope,
            held_criteria,
            on,
        })
    }
}
