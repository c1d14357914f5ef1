//! Registration fee relaxation: fee envelopes, discount policies, combination rules, and the
//! quote calculation that ties them together.

pub mod bounds;
pub mod catalog;
pub mod criteria;
pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod guard;
pub mod service;

#[cfg(test)]
mod tests;

pub use bounds::{
    effective_base_fee, validate_national_envelope, validate_state_bounds, BoundsViolation,
    FeeEnvelope, NationalFeeConfig, StateFeeConfig, ValidationResult,
};
pub use catalog::FeeCatalog;
pub use criteria::{
    ensure_deletable, usage_count, validate_criterion, CriterionDraft, CriterionViolation,
};
pub use domain::{
    ApplicationMethod, CombinationRule, ConfigStatus, CouncilId, CriterionCategory, CriterionId,
    FieldMapping, PolicyId, RegistrationType, RelaxationCriterion, RelaxationPolicy, RuleId,
    Scope,
};
pub use eligibility::{
    resolve_held_criteria, ApplicantProfile, EligibilityEvaluator, ProfileFieldEvaluator,
};
pub use engine::{
    calculate_fee, round_half_up, FeeQuote, FeeRequest, GstTerms, InputViolation, MAX_BASE_FEE,
    PolicyContribution, QuoteError,
};
pub use guard::{
    can_suggest_rule, compare_with_sum, has_conflict, is_sum_consistent, sum_of_enabled,
    validate_rule_draft, CombinationRuleDraft, RuleComparison, RuleDraftViolation,
};
pub use service::{
    BaseFeeSource, FeeQuoteService, QuoteRequest, QuoteServiceError, ScopedQuote,
};
