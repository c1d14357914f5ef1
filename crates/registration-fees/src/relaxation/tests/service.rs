use std::sync::Arc;

use super::common::*;
use crate::relaxation::bounds::FeeEnvelope;
use crate::relaxation::domain::{CriterionId, RegistrationType, Scope};
use crate::relaxation::eligibility::{ApplicantProfile, ProfileFieldEvaluator};
use crate::relaxation::engine::QuoteError;
use crate::relaxation::service::{
    BaseFeeSource, FeeQuoteService, QuoteRequest, QuoteServiceError,
};

fn service_with(catalog: crate::relaxation::catalog::FeeCatalog) -> FeeQuoteService {
    FeeQuoteService::new(Arc::new(catalog))
}

fn quote_request(ids: &[&str]) -> QuoteRequest {
    QuoteRequest {
        scope: scope(),
        held_criteria: held(ids),
        on: pricing_date(),
    }
}

#[test]
fn national_default_used_without_state_override() {
    let service = service_with(catalog());

    let scoped = service.quote(&quote_request(&["FEMALE"])).expect("quote");

    assert_eq!(scoped.base_fee_source, BaseFeeSource::National);
    assert_eq!(scoped.quote.base_fee, 5000);
    assert_eq!(scoped.quote.total_payable, 5310);
}

#[test]
fn valid_state_override_sets_base_fee() {
    let mut catalog = catalog();
    catalog
        .state_configs
        .push(state_override(FeeEnvelope::new(4000, 4500, 7000)));
    let service = service_with(catalog);

    let scoped = service.quote(&quote_request(&["FEMALE"])).expect("quote");

    assert_eq!(scoped.base_fee_source, BaseFeeSource::State);
    assert_eq!(scoped.quote.discount_amount, 450);
    assert_eq!(scoped.quote.fee_after_discount, 4050);
    assert_eq!(scoped.quote.cgst, 365);
    assert_eq!(scoped.quote.total_payable, 4780);
}

#[test]
fn invalid_state_override_falls_back_to_national_default() {
    let mut catalog = catalog();
    catalog
        .state_configs
        .push(state_override(FeeEnvelope::new(2000, 5000, 7000)));
    let service = service_with(catalog);

    let scoped = service.quote(&quote_request(&[])).expect("quote");

    assert_eq!(scoped.base_fee_source, BaseFeeSource::National);
    assert_eq!(scoped.ignored_state_override.len(), 1);
    assert_eq!(scoped.quote.base_fee, 5000);
}

#[test]
fn missing_national_config_is_an_error() {
    let service = service_with(catalog());
    let request = QuoteRequest {
        scope: Scope::new("council-mh", RegistrationType::Temporary),
        held_criteria: held(&["FEMALE"]),
        on: pricing_date(),
    };

    match service.quote(&request) {
        Err(QuoteServiceError::MissingNationalConfig(RegistrationType::Temporary)) => {}
        other => panic!("expected missing national config, got {other:?}"),
    }
}

#[test]
fn engine_rejections_propagate() {
    let mut catalog = catalog();
    catalog.policies[0].relaxation_percent = 140.0;
    let service = service_with(catalog);

    match service.quote(&quote_request(&["FEMALE"])) {
        Err(QuoteServiceError::Quote(QuoteError::InvalidInput(violations))) => {
            assert_eq!(violations.len(), 1)
        }
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn unknown_criteria_are_listed_and_contribute_nothing() {
    let service = service_with(catalog());

    let scoped = service
        .quote(&quote_request(&["FEMALE", "RETIRED"]))
        .expect("quote");

    assert_eq!(scoped.unknown_criteria, vec![CriterionId::new("RETIRED")]);
    assert_eq!(scoped.quote.total_discount_percent, 10.0);
}

#[test]
fn profile_quotes_resolve_criteria_first() {
    let service = service_with(catalog());
    let profile = ApplicantProfile {
        gender: Some("Female".to_string()),
        category: Some("SC".to_string()),
        age: Some(34),
        ..ApplicantProfile::default()
    };

    let scoped = service
        .quote_for_profile(scope(), &profile, &ProfileFieldEvaluator, pricing_date())
        .expect("quote");

    assert_eq!(scoped.quote.total_discount_percent, 22.0);
    assert_eq!(scoped.quote.fee_after_discount, 3900);
    assert_eq!(scoped.quote.total_payable, 4602);
}

#[test]
fn service_can_be_shared_across_threads() {
    let service = service_with(catalog());
    let expected = service
        .quote(&quote_request(&["FEMALE", "SC"]))
        .expect("quote");

    std::thread::scope(|threads| {
        for _ in 0..4 {
            let service = service.clone();
            let expected = &expected;
            threads.spawn(move || {
                let scoped = service
                    .quote(&quote_request(&["FEMALE", "SC"]))
                    .expect("quote");
                assert_eq!(&scoped, expected);
            });
        }
    });
}
