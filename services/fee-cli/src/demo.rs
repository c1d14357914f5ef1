use chrono::{Local, NaiveDate};
use clap::Args;
use registration_fees::error::AppError;
use registration_fees::relaxation::{
    compare_with_sum, validate_state_bounds, ApplicantProfile, ApplicationMethod,
    CombinationRule, ConfigStatus, CriterionCategory, CriterionId, FeeCatalog, FeeEnvelope,
    FeeQuoteService, FieldMapping, NationalFeeConfig, PolicyId, ProfileFieldEvaluator,
    QuoteRequest, RegistrationType, RelaxationCriterion, RelaxationPolicy, RuleId, Scope,
};
use std::collections::BTreeSet;
use std::sync::Arc;

const DEMO_COUNCIL: &str = "council-demo";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pricing date for the demo quotes (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Skip the state bounds portion of the demo.
    #[arg(long)]
    pub(crate) skip_bounds: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { date, skip_bounds } = args;
    let on = date.unwrap_or_else(|| Local::now().date_naive());

    println!("Registration fee relaxation demo (pricing date {on})");

    let summed = FeeQuoteService::new(Arc::new(demo_catalog(false)));
    let with_rule = FeeQuoteService::new(Arc::new(demo_catalog(true)));

    print_scenario(
        "1. Female applicant, single 10% relaxation",
        &summed,
        &["FEMALE"],
        on,
    )?;
    print_scenario(
        "2. Female + SC applicant, no combination rule (10% + 15%)",
        &summed,
        &["FEMALE", "SC"],
        on,
    )?;
    print_scenario(
        "3. Female + SC applicant, CUSTOM combination rule at 22%",
        &with_rule,
        &["FEMALE", "SC"],
        on,
    )?;

    if let Some(rule) = with_rule.catalog().combination_rules.first() {
        let comparison = compare_with_sum(rule, &with_rule.catalog().policies, demo_base_fee());
        println!(
            "\nRule {} vs plain sum: {}% -> {} instead of {}% -> {} (difference {:+})",
            rule.id,
            comparison.combined_percent,
            comparison.amount_with_rule,
            comparison.sum_percent,
            comparison.amount_without_rule,
            comparison.difference
        );
    }

    let profile = ApplicantProfile {
        gender: Some("Female".to_string()),
        category: Some("SC".to_string()),
        age: Some(41),
        ..ApplicantProfile::default()
    };
    let scoped = with_rule.quote_for_profile(
        demo_scope(),
        &profile,
        &ProfileFieldEvaluator,
        on,
    )?;
    println!(
        "\nProfile-driven quote (female, SC, age 41): {}% relaxation, total payable {}",
        scoped.quote.total_discount_percent, scoped.quote.total_payable
    );

    if skip_bounds {
        return Ok(());
    }

    let national = demo_envelope();
    println!(
        "\nState bounds against national {{{}, {}, {}}}",
        national.min_amount, national.default_amount, national.max_amount
    );
    for (label, proposed) in [
        ("4. State {4000, 5000, 7000}", FeeEnvelope::new(4000, 5000, 7000)),
        ("5. State {2000, 5000, 7000}", FeeEnvelope::new(2000, 5000, 7000)),
    ] {
        let result = validate_state_bounds(&national, &proposed);
        if result.valid {
            println!("{label}: valid");
        } else {
            println!("{label}: invalid ({})", result.messages().join("; "));
        }
    }

    Ok(())
}

fn print_scenario(
    title: &str,
    service: &FeeQuoteService,
    held: &[&str],
    on: NaiveDate,
) -> Result<(), AppError> {
    let request = QuoteRequest {
        scope: demo_scope(),
        held_criteria: held.iter().map(|raw| CriterionId::new(*raw)).collect::<BTreeSet<_>>(),
        on,
    };
    let scoped = service.quote(&request)?;

    println!("\n{title}");
    for line in scoped.quote.details() {
        println!("  {line}");
    }
    Ok(())
}

fn demo_scope() -> Scope {
    Scope::new(DEMO_COUNCIL, RegistrationType::Regular)
}

fn demo_envelope() -> FeeEnvelope {
    FeeEnvelope::new(3000, 5000, 8000)
}

fn demo_base_fee() -> u64 {
    demo_envelope().default_amount
}

fn demo_criterion(code: &str, category: CriterionCategory, expected: &str) -> RelaxationCriterion {
    RelaxationCriterion {
        id: CriterionId::new(code),
        code: code.to_string(),
        name: code.to_string(),
        category,
        field_mapping: FieldMapping {
            user_field_name: category.profile_field().to_string(),
            expected_value: expected.to_string(),
        },
        description: None,
        is_active: true,
    }
}

fn demo_policy(code: &str, percent: f64) -> RelaxationPolicy {
    RelaxationPolicy {
        id: PolicyId(format!("policy-{}", code.to_ascii_lowercase())),
        criterion_id: CriterionId::new(code),
        scope: demo_scope(),
        is_enabled: true,
        relaxation_percent: percent,
        min_final_amount: 0,
        effective_from: NaiveDate::MIN,
        effective_to: None,
    }
}

fn demo_catalog(with_rule: bool) -> FeeCatalog {
    let combination_rules = if with_rule {
        vec![CombinationRule {
            id: RuleId("rule-female-sc".to_string()),
            scope: demo_scope(),
            criteria_ids: vec![CriterionId::new("FEMALE"), CriterionId::new("SC")],
            application_method: ApplicationMethod::Custom,
            combined_percent: 22.0,
            min_final_amount: 0,
            effective_from: NaiveDate::MIN,
            effective_to: None,
            status: ConfigStatus::Active,
        }]
    } else {
        Vec::new()
    };

    FeeCatalog {
        criteria: vec![
            demo_criterion("FEMALE", CriterionCategory::Gender, "Female"),
            demo_criterion("SC", CriterionCategory::Category, "SC"),
            demo_criterion("PWD", CriterionCategory::Ability, "PWD"),
        ],
        national_configs: vec![NationalFeeConfig {
            registration_type: RegistrationType::Regular,
            envelope: demo_envelope(),
            gst_applicable: true,
            gst_percentage: 18.0,
        }],
        state_configs: Vec::new(),
        policies: vec![
            demo_policy("FEMALE", 10.0),
            demo_policy("SC", 15.0),
            demo_policy("PWD", 20.0),
        ],
        combination_rules,
    }
}
