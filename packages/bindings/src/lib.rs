use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use fincoach_core::profile::FinancialProfile;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_dti(profile_json: String) -> NapiResult<String> {
    let profile: FinancialProfile = serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let output = fincoach_core::dti::calculate_dti(&profile);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct AffordabilityInput {
    profile: FinancialProfile,
    target_price: Decimal,
    #[serde(default)]
    annual_rate: Option<Decimal>,
    #[serde(default)]
    loan_term_years: Option<u32>,
}

#[napi]
pub fn check_affordability(input_json: String) -> NapiResult<String> {
    let input: AffordabilityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let defaults = fincoach_core::affordability::AffordabilityEngine::default();
    let engine = fincoach_core::affordability::AffordabilityEngine::new(
        input.annual_rate.unwrap_or_else(|| defaults.annual_rate()),
        input.loan_term_years.unwrap_or_else(|| defaults.loan_term_years()),
    );
    let output = engine.check_affordability(input.target_price, &input.profile);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn readiness_score(profile_json: String) -> NapiResult<String> {
    let profile: FinancialProfile = serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let output = fincoach_core::readiness::calculate_readiness(&profile);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct SpendingInput {
    profile: FinancialProfile,
    #[serde(default)]
    months: Option<u32>,
}

#[napi]
pub fn analyze_spending(input_json: String) -> NapiResult<String> {
    let input: SpendingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fincoach_core::transactions::analyze_transactions(&input.profile, input.months.unwrap_or(3));
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct PlanInput {
    profile: FinancialProfile,
    #[serde(default)]
    goal: Option<String>,
}

#[napi]
pub fn build_action_plan(input_json: String) -> NapiResult<String> {
    let input: PlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincoach_core::action_plan::build_action_plan(&input.profile, input.goal.as_deref());
    serde_json::to_string(&output).map_err(to_napi_error)
}
