use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincoach_core::affordability::AffordabilityEngine;

use crate::input;

/// Arguments for the affordability check
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to a FinancialProfile JSON file (or pipe via stdin)
    #[arg(long)]
    pub profile: Option<String>,

    /// Target home price in dollars
    #[arg(long)]
    pub price: Decimal,

    /// Annual mortgage interest rate as a decimal
    #[arg(long, default_value = "0.065")]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    pub term_years: u32,
}

pub fn run(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = input::load_profile(args.profile.as_deref())?;
    let engine = AffordabilityEngine::new(args.rate, args.term_years);
    let result = engine.check_affordability(args.price, &profile);
    Ok(serde_json::to_value(result)?)
}
