use clap::Args;
use serde_json::Value;

use fincoach_core::readiness;

use crate::input;

/// Arguments for the readiness score
#[derive(Args)]
pub struct ReadinessArgs {
    /// Path to a FinancialProfile JSON file (or pipe via stdin)
    #[arg(long)]
    pub profile: Option<String>,
}

pub fn run(args: ReadinessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = input::load_profile(args.profile.as_deref())?;
    let result = readiness::calculate_readiness(&profile);
    Ok(serde_json::to_value(result)?)
}
