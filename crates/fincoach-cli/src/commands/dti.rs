use clap::Args;
use serde_json::Value;

use fincoach_core::dti;

use crate::input;

/// Arguments for the DTI calculation
#[derive(Args)]
pub struct DtiArgs {
    /// Path to a FinancialProfile JSON file (or pipe via stdin)
    #[arg(long)]
    pub profile: Option<String>,
}

pub fn run(args: DtiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = input::load_profile(args.profile.as_deref())?;
    let result = dti::calculate_dti(&profile);
    Ok(serde_json::to_value(result)?)
}
