use clap::Args;
use serde_json::Value;

use fincoach_core::action_plan;

use crate::input;

/// Arguments for action-plan generation
#[derive(Args)]
pub struct PlanArgs {
    /// Path to a FinancialProfile JSON file (or pipe via stdin)
    #[arg(long)]
    pub profile: Option<String>,

    /// Goal label for the plan
    #[arg(long, default_value = "homeownership")]
    pub goal: String,
}

pub fn run(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = input::load_profile(args.profile.as_deref())?;
    let result = action_plan::build_action_plan(&profile, Some(&args.goal));
    Ok(serde_json::to_value(result)?)
}
