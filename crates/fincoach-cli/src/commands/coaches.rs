use clap::Args;
use serde_json::Value;

use fincoach_core::coach::{CoachCatalog, CoachCategory};

/// Arguments for the coach listing
#[derive(Args)]
pub struct CoachesArgs {
    /// Filter by category (real_estate, auto, credit, ...)
    #[arg(long)]
    pub category: Option<String>,
}

pub fn run(args: CoachesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = CoachCatalog::default();

    let coaches = match args.category.as_deref() {
        Some(raw) => {
            let category: CoachCategory =
                serde_json::from_value(Value::String(raw.to_string()))
                    .map_err(|_| format!("Unknown category '{raw}'"))?;
            catalog.by_category(category)
        }
        None => catalog.all_active(),
    };

    Ok(serde_json::to_value(coaches)?)
}
