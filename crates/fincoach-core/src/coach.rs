use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachCategory {
    RealEstate,
    Auto,
    Credit,
    Mortgage,
    HomeServices,
    Insurance,
}

/// A third-party-branded advisory persona in the marketplace.
///
/// Only the data contract matters to this crate: `required_data` is the field
/// list the consent ledger validates grant requests against. The persona's
/// conversational behavior lives in the orchestration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: CoachCategory,
    pub powered_by: String,
    pub icon: String,
    pub required_data: Vec<String>,
    pub capabilities: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Explicitly constructed coach registry; injected wherever persona lookups
/// are needed instead of living as a process-wide global.
#[derive(Debug, Clone)]
pub struct CoachCatalog {
    coaches: Vec<Coach>,
}

impl Default for CoachCatalog {
    /// The three built-in marketplace personas.
    fn default() -> Self {
        Self::new(vec![
            Coach {
                id: "zillow_coach".to_string(),
                name: "Zillow Coach".to_string(),
                description: "Get personalized property recommendations, neighborhood \
                              insights, and home value estimates powered by Zillow's \
                              real estate data."
                    .to_string(),
                category: CoachCategory::RealEstate,
                powered_by: "Zillow.com".to_string(),
                icon: "🏠".to_string(),
                required_data: vec![
                    "income".to_string(),
                    "savings".to_string(),
                    "credit_score".to_string(),
                    "affordability_range".to_string(),
                ],
                capabilities: vec![
                    "Property search".to_string(),
                    "Neighborhood analysis".to_string(),
                    "Home value estimates".to_string(),
                    "Market trends".to_string(),
                    "School district info".to_string(),
                ],
                is_active: true,
            },
            Coach {
                id: "carmax_coach".to_string(),
                name: "CarMax Coach".to_string(),
                description: "Find the perfect car within your budget, get pre-approved \
                              for auto loans, and explore financing options powered by \
                              CarMax."
                    .to_string(),
                category: CoachCategory::Auto,
                powered_by: "CarMax.com".to_string(),
                icon: "🚗".to_string(),
                required_data: vec![
                    "income".to_string(),
                    "credit_score".to_string(),
                    "monthly_budget".to_string(),
                ],
                capabilities: vec![
                    "Car search".to_string(),
                    "Auto loan pre-approval".to_string(),
                    "Financing options".to_string(),
                    "Trade-in estimates".to_string(),
                    "Vehicle recommendations".to_string(),
                ],
                is_active: true,
            },
            Coach {
                id: "credit_karma_coach".to_string(),
                name: "Credit Karma Coach".to_string(),
                description: "Understand, monitor, and improve your credit score with \
                              personalized recommendations, credit card matches, and \
                              credit building strategies powered by Credit Karma."
                    .to_string(),
                category: CoachCategory::Credit,
                powered_by: "CreditKarma.com".to_string(),
                icon: "💳".to_string(),
                required_data: vec![
                    "credit_score".to_string(),
                    "credit_utilization".to_string(),
                    "credit_history".to_string(),
                ],
                capabilities: vec![
                    "Credit score analysis".to_string(),
                    "Credit card recommendations".to_string(),
                    "Credit building strategies".to_string(),
                    "Credit report insights".to_string(),
                    "Debt consolidation advice".to_string(),
                ],
                is_active: true,
            },
        ])
    }
}

impl CoachCatalog {
    pub fn new(coaches: Vec<Coach>) -> Self {
        Self { coaches }
    }

    pub fn get(&self, coach_id: &str) -> Option<&Coach> {
        self.coaches.iter().find(|c| c.id == coach_id)
    }

    pub fn all_active(&self) -> Vec<&Coach> {
        self.coaches.iter().filter(|c| c.is_active).collect()
    }

    pub fn by_category(&self, category: CoachCategory) -> Vec<&Coach> {
        self.coaches
            .iter()
            .filter(|c| c.category == category && c.is_active)
            .collect()
    }
}
