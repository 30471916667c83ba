use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::dti::calculate_dti;
use crate::profile::FinancialProfile;
use crate::readiness::{calculate_readiness, ReadinessLevel, TARGET_DOWN_PAYMENT};
use crate::types::fmt_usd;

/// Every plan spans a fixed 18-month horizon.
pub const PLAN_TIMELINE_MONTHS: u32 = 18;

const TARGET_MONTHLY_SAVINGS: Decimal = dec!(3000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStatus {
    pub readiness_score: u32,
    pub level: ReadinessLevel,
    pub dti: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityAction {
    pub action: String,
    pub priority: ActionPriority,
    pub description: String,
    pub target: String,
    pub timeline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyGoal {
    pub month: String,
    pub goal: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub milestone: String,
    pub target: String,
    pub status: MilestoneStatus,
}

/// A prioritized, time-phased plan derived from readiness and DTI results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPlan {
    pub goal: String,
    pub current_status: CurrentStatus,
    pub timeline_months: u32,
    pub priority_actions: Vec<PriorityAction>,
    pub monthly_goals: Vec<MonthlyGoal>,
    pub milestones: Vec<Milestone>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compose an action plan from the readiness breakdown and the DTI result.
///
/// Milestones are created `pending`; transitioning them is the caller's
/// responsibility, never the composer's.
pub fn build_action_plan(profile: &FinancialProfile, goal: Option<&str>) -> ActionPlan {
    let readiness = calculate_readiness(profile);
    let dti_result = calculate_dti(profile);
    let dti = dti_result.dti.unwrap_or_default();

    let breakdown = &readiness.breakdown;
    let mut priority_actions = Vec::new();

    if breakdown.savings_score.points < 15 {
        priority_actions.push(PriorityAction {
            action: "Increase Monthly Savings".to_string(),
            priority: ActionPriority::High,
            description: format!(
                "Current savings: {}. Target: {} down payment.",
                fmt_usd(profile.savings.total),
                fmt_usd(TARGET_DOWN_PAYMENT)
            ),
            target: "Save $3,000+ per month".to_string(),
            timeline: "6-12 months".to_string(),
        });
    }

    if breakdown.dti_score.points < 30 {
        priority_actions.push(PriorityAction {
            action: "Reduce Debt-to-Income Ratio".to_string(),
            priority: ActionPriority::High,
            description: format!("Current DTI: {:.1}%. Target: <36%.", dti),
            target: "Pay down high-interest debt first".to_string(),
            timeline: "3-6 months".to_string(),
        });
    }

    if breakdown.credit_score.points < 20 {
        priority_actions.push(PriorityAction {
            action: "Improve Credit Score".to_string(),
            priority: ActionPriority::Medium,
            description: format!("Current score: {}. Target: 760+.", profile.credit.score),
            target: "Make all payments on time, reduce credit utilization".to_string(),
            timeline: "6-12 months".to_string(),
        });
    }

    let mut monthly_goals = Vec::new();
    let monthly_savings = profile.savings.monthly_savings_rate;
    if monthly_savings < TARGET_MONTHLY_SAVINGS {
        monthly_goals.push(MonthlyGoal {
            month: "Next 3 months".to_string(),
            goal: format!(
                "Increase savings rate from {}/month to {}/month",
                fmt_usd(monthly_savings),
                fmt_usd(TARGET_MONTHLY_SAVINGS)
            ),
            actions: vec![
                "Review monthly expenses and cut non-essentials".to_string(),
                "Set up automatic transfers to savings".to_string(),
                "Consider a side income source".to_string(),
            ],
        });
    }

    let milestones = vec![
        Milestone {
            milestone: "Month 3".to_string(),
            target: "DTI below 40%".to_string(),
            status: MilestoneStatus::Pending,
        },
        Milestone {
            milestone: "Month 6".to_string(),
            target: "$30,000 in savings".to_string(),
            status: MilestoneStatus::Pending,
        },
        Milestone {
            milestone: "Month 12".to_string(),
            target: "Credit score 740+".to_string(),
            status: MilestoneStatus::Pending,
        },
        Milestone {
            milestone: "Month 18".to_string(),
            target: "Ready to apply for mortgage".to_string(),
            status: MilestoneStatus::Pending,
        },
    ];

    ActionPlan {
        goal: goal.unwrap_or("homeownership").to_string(),
        current_status: CurrentStatus {
            readiness_score: readiness.readiness_score,
            level: readiness.level,
            dti,
        },
        timeline_months: PLAN_TIMELINE_MONTHS,
        priority_actions,
        monthly_goals,
        milestones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Credit, Debt, Income, Savings};
    use pretty_assertions::assert_eq;

    fn weak_profile() -> FinancialProfile {
        FinancialProfile {
            income: Income {
                monthly_gross: dec!(3000),
                employment_length_months: 8,
            },
            debts: vec![Debt {
                kind: "credit_card".to_string(),
                balance: dec!(15_000),
                monthly_payment: dec!(1500),
                interest_rate: dec!(22.0),
            }],
            savings: Savings {
                total: dec!(5000),
                monthly_savings_rate: dec!(500),
            },
            credit: Credit { score: 620 },
            ..Default::default()
        }
    }

    fn strong_profile() -> FinancialProfile {
        FinancialProfile {
            income: Income {
                monthly_gross: dec!(10_000),
                employment_length_months: 48,
            },
            debts: vec![],
            savings: Savings {
                total: dec!(100_000),
                monthly_savings_rate: dec!(4000),
            },
            credit: Credit { score: 780 },
            ..Default::default()
        }
    }

    #[test]
    fn test_weak_profile_gets_all_three_priority_actions() {
        let plan = build_action_plan(&weak_profile(), None);

        let actions: Vec<&str> = plan
            .priority_actions
            .iter()
            .map(|a| a.action.as_str())
            .collect();
        assert_eq!(
            actions,
            vec![
                "Increase Monthly Savings",
                "Reduce Debt-to-Income Ratio",
                "Improve Credit Score"
            ]
        );
        assert_eq!(plan.priority_actions[0].priority, ActionPriority::High);
        assert_eq!(plan.priority_actions[2].priority, ActionPriority::Medium);

        // Descriptions interpolate the current figures
        assert_eq!(
            plan.priority_actions[0].description,
            "Current savings: $5,000. Target: $80,000 down payment."
        );
        assert_eq!(
            plan.priority_actions[1].description,
            "Current DTI: 50.0%. Target: <36%."
        );
        assert_eq!(
            plan.priority_actions[2].description,
            "Current score: 620. Target: 760+."
        );
    }

    #[test]
    fn test_strong_profile_gets_no_actions_or_goals() {
        let plan = build_action_plan(&strong_profile(), None);

        assert!(plan.priority_actions.is_empty());
        assert!(plan.monthly_goals.is_empty());
        assert_eq!(plan.current_status.readiness_score, 100);
    }

    #[test]
    fn test_monthly_goal_below_savings_target() {
        let plan = build_action_plan(&weak_profile(), None);

        assert_eq!(plan.monthly_goals.len(), 1);
        let goal = &plan.monthly_goals[0];
        assert_eq!(goal.month, "Next 3 months");
        assert_eq!(
            goal.goal,
            "Increase savings rate from $500/month to $3,000/month"
        );
        assert_eq!(goal.actions.len(), 3);
    }

    #[test]
    fn test_milestones_are_fixed_and_pending() {
        let plan = build_action_plan(&weak_profile(), None);

        assert_eq!(plan.timeline_months, 18);
        assert_eq!(plan.milestones.len(), 4);
        let labels: Vec<&str> = plan.milestones.iter().map(|m| m.milestone.as_str()).collect();
        assert_eq!(labels, vec!["Month 3", "Month 6", "Month 12", "Month 18"]);
        assert!(plan
            .milestones
            .iter()
            .all(|m| m.status == MilestoneStatus::Pending));
    }

    #[test]
    fn test_goal_label_defaults_to_homeownership() {
        assert_eq!(build_action_plan(&weak_profile(), None).goal, "homeownership");
        assert_eq!(
            build_action_plan(&weak_profile(), Some("first_home")).goal,
            "first_home"
        );
    }

    #[test]
    fn test_status_dti_matches_dti_engine() {
        let profile = weak_profile();
        let plan = build_action_plan(&profile, None);
        let dti = crate::dti::calculate_dti(&profile).dti.unwrap();
        assert_eq!(plan.current_status.dti, dti);
    }
}
