use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::profile::FinancialProfile;
use crate::types::Money;

/// Fixed savings target used for the savings factor: a 20% down payment on a
/// $400k home. A simplifying constant, not derived from the user's target.
pub const TARGET_DOWN_PAYMENT: Decimal = dec!(80_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiFactor {
    pub points: u32,
    pub max_points: u32,
    pub current_dti: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditFactor {
    pub points: u32,
    pub max_points: u32,
    pub current_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsFactor {
    pub points: u32,
    pub max_points: u32,
    pub current_savings: Money,
    pub target_down_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmploymentFactor {
    pub points: u32,
    pub max_points: u32,
    pub employment_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessBreakdown {
    pub dti_score: DtiFactor,
    pub credit_score: CreditFactor,
    pub savings_score: SavingsFactor,
    pub employment_score: EmploymentFactor,
}

/// Composite 0-100 homeownership-readiness score with per-factor breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResult {
    pub readiness_score: u32,
    pub level: ReadinessLevel,
    pub message: String,
    pub breakdown: ReadinessBreakdown,
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Score homeownership readiness from four weighted factors:
/// DTI (40), credit (30), savings (20), employment tenure (10).
///
/// Zero income is scored as DTI = 100 (worst band) rather than reported as an
/// error: the composite score must exist for any profile. This intentionally
/// diverges from the standalone DTI engine's error result.
pub fn calculate_readiness(profile: &FinancialProfile) -> ReadinessResult {
    let monthly_income = profile.income.monthly_gross;
    let credit_score = profile.credit.score;
    let total_savings = profile.savings.total;
    let employment_months = profile.income.employment_length_months;

    // DTI factor (40 points max)
    let monthly_debts = profile.total_monthly_debt_payments();
    let dti = if monthly_income > Decimal::ZERO {
        monthly_debts / monthly_income * dec!(100)
    } else {
        dec!(100)
    };
    let dti_points: u32 = if dti <= dec!(36) {
        40
    } else if dti <= dec!(43) {
        35
    } else if dti <= dec!(50) {
        25
    } else if dti <= dec!(60) {
        15
    } else {
        5
    };

    // Credit factor (30 points max)
    let credit_points: u32 = if credit_score >= 760 {
        30
    } else if credit_score >= 720 {
        25
    } else if credit_score >= 680 {
        20
    } else if credit_score >= 640 {
        15
    } else if credit_score >= 600 {
        10
    } else {
        5
    };

    // Savings factor (20 points max), truncated toward zero
    let savings_ratio = (total_savings / TARGET_DOWN_PAYMENT).min(Decimal::ONE);
    let savings_points = (savings_ratio * dec!(20)).trunc().to_u32().unwrap_or(0);

    // Employment factor (10 points max)
    let employment_points: u32 = if employment_months >= 24 {
        10
    } else if employment_months >= 12 {
        7
    } else if employment_months >= 6 {
        5
    } else {
        2
    };

    let total = dti_points + credit_points + savings_points + employment_points;

    let (level, message) = if total >= 80 {
        (
            ReadinessLevel::Excellent,
            "You're in excellent shape for homeownership!",
        )
    } else if total >= 65 {
        (
            ReadinessLevel::Good,
            "You're in good shape, with some areas to improve.",
        )
    } else if total >= 50 {
        (
            ReadinessLevel::Fair,
            "You're making progress, but there's work to do.",
        )
    } else {
        (
            ReadinessLevel::NeedsImprovement,
            "Focus on improving your financial foundation first.",
        )
    };

    ReadinessResult {
        readiness_score: total,
        level,
        message: message.to_string(),
        breakdown: ReadinessBreakdown {
            dti_score: DtiFactor {
                points: dti_points,
                max_points: 40,
                current_dti: dti.round_dp(2),
            },
            credit_score: CreditFactor {
                points: credit_points,
                max_points: 30,
                current_score: credit_score,
            },
            savings_score: SavingsFactor {
                points: savings_points,
                max_points: 20,
                current_savings: total_savings.round_dp(2),
                target_down_payment: TARGET_DOWN_PAYMENT,
            },
            employment_score: EmploymentFactor {
                points: employment_points,
                max_points: 10,
                employment_months,
            },
        },
        recommendations: recommendations(
            dti_points,
            credit_points,
            savings_points,
            employment_points,
        ),
    }
}

fn recommendations(
    dti_points: u32,
    credit_points: u32,
    savings_points: u32,
    employment_points: u32,
) -> Vec<String> {
    let mut recs = Vec::new();

    if dti_points < 30 {
        recs.push("Focus on reducing your debt-to-income ratio by paying down debts".to_string());
    }
    if credit_points < 20 {
        recs.push("Work on improving your credit score through on-time payments".to_string());
    }
    if savings_points < 15 {
        recs.push("Increase your savings rate to build a larger down payment".to_string());
    }
    if employment_points < 7 {
        recs.push("Build employment history - most lenders prefer 2+ years".to_string());
    }

    if recs.is_empty() {
        recs.push("Keep up the great work! You're on track for homeownership.".to_string());
    }
    recs
}
