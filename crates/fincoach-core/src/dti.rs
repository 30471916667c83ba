use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::profile::FinancialProfile;
use crate::types::{Money, MAX_BACK_END_DTI};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Qualitative band for a back-end DTI ratio (inclusive upper bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// One debt echoed back in the breakdown, unmodified and in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtLine {
    #[serde(rename = "type")]
    pub kind: String,
    pub monthly_payment: Money,
    pub balance: Money,
}

/// Back-end debt-to-income analysis.
///
/// `dti` is `None` (with `error` set) when the profile has no monthly income;
/// everything else degrades to zeros rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiResult {
    pub dti: Option<Decimal>,
    pub monthly_income: Money,
    pub total_monthly_debts: Money,
    /// Housing-only ratio; always 0 here (the bare profile carries no
    /// housing payment — the affordability engine computes the real one).
    pub front_end_ratio: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DtiStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub guideline_max: Decimal,
    pub is_within_guidelines: bool,
    pub debt_breakdown: Vec<DebtLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compute the back-end DTI ratio: total monthly debt payments over gross
/// monthly income, as a percentage.
pub fn calculate_dti(profile: &FinancialProfile) -> DtiResult {
    let monthly_income = profile.income.monthly_gross;
    let total_monthly_debts = profile.total_monthly_debt_payments();
    let debt_breakdown: Vec<DebtLine> = profile
        .debts
        .iter()
        .map(|d| DebtLine {
            kind: d.kind.clone(),
            monthly_payment: d.monthly_payment,
            balance: d.balance,
        })
        .collect();

    if monthly_income.is_zero() {
        return DtiResult {
            dti: None,
            monthly_income: Decimal::ZERO,
            total_monthly_debts: total_monthly_debts.round_dp(2),
            front_end_ratio: Decimal::ZERO,
            status: None,
            message: None,
            guideline_max: MAX_BACK_END_DTI,
            is_within_guidelines: false,
            debt_breakdown,
            error: Some("Monthly income is required for DTI calculation".to_string()),
        };
    }

    let dti = total_monthly_debts / monthly_income * dec!(100);

    let (status, message) = if dti <= dec!(36) {
        (
            DtiStatus::Excellent,
            "Your DTI is excellent. You're in great shape for homeownership.",
        )
    } else if dti <= dec!(43) {
        (
            DtiStatus::Good,
            "Your DTI is within acceptable limits for most lenders.",
        )
    } else if dti <= dec!(50) {
        (
            DtiStatus::Fair,
            "Your DTI is on the higher side. Consider reducing debt before applying.",
        )
    } else {
        (
            DtiStatus::Poor,
            "Your DTI is too high. Focus on paying down debt first.",
        )
    };

    DtiResult {
        dti: Some(dti.round_dp(2)),
        monthly_income: monthly_income.round_dp(2),
        total_monthly_debts: total_monthly_debts.round_dp(2),
        front_end_ratio: Decimal::ZERO,
        status: Some(status),
        message: Some(message.to_string()),
        guideline_max: MAX_BACK_END_DTI,
        is_within_guidelines: dti <= MAX_BACK_END_DTI,
        debt_breakdown,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Debt, Income};
    use pretty_assertions::assert_eq;

    fn profile_with_debts(monthly_gross: Decimal, payments: &[Decimal]) -> FinancialProfile {
        FinancialProfile {
            income: Income {
                monthly_gross,
                employment_length_months: 36,
            },
            debts: payments
                .iter()
                .map(|p| Debt {
                    kind: "loan".to_string(),
                    balance: dec!(10_000),
                    monthly_payment: *p,
                    interest_rate: dec!(5.0),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sample_profile_is_excellent() {
        // (350 + 450) / 7500 * 100 = 10.67
        let profile = profile_with_debts(dec!(7500), &[dec!(350), dec!(450)]);
        let result = calculate_dti(&profile);

        assert_eq!(result.dti, Some(dec!(10.67)));
        assert_eq!(result.status, Some(DtiStatus::Excellent));
        assert_eq!(result.total_monthly_debts, dec!(800));
        assert!(result.is_within_guidelines);
        assert_eq!(result.debt_breakdown.len(), 2);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_zero_income_degrades_to_error_result() {
        let profile = profile_with_debts(Decimal::ZERO, &[dec!(500)]);
        let result = calculate_dti(&profile);

        assert_eq!(result.dti, None);
        assert_eq!(result.status, None);
        assert!(!result.is_within_guidelines);
        assert!(result.error.as_deref().unwrap().contains("Monthly income"));
        // Breakdown is still echoed so callers can display it
        assert_eq!(result.debt_breakdown.len(), 1);
    }

    #[test]
    fn test_status_band_boundaries_are_inclusive() {
        let cases = [
            (dec!(3600), DtiStatus::Excellent), // exactly 36
            (dec!(3601), DtiStatus::Good),
            (dec!(4300), DtiStatus::Good), // exactly 43
            (dec!(4301), DtiStatus::Fair),
            (dec!(5000), DtiStatus::Fair), // exactly 50
            (dec!(5001), DtiStatus::Poor),
        ];
        for (payment, expected) in cases {
            let profile = profile_with_debts(dec!(10_000), &[payment]);
            let result = calculate_dti(&profile);
            assert_eq!(result.status, Some(expected), "payment {payment}");
        }
    }

    #[test]
    fn test_guideline_flag_is_strict_above_43() {
        let at_limit = calculate_dti(&profile_with_debts(dec!(10_000), &[dec!(4300)]));
        assert!(at_limit.is_within_guidelines);

        let above = calculate_dti(&profile_with_debts(dec!(10_000), &[dec!(4300.01)]));
        assert!(!above.is_within_guidelines);
    }

    #[test]
    fn test_dti_monotonic_in_debt_payment() {
        let mut last = Decimal::ZERO;
        for payment in [dec!(0), dec!(100), dec!(350), dec!(900), dec!(4500)] {
            let profile = profile_with_debts(dec!(7500), &[payment, dec!(450)]);
            let dti = calculate_dti(&profile).dti.unwrap();
            assert!(dti >= last, "dti decreased: {dti} < {last}");
            last = dti;
        }
    }

    #[test]
    fn test_no_debts_is_zero_dti() {
        let profile = profile_with_debts(dec!(7500), &[]);
        let result = calculate_dti(&profile);
        assert_eq!(result.dti, Some(Decimal::ZERO.round_dp(2)));
        assert_eq!(result.status, Some(DtiStatus::Excellent));
    }
}
