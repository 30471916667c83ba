use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::profile::FinancialProfile;
use crate::types::{fmt_usd, Money, Rate, MAX_BACK_END_DTI, MAX_FRONT_END_RATIO};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Lending guidelines the affordability predicate tests against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LendingGuidelines {
    pub max_dti: Decimal,
    pub max_front_end_ratio: Decimal,
    pub down_payment_percent: Decimal,
}

impl Default for LendingGuidelines {
    fn default() -> Self {
        Self {
            max_dti: MAX_BACK_END_DTI,
            max_front_end_ratio: MAX_FRONT_END_RATIO,
            down_payment_percent: dec!(20.0),
        }
    }
}

/// Mortgage-qualification analysis for a target home price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub home_price: Money,
    pub is_affordable: bool,
    pub dti: Option<Decimal>,
    pub front_end_ratio: Option<Decimal>,
    pub monthly_payment: Money,
    pub monthly_principal_interest: Money,
    pub monthly_taxes_insurance: Money,
    pub required_down_payment: Money,
    pub can_afford_down_payment: bool,
    pub current_savings: Money,
    pub max_affordable_home_price: Money,
    pub loan_amount: Money,
    pub reasoning: String,
    pub guidelines: LendingGuidelines,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Affordability engine with fixed mortgage assumptions.
///
/// Stateless aside from construction-time configuration; safe to share and
/// call concurrently.
#[derive(Debug, Clone)]
pub struct AffordabilityEngine {
    annual_rate: Rate,
    loan_term_years: u32,
    monthly_rate: Rate,
    num_payments: u32,
}

impl Default for AffordabilityEngine {
    /// 6.5% annual rate over a 30-year term.
    fn default() -> Self {
        Self::new(dec!(0.065), 30)
    }
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

impl AffordabilityEngine {
    pub fn new(annual_rate: Rate, loan_term_years: u32) -> Self {
        Self {
            annual_rate,
            loan_term_years,
            monthly_rate: annual_rate / dec!(12),
            num_payments: loan_term_years * 12,
        }
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    pub fn loan_term_years(&self) -> u32 {
        self.loan_term_years
    }

    /// Check whether `home_price` is affordable for the given profile.
    ///
    /// Tests three guidelines, all of which must hold: back-end DTI <= 43%,
    /// front-end ratio <= 28%, and savings covering a 20% down payment.
    pub fn check_affordability(
        &self,
        home_price: Money,
        profile: &FinancialProfile,
    ) -> AffordabilityResult {
        let monthly_income = profile.income.monthly_gross;
        let savings = profile.savings.total;

        if monthly_income.is_zero() {
            return AffordabilityResult {
                home_price: home_price.round_dp(2),
                is_affordable: false,
                dti: None,
                front_end_ratio: None,
                monthly_payment: Decimal::ZERO,
                monthly_principal_interest: Decimal::ZERO,
                monthly_taxes_insurance: Decimal::ZERO,
                required_down_payment: Decimal::ZERO,
                can_afford_down_payment: false,
                current_savings: savings.round_dp(2),
                max_affordable_home_price: Decimal::ZERO,
                loan_amount: Decimal::ZERO,
                reasoning: String::new(),
                guidelines: LendingGuidelines::default(),
                error: Some(
                    "Monthly income is required for affordability calculation".to_string(),
                ),
            };
        }

        // 20% down to avoid PMI
        let required_down_payment = home_price * dec!(0.20);
        let loan_amount = home_price - required_down_payment;

        let monthly_pi = self.monthly_payment(loan_amount);

        // Estimated taxes and insurance: 1.2% of home value annually
        let monthly_taxes_insurance = home_price * dec!(0.012) / dec!(12);
        let total_monthly_payment = monthly_pi + monthly_taxes_insurance;

        let monthly_debts = profile.total_monthly_debt_payments();
        let total_monthly_obligations = total_monthly_payment + monthly_debts;

        let dti = total_monthly_obligations / monthly_income * dec!(100);
        let front_end_ratio = total_monthly_payment / monthly_income * dec!(100);

        let can_afford_down_payment = savings >= required_down_payment;
        let is_affordable =
            dti <= MAX_BACK_END_DTI && front_end_ratio <= MAX_FRONT_END_RATIO && can_afford_down_payment;

        // Max affordable price from the front-end budget, inverted PMT
        let max_monthly_payment = monthly_income * dec!(0.28) - monthly_debts;
        let max_home_price = if max_monthly_payment > Decimal::ZERO {
            self.max_loan(max_monthly_payment) / dec!(0.80)
        } else {
            Decimal::ZERO
        };

        let mut reasons: Vec<String> = Vec::new();
        if dti > MAX_BACK_END_DTI {
            reasons.push(format!("DTI of {:.1}% exceeds 43% guideline", dti));
        }
        if front_end_ratio > MAX_FRONT_END_RATIO {
            reasons.push(format!(
                "Front-end ratio of {:.1}% exceeds 28% guideline",
                front_end_ratio
            ));
        }
        if !can_afford_down_payment {
            reasons.push(format!(
                "Insufficient savings (need {}, have {})",
                fmt_usd(required_down_payment),
                fmt_usd(savings)
            ));
        }
        let reasoning = if reasons.is_empty() {
            "Meets all affordability criteria".to_string()
        } else {
            reasons.join("; ")
        };

        AffordabilityResult {
            home_price: home_price.round_dp(2),
            is_affordable,
            dti: Some(dti.round_dp(2)),
            front_end_ratio: Some(front_end_ratio.round_dp(2)),
            monthly_payment: total_monthly_payment.round_dp(2),
            monthly_principal_interest: monthly_pi.round_dp(2),
            monthly_taxes_insurance: monthly_taxes_insurance.round_dp(2),
            required_down_payment: required_down_payment.round_dp(2),
            can_afford_down_payment,
            current_savings: savings.round_dp(2),
            max_affordable_home_price: max_home_price.round_dp(2),
            loan_amount: loan_amount.round_dp(2),
            reasoning,
            guidelines: LendingGuidelines::default(),
            error: None,
        }
    }

    /// Monthly P&I via the standard amortization formula:
    /// PMT = L * r(1+r)^n / ((1+r)^n - 1).
    fn monthly_payment(&self, loan_amount: Money) -> Money {
        if loan_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        if self.monthly_rate.is_zero() {
            return loan_amount / Decimal::from(self.num_payments);
        }
        let growth = compound(self.monthly_rate, self.num_payments);
        loan_amount * (self.monthly_rate * growth) / (growth - Decimal::ONE)
    }

    /// Invert the PMT formula to get the loan a given payment supports.
    fn max_loan(&self, max_monthly_payment: Money) -> Money {
        if max_monthly_payment <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        if self.monthly_rate.is_zero() {
            return max_monthly_payment * Decimal::from(self.num_payments);
        }
        let growth = compound(self.monthly_rate, self.num_payments);
        max_monthly_payment * (growth - Decimal::ONE) / (self.monthly_rate * growth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Debt, Income, Savings};
    use pretty_assertions::assert_eq;

    fn profile(
        monthly_gross: Decimal,
        savings_total: Decimal,
        debt_payment: Decimal,
    ) -> FinancialProfile {
        let debts = if debt_payment.is_zero() {
            vec![]
        } else {
            vec![Debt {
                kind: "auto_loan".to_string(),
                balance: dec!(12_000),
                monthly_payment: debt_payment,
                interest_rate: dec!(4.2),
            }]
        };
        FinancialProfile {
            income: Income {
                monthly_gross,
                employment_length_months: 36,
            },
            debts,
            savings: Savings {
                total: savings_total,
                monthly_savings_rate: dec!(1000),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_down_payment_shortfall_blocks_affordability() {
        // $400k home needs $80k down; only $20.5k saved
        let engine = AffordabilityEngine::default();
        let result = engine.check_affordability(dec!(400_000), &profile(dec!(7500), dec!(20_500), dec!(0)));

        assert_eq!(result.required_down_payment, dec!(80_000));
        assert!(!result.can_afford_down_payment);
        assert!(!result.is_affordable);
        assert!(result
            .reasoning
            .contains("Insufficient savings (need $80,000, have $20,500)"));
    }

    #[test]
    fn test_zero_income_degrades_to_error_result() {
        let engine = AffordabilityEngine::default();
        let result = engine.check_affordability(dec!(400_000), &profile(dec!(0), dec!(50_000), dec!(0)));

        assert!(!result.is_affordable);
        assert_eq!(result.dti, None);
        assert!(result.error.as_deref().unwrap().contains("Monthly income"));
    }

    #[test]
    fn test_zero_rate_payment_is_straight_line() {
        // 0% over 30 years: PMT = 320_000 / 360
        let engine = AffordabilityEngine::new(dec!(0), 30);
        let result = engine.check_affordability(dec!(400_000), &profile(dec!(20_000), dec!(100_000), dec!(0)));

        let expected = (dec!(320_000) / dec!(360)).round_dp(2);
        assert_eq!(result.monthly_principal_interest, expected);
    }

    #[test]
    fn test_dti_guideline_boundary_is_strict() {
        // Zero-rate engine for exact arithmetic: price 360_000 ->
        // PMT = 288_000/360 = 800, taxes+ins = 360, housing = 1160.
        // With a 990 debt payment and 5000 income: dti = 2150/5000 = 43.00%
        // exactly, front-end = 23.2%, savings covers the 72k down payment.
        let engine = AffordabilityEngine::new(dec!(0), 30);
        let at_limit =
            engine.check_affordability(dec!(360_000), &profile(dec!(5000), dec!(100_000), dec!(990)));
        assert_eq!(at_limit.dti, Some(dec!(43.00)));
        assert!(at_limit.is_affordable);

        // One cent more of debt pushes dti strictly above 43 -> not affordable
        let above =
            engine.check_affordability(dec!(360_000), &profile(dec!(5000), dec!(100_000), dec!(990.5)));
        assert!(above.dti.unwrap() > dec!(43.0));
        assert!(!above.is_affordable);
        assert!(above.reasoning.contains("exceeds 43% guideline"));
    }

    #[test]
    fn test_front_end_violation_is_named() {
        // Housing alone over 28% of income
        let engine = AffordabilityEngine::default();
        let result = engine.check_affordability(dec!(800_000), &profile(dec!(6000), dec!(500_000), dec!(0)));

        assert!(!result.is_affordable);
        assert!(result.reasoning.contains("exceeds 28% guideline"));
    }

    #[test]
    fn test_meets_all_criteria_message() {
        let engine = AffordabilityEngine::default();
        let result = engine.check_affordability(dec!(200_000), &profile(dec!(12_000), dec!(100_000), dec!(0)));

        assert!(result.is_affordable);
        assert_eq!(result.reasoning, "Meets all affordability criteria");
    }

    #[test]
    fn test_max_price_zero_when_debts_exhaust_budget() {
        // 28% of 5000 = 1400; 2000 of debt payments leaves nothing
        let engine = AffordabilityEngine::default();
        let result = engine.check_affordability(dec!(300_000), &profile(dec!(5000), dec!(100_000), dec!(2000)));

        assert_eq!(result.max_affordable_home_price, Decimal::ZERO);
    }

    #[test]
    fn test_max_loan_inverts_monthly_payment() {
        let engine = AffordabilityEngine::default();
        let loan = dec!(320_000);
        let pmt = engine.monthly_payment(loan);
        let recovered = engine.max_loan(pmt);

        let diff = (recovered - loan).abs();
        assert!(diff < dec!(0.01), "diff={}", diff);
    }

    #[test]
    fn test_degenerate_price_yields_zero_payment() {
        let engine = AffordabilityEngine::default();
        let result = engine.check_affordability(dec!(0), &profile(dec!(7500), dec!(20_000), dec!(0)));

        assert_eq!(result.monthly_principal_interest, Decimal::ZERO);
        assert_eq!(result.loan_amount, Decimal::ZERO);
    }
}
