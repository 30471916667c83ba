use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::FinancialProfile;
use crate::types::Money;

/// Peer benchmark spending, as fractions of monthly income. Typical patterns
/// for first-time home buyers.
const PEER_BENCHMARKS: [(&str, Decimal); 6] = [
    ("dining", dec!(0.05)),
    ("shopping", dec!(0.08)),
    ("entertainment", dec!(0.03)),
    ("groceries", dec!(0.10)),
    ("utilities", dec!(0.04)),
    ("rent", dec!(0.30)),
];

/// Spending more than 20% above the peer benchmark raises an alert.
const OVER_BUDGET_FACTOR: Decimal = dec!(1.2);

fn benchmark_for(category: &str) -> Option<Decimal> {
    PEER_BENCHMARKS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, fraction)| *fraction)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
}

/// Per-category comparison against the peer benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerComparison {
    pub your_spending: Money,
    pub peer_average: Money,
    pub variance: Money,
    pub variance_percentage: Decimal,
    pub is_over_budget: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverspendingAlert {
    pub category: String,
    pub your_monthly: Money,
    pub peer_average: Money,
    pub over_by: Money,
    pub over_by_percentage: Decimal,
    /// Annualized savings from returning to the benchmark.
    pub potential_savings: Money,
    pub severity: AlertSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    pub monthly_average: Money,
}

/// Windowed spending analysis anchored to the most recent transaction date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionAnalysisResult {
    pub analysis_period_months: u32,
    pub total_transactions_analyzed: usize,
    pub average_monthly_income: Money,
    pub total_monthly_spending: Money,
    pub monthly_savings: Money,
    pub savings_rate_percentage: Decimal,
    pub spending_by_category: BTreeMap<String, Money>,
    pub top_spending_categories: Vec<CategorySpend>,
    pub peer_comparisons: BTreeMap<String, PeerComparison>,
    pub overspending_alerts: Vec<OverspendingAlert>,
    pub recommendations: Vec<String>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionAnalysisResult {
    fn empty_with_error(months: u32, error: &str) -> Self {
        Self {
            analysis_period_months: months,
            total_transactions_analyzed: 0,
            average_monthly_income: Decimal::ZERO,
            total_monthly_spending: Decimal::ZERO,
            monthly_savings: Decimal::ZERO,
            savings_rate_percentage: Decimal::ZERO,
            spending_by_category: BTreeMap::new(),
            top_spending_categories: Vec::new(),
            peer_comparisons: BTreeMap::new(),
            overspending_alerts: Vec::new(),
            recommendations: Vec::new(),
            summary: String::new(),
            error: Some(error.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Analyze spending over the trailing `months`-month window.
///
/// The window is anchored to the most recent transaction date rather than
/// wall-clock time, so results are deterministic for fixture data with
/// arbitrary historical dates.
pub fn analyze_transactions(profile: &FinancialProfile, months: u32) -> TransactionAnalysisResult {
    let months = months.max(1);
    let monthly_income = profile.income.monthly_gross;

    if profile.transactions.is_empty() || monthly_income.is_zero() {
        return TransactionAnalysisResult::empty_with_error(
            months,
            "Insufficient transaction data or income information",
        );
    }

    let most_recent = profile
        .transactions
        .iter()
        .map(|t| t.date)
        .max()
        .unwrap_or_default();
    let cutoff = most_recent - Duration::days(i64::from(months) * 30);
    let recent: Vec<_> = profile
        .transactions
        .iter()
        .filter(|t| t.date >= cutoff)
        .collect();

    let months_dec = Decimal::from(months);

    // Income side: window average, or the stated gross (not divided) when the
    // window has no income transactions at all.
    let income_total: Decimal = recent
        .iter()
        .filter(|t| t.amount > Decimal::ZERO)
        .map(|t| t.amount)
        .sum();
    let has_income_txns = recent.iter().any(|t| t.amount > Decimal::ZERO);
    let avg_monthly_income = if has_income_txns {
        income_total / months_dec
    } else {
        monthly_income
    };

    // Expense side: per-category monthly averages, first-seen order preserved
    // for the top-5 tie-break.
    let mut category_spending: Vec<(String, Money)> = Vec::new();
    for t in recent.iter().filter(|t| t.amount < Decimal::ZERO) {
        let amount = t.amount.abs();
        match category_spending.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, total)) => *total += amount,
            None => category_spending.push((t.category.clone(), amount)),
        }
    }
    let monthly_by_category: Vec<(String, Money)> = category_spending
        .into_iter()
        .map(|(cat, total)| (cat, total / months_dec))
        .collect();
    let total_monthly_spending: Money = monthly_by_category.iter().map(|(_, m)| *m).sum();

    // Peer comparisons and overspending alerts
    let mut peer_comparisons = BTreeMap::new();
    let mut overspending_alerts = Vec::new();
    for (category, monthly_spend) in &monthly_by_category {
        let Some(benchmark_fraction) = benchmark_for(category) else {
            continue;
        };
        let benchmark_amount = avg_monthly_income * benchmark_fraction;
        let variance = monthly_spend - benchmark_amount;
        let variance_pct = if benchmark_amount > Decimal::ZERO {
            variance / benchmark_amount * dec!(100)
        } else {
            Decimal::ZERO
        };
        let is_over_budget = *monthly_spend > benchmark_amount * OVER_BUDGET_FACTOR;

        peer_comparisons.insert(
            category.clone(),
            PeerComparison {
                your_spending: monthly_spend.round_dp(2),
                peer_average: benchmark_amount.round_dp(2),
                variance: variance.round_dp(2),
                variance_percentage: variance_pct.round_dp(1),
                is_over_budget,
            },
        );

        if is_over_budget {
            overspending_alerts.push(OverspendingAlert {
                category: category.clone(),
                your_monthly: monthly_spend.round_dp(2),
                peer_average: benchmark_amount.round_dp(2),
                over_by: (monthly_spend - benchmark_amount).round_dp(2),
                over_by_percentage: variance_pct.round_dp(1),
                potential_savings: ((monthly_spend - benchmark_amount) * dec!(12)).round_dp(2),
                severity: if variance_pct > dec!(50) {
                    AlertSeverity::High
                } else {
                    AlertSeverity::Medium
                },
            });
        }
    }

    let savings_rate = if avg_monthly_income > Decimal::ZERO {
        (avg_monthly_income - total_monthly_spending) / avg_monthly_income * dec!(100)
    } else {
        Decimal::ZERO
    };

    // Top 5 categories by monthly spend; stable sort keeps first-seen order
    // for ties.
    let mut top: Vec<(String, Money)> = monthly_by_category.clone();
    top.sort_by(|a, b| b.1.cmp(&a.1));
    let top_spending_categories: Vec<CategorySpend> = top
        .into_iter()
        .take(5)
        .map(|(category, monthly)| CategorySpend {
            category,
            monthly_average: monthly.round_dp(2),
        })
        .collect();

    let recommendations = build_recommendations(
        &overspending_alerts,
        savings_rate,
        &monthly_by_category,
        avg_monthly_income,
    );
    let summary = build_summary(&overspending_alerts, savings_rate);

    TransactionAnalysisResult {
        analysis_period_months: months,
        total_transactions_analyzed: recent.len(),
        average_monthly_income: avg_monthly_income.round_dp(2),
        total_monthly_spending: total_monthly_spending.round_dp(2),
        monthly_savings: (avg_monthly_income - total_monthly_spending).round_dp(2),
        savings_rate_percentage: savings_rate.round_dp(1),
        spending_by_category: monthly_by_category
            .iter()
            .map(|(c, m)| (c.clone(), m.round_dp(2)))
            .collect(),
        top_spending_categories,
        peer_comparisons,
        overspending_alerts,
        recommendations,
        summary,
        error: None,
    }
}

fn build_recommendations(
    alerts: &[OverspendingAlert],
    savings_rate: Decimal,
    monthly_by_category: &[(String, Money)],
    avg_monthly_income: Money,
) -> Vec<String> {
    let mut recs = Vec::new();

    // Highest-priority: the first high-severity overspend
    if let Some(top_alert) = alerts.iter().find(|a| a.severity == AlertSeverity::High) {
        recs.push(format!(
            "Reduce {} spending by ${:.0}/month to align with peer average. \
             This could save ${:.0}/year.",
            top_alert.category, top_alert.over_by, top_alert.potential_savings
        ));
    }

    if savings_rate < dec!(20) {
        recs.push(format!(
            "Your current savings rate is {:.1}%. \
             Aim for 20-30% to accelerate your homeownership goals.",
            savings_rate
        ));
    }

    let spend_for = |category: &str| {
        monthly_by_category
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, m)| *m)
    };
    let pct_of_income = |amount: Money| {
        if avg_monthly_income > Decimal::ZERO {
            amount / avg_monthly_income * dec!(100)
        } else {
            Decimal::ZERO
        }
    };

    if let Some(dining) = spend_for("dining") {
        let dining_pct = pct_of_income(dining);
        if dining_pct > dec!(8) {
            recs.push(format!(
                "Dining out represents {:.1}% of your income. \
                 Consider meal prepping or reducing restaurant visits to save more.",
                dining_pct
            ));
        }
    }
    if let Some(shopping) = spend_for("shopping") {
        let shopping_pct = pct_of_income(shopping);
        if shopping_pct > dec!(10) {
            recs.push(format!(
                "Shopping expenses are {:.1}% of income. \
                 Review discretionary purchases and prioritize needs over wants.",
                shopping_pct
            ));
        }
    }

    recs
}

fn build_summary(alerts: &[OverspendingAlert], savings_rate: Decimal) -> String {
    if let Some(first) = alerts.first() {
        let noun = if alerts.len() > 1 {
            "categories"
        } else {
            "category"
        };
        let verdict = if savings_rate >= dec!(20) {
            "is good"
        } else {
            "could be improved"
        };
        format!(
            "Found {} {} where you're spending significantly above peer averages, \
             with {} being the highest. Your savings rate is {:.1}%, which {}.",
            alerts.len(),
            noun,
            first.category,
            savings_rate,
            verdict
        )
    } else {
        let grade = if savings_rate >= dec!(25) {
            "excellent"
        } else if savings_rate >= dec!(20) {
            "good"
        } else {
            "moderate"
        };
        format!(
            "Your spending patterns align well with peer benchmarks. \
             Your savings rate is {:.1}%, which is {}.",
            savings_rate, grade
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Income, Transaction};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(y: i32, m: u32, d: u32, amount: Decimal, category: &str) -> Transaction {
        Transaction {
            date: date(y, m, d),
            amount,
            category: category.to_string(),
        }
    }

    /// Three months of salary plus per-month dining spend at a chosen level.
    fn profile_with_dining(dining_per_month: Decimal) -> FinancialProfile {
        let mut transactions = Vec::new();
        for month in 1..=3u32 {
            transactions.push(txn(2024, month, 15, dec!(6000), "salary"));
            transactions.push(txn(2024, month, 20, -dining_per_month, "dining"));
        }
        FinancialProfile {
            income: Income {
                monthly_gross: dec!(6000),
                employment_length_months: 24,
            },
            transactions,
            ..Default::default()
        }
    }

    #[test]
    fn test_spend_at_benchmark_is_not_flagged() {
        // Benchmark for dining = 5% of 6000 = 300/month
        let result = analyze_transactions(&profile_with_dining(dec!(300)), 3);

        assert_eq!(result.average_monthly_income, dec!(6000));
        let cmp = &result.peer_comparisons["dining"];
        assert_eq!(cmp.your_spending, dec!(300));
        assert_eq!(cmp.peer_average, dec!(300));
        assert!(!cmp.is_over_budget);
        assert!(result.overspending_alerts.is_empty());
    }

    #[test]
    fn test_spend_at_121_percent_is_flagged() {
        // 363 = 300 * 1.21, strictly above the 1.2x threshold
        let result = analyze_transactions(&profile_with_dining(dec!(363)), 3);

        let cmp = &result.peer_comparisons["dining"];
        assert!(cmp.is_over_budget);
        assert_eq!(result.overspending_alerts.len(), 1);

        let alert = &result.overspending_alerts[0];
        assert_eq!(alert.category, "dining");
        assert_eq!(alert.over_by, dec!(63));
        assert_eq!(alert.over_by_percentage, dec!(21.0));
        // 63 * 12 annualized
        assert_eq!(alert.potential_savings, dec!(756));
        assert_eq!(alert.severity, AlertSeverity::Medium);
    }

    #[test]
    fn test_high_severity_above_50_percent_variance() {
        // 480/month vs 300 benchmark = +60% variance
        let result = analyze_transactions(&profile_with_dining(dec!(480)), 3);

        let alert = &result.overspending_alerts[0];
        assert_eq!(alert.severity, AlertSeverity::High);
        // First high-severity alert drives the top recommendation
        assert!(result.recommendations[0].starts_with("Reduce dining spending by $180/month"));
    }

    #[test]
    fn test_no_transactions_is_error_result() {
        let profile = FinancialProfile {
            income: Income {
                monthly_gross: dec!(6000),
                employment_length_months: 24,
            },
            ..Default::default()
        };
        let result = analyze_transactions(&profile, 3);
        assert!(result.error.is_some());
        assert_eq!(result.total_transactions_analyzed, 0);
    }

    #[test]
    fn test_zero_income_is_error_result() {
        let mut profile = profile_with_dining(dec!(300));
        profile.income.monthly_gross = Decimal::ZERO;
        let result = analyze_transactions(&profile, 3);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_window_anchors_to_most_recent_transaction() {
        // Historical fixture data from 2023; a 1-month window keeps only
        // transactions within 30 days of the newest one.
        let profile = FinancialProfile {
            income: Income {
                monthly_gross: dec!(6000),
                employment_length_months: 24,
            },
            transactions: vec![
                txn(2023, 1, 10, -dec!(500), "shopping"), // far outside window
                txn(2023, 6, 1, dec!(6000), "salary"),
                txn(2023, 6, 10, -dec!(200), "dining"),
            ],
            ..Default::default()
        };
        let result = analyze_transactions(&profile, 1);

        assert_eq!(result.total_transactions_analyzed, 2);
        assert!(!result.spending_by_category.contains_key("shopping"));
        assert_eq!(result.spending_by_category["dining"], dec!(200));
    }

    #[test]
    fn test_income_fallback_when_no_income_transactions() {
        // Only expenses in the window: fall back to the stated gross income,
        // not divided by the window length.
        let profile = FinancialProfile {
            income: Income {
                monthly_gross: dec!(6000),
                employment_length_months: 24,
            },
            transactions: vec![
                txn(2024, 1, 5, -dec!(300), "dining"),
                txn(2024, 2, 5, -dec!(300), "dining"),
            ],
            ..Default::default()
        };
        let result = analyze_transactions(&profile, 3);
        assert_eq!(result.average_monthly_income, dec!(6000));
    }

    #[test]
    fn test_top_categories_ties_keep_first_seen_order() {
        let profile = FinancialProfile {
            income: Income {
                monthly_gross: dec!(6000),
                employment_length_months: 24,
            },
            transactions: vec![
                txn(2024, 3, 1, dec!(6000), "salary"),
                txn(2024, 3, 2, -dec!(150), "utilities"),
                txn(2024, 3, 3, -dec!(150), "entertainment"),
                txn(2024, 3, 4, -dec!(900), "rent"),
            ],
            ..Default::default()
        };
        let result = analyze_transactions(&profile, 1);

        let order: Vec<&str> = result
            .top_spending_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        // rent is largest; utilities and entertainment tie, first-seen first
        assert_eq!(order, vec!["rent", "utilities", "entertainment"]);
    }

    #[test]
    fn test_savings_rate_and_summary_grades() {
        // 300 dining on 6000 income -> savings rate 95%, no alerts
        let result = analyze_transactions(&profile_with_dining(dec!(300)), 3);
        assert_eq!(result.savings_rate_percentage, dec!(95.0));
        assert!(result.summary.contains("which is excellent"));

        // Overspending path names the category and pluralizes correctly
        let flagged = analyze_transactions(&profile_with_dining(dec!(480)), 3);
        assert!(flagged.summary.contains("Found 1 category "));
        assert!(flagged.summary.contains("with dining being the highest"));
    }

    #[test]
    fn test_dining_and_shopping_recommendations() {
        let mut transactions = Vec::new();
        for month in 1..=3u32 {
            transactions.push(txn(2024, month, 1, dec!(6000), "salary"));
            // dining 9% of income, shopping 12% of income
            transactions.push(txn(2024, month, 5, -dec!(540), "dining"));
            transactions.push(txn(2024, month, 6, -dec!(720), "shopping"));
        }
        let profile = FinancialProfile {
            income: Income {
                monthly_gross: dec!(6000),
                employment_length_months: 24,
            },
            transactions,
            ..Default::default()
        };
        let result = analyze_transactions(&profile, 3);

        assert!(result
            .recommendations
            .iter()
            .any(|r| r.starts_with("Dining out represents 9.0%")));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.starts_with("Shopping expenses are 12.0%")));
    }
}
