use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Maximum back-end DTI most lenders accept (Fannie Mae guideline).
pub const MAX_BACK_END_DTI: Decimal = dec!(43.0);

/// Maximum front-end (housing-only) ratio.
pub const MAX_FRONT_END_RATIO: Decimal = dec!(28.0);

/// Format a dollar amount with comma grouping and no cents, e.g. `$80,000`.
/// Used in reasoning and action-plan description strings.
pub fn fmt_usd(amount: Money) -> String {
    let negative = amount.is_sign_negative();
    let whole = amount.abs().round().to_i128().unwrap_or(0);
    let raw = whole.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
