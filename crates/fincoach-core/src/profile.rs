use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::FinCoachError;
use crate::types::{Money, Rate};
use crate::FinCoachResult;

// ---------------------------------------------------------------------------
// Profile data model
// ---------------------------------------------------------------------------

/// Monthly income and employment tenure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Income {
    #[serde(default)]
    pub monthly_gross: Money,
    #[serde(default)]
    pub employment_length_months: u32,
}

/// A single outstanding debt obligation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    #[serde(rename = "type", default = "default_debt_kind")]
    pub kind: String,
    #[serde(default)]
    pub balance: Money,
    #[serde(default)]
    pub monthly_payment: Money,
    #[serde(default)]
    pub interest_rate: Rate,
}

fn default_debt_kind() -> String {
    "unknown".to_string()
}

/// Liquid savings and the current monthly savings rate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Savings {
    #[serde(default)]
    pub total: Money,
    #[serde(default)]
    pub monthly_savings_rate: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credit {
    /// Credit score, typically 300-850.
    #[serde(default)]
    pub score: u32,
}

/// A dated transaction. Negative amounts are expenses, positive are income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "other".to_string()
}

/// Aggregate financial profile consumed by every engine.
///
/// Every section defaults to zero/empty so a partial profile never fails to
/// decode; engines that require income or transactions report a domain error
/// in their result object instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialProfile {
    #[serde(default)]
    pub income: Income,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub savings: Savings,
    #[serde(default)]
    pub credit: Credit,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl FinancialProfile {
    /// Sum of all monthly debt payments, in input order.
    pub fn total_monthly_debt_payments(&self) -> Money {
        self.debts.iter().map(|d| d.monthly_payment).sum()
    }
}

// ---------------------------------------------------------------------------
// Profile stores
// ---------------------------------------------------------------------------

/// Keyed access to user profiles. Absent keys yield a default empty profile.
pub trait ProfileStore {
    fn load(&self, user_id: &str) -> FinancialProfile;
}

/// HashMap-backed store for tests and ledger demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: HashMap<String, FinancialProfile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, profile: FinancialProfile) {
        self.profiles.insert(user_id.into(), profile);
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self, user_id: &str) -> FinancialProfile {
        self.profiles.get(user_id).cloned().unwrap_or_default()
    }
}

/// Store backed by a single JSON file mapping user id to profile.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    profiles: HashMap<String, FinancialProfile>,
}

impl JsonProfileStore {
    pub fn open(path: impl AsRef<Path>) -> FinCoachResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| FinCoachError::Storage(format!("{}: {e}", path.display())))?;
        let profiles = serde_json::from_str(&contents)?;
        Ok(Self { profiles })
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self, user_id: &str) -> FinancialProfile {
        self.profiles.get(user_id).cloned().unwrap_or_default()
    }
}
