use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::coach::CoachCatalog;
use crate::error::FinCoachError;
use crate::profile::FinancialProfile;
use crate::FinCoachResult;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Time source for consent lifecycle decisions. Injected so expiry is
/// deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    Active,
    Revoked,
    Expired,
}

/// Append-only audit record. `metadata` is free-form (duration, reason, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

/// A user's time-boxed authorization to share specific profile fields with
/// one coach persona. Never deleted; history is retained for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consent {
    pub id: String,
    pub coach_id: String,
    pub user_id: String,
    pub data_fields: Vec<String>,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: ConsentStatus,
    pub audit_log: Vec<AuditEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentRequest {
    pub user_id: String,
    pub coach_id: String,
    pub data_fields: Vec<String>,
    pub duration_hours: i64,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Tracks which profile fields each user has authorized for which coach.
///
/// All engines are pure; this is the one stateful component. Each operation
/// takes a single write-lock critical section, so concurrent grants for the
/// same (user, coach) pair serialize and exactly one consent stays active.
pub struct ConsentLedger {
    catalog: CoachCatalog,
    records: RwLock<HashMap<String, Vec<Consent>>>,
    clock: Arc<dyn Clock>,
}

impl ConsentLedger {
    pub fn new(catalog: CoachCatalog) -> Self {
        Self::with_clock(catalog, Arc::new(SystemClock))
    }

    pub fn with_clock(catalog: CoachCatalog, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            records: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub fn catalog(&self) -> &CoachCatalog {
        &self.catalog
    }

    /// Grant consent for a coach, replacing any active consent for the same
    /// (user, coach) pair in the same atomic step.
    ///
    /// Fails when the coach id is unknown or the authorized fields do not
    /// cover the coach's declared `required_data`; no partial consent is
    /// created in either case.
    pub fn grant(&self, request: &ConsentRequest) -> FinCoachResult<Consent> {
        let coach = self
            .catalog
            .get(&request.coach_id)
            .ok_or_else(|| FinCoachError::UnknownCoach(request.coach_id.clone()))?;

        let mut missing: Vec<String> = coach
            .required_data
            .iter()
            .filter(|f| !request.data_fields.contains(f))
            .cloned()
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(FinCoachError::MissingRequiredFields {
                coach_id: request.coach_id.clone(),
                missing,
            });
        }

        let now = self.clock.now();
        let consent = Consent {
            id: format!(
                "consent_{}_{}_{}",
                request.user_id,
                request.coach_id,
                now.timestamp()
            ),
            coach_id: request.coach_id.clone(),
            user_id: request.user_id.clone(),
            data_fields: request.data_fields.clone(),
            granted_at: now,
            expires_at: now + Duration::hours(request.duration_hours),
            status: ConsentStatus::Active,
            audit_log: vec![AuditEntry {
                action: "granted".to_string(),
                timestamp: now,
                metadata: json!({ "duration_hours": request.duration_hours }),
            }],
        };

        let mut records = self.write_records();
        let user_consents = records.entry(request.user_id.clone()).or_default();
        revoke_active(
            user_consents,
            &request.coach_id,
            now,
            json!({ "reason": "replaced_by_new_consent" }),
        );
        user_consents.push(consent.clone());
        Ok(consent)
    }

    /// Revoke all active consents for the (user, coach) pair. Returns whether
    /// anything was revoked.
    pub fn revoke(&self, user_id: &str, coach_id: &str) -> bool {
        let now = self.clock.now();
        let mut records = self.write_records();
        match records.get_mut(user_id) {
            Some(user_consents) => revoke_active(user_consents, coach_id, now, Value::Null) > 0,
            None => false,
        }
    }

    /// All active consents for a user. Consents past `expires_at` are lazily
    /// transitioned to `expired` (with an audit entry) as a side effect of
    /// this read.
    pub fn list_active(&self, user_id: &str) -> Vec<Consent> {
        let now = self.clock.now();
        let mut records = self.write_records();
        let Some(user_consents) = records.get_mut(user_id) else {
            return Vec::new();
        };

        let mut active = Vec::new();
        for consent in user_consents.iter_mut() {
            if consent.status == ConsentStatus::Active && consent.expires_at < now {
                consent.status = ConsentStatus::Expired;
                consent.audit_log.push(AuditEntry {
                    action: "expired".to_string(),
                    timestamp: now,
                    metadata: Value::Null,
                });
            }
            if consent.status == ConsentStatus::Active {
                active.push(consent.clone());
            }
        }
        active
    }

    pub fn has_consent(&self, user_id: &str, coach_id: &str) -> bool {
        self.list_active(user_id)
            .iter()
            .any(|c| c.coach_id == coach_id)
    }

    /// Full history for a user, including revoked and expired records.
    pub fn history(&self, user_id: &str) -> Vec<Consent> {
        self.read_records()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Project the authorized slice of a profile for a coach, or `None`
    /// without an active consent.
    ///
    /// `affordability_range` and `monthly_budget` are derived figures, not
    /// raw profile fields. Authorized field names the projection does not
    /// know are silently ignored.
    pub fn shareable_snapshot(
        &self,
        user_id: &str,
        coach_id: &str,
        profile: &FinancialProfile,
    ) -> Option<Map<String, Value>> {
        let consent = self
            .list_active(user_id)
            .into_iter()
            .find(|c| c.coach_id == coach_id)?;

        let monthly_income = profile.income.monthly_gross;
        let mut shared = Map::new();
        for field in &consent.data_fields {
            match field.as_str() {
                "income" => {
                    shared.insert(
                        "income".to_string(),
                        serde_json::to_value(&profile.income).unwrap_or(Value::Null),
                    );
                }
                "savings" => {
                    shared.insert(
                        "savings".to_string(),
                        serde_json::to_value(&profile.savings).unwrap_or(Value::Null),
                    );
                }
                "credit_score" => {
                    shared.insert("credit_score".to_string(), json!(profile.credit.score));
                }
                "affordability_range" => {
                    if monthly_income > Decimal::ZERO {
                        let max = monthly_income * dec!(4.5);
                        shared.insert(
                            "affordability_range".to_string(),
                            json!({ "min": 0, "max": max }),
                        );
                    }
                }
                "monthly_budget" => {
                    let budget = monthly_income * dec!(0.15);
                    shared.insert("monthly_budget".to_string(), json!(budget));
                }
                _ => {} // unknown field names are ignored
            }
        }
        Some(shared)
    }

    fn write_records(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Consent>>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_records(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<Consent>>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Mark every active consent for `coach_id` revoked, appending an audit
/// entry. Returns the number of consents revoked.
fn revoke_active(
    consents: &mut [Consent],
    coach_id: &str,
    now: DateTime<Utc>,
    metadata: Value,
) -> usize {
    let mut revoked = 0;
    for consent in consents
        .iter_mut()
        .filter(|c| c.coach_id == coach_id && c.status == ConsentStatus::Active)
    {
        consent.status = ConsentStatus::Revoked;
        consent.audit_log.push(AuditEntry {
            action: "revoked".to_string(),
            timestamp: now,
            metadata: metadata.clone(),
        });
        revoked += 1;
    }
    revoked
}
