//! Deterministic calculation engines for a financial-coaching backend.
//!
//! Every engine is a pure function of a [`profile::FinancialProfile`] plus
//! engine-specific parameters, producing an immutable result object that
//! serializes to the JSON wire contract the orchestration layer exposes.
//! Missing required inputs (income, transactions) degrade into an `error`
//! field on the result rather than an `Err`; the `Err` path is reserved for
//! consent validation and profile-store failures.

pub mod action_plan;
pub mod affordability;
pub mod coach;
pub mod consent;
pub mod dti;
pub mod error;
pub mod profile;
pub mod readiness;
pub mod transactions;
pub mod types;

pub use error::FinCoachError;
pub use types::{Money, Rate};

/// Standard result type for all fallible fincoach operations
pub type FinCoachResult<T> = Result<T, FinCoachError>;
