//! Domain records for the provision workbench.
//!
//! Four concrete entities mirror the four tables; there is no behavior
//! here beyond equality. All currency and rate values are `Decimal` so
//! binary floats never touch a money path.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Agent {
    pub agent_id: i32,
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Policy {
    pub policy_id: i32,
    /// Owning agent. Required: a policy never exists without one.
    pub agent_id: i32,
    /// Free-form category label, matched against `CommissionRate::policy_type`.
    pub policy_type: String,
    pub premium_amount: Decimal,
    pub issue_date: NaiveDate,
}

/// Lookup row keyed by policy type. `commission_rate` is a percentage:
/// 10.0 means 10%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommissionRate {
    pub policy_type: String,
    pub commission_rate: Decimal,
}

/// A computed provision before the store has assigned its identity and
/// calculation date. `agent_id` is always copied from the policy being
/// processed, never chosen independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProvision {
    pub agent_id: i32,
    pub policy_id: i32,
    pub provision_amount: Decimal,
}

/// A persisted provision row. Immutable once created: recalculation
/// appends new rows, it never updates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Provision {
    pub provision_id: i32,
    pub agent_id: i32,
    pub policy_id: i32,
    pub provision_amount: Decimal,
    pub calculation_date: NaiveDate,
}
