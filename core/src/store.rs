//! PostgreSQL persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine and the pipeline call store methods; they never execute
//! SQL directly.

use crate::{
    catalog::{StoredProcedure, TableDefinition},
    config::DbConfig,
    domain::{Agent, CommissionRate, NewProvision, Policy, Provision},
    error::CoreResult,
    gateway::ProvisionGateway,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Callable procedures only (prokind = 'p'), system schemas excluded,
/// sorted for deterministic pipeline runs.
const STORED_PROC_QUERY: &str = "
SELECT n.nspname::text AS schema,
       p.proname::text AS name,
       pg_catalog.pg_get_function_arguments(p.oid) AS arguments,
       t.typname::text AS return_type,
       pg_get_functiondef(p.oid) AS definition
FROM pg_proc p
JOIN pg_namespace n ON p.pronamespace = n.oid
JOIN pg_type t ON p.prorettype = t.oid
WHERE p.prokind = 'p'
  AND n.nspname NOT IN ('pg_catalog', 'information_schema')
ORDER BY n.nspname, p.proname
";

const TABLE_DEFINITIONS_QUERY: &str = "
SELECT table_name::text AS table_name,
       string_agg(
           column_name || ' ' || data_type ||
           CASE
               WHEN character_maximum_length IS NOT NULL
               THEN '(' || character_maximum_length || ')'
               ELSE ''
           END ||
           CASE
               WHEN is_nullable = 'NO' THEN ' NOT NULL'
               ELSE ''
           END,
           E'\\n    ' ORDER BY ordinal_position
       ) AS columns
FROM information_schema.columns
WHERE table_schema = 'public'
GROUP BY table_name
ORDER BY table_name
";

/// One line of the provision report: provisions joined back to their
/// agent and policy.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProvisionReportRow {
    pub agent_name: String,
    pub policy_type: String,
    pub premium_amount: Decimal,
    pub provision_amount: Decimal,
    pub calculation_date: NaiveDate,
}

#[derive(Clone)]
pub struct PolicyStore {
    pool: PgPool,
}

impl PolicyStore {
    /// Connect using the parameters read at startup.
    pub async fn connect(cfg: &DbConfig) -> CoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&cfg.url())
            .await?;
        Ok(Self { pool })
    }

    /// Apply the foundation schema and the legacy stored procedure.
    /// Safe to re-run.
    pub async fn migrate(&self) -> CoreResult<()> {
        sqlx::raw_sql(include_str!("../migrations/001_foundation.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert the demo agents, policies, and rates. Safe to re-run.
    pub async fn seed_sample_data(&self) -> CoreResult<()> {
        sqlx::raw_sql(include_str!("../migrations/002_sample_data.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ── Legacy procedure ───────────────────────────────────────

    /// Run the original PL/pgSQL procedure, for parity checks against
    /// the engine.
    pub async fn call_calculate_provisions(&self, agent_id: i32) -> CoreResult<()> {
        sqlx::query("CALL calculate_provisions($1)")
            .bind(agent_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ── Reporting ──────────────────────────────────────────────

    /// Every known agent, in id order.
    pub async fn agents(&self) -> CoreResult<Vec<Agent>> {
        let agents = sqlx::query_as::<_, Agent>(
            "SELECT agent_id, name, region FROM agents ORDER BY agent_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(agents)
    }

    pub async fn provision_report(&self, agent_id: i32) -> CoreResult<Vec<ProvisionReportRow>> {
        let rows = sqlx::query_as::<_, ProvisionReportRow>(
            "SELECT a.name AS agent_name,
                    p.policy_type,
                    p.premium_amount,
                    pr.provision_amount,
                    pr.calculation_date
             FROM provisions pr
             JOIN agents a ON pr.agent_id = a.agent_id
             JOIN policies p ON pr.policy_id = p.policy_id
             WHERE pr.agent_id = $1
             ORDER BY pr.calculation_date DESC, pr.provision_id DESC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ── Catalog introspection ──────────────────────────────────

    /// Every callable procedure outside the system schemas, with its
    /// full definition. Fails as a whole if metadata access fails; a
    /// partial listing is never returned as success.
    pub async fn stored_procedures(&self) -> CoreResult<Vec<StoredProcedure>> {
        let procs = sqlx::query_as::<_, StoredProcedure>(STORED_PROC_QUERY)
            .fetch_all(&self.pool)
            .await?;
        Ok(procs)
    }

    /// Column definitions for every public table, pre-aggregated per
    /// table in ordinal order.
    pub async fn table_definitions(&self) -> CoreResult<Vec<TableDefinition>> {
        let tables = sqlx::query_as::<_, TableDefinition>(TABLE_DEFINITIONS_QUERY)
            .fetch_all(&self.pool)
            .await?;
        Ok(tables)
    }
}

#[async_trait]
impl ProvisionGateway for PolicyStore {
    async fn policies_for_agent(&self, agent_id: i32) -> CoreResult<Vec<Policy>> {
        let policies = sqlx::query_as::<_, Policy>(
            "SELECT policy_id, agent_id, policy_type, premium_amount, issue_date
             FROM policies WHERE agent_id = $1",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(policies)
    }

    async fn commission_rate(&self, policy_type: &str) -> CoreResult<Option<CommissionRate>> {
        let rate = sqlx::query_as::<_, CommissionRate>(
            "SELECT policy_type, commission_rate
             FROM commission_rates WHERE policy_type = $1",
        )
        .bind(policy_type)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rate)
    }

    async fn append_provisions(&self, provisions: &[NewProvision]) -> CoreResult<Vec<Provision>> {
        if provisions.is_empty() {
            return Ok(Vec::new());
        }
        // One transaction per invocation. If this function returns early
        // on an error, the dropped transaction rolls back and no rows
        // survive.
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(provisions.len());
        for p in provisions {
            let row = sqlx::query_as::<_, Provision>(
                "INSERT INTO provisions (agent_id, policy_id, provision_amount)
                 VALUES ($1, $2, $3)
                 RETURNING provision_id, agent_id, policy_id, provision_amount, calculation_date",
            )
            .bind(p.agent_id)
            .bind(p.policy_id)
            .bind(p.provision_amount)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }
        tx.commit().await?;
        Ok(stored)
    }
}
