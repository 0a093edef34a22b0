//! Provision calculation.
//!
//! The migrated body of the legacy `calculate_provisions` procedure.
//! One invocation computes every provision for one agent and persists
//! them through a single atomic gateway call: rate lookups all happen
//! before the first write, so a missing rate aborts the invocation with
//! nothing stored.

use crate::{
    domain::{NewProvision, Provision},
    error::{CoreError, CoreResult},
    gateway::ProvisionGateway,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Amount owed for one policy: `premium * rate / 100`, rounded to cents.
/// Midpoint-away-from-zero matches what NUMERIC(12,2) storage did in the
/// legacy schema.
pub fn provision_amount(premium: Decimal, rate_percent: Decimal) -> Decimal {
    (premium * rate_percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub struct ProvisionEngine<G> {
    gateway: G,
}

impl<G: ProvisionGateway> ProvisionEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Compute and persist provisions for every policy the agent owns.
    ///
    /// An unknown agent id and an agent with zero policies are the same
    /// case: zero loop iterations, empty result, nothing written. Any
    /// missing commission rate fails the whole invocation before a
    /// single row is stored; provisions are append-only, so calling this
    /// twice with unchanged inputs doubles the row count.
    pub async fn calculate_for(&self, agent_id: i32) -> CoreResult<Vec<Provision>> {
        let policies = self.gateway.policies_for_agent(agent_id).await?;
        if policies.is_empty() {
            log::debug!("agent {agent_id}: no policies, nothing to calculate");
            return Ok(Vec::new());
        }

        let mut pending = Vec::with_capacity(policies.len());
        for policy in &policies {
            let rate = self
                .gateway
                .commission_rate(&policy.policy_type)
                .await?
                .ok_or_else(|| CoreError::MissingCommissionRate {
                    policy_type: policy.policy_type.clone(),
                })?;

            pending.push(NewProvision {
                // The provision inherits the policy's owning agent.
                agent_id: policy.agent_id,
                policy_id: policy.policy_id,
                provision_amount: provision_amount(policy.premium_amount, rate.commission_rate),
            });
        }

        let stored = self.gateway.append_provisions(&pending).await?;
        log::info!("agent {agent_id}: stored {} provisions", stored.len());
        Ok(stored)
    }
}
