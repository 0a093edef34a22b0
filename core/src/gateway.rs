//! Storage gateway abstraction for the calculation engine.
//!
//! The engine never sees a connection; it talks to this trait. The
//! Postgres implementation lives in `store.rs`, the in-memory one below
//! is used in tests.

use crate::{
    domain::{CommissionRate, NewProvision, Policy, Provision},
    error::CoreResult,
};
use async_trait::async_trait;
use std::sync::Mutex;

#[async_trait]
pub trait ProvisionGateway {
    /// All policies owned by the agent. Unknown agents yield an empty
    /// vec, not an error. Retrieval order is unspecified.
    async fn policies_for_agent(&self, agent_id: i32) -> CoreResult<Vec<Policy>>;

    /// The commission rate for a policy type, if one is configured.
    async fn commission_rate(&self, policy_type: &str) -> CoreResult<Option<CommissionRate>>;

    /// Persist a batch of provisions atomically: either every row is
    /// stored or none are. Returns the stored rows with assigned ids and
    /// calculation dates.
    async fn append_provisions(&self, provisions: &[NewProvision]) -> CoreResult<Vec<Provision>>;
}

/// In-memory gateway (used in tests).
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    policies: Vec<Policy>,
    rates: Vec<CommissionRate>,
    provisions: Vec<Provision>,
    next_provision_id: i32,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_provision_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    pub fn insert_policy(&self, policy: Policy) {
        self.state.lock().unwrap().policies.push(policy);
    }

    pub fn insert_rate(&self, rate: CommissionRate) {
        self.state.lock().unwrap().rates.push(rate);
    }

    /// Snapshot of every provision stored so far.
    pub fn provisions(&self) -> Vec<Provision> {
        self.state.lock().unwrap().provisions.clone()
    }
}

#[async_trait]
impl ProvisionGateway for MemoryGateway {
    async fn policies_for_agent(&self, agent_id: i32) -> CoreResult<Vec<Policy>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .policies
            .iter()
            .filter(|p| p.agent_id == agent_id)
            .cloned()
            .collect())
    }

    async fn commission_rate(&self, policy_type: &str) -> CoreResult<Option<CommissionRate>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rates
            .iter()
            .find(|r| r.policy_type == policy_type)
            .cloned())
    }

    async fn append_provisions(&self, provisions: &[NewProvision]) -> CoreResult<Vec<Provision>> {
        let mut state = self.state.lock().unwrap();
        let today = chrono::Utc::now().date_naive();
        let mut stored = Vec::with_capacity(provisions.len());
        for p in provisions {
            let row = Provision {
                provision_id: state.next_provision_id,
                agent_id: p.agent_id,
                policy_id: p.policy_id,
                provision_amount: p.provision_amount,
                calculation_date: today,
            };
            state.next_provision_id += 1;
            state.provisions.push(row.clone());
            stored.push(row);
        }
        Ok(stored)
    }
}
