//! Calculation engine behavior against the in-memory gateway.
//!
//! Covers the documented contract: exact decimal amounts, the empty
//! cases, batch atomicity on a missing rate, and append-only
//! recalculation.

use chrono::NaiveDate;
use provision_core::{
    domain::{CommissionRate, Policy},
    engine::{provision_amount, ProvisionEngine},
    error::CoreError,
    gateway::MemoryGateway,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn policy(policy_id: i32, agent_id: i32, policy_type: &str, premium: Decimal) -> Policy {
    Policy {
        policy_id,
        agent_id,
        policy_type: policy_type.to_string(),
        premium_amount: premium,
        issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
    }
}

fn rate(policy_type: &str, percent: Decimal) -> CommissionRate {
    CommissionRate {
        policy_type: policy_type.to_string(),
        commission_rate: percent,
    }
}

/// Alice (agent 1) holds Health/$1000.00 and Life/$1500.00, Bob
/// (agent 2) holds Health/$2000.00; rates are Health 10%, Life 12%.
fn sample_gateway() -> MemoryGateway {
    let gateway = MemoryGateway::new();
    gateway.insert_policy(policy(1, 1, "Health", dec!(1000.00)));
    gateway.insert_policy(policy(2, 1, "Life", dec!(1500.00)));
    gateway.insert_policy(policy(3, 2, "Health", dec!(2000.00)));
    gateway.insert_rate(rate("Health", dec!(10.0)));
    gateway.insert_rate(rate("Life", dec!(12.0)));
    gateway
}

#[test]
fn provision_amount_is_decimal_exact() {
    assert_eq!(provision_amount(dec!(1000.00), dec!(10.0)), dec!(100.00));
    assert_eq!(provision_amount(dec!(1500.00), dec!(12.0)), dec!(180.00));
    assert_eq!(provision_amount(dec!(2000.00), dec!(10.0)), dec!(200.00));
}

#[test]
fn provision_amount_rounds_midpoints_away_from_zero() {
    // 50.50 * 5% = 2.525; cents rounding must not go banker's to 2.52.
    assert_eq!(provision_amount(dec!(50.50), dec!(5.0)), dec!(2.53));
    assert_eq!(provision_amount(dec!(333.33), dec!(7.5)), dec!(25.00));
}

#[tokio::test]
async fn alice_and_bob_scenario() {
    let engine = ProvisionEngine::new(sample_gateway());

    let alice = engine.calculate_for(1).await.expect("alice calculation");
    assert_eq!(alice.len(), 2);
    let health = alice.iter().find(|p| p.policy_id == 1).expect("health provision");
    let life = alice.iter().find(|p| p.policy_id == 2).expect("life provision");
    assert_eq!(health.provision_amount, dec!(100.00));
    assert_eq!(life.provision_amount, dec!(180.00));

    let bob = engine.calculate_for(2).await.expect("bob calculation");
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].provision_amount, dec!(200.00));

    assert_eq!(engine.gateway().provisions().len(), 3);
}

#[tokio::test]
async fn provision_inherits_the_policys_owner() {
    let engine = ProvisionEngine::new(sample_gateway());
    let stored = engine.calculate_for(1).await.expect("calculation");
    assert!(stored.iter().all(|p| p.agent_id == 1));
}

#[tokio::test]
async fn unknown_agent_yields_empty_result_and_no_writes() {
    // An unknown agent and an agent with zero policies are identical to
    // the engine: zero loop iterations.
    let engine = ProvisionEngine::new(sample_gateway());
    let stored = engine.calculate_for(99).await.expect("calculation");
    assert!(stored.is_empty());
    assert!(engine.gateway().provisions().is_empty());
}

#[tokio::test]
async fn missing_rate_persists_nothing_for_the_whole_batch() {
    let gateway = MemoryGateway::new();
    gateway.insert_policy(policy(1, 1, "Health", dec!(1000.00)));
    gateway.insert_policy(policy(2, 1, "Auto", dec!(800.00)));
    gateway.insert_rate(rate("Health", dec!(10.0)));

    let engine = ProvisionEngine::new(gateway);
    let err = engine.calculate_for(1).await.expect_err("must fail");
    match err {
        CoreError::MissingCommissionRate { policy_type } => assert_eq!(policy_type, "Auto"),
        other => panic!("unexpected error: {other}"),
    }
    // The valid Health policy must not have slipped through.
    assert!(engine.gateway().provisions().is_empty());
}

#[tokio::test]
async fn recalculation_appends_instead_of_deduplicating() {
    let engine = ProvisionEngine::new(sample_gateway());

    engine.calculate_for(1).await.expect("first run");
    engine.calculate_for(1).await.expect("second run");

    let provisions = engine.gateway().provisions();
    assert_eq!(provisions.len(), 4);

    // Fresh rows, fresh identities.
    let mut ids: Vec<i32> = provisions.iter().map(|p| p.provision_id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}
