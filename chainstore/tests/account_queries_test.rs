// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Historical account-state queries: balances, balance locks, nodes and
//! primary validator selection.

mod common;

use chainstore::{AccountState, PrimaryValidatorSchedule};
use common::{account, make_block, make_genesis, make_node, TestChain};

/// Genesis gives the treasury account an explicit self-lock; block 0 and
/// block 1 each replace the lock.
fn lock_history_chain() -> (TestChain, String, String, String) {
    let treasury = account(0x0a);
    let lock0 = account(0xb0);
    let lock1 = account(0xb1);

    let chain = TestChain::new(100);
    chain
        .blockchain
        .add_blockchain_state(&make_genesis(vec![(
            treasury.clone(),
            AccountState {
                balance: 1000,
                balance_lock: Some(treasury.clone()),
                ..AccountState::default()
            },
        )]))
        .unwrap();

    chain
        .blockchain
        .add_block(&make_block(
            0,
            vec![(
                treasury.clone(),
                AccountState {
                    balance: 970,
                    balance_lock: Some(lock0.clone()),
                    ..AccountState::default()
                },
            )],
        ))
        .unwrap();

    chain
        .blockchain
        .add_block(&make_block(
            1,
            vec![(
                treasury.clone(),
                AccountState {
                    balance: 960,
                    balance_lock: Some(lock1.clone()),
                    ..AccountState::default()
                },
            )],
        ))
        .unwrap();

    (chain, treasury, lock0, lock1)
}

#[test]
fn test_balance_lock_history() {
    let (chain, treasury, lock0, lock1) = lock_history_chain();
    let blockchain = &chain.blockchain;

    assert_eq!(blockchain.get_account_balance_lock(&treasury, -1).unwrap(), treasury);
    assert_eq!(blockchain.get_account_balance_lock(&treasury, 0).unwrap(), lock0);
    assert_eq!(blockchain.get_account_balance_lock(&treasury, 1).unwrap(), lock1);
    assert_eq!(blockchain.get_account_current_balance_lock(&treasury).unwrap(), lock1);
}

#[test]
fn test_unknown_account_is_locked_to_itself() {
    let (chain, _, _, _) = lock_history_chain();
    let stranger = account(0x77);

    assert_eq!(
        chain.blockchain.get_account_current_balance_lock(&stranger).unwrap(),
        stranger
    );
}

#[test]
fn test_balance_history() {
    let (chain, treasury, _, _) = lock_history_chain();
    let blockchain = &chain.blockchain;

    assert_eq!(blockchain.get_account_balance(&treasury, -1).unwrap(), Some(1000));
    assert_eq!(blockchain.get_account_balance(&treasury, 0).unwrap(), Some(970));
    assert_eq!(blockchain.get_account_balance(&treasury, 1).unwrap(), Some(960));
    assert_eq!(blockchain.get_account_current_balance(&treasury).unwrap(), Some(960));

    assert_eq!(blockchain.get_account_balance(&account(0x77), 1).unwrap(), None);
}

#[test]
fn test_account_states_merge_blocks_over_snapshot() {
    let (chain, treasury, _, lock1) = lock_history_chain();

    let states = chain.blockchain.yield_account_states(None).unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].0, treasury);
    // the latest update wins over the genesis state
    assert_eq!(states[0].1.balance, 960);
    assert_eq!(states[0].1.balance_lock.as_deref(), Some(lock1.as_str()));

    let genesis_view = chain.blockchain.yield_account_states(Some(-1)).unwrap();
    assert_eq!(genesis_view[0].1.balance, 1000);
}

/// Genesis schedules v1 for blocks 0..=99; block 0 schedules v2 for 10..=19;
/// block 1 schedules v3 for the same window.
fn validator_chain() -> (TestChain, String, String, String) {
    let v1 = account(0x11);
    let v2 = account(0x22);
    let v3 = account(0x33);

    let chain = TestChain::new(100);
    chain
        .blockchain
        .add_blockchain_state(&make_genesis(vec![
            (
                v1.clone(),
                AccountState {
                    balance: 500,
                    node: Some(make_node(&v1, 8001)),
                    primary_validator_schedule: Some(PrimaryValidatorSchedule::new(0, 99).unwrap()),
                    ..AccountState::default()
                },
            ),
            (account(0x0a), AccountState::with_balance(1000)),
        ]))
        .unwrap();

    for (n, validator, port) in [(0u64, v2.clone(), 8002u16), (1, v3.clone(), 8003)] {
        chain
            .blockchain
            .add_block(&make_block(
                n,
                vec![(
                    validator.clone(),
                    AccountState {
                        node: Some(make_node(&validator, port)),
                        primary_validator_schedule: Some(
                            PrimaryValidatorSchedule::new(10, 19).unwrap(),
                        ),
                        ..AccountState::default()
                    },
                )],
            ))
            .unwrap();
    }

    (chain, v1, v2, v3)
}

#[test]
fn test_primary_validator_from_snapshot_schedule() {
    let (chain, v1, _, _) = validator_chain();

    let node = chain.blockchain.get_primary_validator(Some(5)).unwrap().unwrap();
    assert_eq!(node.identifier, v1);
}

#[test]
fn test_primary_validator_latest_schedule_wins() {
    let (chain, _, _, v3) = validator_chain();

    // both block 0 and block 1 schedule the 10..=19 window; the most recent
    // update takes precedence
    let node = chain.blockchain.get_primary_validator(Some(12)).unwrap().unwrap();
    assert_eq!(node.identifier, v3);
}

#[test]
fn test_primary_validator_defaults_to_next_block() {
    let (chain, v1, _, _) = validator_chain();

    // next block is 2, covered only by the genesis schedule
    let node = chain.blockchain.get_primary_validator(None).unwrap().unwrap();
    assert_eq!(node.identifier, v1);
}

#[test]
fn test_primary_validator_none_when_no_schedule_covers() {
    let (chain, _, _, _) = validator_chain();

    assert!(chain.blockchain.get_primary_validator(Some(500)).unwrap().is_none());
}

#[test]
fn test_node_lookup_by_identifier() {
    let (chain, v1, v2, _) = validator_chain();

    let node = chain.blockchain.get_node_by_identifier(&v2, None).unwrap().unwrap();
    assert_eq!(node.network_addresses, vec!["http://127.0.0.1:8002/".to_string()]);

    // v2 did not exist at genesis
    assert!(chain
        .blockchain
        .get_node_by_identifier(&v2, Some(-1))
        .unwrap()
        .is_none());
    assert!(chain
        .blockchain
        .get_node_by_identifier(&v1, Some(-1))
        .unwrap()
        .is_some());
}

#[test]
fn test_yield_nodes_lists_each_operator_once() {
    let (chain, v1, v2, v3) = validator_chain();

    let nodes: Vec<String> = chain
        .blockchain
        .yield_nodes(None)
        .unwrap()
        .into_iter()
        .map(|node| node.identifier)
        .collect();

    // most recently declared first, then the snapshot's
    assert_eq!(nodes, vec![v3, v2, v1]);
    assert!(chain.blockchain.has_nodes().unwrap());
}

#[test]
fn test_empty_network_has_no_nodes() {
    let chain = TestChain::new(100);
    chain
        .blockchain
        .add_blockchain_state(&make_genesis(vec![(
            account(0x0a),
            AccountState::with_balance(1000),
        )]))
        .unwrap();

    assert!(!chain.blockchain.has_nodes().unwrap());
    assert!(chain.blockchain.get_primary_validator(None).unwrap().is_none());
}
