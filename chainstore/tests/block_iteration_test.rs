// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Iteration over blocks living in a single open chunk.

mod common;

use chainstore::Block;
use common::TestChain;

fn block_numbers(blocks: Vec<Block>) -> Vec<u64> {
    blocks.into_iter().map(|b| b.block_number).collect()
}

fn setup() -> TestChain {
    let chain = TestChain::new(100);
    chain.add_simple_blocks(4);
    chain
}

#[test]
fn test_can_yield_blocks() {
    let chain = setup();

    let blocks: Result<Vec<_>, _> = chain.blockchain.yield_blocks().unwrap().collect();
    assert_eq!(block_numbers(blocks.unwrap()), vec![0, 1, 2, 3]);
}

#[test]
fn test_can_yield_blocks_reversed() {
    let chain = setup();

    let blocks: Result<Vec<_>, _> = chain.blockchain.yield_blocks_reversed().unwrap().collect();
    assert_eq!(block_numbers(blocks.unwrap()), vec![3, 2, 1, 0]);
}

#[test]
fn test_can_yield_blocks_from() {
    let chain = setup();

    for (from, expected) in [
        (0, vec![0, 1, 2, 3]),
        (1, vec![1, 2, 3]),
        (2, vec![2, 3]),
        (3, vec![3]),
        (4, vec![]),
    ] {
        let blocks: Result<Vec<_>, _> = chain.blockchain.yield_blocks_from(from).unwrap().collect();
        assert_eq!(block_numbers(blocks.unwrap()), expected, "from {}", from);
    }
}

#[test]
fn test_can_get_block_count() {
    let chain = setup();
    assert_eq!(chain.blockchain.get_block_count().unwrap(), 4);
}

#[test]
fn test_can_get_block_by_number() {
    let chain = setup();

    let block = chain.blockchain.get_block_by_number(1).unwrap().unwrap();
    assert_eq!(block.block_number, 1);
}

#[test]
fn test_get_block_by_number_returns_none_if_not_exist() {
    let chain = setup();
    assert!(chain.blockchain.get_block_by_number(999).unwrap().is_none());
}

#[test]
fn test_can_get_first_and_last_block() {
    let chain = setup();

    assert_eq!(chain.blockchain.get_first_block().unwrap().unwrap().block_number, 0);
    assert_eq!(chain.blockchain.get_last_block().unwrap().unwrap().block_number, 3);
}

#[test]
fn test_last_and_next_block_numbers() {
    let chain = setup();

    assert_eq!(chain.blockchain.get_last_block_number().unwrap(), 3);
    assert_eq!(chain.blockchain.get_next_block_number().unwrap(), 4);
}

#[test]
fn test_empty_chain() {
    let chain = TestChain::new(100);

    assert_eq!(chain.blockchain.get_last_block_number().unwrap(), -1);
    assert_eq!(chain.blockchain.get_next_block_number().unwrap(), 0);
    assert_eq!(chain.blockchain.get_block_count().unwrap(), 0);
    assert!(chain.blockchain.get_first_block().unwrap().is_none());
    assert!(chain.blockchain.yield_blocks().unwrap().next().is_none());
}

#[test]
fn test_can_yield_blocks_till_snapshot() {
    let chain = setup();
    chain
        .blockchain
        .add_blockchain_state(&common::make_genesis(vec![]))
        .unwrap();

    let blocks: Result<Vec<_>, _> = chain
        .blockchain
        .yield_blocks_till_snapshot(None)
        .unwrap()
        .collect();
    assert_eq!(block_numbers(blocks.unwrap()), vec![3, 2, 1, 0]);

    let blocks: Result<Vec<_>, _> = chain
        .blockchain
        .yield_blocks_till_snapshot(Some(1))
        .unwrap()
        .collect();
    assert_eq!(block_numbers(blocks.unwrap()), vec![1, 0]);
}

#[test]
fn test_reversed_iteration_after_partial_cache_fill() {
    let chain = setup();

    // populate part of the cache through a point lookup, then iterate
    chain.blockchain.clear_caches();
    let _ = chain.blockchain.get_block_by_number(2).unwrap();

    let blocks: Result<Vec<_>, _> = chain.blockchain.yield_blocks_reversed().unwrap().collect();
    assert_eq!(block_numbers(blocks.unwrap()), vec![3, 2, 1, 0]);
}
