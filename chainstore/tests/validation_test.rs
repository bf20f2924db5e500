// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Block validation on the write path: ordering, hashes and signatures.

mod common;

use std::sync::Arc;

use tempfile::TempDir;

use chainstore::{
    Block, BlockchainCodec, ChainstoreError, CryptoProvider, FileBlockchain,
    FileBlockchainConfig, MessagePackCodec,
};
use common::{expected_signature, make_simple_block, sha256_crypto, TestChain};

#[test]
fn test_out_of_order_block_is_rejected() {
    let chain = TestChain::new(100);

    let err = chain.blockchain.add_block(&make_simple_block(1)).unwrap_err();
    assert!(matches!(err, ChainstoreError::Validation(_)));

    chain.blockchain.add_block(&make_simple_block(0)).unwrap();
    let err = chain.blockchain.add_block(&make_simple_block(0)).unwrap_err();
    assert!(matches!(err, ChainstoreError::Validation(_)));
}

#[test]
fn test_block_with_no_updates_is_rejected() {
    let chain = TestChain::new(100);

    let mut block = make_simple_block(0);
    block.updated_account_states.clear();
    assert!(matches!(
        chain.blockchain.add_block(&block).unwrap_err(),
        ChainstoreError::Validation(_)
    ));
}

/// Block whose hash and request signature verify under [`common::Sha256Crypto`].
fn signed_block(codec: &MessagePackCodec, crypto: &dyn CryptoProvider, number: u64) -> Block {
    let mut block = make_simple_block(number);

    let request = &mut block.signed_change_request;
    let message_bytes = codec.encode_change_request_message(&request.message).unwrap();
    request.signature = expected_signature(&message_bytes, &request.signer);

    let payload = codec.encode_block_payload(&block.payload()).unwrap();
    block.hash = crypto.hash(&payload);

    block
}

fn chain_with_crypto() -> (TempDir, FileBlockchain) {
    let dir = TempDir::new().unwrap();
    let blockchain = FileBlockchain::with_codec(
        FileBlockchainConfig::new(dir.path().join("blockchain")),
        Arc::new(MessagePackCodec::new()),
        Some(sha256_crypto()),
    )
    .unwrap();
    (dir, blockchain)
}

#[test]
fn test_verified_block_is_accepted() {
    let (_dir, blockchain) = chain_with_crypto();
    let codec = MessagePackCodec::new();

    let block = signed_block(&codec, &common::Sha256Crypto, 0);
    blockchain.add_block(&block).unwrap();
    assert_eq!(blockchain.get_last_block_number().unwrap(), 0);
}

#[test]
fn test_wrong_hash_is_rejected() {
    let (_dir, blockchain) = chain_with_crypto();
    let codec = MessagePackCodec::new();

    let mut block = signed_block(&codec, &common::Sha256Crypto, 0);
    block.hash = hex::encode([0u8; 32]);

    assert!(matches!(
        blockchain.add_block(&block).unwrap_err(),
        ChainstoreError::Validation(_)
    ));
}

#[test]
fn test_wrong_request_signature_is_rejected() {
    let (_dir, blockchain) = chain_with_crypto();
    let codec = MessagePackCodec::new();

    let mut block = signed_block(&codec, &common::Sha256Crypto, 0);
    block.signed_change_request.signature = hex::encode([0u8; 64]);
    // the block hash covers the tampered request, so recompute it; only the
    // signature check must fire
    let payload = codec.encode_block_payload(&block.payload()).unwrap();
    block.hash = common::Sha256Crypto.hash(&payload);

    assert_eq!(
        blockchain.add_block(&block).unwrap_err(),
        ChainstoreError::InvalidMessageSignature
    );
}

#[test]
fn test_without_provider_hashes_are_not_checked() {
    let chain = TestChain::new(100);

    let mut block = make_simple_block(0);
    block.hash = "not-a-real-hash".to_string();
    chain.blockchain.add_block(&block).unwrap();
}
