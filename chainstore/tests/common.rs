// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared fixtures for the integration tests: deterministic accounts, block
//! and snapshot builders, and a blockchain rooted in a scratch directory.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

use chainstore::{
    AccountState, Block, BlockchainState, ChainstoreError, CoinTransferMessage,
    CoinTransferTransaction, CryptoProvider, FileBlockchain, FileBlockchainConfig, Node,
    SignedChangeRequest,
};

/// Installs a test-writer tracing subscriber; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Deterministic 64-hex-character account number.
pub fn account(tag: u8) -> String {
    hex::encode([tag; 32])
}

/// Fixed base timestamp plus `offset_seconds`; always in the past.
pub fn timestamp(offset_seconds: u64) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2021, 5, 19)
        .expect("valid date")
        .and_hms_micro_opt(10, 34, 5, 54106)
        .expect("valid time")
        + chrono::Duration::seconds(offset_seconds as i64)
}

/// A block numbered `block_number` carrying the given account updates.
pub fn make_block(block_number: u64, updates: Vec<(String, AccountState)>) -> Block {
    let updated_account_states: BTreeMap<String, AccountState> = updates.into_iter().collect();

    Block {
        block_number,
        timestamp: timestamp(block_number),
        updated_account_states,
        signed_change_request: SignedChangeRequest {
            signer: account(0xaa),
            message: CoinTransferMessage {
                balance_lock: account(0xaa),
                txs: vec![CoinTransferTransaction {
                    recipient: account(0xbb),
                    amount: 10 + block_number,
                    is_fee: false,
                    memo: None,
                }],
            },
            signature: hex::encode([0xcc; 64]),
        },
        hash: hex::encode(Sha256::digest(block_number.to_be_bytes())),
        signature: hex::encode([0xdd; 64]),
    }
}

/// A block whose only update bumps one account's balance.
pub fn make_simple_block(block_number: u64) -> Block {
    make_block(
        block_number,
        vec![(account(0xaa), AccountState::with_balance(1000 - block_number))],
    )
}

/// Genesis blockchain state over the given accounts.
pub fn make_genesis(accounts: Vec<(String, AccountState)>) -> BlockchainState {
    BlockchainState {
        account_states: accounts.into_iter().collect(),
        ..BlockchainState::default()
    }
}

/// Non-genesis blockchain state with full block linkage.
pub fn make_snapshot(
    last_block_number: u64,
    accounts: Vec<(String, AccountState)>,
) -> BlockchainState {
    BlockchainState {
        account_states: accounts.into_iter().collect(),
        last_block_number: Some(last_block_number),
        last_block_identifier: Some(hex::encode(
            Sha256::digest(last_block_number.to_be_bytes()),
        )),
        last_block_timestamp: Some(timestamp(last_block_number)),
        next_block_identifier: Some(hex::encode(
            Sha256::digest((last_block_number + 1).to_be_bytes()),
        )),
    }
}

/// A node declaration for `identifier`.
pub fn make_node(identifier: &str, port: u16) -> Node {
    Node {
        identifier: identifier.to_string(),
        network_addresses: vec![format!("http://127.0.0.1:{}/", port)],
        fee_amount: 1,
        fee_account: None,
    }
}

/// A blockchain in a scratch directory that lives as long as the fixture.
pub struct TestChain {
    pub blockchain: FileBlockchain,
    // owns the scratch directory for the lifetime of the fixture
    pub dir: TempDir,
}

impl TestChain {
    /// Store with the given chunk size and default settings otherwise.
    pub fn new(block_chunk_size: u64) -> TestChain {
        let dir = TempDir::new().expect("scratch directory");
        let mut config = FileBlockchainConfig::new(dir.path().join("blockchain"));
        config.block_chunk_size = block_chunk_size;

        let blockchain = FileBlockchain::new(config).expect("open blockchain");
        TestChain { blockchain, dir }
    }

    /// Appends simple blocks numbered `0..count`.
    pub fn add_simple_blocks(&self, count: u64) {
        for n in 0..count {
            self.blockchain
                .add_block(&make_simple_block(n))
                .expect("add block");
        }
    }
}

/// SHA-256 based crypto provider: the "signature" over a payload is the hex
/// digest of payload + signer. Deterministic and dependency-free, which is
/// all the tests need.
pub struct Sha256Crypto;

impl CryptoProvider for Sha256Crypto {
    fn hash(&self, payload: &[u8]) -> String {
        hex::encode(Sha256::digest(payload))
    }

    fn verify_signature(
        &self,
        payload: &[u8],
        signer: &str,
        signature: &str,
    ) -> Result<(), ChainstoreError> {
        if expected_signature(payload, signer) == signature {
            Ok(())
        } else {
            Err(ChainstoreError::InvalidMessageSignature)
        }
    }
}

/// The signature [`Sha256Crypto`] accepts for `payload` signed by `signer`.
pub fn expected_signature(payload: &[u8], signer: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(signer.as_bytes());
    hex::encode(hasher.finalize())
}

/// Crypto provider handle for [`FileBlockchain::with_codec`].
pub fn sha256_crypto() -> Arc<dyn CryptoProvider> {
    Arc::new(Sha256Crypto)
}
