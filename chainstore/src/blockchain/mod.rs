// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File Blockchain
//!
//! The facade over the storage engine: a [`FileBlockchain`] owns a block
//! store, a snapshot store and the process lock, and exposes the mutating
//! surface plus the historical query layer.
//!
//! ## Directory layout
//!
//! ```text
//! <base_directory>/
//!   file.lock
//!   blocks/<fanout>/<start>-<end>-block-chunk.msgpack[.gz|.bz2|.xz]
//!   blockchain-states/<fanout>/<height>-arf.msgpack[.gz|.bz2|.xz]
//! ```
//!
//! ## Locking discipline
//!
//! `add_block`, `add_blockchain_state` and `clear` acquire the advisory
//! process lock (failing fast with
//! [`ChainstoreError::BlockchainLocked`] under contention); the
//! `persist_*` methods are internal steps of a held-lock operation and only
//! assert the lock is held. Readers never take the lock — they tolerate
//! observing an earlier consistent state instead.

mod queries;

use std::fs;
use std::sync::Arc;

use tracing::debug;

use chainstore_domain::{
    Block, BlockchainCodec, BlockchainState, ChainstoreError, CryptoProvider,
};

use crate::config::FileBlockchainConfig;
use crate::infrastructure::file_store::FileStore;
use crate::infrastructure::messagepack_codec::MessagePackCodec;
use crate::stores::{BlockStore, ProcessLock, SnapshotStore};

const BLOCKS_SUBDIR: &str = "blocks";
const BLOCKCHAIN_STATES_SUBDIR: &str = "blockchain-states";

/// A durable, append-only blockchain ledger store rooted at one directory.
pub struct FileBlockchain {
    config: FileBlockchainConfig,
    codec: Arc<dyn BlockchainCodec>,
    crypto: Option<Arc<dyn CryptoProvider>>,
    block_store: BlockStore,
    snapshot_store: SnapshotStore,
    lock: ProcessLock,
}

impl FileBlockchain {
    /// Opens (creating directories as needed) a store with the default
    /// MessagePack codec and no crypto provider.
    pub fn new(config: FileBlockchainConfig) -> Result<FileBlockchain, ChainstoreError> {
        Self::with_codec(config, Arc::new(MessagePackCodec::new()), None)
    }

    /// Opens a store with an explicit codec and optional crypto provider.
    /// With a provider configured, `add_block` re-derives the block hash and
    /// verifies the signature before persisting.
    pub fn with_codec(
        config: FileBlockchainConfig,
        codec: Arc<dyn BlockchainCodec>,
        crypto: Option<Arc<dyn CryptoProvider>>,
    ) -> Result<FileBlockchain, ChainstoreError> {
        config.validate()?;
        fs::create_dir_all(&config.base_directory)?;

        let blocks_storage = FileStore::new(
            config.base_directory.join(BLOCKS_SUBDIR),
            config.compressors.clone(),
            config.fanout_depth,
        )?;
        let states_storage = FileStore::new(
            config.base_directory.join(BLOCKCHAIN_STATES_SUBDIR),
            config.compressors.clone(),
            config.fanout_depth,
        )?;

        let block_store = BlockStore::new(
            blocks_storage,
            Arc::clone(&codec),
            config.block_chunk_size,
            config.blocks_cache_capacity(),
        )?;
        let snapshot_store = SnapshotStore::new(
            states_storage,
            Arc::clone(&codec),
            config.blockchain_states_cache_size,
        )?;
        let lock = ProcessLock::new(config.base_directory.join(&config.lock_filename));

        Ok(FileBlockchain {
            config,
            codec,
            crypto,
            block_store,
            snapshot_store,
            lock,
        })
    }

    pub fn config(&self) -> &FileBlockchainConfig {
        &self.config
    }

    /// The advisory process lock. Callers composing several mutations into
    /// one critical section hold it across the whole sequence; the individual
    /// `persist_*` steps then run under the already-held lock.
    pub fn process_lock(&self) -> &ProcessLock {
        &self.lock
    }

    pub(crate) fn block_store(&self) -> &BlockStore {
        &self.block_store
    }

    pub(crate) fn snapshot_store(&self) -> &SnapshotStore {
        &self.snapshot_store
    }

    /// Validates and persists the next block.
    pub fn add_block(&self, block: &Block) -> Result<(), ChainstoreError> {
        let _guard = self.lock.acquire()?;

        self.validate_block(block)?;
        self.persist_block(block)
    }

    /// Persists a block without validation. Internal step of a held-lock
    /// operation; fails with [`ChainstoreError::BlockchainUnlocked`]
    /// otherwise.
    pub fn persist_block(&self, block: &Block) -> Result<(), ChainstoreError> {
        self.lock.expect_locked()?;

        debug!(block_number = block.block_number, "Persisting block");
        self.block_store.persist(block)
    }

    /// Validates and persists a blockchain state.
    pub fn add_blockchain_state(&self, state: &BlockchainState) -> Result<(), ChainstoreError> {
        let _guard = self.lock.acquire()?;

        state.validate(state.is_genesis())?;
        self.persist_blockchain_state(state)
    }

    /// Persists a blockchain state without validation. Internal step of a
    /// held-lock operation.
    pub fn persist_blockchain_state(&self, state: &BlockchainState) -> Result<(), ChainstoreError> {
        self.lock.expect_locked()?;

        debug!(last_block_number = ?state.last_block_number, "Persisting blockchain state");
        self.snapshot_store.persist(state)
    }

    /// Removes every persisted record and empties both caches.
    pub fn clear(&self) -> Result<(), ChainstoreError> {
        let _guard = self.lock.acquire()?;

        self.block_store.clear()?;
        self.snapshot_store.clear()
    }

    /// Empties both caches; persisted data is untouched.
    pub fn clear_caches(&self) {
        self.block_store.clear_cache();
        self.snapshot_store.clear_cache();
    }

    /// Repairs the chunk-name lag left by a crash between append and rename.
    /// Intended to run once at startup, before serving queries.
    pub fn recover(&self) -> Result<(), ChainstoreError> {
        let _guard = self.lock.acquire()?;
        self.block_store.recover()
    }

    fn validate_block(&self, block: &Block) -> Result<(), ChainstoreError> {
        block.validate(self.get_next_block_number()?)?;

        if let Some(crypto) = &self.crypto {
            let payload = self.codec.encode_block_payload(&block.payload())?;
            if crypto.hash(&payload) != block.hash {
                return Err(ChainstoreError::validation(format!(
                    "Block {} hash does not match its payload",
                    block.block_number
                )));
            }

            let request = &block.signed_change_request;
            let message = self.codec.encode_change_request_message(&request.message)?;
            crypto.verify_signature(&message, &request.signer, &request.signature)?;
        }

        Ok(())
    }
}

pub use queries::AccountStateEntry;
