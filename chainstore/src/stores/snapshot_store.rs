// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Snapshot Store
//!
//! One file per blockchain state, named by the height of the last block it
//! folds in so that lexicographic file order equals chain order (genesis
//! first). Snapshots are persisted finalized — compressed and write-protected
//! on the spot — and served through an LRU cache keyed by logical path.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, warn};

use chainstore_domain::{BlockchainCodec, BlockchainState, ChainstoreError};

use crate::infrastructure::file_store::{FileStore, SortDirection};

use super::naming::{
    blockchain_state_filename, parse_blockchain_state_filename, BlockchainStateMeta,
};

/// Blockchain state storage with a path-keyed LRU cache.
pub struct SnapshotStore {
    storage: FileStore,
    codec: Arc<dyn BlockchainCodec>,
    cache: Mutex<LruCache<PathBuf, BlockchainState>>,
}

impl SnapshotStore {
    pub fn new(
        storage: FileStore,
        codec: Arc<dyn BlockchainCodec>,
        cache_size: usize,
    ) -> Result<SnapshotStore, ChainstoreError> {
        let cache_size = NonZeroUsize::new(cache_size).ok_or_else(|| {
            ChainstoreError::invalid_config("Blockchain states cache size must be positive")
        })?;

        Ok(SnapshotStore {
            storage,
            codec,
            cache: Mutex::new(LruCache::new(cache_size)),
        })
    }

    /// Persists `state` under its height-derived file name, finalized
    /// immediately: snapshots never change after being written.
    pub fn persist(&self, state: &BlockchainState) -> Result<(), ChainstoreError> {
        let filename = blockchain_state_filename(state.last_block_number);
        let encoded = self.codec.encode_blockchain_state(state)?;

        debug!(file = %filename, "Persisting blockchain state");
        self.storage.save(Path::new(&filename), &encoded, true)
    }

    /// Loads the state stored under `path`, through the cache.
    pub fn load(&self, path: &Path) -> Result<BlockchainState, ChainstoreError> {
        if let Some(state) = self.cache.lock().get(path) {
            return Ok(state.clone());
        }

        debug_assert!(matches!(self.storage.is_finalized(path), Ok(true)));
        let bytes = self.storage.load(path)?;
        let state = self.codec.decode_blockchain_state(&bytes)?;
        self.cache.lock().put(path.to_path_buf(), state.clone());

        Ok(state)
    }

    /// All stored states in the given chain order.
    pub fn iter(&self, sort_direction: SortDirection) -> Result<SnapshotIter<'_>, ChainstoreError> {
        let files = self.state_files(sort_direction)?;
        Ok(SnapshotIter {
            store: self,
            files: files.into_iter(),
        })
    }

    /// Number of stored states.
    pub fn count(&self) -> Result<usize, ChainstoreError> {
        Ok(self.state_files(SortDirection::Unsorted)?.len())
    }

    /// Drops all persisted states and the cache.
    pub fn clear(&self) -> Result<(), ChainstoreError> {
        self.cache.lock().clear();
        self.storage.clear()
    }

    /// Empties the cache without touching persisted data.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    fn state_files(
        &self,
        sort_direction: SortDirection,
    ) -> Result<Vec<(PathBuf, BlockchainStateMeta)>, ChainstoreError> {
        let mut files = Vec::new();
        for path in self.storage.list_directory(sort_direction)? {
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            match parse_blockchain_state_filename(name) {
                Some(meta) => files.push((path, meta)),
                None => warn!(file = %path.display(), "File has invalid name format"),
            }
        }

        Ok(files)
    }
}

/// Iterator over stored blockchain states in listing order.
pub struct SnapshotIter<'a> {
    store: &'a SnapshotStore,
    files: std::vec::IntoIter<(PathBuf, BlockchainStateMeta)>,
}

impl Iterator for SnapshotIter<'_> {
    type Item = Result<BlockchainState, ChainstoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (path, _) = self.files.next()?;
        Some(self.store.load(&path))
    }
}
