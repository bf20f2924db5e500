// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Block Store
//!
//! Append-oriented storage of blocks in chunk files of `chunk_size`
//! consecutive records, fronted by an LRU cache keyed by block number.
//!
//! ## Write path
//!
//! A block with number `n` is appended to the chunk starting at
//! `n - n % chunk_size`. The chunk file name always carries the range it
//! actually contains, so after the append the file is renamed from
//! `(start, n-1)` to `(start, n)`; when `n` completes the chunk, the file is
//! finalized (compressed, write bits dropped) and the next block opens a new
//! chunk. A crash between append and rename leaves a name that understates
//! the true end by one — [`BlockStore::recover`] repairs this on boot, and
//! readers merely miss the not-yet-announced newest block in the meantime.
//!
//! ## Read path
//!
//! Chunk existence is discovered by listing the storage directory (no
//! manifest to desync). Iteration is bidirectional and cache-aware: for each
//! chunk, the requested number range is first walked through the cache until
//! the first miss, and only then is the chunk file loaded, decoded and the
//! remainder emitted — a fully cache-resident window costs zero I/O. Reverse
//! iteration buffers one decoded chunk and emits it backwards; chunk size
//! bounds the buffer.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, warn};

use chainstore_domain::{Block, BlockchainCodec, ChainstoreError};

use crate::infrastructure::file_store::{FileStore, SortDirection};

use super::naming::{block_chunk_filename, parse_block_chunk_filename, BlockChunkMeta};

/// Iteration direction over block numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterDirection {
    Forward,
    Backward,
}

impl IterDirection {
    fn sort_direction(self) -> SortDirection {
        match self {
            IterDirection::Forward => SortDirection::Ascending,
            IterDirection::Backward => SortDirection::Descending,
        }
    }
}

/// Chunked block storage with a block-number-keyed LRU cache.
pub struct BlockStore {
    storage: FileStore,
    codec: Arc<dyn BlockchainCodec>,
    chunk_size: u64,
    cache: Mutex<LruCache<u64, Block>>,
}

impl BlockStore {
    /// Creates a store over `storage`.
    ///
    /// `chunk_size` is the number of blocks per chunk file; `cache_size`
    /// bounds the in-memory block cache.
    pub fn new(
        storage: FileStore,
        codec: Arc<dyn BlockchainCodec>,
        chunk_size: u64,
        cache_size: usize,
    ) -> Result<BlockStore, ChainstoreError> {
        if chunk_size == 0 {
            return Err(ChainstoreError::invalid_config("Block chunk size must be positive"));
        }
        let cache_size = NonZeroUsize::new(cache_size)
            .ok_or_else(|| ChainstoreError::invalid_config("Blocks cache size must be positive"))?;

        Ok(BlockStore {
            storage,
            codec,
            chunk_size,
            cache: Mutex::new(LruCache::new(cache_size)),
        })
    }

    /// Appends `block` to the current chunk, rolling the chunk file name
    /// forward and finalizing the chunk when `block` completes it. The block
    /// is cached on success.
    pub fn persist(&self, block: &Block) -> Result<(), ChainstoreError> {
        let block_number = block.block_number;
        let chunk_start = block_number - block_number % self.chunk_size;
        let offset = block_number % self.chunk_size;

        let append_end = if block_number == chunk_start {
            block_number
        } else {
            block_number - 1
        };
        let append_filename = block_chunk_filename(chunk_start, append_end);
        let filename = block_chunk_filename(chunk_start, block_number);

        let encoded = self.codec.encode_block(block)?;
        self.storage.append(Path::new(&append_filename), &encoded, false)?;

        if append_filename != filename {
            self.storage
                .rename(Path::new(&append_filename), Path::new(&filename))?;
        }

        if offset == self.chunk_size - 1 {
            debug!(chunk = %filename, "Finalizing completed block chunk");
            self.storage.finalize(Path::new(&filename))?;
        }

        self.cache.lock().put(block_number, block.clone());
        Ok(())
    }

    /// Point lookup by block number. `None` when the block does not exist.
    pub fn get(&self, block_number: u64) -> Result<Option<Block>, ChainstoreError> {
        if let Some(block) = self.cache.lock().get(&block_number) {
            return Ok(Some(block.clone()));
        }

        match self.iter_from(block_number)?.next() {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }

    /// Number of stored blocks, derived from chunk file names alone.
    pub fn count(&self) -> Result<u64, ChainstoreError> {
        let mut count = 0;
        for (_, meta) in self.chunk_files(SortDirection::Unsorted)? {
            count += meta.end - meta.start + 1;
        }

        Ok(count)
    }

    /// Highest stored block number, `-1` when the store is empty.
    pub fn last_block_number(&self) -> Result<i64, ChainstoreError> {
        let chunks = self.chunk_files(SortDirection::Descending)?;
        Ok(chunks
            .first()
            .map(|(_, meta)| meta.end as i64)
            .unwrap_or(-1))
    }

    /// All blocks in ascending order.
    pub fn iter(&self) -> Result<BlockIter<'_>, ChainstoreError> {
        self.make_iter(IterDirection::Forward, None)
    }

    /// All blocks in descending order.
    pub fn iter_reversed(&self) -> Result<BlockIter<'_>, ChainstoreError> {
        self.make_iter(IterDirection::Backward, None)
    }

    /// Blocks with `number >= block_number`, ascending.
    pub fn iter_from(&self, block_number: u64) -> Result<BlockIter<'_>, ChainstoreError> {
        self.make_iter(IterDirection::Forward, Some(block_number))
    }

    /// Blocks with `number <= block_number`, descending.
    pub fn iter_reversed_from(&self, block_number: u64) -> Result<BlockIter<'_>, ChainstoreError> {
        self.make_iter(IterDirection::Backward, Some(block_number))
    }

    /// Repairs the append-then-rename crash window: when the newest chunk
    /// file's name understates the blocks it actually contains, re-derive the
    /// end from the content and rename.
    pub fn recover(&self) -> Result<(), ChainstoreError> {
        let chunks = self.chunk_files(SortDirection::Descending)?;
        let Some((path, meta)) = chunks.into_iter().next() else {
            return Ok(());
        };

        if self.storage.is_finalized(&path)? {
            return Ok(());
        }

        let bytes = self.storage.load(&path)?;
        let blocks = self.codec.decode_block_stream(&bytes)?;
        let Some(last) = blocks.last() else {
            return Ok(());
        };

        if last.block_number != meta.end {
            let repaired = block_chunk_filename(meta.start, last.block_number);
            warn!(
                from = %path.display(),
                to = %repaired,
                "Repairing chunk file name after interrupted append"
            );
            self.storage.rename(&path, Path::new(&repaired))?;
        }

        Ok(())
    }

    /// Drops all persisted blocks and the cache.
    pub fn clear(&self) -> Result<(), ChainstoreError> {
        self.cache.lock().clear();
        self.storage.clear()
    }

    /// Empties the cache without touching persisted data.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    fn make_iter(
        &self,
        direction: IterDirection,
        start: Option<u64>,
    ) -> Result<BlockIter<'_>, ChainstoreError> {
        let files = self.chunk_files(direction.sort_direction())?;
        Ok(BlockIter {
            store: self,
            files: files.into_iter(),
            direction,
            start,
            buffered: Vec::new().into_iter(),
            done: false,
        })
    }

    /// Valid chunk files in the given order; unparsable names are logged and
    /// skipped.
    fn chunk_files(
        &self,
        sort_direction: SortDirection,
    ) -> Result<Vec<(PathBuf, BlockChunkMeta)>, ChainstoreError> {
        let mut chunks = Vec::new();
        for path in self.storage.list_directory(sort_direction)? {
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            match parse_block_chunk_filename(name) {
                Some(meta) => chunks.push((path, meta)),
                None => warn!(file = %path.display(), "File has invalid name format"),
            }
        }

        Ok(chunks)
    }

    /// Blocks of one chunk in `direction` order, starting at `start` (file
    /// boundary when `None`). Cache hits are served first; the file is only
    /// loaded and decoded for the part of the range the cache misses, and
    /// decoded blocks are cached for the next reader.
    fn blocks_from_file_cached(
        &self,
        path: &Path,
        meta: &BlockChunkMeta,
        direction: IterDirection,
        start: Option<u64>,
    ) -> Result<Vec<Block>, ChainstoreError> {
        let step: i64 = match direction {
            IterDirection::Forward => 1,
            IterDirection::Backward => -1,
        };
        let mut expected: i64 = match direction {
            IterDirection::Forward => start.unwrap_or(meta.start) as i64,
            IterDirection::Backward => start.unwrap_or(meta.end) as i64,
        };

        let mut blocks = Vec::new();
        {
            let mut cache = self.cache.lock();
            while meta.start as i64 <= expected && expected <= meta.end as i64 {
                let Some(block) = cache.get(&(expected as u64)) else {
                    break;
                };
                debug_assert_eq!(block.block_number as i64, expected);
                blocks.push(block.clone());
                expected += step;
            }
        }

        if meta.start as i64 <= expected && expected <= meta.end as i64 {
            blocks.extend(self.blocks_from_file(path, direction, expected as u64)?);
        }

        Ok(blocks)
    }

    /// Decodes a chunk file and returns its blocks in `direction` order from
    /// `start` on, caching every returned block.
    fn blocks_from_file(
        &self,
        path: &Path,
        direction: IterDirection,
        start: u64,
    ) -> Result<Vec<Block>, ChainstoreError> {
        let bytes = self.storage.load(path)?;
        let mut decoded = self.codec.decode_block_stream(&bytes)?;
        if direction == IterDirection::Backward {
            decoded.reverse();
        }

        let mut blocks = Vec::with_capacity(decoded.len());
        let mut cache = self.cache.lock();
        for block in decoded {
            let number = block.block_number;
            let skip = match direction {
                IterDirection::Forward => number < start,
                IterDirection::Backward => number > start,
            };
            if skip {
                continue;
            }

            cache.put(number, block.clone());
            blocks.push(block);
        }

        Ok(blocks)
    }
}

/// Bidirectional block iterator over chunk files, buffering one chunk at a
/// time. Yields `Err` once and stops if a chunk fails to load or decode.
pub struct BlockIter<'a> {
    store: &'a BlockStore,
    files: std::vec::IntoIter<(PathBuf, BlockChunkMeta)>,
    direction: IterDirection,
    start: Option<u64>,
    buffered: std::vec::IntoIter<Block>,
    done: bool,
}

impl Iterator for BlockIter<'_> {
    type Item = Result<Block, ChainstoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(block) = self.buffered.next() {
                return Some(Ok(block));
            }

            let (path, meta) = self.files.next()?;

            let file_start = match (self.direction, self.start) {
                // chunks entirely outside the requested window are skipped on
                // file name alone
                (IterDirection::Forward, Some(start)) if meta.end < start => continue,
                (IterDirection::Forward, Some(start)) => Some(start.max(meta.start)),
                (IterDirection::Backward, Some(start)) if meta.start > start => continue,
                (IterDirection::Backward, Some(start)) => Some(start.min(meta.end)),
                (_, None) => None,
            };

            match self
                .store
                .blocks_from_file_cached(&path, &meta, self.direction, file_start)
            {
                Ok(blocks) => self.buffered = blocks.into_iter(),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
