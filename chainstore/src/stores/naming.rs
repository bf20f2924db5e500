// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk and Snapshot File Naming
//!
//! File names encode record ordering so that lexicographic filesystem order
//! equals block order:
//!
//! - block chunks: `{start:020}-{end:020}-block-chunk.msgpack` — 20-digit
//!   zero-padded block numbers
//! - blockchain states: `{last_block_number:010}-arf.msgpack` — 10-digit
//!   zero-padded height, or `!!!!!!!!!!` for the genesis state (`!` sorts
//!   before every digit, so genesis always lists first)
//!
//! Parsers accept an optional trailing compression suffix and reject inverted
//! chunk ranges. Unknown names are not an error at this level; enumeration
//! callers log and skip them.

use crate::infrastructure::compression::{strip_compression_suffix, Compressor};

/// Zero-padding width of block numbers in chunk file names.
pub const ORDER_OF_BLOCK: usize = 20;

/// Zero-padding width of heights in blockchain state file names.
pub const ORDER_OF_BLOCKCHAIN_STATE: usize = 10;

const BLOCK_CHUNK_SUFFIX: &str = "-block-chunk.msgpack";
const BLOCKCHAIN_STATE_SUFFIX: &str = "-arf.msgpack";
const GENESIS_SENTINEL: char = '!';

/// Parsed block chunk file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockChunkMeta {
    pub start: u64,
    pub end: u64,
    pub compression: Option<Compressor>,
}

/// Parsed blockchain state file name. `last_block_number` is `None` for the
/// genesis state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockchainStateMeta {
    pub last_block_number: Option<u64>,
    pub compression: Option<Compressor>,
}

/// Name of the chunk holding blocks `start..=end`.
pub fn block_chunk_filename(start: u64, end: u64) -> String {
    format!(
        "{start:0width$}-{end:0width$}{BLOCK_CHUNK_SUFFIX}",
        width = ORDER_OF_BLOCK
    )
}

/// Name of the blockchain state file for `last_block_number` (`None` for
/// genesis).
pub fn blockchain_state_filename(last_block_number: Option<u64>) -> String {
    match last_block_number {
        Some(n) => format!(
            "{n:0width$}{BLOCKCHAIN_STATE_SUFFIX}",
            width = ORDER_OF_BLOCKCHAIN_STATE
        ),
        None => format!(
            "{}{BLOCKCHAIN_STATE_SUFFIX}",
            GENESIS_SENTINEL.to_string().repeat(ORDER_OF_BLOCKCHAIN_STATE)
        ),
    }
}

/// Parses a block chunk file name, tolerating a compression suffix.
pub fn parse_block_chunk_filename(file_name: &str) -> Option<BlockChunkMeta> {
    let compression = compression_of(file_name);
    let logical = strip_compression_suffix(file_name);

    let range = logical.strip_suffix(BLOCK_CHUNK_SUFFIX)?;
    let (start, end) = range.split_once('-')?;
    let start = parse_decimal(start)?;
    let end = parse_decimal(end)?;

    if start > end {
        return None;
    }

    Some(BlockChunkMeta {
        start,
        end,
        compression,
    })
}

/// Parses a blockchain state file name, tolerating a compression suffix.
pub fn parse_blockchain_state_filename(file_name: &str) -> Option<BlockchainStateMeta> {
    let compression = compression_of(file_name);
    let logical = strip_compression_suffix(file_name);

    let prefix = logical.strip_suffix(BLOCKCHAIN_STATE_SUFFIX)?;
    if prefix.is_empty() {
        return None;
    }

    let last_block_number = if prefix.chars().all(|c| c == GENESIS_SENTINEL) {
        None
    } else {
        Some(parse_decimal(prefix)?)
    };

    Some(BlockchainStateMeta {
        last_block_number,
        compression,
    })
}

fn parse_decimal(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

fn compression_of(file_name: &str) -> Option<Compressor> {
    let (_, suffix) = file_name.rsplit_once('.')?;
    Compressor::from_suffix(suffix)
}
