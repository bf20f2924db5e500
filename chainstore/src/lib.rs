// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chainstore
//!
//! A durable, append-only file storage engine for blockchain ledgers. It
//! persists two record kinds — blocks (ordered transaction events) and
//! blockchain states (periodic account-state snapshots) — and answers
//! forward/backward scans, point lookups by block number, and
//! nearest-snapshot queries used to reconstruct balances and network topology
//! at any historical height.
//!
//! ## Layering
//!
//! ```text
//! blockchain   FileBlockchain facade + historical queries
//! stores       BlockStore / SnapshotStore / ProcessLock, file naming
//! infrastructure
//!              FileStore (compression, fan-out, finalization)
//!              AtomicFileWriter (temp file + rename)
//!              MessagePackCodec
//! ```
//!
//! Writers go facade → store → file store → atomic write, holding the
//! advisory process lock. Readers hit the in-memory LRU caches first and fall
//! back to decoding chunk files.
//!
//! ## Guarantees
//!
//! - **Durability**: every write is staged, fsynced and renamed into place;
//!   a crash leaves either the old or the new file, never a torn one
//! - **Immutability**: completed chunks and all snapshots are finalized —
//!   compressed when that saves space and stripped of write permissions
//! - **Single writer**: at most one process mutates a base directory,
//!   enforced by an advisory file lock; readers run concurrently and may
//!   trail the writer by at most the newest block
//!
//! ## Example
//!
//! ```no_run
//! use chainstore::{FileBlockchain, FileBlockchainConfig};
//!
//! # fn main() -> Result<(), chainstore_domain::ChainstoreError> {
//! let blockchain = FileBlockchain::new(FileBlockchainConfig::new("/var/lib/chainstore"))?;
//!
//! for result in blockchain.yield_blocks()? {
//!     let block = result?;
//!     println!("block {}", block.block_number);
//! }
//! # Ok(())
//! # }
//! ```

pub mod blockchain;
pub mod config;
pub mod infrastructure;
pub mod stores;

// Re-export the primary API surface
pub use blockchain::{AccountStateEntry, FileBlockchain};
pub use config::FileBlockchainConfig;
pub use infrastructure::{Compressor, FileStore, MessagePackCodec, SortDirection};
pub use stores::{BlockStore, ProcessLock, SnapshotStore};

// Domain types, re-exported so most consumers need only this crate
pub use chainstore_domain::{
    AccountNumber, AccountState, Block, BlockchainCodec, BlockchainState, ChainstoreError,
    CoinTransferMessage, CoinTransferTransaction, CryptoProvider, HexHash, HexSignature, Node,
    PrimaryValidatorSchedule, SignedChangeRequest,
};
