// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chainstore Domain
//!
//! The domain model of the chainstore ledger: the records a blockchain node
//! persists and the rules they obey, independent of any storage technology.
//!
//! ## Module Structure
//!
//! ### Entities
//! Records with identity that the store persists:
//!
//! - [`Block`]: one ordered transaction event, identified by its dense block
//!   number
//! - [`BlockchainState`]: a periodic account-state snapshot, identified by the
//!   number of the last block it folds in
//!
//! ### Value Objects
//! Immutable, identity-free objects compared by value:
//!
//! - [`AccountState`]: balance, balance lock, node and validator schedule of
//!   one account
//! - [`Node`]: a network node declaration
//! - [`PrimaryValidatorSchedule`]: the inclusive block window of a validator
//! - [`SignedChangeRequest`]: the signed coin-transfer request a block records
//!
//! ### Domain Services
//! Trait seams consumed by the storage engine and implemented elsewhere:
//!
//! - [`BlockchainCodec`]: deterministic, streamable record serialization
//! - [`CryptoProvider`]: hashing and signature verification
//!
//! ## Business Rules and Invariants
//!
//! - Block numbers are dense and start at 0; a block is only valid at the
//!   position it claims
//! - A block must update at least one account and carry hash and signature
//! - The genesis blockchain state references no block; every later state
//!   carries full linkage to its last block
//! - Timestamps are naive UTC; the type system makes timezone-carrying
//!   timestamps unrepresentable

pub mod entities;
pub mod error;
pub mod services;
pub mod value_objects;

// Re-export commonly used types for convenient access
pub use entities::{Block, BlockPayload, BlockchainState};
pub use error::ChainstoreError;
pub use services::{BlockchainCodec, CryptoProvider};
pub use value_objects::{
    AccountNumber, AccountState, CoinTransferMessage, CoinTransferTransaction, HexHash,
    HexSignature, Node, PrimaryValidatorSchedule, SignedChangeRequest,
};
