// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Entities
//!
//! The two record kinds the ledger store persists:
//!
//! - [`Block`] — one ordered transaction event, identified by its dense
//!   block number
//! - [`BlockchainState`] — a periodic account-state snapshot, identified by
//!   the number of the last block it folds in (`None` for genesis)

mod block;
mod blockchain_state;

pub use block::{Block, BlockPayload};
pub use blockchain_state::BlockchainState;
