// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Blockchain State
//!
//! A materialized account-state snapshot as of some block number: the fold of
//! all blocks up to and including `last_block_number` over the previous
//! snapshot. Snapshots are produced externally once per completed block chunk
//! and persisted immutably; the query layer treats them as memoization points
//! so no historical query ever replays more than one chunk of blocks.
//!
//! The *genesis* state is the snapshot the chain starts from. It has no
//! predecessor blocks, so all of its `last_*` / `next_*` fields are `None`.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ChainstoreError;
use crate::value_objects::{AccountNumber, AccountState, HexHash};

/// Account-state snapshot as of `last_block_number` (`None` for genesis).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockchainState {
    /// Account number to account state map.
    pub account_states: BTreeMap<AccountNumber, AccountState>,

    /// Number of the last block folded into this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_block_number: Option<u64>,

    /// Identifier (hash) of the last block folded into this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_block_identifier: Option<HexHash>,

    /// Timestamp of the last block folded into this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_block_timestamp: Option<NaiveDateTime>,

    /// Identifier the next block added on top of this state must reference.
    /// For genesis the state hash itself is used instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_block_identifier: Option<HexHash>,
}

impl BlockchainState {
    /// Whether this is the genesis state.
    pub fn is_genesis(&self) -> bool {
        self.last_block_number.is_none()
    }

    /// Number of the first block to be added on top of this state.
    pub fn next_block_number(&self) -> u64 {
        match self.last_block_number {
            Some(n) => n + 1,
            None => 0,
        }
    }

    /// State of `account_number`, if the snapshot knows the account.
    pub fn account_state(&self, account_number: &str) -> Option<&AccountState> {
        self.account_states.get(account_number)
    }

    /// Structural validation. Genesis must carry no block linkage; every
    /// later state must carry all of it.
    pub fn validate(&self, is_initial: bool) -> Result<(), ChainstoreError> {
        if is_initial {
            if self.last_block_number.is_some()
                || self.last_block_identifier.is_some()
                || self.last_block_timestamp.is_some()
                || self.next_block_identifier.is_some()
            {
                return Err(ChainstoreError::validation(
                    "Initial blockchain state must not reference any block",
                ));
            }
        } else {
            if self.last_block_number.is_none() {
                return Err(ChainstoreError::validation(
                    "Blockchain state last_block_number must be set",
                ));
            }
            if self.last_block_identifier.is_none() {
                return Err(ChainstoreError::validation(
                    "Blockchain state last_block_identifier must be set",
                ));
            }
            if self.last_block_timestamp.is_none() {
                return Err(ChainstoreError::validation(
                    "Blockchain state last_block_timestamp must be set",
                ));
            }
            if self.next_block_identifier.is_none() {
                return Err(ChainstoreError::validation(
                    "Blockchain state next_block_identifier must be set",
                ));
            }
        }

        Ok(())
    }
}
