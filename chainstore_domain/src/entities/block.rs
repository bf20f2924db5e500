// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Block
//!
//! An immutable ledger event: one signed change request together with the
//! account states it produced. Blocks are numbered densely from 0; the number
//! doubles as the block's identity throughout the store.
//!
//! ## Structure
//!
//! - `block_number` — globally unique, dense, starting at 0
//! - `timestamp` — naive UTC datetime assigned by the producer
//! - `signed_change_request` — the request that caused the transition
//! - `updated_account_states` — states of exactly the accounts the request
//!   touched (sender, recipients, fee collectors)
//! - `hash` — hash of the block payload, computed by the producer's
//!   crypto provider
//! - `signature` — primary validator signature over the payload
//!
//! ## Immutability
//!
//! Blocks never change after creation. The store appends them to the current
//! chunk file and they become physically immutable once the chunk finalizes.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ChainstoreError;
use crate::value_objects::{AccountNumber, AccountState, HexHash, HexSignature, SignedChangeRequest};

/// One recorded state transition with a dense integer number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_number: u64,

    /// Naive UTC timestamp; the wire format carries no timezone.
    pub timestamp: NaiveDateTime,

    pub signed_change_request: SignedChangeRequest,

    /// Account number to updated account state map. `BTreeMap` keeps the
    /// serialized order canonical.
    pub updated_account_states: BTreeMap<AccountNumber, AccountState>,

    pub hash: HexHash,

    pub signature: HexSignature,
}

/// The hash-covered portion of a block: everything except `hash` and
/// `signature`. Serialized with the same codec as the block itself so the
/// producer and the store agree on the hashed bytes.
#[derive(Debug, Serialize)]
pub struct BlockPayload<'a> {
    pub block_number: u64,
    pub timestamp: NaiveDateTime,
    pub signed_change_request: &'a SignedChangeRequest,
    pub updated_account_states: &'a BTreeMap<AccountNumber, AccountState>,
}

impl Block {
    /// The hash-covered payload view of this block.
    pub fn payload(&self) -> BlockPayload<'_> {
        BlockPayload {
            block_number: self.block_number,
            timestamp: self.timestamp,
            signed_change_request: &self.signed_change_request,
            updated_account_states: &self.updated_account_states,
        }
    }

    /// Updated state of `account_number` in this block, if the block touched
    /// that account.
    pub fn account_state(&self, account_number: &str) -> Option<&AccountState> {
        self.updated_account_states.get(account_number)
    }

    /// Structural validation against the position the block is being added at.
    ///
    /// Checks dense numbering, a non-empty update set, and the presence of
    /// hash and signature. Signature *verification* is a separate concern
    /// handled through the crypto provider seam.
    pub fn validate(&self, expected_block_number: u64) -> Result<(), ChainstoreError> {
        if self.block_number != expected_block_number {
            return Err(ChainstoreError::validation(format!(
                "Block number {} is out of order, expected {}",
                self.block_number, expected_block_number
            )));
        }

        if self.updated_account_states.is_empty() {
            return Err(ChainstoreError::validation(
                "Block updated_account_states must not be empty",
            ));
        }

        if self.hash.is_empty() {
            return Err(ChainstoreError::validation("Block hash must not be empty"));
        }

        if self.signature.is_empty() {
            return Err(ChainstoreError::validation("Block signature must not be empty"));
        }

        Ok(())
    }
}
