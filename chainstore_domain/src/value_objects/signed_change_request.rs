// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Signed Change Request
//!
//! The externally produced request a block records: a coin-transfer message
//! signed by the sending account. The store treats the request as payload —
//! balance arithmetic and signature generation happen upstream — but its
//! structure is modeled so records stay strongly typed on disk.

use serde::{Deserialize, Serialize};

use crate::value_objects::{AccountNumber, HexHash, HexSignature};

/// One transfer leg: `amount` coins to `recipient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinTransferTransaction {
    pub recipient: AccountNumber,
    pub amount: u64,

    /// Whether this leg pays a node / primary validator fee.
    #[serde(default)]
    pub is_fee: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// The signed portion of a coin-transfer request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinTransferMessage {
    /// Balance lock of the sending account at signing time.
    pub balance_lock: HexHash,

    /// Transfer legs, fees included.
    pub txs: Vec<CoinTransferTransaction>,
}

impl CoinTransferMessage {
    /// Total amount leaving the sending account.
    pub fn total_amount(&self) -> u64 {
        self.txs.iter().map(|tx| tx.amount).sum()
    }
}

/// A coin-transfer message together with its signer and signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedChangeRequest {
    /// Account number of the signing account.
    pub signer: AccountNumber,

    pub message: CoinTransferMessage,

    pub signature: HexSignature,
}
