// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Account State
//!
//! The full state of a single account at a point in the chain: its coin
//! balance, the balance lock gating the next transfer, the network node the
//! account operates (if any), and the window during which that node acts as
//! the primary validator.
//!
//! Blocks carry *updated* account states; blockchain state snapshots carry the
//! materialized state of every known account. Each field is independently
//! addressable by the historical queries, which is why all but `balance` are
//! optional: an update that does not touch a field leaves it `None`.

use serde::{Deserialize, Serialize};

use crate::value_objects::{HexHash, Node, PrimaryValidatorSchedule};

/// State of one account as of some block.
///
/// `None` fields in an updated state mean "unchanged by this block"; queries
/// fall through to earlier blocks and finally to the nearest snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    /// Account balance in coins.
    #[serde(default)]
    pub balance: u64,

    /// Hash the next coin-transfer request must reference. Defaults to the
    /// account number itself for accounts that never transferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_lock: Option<HexHash>,

    /// Network node operated by this account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<Node>,

    /// Window during which this account's node is the primary validator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_validator_schedule: Option<PrimaryValidatorSchedule>,
}

impl AccountState {
    /// Creates an account state holding only a balance.
    pub fn with_balance(balance: u64) -> Self {
        AccountState {
            balance,
            ..AccountState::default()
        }
    }

    /// The effective balance lock: the explicit lock if set, otherwise the
    /// account number itself.
    pub fn balance_lock_or<'a>(&'a self, account_number: &'a str) -> &'a str {
        self.balance_lock.as_deref().unwrap_or(account_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_lock_falls_back_to_account_number() {
        let state = AccountState::with_balance(100);
        assert_eq!(state.balance_lock_or("cafe01"), "cafe01");

        let state = AccountState {
            balance_lock: Some("deadbeef".to_string()),
            ..AccountState::with_balance(100)
        };
        assert_eq!(state.balance_lock_or("cafe01"), "deadbeef");
    }
}
