// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Network node declaration attached to an account.

use serde::{Deserialize, Serialize};

use crate::value_objects::AccountNumber;

/// A node in the peer network, declared by the account that operates it.
///
/// Network addresses are kept in their wire form (URL strings); the store
/// never dereferences them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Account number of the operating account.
    pub identifier: AccountNumber,

    /// URLs under which the node is reachable.
    pub network_addresses: Vec<String>,

    /// Fee charged by the node for processing a transfer.
    #[serde(default)]
    pub fee_amount: u64,

    /// Account collecting the fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_account: Option<AccountNumber>,
}
