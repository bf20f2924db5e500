// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Historical Queries
//!
//! Derived views over the block and snapshot stores. Every query follows the
//! same shape: locate the nearest snapshot strictly below the requested
//! height, then fold the (at most one chunk of) blocks between the snapshot
//! and the height over it. Snapshots are memoization points — no query ever
//! replays the whole chain.
//!
//! Heights are `i64` at this layer: `-1` addresses the pre-genesis state and
//! `get_last_block_number` returns `-1` for an empty chain, mirroring the
//! dense `u64` numbering of stored blocks shifted by the genesis sentinel.

use std::collections::HashSet;

use chainstore_domain::{
    AccountNumber, AccountState, Block, BlockchainState, ChainstoreError, HexHash, Node,
    PrimaryValidatorSchedule,
};

use crate::infrastructure::file_store::SortDirection;
use crate::stores::{BlockIter, SnapshotIter};

use super::FileBlockchain;

/// An account number together with its effective state at some height.
pub type AccountStateEntry = (AccountNumber, AccountState);

impl FileBlockchain {
    // Block access

    /// Highest stored block number; `-1` when no block exists.
    pub fn get_last_block_number(&self) -> Result<i64, ChainstoreError> {
        self.block_store().last_block_number()
    }

    /// Number the next block must carry.
    pub fn get_next_block_number(&self) -> Result<u64, ChainstoreError> {
        Ok((self.get_last_block_number()? + 1) as u64)
    }

    /// Point lookup by block number.
    pub fn get_block_by_number(&self, block_number: u64) -> Result<Option<Block>, ChainstoreError> {
        self.block_store().get(block_number)
    }

    /// Number of stored blocks, derived from chunk file names.
    pub fn get_block_count(&self) -> Result<u64, ChainstoreError> {
        self.block_store().count()
    }

    pub fn get_first_block(&self) -> Result<Option<Block>, ChainstoreError> {
        match self.yield_blocks()?.next() {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }

    pub fn get_last_block(&self) -> Result<Option<Block>, ChainstoreError> {
        match self.yield_blocks_reversed()?.next() {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }

    /// All blocks in ascending order.
    pub fn yield_blocks(&self) -> Result<BlockIter<'_>, ChainstoreError> {
        self.block_store().iter()
    }

    /// All blocks in descending order.
    pub fn yield_blocks_reversed(&self) -> Result<BlockIter<'_>, ChainstoreError> {
        self.block_store().iter_reversed()
    }

    /// Blocks with `number >= block_number`, ascending.
    pub fn yield_blocks_from(&self, block_number: u64) -> Result<BlockIter<'_>, ChainstoreError> {
        self.block_store().iter_from(block_number)
    }

    /// Blocks from `from_block_number` (the chain tip when `None`) downward,
    /// stopping above the nearest strictly-earlier snapshot.
    pub fn yield_blocks_till_snapshot(
        &self,
        from_block_number: Option<i64>,
    ) -> Result<Box<dyn Iterator<Item = Result<Block, ChainstoreError>> + '_>, ChainstoreError>
    {
        let from = match from_block_number {
            Some(n) => n,
            None => self.get_last_block_number()?,
        };
        if from < 0 {
            return Ok(Box::new(std::iter::empty()));
        }

        let snapshot = self.get_blockchain_state_by_block_number(from, false)?;
        let cutoff = snapshot_height(&snapshot);

        Ok(Box::new(
            self.block_store()
                .iter_reversed_from(from as u64)?
                .take_while(move |result| match result {
                    Ok(block) => block.block_number as i64 > cutoff,
                    Err(_) => true,
                }),
        ))
    }

    // Snapshot access

    /// All blockchain states in chain order (genesis first).
    pub fn yield_blockchain_states(&self) -> Result<SnapshotIter<'_>, ChainstoreError> {
        self.snapshot_store().iter(SortDirection::Ascending)
    }

    /// All blockchain states in reverse chain order.
    pub fn yield_blockchain_states_reversed(&self) -> Result<SnapshotIter<'_>, ChainstoreError> {
        self.snapshot_store().iter(SortDirection::Descending)
    }

    pub fn get_blockchain_states_count(&self) -> Result<usize, ChainstoreError> {
        self.snapshot_store().count()
    }

    /// The highest stored blockchain state, if any.
    pub fn get_last_blockchain_state(&self) -> Result<Option<BlockchainState>, ChainstoreError> {
        match self.yield_blockchain_states_reversed()?.next() {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }

    /// Nearest snapshot at or below `block_number`: the first state scanned
    /// in reverse chain order with `last_block_number < block_number`
    /// (`<=` when `inclusive`). Genesis matches every height.
    ///
    /// # Errors
    ///
    /// A store without a genesis state cannot answer; this is a corruption of
    /// the directory, surfaced as a validation error.
    pub fn get_blockchain_state_by_block_number(
        &self,
        block_number: i64,
        inclusive: bool,
    ) -> Result<BlockchainState, ChainstoreError> {
        for result in self.yield_blockchain_states_reversed()? {
            let state = result?;
            let matches = match state.last_block_number {
                None => true,
                Some(last) if inclusive => (last as i64) <= block_number,
                Some(last) => (last as i64) < block_number,
            };
            if matches {
                return Ok(state);
            }
        }

        Err(ChainstoreError::validation(format!(
            "No blockchain state found for block number {}",
            block_number
        )))
    }

    // Account state queries

    /// Effective state of every known account at `from_block_number` (the
    /// chain tip when `None`): each account's most recent update in the
    /// blocks above the nearest snapshot, the snapshot's states for everyone
    /// else. Each account appears exactly once.
    pub fn yield_account_states(
        &self,
        from_block_number: Option<i64>,
    ) -> Result<Vec<AccountStateEntry>, ChainstoreError> {
        let from = match from_block_number {
            Some(n) => n,
            None => self.get_last_block_number()?,
        };

        let snapshot = self.get_blockchain_state_by_block_number(from, false)?;
        let cutoff = snapshot_height(&snapshot);

        let mut seen: HashSet<AccountNumber> = HashSet::new();
        let mut entries = Vec::new();

        if from >= 0 {
            for result in self.block_store().iter_reversed_from(from as u64)? {
                let block = result?;
                if block.block_number as i64 <= cutoff {
                    break;
                }

                for (account, state) in &block.updated_account_states {
                    if seen.insert(account.clone()) {
                        entries.push((account.clone(), state.clone()));
                    }
                }
            }
        }

        for (account, state) in &snapshot.account_states {
            if seen.insert(account.clone()) {
                entries.push((account.clone(), state.clone()));
            }
        }

        Ok(entries)
    }

    /// Balance of `account_number` as of `on_block_number`; `None` when the
    /// account is unknown at that height.
    pub fn get_account_balance(
        &self,
        account_number: &str,
        on_block_number: i64,
    ) -> Result<Option<u64>, ChainstoreError> {
        self.account_attribute(account_number, on_block_number, |state| Some(state.balance))
    }

    /// Balance of `account_number` at the chain tip.
    pub fn get_account_current_balance(
        &self,
        account_number: &str,
    ) -> Result<Option<u64>, ChainstoreError> {
        self.get_account_balance(account_number, self.get_last_block_number()?)
    }

    /// Balance lock of `account_number` as of `on_block_number`. An account
    /// that never transferred is locked to its own account number.
    pub fn get_account_balance_lock(
        &self,
        account_number: &str,
        on_block_number: i64,
    ) -> Result<HexHash, ChainstoreError> {
        let lock =
            self.account_attribute(account_number, on_block_number, |state| {
                state.balance_lock.clone()
            })?;
        Ok(lock.unwrap_or_else(|| account_number.to_string()))
    }

    /// Balance lock of `account_number` at the chain tip.
    pub fn get_account_current_balance_lock(
        &self,
        account_number: &str,
    ) -> Result<HexHash, ChainstoreError> {
        self.get_account_balance_lock(account_number, self.get_last_block_number()?)
    }

    /// Primary validator schedule of `account_number` as of
    /// `on_block_number`.
    pub fn get_primary_validator_schedule(
        &self,
        account_number: &str,
        on_block_number: i64,
    ) -> Result<Option<PrimaryValidatorSchedule>, ChainstoreError> {
        self.account_attribute(account_number, on_block_number, |state| {
            state.primary_validator_schedule
        })
    }

    // Network queries

    /// Node declared by `identifier` as of `on_block_number` (the chain tip
    /// when `None`).
    pub fn get_node_by_identifier(
        &self,
        identifier: &str,
        on_block_number: Option<i64>,
    ) -> Result<Option<Node>, ChainstoreError> {
        let on = match on_block_number {
            Some(n) => n,
            None => self.get_last_block_number()?,
        };
        self.account_attribute(identifier, on, |state| state.node.clone())
    }

    /// Every node known at `block_number` (the chain tip when `None`), one
    /// entry per operating account.
    pub fn yield_nodes(&self, block_number: Option<i64>) -> Result<Vec<Node>, ChainstoreError> {
        Ok(self
            .yield_account_states(block_number)?
            .into_iter()
            .filter_map(|(_, state)| state.node)
            .collect())
    }

    pub fn has_nodes(&self) -> Result<bool, ChainstoreError> {
        Ok(!self.yield_nodes(None)?.is_empty())
    }

    /// Node whose schedule covers `block_number` (the next block when
    /// `None`). The most recently updated schedule wins; the snapshot is
    /// consulted only when no block above it updated a covering schedule.
    pub fn get_primary_validator(
        &self,
        block_number: Option<u64>,
    ) -> Result<Option<Node>, ChainstoreError> {
        let target = match block_number {
            Some(n) => n,
            None => self.get_next_block_number()?,
        };

        // The pair (last block, nearest snapshot) is captured once so a
        // concurrent append cannot make the scan straddle two states.
        let last_block_number = self.get_last_block_number()?;
        let snapshot =
            self.get_blockchain_state_by_block_number(last_block_number, last_block_number > -1)?;
        let cutoff = snapshot_height(&snapshot);

        if last_block_number >= 0 {
            for result in self.block_store().iter_reversed_from(last_block_number as u64)? {
                let block = result?;
                if block.block_number as i64 <= cutoff {
                    break;
                }

                for (account, state) in &block.updated_account_states {
                    if schedule_includes(state, target) {
                        return self.get_node_by_identifier(account, None);
                    }
                }
            }
        }

        for (account, state) in &snapshot.account_states {
            if schedule_includes(state, target) {
                return self.get_node_by_identifier(account, None);
            }
        }

        Ok(None)
    }

    /// First value of an account attribute found scanning blocks from
    /// `on_block_number` down to the nearest snapshot, falling back to the
    /// snapshot itself.
    fn account_attribute<T>(
        &self,
        account_number: &str,
        on_block_number: i64,
        extract: impl Fn(&AccountState) -> Option<T>,
    ) -> Result<Option<T>, ChainstoreError> {
        let snapshot = self.get_blockchain_state_by_block_number(on_block_number, false)?;
        let cutoff = snapshot_height(&snapshot);

        if on_block_number >= 0 {
            for result in self.block_store().iter_reversed_from(on_block_number as u64)? {
                let block = result?;
                if block.block_number as i64 <= cutoff {
                    break;
                }

                if let Some(state) = block.account_state(account_number) {
                    if let Some(value) = extract(state) {
                        return Ok(Some(value));
                    }
                }
            }
        }

        Ok(snapshot
            .account_state(account_number)
            .and_then(|state| extract(state)))
    }
}

fn snapshot_height(state: &BlockchainState) -> i64 {
    state
        .last_block_number
        .map(|last| last as i64)
        .unwrap_or(-1)
}

fn schedule_includes(state: &AccountState, block_number: u64) -> bool {
    state
        .primary_validator_schedule
        .as_ref()
        .is_some_and(|schedule| schedule.includes(block_number))
}
