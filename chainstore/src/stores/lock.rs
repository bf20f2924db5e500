// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Process Lock
//!
//! Exclusive advisory file lock guarding every mutating path. One writer
//! process per base directory: the lock is acquired with zero timeout, so a
//! second process mutating the same directory fails fast with
//! [`ChainstoreError::BlockchainLocked`] instead of queueing.
//!
//! Within the owning process the lock is reentrant: `add_block` acquires it
//! and its internal `persist_block` step only asserts that it is already held
//! (via [`ProcessLock::expect_locked`]), failing with
//! [`ChainstoreError::BlockchainUnlocked`] if called on its own.

use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::debug;

use chainstore_domain::ChainstoreError;

/// Reentrant exclusive advisory lock on a lock file.
#[derive(Debug)]
pub struct ProcessLock {
    path: PathBuf,
    state: Mutex<LockState>,
}

#[derive(Debug)]
struct LockState {
    depth: u32,
    file: Option<fslock::LockFile>,
}

/// Holds the lock; released on drop.
#[derive(Debug)]
pub struct LockGuard<'a> {
    lock: &'a ProcessLock,
}

impl ProcessLock {
    pub fn new(path: impl Into<PathBuf>) -> ProcessLock {
        ProcessLock {
            path: path.into(),
            state: Mutex::new(LockState { depth: 0, file: None }),
        }
    }

    /// Acquires the lock without waiting.
    ///
    /// Reentrant within this process; contention with another process fails
    /// with [`ChainstoreError::BlockchainLocked`].
    pub fn acquire(&self) -> Result<LockGuard<'_>, ChainstoreError> {
        let mut state = self.state.lock();

        if state.depth == 0 {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut file = fslock::LockFile::open(&self.path)?;
            if !file.try_lock()? {
                return Err(ChainstoreError::BlockchainLocked);
            }

            debug!(path = %self.path.display(), "Acquired process lock");
            state.file = Some(file);
        }

        state.depth += 1;
        Ok(LockGuard { lock: self })
    }

    /// Asserts the lock is currently held by this process.
    pub fn expect_locked(&self) -> Result<(), ChainstoreError> {
        if self.state.lock().depth == 0 {
            return Err(ChainstoreError::BlockchainUnlocked);
        }

        Ok(())
    }

    /// Whether this process currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.state.lock().depth > 0
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.depth = state.depth.saturating_sub(1);

        if state.depth == 0 {
            if let Some(mut file) = state.file.take() {
                let _ = file.unlock();
                debug!(path = %self.path.display(), "Released process lock");
            }
        }
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
