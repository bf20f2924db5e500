// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! This module provides the error taxonomy for the ledger store. Failures are
//! organized into logical categories so callers can handle them
//! systematically:
//!
//! - **Lock errors**: `BlockchainLocked` (another process holds the advisory
//!   lock), `BlockchainUnlocked` (an internal persist step ran outside a held
//!   lock)
//! - **Finalization errors**: `FinalizedFileWrite` — an attempted mutation of
//!   an immutable, finalized file
//! - **Format errors**: `Serialization` for record encode/decode failures
//! - **Validation errors**: `Validation` for records violating structural
//!   invariants, `InvalidMessageSignature` for signature verification failures
//! - **Path errors**: `InvalidPath` for absolute or escaping storage paths
//! - **Infrastructure errors**: `Io`, `Compression`, `InvalidConfiguration`
//!
//! ## Propagation Policy
//!
//! Only two conditions are recovered locally by the engine: directory entries
//! with unparsable names (logged and skipped during enumeration) and
//! compression-suffix probing during loads (try the next suffix). Everything
//! else surfaces to the caller through `Result` and `?`.

use thiserror::Error;

/// Domain-specific errors for the ledger store.
///
/// Each variant carries a descriptive message and is designed to provide
/// clear information about what went wrong and potentially how to fix it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainstoreError {
    #[error("Blockchain is locked: probably it is being modified by another process")]
    BlockchainLocked,

    #[error("Blockchain was expected to be locked")]
    BlockchainUnlocked,

    #[error("Could not write to finalized file: {0}")]
    FinalizedFileWrite(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid message signature")]
    InvalidMessageSignature,

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ChainstoreError {
    /// Creates a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a new invalid-path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Creates a new configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new IO error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates a new compression error
    pub fn compression(msg: impl Into<String>) -> Self {
        Self::Compression(msg.into())
    }

    /// Creates a new serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a new finalized-file-write error
    pub fn finalized_file_write(path: impl Into<String>) -> Self {
        Self::FinalizedFileWrite(path.into())
    }

    /// Checks if the error is recoverable by retrying the operation
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChainstoreError::BlockchainLocked | ChainstoreError::Io(_))
    }
}

impl From<std::io::Error> for ChainstoreError {
    fn from(err: std::io::Error) -> Self {
        ChainstoreError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ChainstoreError::finalized_file_write("/data/blocks/chunk.msgpack");
        assert_eq!(
            err.to_string(),
            "Could not write to finalized file: /data/blocks/chunk.msgpack"
        );

        let err = ChainstoreError::validation("missing hash");
        assert_eq!(err.to_string(), "Validation error: missing hash");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: ChainstoreError = io_err.into();
        assert!(matches!(err, ChainstoreError::Io(_)));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ChainstoreError::BlockchainLocked.is_recoverable());
        assert!(!ChainstoreError::BlockchainUnlocked.is_recoverable());
        assert!(!ChainstoreError::InvalidMessageSignature.is_recoverable());
    }
}
