// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Cryptography seam.
//!
//! The store never implements cryptographic primitives. When a provider is
//! configured, block hashes are re-derived and signatures verified before a
//! block is persisted; without one the store trusts the producer.

use crate::error::ChainstoreError;

/// Hashes canonical record payloads and verifies signatures over them.
///
/// Hashes and signatures are exchanged as opaque hex strings.
pub trait CryptoProvider: Send + Sync {
    /// Hex-encoded hash of `payload`.
    fn hash(&self, payload: &[u8]) -> String;

    /// Verifies `signature` by `signer` over `payload`.
    ///
    /// # Errors
    ///
    /// [`ChainstoreError::InvalidMessageSignature`] when the signature does
    /// not verify.
    fn verify_signature(
        &self,
        payload: &[u8],
        signer: &str,
        signature: &str,
    ) -> Result<(), ChainstoreError>;
}
