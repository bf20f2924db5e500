// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Codec Seam
//!
//! Serialization of domain records to bytes is a domain service implemented in
//! the infrastructure layer. The trait is deliberately record-specific (not
//! generic over `Serialize`) so it stays object-safe and stores can hold a
//! `dyn BlockchainCodec` behind an `Arc`.
//!
//! ## Contract
//!
//! Implementations must be deterministic, streamable and self-delimiting:
//!
//! - encoding the same record twice yields identical bytes, field order
//!   canonical
//! - the concatenation of individually encoded records equals the encoding of
//!   the record sequence, so appending a record to a chunk file is a plain
//!   byte append
//! - [`decode_block_stream`](BlockchainCodec::decode_block_stream) consumes
//!   such a concatenation and yields the records in write order

use crate::entities::{Block, BlockPayload, BlockchainState};
use crate::error::ChainstoreError;
use crate::value_objects::CoinTransferMessage;

/// Serializes and deserializes the persisted record kinds.
pub trait BlockchainCodec: Send + Sync {
    /// Encodes one block as a self-delimited record.
    fn encode_block(&self, block: &Block) -> Result<Vec<u8>, ChainstoreError>;

    /// Decodes exactly one block from `bytes`.
    fn decode_block(&self, bytes: &[u8]) -> Result<Block, ChainstoreError>;

    /// Decodes a concatenation of block records in write order.
    fn decode_block_stream(&self, bytes: &[u8]) -> Result<Vec<Block>, ChainstoreError>;

    /// Encodes the hash-covered payload of a block. Producers hash and sign
    /// these exact bytes.
    fn encode_block_payload(&self, payload: &BlockPayload<'_>) -> Result<Vec<u8>, ChainstoreError>;

    /// Encodes the signed portion of a change request: the bytes the request
    /// signature covers.
    fn encode_change_request_message(
        &self,
        message: &CoinTransferMessage,
    ) -> Result<Vec<u8>, ChainstoreError>;

    fn encode_blockchain_state(&self, state: &BlockchainState) -> Result<Vec<u8>, ChainstoreError>;

    fn decode_blockchain_state(&self, bytes: &[u8]) -> Result<BlockchainState, ChainstoreError>;
}
