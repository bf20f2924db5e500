// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # MessagePack Codec
//!
//! The default [`BlockchainCodec`]: records are MessagePack maps with field
//! names, which keeps chunk files self-describing and tolerant of field
//! additions. MessagePack is self-delimiting, so a chunk file is simply the
//! concatenation of one encoding per block and
//! [`decode_block_stream`](BlockchainCodec::decode_block_stream) reads records
//! until the buffer is exhausted.

use std::io::Cursor;

use serde::de::DeserializeOwned;
use serde::Serialize;

use chainstore_domain::{
    Block, BlockPayload, BlockchainCodec, BlockchainState, ChainstoreError, CoinTransferMessage,
};

/// MessagePack implementation of the record codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessagePackCodec;

impl MessagePackCodec {
    pub fn new() -> MessagePackCodec {
        MessagePackCodec
    }

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ChainstoreError> {
        rmp_serde::to_vec_named(value)
            .map_err(|e| ChainstoreError::serialization(format!("MessagePack encoding failed: {}", e)))
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ChainstoreError> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| ChainstoreError::serialization(format!("MessagePack decoding failed: {}", e)))
    }
}

impl BlockchainCodec for MessagePackCodec {
    fn encode_block(&self, block: &Block) -> Result<Vec<u8>, ChainstoreError> {
        Self::encode(block)
    }

    fn decode_block(&self, bytes: &[u8]) -> Result<Block, ChainstoreError> {
        Self::decode(bytes)
    }

    fn decode_block_stream(&self, bytes: &[u8]) -> Result<Vec<Block>, ChainstoreError> {
        let mut cursor = Cursor::new(bytes);
        let mut blocks = Vec::new();

        while (cursor.position() as usize) < bytes.len() {
            let mut deserializer = rmp_serde::Deserializer::new(&mut cursor);
            let block = serde::Deserialize::deserialize(&mut deserializer).map_err(|e| {
                ChainstoreError::serialization(format!(
                    "MessagePack decoding failed at record {}: {}",
                    blocks.len(),
                    e
                ))
            })?;
            blocks.push(block);
        }

        Ok(blocks)
    }

    fn encode_block_payload(&self, payload: &BlockPayload<'_>) -> Result<Vec<u8>, ChainstoreError> {
        Self::encode(payload)
    }

    fn encode_change_request_message(
        &self,
        message: &CoinTransferMessage,
    ) -> Result<Vec<u8>, ChainstoreError> {
        Self::encode(message)
    }

    fn encode_blockchain_state(&self, state: &BlockchainState) -> Result<Vec<u8>, ChainstoreError> {
        Self::encode(state)
    }

    fn decode_blockchain_state(&self, bytes: &[u8]) -> Result<BlockchainState, ChainstoreError> {
        Self::decode(bytes)
    }
}
