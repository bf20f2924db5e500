// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Concrete filesystem and serialization machinery beneath the record stores:
//!
//! - [`atomic_file`] — crash-safe temp-file + rename writes
//! - [`compression`] — the gz/bz2/xz codecs and suffix handling
//! - [`optimized_path`] — single-character directory fan-out
//! - [`file_store`] — the compressing, finalization-aware file store
//! - [`messagepack_codec`] — the default record codec

pub mod atomic_file;
pub mod compression;
pub mod file_store;
pub mod messagepack_codec;
pub mod optimized_path;

pub use atomic_file::{write_atomically, AtomicFileWriter, WriteMode};
pub use compression::{strip_compression_suffix, Compressor};
pub use file_store::{FileStore, SortDirection};
pub use messagepack_codec::MessagePackCodec;
pub use optimized_path::optimized_path;
