// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Compression Codecs
//!
//! The three codecs finalized files may be stored under, keyed by the file
//! suffix they contribute (`.gz`, `.bz2`, `.xz`). Finalization compresses a
//! file with every configured codec and keeps the smallest result; reads probe
//! the known suffixes and decompress transparently.
//!
//! All codecs run at their highest compression level: finalized files are
//! written once and read many times, so ratio beats speed here.

use std::io::Read;

use chainstore_domain::ChainstoreError;

/// A compression codec and its file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compressor {
    Gz,
    Bz2,
    Xz,
}

impl Compressor {
    /// Every known codec, in the default selection order.
    pub const ALL: [Compressor; 3] = [Compressor::Gz, Compressor::Bz2, Compressor::Xz];

    /// File suffix without the leading dot.
    pub fn suffix(&self) -> &'static str {
        match self {
            Compressor::Gz => "gz",
            Compressor::Bz2 => "bz2",
            Compressor::Xz => "xz",
        }
    }

    /// Resolves a suffix (without the leading dot) back to its codec.
    pub fn from_suffix(suffix: &str) -> Option<Compressor> {
        Compressor::ALL.iter().copied().find(|c| c.suffix() == suffix)
    }

    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
        match self {
            Compressor::Gz => compress_gzip(data),
            Compressor::Bz2 => compress_bzip2(data),
            Compressor::Xz => compress_xz(data),
        }
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
        match self {
            Compressor::Gz => decompress_gzip(data),
            Compressor::Bz2 => decompress_bzip2(data),
            Compressor::Xz => decompress_xz(data),
        }
    }
}

/// Strips a known compression suffix from a file name, if present.
pub fn strip_compression_suffix(file_name: &str) -> &str {
    for compressor in Compressor::ALL {
        if let Some(stripped) = file_name.strip_suffix(compressor.suffix()) {
            if let Some(stripped) = stripped.strip_suffix('.') {
                return stripped;
            }
        }
    }

    file_name
}

fn compress_gzip(data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
    let mut output = Vec::new();
    let mut encoder = flate2::read::GzEncoder::new(data, flate2::Compression::best());

    encoder
        .read_to_end(&mut output)
        .map_err(|e| ChainstoreError::compression(format!("Gzip compression failed: {}", e)))?;

    Ok(output)
}

fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
    let mut output = Vec::new();
    let mut decoder = flate2::read::GzDecoder::new(data);

    decoder
        .read_to_end(&mut output)
        .map_err(|e| ChainstoreError::compression(format!("Gzip decompression failed: {}", e)))?;

    Ok(output)
}

fn compress_bzip2(data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
    let mut output = Vec::new();
    let mut encoder = bzip2::read::BzEncoder::new(data, bzip2::Compression::best());

    encoder
        .read_to_end(&mut output)
        .map_err(|e| ChainstoreError::compression(format!("Bzip2 compression failed: {}", e)))?;

    Ok(output)
}

fn decompress_bzip2(data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
    let mut output = Vec::new();
    let mut decoder = bzip2::read::BzDecoder::new(data);

    decoder
        .read_to_end(&mut output)
        .map_err(|e| ChainstoreError::compression(format!("Bzip2 decompression failed: {}", e)))?;

    Ok(output)
}

fn compress_xz(data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
    let mut output = Vec::new();
    let mut encoder = xz2::read::XzEncoder::new(data, 9);

    encoder
        .read_to_end(&mut output)
        .map_err(|e| ChainstoreError::compression(format!("Xz compression failed: {}", e)))?;

    Ok(output)
}

fn decompress_xz(data: &[u8]) -> Result<Vec<u8>, ChainstoreError> {
    let mut output = Vec::new();
    let mut decoder = xz2::read::XzDecoder::new(data);

    decoder
        .read_to_end(&mut output)
        .map_err(|e| ChainstoreError::compression(format!("Xz decompression failed: {}", e)))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_codecs() {
        let data = b"A".repeat(10_000);
        for compressor in Compressor::ALL {
            let compressed = compressor.compress(&data).unwrap();
            assert!(compressed.len() < data.len(), "{:?}", compressor);
            assert_eq!(compressor.decompress(&compressed).unwrap(), data);
        }
    }

    #[test]
    fn test_suffix_round_trip() {
        for compressor in Compressor::ALL {
            assert_eq!(Compressor::from_suffix(compressor.suffix()), Some(compressor));
        }
        assert_eq!(Compressor::from_suffix("zip"), None);
    }

    #[test]
    fn test_strip_compression_suffix() {
        assert_eq!(strip_compression_suffix("a.txt.gz"), "a.txt");
        assert_eq!(strip_compression_suffix("a.txt.bz2"), "a.txt");
        assert_eq!(strip_compression_suffix("a.txt.xz"), "a.txt");
        assert_eq!(strip_compression_suffix("a.txt"), "a.txt");
        // no dot before the suffix, not a compression extension
        assert_eq!(strip_compression_suffix("agz"), "agz");
    }
}
