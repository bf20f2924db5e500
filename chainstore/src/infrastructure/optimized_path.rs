// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Path Fan-Out
//!
//! Filesystems degrade once a single directory accumulates tens of thousands
//! of entries. The store bounds entry counts by fanning files out into
//! single-character subdirectories derived from the file name itself:
//!
//! ```text
//! d/abcdef.ext  ->  d/a/b/c/d/e/f/abcdef.ext      (depth 6)
//! ```
//!
//! The inserted segments come from the lowercased alphanumeric characters of
//! the file stem (extension and compression suffix excluded), so the mapping
//! is a pure string transformation: no symlinks, no index, trivially
//! invertible by dropping the single-character segments.

use std::path::{Path, PathBuf};

use super::compression::strip_compression_suffix;

/// Rewrites `path` to its fanned-out physical form with up to `depth`
/// directory levels. A depth of 0 returns the path unchanged.
pub fn optimized_path(path: &Path, depth: usize) -> PathBuf {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return path.to_path_buf();
    };

    let logical_name = strip_compression_suffix(file_name);
    let stem = match logical_name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => logical_name,
    };

    let mut result = path.parent().map(Path::to_path_buf).unwrap_or_default();
    for c in stem
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(depth)
    {
        result.push(c.to_ascii_lowercase().to_string());
    }
    result.push(file_name);

    result
}
