// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Compressing Filesystem Store
//!
//! Capacity-optimizing storage for the ledger's record files. The store owns
//! one base directory and exposes save/append/load/finalize over *logical*
//! paths relative to it; physically every file is fanned out into
//! single-character subdirectories (see
//! [`optimized_path`](super::optimized_path::optimized_path)) and may carry a
//! compression suffix once finalized.
//!
//! ## Finalization
//!
//! A finalized file never changes again. Finalizing runs compression
//! selection — each configured codec compresses the raw bytes and the
//! smallest result strictly below the raw size replaces the raw file under
//! `path.<suffix>` — then drops every write permission bit. Writes to a
//! finalized target fail with
//! [`ChainstoreError::FinalizedFileWrite`].
//!
//! ## Atomicity
//!
//! All writes go through the temp-file + rename primitive in
//! [`atomic_file`](super::atomic_file), staged in the store's `.tmp`
//! directory. Appends are copy-then-append, so a crash mid-write never
//! corrupts the published file.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use chainstore_domain::ChainstoreError;

use super::atomic_file::{write_atomically, WriteMode};
use super::compression::{strip_compression_suffix, Compressor};
use super::optimized_path::optimized_path;

/// Directory name for atomic-write scratch files, skipped during listing.
const TEMP_SUBDIR: &str = ".tmp";

/// Listing order for [`FileStore::list_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
    Unsorted,
}

/// Compressing, finalization-aware file store rooted at one base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
    temp_dir: PathBuf,
    compressors: Vec<Compressor>,
    fanout_depth: usize,
}

impl FileStore {
    /// Creates a store rooted at the absolute `base_path`.
    ///
    /// `compressors` is the ordered candidate set for compression selection;
    /// an empty set disables compression but not finalization.
    pub fn new(
        base_path: impl Into<PathBuf>,
        compressors: Vec<Compressor>,
        fanout_depth: usize,
    ) -> Result<FileStore, ChainstoreError> {
        let base_path = base_path.into();
        if !base_path.is_absolute() {
            return Err(ChainstoreError::invalid_config(format!(
                "Storage base path must be absolute, got '{}'",
                base_path.display()
            )));
        }

        let temp_dir = base_path.join(TEMP_SUBDIR);
        Ok(FileStore {
            base_path,
            temp_dir,
            compressors,
            fanout_depth,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Overwrites `path` with `data`; finalizes afterwards when `is_final`.
    pub fn save(&self, path: &Path, data: &[u8], is_final: bool) -> Result<(), ChainstoreError> {
        self.persist(path, data, WriteMode::Overwrite, is_final)
    }

    /// Atomically appends `data` to `path`; finalizes afterwards when
    /// `is_final`.
    pub fn append(&self, path: &Path, data: &[u8], is_final: bool) -> Result<(), ChainstoreError> {
        self.persist(path, data, WriteMode::Append, is_final)
    }

    /// Loads `path`, probing every known compression suffix before falling
    /// back to the raw file. Decompression is transparent.
    pub fn load(&self, path: &Path) -> Result<Vec<u8>, ChainstoreError> {
        let absolute = self.absolute_path(path)?;

        for compressor in Compressor::ALL {
            let candidate = suffixed(&absolute, compressor);
            match fs::read(&candidate) {
                Ok(data) => return compressor.decompress(&data),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(fs::read(&absolute)?)
    }

    /// Runs compression selection on `path`, then drops all write permission
    /// bits from the surviving file.
    pub fn finalize(&self, path: &Path) -> Result<(), ChainstoreError> {
        let absolute = self.absolute_path(path)?;
        self.finalize_absolute(&absolute)
    }

    /// Renames `source` to `destination`, creating parent directories.
    pub fn rename(&self, source: &Path, destination: &Path) -> Result<(), ChainstoreError> {
        let source = self.absolute_path(source)?;
        let destination = self.absolute_path(destination)?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&source, &destination)?;
        Ok(())
    }

    /// Whether `path` is finalized: a compressed sibling exists, or the raw
    /// file exists without write permission bits.
    pub fn is_finalized(&self, path: &Path) -> Result<bool, ChainstoreError> {
        let absolute = self.absolute_path(path)?;
        Ok(is_finalized_absolute(&absolute))
    }

    /// Logical paths of every stored file: compression suffixes stripped,
    /// fan-out segments removed, sorted by file name.
    ///
    /// The listing names files only; no file content is read.
    pub fn list_directory(
        &self,
        sort_direction: SortDirection,
    ) -> Result<Vec<PathBuf>, ChainstoreError> {
        let mut names = Vec::new();
        if self.base_path.is_dir() {
            collect_file_names(&self.base_path, &mut names)?;
        }

        match sort_direction {
            SortDirection::Ascending => names.sort(),
            SortDirection::Descending => {
                names.sort();
                names.reverse();
            }
            SortDirection::Unsorted => {}
        }

        Ok(names.into_iter().map(PathBuf::from).collect())
    }

    /// Removes every stored file, the scratch directory included.
    ///
    /// Finalized files are read-only; write permissions are restored first so
    /// removal also succeeds on platforms that honor the read-only bit on
    /// unlink.
    pub fn clear(&self) -> Result<(), ChainstoreError> {
        if !self.base_path.exists() {
            return Ok(());
        }

        restore_write_permissions(&self.base_path);
        fs::remove_dir_all(&self.base_path)?;
        Ok(())
    }

    fn persist(
        &self,
        path: &Path,
        data: &[u8],
        mode: WriteMode,
        is_final: bool,
    ) -> Result<(), ChainstoreError> {
        let absolute = self.absolute_path(path)?;

        if is_finalized_absolute(&absolute) {
            return Err(ChainstoreError::finalized_file_write(format!(
                "{}",
                absolute.display()
            )));
        }

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomically(&absolute, mode, data, &self.temp_dir)?;

        if is_final {
            self.finalize_absolute(&absolute)?;
        }

        Ok(())
    }

    fn finalize_absolute(&self, absolute: &Path) -> Result<(), ChainstoreError> {
        let surviving = self.compress(absolute)?;
        drop_write_permissions(&surviving)?;
        Ok(())
    }

    /// Compression selection: the smallest candidate strictly below the raw
    /// size replaces the raw file under its suffix; otherwise the raw file
    /// stays. Returns the surviving path.
    fn compress(&self, absolute: &Path) -> Result<PathBuf, ChainstoreError> {
        if self.compressors.is_empty() {
            return Ok(absolute.to_path_buf());
        }

        let original = fs::read(absolute)?;
        debug!(file = %absolute.display(), size = original.len(), "Selecting compression");

        let mut best: Option<(Compressor, Vec<u8>)> = None;
        let mut best_size = original.len();

        for compressor in &self.compressors {
            let compressed = compressor.compress(&original)?;
            let ratio = compressed.len() as f64 / original.len().max(1) as f64;
            debug!(
                file = %absolute.display(),
                codec = compressor.suffix(),
                size = compressed.len(),
                ratio,
                "Compression candidate"
            );

            if compressed.len() < best_size {
                best_size = compressed.len();
                best = Some((*compressor, compressed));
            }
        }

        let Some((compressor, compressed)) = best else {
            return Ok(absolute.to_path_buf());
        };

        let compressed_path = suffixed(absolute, compressor);
        debug!(file = %compressed_path.display(), size = compressed.len(), "Writing compressed file");
        write_atomically(&compressed_path, WriteMode::Overwrite, &compressed, &self.temp_dir)?;
        fs::remove_file(absolute)?;

        Ok(compressed_path)
    }

    /// Maps a logical path to its fanned-out absolute path, rejecting
    /// absolute inputs and traversal outside the base directory.
    fn absolute_path(&self, path: &Path) -> Result<PathBuf, ChainstoreError> {
        if path.is_absolute() {
            return Err(ChainstoreError::invalid_path(format!(
                "Cannot use absolute path: '{}'",
                path.display()
            )));
        }

        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        {
            return Err(ChainstoreError::invalid_path(format!(
                "Path '{}' is not relative to '{}'",
                path.display(),
                self.base_path.display()
            )));
        }

        Ok(self
            .base_path
            .join(optimized_path(path, self.fanout_depth)))
    }
}

fn suffixed(path: &Path, compressor: Compressor) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(compressor.suffix());
    PathBuf::from(name)
}

fn is_finalized_absolute(absolute: &Path) -> bool {
    for compressor in Compressor::ALL {
        if suffixed(absolute, compressor).exists() {
            return true;
        }
    }

    match fs::metadata(absolute) {
        Ok(metadata) => !has_write_permissions(&metadata),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn has_write_permissions(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o222 != 0
}

#[cfg(not(unix))]
fn has_write_permissions(metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

fn drop_write_permissions(path: &Path) -> Result<(), ChainstoreError> {
    let metadata = fs::metadata(path)?;
    let mut permissions = metadata.permissions();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() & !0o222);
    }
    #[cfg(not(unix))]
    permissions.set_readonly(true);

    fs::set_permissions(path, permissions)?;
    Ok(())
}

/// Best-effort recursive chmod +w, used before directory removal.
fn restore_write_permissions(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            restore_write_permissions(&path);
        } else if let Ok(metadata) = fs::metadata(&path) {
            let mut permissions = metadata.permissions();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                permissions.set_mode(permissions.mode() | 0o600);
            }
            #[cfg(not(unix))]
            permissions.set_readonly(false);
            let _ = fs::set_permissions(&path, permissions);
        }
    }
}

/// Collects logical file names under `dir`, recursing through fan-out
/// directories. Dot-directories (the scratch dir) are skipped; compression
/// suffixes are stripped.
fn collect_file_names(dir: &Path, out: &mut Vec<String>) -> Result<(), ChainstoreError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if !hidden {
                collect_file_names(&path, out)?;
            }
        } else if file_type.is_file() {
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                out.push(strip_compression_suffix(name).to_string());
            }
        }
    }

    Ok(())
}
