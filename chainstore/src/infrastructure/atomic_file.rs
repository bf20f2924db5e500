// /////////////////////////////////////////////////////////////////////////////
// Chainstore RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Atomic File Primitive
//!
//! Crash-safe writes via the temp-file + rename pattern: content is staged in
//! a scratch directory on the same filesystem, fsynced, then renamed over the
//! target. A reader either sees the old file or the new one, never a torn
//! write; an abort between write and rename leaves the target unmodified.
//!
//! ## Modes
//!
//! - [`WriteMode::Overwrite`] — the temp file starts empty
//! - [`WriteMode::Append`] — the current target content is copied into the
//!   temp file first, so the rename publishes old-content + appended-bytes
//!
//! ## Temp file lifecycle
//!
//! The temp path is derived deterministically from the target basename, so a
//! temp file orphaned by a crash or abort is garbage-collected the next time
//! a writer is created for the same target. Dropping a writer without calling
//! [`AtomicFileWriter::commit`] removes the temp file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use chainstore_domain::ChainstoreError;

/// How the target content relates to the staged content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the target.
    Overwrite,
    /// Keep the current target content and write after it.
    Append,
}

/// A staged write that publishes atomically on [`commit`](Self::commit).
#[derive(Debug)]
pub struct AtomicFileWriter {
    target: PathBuf,
    temp_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl AtomicFileWriter {
    /// Stages a write to `target` using `temp_dir` as scratch space.
    ///
    /// `temp_dir` must be on the same filesystem as `target` for the final
    /// rename to be atomic. A stale temp file for the same target is removed.
    pub fn create(
        target: &Path,
        mode: WriteMode,
        temp_dir: &Path,
    ) -> Result<AtomicFileWriter, ChainstoreError> {
        let file_name = target
            .file_name()
            .ok_or_else(|| ChainstoreError::invalid_path(format!("{}", target.display())))?;

        fs::create_dir_all(temp_dir)?;
        let temp_path = temp_dir.join(file_name);
        if temp_path.exists() {
            debug!(temp = %temp_path.display(), "Removing stale temp file");
            fs::remove_file(&temp_path)?;
        }

        let mut file = File::create(&temp_path)?;
        if mode == WriteMode::Append && target.exists() {
            let mut source = File::open(target)?;
            io::copy(&mut source, &mut file)?;
        }

        Ok(AtomicFileWriter {
            target: target.to_path_buf(),
            temp_path,
            file: Some(file),
            committed: false,
        })
    }

    /// Durably publishes the staged content: fsync the temp file, rename it
    /// over the target, fsync the parent directory.
    pub fn commit(mut self) -> Result<(), ChainstoreError> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }

        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&self.temp_path, &self.target)?;
        self.committed = true;

        sync_parent_dir(&self.target);
        Ok(())
    }
}

impl Write for AtomicFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::other("write after commit")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AtomicFileWriter {
    fn drop(&mut self) {
        // Close the handle before unlinking so this also behaves on platforms
        // that refuse to remove open files.
        drop(self.file.take());
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Stages `data` and commits it in one call.
pub fn write_atomically(
    target: &Path,
    mode: WriteMode,
    data: &[u8],
    temp_dir: &Path,
) -> Result<(), ChainstoreError> {
    let mut writer = AtomicFileWriter::create(target, mode, temp_dir)?;
    writer.write_all(data)?;
    writer.commit()
}

/// Durability of the rename itself requires the directory entry to reach
/// disk. Best effort; not all filesystems support fsync on directories.
fn sync_parent_dir(path: &Path) {
    #[cfg(unix)]
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}
