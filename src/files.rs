// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filesystem helpers shared by every pipeline phase

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::Result;

/// Check whether a path has one of the given image extensions (case-insensitive)
pub fn is_image_file(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Image files directly inside `dir`, in directory listing order.
///
/// The result is a snapshot; later renames and moves are not reflected.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path, extensions) {
            images.push(path);
        }
    }
    Ok(images)
}

/// Names of the subdirectories directly inside `dir`
pub fn list_subdirectories(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Create a directory (and parents) if it does not exist yet.
///
/// Returns `true` when the directory was newly created.
pub fn ensure_directory(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    info!("Directory {:?} is ready", path.file_name().unwrap_or(path.as_os_str()));
    Ok(true)
}

/// Move a file, falling back to copy-and-delete across filesystems
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if let Err(rename_err) = fs::rename(src, dest) {
        debug!("Rename {:?} -> {:?} failed ({}), trying copy", src, dest, rename_err);
        if fs::copy(src, dest).is_err() {
            return Err(rename_err.into());
        }
        fs::remove_file(src)?;
    }
    info!(
        "Moved {:?} to {:?}",
        src.file_name().unwrap_or(src.as_os_str()),
        dest
    );
    Ok(())
}

/// Remove every empty directory below `root`, deepest first.
///
/// Directories whose first component under `root` is one of `keep` are left
/// alone, as is `root` itself. Returns the number of directories removed.
pub fn remove_empty_directories(root: &Path, keep: &[&str]) -> usize {
    let mut directories = Vec::new();

    let mut walker = WalkDir::new(root).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                error!("Error walking {:?}: {}", root, e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.depth() == 1 && keep.iter().any(|k| entry.file_name() == *k) {
            walker.skip_current_dir();
            continue;
        }
        directories.push(entry.into_path());
    }

    // Pre-order listing reversed puts children before their parents.
    let mut removed = 0;
    for path in directories.iter().rev() {
        let is_empty = match fs::read_dir(path) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) => {
                error!("Error reading directory {:?}: {}", path, e);
                continue;
            }
        };

        if is_empty {
            match fs::remove_dir(path) {
                Ok(()) => {
                    info!("Removed empty directory {:?}", path);
                    removed += 1;
                }
                Err(e) => error!("Error removing directory {:?}: {}", path, e),
            }
        }
    }

    removed
}
