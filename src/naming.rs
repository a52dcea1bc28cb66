// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filename sanitizing and collision-free destination paths

use std::path::{Path, PathBuf};

/// Characters that are never allowed in a generated file or directory name
pub const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Longest sanitized name, in characters
pub const MAX_NAME_CHARS: usize = 100;

/// Returned when nothing usable is left after sanitizing
pub const FALLBACK_NAME: &str = "unnamed";

/// Turn an arbitrary title into a safe, bounded filename fragment.
///
/// Strips reserved characters and control characters, collapses runs of
/// whitespace into single spaces, truncates to [`MAX_NAME_CHARS`] and trims.
/// Never returns an empty string, `.` or `..`.
pub fn sanitize_filename(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c))
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_NAME_CHARS).collect();
    let name = truncated.trim();

    if name.is_empty() || name.chars().all(|c| c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Return `candidate` if nothing exists there, otherwise the first free
/// `stem_N.ext` next to it (N counting up from 1).
///
/// Checks the filesystem on every call.
pub fn unique_path(candidate: &Path) -> PathBuf {
    if !exists(candidate) {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter: u64 = 1;
    loop {
        let candidate = parent.join(format!("{}_{}{}", stem, counter, ext));
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// File stem used as an image's title
pub fn title_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// Dangling symlinks count as occupied.
fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
