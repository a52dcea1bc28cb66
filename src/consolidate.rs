// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Flatten nested folders into the working root
//!
//! Images found below the root move up into it; everything else goes to the
//! not-relevant bucket, which is created up front. The special directories
//! are never entered.

use std::path::PathBuf;
use tracing::{error, info};
use walkdir::WalkDir;

use crate::files::{ensure_directory, is_image_file, move_file, remove_empty_directories};
use crate::naming::unique_path;
use crate::organizer::Layout;
use crate::report::{RunReport, Stage};
use crate::AppConfig;

/// Counts from one consolidation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsolidateSummary {
    pub images: usize,
    pub not_relevant: usize,
    pub directories_removed: usize,
}

/// Files in nested, non-special directories below the root, listed once
/// before anything moves.
pub fn nested_files(layout: &Layout, special: &[&str]) -> Vec<PathBuf> {
    let walker = WalkDir::new(&layout.root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && special.iter().any(|s| e.file_name() == *s)));

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(e) if e.depth() > 1 && e.file_type().is_file() => files.push(e.into_path()),
            Ok(_) => {}
            Err(e) => error!("Error walking {:?}: {}", layout.root, e),
        }
    }
    files
}

/// Move nested images into the root and everything else into the
/// not-relevant bucket, then drop directories left empty.
pub fn consolidate(layout: &Layout, config: &AppConfig, report: &mut RunReport) -> ConsolidateSummary {
    let special = config.layout.special_names();
    let mut summary = ConsolidateSummary::default();

    let bucket_ready = match ensure_directory(&layout.not_relevant) {
        Ok(created) => {
            if created {
                report.directories_created += 1;
            }
            true
        }
        Err(e) => {
            error!("Error creating {:?}: {}", layout.not_relevant, e);
            false
        }
    };

    for file in nested_files(layout, &special) {
        let Some(name) = file.file_name() else { continue };

        let (target_dir, is_image) = if is_image_file(&file, &config.image_extensions) {
            (&layout.root, true)
        } else if bucket_ready {
            (&layout.not_relevant, false)
        } else {
            report.skip(Stage::Consolidate, &file, "not-relevant bucket is unavailable");
            continue;
        };

        let destination = unique_path(&target_dir.join(name));
        match move_file(&file, &destination) {
            Ok(()) => {
                report.moved += 1;
                if is_image {
                    summary.images += 1;
                } else {
                    summary.not_relevant += 1;
                }
            }
            Err(e) => report.skip(Stage::Consolidate, &file, format!("move failed: {}", e)),
        }
    }

    summary.directories_removed = remove_empty_directories(&layout.root, &special);
    info!(
        "Consolidated {} image(s), set aside {} other file(s), removed {} empty director(ies)",
        summary.images, summary.not_relevant, summary.directories_removed
    );
    summary
}
