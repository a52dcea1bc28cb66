// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Per-run summary of what was renamed, moved and skipped

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::Result;

/// Pipeline phase in which an item was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Consolidate,
    Title,
    Categorize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Consolidate => "consolidate",
            Stage::Title => "title",
            Stage::Categorize => "categorize",
        };
        f.write_str(name)
    }
}

/// An item the run could not process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedItem {
    pub timestamp: DateTime<Utc>,
    pub path: PathBuf,
    pub stage: Stage,
    pub reason: String,
}

/// Counters and skip log for one run
#[derive(Debug, Default)]
pub struct RunReport {
    pub renamed: usize,
    pub moved: usize,
    pub directories_created: usize,
    pub skipped: Vec<SkippedItem>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped item and log it
    pub fn skip(&mut self, stage: Stage, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("Skipping {:?} during {}: {}", path, stage, reason);
        self.skipped.push(SkippedItem {
            timestamp: Utc::now(),
            path: path.to_path_buf(),
            stage,
            reason,
        });
    }

    /// Skipped items for one stage
    pub fn skipped_in(&self, stage: Stage) -> impl Iterator<Item = &SkippedItem> {
        self.skipped.iter().filter(move |s| s.stage == stage)
    }

    /// Log the one-line summary
    pub fn log_summary(&self) {
        info!(
            "Renamed {} file(s), moved {} file(s), created {} director(ies), skipped {} item(s)",
            self.renamed,
            self.moved,
            self.directories_created,
            self.skipped.len()
        );
    }

    /// Append skipped items to a JSON Lines file
    pub fn append_skipped(&self, path: &Path) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        for item in &self.skipped {
            let json = serde_json::to_string(item)?;
            writeln!(file, "{}", json)?;
        }

        Ok(())
    }
}
