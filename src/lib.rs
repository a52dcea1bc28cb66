// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Shotsort: AI-assisted Screenshot Organizer
//!
//! Titles screenshots with a vision model, renames them, and files them into
//! category folders suggested by the same model. Update runs file new
//! screenshots from an inbox folder into the existing categories.

pub mod categorize;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod files;
pub mod naming;
pub mod organizer;
pub mod report;
pub mod response;
pub mod titling;
pub mod vision;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use error::{Result, ShotsortError};
