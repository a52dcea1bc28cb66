// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Shotsort

use thiserror::Error;

/// Result type alias for Shotsort operations
pub type Result<T> = std::result::Result<T, ShotsortError>;

/// Shotsort error types
#[derive(Error, Debug)]
pub enum ShotsortError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
