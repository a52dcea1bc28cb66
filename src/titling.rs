// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Per-image titling: ask the vision model for a short title and rename
//! the image after it.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::naming::{sanitize_filename, unique_path};
use crate::report::{RunReport, Stage};
use crate::vision::{ImageAttachment, VisionModel};
use crate::AppConfig;

/// Rename each image in place inside `dir` using a model-generated title.
///
/// Images the model cannot title keep their current name. Returns the
/// number of images renamed.
pub async fn title_images(
    images: &[PathBuf],
    dir: &Path,
    model: &dyn VisionModel,
    config: &AppConfig,
    report: &mut RunReport,
) -> usize {
    let mut renamed = 0;

    for image in images {
        let attachment = match ImageAttachment::from_path(image, config.ai_engine.max_image_dimension) {
            Ok(a) => a,
            Err(e) => {
                report.skip(Stage::Title, image, format!("could not read image: {}", e));
                continue;
            }
        };

        let title = match model.describe(&config.prompts.title, Some(&attachment)).await {
            Some(t) => sanitize_filename(&t),
            None => {
                report.skip(Stage::Title, image, "no title from model");
                continue;
            }
        };

        let ext = image
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let new_name = format!("{}{}", title, ext);
        let target = dir.join(&new_name);

        if target == *image {
            info!("'{}' already carries its title", new_name);
            continue;
        }

        let target = unique_path(&target);
        match std::fs::rename(image, &target) {
            Ok(()) => {
                info!(
                    "Renamed '{}' to '{}'",
                    image.file_name().unwrap_or_default().to_string_lossy(),
                    target.file_name().unwrap_or_default().to_string_lossy()
                );
                renamed += 1;
            }
            Err(e) => {
                report.skip(Stage::Title, image, format!("rename to '{}' failed: {}", new_name, e));
            }
        }
    }

    report.renamed += renamed;
    renamed
}
