// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Categorization engine
//!
//! Collects image titles, asks the model to group them, and moves each
//! image into `structured/<category>/`. A batch is applied only when the
//! whole answer parses; otherwise nothing moves.
//!
//! Titles are matched against file stems in listing order. When two images
//! share a stem, the first one listed is taken first, and that order depends
//! on the filesystem.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::files::{ensure_directory, list_images, list_subdirectories, move_file};
use crate::naming::{sanitize_filename, title_of, unique_path};
use crate::organizer::Layout;
use crate::report::{RunReport, Stage};
use crate::response::{parse_response, Category, WRAPPER_INSTRUCTION};
use crate::titling::title_images;
use crate::vision::VisionModel;
use crate::{AppConfig, Result, ShotsortError};

const JSON_SHAPE: &str =
    "Provide the result as a JSON object where keys are category names and values are lists of titles.";

/// What happened to one categorization batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// There were no images to categorize
    Empty,
    /// The answer was applied; `moved` images reached a category directory
    Applied { moved: usize },
    /// The model gave no usable answer and nothing was moved
    Abandoned,
}

/// Prompt for grouping titles from scratch
pub fn fresh_prompt(instructions: &str, titles: &[String]) -> String {
    format!(
        "{}\n{}\n\nTitles to categorize:\n{}\n{}",
        instructions,
        JSON_SHAPE,
        titles.join("\n"),
        WRAPPER_INSTRUCTION
    )
}

/// Prompt for filing new titles into an existing set of categories
pub fn merge_prompt(instructions: &str, existing: &[String], titles: &[String]) -> String {
    format!(
        "{}\nExisting categories are: {}\n{}\n\nTitles to categorize:\n{}\n{}",
        instructions,
        existing.join(", "),
        JSON_SHAPE,
        titles.join("\n"),
        WRAPPER_INSTRUCTION
    )
}

/// Ask the model for a category mapping
pub async fn request_categories(model: &dyn VisionModel, prompt: &str) -> Result<Vec<Category>> {
    let raw = model
        .describe(prompt, None)
        .await
        .ok_or_else(|| ShotsortError::ServiceUnavailable("no categorization response".to_string()))?;
    debug!("Categorization response: {}", raw);
    parse_response(&raw)
}

/// Move images into the category directories named by `categories`.
///
/// Titles that match no image are ignored. Images no category mentions stay
/// where they are. Returns the number of images moved.
pub fn apply_categories(
    categories: &[Category],
    images: &[PathBuf],
    structured_dir: &Path,
    report: &mut RunReport,
) -> usize {
    let titles: Vec<String> = images.iter().map(|p| title_of(p)).collect();
    let mut consumed = vec![false; images.len()];
    let mut moved = 0;

    for category in categories {
        let folder = structured_dir.join(sanitize_filename(&category.name));
        match ensure_directory(&folder) {
            Ok(true) => report.directories_created += 1,
            Ok(false) => {}
            Err(e) => {
                error!("Error creating directory {:?}: {}", folder, e);
                let mut claimed = vec![false; images.len()];
                for title in &category.titles {
                    let index = (0..images.len())
                        .find(|&i| !consumed[i] && !claimed[i] && titles[i] == *title);
                    if let Some(index) = index {
                        claimed[index] = true;
                        report.skip(
                            Stage::Categorize,
                            &images[index],
                            format!("cannot create category directory {:?}: {}", folder, e),
                        );
                    }
                }
                continue;
            }
        }

        for title in &category.titles {
            let index = (0..images.len()).find(|&i| !consumed[i] && titles[i] == *title);
            let Some(index) = index else {
                debug!("No image titled {:?}, ignoring", title);
                continue;
            };

            let source = &images[index];
            let file_name = source.file_name().unwrap_or_default();
            let destination = unique_path(&folder.join(file_name));
            match move_file(source, &destination) {
                Ok(()) => {
                    consumed[index] = true;
                    moved += 1;
                }
                Err(e) => report.skip(Stage::Categorize, source, format!("move failed: {}", e)),
            }
        }
    }

    let unassigned = consumed.iter().filter(|c| !**c).count();
    if unassigned > 0 {
        info!("{} image(s) were not assigned a category and stay in place", unassigned);
    }

    report.moved += moved;
    moved
}

async fn run_batch(
    images: &[PathBuf],
    prompt: &str,
    structured_dir: &Path,
    model: &dyn VisionModel,
    report: &mut RunReport,
) -> BatchOutcome {
    match request_categories(model, prompt).await {
        Ok(categories) => {
            info!("Model suggested {} categor(ies)", categories.len());
            let moved = apply_categories(&categories, images, structured_dir, report);
            BatchOutcome::Applied { moved }
        }
        Err(e) => {
            error!("Error getting categories: {}", e);
            for image in images {
                report.skip(Stage::Categorize, image, format!("batch abandoned: {}", e));
            }
            BatchOutcome::Abandoned
        }
    }
}

/// Categorize every image directly under the working root
pub async fn categorize_fresh(
    layout: &Layout,
    model: &dyn VisionModel,
    config: &AppConfig,
    report: &mut RunReport,
) -> Result<BatchOutcome> {
    if ensure_directory(&layout.structured)? {
        report.directories_created += 1;
    }

    let images = list_images(&layout.root, &config.image_extensions)?;
    if images.is_empty() {
        info!("No images to organize");
        return Ok(BatchOutcome::Empty);
    }

    let titles: Vec<String> = images.iter().map(|p| title_of(p)).collect();
    let prompt = fresh_prompt(&config.prompts.categorize, &titles);

    Ok(run_batch(&images, &prompt, &layout.structured, model, report).await)
}

/// File the images waiting in the inbox into the existing categories
pub async fn categorize_merge(
    layout: &Layout,
    model: &dyn VisionModel,
    config: &AppConfig,
    skip_renaming: bool,
    report: &mut RunReport,
) -> Result<BatchOutcome> {
    if !layout.unstructured.is_dir() {
        return Err(ShotsortError::Precondition(format!(
            "Inbox directory {:?} does not exist",
            layout.unstructured
        )));
    }

    let mut images = list_images(&layout.unstructured, &config.image_extensions)?;
    if images.is_empty() {
        info!("No new screenshots to organize");
        return Ok(BatchOutcome::Empty);
    }

    if !skip_renaming {
        title_images(&images, &layout.unstructured, model, config, report).await;
        images = list_images(&layout.unstructured, &config.image_extensions)?;
    }

    if ensure_directory(&layout.structured)? {
        report.directories_created += 1;
    }
    let existing = list_subdirectories(&layout.structured)?;
    info!("Existing categories: {:?}", existing);

    let titles: Vec<String> = images.iter().map(|p| title_of(p)).collect();
    let prompt = merge_prompt(&config.prompts.merge, &existing, &titles);

    Ok(run_batch(&images, &prompt, &layout.structured, model, report).await)
}
