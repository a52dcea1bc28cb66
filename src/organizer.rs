// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Fresh and update runs over a screenshot directory

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::categorize::{categorize_fresh, categorize_merge, BatchOutcome};
use crate::config::LayoutConfig;
use crate::consolidate::consolidate;
use crate::files::{ensure_directory, list_images};
use crate::report::RunReport;
use crate::titling::title_images;
use crate::vision::VisionModel;
use crate::{AppConfig, Result, ShotsortError};

/// Absolute locations of the working root and its special directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub structured: PathBuf,
    pub unstructured: PathBuf,
    pub not_relevant: PathBuf,
}

impl Layout {
    pub fn new(root: &Path, names: &LayoutConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            structured: root.join(&names.structured),
            unstructured: root.join(&names.unstructured),
            not_relevant: root.join(&names.not_relevant),
        }
    }
}

/// Drives one run against a working root
pub struct Organizer<'a> {
    layout: Layout,
    config: &'a AppConfig,
    model: &'a dyn VisionModel,
}

impl<'a> Organizer<'a> {
    pub fn new(root: &Path, config: &'a AppConfig, model: &'a dyn VisionModel) -> Self {
        Self {
            layout: Layout::new(root, &config.layout),
            config,
            model,
        }
    }

    fn require_root(&self) -> Result<()> {
        if self.layout.root.is_dir() {
            Ok(())
        } else {
            Err(ShotsortError::Precondition(format!(
                "The directory {:?} does not exist",
                self.layout.root
            )))
        }
    }

    /// Consolidate, title, categorize and prepare the inbox.
    ///
    /// Only a missing root is returned as an error; everything else is
    /// logged and recorded in `report`.
    pub async fn run_fresh(&self, skip_renaming: bool, report: &mut RunReport) -> Result<()> {
        self.require_root()?;

        info!("Consolidating images...");
        consolidate(&self.layout, self.config, report);

        if !skip_renaming {
            info!("Renaming images with AI-generated titles...");
            match list_images(&self.layout.root, &self.config.image_extensions) {
                Ok(images) => {
                    title_images(&images, &self.layout.root, self.model, self.config, report).await;
                }
                Err(e) => error!("Error listing images in {:?}: {}", self.layout.root, e),
            }
        }

        info!("Organizing images into structured folders...");
        match categorize_fresh(&self.layout, self.model, self.config, report).await {
            Ok(BatchOutcome::Applied { moved }) => info!("Filed {} image(s) into categories", moved),
            Ok(_) => {}
            Err(e) => error!("Error organizing images: {}", e),
        }

        info!("Initializing inbox folder...");
        match ensure_directory(&self.layout.unstructured) {
            Ok(created) => {
                if created {
                    report.directories_created += 1;
                }
                info!("Inbox ready at {:?}", self.layout.unstructured);
            }
            Err(e) => error!("Error creating inbox {:?}: {}", self.layout.unstructured, e),
        }

        Ok(())
    }

    /// File new screenshots from the inbox into the existing categories
    pub async fn run_update(&self, skip_renaming: bool, report: &mut RunReport) -> Result<()> {
        self.require_root()?;

        info!("Updating structured folders with new screenshots...");
        match categorize_merge(&self.layout, self.model, self.config, skip_renaming, report).await {
            Ok(BatchOutcome::Applied { moved }) => info!("Filed {} image(s) into categories", moved),
            Ok(_) => {}
            Err(e @ ShotsortError::Precondition(_)) => return Err(e),
            Err(e) => error!("Error updating structured folders: {}", e),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Stage;
    use crate::testing::ScriptedModel;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new(Path::new("/shots"), &LayoutConfig::default());
        assert_eq!(layout.structured, PathBuf::from("/shots/structured"));
        assert_eq!(layout.unstructured, PathBuf::from("/shots/unstructured"));
        assert_eq!(layout.not_relevant, PathBuf::from("/shots/not_relevant_files"));
    }

    #[tokio::test]
    async fn test_fresh_run_end_to_end() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2024/march")).unwrap();
        fs::write(root.join("2024/march/Screenshot 1.png"), b"a").unwrap();
        fs::write(root.join("2024/march/todo.txt"), b"t").unwrap();

        let model = ScriptedModel::new([
            Some("Weather Widget"),
            Some(r#"-- {"Widgets": ["Weather Widget"]} --"#),
        ]);
        let config = AppConfig::default();
        let mut report = RunReport::new();
        Organizer::new(root, &config, &model).run_fresh(false, &mut report).await.unwrap();

        assert!(root.join("structured/Widgets/Weather Widget.png").exists());
        assert!(root.join("not_relevant_files/todo.txt").exists());
        assert!(root.join("unstructured").is_dir());
        assert!(!root.join("2024").exists());
        assert_eq!(report.renamed, 1);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_fresh_run_skip_renaming() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("cat_photo.png"), b"c").unwrap();

        let model = ScriptedModel::new([Some(r#"-- {"Animals": ["cat_photo"]} --"#)]);
        let config = AppConfig::default();
        let mut report = RunReport::new();
        Organizer::new(root, &config, &model).run_fresh(true, &mut report).await.unwrap();

        assert_eq!(model.images_seen(), 0);
        assert!(root.join("structured/Animals/cat_photo.png").exists());
    }

    #[tokio::test]
    async fn test_fresh_run_survives_bad_answer() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("cat_photo.png"), b"c").unwrap();

        let model = ScriptedModel::new([None, Some("no markers here")]);
        let config = AppConfig::default();
        let mut report = RunReport::new();
        Organizer::new(root, &config, &model).run_fresh(false, &mut report).await.unwrap();

        assert!(root.join("cat_photo.png").exists());
        assert!(root.join("unstructured").is_dir());
        assert_eq!(report.skipped_in(Stage::Title).count(), 1);
        assert_eq!(report.skipped_in(Stage::Categorize).count(), 1);
    }

    #[tokio::test]
    async fn test_missing_root_is_precondition() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let model = ScriptedModel::empty();
        let config = AppConfig::default();
        let mut report = RunReport::new();

        let organizer = Organizer::new(&missing, &config, &model);
        assert!(matches!(
            organizer.run_fresh(false, &mut report).await,
            Err(ShotsortError::Precondition(_))
        ));
        assert!(matches!(
            organizer.run_update(false, &mut report).await,
            Err(ShotsortError::Precondition(_))
        ));
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn test_update_without_inbox_halts() {
        let dir = tempdir().unwrap();
        let model = ScriptedModel::empty();
        let config = AppConfig::default();
        let mut report = RunReport::new();

        let result = Organizer::new(dir.path(), &config, &model).run_update(false, &mut report).await;
        assert!(matches!(result, Err(ShotsortError::Precondition(_))));
        assert!(model.prompts().is_empty());
    }
}
