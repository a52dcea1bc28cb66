// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Shotsort

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// AI engine configuration
    #[serde(default)]
    pub ai_engine: EngineConfig,

    /// Prompt templates
    #[serde(default)]
    pub prompts: PromptConfig,

    /// Names of the special directories under the working root
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Extensions (without dot) treated as images
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout; `None` waits for the service indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub retries: u32,
    /// Longest side in pixels before an image is downscaled for upload
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PromptConfig {
    #[serde(default = "default_title_prompt")]
    pub title: String,
    #[serde(default = "default_categorize_prompt")]
    pub categorize: String,
    #[serde(default = "default_merge_prompt")]
    pub merge: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_structured")]
    pub structured: String,
    #[serde(default = "default_unstructured")]
    pub unstructured: String,
    #[serde(default = "default_not_relevant")]
    pub not_relevant: String,
}

// Default value functions
fn default_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_model() -> String { "gpt-4o".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_max_image_dimension() -> u32 { 2048 }
fn default_structured() -> String { "structured".to_string() }
fn default_unstructured() -> String { "unstructured".to_string() }
fn default_not_relevant() -> String { "not_relevant_files".to_string() }

fn default_image_extensions() -> Vec<String> {
    vec!["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"]
        .into_iter().map(String::from).collect()
}

fn default_title_prompt() -> String {
    "Generate a precise, descriptive, and short title (max 5 words) for this screenshot. \
     Focus on the main content or purpose shown.".to_string()
}

fn default_categorize_prompt() -> String {
    "Group the following screenshot titles into relevant one-word categories. \
     Create logical groups based on content similarity.".to_string()
}

fn default_merge_prompt() -> String {
    "Categorize these screenshot titles into existing categories or create new ones if needed. \
     A strong emphasis should be placed on 'if needed', use your judgment as you see fit whether \
     to add a certain file to an existing category, or you deem it more appropriate to create \
     another category to contain this certain screenshot titles.".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai_engine: EngineConfig::default(),
            prompts: PromptConfig::default(),
            layout: LayoutConfig::default(),
            image_extensions: default_image_extensions(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: None,
            retries: 0,
            max_image_dimension: default_max_image_dimension(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            title: default_title_prompt(),
            categorize: default_categorize_prompt(),
            merge: default_merge_prompt(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            structured: default_structured(),
            unstructured: default_unstructured(),
            not_relevant: default_not_relevant(),
        }
    }
}

impl LayoutConfig {
    /// All special directory names, in no particular order
    pub fn special_names(&self) -> [&str; 3] {
        [self.structured.as_str(), self.unstructured.as_str(), self.not_relevant.as_str()]
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::ShotsortError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject layouts that would nest or alias the special directories
    pub fn validate(&self) -> crate::Result<()> {
        let names = self.layout.special_names();
        for name in names {
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(crate::ShotsortError::Config(format!(
                    "Invalid layout directory name: {:?}", name
                )));
            }
        }
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(crate::ShotsortError::Config(
                "Layout directory names must be distinct".to_string()
            ));
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.ai_engine.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.ai_engine.model, "gpt-4o");
        assert_eq!(config.ai_engine.retries, 0);
        assert!(config.ai_engine.timeout_secs.is_none());
        assert_eq!(config.layout.not_relevant, "not_relevant_files");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shotsort.json");

        let mut config = AppConfig::default();
        config.ai_engine.model = "gpt-4o-mini".to_string();
        config.image_extensions.push("heic".to_string());
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.ai_engine.model, "gpt-4o-mini");
        assert!(loaded.image_extensions.iter().any(|e| e == "heic"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shotsort.json");
        std::fs::write(&path, r#"{"ai_engine": {"model": "llava"}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.ai_engine.model, "llava");
        assert_eq!(config.layout.structured, "structured");
        assert_eq!(config.image_extensions.len(), 7);
    }

    #[test]
    fn test_rejects_duplicate_layout_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shotsort.json");
        std::fs::write(
            &path,
            r#"{"ai_engine": {}, "layout": {"structured": "inbox", "unstructured": "inbox"}}"#,
        ).unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(crate::ShotsortError::Config(_))
        ));
    }
}
