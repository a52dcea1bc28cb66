// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Test double for the vision model

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::vision::{ImageAttachment, VisionModel};

/// Replays canned answers in order and records every prompt.
/// Once the script runs out every call answers `None`.
pub struct ScriptedModel {
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
    images: Mutex<usize>,
}

impl ScriptedModel {
    pub fn new<'a>(answers: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(String::from)).collect()),
            prompts: Mutex::new(Vec::new()),
            images: Mutex::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of calls that carried an image
    pub fn images_seen(&self) -> usize {
        *self.images.lock().unwrap()
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    async fn describe(&self, prompt: &str, image: Option<&ImageAttachment>) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if image.is_some() {
            *self.images.lock().unwrap() += 1;
        }
        self.answers.lock().unwrap().pop_front().flatten()
    }
}
