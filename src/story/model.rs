//! Story data model
//!
//! Only text survives persistence. Media (narration audio, page video) and
//! the generating flag are per-session and regenerated after a reload.

use serde::{Deserialize, Serialize};

/// Decoded mono PCM
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl AudioClip {
    /// Speech services deliver 24 kHz mono
    pub const SPEECH_RATE: u32 = 24_000;

    pub fn silence(duration_secs: f32) -> Self {
        let len = (duration_secs.max(0.0) * Self::SPEECH_RATE as f32) as usize;
        Self {
            sample_rate: Self::SPEECH_RATE,
            samples: vec![0.0; len],
        }
    }

    /// Length in seconds
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    pub text: String,
    pub image_prompt: String,
    #[serde(skip)]
    pub video_url: Option<String>,
    #[serde(skip)]
    pub audio: Option<AudioClip>,
    #[serde(skip)]
    pub is_generating: bool,
}

impl StoryPage {
    pub fn new(text: impl Into<String>, image_prompt: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_prompt: image_prompt.into(),
            ..Default::default()
        }
    }

    /// Drop per-session media
    pub fn hydrate(&mut self) {
        self.video_url = None;
        self.audio = None;
        self.is_generating = false;
    }

    /// Whether an illustration request should be started for this page
    pub fn needs_media(&self) -> bool {
        self.video_url.is_none() && !self.is_generating
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    pub pages: Vec<StoryPage>,
    pub cover_color: String,
}

impl Story {
    pub fn hydrate(&mut self) {
        for page in &mut self.pages {
            page.hydrate();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}
