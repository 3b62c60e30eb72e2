//! Content-generation collaborator
//!
//! The reader asks for story text, narration audio and chat replies through
//! [`ContentSource`]. Failures are always recoverable: callers use the
//! `*_or_fallback` helpers, which log and substitute canned content.

use super::model::{AudioClip, ChatMessage, StoryPage};
use crate::error::ContentError;

/// Titles offered on the library shelf
pub const CLASSIC_STORIES: [&str; 5] = [
    "Cinderella",
    "The Three Little Pigs",
    "Little Red Riding Hood",
    "Jack and the Beanstalk",
    "The Tortoise and the Hare",
];

/// Cover colors assigned by shelf position
pub const COVER_COLORS: [&str; 5] = [
    "kid-blue",
    "kid-pink",
    "kid-green",
    "kid-yellow",
    "kid-purple",
];

/// Pages per generated story
pub const PAGES_PER_STORY: usize = 8;

/// Shown when the reading buddy cannot answer
pub const TIRED_REPLY: &str = "Oops, I'm a bit tired. Let me try again later!";

pub fn cover_color(index: usize) -> &'static str {
    COVER_COLORS[index % COVER_COLORS.len()]
}

pub trait ContentSource {
    /// Page text and illustration prompts for a titled story
    fn story_pages(&self, title: &str) -> Result<Vec<StoryPage>, ContentError>;
    /// Narration for `text`
    fn speech(&self, text: &str) -> Result<AudioClip, ContentError>;
    /// Reading-buddy answer to `message` given the conversation so far
    fn chat_reply(&self, history: &[ChatMessage], message: &str) -> Result<String, ContentError>;
}

/// Deterministic offline content
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedContent;

impl CannedContent {
    /// Narration pace for synthesized clips
    const SECS_PER_CHAR: f32 = 0.06;
}

impl ContentSource for CannedContent {
    fn story_pages(&self, title: &str) -> Result<Vec<StoryPage>, ContentError> {
        let beats = [
            "Once upon a time, there was a story called {t}.",
            "Every morning, our friend woke up ready for an adventure.",
            "One day, something surprising happened on the path.",
            "Our friend felt a little scared, but took a deep breath.",
            "With help from a kind friend, a plan was made.",
            "The plan was tricky, but they tried and tried again.",
            "At last, everything worked out just right.",
            "And they all lived happily ever after. The end!",
        ];
        Ok(beats
            .iter()
            .take(PAGES_PER_STORY)
            .map(|beat| {
                let text = beat.replace("{t}", title);
                StoryPage::new(
                    text.clone(),
                    format!("Storybook illustration for \"{title}\": {text}"),
                )
            })
            .collect())
    }

    fn speech(&self, text: &str) -> Result<AudioClip, ContentError> {
        Ok(AudioClip::silence(
            text.chars().count() as f32 * Self::SECS_PER_CHAR,
        ))
    }

    fn chat_reply(&self, _history: &[ChatMessage], message: &str) -> Result<String, ContentError> {
        if message.trim().is_empty() {
            return Ok("I'm not sure what to say!".to_string());
        }
        Ok("What a great question! Let's keep reading to find out together.".to_string())
    }
}

/// Story pages from `source`, or the canned story when generation fails or
/// returns nothing
pub fn pages_or_fallback(source: &dyn ContentSource, title: &str) -> Vec<StoryPage> {
    match source.story_pages(title) {
        Ok(pages) if !pages.is_empty() => pages
            .into_iter()
            .map(|mut p| {
                p.hydrate();
                p
            })
            .collect(),
        Ok(_) => {
            log::warn!("content source returned no pages for {title:?}, using canned story");
            canned_pages(title)
        }
        Err(e) => {
            log::warn!("story generation failed for {title:?}: {e}, using canned story");
            canned_pages(title)
        }
    }
}

fn canned_pages(title: &str) -> Vec<StoryPage> {
    CannedContent.story_pages(title).unwrap_or_default()
}

/// Reading-buddy reply, or a gentle retry message on failure
pub fn reply_or_fallback(source: &dyn ContentSource, history: &[ChatMessage], message: &str) -> String {
    match source.chat_reply(history, message) {
        Ok(reply) if !reply.trim().is_empty() => reply,
        Ok(_) => "I'm not sure what to say!".to_string(),
        Err(e) => {
            log::warn!("chat reply failed: {e}");
            TIRED_REPLY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl ContentSource for Offline {
        fn story_pages(&self, _title: &str) -> Result<Vec<StoryPage>, ContentError> {
            Err(ContentError::Network("offline".into()))
        }

        fn speech(&self, _text: &str) -> Result<AudioClip, ContentError> {
            Err(ContentError::Quota)
        }

        fn chat_reply(&self, _h: &[ChatMessage], _m: &str) -> Result<String, ContentError> {
            Err(ContentError::Parse("garbled".into()))
        }
    }

    #[test]
    fn test_canned_story_is_deterministic() {
        let a = CannedContent.story_pages("Cinderella").unwrap();
        let b = CannedContent.story_pages("Cinderella").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), PAGES_PER_STORY);
        assert!(a[0].text.contains("Cinderella"));
    }

    #[test]
    fn test_failures_resolve_to_fallbacks() {
        let pages = pages_or_fallback(&Offline, "The Three Little Pigs");
        assert_eq!(pages, CannedContent.story_pages("The Three Little Pigs").unwrap());
        assert_eq!(reply_or_fallback(&Offline, &[], "why?"), TIRED_REPLY);
    }

    #[test]
    fn test_canned_speech_length_follows_text() {
        let short = CannedContent.speech("Hi").unwrap();
        let long = CannedContent.speech("Hello there, friend").unwrap();
        assert!(long.duration() > short.duration());
    }

    #[test]
    fn test_cover_colors_wrap() {
        assert_eq!(cover_color(0), "kid-blue");
        assert_eq!(cover_color(6), "kid-pink");
    }
}
