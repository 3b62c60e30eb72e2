//! Story library persistence
//!
//! The whole library is one JSON array under a single key, read and written
//! wholesale. Stories are looked up by title so picking a book twice reuses
//! the text generated the first time. Media is never stored.

use crate::error::StorageError;
use crate::platform::{KeyValueStore, load_json, save_json};
use crate::story::content::{ContentSource, cover_color, pages_or_fallback};
use crate::story::model::Story;

/// Storage key for the library
pub const STORAGE_KEY: &str = "story_spark_stories";

pub struct StoryLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StoryLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Every saved story. A missing key is an empty library.
    pub fn load_all(&self) -> Result<Vec<Story>, StorageError> {
        Ok(load_json(&self.store, STORAGE_KEY)?.unwrap_or_default())
    }

    /// Replace the stored library
    pub fn save_all(&mut self, stories: &[Story]) -> Result<(), StorageError> {
        save_json(&mut self.store, STORAGE_KEY, stories)
    }

    /// Saved story with this title, media cleared
    pub fn find(&self, title: &str) -> Result<Option<Story>, StorageError> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|s| s.title == title)
            .map(|mut s| {
                s.hydrate();
                s
            }))
    }

    /// Open the book at shelf position `index`: the saved copy when there is
    /// one, otherwise freshly generated (or canned) text that is saved before
    /// returning. Storage problems are logged; the story still opens. An
    /// unreadable library is never written back, so a new story opened over
    /// it stays unsaved.
    pub fn open(
        &mut self,
        title: &str,
        source: &dyn ContentSource,
        index: usize,
        now_ms: f64,
    ) -> Story {
        let (mut stories, readable) = match self.load_all() {
            Ok(stories) => (stories, true),
            Err(e) => {
                log::warn!("story library unreadable, leaving it untouched: {e}");
                (Vec::new(), false)
            }
        };

        if let Some(existing) = stories.iter().find(|s| s.title == title) {
            let mut story = existing.clone();
            story.hydrate();
            log::info!("opened saved story {title:?}");
            return story;
        }

        let story = Story {
            id: format!("{}", now_ms.max(0.0) as u64),
            title: title.to_string(),
            pages: pages_or_fallback(source, title),
            cover_color: cover_color(index).to_string(),
        };
        if !readable {
            log::warn!("opened {title:?} without saving it");
            return story;
        }
        stories.push(story.clone());
        match self.save_all(&stories) {
            Ok(()) => log::info!("saved new story {title:?} ({} pages)", story.pages.len()),
            Err(e) => log::warn!("could not save story {title:?}: {e}"),
        }
        story
    }
}
