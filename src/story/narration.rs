//! Narration word timing
//!
//! Speech services return audio without word marks, so highlight times are
//! estimated from character offsets: a word starts at the fraction of the
//! text that precedes it.

/// Split `text` into words and the whitespace runs between them, in order.
/// Concatenating the spans gives back `text`.
pub fn word_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                spans.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        spans.push(&text[start..]);
    }
    spans
}

/// Strip leading and trailing punctuation so speech gets a bare word
pub fn clean_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordTiming {
    /// Span index into [`word_spans`]
    pub index: usize,
    pub start_secs: f32,
}

impl WordTiming {
    /// Start times for every span of `text` narrated over `duration` seconds
    pub fn estimate(text: &str, duration: f32) -> Vec<WordTiming> {
        let total = text.chars().count();
        if total == 0 {
            return Vec::new();
        }
        let mut before = 0usize;
        word_spans(text)
            .into_iter()
            .enumerate()
            .map(|(index, span)| {
                let start_secs = before as f32 / total as f32 * duration;
                before += span.chars().count();
                WordTiming { index, start_secs }
            })
            .collect()
    }
}

/// Span being spoken `elapsed` seconds into playback
pub fn active_word(timings: &[WordTiming], elapsed: f32) -> Option<usize> {
    if elapsed < 0.0 {
        return None;
    }
    timings
        .iter()
        .take_while(|t| elapsed >= t.start_secs)
        .last()
        .map(|t| t.index)
}
