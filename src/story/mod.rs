//! Story reader support
//!
//! Everything the reader needs that is not presentation: the persisted story
//! model, the content collaborator with its canned fallback, narration word
//! timing, and the bookkeeping that keeps late async results and audio
//! handles from leaking across requests.

pub mod content;
pub mod model;
pub mod narration;
pub mod reader;

pub use content::{CannedContent, ContentSource, pages_or_fallback, reply_or_fallback};
pub use model::{AudioClip, ChatMessage, ChatRole, Story, StoryPage};
pub use narration::{WordTiming, active_word, clean_word, word_spans};
pub use reader::{
    AudioPlayer, MessageRotator, Playback, RequestGate, RequestToken, WordDelivery, WordReader,
    WordRequest, preload_waves,
};
