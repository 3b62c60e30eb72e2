//! Reader-side request and playback bookkeeping
//!
//! Async results (word narration, generated media) may arrive after the user
//! has moved on. [`RequestGate`] tokens let callers drop those. [`Playback`]
//! owns at most one live audio handle and releases it on every exit path.

use super::model::AudioClip;
use super::narration::{WordTiming, active_word, clean_word};
use crate::error::{ContentError, PlaybackError};

/// Loading messages shown while page media is generating
pub const LOADING_MESSAGES: [&str; 5] = [
    "Whispering to the winds...",
    "Gathering the stars...",
    "Painting with light...",
    "Weaving your magic story...",
    "Almost there, adventurer!",
];

/// Seconds between loading message changes
pub const MESSAGE_INTERVAL_SECS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic request counter; only the newest token is current
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    latest: u64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier one
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Supersede everything without starting a new request
    pub fn cancel(&mut self) {
        self.latest += 1;
    }
}

/// Audio backend (Web Audio buffer sources on wasm)
pub trait AudioPlayer {
    type Handle;

    fn start(&mut self, clip: &AudioClip) -> Result<Self::Handle, PlaybackError>;
    fn stop(&mut self, handle: Self::Handle);
}

struct Active<H> {
    handle: H,
    duration: f32,
    elapsed: f32,
    timings: Vec<WordTiming>,
}

/// Single-slot playback with optional word highlighting
pub struct Playback<P: AudioPlayer> {
    player: P,
    active: Option<Active<P::Handle>>,
}

impl<P: AudioPlayer> Playback<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            active: None,
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Play `clip`, stopping whatever was playing first
    pub fn play(&mut self, clip: &AudioClip) -> Result<(), PlaybackError> {
        self.play_with_timings(clip, Vec::new())
    }

    /// Play page narration with word highlight times for `text`
    pub fn narrate(&mut self, clip: &AudioClip, text: &str) -> Result<(), PlaybackError> {
        let timings = WordTiming::estimate(text, clip.duration());
        self.play_with_timings(clip, timings)
    }

    fn play_with_timings(
        &mut self,
        clip: &AudioClip,
        timings: Vec<WordTiming>,
    ) -> Result<(), PlaybackError> {
        self.stop();
        let handle = self.player.start(clip)?;
        self.active = Some(Active {
            handle,
            duration: clip.duration(),
            elapsed: 0.0,
            timings,
        });
        Ok(())
    }

    /// Stop and release the current handle. Returns whether anything was playing.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                self.player.stop(active.handle);
                true
            }
            None => false,
        }
    }

    /// Advance the playhead. Returns the word to highlight; the handle is
    /// released once the clip has ended.
    pub fn advance(&mut self, dt: f32) -> Option<usize> {
        let active = self.active.as_mut()?;
        active.elapsed += dt.max(0.0);
        if active.elapsed >= active.duration {
            self.stop();
            return None;
        }
        active_word(&active.timings, active.elapsed)
    }
}

/// A word narration request to hand to the content source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRequest {
    pub token: RequestToken,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordDelivery {
    Played,
    /// A newer request superseded this one; the clip was discarded
    Stale,
    Failed,
}

/// Teach mode: tap or slide over words to hear them one at a time
#[derive(Debug, Clone, Default)]
pub struct WordReader {
    teach_mode: bool,
    last_index: Option<usize>,
    gate: RequestGate,
    loading: Option<String>,
}

impl WordReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teach_mode(&self) -> bool {
        self.teach_mode
    }

    /// Word currently waiting for audio
    pub fn loading(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    pub fn set_teach_mode(&mut self, on: bool) {
        self.teach_mode = on;
        self.last_index = None;
        if !on {
            self.gate.cancel();
            self.loading = None;
        }
    }

    /// Page changed: teach mode turns off and pending words are dropped
    pub fn turn_page<P: AudioPlayer>(&mut self, playback: &mut Playback<P>) {
        playback.stop();
        self.set_teach_mode(false);
    }

    /// Word tapped
    pub fn tap<P: AudioPlayer>(
        &mut self,
        index: usize,
        word: &str,
        playback: &mut Playback<P>,
    ) -> Option<WordRequest> {
        if !self.teach_mode {
            return None;
        }
        let text = clean_word(word);
        if text.is_empty() {
            return None;
        }
        self.last_index = Some(index);
        let token = self.gate.issue();
        playback.stop();
        self.loading = Some(word.to_string());
        Some(WordRequest {
            token,
            text: text.to_string(),
        })
    }

    /// Finger slid onto a word. Staying on the same word does not re-request.
    pub fn slide<P: AudioPlayer>(
        &mut self,
        index: usize,
        word: &str,
        playback: &mut Playback<P>,
    ) -> Option<WordRequest> {
        if self.last_index == Some(index) {
            return None;
        }
        self.tap(index, word, playback)
    }

    /// Speech for `token` arrived. Only the newest request may play.
    pub fn deliver<P: AudioPlayer>(
        &mut self,
        token: RequestToken,
        result: Result<AudioClip, ContentError>,
        playback: &mut Playback<P>,
    ) -> WordDelivery {
        if !self.gate.is_current(token) {
            return WordDelivery::Stale;
        }
        self.loading = None;
        match result {
            Ok(clip) => match playback.play(&clip) {
                Ok(()) => WordDelivery::Played,
                Err(e) => {
                    log::warn!("word playback failed: {e}");
                    WordDelivery::Failed
                }
            },
            Err(e) => {
                log::warn!("word speech failed: {e}");
                WordDelivery::Failed
            }
        }
    }
}

/// Rotates loading messages while page media generates
#[derive(Debug, Clone, Default)]
pub struct MessageRotator {
    index: usize,
    since: f32,
    active: bool,
}

impl MessageRotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &'static str {
        LOADING_MESSAGES[self.index % LOADING_MESSAGES.len()]
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Follow the page's generating flag. Turning off cancels the timer.
    pub fn set_generating(&mut self, generating: bool) {
        if generating != self.active {
            self.active = generating;
            self.since = 0.0;
        }
    }

    /// Returns the new message when it changed
    pub fn advance(&mut self, dt: f32) -> Option<&'static str> {
        if !self.active {
            return None;
        }
        self.since += dt.max(0.0);
        if self.since < MESSAGE_INTERVAL_SECS {
            return None;
        }
        self.since -= MESSAGE_INTERVAL_SECS;
        self.index = (self.index + 1) % LOADING_MESSAGES.len();
        Some(self.message())
    }
}

/// Order in which page illustrations are generated: the first page alone,
/// then the next two together, then the rest in one batch
pub fn preload_waves(page_count: usize) -> Vec<Vec<usize>> {
    let mut waves = Vec::new();
    if page_count == 0 {
        return waves;
    }
    waves.push(vec![0]);
    if page_count > 1 {
        waves.push((1..page_count.min(3)).collect());
    }
    if page_count > 3 {
        waves.push((3..page_count).collect());
    }
    waves
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records start/stop calls; handles are sequence numbers
    #[derive(Default)]
    struct FakePlayer {
        next: u32,
        live: Vec<u32>,
        stopped: Vec<u32>,
        fail: bool,
    }

    impl AudioPlayer for FakePlayer {
        type Handle = u32;

        fn start(&mut self, _clip: &AudioClip) -> Result<u32, PlaybackError> {
            if self.fail {
                return Err(PlaybackError::Unavailable);
            }
            self.next += 1;
            self.live.push(self.next);
            Ok(self.next)
        }

        fn stop(&mut self, handle: u32) {
            self.live.retain(|h| *h != handle);
            self.stopped.push(handle);
        }
    }

    fn playback() -> Playback<FakePlayer> {
        Playback::new(FakePlayer::default())
    }

    #[test]
    fn test_gate_supersedes_older_tokens() {
        let mut gate = RequestGate::new();
        let a = gate.issue();
        let b = gate.issue();
        assert!(!gate.is_current(a));
        assert!(gate.is_current(b));
        gate.cancel();
        assert!(!gate.is_current(b));
    }

    #[test]
    fn test_play_stops_previous_handle() {
        let mut p = playback();
        p.play(&AudioClip::silence(1.0)).unwrap();
        p.play(&AudioClip::silence(1.0)).unwrap();
        assert_eq!(p.player().live, vec![2]);
        assert_eq!(p.player().stopped, vec![1]);
        assert!(p.stop());
        assert!(p.player().live.is_empty());
        assert!(!p.stop());
    }

    #[test]
    fn test_natural_end_releases_handle() {
        let mut p = playback();
        p.narrate(&AudioClip::silence(1.0), "ab cd").unwrap();
        assert_eq!(p.advance(0.1), Some(0));
        assert_eq!(p.advance(0.55), Some(2));
        assert_eq!(p.advance(0.5), None);
        assert!(!p.is_playing());
        assert!(p.player().live.is_empty());
    }

    #[test]
    fn test_failed_start_leaves_slot_empty() {
        let mut p = Playback::new(FakePlayer {
            fail: true,
            ..Default::default()
        });
        assert!(p.play(&AudioClip::silence(1.0)).is_err());
        assert!(!p.is_playing());
    }

    #[test]
    fn test_late_word_result_is_discarded() {
        let mut reader = WordReader::new();
        let mut p = playback();
        reader.set_teach_mode(true);

        let first = reader.tap(0, "Once", &mut p).unwrap();
        let second = reader.slide(2, "upon", &mut p).unwrap();
        assert_eq!(second.text, "upon");

        let stale = reader.deliver(first.token, Ok(AudioClip::silence(0.5)), &mut p);
        assert_eq!(stale, WordDelivery::Stale);
        assert!(!p.is_playing());
        assert_eq!(reader.loading(), Some("upon"));

        let fresh = reader.deliver(second.token, Ok(AudioClip::silence(0.5)), &mut p);
        assert_eq!(fresh, WordDelivery::Played);
        assert!(p.is_playing());
        assert_eq!(reader.loading(), None);
    }

    #[test]
    fn test_slide_skips_repeats_and_needs_teach_mode() {
        let mut reader = WordReader::new();
        let mut p = playback();
        assert!(reader.tap(0, "wolf", &mut p).is_none());

        reader.set_teach_mode(true);
        assert!(reader.slide(4, "wolf,", &mut p).is_some());
        assert!(reader.slide(4, "wolf,", &mut p).is_none());
        assert!(reader.slide(5, " ", &mut p).is_none());
        // Tapping the same word again is allowed
        assert!(reader.tap(4, "wolf,", &mut p).is_some());
    }

    #[test]
    fn test_word_request_stops_narration() {
        let mut reader = WordReader::new();
        let mut p = playback();
        p.narrate(&AudioClip::silence(3.0), "a long page").unwrap();
        reader.set_teach_mode(true);
        let req = reader.tap(0, "a", &mut p).unwrap();
        assert!(!p.is_playing());
        assert_eq!(req.text, "a");
    }

    #[test]
    fn test_turn_page_drops_pending_word() {
        let mut reader = WordReader::new();
        let mut p = playback();
        reader.set_teach_mode(true);
        let req = reader.tap(0, "Hare", &mut p).unwrap();
        reader.turn_page(&mut p);
        assert!(!reader.teach_mode());
        assert_eq!(
            reader.deliver(req.token, Ok(AudioClip::silence(0.5)), &mut p),
            WordDelivery::Stale
        );
        assert!(!p.is_playing());
    }

    #[test]
    fn test_speech_error_is_reported() {
        let mut reader = WordReader::new();
        let mut p = playback();
        reader.set_teach_mode(true);
        let req = reader.tap(0, "pig", &mut p).unwrap();
        assert_eq!(
            reader.deliver(req.token, Err(ContentError::Quota), &mut p),
            WordDelivery::Failed
        );
        assert_eq!(reader.loading(), None);
    }

    #[test]
    fn test_rotator_only_ticks_while_generating() {
        let mut r = MessageRotator::new();
        assert_eq!(r.advance(10.0), None);

        r.set_generating(true);
        assert_eq!(r.advance(2.9), None);
        assert_eq!(r.advance(0.2), Some(LOADING_MESSAGES[1]));

        r.set_generating(false);
        assert_eq!(r.advance(100.0), None);
        assert_eq!(r.message(), LOADING_MESSAGES[1]);
    }

    #[test]
    fn test_preload_waves() {
        assert!(preload_waves(0).is_empty());
        assert_eq!(preload_waves(1), vec![vec![0]]);
        assert_eq!(preload_waves(3), vec![vec![0], vec![1, 2]]);
        assert_eq!(
            preload_waves(8),
            vec![vec![0], vec![1, 2], vec![3, 4, 5, 6, 7]]
        );
    }
}
