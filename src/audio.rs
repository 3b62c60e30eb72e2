//! Audio system using Web Audio API
//!
//! Sound effects are procedurally generated from oscillators. Narration clips
//! are played through [`WebAudioPlayer`], which backs the story reader's
//! single-slot `Playback`.

use crate::sim::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    /// Star or boost pad collected
    Collect,
    /// Tripped over an obstacle
    Stumble,
    /// Obstacle cleared
    Pass,
    /// Carriage or finish line appeared
    GoalAppear,
    Match,
    Mismatch,
    Win,
    Lose,
}

impl SoundEffect {
    /// Sound for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Collected { .. } | GameEvent::Boosted => Some(SoundEffect::Collect),
            GameEvent::Stumbled => Some(SoundEffect::Stumble),
            GameEvent::Passed { .. } => Some(SoundEffect::Pass),
            GameEvent::GoalAppeared => Some(SoundEffect::GoalAppear),
            GameEvent::Matched { .. } => Some(SoundEffect::Match),
            GameEvent::Mismatched { .. } => Some(SoundEffect::Mismatch),
            GameEvent::PhaseChanged(GamePhase::WinPending) => Some(SoundEffect::Win),
            GameEvent::PhaseChanged(GamePhase::LosePending) => Some(SoundEffect::Lose),
            GameEvent::PhaseChanged(_) | GameEvent::Finished { .. } => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{AudioManager, WebAudioPlayer};

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioBufferSourceNode, AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::error::PlaybackError;
    use crate::story::{AudioClip, AudioPlayer};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Apply volume settings
        pub fn configure(&mut self, settings: &crate::Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.muted = settings.muted;
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.sweep(ctx, vol * 0.3, 220.0, 520.0, 0.15, OscillatorType::Triangle),
                SoundEffect::Collect => self.arpeggio(ctx, vol * 0.25, &[600.0, 800.0, 1000.0], 0.08, 0.15),
                SoundEffect::Stumble => self.sweep(ctx, vol * 0.4, 160.0, 60.0, 0.2, OscillatorType::Sawtooth),
                SoundEffect::Pass => self.blip(ctx, vol * 0.15, 700.0, 0.06),
                SoundEffect::GoalAppear => self.arpeggio(ctx, vol * 0.25, &[523.0, 659.0, 784.0, 1047.0], 0.1, 0.3),
                SoundEffect::Match => self.arpeggio(ctx, vol * 0.25, &[500.0, 750.0], 0.06, 0.15),
                SoundEffect::Mismatch => self.sweep(ctx, vol * 0.3, 300.0, 150.0, 0.25, OscillatorType::Square),
                SoundEffect::Win => self.arpeggio(ctx, vol * 0.3, &[400.0, 500.0, 600.0, 800.0], 0.1, 0.4),
                SoundEffect::Lose => self.arpeggio(ctx, vol * 0.3, &[400.0, 350.0, 300.0, 200.0], 0.2, 0.3),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short sine tick
        fn blip(&self, ctx: &AudioContext, vol: f32, freq: f32, len: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + len + 0.02).ok();
        }

        /// Pitch glide from `from` to `to`
        fn sweep(
            &self,
            ctx: &AudioContext,
            vol: f32,
            from: f32,
            to: f32,
            len: f64,
            osc_type: OscillatorType,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + len * 0.8)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + len + 0.05).ok();
        }

        /// Notes one after another
        fn arpeggio(&self, ctx: &AudioContext, vol: f32, freqs: &[f32], step: f64, len: f64) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + len)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + len + 0.1).ok();
                }
            }
        }
    }

    /// Plays decoded clips as buffer sources
    pub struct WebAudioPlayer {
        ctx: AudioContext,
    }

    impl WebAudioPlayer {
        pub fn new() -> Result<Self, PlaybackError> {
            let ctx = AudioContext::new().map_err(|_| PlaybackError::Unavailable)?;
            Ok(Self { ctx })
        }
    }

    impl AudioPlayer for WebAudioPlayer {
        type Handle = AudioBufferSourceNode;

        fn start(&mut self, clip: &AudioClip) -> Result<AudioBufferSourceNode, PlaybackError> {
            let fail = |e: wasm_bindgen::JsValue| PlaybackError::Failed(format!("{e:?}"));
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
            let len = clip.samples.len().max(1) as u32;
            let buffer = self
                .ctx
                .create_buffer(1, len, clip.sample_rate as f32)
                .map_err(fail)?;
            let mut samples = clip.samples.clone();
            buffer.copy_to_channel(&mut samples, 0).map_err(fail)?;

            let source = self.ctx.create_buffer_source().map_err(fail)?;
            source.set_buffer(Some(&buffer));
            source
                .connect_with_audio_node(&self.ctx.destination())
                .map_err(fail)?;
            source.start().map_err(fail)?;
            Ok(source)
        }

        fn stop(&mut self, handle: AudioBufferSourceNode) {
            let _ = handle.stop();
            let _ = handle.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PickupKind, PieceKind};

    #[test]
    fn test_event_sounds() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Jumped), Some(SoundEffect::Jump));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Collected {
                kind: PickupKind::Star
            }),
            Some(SoundEffect::Collect)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Mismatched {
                kind: PieceKind::Weed
            }),
            Some(SoundEffect::Mismatch)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PhaseChanged(GamePhase::LosePending)),
            Some(SoundEffect::Lose)
        );
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PhaseChanged(GamePhase::Playing)),
            None
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Finished {
                won: true,
                score: 10
            }),
            None
        );
    }
}
