//! Fable Dash - storybook mini-games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, phases)
//! - `input`: Pointer/touch/keyboard events to per-frame intents
//! - `session`: Frame driver, HUD snapshots, completion callback
//! - `renderer`: Scene builders and the WebGPU pipeline
//! - `platform`: Storage and host-channel abstraction
//! - `persistence`: Story library save/load
//! - `story`: Narration timing and request bookkeeping for the story reader
//! - `audio`: Event sounds and clip playback (Web Audio on wasm)
//! - `tuning`: Data-driven game balance
//! - `catalog`: The five titles behind one `MiniGame`

pub mod audio;
pub mod catalog;
pub mod error;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod story;
pub mod tuning;

pub use catalog::{AnyGame, GameKind};
pub use error::{
    ContentError, HostError, PlaybackError, RenderError, StorageError, TuningError,
};
pub use input::{InputAdapter, InputMode, Key, RawInput};
pub use session::{Session, SnapshotThrottle};
pub use settings::Settings;
pub use sim::{GameEvent, GamePhase, HudSnapshot, MiniGame, Outcome, TickInput};
pub use tuning::{MatchTuning, RaceTuning, RunnerTuning};

/// Frame timing constants
pub mod consts {
    /// Reference display rate all per-frame tuning values are expressed in
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Largest frame delta accepted (seconds); longer gaps (tab resume) are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Default dt used for the very first frame
    pub const NOMINAL_DT: f32 = 1.0 / REFERENCE_FPS;
    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 256;
}

/// Clamp a raw frame delta into the stable range
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Convert a frame delta (seconds) into "reference frames" elapsed.
///
/// Per-frame constants (gravity, scroll speed) are tuned at 60 Hz; multiplying
/// by this keeps motion frame-rate independent.
#[inline]
pub fn time_scale(dt: f32) -> f32 {
    clamp_dt(dt) * consts::REFERENCE_FPS
}
