//! Raw pointer/touch/keyboard events to per-frame intents
//!
//! Event listeners push [`RawInput`] as they fire; the frame loop calls
//! [`InputAdapter::take`] once per frame. Edge-triggered intents (jump, start)
//! are cleared by `take`; held intents (slide, steer) persist until release.

use crate::sim::{DragEvent, TickInput};

/// A press shorter than this (ms) counts as a tap
pub const TAP_MS: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "Space" => Some(Key::Space),
            "ArrowUp" | "KeyW" => Some(Key::ArrowUp),
            "ArrowDown" | "KeyS" => Some(Key::ArrowDown),
            "ArrowLeft" | "KeyA" => Some(Key::ArrowLeft),
            "ArrowRight" | "KeyD" => Some(Key::ArrowRight),
            "Enter" | "NumpadEnter" => Some(Key::Enter),
            _ => None,
        }
    }
}

/// Input event in field coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: f32, y: f32, at_ms: f64 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32, at_ms: f64 },
}

/// How pointer events are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Hold to slide, tap to jump
    Runner,
    /// Hold the left or right half to steer
    Race,
    /// Drag pieces
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct InputAdapter {
    mode: InputMode,
    field_width: f32,
    jump: bool,
    jump_key_held: bool,
    start: bool,
    finish: bool,
    slide_key: bool,
    slide_pointer: bool,
    steer_left_key: bool,
    steer_right_key: bool,
    steer_pointer: Option<Side>,
    pressed_at: Option<f64>,
    drags: Vec<DragEvent>,
}

impl InputAdapter {
    pub fn new(mode: InputMode, field_width: f32) -> Self {
        Self {
            mode,
            field_width,
            jump: false,
            jump_key_held: false,
            start: false,
            finish: false,
            slide_key: false,
            slide_pointer: false,
            steer_left_key: false,
            steer_right_key: false,
            steer_pointer: None,
            pressed_at: None,
            drags: Vec::new(),
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_field_width(&mut self, width: f32) {
        self.field_width = width;
    }

    /// Start button clicked
    pub fn request_start(&mut self) {
        self.start = true;
    }

    /// Finish button clicked
    pub fn request_finish(&mut self) {
        self.finish = true;
    }

    /// Drop every held intent (focus lost, tab hidden)
    pub fn release_all(&mut self) {
        self.jump_key_held = false;
        self.slide_key = false;
        self.slide_pointer = false;
        self.steer_left_key = false;
        self.steer_right_key = false;
        self.steer_pointer = None;
        self.pressed_at = None;
    }

    pub fn handle(&mut self, event: RawInput) {
        match event {
            RawInput::KeyDown(key) => self.key(key, true),
            RawInput::KeyUp(key) => self.key(key, false),
            RawInput::PointerDown { x, y, at_ms } => {
                self.pressed_at = Some(at_ms);
                match self.mode {
                    InputMode::Runner => self.slide_pointer = true,
                    InputMode::Race => {
                        self.steer_pointer = Some(if x < self.field_width / 2.0 {
                            Side::Left
                        } else {
                            Side::Right
                        });
                    }
                    InputMode::Drag => self.drags.push(DragEvent::Start { x, y }),
                }
            }
            RawInput::PointerMove { x, y } => {
                if self.mode == InputMode::Drag && self.pressed_at.is_some() {
                    self.drags.push(DragEvent::Move { x, y });
                }
            }
            RawInput::PointerUp { x, y, at_ms } => {
                let pressed_at = self.pressed_at.take();
                match self.mode {
                    InputMode::Runner => {
                        self.slide_pointer = false;
                        if pressed_at.is_some_and(|t| at_ms - t < TAP_MS) {
                            self.jump = true;
                        }
                    }
                    InputMode::Race => self.steer_pointer = None,
                    InputMode::Drag => {
                        if pressed_at.is_some() {
                            self.drags.push(DragEvent::End { x, y });
                        }
                    }
                }
            }
        }
    }

    fn key(&mut self, key: Key, down: bool) {
        match key {
            Key::Space | Key::ArrowUp => {
                // Auto-repeat keydowns do not re-jump
                if down && !self.jump_key_held {
                    self.jump = true;
                }
                self.jump_key_held = down;
            }
            Key::ArrowDown => self.slide_key = down,
            Key::ArrowLeft => self.steer_left_key = down,
            Key::ArrowRight => self.steer_right_key = down,
            Key::Enter => {
                if down {
                    self.start = true;
                }
            }
        }
    }

    /// This frame's intents. Clears edges and queued drags.
    pub fn take(&mut self) -> TickInput {
        let runner = self.mode == InputMode::Runner;
        let race = self.mode == InputMode::Race;
        TickInput {
            jump: std::mem::take(&mut self.jump) && runner,
            slide_held: runner && (self.slide_key || self.slide_pointer),
            steer_left: race
                && (self.steer_left_key || self.steer_pointer == Some(Side::Left)),
            steer_right: race
                && (self.steer_right_key || self.steer_pointer == Some(Side::Right)),
            start: std::mem::take(&mut self.start),
            finish: std::mem::take(&mut self.finish),
            drags: std::mem::take(&mut self.drags),
        }
    }
}
