//! External host completion channel
//!
//! When the game runs embedded, the host page exposes a message channel that
//! wants to hear when a session is completed or abandoned. The channel is
//! optional; without it we fall back to reloading or closing the page.

use crate::error::HostError;

/// Opaque signal vocabulary understood by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    GameComplete,
    GameQuit,
}

impl HostSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            HostSignal::GameComplete => "GAME_COMPLETE",
            HostSignal::GameQuit => "GAME_QUIT",
        }
    }

    /// What to do locally when the host could not be told
    pub fn fallback(self) -> FallbackAction {
        match self {
            HostSignal::GameComplete => FallbackAction::Reload,
            HostSignal::GameQuit => FallbackAction::Close,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackAction {
    Reload,
    Close,
}

/// Result of [`notify_host`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Fallback(FallbackAction),
}

pub trait HostChannel {
    fn post(&self, signal: HostSignal) -> Result<(), HostError>;
}

/// Sink that only logs. Used natively and when no host is embedded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogChannel;

impl HostChannel for LogChannel {
    fn post(&self, signal: HostSignal) -> Result<(), HostError> {
        log::info!("host signal: {}", signal.as_str());
        Ok(())
    }
}

/// Tell the host about `signal`. A missing or failing channel is logged and
/// mapped to the local fallback, never propagated.
pub fn notify_host(channel: &dyn HostChannel, signal: HostSignal) -> Delivery {
    match channel.post(signal) {
        Ok(()) => Delivery::Delivered,
        Err(e) => {
            log::warn!("{} not delivered: {e}", signal.as_str());
            Delivery::Fallback(signal.fallback())
        }
    }
}

/// `window.GameChannel.postMessage(...)`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserChannel;

#[cfg(target_arch = "wasm32")]
impl HostChannel for BrowserChannel {
    fn post(&self, signal: HostSignal) -> Result<(), HostError> {
        use wasm_bindgen::{JsCast, JsValue};

        let window = web_sys::window().ok_or(HostError::Unavailable)?;
        let channel = js_sys::Reflect::get(&window, &JsValue::from_str("GameChannel"))
            .map_err(|_| HostError::Unavailable)?;
        if channel.is_undefined() || channel.is_null() {
            return Err(HostError::Unavailable);
        }
        let post = js_sys::Reflect::get(&channel, &JsValue::from_str("postMessage"))
            .map_err(|_| HostError::Unavailable)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| HostError::Unavailable)?;
        post.call1(&channel, &JsValue::from_str(signal.as_str()))
            .map(|_| ())
            .map_err(|e| HostError::PostFailed(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<HostSignal>>,
    }

    impl HostChannel for Recorder {
        fn post(&self, signal: HostSignal) -> Result<(), HostError> {
            self.sent.borrow_mut().push(signal);
            Ok(())
        }
    }

    struct Missing;

    impl HostChannel for Missing {
        fn post(&self, _signal: HostSignal) -> Result<(), HostError> {
            Err(HostError::Unavailable)
        }
    }

    #[test]
    fn test_signal_vocabulary() {
        assert_eq!(HostSignal::GameComplete.as_str(), "GAME_COMPLETE");
        assert_eq!(HostSignal::GameQuit.as_str(), "GAME_QUIT");
    }

    #[test]
    fn test_delivered_to_present_channel() {
        let recorder = Recorder::default();
        assert_eq!(
            notify_host(&recorder, HostSignal::GameComplete),
            Delivery::Delivered
        );
        assert_eq!(*recorder.sent.borrow(), vec![HostSignal::GameComplete]);
    }

    #[test]
    fn test_missing_channel_falls_back() {
        assert_eq!(
            notify_host(&Missing, HostSignal::GameComplete),
            Delivery::Fallback(FallbackAction::Reload)
        );
        assert_eq!(
            notify_host(&Missing, HostSignal::GameQuit),
            Delivery::Fallback(FallbackAction::Close)
        );
    }

    #[test]
    fn test_log_channel_always_delivers() {
        assert_eq!(notify_host(&LogChannel, HostSignal::GameQuit), Delivery::Delivered);
    }
}
