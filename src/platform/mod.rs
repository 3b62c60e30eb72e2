//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory natively and in tests)
//! - The external host channel notified when a session ends

pub mod host;
pub mod storage;

pub use host::{Delivery, FallbackAction, HostChannel, HostSignal, LogChannel, notify_host};
pub use storage::{KeyValueStore, MemoryStore, load_json, save_json};

#[cfg(target_arch = "wasm32")]
pub use host::BrowserChannel;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
