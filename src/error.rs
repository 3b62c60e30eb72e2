//! Error types for fallible boundaries
//!
//! None of these end a play session: callers log and fall back (canned
//! content, log-only host channel, default settings) or retry later.

use thiserror::Error;

/// Game balance could not be loaded
#[derive(Error, Debug)]
pub enum TuningError {
    /// JSON did not parse
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its valid range
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Key-value storage failure
#[derive(Error, Debug)]
pub enum StorageError {
    /// No storage backend (private browsing, native build)
    #[error("storage unavailable")]
    Unavailable,

    /// Backend rejected a read
    #[error("storage read failed for `{key}`: {reason}")]
    Read { key: String, reason: String },

    /// Backend rejected a write (quota exceeded, etc.)
    #[error("storage write failed for `{key}`: {reason}")]
    Write { key: String, reason: String },

    /// Stored payload is not valid JSON for the expected type
    #[error("stored data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Content-generation collaborator failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// Request never completed
    #[error("network error: {0}")]
    Network(String),

    /// Service refused the request for quota/rate reasons
    #[error("quota exceeded")]
    Quota,

    /// Response arrived but could not be understood
    #[error("unparseable response: {0}")]
    Parse(String),
}

/// External host message channel failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The embedding page exposes no channel
    #[error("host channel not found")]
    Unavailable,

    /// The channel exists but posting threw
    #[error("host post failed: {0}")]
    PostFailed(String),
}

/// GPU setup failure
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The surface reports no usable texture format
    #[error("surface has no supported format")]
    NoSurfaceFormat,
}

/// Audio backend failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// No audio context could be created
    #[error("audio backend unavailable")]
    Unavailable,

    /// The backend refused to start the clip
    #[error("playback failed: {0}")]
    Failed(String),
}
