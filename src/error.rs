//! Crate error type

use thiserror::Error;

use crate::platform::FrameToken;

/// Errors surfaced at the edges of the core
///
/// Apart from `FrameRequestFailed`, none of these end a session; callers
/// recover (fallback width, dropped frame, default settings) and log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Host reported a zero, negative or non-finite surface width
    #[error("invalid surface width {width}")]
    InvalidSurfaceDimensions { width: f32 },

    /// A frame fired that is no longer the outstanding one (stopped or superseded)
    #[error("stale frame callback {token:?}")]
    StaleCallbackInvocation { token: FrameToken },

    /// The host refused to schedule the next frame; the session halts
    #[error("frame request failed: {0}")]
    FrameRequestFailed(String),

    /// Preference storage could not be read or written
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}
