//! Platform abstraction layer
//!
//! Frame scheduling behind a trait so the run loop's continuation is an
//! explicit, cancellable value:
//! - `ManualScheduler`: frames fired by the caller (native host, tests)
//! - `web::RafScheduler`: `requestAnimationFrame` in the browser

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifies one scheduled frame
///
/// Every call to `schedule_next` gets a fresh token; the run loop only acts
/// on the token it is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameToken(pub u64);

impl FrameToken {
    /// The token following this one
    pub fn next(self) -> Self {
        FrameToken(self.0.wrapping_add(1))
    }
}

/// Requests "run before the next repaint" callbacks
pub trait FrameScheduler {
    type Handle;

    /// Arrange for the frame identified by `token` to fire once
    ///
    /// An error means no frame will fire for `token`.
    fn schedule_next(&mut self, token: FrameToken) -> Result<Self::Handle, CoreError>;

    /// Best-effort cancel; a frame that fires anyway is rejected by token
    fn cancel(&mut self, handle: Self::Handle);
}

/// Scheduler driven by the caller
///
/// Frames are queued in order; `take_next` pops the oldest one for the
/// caller to deliver. Cancelled frames are dropped from the queue.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: VecDeque<FrameToken>,
    cancelled: u32,
    refuse: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest frame still waiting to fire
    pub fn take_next(&mut self) -> Option<FrameToken> {
        self.queue.pop_front()
    }

    /// Frames waiting to fire, oldest first
    pub fn pending(&self) -> &VecDeque<FrameToken> {
        &self.queue
    }

    /// Make every later `schedule_next` fail, as a host without a frame source would
    pub fn set_refuse(&mut self, refuse: bool) {
        self.refuse = refuse;
    }

    /// Number of successful cancellations so far
    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = FrameToken;

    fn schedule_next(&mut self, token: FrameToken) -> Result<FrameToken, CoreError> {
        if self.refuse {
            return Err(CoreError::FrameRequestFailed(format!("frame {} refused", token.0)));
        }
        self.queue.push_back(token);
        Ok(token)
    }

    fn cancel(&mut self, handle: FrameToken) {
        let before = self.queue.len();
        self.queue.retain(|t| *t != handle);
        if self.queue.len() != before {
            self.cancelled += 1;
        }
    }
}
