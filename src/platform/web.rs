//! Browser frame scheduling via requestAnimationFrame

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameScheduler, FrameToken};
use crate::error::CoreError;

/// Callback the host installs to deliver frames to its run loop
pub type FrameHandler = Rc<dyn Fn(FrameToken)>;

/// `requestAnimationFrame`-backed scheduler
///
/// The handler is installed after the run loop exists, since it usually
/// captures a weak reference to it.
#[derive(Default)]
pub struct RafScheduler {
    handler: Option<FrameHandler>,
}

impl RafScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_handler(&mut self, handler: FrameHandler) {
        self.handler = Some(handler);
    }
}

impl FrameScheduler for RafScheduler {
    /// Browser request id
    type Handle = i32;

    fn schedule_next(&mut self, token: FrameToken) -> Result<i32, CoreError> {
        let handler = self.handler.clone().ok_or_else(|| {
            CoreError::FrameRequestFailed(format!("no handler installed for {token:?}"))
        })?;
        let window = web_sys::window()
            .ok_or_else(|| CoreError::FrameRequestFailed("no window".into()))?;
        let callback = Closure::once_into_js(move |_time: f64| handler(token));
        window
            .request_animation_frame(callback.unchecked_ref())
            .map_err(|e| CoreError::FrameRequestFailed(format!("{e:?}")))
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle);
        }
    }
}
