//! Session driver
//!
//! `RunLoop` owns one play's `RunState` and turns the frame-by-frame
//! continuation into explicit scheduler requests. Each frame is tagged with a
//! `FrameToken`; only the outstanding token is honored, so a frame that fires
//! after `stop` (or after game over) is discarded.

use crate::error::CoreError;
use crate::platform::{FrameScheduler, FrameToken};
use crate::sim::rng::ColorSource;
use crate::sim::{RunConfig, RunState, TickInput, TickOutcome, Viewport, tick};

/// Receives the final score when a mismatch ends the run
pub type GameOverCallback = Box<dyn FnOnce(u32)>;

pub struct RunLoop<S: FrameScheduler> {
    state: RunState,
    config: RunConfig,
    viewport: Viewport,
    rng: Box<dyn ColorSource>,
    input: TickInput,
    scheduler: S,
    outstanding: Option<(FrameToken, S::Handle)>,
    next_token: FrameToken,
    on_game_over: Option<GameOverCallback>,
}

impl<S: FrameScheduler> RunLoop<S> {
    pub fn new(
        config: RunConfig,
        viewport: Viewport,
        rng: Box<dyn ColorSource>,
        scheduler: S,
        on_game_over: impl FnOnce(u32) + 'static,
    ) -> Self {
        Self {
            state: RunState::new(&config),
            config,
            viewport,
            rng,
            input: TickInput::default(),
            scheduler,
            outstanding: None,
            next_token: FrameToken(1),
            on_game_over: Some(Box::new(on_game_over)),
        }
    }

    /// Request the first frame
    ///
    /// If the scheduler refuses, the session is halted and the error returned.
    pub fn start(&mut self) -> Result<(), CoreError> {
        if !self.state.is_running() || self.outstanding.is_some() {
            return Ok(());
        }
        log::info!(
            "Run started ({}, {:.0}x{:.0})",
            self.config.difficulty.as_str(),
            self.viewport.width,
            self.viewport.height
        );
        self.schedule()
    }

    fn schedule(&mut self) -> Result<(), CoreError> {
        let token = self.next_token;
        self.next_token = token.next();
        match self.scheduler.schedule_next(token) {
            Ok(handle) => {
                self.outstanding = Some((token, handle));
                Ok(())
            }
            Err(e) => {
                // Nothing will drive the run any more; end it without a game over
                log::error!("Halting run at score {}: {}", self.state.score(), e);
                self.on_game_over = None;
                self.input = TickInput::default();
                self.state.halt();
                Err(e)
            }
        }
    }

    /// Deliver a scheduled frame
    ///
    /// Fails for stale tokens, and when the follow-up frame cannot be scheduled.
    pub fn on_frame(&mut self, token: FrameToken) -> Result<TickOutcome, CoreError> {
        let expected = self.outstanding.as_ref().map(|(t, _)| *t);
        if expected != Some(token) || !self.state.is_running() {
            log::warn!("Discarding stale frame {:?} (expected {:?})", token, expected);
            return Err(CoreError::StaleCallbackInvocation { token });
        }
        self.outstanding = None;

        let input = std::mem::take(&mut self.input);
        let outcome = tick(
            &mut self.state,
            &input,
            &self.config,
            &self.viewport,
            self.rng.as_mut(),
        );

        match outcome {
            TickOutcome::Continue => self.schedule()?,
            TickOutcome::GameOver { score } => {
                log::info!("Game over at frame {} with score {}", self.state.frame_count(), score);
                if let Some(callback) = self.on_game_over.take() {
                    callback(score);
                }
            }
            TickOutcome::Halted => {}
        }
        Ok(outcome)
    }

    /// Queue one color cycle for the next frame
    pub fn cycle_color(&mut self) {
        if self.state.is_running() {
            self.input.color_cycles = self.input.color_cycles.saturating_add(1);
        }
    }

    /// Recompute the viewport and keep live obstacles inside the spawn line
    pub fn resize(&mut self, surface_width: f32, device_pixel_ratio: f32) -> Viewport {
        let viewport = Viewport::from_surface(surface_width, device_pixel_ratio);
        if viewport != self.viewport {
            self.viewport = viewport;
            let moved = self.state.clamp_to_viewport(&viewport);
            log::debug!(
                "Resized to {:.0}x{:.0}, {} obstacle(s) clamped",
                viewport.width,
                viewport.height,
                moved
            );
        }
        self.viewport
    }

    /// End the session without reporting game over; safe to call repeatedly
    pub fn stop(&mut self) {
        if let Some((_, handle)) = self.outstanding.take() {
            self.scheduler.cancel(handle);
        }
        self.on_game_over = None;
        self.input = TickInput::default();
        if self.state.halt() {
            log::info!("Run stopped at score {}", self.state.score());
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.state.score()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Token of the frame currently awaited
    pub fn outstanding(&self) -> Option<FrameToken> {
        self.outstanding.as_ref().map(|(t, _)| *t)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
