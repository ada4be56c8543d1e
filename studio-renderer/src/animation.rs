//! Animation loop controller for the model viewer.
//!
//! The host event loop sits behind [`FrameScheduler`]. The loop holds at most
//! one pending frame request; pausing, dropping the loop, or any frame error
//! cancels it before returning, so no callback can fire into a surface that
//! has gone away.
//!
//! ```text
//!   Stopped ──play──► Playing ──tick──► (render, rotate +1°, request next)
//!      ▲                 │
//!      └─pause/drop/err──┘
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use studio_core::{Color, Primitive, Transform};
use tracing::{debug, trace, warn};

use crate::projector::{draw_segments, project};
use crate::surface::{Rect, Surface};
use crate::{RenderError, RenderResult};

/// Opaque token for one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wrap a host-provided id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Source of per-frame callbacks.
pub trait FrameScheduler {
    /// Ask for one callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Cancelling an unknown or fired handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
    cancelled: usize,
}

/// Queue-backed scheduler whose frames fire only when drained.
///
/// Clones share the same queue, so a host can keep one clone while the loop
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<FrameQueue>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every pending request, oldest first.
    #[must_use]
    pub fn take_due(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queue.borrow_mut().pending)
    }

    /// Requests waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Requests withdrawn so far.
    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.queue.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut queue = self.queue.borrow_mut();
        queue.next_id += 1;
        let handle = FrameHandle(queue.next_id);
        queue.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.pending.len();
        queue.pending.retain(|h| *h != handle);
        if queue.pending.len() != before {
            queue.cancelled += 1;
        }
    }
}

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No frame pending.
    #[default]
    Stopped,
    /// A frame is pending and each tick schedules the next.
    Playing,
}

/// Per-frame drawing options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Color the surface is cleared to.
    pub background: Color,
    /// When set, paint the background at this opacity instead of clearing,
    /// leaving trails.
    pub fade: Option<f32>,
    /// Degrees added to `rotation.y` per frame.
    pub step_degrees: f32,
    /// Wireframe stroke width.
    pub line_width: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb(17, 24, 39),
            fade: None,
            step_degrees: 1.0,
            line_width: 2.0,
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The primitive was drawn.
    Rendered {
        /// Segments stroked.
        segments: usize,
    },
    /// The primitive was malformed and skipped for this frame.
    Skipped,
    /// The handle was stale or the loop was stopped; nothing happened.
    Ignored,
}

/// Drives continuous re-rendering of one primitive.
#[derive(Debug)]
pub struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    state: PlaybackState,
    pending: Option<FrameHandle>,
    primitive: Primitive,
    transform: Transform,
    config: AnimationConfig,
    frames: u64,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    /// Create a stopped loop.
    pub fn new(
        primitive: Primitive,
        transform: Transform,
        scheduler: S,
        config: AnimationConfig,
    ) -> Self {
        Self {
            scheduler,
            state: PlaybackState::Stopped,
            pending: None,
            primitive,
            transform,
            config,
            frames: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the loop is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// The pending frame, if any.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames drawn or skipped since creation.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The transform the next frame will use.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access for drag, scroll and pan input.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The primitive being drawn.
    #[must_use]
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Swap the primitive; takes effect on the next frame.
    pub fn set_primitive(&mut self, primitive: Primitive) {
        self.primitive = primitive;
    }

    /// Start playing. Does nothing if already playing.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        self.pending = Some(self.scheduler.request_frame());
        self.state = PlaybackState::Playing;
        debug!(primitive = %self.primitive.id, "Animation started");
    }

    /// Stop playing and cancel the pending frame.
    pub fn pause(&mut self) {
        self.cancel_pending();
        if self.state == PlaybackState::Playing {
            debug!(frames = self.frames, "Animation stopped");
        }
        self.state = PlaybackState::Stopped;
    }

    /// Handle a fired frame callback.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceUnavailable`] if the surface has no
    /// pixels. The loop is stopped before the error is returned.
    pub fn tick<T: Surface + ?Sized>(
        &mut self,
        handle: FrameHandle,
        surface: &mut T,
    ) -> RenderResult<FrameOutcome> {
        if !self.is_playing() || self.pending != Some(handle) {
            trace!(handle = handle.id(), "Ignoring stale frame");
            return Ok(FrameOutcome::Ignored);
        }
        self.pending = None;

        match self.render_frame(surface) {
            Ok(outcome) => {
                self.transform.rotate_by(0.0, self.config.step_degrees, 0.0);
                self.frames += 1;
                self.pending = Some(self.scheduler.request_frame());
                Ok(outcome)
            }
            Err(e) => {
                warn!("Animation frame failed, stopping: {e}");
                self.pause();
                Err(e)
            }
        }
    }

    fn render_frame<T: Surface + ?Sized>(&self, surface: &mut T) -> RenderResult<FrameOutcome> {
        surface.ensure_available()?;

        match self.config.fade {
            Some(opacity) => surface.fill_rect(
                Rect::covering(surface.width(), surface.height()),
                self.config.background.with_opacity(opacity),
            ),
            None => surface.clear(self.config.background),
        }

        let canvas = (surface.width(), surface.height());
        match project(&self.primitive, &self.transform, canvas) {
            Ok(segments) => {
                draw_segments(surface, &segments, self.config.line_width);
                trace!(segments = segments.len(), "Frame rendered");
                Ok(FrameOutcome::Rendered {
                    segments: segments.len(),
                })
            }
            Err(RenderError::MalformedPrimitive(reason)) => {
                warn!(primitive = %self.primitive.id, "Skipping malformed primitive: {reason}");
                Ok(FrameOutcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl AnimationLoop<ManualScheduler> {
    /// Fire every due frame once. Returns how many frames were drawn or
    /// skipped.
    ///
    /// # Errors
    ///
    /// Propagates the first frame error (the loop is stopped by then).
    pub fn pump<T: Surface + ?Sized>(&mut self, surface: &mut T) -> RenderResult<usize> {
        let mut handled = 0;
        for handle in self.scheduler.take_due() {
            if self.tick(handle, surface)? != FrameOutcome::Ignored {
                handled += 1;
            }
        }
        Ok(handled)
    }

    /// Pump until `frames` frames have been handled or the loop stops.
    ///
    /// # Errors
    ///
    /// Propagates the first frame error.
    pub fn run_frames<T: Surface + ?Sized>(
        &mut self,
        surface: &mut T,
        frames: usize,
    ) -> RenderResult<usize> {
        let mut handled = 0;
        while handled < frames && self.is_playing() {
            let n = self.pump(surface)?;
            if n == 0 {
                break;
            }
            handled += n;
        }
        Ok(handled)
    }
}

impl<S: FrameScheduler> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;
    use studio_core::Vec3;

    fn cube_loop(scheduler: ManualScheduler) -> AnimationLoop<ManualScheduler> {
        AnimationLoop::new(
            Primitive::cube(),
            Transform::new(),
            scheduler,
            AnimationConfig::default(),
        )
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let anim = cube_loop(ManualScheduler::new());
        assert_eq!(anim.state(), PlaybackState::Stopped);
        assert!(anim.pending_frame().is_none());
    }

    #[test]
    fn test_play_schedules_and_tick_advances_rotation() {
        let scheduler = ManualScheduler::new();
        let mut anim = cube_loop(scheduler.clone());
        let mut surface = Raster::new(64, 64);

        anim.play();
        assert_eq!(scheduler.pending_count(), 1);
        let handled = anim.pump(&mut surface).expect("pump");
        assert_eq!(handled, 1);
        assert!((anim.transform().rotation().y - 1.0).abs() < f32::EPSILON);
        assert_eq!(scheduler.pending_count(), 1);
        assert!(surface.count_pixels_not(AnimationConfig::default().background) > 0);
    }

    #[test]
    fn test_play_twice_keeps_one_pending_frame() {
        let scheduler = ManualScheduler::new();
        let mut anim = cube_loop(scheduler.clone());
        anim.play();
        anim.play();
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_pause_cancels_pending_frame() {
        let scheduler = ManualScheduler::new();
        let mut anim = cube_loop(scheduler.clone());
        anim.play();
        anim.pause();
        assert_eq!(anim.state(), PlaybackState::Stopped);
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.cancelled_count(), 1);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let scheduler = ManualScheduler::new();
        {
            let mut anim = cube_loop(scheduler.clone());
            anim.play();
        }
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.cancelled_count(), 1);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let scheduler = ManualScheduler::new();
        let mut anim = cube_loop(scheduler.clone());
        let mut surface = Raster::new(32, 32);
        anim.play();
        let stale = anim.pending_frame().expect("pending");
        anim.pause();
        let outcome = anim.tick(stale, &mut surface).expect("tick");
        assert_eq!(outcome, FrameOutcome::Ignored);
        assert_eq!(anim.frames(), 0);
    }

    #[test]
    fn test_full_turn_returns_to_start() {
        let scheduler = ManualScheduler::new();
        let mut anim = cube_loop(scheduler);
        let mut surface = Raster::new(32, 32);
        anim.play();
        let handled = anim.run_frames(&mut surface, 360).expect("run");
        assert_eq!(handled, 360);
        assert!(anim.transform().rotation().y.abs() < 1e-3);
    }

    #[test]
    fn test_malformed_primitive_skipped_but_keeps_playing() {
        let scheduler = ManualScheduler::new();
        let broken = Primitive::mesh(
            "broken",
            "Broken",
            Color::WHITE,
            vec![Vec3::zero()],
            vec![(0, 9)],
        );
        let mut anim =
            AnimationLoop::new(broken, Transform::new(), scheduler, AnimationConfig::default());
        let mut surface = Raster::new(32, 32);
        anim.play();
        let handle = anim.pending_frame().expect("pending");
        assert_eq!(anim.tick(handle, &mut surface).expect("tick"), FrameOutcome::Skipped);
        assert!(anim.is_playing());
    }

    #[test]
    fn test_unavailable_surface_stops_loop() {
        let scheduler = ManualScheduler::new();
        let mut anim = cube_loop(scheduler.clone());
        let mut surface = Raster::new(0, 0);
        anim.play();
        let result = anim.pump(&mut surface);
        assert!(matches!(result, Err(RenderError::SurfaceUnavailable(_))));
        assert_eq!(anim.state(), PlaybackState::Stopped);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
