//! Model viewer tool: one primitive, one surface, pointer input and playback.

use studio_core::{Primitive, Transform};
use tracing::debug;

use crate::animation::{
    AnimationConfig, AnimationLoop, FrameHandle, FrameOutcome, FrameScheduler, ManualScheduler,
};
use crate::export::snapshot;
use crate::notice::Notice;
use crate::projector::{draw_segments, project};
use crate::raster::Raster;
use crate::surface::Surface;

/// Interactive wireframe viewer. Dropping it cancels any pending frame.
#[derive(Debug)]
pub struct ModelViewer<S: FrameScheduler> {
    animation: AnimationLoop<S>,
    surface: Raster,
    config: AnimationConfig,
}

impl<S: FrameScheduler> ModelViewer<S> {
    /// Create a stopped viewer with an identity transform.
    pub fn new(
        width: u32,
        height: u32,
        primitive: Primitive,
        scheduler: S,
        config: AnimationConfig,
    ) -> Self {
        Self {
            animation: AnimationLoop::new(primitive, Transform::new(), scheduler, config),
            surface: Raster::filled(width, height, config.background),
            config,
        }
    }

    /// Switch to a built-in primitive by id.
    ///
    /// # Errors
    ///
    /// Returns an error notice for an unknown id.
    pub fn select_primitive(&mut self, id: &str) -> Result<(), Notice> {
        let primitive = Primitive::builtin(id).map_err(|e| Notice::error(e.to_string()))?;
        debug!(primitive = %primitive.id, "Primitive selected");
        self.animation.set_primitive(primitive);
        Ok(())
    }

    /// Show a custom primitive.
    pub fn set_primitive(&mut self, primitive: Primitive) {
        self.animation.set_primitive(primitive);
    }

    /// The primitive on screen.
    #[must_use]
    pub fn primitive(&self) -> &Primitive {
        self.animation.primitive()
    }

    /// Current transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        self.animation.transform()
    }

    /// Replace the transform.
    pub fn set_transform(&mut self, transform: Transform) {
        *self.animation.transform_mut() = transform;
    }

    /// Pointer drag in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.animation.transform_mut().drag(dx, dy);
    }

    /// Scroll wheel delta.
    pub fn scroll(&mut self, delta: f32) {
        self.animation.transform_mut().scroll(delta);
    }

    /// Move the shape on screen.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.animation.transform_mut().pan(dx, dy);
    }

    /// Restore the identity transform.
    pub fn reset_view(&mut self) {
        self.animation.transform_mut().reset();
    }

    /// Start auto-rotation.
    pub fn play(&mut self) {
        self.animation.play();
    }

    /// Stop auto-rotation.
    pub fn pause(&mut self) {
        self.animation.pause();
    }

    /// Whether auto-rotation is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.animation.is_playing()
    }

    /// Frame callback from the host.
    ///
    /// # Errors
    ///
    /// Returns an error notice if the frame failed; playback has stopped.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<FrameOutcome, Notice> {
        Ok(self.animation.tick(handle, &mut self.surface)?)
    }

    /// Draw the current view once without advancing the rotation.
    ///
    /// A malformed primitive leaves a cleared surface and a warning.
    ///
    /// # Errors
    ///
    /// Returns an error notice if the surface has no pixels.
    pub fn render_still(&mut self) -> Result<Option<Notice>, Notice> {
        self.surface.ensure_available()?;
        self.surface.clear(self.config.background);
        let canvas = (self.surface.width(), self.surface.height());
        match project(self.animation.primitive(), self.animation.transform(), canvas) {
            Ok(segments) => {
                draw_segments(&mut self.surface, &segments, self.config.line_width);
                Ok(None)
            }
            Err(e) => Ok(Some(Notice::from(e))),
        }
    }

    /// The surface.
    #[must_use]
    pub fn surface(&self) -> &Raster {
        &self.surface
    }

    /// PNG of the current surface.
    ///
    /// # Errors
    ///
    /// Returns an error notice if encoding fails.
    pub fn snapshot(&self) -> Result<Vec<u8>, Notice> {
        Ok(snapshot(&self.surface)?)
    }
}

impl ModelViewer<ManualScheduler> {
    /// Drive up to `frames` frames through the manual scheduler.
    ///
    /// # Errors
    ///
    /// Returns an error notice if a frame failed; playback has stopped.
    pub fn run_frames(&mut self, frames: usize) -> Result<usize, Notice> {
        Ok(self.animation.run_frames(&mut self.surface, frames)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{Color, Vec3};

    fn viewer() -> ModelViewer<ManualScheduler> {
        ModelViewer::new(
            96,
            96,
            Primitive::cube(),
            ManualScheduler::new(),
            AnimationConfig::default(),
        )
    }

    #[test]
    fn test_render_still_draws_wireframe() {
        let mut viewer = viewer();
        assert_eq!(viewer.render_still().expect("render"), None);
        let background = AnimationConfig::default().background;
        assert!(viewer.surface().count_pixels_not(background) > 0);
    }

    #[test]
    fn test_select_unknown_primitive() {
        let mut viewer = viewer();
        let notice = viewer.select_primitive("dodecahedron").expect_err("unknown");
        assert!(notice.is_error());
        assert_eq!(viewer.primitive().id, "cube");
        viewer.select_primitive("torus").expect("torus");
        assert_eq!(viewer.primitive().id, "torus");
    }

    #[test]
    fn test_drag_and_reset() {
        let mut viewer = viewer();
        viewer.drag(20.0, 10.0);
        let rotation = viewer.transform().rotation();
        assert!((rotation.y - 10.0).abs() < 1e-5);
        assert!((rotation.x - 5.0).abs() < 1e-5);
        viewer.reset_view();
        assert_eq!(viewer.transform(), &Transform::new());
    }

    #[test]
    fn test_playback_rotates() {
        let mut viewer = viewer();
        viewer.play();
        assert_eq!(viewer.run_frames(10).expect("frames"), 10);
        assert!((viewer.transform().rotation().y - 10.0).abs() < 1e-4);
        viewer.pause();
        assert_eq!(viewer.run_frames(10).expect("frames"), 0);
    }

    #[test]
    fn test_malformed_still_warns() {
        let mut viewer = viewer();
        viewer.set_primitive(Primitive::mesh(
            "bad",
            "Bad",
            Color::WHITE,
            vec![Vec3::zero()],
            vec![(1, 2)],
        ));
        let notice = viewer.render_still().expect("surface ok").expect("warning");
        assert!(!notice.is_error());
    }

    #[test]
    fn test_snapshot_is_png() {
        let mut viewer = viewer();
        viewer.render_still().expect("render");
        let png = viewer.snapshot().expect("png");
        assert_eq!(&png[1..4], b"PNG");
    }
}
