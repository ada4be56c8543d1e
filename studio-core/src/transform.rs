//! Viewer transform: scale, rotation, translation and zoom.
//!
//! Owned by the active viewer session and mutated by the animation loop and
//! by user drag/scroll input. Never persisted.

/// Smallest accepted scale.
pub const MIN_SCALE: f32 = 0.01;

/// Zoom lower bound.
pub const MIN_ZOOM: f32 = 0.5;

/// Zoom upper bound.
pub const MAX_ZOOM: f32 = 3.0;

/// Degrees of rotation per pixel of drag.
pub const DRAG_SENSITIVITY: f32 = 0.5;

/// Zoom change per unit of scroll delta.
pub const SCROLL_SENSITIVITY: f32 = 0.001;

/// Rotation around three axes, in degrees, each wrapped into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Rotation around X (pitch).
    pub x: f32,
    /// Rotation around Y (yaw).
    pub y: f32,
    /// Rotation around Z (roll). Carried but unused by the projector.
    pub z: f32,
}

impl Rotation {
    /// Create a rotation, wrapping each angle.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: wrap_degrees(x),
            y: wrap_degrees(y),
            z: wrap_degrees(z),
        }
    }
}

/// The transform applied before projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    scale: f32,
    rotation: Rotation,
    translation: (f32, f32),
    zoom: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: Rotation::default(),
            translation: (0.0, 0.0),
            zoom: 1.0,
        }
    }
}

impl Transform {
    /// Identity transform (scale 1, zoom 1, no rotation or translation).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.set_scale(scale);
        self
    }

    /// Builder: set the rotation in degrees.
    #[must_use]
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Rotation::new(x, y, z);
        self
    }

    /// Builder: set the translation in pixels.
    #[must_use]
    pub fn with_translation(mut self, dx: f32, dy: f32) -> Self {
        self.translation = (dx, dy);
        self
    }

    /// Builder: set the zoom (clamped).
    #[must_use]
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.set_zoom(zoom);
        self
    }

    /// Current scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current rotation.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Current translation.
    #[must_use]
    pub fn translation(&self) -> (f32, f32) {
        self.translation
    }

    /// Current zoom.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the scale; non-positive or non-finite values become [`MIN_SCALE`].
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() {
            scale.max(MIN_SCALE)
        } else {
            MIN_SCALE
        };
    }

    /// Set the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
    }

    /// Rotate by deltas in degrees.
    pub fn rotate_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation = Rotation::new(
            self.rotation.x + dx,
            self.rotation.y + dy,
            self.rotation.z + dz,
        );
    }

    /// Apply a pointer drag: horizontal movement yaws, vertical pitches.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.rotate_by(dy * DRAG_SENSITIVITY, dx * DRAG_SENSITIVITY, 0.0);
    }

    /// Apply a scroll wheel delta (positive zooms out).
    pub fn scroll(&mut self, delta: f32) {
        self.set_zoom(self.zoom * (1.0 - delta * SCROLL_SENSITIVITY));
    }

    /// Move the projected shape by a pixel offset.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.translation.0 += dx;
        self.translation.1 += dy;
    }

    /// Restore the identity transform.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Wrap an angle in degrees into `[0, 360)`. Non-finite input becomes 0.
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!(wrap_degrees(720.0).abs() < 1e-4);
        assert!(wrap_degrees(-1e-9) < 360.0);
        assert_eq!(wrap_degrees(f32::NAN), 0.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut t = Transform::new().with_zoom(10.0);
        assert!((t.zoom() - MAX_ZOOM).abs() < f32::EPSILON);
        t.set_zoom(0.1);
        assert!((t.zoom() - MIN_ZOOM).abs() < f32::EPSILON);
        for _ in 0..100 {
            t.scroll(-500.0);
        }
        assert!((t.zoom() - MAX_ZOOM).abs() < f32::EPSILON);
    }

    #[test]
    fn test_scale_stays_positive() {
        let t = Transform::new().with_scale(-2.0);
        assert!(t.scale() > 0.0);
        let t = Transform::new().with_scale(f32::INFINITY);
        assert!((t.scale() - MIN_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_drag_rotates_y_then_x() {
        let mut t = Transform::new();
        t.drag(20.0, -10.0);
        let r = t.rotation();
        assert!((r.y - 10.0).abs() < 1e-4);
        assert!((r.x - 355.0).abs() < 1e-4);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut t = Transform::new().with_rotation(10.0, 20.0, 30.0);
        t.pan(5.0, -5.0);
        assert_eq!(t.translation(), (5.0, -5.0));
        t.reset();
        assert_eq!(t, Transform::default());
    }
}
