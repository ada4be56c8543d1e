//! The Canvas Surface contract that every drawing algorithm targets.
//!
//! Algorithms never touch a host drawing API directly; they speak to a
//! [`Surface`]. All coordinates are in pixels with the origin at the top-left.
//! Requests that fall partly or wholly outside the surface are clamped,
//! never rejected.

use studio_core::Color;

use crate::{RenderError, RenderResult};

/// A 2D point in surface space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate (pixels from left).
    pub x: f32,
    /// Y coordinate (pixels from top).
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle covering a whole `width` x `height` surface.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn covering(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Corner points, clockwise from top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }
}

/// How a closed path is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Fill the interior.
    Fill(Color),
    /// Stroke the outline.
    Stroke {
        /// Stroke color.
        color: Color,
        /// Line width in pixels.
        width: f32,
    },
}

/// A color stop along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0.0..=1.0.
    pub offset: f32,
    /// Color at this position.
    pub color: Color,
}

/// A linear gradient between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Where offset 0.0 lies.
    pub start: Point,
    /// Where offset 1.0 lies.
    pub end: Point,
    stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Create a gradient with colors spread evenly from start to end.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn even(start: Point, end: Point, colors: &[Color]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| GradientStop {
                offset: i as f32 / last,
                color,
            })
            .collect();
        Self { start, end, stops }
    }

    /// The stops, ordered by offset.
    #[must_use]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at a parametric position (clamped to 0.0..=1.0).
    #[must_use]
    pub fn color_at(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::TRANSPARENT;
        };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.lerp(b.color, local);
            }
        }
        self.stops.last().map_or(first.color, |s| s.color)
    }

    /// Color for a point, projecting it onto the start-end axis.
    #[must_use]
    pub fn color_at_point(&self, p: Point) -> Color {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f32::EPSILON {
            return self.color_at(0.0);
        }
        let t = ((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len_sq;
        self.color_at(t)
    }
}

/// A rectangular copy of RGBA pixels (4 bytes per pixel, row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBlock {
    /// Create a block from raw RGBA data.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if `data` is not `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RenderError::Encode(format!(
                "pixel block {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// An empty (0x0) block.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the block has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Iterate mutably over pixels as `[r, g, b, a]` chunks.
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.data.chunks_exact_mut(4)
    }

    /// Pixel at `(x, y)` within the block.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Consume the block, returning its bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

/// The drawing contract consumed by the projector, the style engine, the
/// animation loop and the exporter.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Replace every pixel with `color` (no blending).
    fn clear(&mut self, color: Color);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    /// Draw a straight line.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, line_width: f32);

    /// Fill or stroke a closed polygon.
    fn draw_polygon(&mut self, points: &[Point], paint: Paint);

    /// Fill or stroke an axis-aligned ellipse.
    fn draw_ellipse(&mut self, center: Point, rx: f32, ry: f32, paint: Paint);

    /// Fill a rectangle with a linear gradient.
    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient);

    /// Copy the intersection of the requested region with the surface.
    ///
    /// The returned block may be smaller than requested (or empty) when the
    /// region crosses the surface bounds.
    fn get_pixel_block(&self, x: i32, y: i32, width: u32, height: u32) -> PixelBlock;

    /// Overwrite pixels with a block placed at `(x, y)` (no blending).
    /// Pixels landing outside the surface are dropped.
    fn put_pixel_block(&mut self, x: i32, y: i32, block: &PixelBlock);

    /// Encode the current contents as an image file (PNG).
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn to_encoded_image(&self) -> RenderResult<Vec<u8>>;

    /// Check the surface can be drawn on.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceUnavailable`] for a zero-sized surface.
    fn ensure_available(&self) -> RenderResult<()> {
        if self.width() == 0 || self.height() == 0 {
            return Err(RenderError::SurfaceUnavailable(format!(
                "surface is {}x{}",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }
}
