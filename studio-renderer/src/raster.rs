//! In-memory RGBA pixel buffer implementing [`Surface`].
//!
//! A small software rasteriser: scanline polygon fill sampled at pixel
//! centres, lines as filled quads, ellipses as polygons, and straight
//! source-over alpha blending on non-premultiplied RGBA8.

use std::f32::consts::TAU;

use image::ImageEncoder;
use studio_core::Color;

use crate::surface::{LinearGradient, Paint, PixelBlock, Point, Rect, Surface};
use crate::{RenderError, RenderResult};

/// Fewest segments used to approximate an ellipse.
const MIN_ELLIPSE_SEGMENTS: usize = 12;

/// Most segments used to approximate an ellipse.
const MAX_ELLIPSE_SEGMENTS: usize = 96;

/// An owned RGBA8 raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Create a transparent raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Create a raster filled with one color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut raster = Self::new(width, height);
        raster.clear(color);
        raster
    }

    /// Wrap existing RGBA data.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the buffer length doesn't match.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> RenderResult<Self> {
        let block = PixelBlock::from_raw(width, height, data)?;
        Ok(Self {
            width,
            height,
            data: block.into_raw(),
        })
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the raster, returning its bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Copy the whole raster into a [`PixelBlock`].
    #[must_use]
    pub fn to_block(&self) -> PixelBlock {
        self.get_pixel_block(0, 0, self.width, self.height)
    }

    /// Pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.index(x, y)?;
        Some(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Number of pixels whose color differs from `color`.
    #[must_use]
    pub fn count_pixels_not(&self, color: Color) -> usize {
        let target = color.to_array();
        self.data.chunks_exact(4).filter(|px| *px != target).count()
    }

    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the encoder fails.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                &self.data,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// Source-over blend `color` onto the pixel at `(x, y)`.
    fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if color.a == 255 {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
            return;
        }
        if color.a == 0 {
            return;
        }
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.data[i + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let src = [color.r, color.g, color.b];
        for (c, &s) in src.iter().enumerate() {
            let d = f32::from(self.data[i + c]);
            let blended = (f32::from(s) * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            self.data[i + c] = to_channel(blended);
        }
        self.data[i + 3] = to_channel(out_a * 255.0);
    }

    /// Fill a horizontal run of pixel centres in `[x0, x1)` on row `y`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn fill_span(&mut self, y: u32, x0: f32, x1: f32, color: Color) {
        let start = (x0 - 0.5).ceil().max(0.0);
        let end = (x1 - 0.5).ceil().min(self.width as f32);
        if end <= start {
            return;
        }
        for x in start as u32..end as u32 {
            self.blend_pixel(x, y, color);
        }
    }

    /// Rows whose pixel centres fall within `[min_y, max_y]`, clamped.
    fn row_range(&self, min_y: f32, max_y: f32) -> std::ops::Range<u32> {
        centers_within(min_y, max_y, self.height)
    }

    /// Even-odd scanline fill.
    #[allow(clippy::cast_precision_loss)]
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 || color.a == 0 {
            return;
        }
        if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return;
        }
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

        let mut crossings = Vec::with_capacity(8);
        for row in self.row_range(min_y, max_y) {
            let yc = row as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = &points[(i + 1) % points.len()];
                if (a.y <= yc && yc < b.y) || (b.y <= yc && yc < a.y) {
                    let t = (yc - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                self.fill_span(row, pair[0], pair[1], color);
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, color: Color, width: f32) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color, width);
        }
        if closed && points.len() > 2 {
            if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
                self.draw_line(last, first, color, width);
            }
        }
    }
}

/// Indices whose pixel centres fall within `[min, max]`, clamped to `bound`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn centers_within(min: f32, max: f32, bound: u32) -> std::ops::Range<u32> {
    let start = (min - 0.5).ceil().max(0.0);
    let end = ((max - 0.5).floor() + 1.0).clamp(0.0, bound as f32);
    if !start.is_finite() || !end.is_finite() || end <= start {
        return 0..0;
    }
    start as u32..end as u32
}

/// Points approximating an ellipse outline.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn ellipse_points(center: Point, rx: f32, ry: f32) -> Vec<Point> {
    let radius = rx.abs().max(ry.abs());
    let segments = if radius.is_finite() {
        ((radius * 2.0) as usize).clamp(MIN_ELLIPSE_SEGMENTS, MAX_ELLIPSE_SEGMENTS)
    } else {
        MIN_ELLIPSE_SEGMENTS
    };
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl Surface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (x0, x1) = ordered(rect.x, rect.x + rect.width);
        let (y0, y1) = ordered(rect.y, rect.y + rect.height);
        for row in self.row_range(y0, y1 - 1e-4) {
            self.fill_span(row, x0, x1, color);
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        let corners = rect.corners();
        self.stroke_polyline(&corners, true, color, line_width);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, line_width: f32) {
        if !(line_width.is_finite() && line_width > 0.0) {
            return;
        }
        // Sub-pixel widths render one pixel wide with proportionally less ink.
        let (half, color) = if line_width < 1.0 {
            (0.5, color.with_opacity(line_width))
        } else {
            (line_width * 0.5, color)
        };
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len = dx.hypot(dy);
        if !len.is_finite() {
            return;
        }
        if len < f32::EPSILON {
            self.fill_rect(
                Rect::new(from.x - half, from.y - half, half * 2.0, half * 2.0),
                color,
            );
            return;
        }
        let nx = -dy / len * half;
        let ny = dx / len * half;
        let quad = [
            Point::new(from.x + nx, from.y + ny),
            Point::new(to.x + nx, to.y + ny),
            Point::new(to.x - nx, to.y - ny),
            Point::new(from.x - nx, from.y - ny),
        ];
        self.fill_polygon(&quad, color);
    }

    fn draw_polygon(&mut self, points: &[Point], paint: Paint) {
        match paint {
            Paint::Fill(color) => self.fill_polygon(points, color),
            Paint::Stroke { color, width } => self.stroke_polyline(points, true, color, width),
        }
    }

    fn draw_ellipse(&mut self, center: Point, rx: f32, ry: f32, paint: Paint) {
        let points = ellipse_points(center, rx, ry);
        self.draw_polygon(&points, paint);
    }

    #[allow(clippy::cast_precision_loss)]
    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        let (x0, x1) = ordered(rect.x, rect.x + rect.width);
        let (y0, y1) = ordered(rect.y, rect.y + rect.height);
        let cols = centers_within(x0, x1 - 1e-4, self.width);
        for row in self.row_range(y0, y1 - 1e-4) {
            for col in cols.clone() {
                let color = gradient.color_at_point(Point::new(col as f32 + 0.5, row as f32 + 0.5));
                self.blend_pixel(col, row, color);
            }
        }
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn get_pixel_block(&self, x: i32, y: i32, width: u32, height: u32) -> PixelBlock {
        let Some((sx, sy, w, h)) = clip(x, y, width, height, self.width, self.height) else {
            return PixelBlock::empty();
        };
        let mut data = Vec::with_capacity(w as usize * h as usize * 4);
        for row in sy..sy + h {
            let start = (row as usize * self.width as usize + sx as usize) * 4;
            data.extend_from_slice(&self.data[start..start + w as usize * 4]);
        }
        PixelBlock::from_raw(w, h, data).unwrap_or_else(|_| PixelBlock::empty())
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn put_pixel_block(&mut self, x: i32, y: i32, block: &PixelBlock) {
        let Some((dx, dy, w, h)) = clip(x, y, block.width(), block.height(), self.width, self.height)
        else {
            return;
        };
        // Offset into the block when the destination was clipped on the left/top.
        let bx = (i64::from(dx) - i64::from(x)) as usize;
        let by = (i64::from(dy) - i64::from(y)) as usize;
        let src = block.data();
        for row in 0..h as usize {
            let s = ((by + row) * block.width() as usize + bx) * 4;
            let d = ((dy as usize + row) * self.width as usize + dx as usize) * 4;
            let n = w as usize * 4;
            self.data[d..d + n].copy_from_slice(&src[s..s + n]);
        }
    }

    fn to_encoded_image(&self) -> RenderResult<Vec<u8>> {
        self.ensure_available()?;
        self.to_png()
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Intersect a signed region with `[0, bound_w) x [0, bound_h)`.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn clip(x: i32, y: i32, w: u32, h: u32, bound_w: u32, bound_h: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + i64::from(w)).min(i64::from(bound_w));
    let y1 = (i64::from(y) + i64::from(h)).min(i64::from(bound_h));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn test_fill_rect_covers_exact_pixels() {
        let mut raster = Raster::filled(10, 10, Color::BLACK);
        raster.fill_rect(Rect::new(2.0, 3.0, 4.0, 2.0), RED);
        assert_eq!(raster.count_pixels_not(Color::BLACK), 8);
        assert_eq!(raster.pixel(2, 3), Some(RED));
        assert_eq!(raster.pixel(5, 4), Some(RED));
        assert_eq!(raster.pixel(6, 4), Some(Color::BLACK));
        assert_eq!(raster.pixel(2, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_rect_clamps_out_of_bounds() {
        let mut raster = Raster::filled(4, 4, Color::BLACK);
        raster.fill_rect(Rect::new(-10.0, -10.0, 100.0, 100.0), RED);
        assert_eq!(raster.count_pixels_not(RED), 0);
        raster.fill_rect(Rect::new(50.0, 50.0, 5.0, 5.0), Color::WHITE);
        assert_eq!(raster.count_pixels_not(RED), 0);
    }

    #[test]
    fn test_alpha_blending() {
        let mut raster = Raster::filled(1, 1, Color::BLACK);
        raster.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE.with_opacity(0.5));
        let px = raster.pixel(0, 0).expect("pixel");
        assert!((127..=129).contains(&px.r), "got {px:?}");
        assert_eq!(px.a, 255);
    }

    #[test]
    fn test_line_touches_endpoints() {
        let mut raster = Raster::filled(20, 20, Color::BLACK);
        raster.draw_line(Point::new(2.5, 2.5), Point::new(17.5, 17.5), RED, 1.0);
        assert_eq!(raster.pixel(2, 2), Some(RED));
        assert_eq!(raster.pixel(10, 10), Some(RED));
        assert_eq!(raster.pixel(16, 16), Some(RED));
        assert_eq!(raster.pixel(17, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_filled_ellipse_covers_center_not_corner() {
        let mut raster = Raster::filled(40, 40, Color::BLACK);
        raster.draw_ellipse(Point::new(20.0, 20.0), 10.0, 10.0, Paint::Fill(RED));
        assert_eq!(raster.pixel(20, 20), Some(RED));
        assert_eq!(raster.pixel(0, 0), Some(Color::BLACK));
        let filled = raster.count_pixels_not(Color::BLACK);
        // Area of a radius-10 circle is ~314.
        assert!((280..=330).contains(&filled), "filled {filled}");
    }

    #[test]
    fn test_stroked_ellipse_leaves_center_empty() {
        let mut raster = Raster::filled(40, 40, Color::BLACK);
        raster.draw_ellipse(
            Point::new(20.0, 20.0),
            10.0,
            10.0,
            Paint::Stroke { color: RED, width: 1.0 },
        );
        assert_eq!(raster.pixel(20, 20), Some(Color::BLACK));
        assert!(raster.count_pixels_not(Color::BLACK) > 40);
    }

    #[test]
    fn test_pixel_block_roundtrip_with_offset() {
        let mut raster = Raster::filled(8, 4, Color::BLACK);
        raster.set_pixel(0, 1, RED);
        let strip = raster.get_pixel_block(0, 1, 8, 1);
        assert_eq!(strip.width(), 8);
        raster.put_pixel_block(3, 1, &strip);
        assert_eq!(raster.pixel(3, 1), Some(RED));
        // Negative offset drops pixels that land off the left edge.
        raster.put_pixel_block(-3, 2, &strip);
        assert_eq!(raster.pixel(0, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_get_pixel_block_clamps() {
        let raster = Raster::filled(4, 4, RED);
        let block = raster.get_pixel_block(2, 2, 10, 10);
        assert_eq!((block.width(), block.height()), (2, 2));
        assert!(raster.get_pixel_block(10, 10, 2, 2).is_empty());
        assert!(raster.get_pixel_block(-5, 0, 2, 2).is_empty());
    }

    #[test]
    fn test_gradient_fill() {
        let mut raster = Raster::new(10, 1);
        let gradient = LinearGradient::even(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            &[Color::BLACK, Color::WHITE],
        );
        raster.fill_gradient(Rect::covering(10, 1), &gradient);
        let left = raster.pixel(0, 0).expect("left").r;
        let right = raster.pixel(9, 0).expect("right").r;
        assert!(left < 30 && right > 225, "left {left} right {right}");
    }

    #[test]
    fn test_png_encoding() {
        let raster = Raster::filled(3, 2, RED);
        let png = raster.to_encoded_image().expect("png");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
        assert!(Raster::new(0, 5).to_encoded_image().is_err());
    }
}
