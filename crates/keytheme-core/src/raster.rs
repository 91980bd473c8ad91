//! RGBA raster buffer and the region-drawing primitive every stage builds on.

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::error::ThemeError;
use crate::geometry::Rect;

/// A 2D RGBA8 pixel buffer (straight alpha, row-major), backed by
/// [`image::RgbaImage`].
///
/// Fresh buffers are fully transparent. Drawing composites with source-over
/// blending and clips to the buffer bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl From<RgbaImage> for RasterImage {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}

impl RasterImage {
    /// Create a new fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Create a new buffer filled with a color.
    pub fn filled(width: u32, height: u32, fill: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(fill.to_rgba8())),
        }
    }

    /// Wrap raw RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ThemeError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ThemeError::invalid(format!(
                "Expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                bytes.len()
            )));
        }

        RgbaImage::from_raw(width, height, bytes.to_vec())
            .map(Self::from)
            .ok_or_else(|| ThemeError::invalid(format!("Bad RGBA buffer for {}x{}", width, height)))
    }

    /// Borrow the underlying pixel buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Unwrap into the underlying pixel buffer.
    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Fail with `InvalidInput` when the image has a zero dimension.
    pub fn ensure_not_empty(&self, what: &str) -> Result<(), ThemeError> {
        if self.is_empty() {
            return Err(ThemeError::invalid(format!(
                "{} must be at least 1x1, got {}x{}",
                what,
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }

    /// Get the raw pixel at the given coordinates.
    #[inline]
    pub fn get_rgba8(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color::from_rgba8(self.get_rgba8(x, y))
    }

    /// Get a pixel, treating everything outside the buffer as transparent.
    pub fn get_or_transparent(&self, x: i64, y: i64) -> Color {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return Color::transparent();
        }
        self.get(x as u32, y as u32)
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels.put_pixel(x, y, Rgba(color.to_rgba8()));
    }

    /// Convert to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.as_raw().clone()
    }

    /// True when every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.pixels().all(|px| px[3] == 0)
    }

    /// True when every pixel is fully opaque.
    pub fn is_fully_opaque(&self) -> bool {
        self.pixels.pixels().all(|px| px[3] == 255)
    }

    /// Draw the whole of `src` unscaled with its top-left corner at `(x, y)`.
    pub fn draw_at(&mut self, src: &RasterImage, x: f64, y: f64) {
        let dst = Rect::new(x, y, src.width() as f64, src.height() as f64);
        self.draw_image(src, Rect::from_size(src.width(), src.height()), dst);
    }

    /// Draw the whole of `src` scaled into `dst_rect`.
    pub fn draw_scaled(&mut self, src: &RasterImage, dst_rect: Rect) {
        self.draw_image(src, Rect::from_size(src.width(), src.height()), dst_rect);
    }

    /// Draw the `src_rect` region of `src` into `dst_rect` of this buffer.
    ///
    /// The source region is stretched to the destination rectangle. A
    /// destination pixel is painted when its center falls inside `dst_rect`
    /// and maps to a point inside both `src_rect` and the source bounds;
    /// everything else is left untouched, so source area outside the image
    /// behaves as transparent. Samples are bilinear in premultiplied space,
    /// clamped to the readable source region, and composited source-over.
    /// Unscaled, pixel-aligned draws copy pixels exactly.
    pub fn draw_image(&mut self, src: &RasterImage, src_rect: Rect, dst_rect: Rect) {
        if src.is_empty() || self.is_empty() || src_rect.is_empty() || dst_rect.is_empty() {
            return;
        }

        let readable = match src_rect.intersect(&Rect::from_size(src.width(), src.height())) {
            Some(r) => r,
            None => return,
        };

        let scale_x = src_rect.width / dst_rect.width;
        let scale_y = src_rect.height / dst_rect.height;

        // Pixel index bounds of the readable region, used to clamp bilinear taps.
        let min_ix = readable.x.floor() as i64;
        let max_ix = (readable.right().ceil() as i64 - 1).max(min_ix);
        let min_iy = readable.y.floor() as i64;
        let max_iy = (readable.bottom().ceil() as i64 - 1).max(min_iy);

        let x_start = dst_rect.x.max(0.0).floor() as u32;
        let x_end = dst_rect.right().min(self.width() as f64).ceil().max(0.0) as u32;
        let y_start = dst_rect.y.max(0.0).floor() as u32;
        let y_end = dst_rect.bottom().min(self.height() as f64).ceil().max(0.0) as u32;

        for dy in y_start..y_end {
            let cy = dy as f64 + 0.5;
            if cy < dst_rect.y || cy >= dst_rect.bottom() {
                continue;
            }
            let v = src_rect.y + (cy - dst_rect.y) * scale_y;
            if v < readable.y || v >= readable.bottom() {
                continue;
            }

            for dx in x_start..x_end {
                let cx = dx as f64 + 0.5;
                if cx < dst_rect.x || cx >= dst_rect.right() {
                    continue;
                }
                let u = src_rect.x + (cx - dst_rect.x) * scale_x;
                if u < readable.x || u >= readable.right() {
                    continue;
                }

                let sample = src.sample_clamped(u, v, (min_ix, max_ix), (min_iy, max_iy));
                let below = self.get(dx, dy);
                self.set(dx, dy, sample.over(&below));
            }
        }
    }

    /// Bilinear sample at continuous coordinates `(u, v)` (pixel centers at
    /// `i + 0.5`), with taps clamped to the given inclusive index ranges.
    fn sample_clamped(&self, u: f64, v: f64, xs: (i64, i64), ys: (i64, i64)) -> Color {
        let px = u - 0.5;
        let py = v - 0.5;
        let fx0 = px.floor();
        let fy0 = py.floor();
        let fx = px - fx0;
        let fy = py - fy0;

        let clamp_x = |i: i64| i.clamp(xs.0, xs.1);
        let clamp_y = |i: i64| i.clamp(ys.0, ys.1);
        let x0 = clamp_x(fx0 as i64);
        let x1 = clamp_x(fx0 as i64 + 1);
        let y0 = clamp_y(fy0 as i64);
        let y1 = clamp_y(fy0 as i64 + 1);

        if fx == 0.0 && fy == 0.0 {
            return self.get_or_transparent(x0, y0);
        }

        let c00 = self.get_or_transparent(x0, y0).premultiplied();
        let c10 = self.get_or_transparent(x1, y0).premultiplied();
        let c01 = self.get_or_transparent(x0, y1).premultiplied();
        let c11 = self.get_or_transparent(x1, y1).premultiplied();

        let c0 = c00.lerp(&c10, fx);
        let c1 = c01.lerp(&c11, fx);
        c0.lerp(&c1, fy).unpremultiplied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RasterImage {
        let mut img = RasterImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 7 + y * 13) % 256) as u8;
                img.set(x, y, Color::from_rgba8([v, 255 - v, (x % 256) as u8, 255]));
            }
        }
        img
    }

    #[test]
    fn new_buffer_is_transparent() {
        let img = RasterImage::new(3, 2);
        assert_eq!(img.dimensions(), (3, 2));
        assert!(img.is_fully_transparent());
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(RasterImage::from_rgba8(2, 2, &[0u8; 16]).is_ok());
        let err = RasterImage::from_rgba8(2, 2, &[0u8; 15]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn wraps_rgba_image() {
        let buffer = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 9, 255]));
        let img = RasterImage::from(buffer.clone());
        assert_eq!(img.get_rgba8(2, 1), [2, 1, 9, 255]);
        assert_eq!(img.to_rgba8(), buffer.as_raw().clone());
        assert_eq!(img.into_rgba(), buffer);
    }

    #[test]
    fn ensure_not_empty_rejects_zero_dimensions() {
        assert!(RasterImage::new(0, 5).ensure_not_empty("image").is_err());
        assert!(RasterImage::new(5, 0).ensure_not_empty("image").is_err());
        assert!(RasterImage::new(1, 1).ensure_not_empty("image").is_ok());
    }

    #[test]
    fn aligned_unscaled_draw_is_exact_copy() {
        let src = checker(20, 10);
        let mut dst = RasterImage::new(5, 10);
        dst.draw_image(&src, Rect::new(10.0, 0.0, 5.0, 10.0), Rect::new(0.0, 0.0, 5.0, 10.0));

        for y in 0..10 {
            for x in 0..5 {
                assert_eq!(dst.get_rgba8(x, y), src.get_rgba8(x + 10, y));
            }
        }
    }

    #[test]
    fn out_of_bounds_source_stays_transparent() {
        let src = RasterImage::filled(4, 4, Color::white());
        let mut dst = RasterImage::new(4, 4);
        dst.draw_image(&src, Rect::new(-2.0, -2.0, 4.0, 4.0), Rect::from_size(4, 4));

        assert_eq!(dst.get_rgba8(0, 0)[3], 0);
        assert_eq!(dst.get_rgba8(1, 1)[3], 0);
        assert_eq!(dst.get_rgba8(2, 2), [255, 255, 255, 255]);
        assert_eq!(dst.get_rgba8(3, 3), [255, 255, 255, 255]);
    }

    #[test]
    fn negative_destination_is_clipped() {
        let src = checker(4, 4);
        let mut dst = RasterImage::new(2, 2);
        dst.draw_at(&src, -2.0, -2.0);
        assert_eq!(dst.get_rgba8(0, 0), src.get_rgba8(2, 2));
        assert_eq!(dst.get_rgba8(1, 1), src.get_rgba8(3, 3));
    }

    #[test]
    fn upscale_of_solid_color_covers_destination() {
        let src = RasterImage::filled(2, 3, Color::rgb(0.2, 0.4, 0.6));
        let mut dst = RasterImage::new(30, 17);
        dst.draw_scaled(&src, Rect::from_size(30, 17));
        assert!(dst.is_fully_opaque());
        assert_eq!(dst.get_rgba8(29, 16), Color::rgb(0.2, 0.4, 0.6).to_rgba8());
    }

    #[test]
    fn draw_blends_over_existing_pixels() {
        let mut dst = RasterImage::filled(1, 1, Color::black());
        let src = RasterImage::filled(1, 1, Color::rgba(1.0, 1.0, 1.0, 0.0));
        dst.draw_at(&src, 0.0, 0.0);
        assert_eq!(dst.get_rgba8(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn empty_source_draws_nothing() {
        let mut dst = RasterImage::filled(2, 2, Color::black());
        let before = dst.clone();
        dst.draw_scaled(&RasterImage::new(0, 0), Rect::from_size(2, 2));
        assert_eq!(dst, before);
    }
}
