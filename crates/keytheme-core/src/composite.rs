//! Centered overlay compositing.

use crate::raster::RasterImage;

/// Top-left position that centers an `inner` sized image in `outer`.
///
/// Fractional results are kept; negative values mean the inner image is
/// larger and will be clipped.
pub fn centered_origin(outer: (u32, u32), inner: (u32, u32)) -> (f64, f64) {
    (
        (outer.0 as f64 - inner.0 as f64) / 2.0,
        (outer.1 as f64 - inner.1 as f64) / 2.0,
    )
}

/// Draw `base` at the origin of a fresh `width` x `height` buffer, then
/// draw `overlay` unscaled and centered on top with alpha-over blending.
///
/// Neither image is resized; parts falling outside the buffer are clipped.
pub fn composite_centered(
    base: &RasterImage,
    overlay: &RasterImage,
    width: u32,
    height: u32,
) -> RasterImage {
    let mut out = RasterImage::new(width, height);
    out.draw_at(base, 0.0, 0.0);

    let (x, y) = centered_origin((width, height), overlay.dimensions());
    out.draw_at(overlay, x, y);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn gradient(width: u32, height: u32, alpha: u8) -> RasterImage {
        let mut img = RasterImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set(
                    x,
                    y,
                    Color::from_rgba8([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 99, alpha]),
                );
            }
        }
        img
    }

    #[test]
    fn opaque_overlay_of_same_size_wins_everywhere() {
        let base = RasterImage::filled(20, 12, Color::rgb(0.9, 0.1, 0.1));
        let overlay = gradient(20, 12, 255);
        let out = composite_centered(&base, &overlay, 20, 12);
        assert_eq!(out, overlay);
    }

    #[test]
    fn transparent_overlay_leaves_base() {
        let base = gradient(20, 12, 255);
        let overlay = RasterImage::new(20, 12);
        let out = composite_centered(&base, &overlay, 20, 12);
        assert_eq!(out, base);
    }

    #[test]
    fn smaller_overlay_is_centered() {
        let base = RasterImage::filled(10, 10, Color::black());
        let overlay = RasterImage::filled(4, 2, Color::white());
        let out = composite_centered(&base, &overlay, 10, 10);

        // Overlay occupies x in 3..7, y in 4..6
        assert_eq!(out.get_rgba8(2, 4), [0, 0, 0, 255]);
        assert_eq!(out.get_rgba8(3, 4), [255, 255, 255, 255]);
        assert_eq!(out.get_rgba8(6, 5), [255, 255, 255, 255]);
        assert_eq!(out.get_rgba8(7, 5), [0, 0, 0, 255]);
        assert_eq!(out.get_rgba8(5, 3), [0, 0, 0, 255]);
        assert_eq!(out.get_rgba8(5, 6), [0, 0, 0, 255]);
    }

    #[test]
    fn larger_overlay_is_clipped() {
        let base = RasterImage::filled(4, 4, Color::black());
        let overlay = gradient(8, 8, 255);
        let out = composite_centered(&base, &overlay, 4, 4);
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_rgba8(0, 0), overlay.get_rgba8(2, 2));
        assert_eq!(out.get_rgba8(3, 3), overlay.get_rgba8(5, 5));
    }

    #[test]
    fn semi_transparent_overlay_blends() {
        let base = RasterImage::filled(2, 2, Color::black());
        let overlay = RasterImage::filled(2, 2, Color::rgba(1.0, 1.0, 1.0, 0.5));
        let out = composite_centered(&base, &overlay, 2, 2);
        let px = out.get_rgba8(0, 0);
        assert_eq!(px[3], 255);
        assert!((127..=129).contains(&px[0]));
    }

    #[test]
    fn fractional_centering_offsets() {
        assert_eq!(centered_origin((305, 287), (300, 287)), (2.5, 0.0));
        assert_eq!(centered_origin((4, 4), (8, 8)), (-2.0, -2.0));
    }

    #[test]
    fn smaller_base_leaves_rest_transparent() {
        let base = RasterImage::filled(2, 2, Color::black());
        let out = composite_centered(&base, &RasterImage::new(1, 1), 4, 4);
        assert_eq!(out.get_rgba8(1, 1), [0, 0, 0, 255]);
        assert_eq!(out.get_rgba8(3, 3)[3], 0);
    }
}
