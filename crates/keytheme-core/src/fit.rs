//! Cover-fit resize: scale to fill the target, crop the overflow.

use crate::error::ThemeError;
use crate::geometry::Rect;
use crate::raster::RasterImage;

/// Where the whole source lands on the target during a cover fit.
///
/// Offsets are fractional and usually negative on the overflowing axis.
pub fn cover_rect(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> Rect {
    let (sw, sh) = (src_w as f64, src_h as f64);
    let (tw, th) = (target_w as f64, target_h as f64);

    let scale = (tw / sw).max(th / sh);
    let scaled_w = sw * scale;
    let scaled_h = sh * scale;

    Rect::new((tw - scaled_w) / 2.0, (th - scaled_h) / 2.0, scaled_w, scaled_h)
}

/// Resize `image` to exactly `target_w` x `target_h`, preserving aspect
/// ratio, covering the target completely and cropping equally from both
/// sides of the overflowing dimension.
pub fn cover_fit(
    image: &RasterImage,
    target_w: u32,
    target_h: u32,
) -> Result<RasterImage, ThemeError> {
    image.ensure_not_empty("Cover-fit source")?;
    if target_w == 0 || target_h == 0 {
        return Err(ThemeError::invalid(format!(
            "Cover-fit target must be at least 1x1, got {}x{}",
            target_w, target_h
        )));
    }

    let rect = cover_rect(image.width(), image.height(), target_w, target_h);
    let mut out = RasterImage::new(target_w, target_h);
    out.draw_scaled(image, rect);
    Ok(out)
}
