//! Background slicing into ten physical strips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::geometry::Rect;
use crate::layout::KEY_COUNT;
use crate::raster::RasterImage;

/// Direction along which an image is cut into strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitAxis {
    /// Ten equal-width columns, left to right, each spanning the full height.
    #[default]
    Horizontal,
    /// Ten equal-height rows, top to bottom, each spanning the full width.
    Vertical,
}

impl SplitAxis {
    /// Axis implied by an image's aspect ratio: horizontal when it is at
    /// least as wide as it is tall.
    pub fn for_dimensions(width: u32, height: u32) -> SplitAxis {
        if width >= height {
            SplitAxis::Horizontal
        } else {
            SplitAxis::Vertical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitAxis::Horizontal => "horizontal",
            SplitAxis::Vertical => "vertical",
        }
    }
}

impl fmt::Display for SplitAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(SplitAxis::Horizontal),
            "vertical" | "v" => Ok(SplitAxis::Vertical),
            other => Err(format!(
                "unknown split axis '{}', expected 'horizontal' or 'vertical'",
                other
            )),
        }
    }
}

/// Cut `image` into ten strips along `axis`, in physical order.
///
/// The strip extent is `size / 10` without rounding; each strip buffer is
/// that extent rounded down (at least one pixel) and receives its source
/// region unscaled. Strips narrower than one pixel are stretched onto the
/// single destination pixel.
pub fn slice_background(
    image: &RasterImage,
    axis: SplitAxis,
) -> Result<Vec<RasterImage>, ThemeError> {
    image.ensure_not_empty("Background image")?;

    let (width, height) = (image.width() as f64, image.height() as f64);
    let count = KEY_COUNT as f64;

    let slices = match axis {
        SplitAxis::Horizontal => {
            let slice_w = width / count;
            let buffer_w = (slice_w.floor() as u32).max(1);
            (0..KEY_COUNT)
                .map(|i| {
                    let src = Rect::new(i as f64 * slice_w, 0.0, slice_w, height);
                    let dst = Rect::new(0.0, 0.0, slice_w.max(1.0), height);
                    let mut slice = RasterImage::new(buffer_w, image.height());
                    slice.draw_image(image, src, dst);
                    slice
                })
                .collect()
        }
        SplitAxis::Vertical => {
            let slice_h = height / count;
            let buffer_h = (slice_h.floor() as u32).max(1);
            (0..KEY_COUNT)
                .map(|i| {
                    let src = Rect::new(0.0, i as f64 * slice_h, width, slice_h);
                    let dst = Rect::new(0.0, 0.0, width, slice_h.max(1.0));
                    let mut slice = RasterImage::new(image.width(), buffer_h);
                    slice.draw_image(image, src, dst);
                    slice
                })
                .collect()
        }
    };

    log::debug!(
        "sliced {}x{} background {} into {} strips",
        image.width(),
        image.height(),
        axis,
        KEY_COUNT
    );

    Ok(slices)
}
