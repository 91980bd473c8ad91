//! Cutting a combined overlay image into per-key sections.
//!
//! The overlay is first scaled by a percentage, then the 3x4 key grid
//! (one output image per cell) is centered on the scaled image and each
//! key's cell is copied out. Rounding happens at every stage (scaled size,
//! centering offset, per-cell origin) so neighbouring cells always meet on
//! whole pixels and no seams appear between them.

use std::collections::BTreeMap;
use std::ops::Index;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::ThemeError;
use crate::geometry::{round_half_up, Rect};
use crate::layout::{grid_extent, Key, KEY_COUNT, OUTPUT_HEIGHT, OUTPUT_WIDTH};
use crate::raster::RasterImage;
use crate::slice::SplitAxis;

/// Largest accepted overlay scale.
pub const MAX_SCALE_PERCENT: u32 = 1000;

/// Upper bound on the pixel count of the scaled overlay (512 MiB of RGBA).
pub const MAX_SCALED_PIXELS: u64 = 1 << 27;

/// One raster per key, as used for compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySections {
    sections: BTreeMap<Key, RasterImage>,
}

impl OverlaySections {
    /// Build from a complete key mapping.
    ///
    /// Fails with [`ThemeError::IncompleteOverlaySet`] listing every missing
    /// key when fewer than ten entries are present.
    pub fn from_map(sections: BTreeMap<Key, RasterImage>) -> Result<Self, ThemeError> {
        if sections.len() < KEY_COUNT {
            let missing = Key::ALL
                .iter()
                .copied()
                .filter(|k| !sections.contains_key(k))
                .collect();
            return Err(ThemeError::IncompleteOverlaySet { missing });
        }
        Ok(Self { sections })
    }

    pub fn get(&self, key: Key) -> Option<&RasterImage> {
        self.sections.get(&key)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &RasterImage)> {
        self.sections.iter().map(|(k, v)| (*k, v))
    }
}

impl Index<Key> for OverlaySections {
    type Output = RasterImage;

    fn index(&self, key: Key) -> &RasterImage {
        &self.sections[&key]
    }
}

/// Geometry of one grid slicing run, exposed for reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    /// Size of the scaled overlay.
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Position of the grid origin on the scaled overlay (may be negative).
    pub offset_x: i64,
    pub offset_y: i64,
}

impl GridPlacement {
    /// Compute the placement for an image of the given size and scale.
    ///
    /// Fails with `InvalidInput` for a zero scale, a scale above
    /// [`MAX_SCALE_PERCENT`], or a scaled image above [`MAX_SCALED_PIXELS`].
    pub fn compute(width: u32, height: u32, scale_percent: u32) -> Result<Self, ThemeError> {
        if scale_percent == 0 {
            return Err(ThemeError::invalid("Overlay scale must be a positive percentage"));
        }
        if scale_percent > MAX_SCALE_PERCENT {
            return Err(ThemeError::invalid(format!(
                "Overlay scale {}% exceeds the maximum of {}%",
                scale_percent, MAX_SCALE_PERCENT
            )));
        }

        let scale = scale_percent as f64 / 100.0;
        let scaled_w = round_half_up(width as f64 * scale);
        let scaled_h = round_half_up(height as f64 * scale);
        if scaled_w * scaled_h > MAX_SCALED_PIXELS as f64 {
            return Err(ThemeError::invalid(format!(
                "Scaled overlay {}x{} exceeds the {} pixel budget",
                scaled_w, scaled_h, MAX_SCALED_PIXELS
            )));
        }
        let scaled_width = scaled_w as u32;
        let scaled_height = scaled_h as u32;

        let (total_w, total_h) = grid_extent();
        let offset_x = round_half_up((scaled_width as f64 - total_w as f64) / 2.0) as i64;
        let offset_y = round_half_up((scaled_height as f64 - total_h as f64) / 2.0) as i64;

        Ok(Self {
            scaled_width,
            scaled_height,
            offset_x,
            offset_y,
        })
    }

    /// Source rectangle on the scaled overlay for a key's cell.
    pub fn source_rect(&self, key: Key) -> Rect {
        let cell = key.grid_cell();
        let sx = round_half_up(self.offset_x as f64 + (cell.column * OUTPUT_WIDTH) as f64);
        let sy = round_half_up(self.offset_y as f64 + (cell.row * OUTPUT_HEIGHT) as f64);
        Rect::new(sx, sy, OUTPUT_WIDTH as f64, OUTPUT_HEIGHT as f64)
    }
}

/// Axis a combined overlay is treated as, from its own aspect ratio.
pub fn detect_overlay_axis(image: &RasterImage) -> SplitAxis {
    SplitAxis::for_dimensions(image.width(), image.height())
}

/// Cut a combined overlay into one output-sized section per key.
///
/// `axis` does not influence the cut; the grid layout alone decides where
/// each key comes from. Regions of a cell that fall outside the scaled
/// overlay stay transparent, so any image size and scale yields ten full
/// sections.
pub fn slice_overlay_grid(
    image: &RasterImage,
    axis: SplitAxis,
    scale_percent: u32,
) -> Result<OverlaySections, ThemeError> {
    image.ensure_not_empty("Overlay image")?;
    let placement = GridPlacement::compute(image.width(), image.height(), scale_percent)?;

    log::debug!(
        "overlay {}x{} ({}) scaled {}% to {}x{}, grid offset ({}, {})",
        image.width(),
        image.height(),
        axis,
        scale_percent,
        placement.scaled_width,
        placement.scaled_height,
        placement.offset_x,
        placement.offset_y
    );

    let scaled = if placement.scaled_width == 0 || placement.scaled_height == 0 {
        RgbaImage::new(0, 0)
    } else {
        imageops::resize(
            image.as_rgba(),
            placement.scaled_width,
            placement.scaled_height,
            FilterType::Triangle,
        )
    };

    // Offsets and origins are whole pixels, so each section is a plain copy.
    let sections = Key::ALL
        .iter()
        .map(|&key| {
            let rect = placement.source_rect(key);
            let mut section = RgbaImage::new(OUTPUT_WIDTH, OUTPUT_HEIGHT);
            imageops::replace(&mut section, &scaled, -(rect.x as i64), -(rect.y as i64));
            (key, RasterImage::from(section))
        })
        .collect();

    OverlaySections::from_map(sections)
}
