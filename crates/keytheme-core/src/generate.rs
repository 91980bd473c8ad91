//! Theme generation: drives slicing, fitting and compositing for all keys.

use std::collections::BTreeMap;

use crate::composite::composite_centered;
use crate::error::ThemeError;
use crate::fit::cover_fit;
use crate::layout::{Key, KEY_COUNT, OUTPUT_HEIGHT, OUTPUT_WIDTH};
use crate::overlay::{detect_overlay_axis, slice_overlay_grid, OverlaySections};
use crate::png::{self, PngConfig};
use crate::raster::RasterImage;
use crate::slice::{slice_background, SplitAxis};

/// Default overlay scale in percent.
pub const DEFAULT_SCALE_PERCENT: u32 = 100;

/// Where the per-key overlays come from.
#[derive(Debug, Clone)]
pub enum OverlaySource {
    /// One combined image laid out on the keypad grid, scaled by a percentage.
    Single {
        image: RasterImage,
        scale_percent: u32,
    },
    /// Ten pre-split images, one per key. Images are centered without
    /// resizing, whatever their size.
    Discrete(BTreeMap<Key, RasterImage>),
}

/// Everything needed for one generation run.
#[derive(Debug, Clone)]
pub struct ThemeRequest {
    pub background: RasterImage,
    pub overlay: OverlaySource,
    pub axis: SplitAxis,
}

impl ThemeRequest {
    pub fn new(background: RasterImage, overlay: OverlaySource, axis: SplitAxis) -> Self {
        Self {
            background,
            overlay,
            axis,
        }
    }
}

/// One finished key image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub key: Key,
    pub filename: &'static str,
    pub image: RasterImage,
}

impl GeneratedImage {
    /// Encode as PNG and return the bytes with their BLAKE3 hash.
    pub fn encode_png(&self, config: &PngConfig) -> Result<(Vec<u8>, String), ThemeError> {
        Ok(png::write_rgba_to_vec_with_hash(&self.image, config)?)
    }
}

/// The ten generated images in canonical key order.
#[derive(Debug, Clone)]
pub struct ThemeSet {
    images: Vec<GeneratedImage>,
}

impl ThemeSet {
    /// Images in key order `0..=9`.
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn into_images(self) -> Vec<GeneratedImage> {
        self.images
    }

    pub fn get(&self, key: Key) -> &GeneratedImage {
        &self.images[key.index()]
    }

    /// Images in passcode display order (`1..=9`, then `0`).
    pub fn in_display_order(&self) -> impl Iterator<Item = &GeneratedImage> {
        Key::DISPLAY_ORDER.iter().map(move |k| self.get(*k))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// A fully transparent background ten keys wide and one key tall.
pub fn transparent_background() -> RasterImage {
    RasterImage::new(OUTPUT_WIDTH * KEY_COUNT as u32, OUTPUT_HEIGHT)
}

/// Generate the ten key images for a request.
///
/// Background strip `i` always pairs with key `i`. Any failure aborts the
/// whole run.
pub fn generate_theme(request: &ThemeRequest) -> Result<ThemeSet, ThemeError> {
    let slices = slice_background(&request.background, request.axis)?;

    let overlays = match &request.overlay {
        OverlaySource::Single {
            image,
            scale_percent,
        } => {
            let axis = detect_overlay_axis(image);
            slice_overlay_grid(image, axis, *scale_percent)?
        }
        OverlaySource::Discrete(map) => {
            for (key, image) in map {
                if image.dimensions() != (OUTPUT_WIDTH, OUTPUT_HEIGHT) {
                    log::debug!(
                        "overlay for key {} is {}x{}, centering without resize",
                        key,
                        image.width(),
                        image.height()
                    );
                }
            }
            OverlaySections::from_map(map.clone())?
        }
    };

    let mut images = Vec::with_capacity(KEY_COUNT);
    for (key, slice) in Key::ALL.iter().copied().zip(slices.iter()) {
        let resized = cover_fit(slice, OUTPUT_WIDTH, OUTPUT_HEIGHT)?;
        let image = composite_centered(&resized, &overlays[key], OUTPUT_WIDTH, OUTPUT_HEIGHT);
        images.push(GeneratedImage {
            key,
            filename: key.filename(),
            image,
        });
    }

    log::debug!("generated {} key images", images.len());
    Ok(ThemeSet { images })
}
