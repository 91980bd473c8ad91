//! Keypad Theme Generation Core
//!
//! Turns one background photo and one overlay of digit glyphs into the ten
//! key images (`0`–`9`) of a telephony keypad theme, each 305x287 pixels.
//!
//! # Pipeline
//!
//! 1. **Background slicing**: the background is cut into ten strips along
//!    the chosen [`SplitAxis`]; strip `i` belongs to key `i`.
//! 2. **Cover fit**: each strip is scaled to cover the output size and the
//!    overflow is cropped evenly from both sides.
//! 3. **Overlay sections**: a combined overlay is scaled, the 3x4 keypad grid
//!    is centered on it and each key's cell is cut out; alternatively ten
//!    discrete overlays are used as-is.
//! 4. **Compositing**: each overlay section is centered over its fitted
//!    strip with alpha-over blending.
//!
//! # Example
//!
//! ```no_run
//! use keytheme_core::{generate_theme, transparent_background, OverlaySource, RasterImage,
//!     SplitAxis, ThemeRequest};
//!
//! let overlay = RasterImage::new(915, 1148);
//! let request = ThemeRequest::new(
//!     transparent_background(),
//!     OverlaySource::Single { image: overlay, scale_percent: 100 },
//!     SplitAxis::Horizontal,
//! );
//!
//! let theme = generate_theme(&request).unwrap();
//! for key_image in theme.images() {
//!     println!("{} -> {}", key_image.key, key_image.filename);
//! }
//! ```
//!
//! The pipeline is synchronous and deterministic: the same inputs always
//! produce the same pixels, and [`png`] encodes them to the same bytes.

pub mod color;
pub mod composite;
pub mod error;
pub mod fit;
pub mod generate;
pub mod geometry;
pub mod layout;
pub mod overlay;
pub mod png;
pub mod raster;
pub mod slice;

// Re-export main types for convenience
pub use crate::color::Color;
pub use crate::composite::composite_centered;
pub use crate::error::ThemeError;
pub use crate::fit::cover_fit;
pub use crate::generate::{
    generate_theme, transparent_background, GeneratedImage, OverlaySource, ThemeRequest,
    ThemeSet, DEFAULT_SCALE_PERCENT,
};
pub use crate::geometry::Rect;
pub use crate::layout::{
    grid_extent, resolve_overlay_filename, GridCell, Key, OverlayChecklist, KEY_COUNT,
    OUTPUT_HEIGHT, OUTPUT_WIDTH, OVERLAY_FILENAMES,
};
pub use crate::overlay::{
    detect_overlay_axis, slice_overlay_grid, GridPlacement, OverlaySections, MAX_SCALED_PIXELS,
    MAX_SCALE_PERCENT,
};
pub use crate::png::{PngConfig, PngError};
pub use crate::raster::RasterImage;
pub use crate::slice::{slice_background, SplitAxis};
