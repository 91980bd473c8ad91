//! Input loading: decoding image files into rasters and collecting
//! discrete overlay sets from a directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keytheme_core::{Key, OverlayChecklist, RasterImage, OVERLAY_FILENAMES};

/// Decode an image file of any supported format (PNG, JPEG) into RGBA.
pub fn load_raster(path: &Path) -> Result<RasterImage> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    decode_raster(&bytes).with_context(|| format!("Failed to decode image: {}", path.display()))
}

/// Decode in-memory image bytes, detecting the format from the content.
pub fn decode_raster(bytes: &[u8]) -> Result<RasterImage> {
    let decoded = image::load_from_memory(bytes).context("Unrecognized or corrupt image data")?;
    let raster = RasterImage::from(decoded.to_rgba8());
    log::debug!("decoded {}x{} image", raster.width(), raster.height());
    Ok(raster)
}

/// Pixel dimensions of an image file, read from its header only.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path)
        .with_context(|| format!("Failed to read image header: {}", path.display()))
}

/// True for file names with a `.png` extension (any case).
pub fn is_png_name(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// PNG files directly inside `dir`, sorted by file name.
pub fn list_overlay_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read overlay directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_png_name(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Overlays resolved from a directory, with the checklist that produced them.
#[derive(Debug)]
pub struct DiscreteOverlays {
    pub images: BTreeMap<Key, RasterImage>,
    pub checklist: OverlayChecklist,
}

/// Build a checklist from the PNG file names in `dir` without decoding.
pub fn scan_overlay_dir(dir: &Path) -> Result<(OverlayChecklist, Vec<PathBuf>)> {
    let files = list_overlay_files(dir)?;
    if files.is_empty() {
        anyhow::bail!("No PNG overlay files found in {}", dir.display());
    }

    let mut checklist = OverlayChecklist::new();
    for path in &files {
        let name = file_name(path);
        if checklist.add(&name).is_none() {
            log::warn!("overlay '{}' does not name a key, skipping", name);
        }
    }

    if checklist.matched().next().is_none() {
        anyhow::bail!(
            "Could not match overlay files. Expected filenames like:\n{}\n...\n\nOr files containing digits 0-9 in the name.",
            OVERLAY_FILENAMES[..3].join("\n")
        );
    }

    Ok((checklist, files))
}

/// Decode every resolvable overlay in `dir`.
///
/// A missing key is not an error here; generation reports incomplete sets.
pub fn load_discrete_overlays(dir: &Path) -> Result<DiscreteOverlays> {
    let (checklist, files) = scan_overlay_dir(dir)?;

    let mut images = BTreeMap::new();
    for (key, name) in checklist.matched() {
        let path = files
            .iter()
            .find(|p| file_name(p) == name)
            .with_context(|| format!("Overlay file vanished: {}", name))?;
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read overlay: {}", path.display()))?;
        let image = decode_raster(&bytes)
            .with_context(|| format!("Failed to decode overlay: {}", path.display()))?;
        log::info!("key {} <- {}", key, name);
        images.insert(key, image);
    }

    Ok(DiscreteOverlays { images, checklist })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
