//! Packaging generated key images for download.
//!
//! `zip` and `passthm` archives have identical contents; only the file
//! extension differs. `dir` writes the PNGs into a plain directory.

use std::fmt;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use keytheme_core::{Key, PngConfig, ThemeSet};
use serde::Serialize;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Archive base name used when the caller gives none.
pub const DEFAULT_ARCHIVE_NAME: &str = "TelephonyUI-8";

/// How the generated images are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Zip,
    Passthm,
    Dir,
}

impl ExportFormat {
    /// File extension for archive formats.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ExportFormat::Zip => Some("zip"),
            ExportFormat::Passthm => Some("passthm"),
            ExportFormat::Dir => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Zip => "zip",
            ExportFormat::Passthm => "passthm",
            ExportFormat::Dir => "dir",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zip" => Ok(ExportFormat::Zip),
            "passthm" => Ok(ExportFormat::Passthm),
            "dir" => Ok(ExportFormat::Dir),
            other => Err(format!(
                "unknown export format '{}', expected zip, passthm or dir",
                other
            )),
        }
    }
}

/// One key image encoded as PNG.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub key: Key,
    pub filename: &'static str,
    pub png: Vec<u8>,
    pub hash: String,
    pub width: u32,
    pub height: u32,
}

/// Encode every image of a theme, in key order.
pub fn encode_theme(theme: &ThemeSet, config: &PngConfig) -> Result<Vec<EncodedImage>> {
    theme
        .images()
        .iter()
        .map(|generated| {
            let (png, hash) = generated
                .encode_png(config)
                .with_context(|| format!("Failed to encode {}", generated.filename))?;
            Ok(EncodedImage {
                key: generated.key,
                filename: generated.filename,
                png,
                hash,
                width: generated.image.width(),
                height: generated.image.height(),
            })
        })
        .collect()
}

/// Trimmed caller-supplied name, or [`DEFAULT_ARCHIVE_NAME`] when blank.
///
/// Names must stay inside the output directory: path separators and the
/// `.`/`..` components are rejected.
pub fn archive_base_name(name: Option<&str>) -> Result<String> {
    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => return Ok(DEFAULT_ARCHIVE_NAME.to_string()),
    };

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        anyhow::bail!(
            "Invalid package name '{}': must be a plain file name without path separators",
            name
        );
    }
    Ok(name.to_string())
}

/// Final output path for a package.
pub fn package_path(out_dir: &Path, name: Option<&str>, format: ExportFormat) -> Result<PathBuf> {
    let base = archive_base_name(name)?;
    Ok(match format.extension() {
        Some(ext) => out_dir.join(format!("{}.{}", base, ext)),
        None => out_dir.join(base),
    })
}

/// Write all images into a zip archive on `writer`.
pub fn write_zip<W: Write + Seek>(writer: W, images: &[EncodedImage]) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for image in images {
        zip.start_file(image.filename, options)
            .with_context(|| format!("Failed to start archive entry {}", image.filename))?;
        zip.write_all(&image.png)
            .with_context(|| format!("Failed to write archive entry {}", image.filename))?;
    }

    zip.finish().context("Failed to finalize archive")
}

/// Write the package in the requested format and return its path.
pub fn write_package(
    images: &[EncodedImage],
    out_dir: &Path,
    name: Option<&str>,
    format: ExportFormat,
) -> Result<PathBuf> {
    let path = package_path(out_dir, name, format)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    match format {
        ExportFormat::Zip | ExportFormat::Passthm => {
            // Staged beside the target, renamed into place once complete.
            let mut staged = NamedTempFile::new_in(out_dir).with_context(|| {
                format!("Failed to create temporary file in {}", out_dir.display())
            })?;
            write_zip(staged.as_file_mut(), images)?;
            staged
                .persist(&path)
                .with_context(|| format!("Failed to create archive: {}", path.display()))?;
        }
        ExportFormat::Dir => {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            for image in images {
                let target = path.join(image.filename);
                fs::write(&target, &image.png)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
            }
        }
    }

    log::info!("wrote {} package to {}", format, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keytheme_core::{
        generate_theme, transparent_background, OverlaySource, RasterImage, SplitAxis,
        ThemeRequest, OUTPUT_HEIGHT, OUTPUT_WIDTH,
    };
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;

    fn encoded_theme() -> Vec<EncodedImage> {
        let overlays = Key::ALL
            .iter()
            .map(|k| (*k, RasterImage::new(OUTPUT_WIDTH, OUTPUT_HEIGHT)))
            .collect();
        let request = ThemeRequest::new(
            transparent_background(),
            OverlaySource::Discrete(overlays),
            SplitAxis::Horizontal,
        );
        let theme = generate_theme(&request).unwrap();
        encode_theme(&theme, &PngConfig::fast()).unwrap()
    }

    fn entry_names<R: Read + Seek>(reader: R) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(reader).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn blank_names_fall_back_to_default() {
        assert_eq!(archive_base_name(None).unwrap(), "TelephonyUI-8");
        assert_eq!(archive_base_name(Some("   ")).unwrap(), "TelephonyUI-8");
        assert_eq!(archive_base_name(Some("  Beach ")).unwrap(), "Beach");
        assert_eq!(archive_base_name(Some("Beach..v2")).unwrap(), "Beach..v2");
    }

    #[test]
    fn names_escaping_the_output_dir_are_rejected() {
        for bad in ["../x", "a/b", "..", ".", "a\\b", "/abs"] {
            assert!(archive_base_name(Some(bad)).is_err(), "{}", bad);
        }

        let images = encoded_theme();
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        assert!(write_package(&images, &out, Some("../escape"), ExportFormat::Zip).is_err());
        assert!(!tmp.path().join("escape.zip").exists());
        assert!(!out.exists());
    }

    #[test]
    fn failed_archive_write_leaves_no_partial_file() {
        let images = encoded_theme();
        let tmp = TempDir::new().unwrap();
        // A directory squatting on the archive name makes the final rename fail.
        fs::create_dir(tmp.path().join("Blocked.zip")).unwrap();

        assert!(write_package(&images, tmp.path(), Some("Blocked"), ExportFormat::Zip).is_err());
        let entries: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["Blocked.zip".to_string()]);
    }

    #[test]
    fn successful_archive_write_leaves_only_the_archive() {
        let images = encoded_theme();
        let tmp = TempDir::new().unwrap();
        write_package(&images, tmp.path(), Some("Clean"), ExportFormat::Passthm).unwrap();
        let entries: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["Clean.passthm".to_string()]);
    }

    #[test]
    fn package_paths_per_format() {
        let out = Path::new("out");
        assert_eq!(
            package_path(out, None, ExportFormat::Zip).unwrap(),
            out.join("TelephonyUI-8.zip")
        );
        assert_eq!(
            package_path(out, Some("Beach"), ExportFormat::Passthm).unwrap(),
            out.join("Beach.passthm")
        );
        assert_eq!(
            package_path(out, Some("Beach"), ExportFormat::Dir).unwrap(),
            out.join("Beach")
        );
    }

    #[test]
    fn format_parsing() {
        assert_eq!("passthm".parse::<ExportFormat>(), Ok(ExportFormat::Passthm));
        assert!("tar".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn zip_contains_canonical_names() {
        let images = encoded_theme();
        let cursor = write_zip(Cursor::new(Vec::new()), &images).unwrap();
        let bytes = cursor.into_inner();

        let mut expected: Vec<String> = keytheme_core::OVERLAY_FILENAMES
            .iter()
            .map(|s| s.to_string())
            .collect();
        expected.sort();
        assert_eq!(entry_names(Cursor::new(bytes)), expected);
    }

    #[test]
    fn zip_and_passthm_have_identical_contents() {
        let images = encoded_theme();
        let tmp = TempDir::new().unwrap();

        let zip_path = write_package(&images, tmp.path(), None, ExportFormat::Zip).unwrap();
        let thm_path = write_package(&images, tmp.path(), None, ExportFormat::Passthm).unwrap();
        assert_eq!(zip_path.extension().unwrap(), "zip");
        assert_eq!(thm_path.extension().unwrap(), "passthm");

        let mut a = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut b = zip::ZipArchive::new(File::open(&thm_path).unwrap()).unwrap();
        for image in &images {
            let mut left = Vec::new();
            let mut right = Vec::new();
            a.by_name(image.filename).unwrap().read_to_end(&mut left).unwrap();
            b.by_name(image.filename).unwrap().read_to_end(&mut right).unwrap();
            assert_eq!(left, image.png);
            assert_eq!(right, image.png);
        }
    }

    #[test]
    fn dir_export_writes_pngs() {
        let images = encoded_theme();
        let tmp = TempDir::new().unwrap();
        let path = write_package(&images, tmp.path(), Some("Plain"), ExportFormat::Dir).unwrap();
        for image in &images {
            let bytes = fs::read(path.join(image.filename)).unwrap();
            let decoded = crate::input::decode_raster(&bytes).unwrap();
            assert_eq!(decoded.dimensions(), (OUTPUT_WIDTH, OUTPUT_HEIGHT));
        }
    }
}
