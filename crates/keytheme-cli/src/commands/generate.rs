//! Generate command implementation
//!
//! Loads the background and overlays, runs the theme pipeline, and writes
//! the ten key images as an archive or directory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use keytheme_core::{
    generate_theme, transparent_background, Key, OverlaySource, PngConfig, SplitAxis,
    ThemeRequest,
};

use super::json_output::{error_codes, GenerateOutput, JsonError, KeyOutput};
use crate::input::{load_discrete_overlays, load_raster};
use crate::package::{archive_base_name, encode_theme, write_package, EncodedImage, ExportFormat};

/// Where the background comes from.
#[derive(Debug, Clone)]
pub enum BackgroundInput {
    File(PathBuf),
    Transparent,
}

/// Where the overlays come from.
#[derive(Debug, Clone)]
pub enum OverlayInput {
    /// A combined keypad-grid image.
    Combined { path: PathBuf, scale_percent: u32 },
    /// A directory of per-key PNGs.
    Directory(PathBuf),
}

impl OverlayInput {
    fn mode(&self) -> &'static str {
        match self {
            OverlayInput::Combined { .. } => "single",
            OverlayInput::Directory(_) => "multiple",
        }
    }
}

/// Options for one generate run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub background: BackgroundInput,
    pub overlay: OverlayInput,
    pub axis: SplitAxis,
    pub out_dir: PathBuf,
    pub name: Option<String>,
    pub format: ExportFormat,
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct GenerateOutcome {
    pub package: PathBuf,
    pub images: Vec<EncodedImage>,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(options: &GenerateOptions, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(options)
    } else {
        run_human(options)
    }
}

/// Run generate with human-readable (colored) output
fn run_human(options: &GenerateOptions) -> Result<ExitCode> {
    println!("{}", "Generating keypad theme:".cyan().bold());
    match &options.background {
        BackgroundInput::File(path) => println!("  {} {}", "Background:".dimmed(), path.display()),
        BackgroundInput::Transparent => println!("  {} transparent", "Background:".dimmed()),
    }
    match &options.overlay {
        OverlayInput::Combined {
            path,
            scale_percent,
        } => println!(
            "  {} {} ({}%)",
            "Overlay:".dimmed(),
            path.display(),
            scale_percent
        ),
        OverlayInput::Directory(dir) => {
            println!("  {} {} (per key)", "Overlays:".dimmed(), dir.display())
        }
    }
    println!("  {} {}", "Split:".dimmed(), options.axis);

    let outcome = execute(options)?;

    println!("\n{}", "Key images:".cyan().bold());
    for key in Key::DISPLAY_ORDER {
        let image = &outcome.images[key.index()];
        println!(
            "  {} {} {}",
            format!("[{}]", key).as_str().bold(),
            image.filename,
            image.hash[..16].dimmed()
        );
    }

    println!(
        "\n{} {}",
        "Wrote".green().bold(),
        outcome.package.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run generate with machine-readable JSON output
fn run_json(options: &GenerateOptions) -> Result<ExitCode> {
    let result = match build_request(options) {
        Ok(request) => render(options, &request)
            .map_err(|e| JsonError::from_anyhow(&e, error_codes::PACKAGE_WRITE)),
        Err(e) => Err(JsonError::from_anyhow(&e, error_codes::INPUT_READ)),
    };

    let (output, code) = match result {
        Ok(outcome) => (
            GenerateOutput {
                success: true,
                axis: Some(options.axis),
                overlay_mode: Some(options.overlay.mode().to_string()),
                package: Some(outcome.package.display().to_string()),
                keys: outcome.images.iter().map(KeyOutput::from).collect(),
                errors: Vec::new(),
            },
            ExitCode::SUCCESS,
        ),
        Err(error) => (GenerateOutput::failure(vec![error]), ExitCode::from(1)),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

/// Load inputs, generate, encode and package.
pub fn execute(options: &GenerateOptions) -> Result<GenerateOutcome> {
    archive_base_name(options.name.as_deref())?;
    let request = build_request(options)?;
    render(options, &request)
}

/// Generate from a prepared request, then encode and package.
fn render(options: &GenerateOptions, request: &ThemeRequest) -> Result<GenerateOutcome> {
    let theme = generate_theme(request).context("Theme generation failed")?;
    let images = encode_theme(&theme, &PngConfig::default())?;

    let package = write_package(
        &images,
        &options.out_dir,
        options.name.as_deref(),
        options.format,
    )?;

    Ok(GenerateOutcome { package, images })
}

/// Decode every input and assemble the pipeline request.
pub fn build_request(options: &GenerateOptions) -> Result<ThemeRequest> {
    let background = match &options.background {
        BackgroundInput::File(path) => load_raster(path)?,
        BackgroundInput::Transparent => transparent_background(),
    };
    log::info!(
        "background {}x{}, split {}",
        background.width(),
        background.height(),
        options.axis
    );

    let overlay = match &options.overlay {
        OverlayInput::Combined {
            path,
            scale_percent,
        } => OverlaySource::Single {
            image: load_raster(path)?,
            scale_percent: *scale_percent,
        },
        OverlayInput::Directory(dir) => {
            let loaded = load_discrete_overlays(dir)?;
            for name in loaded.checklist.unmatched() {
                log::warn!("ignored overlay without a key: {}", name);
            }
            OverlaySource::Discrete(loaded.images)
        }
    };

    Ok(ThemeRequest::new(background, overlay, options.axis))
}

/// Resolve an optional output directory, defaulting to the current one.
pub fn resolve_out_dir(out_dir: Option<&str>) -> PathBuf {
    out_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}
