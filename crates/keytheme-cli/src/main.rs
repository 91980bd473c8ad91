//! Keytheme CLI - builds ten-key keypad theme images
//!
//! This binary provides commands for generating keypad themes, checking
//! per-key overlay directories, and inspecting the grid layout.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use keytheme_cli::commands;
use keytheme_cli::commands::generate::{BackgroundInput, GenerateOptions, OverlayInput};
use keytheme_cli::input::image_dimensions;
use keytheme_cli::package::ExportFormat;
use keytheme_core::{grid_extent, SplitAxis, DEFAULT_SCALE_PERCENT, MAX_SCALE_PERCENT};

/// Keytheme - Keypad Theme Generator
#[derive(Parser)]
#[command(name = "keytheme")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the ten key images and package them
    #[command(group(ArgGroup::new("overlay_source").required(true).args(["overlay", "overlays_dir"])))]
    Generate {
        /// Background image (PNG or JPEG)
        #[arg(short, long, required_unless_present = "transparent_background")]
        background: Option<String>,

        /// Use a fully transparent background instead of an image
        #[arg(long, conflicts_with = "background")]
        transparent_background: bool,

        /// Combined keypad-grid overlay image
        #[arg(short, long)]
        overlay: Option<String>,

        /// Directory of per-key overlay PNGs
        #[arg(long)]
        overlays_dir: Option<String>,

        /// Background split direction
        #[arg(long, default_value = "horizontal", value_parser = ["horizontal", "vertical"])]
        axis: String,

        /// Overlay scale in percent, 1 to 1000 (combined overlay only)
        #[arg(long, default_value_t = DEFAULT_SCALE_PERCENT, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE_PERCENT as i64))]
        scale: u32,

        /// Output directory (default: current directory)
        #[arg(short = 'd', long)]
        out_dir: Option<String>,

        /// Archive or directory base name (default: TelephonyUI-8)
        #[arg(short, long)]
        name: Option<String>,

        /// Package format
        #[arg(long, default_value = "zip", value_parser = ["zip", "passthm", "dir"])]
        format: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show which keys a directory of per-key overlays covers
    Checklist {
        /// Directory of per-key overlay PNGs
        #[arg(short, long)]
        dir: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the per-key source rectangles of a combined overlay
    Layout {
        /// Read the overlay size from this image
        #[arg(short, long, conflicts_with_all = ["width", "height"])]
        overlay: Option<String>,

        /// Overlay width (default: exact grid width)
        #[arg(long)]
        width: Option<u32>,

        /// Overlay height (default: exact grid height)
        #[arg(long)]
        height: Option<u32>,

        /// Overlay scale in percent
        #[arg(long, default_value_t = DEFAULT_SCALE_PERCENT, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE_PERCENT as i64))]
        scale: u32,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            background,
            transparent_background,
            overlay,
            overlays_dir,
            axis,
            scale,
            out_dir,
            name,
            format,
            json,
        } => generate_options(
            background,
            transparent_background,
            overlay,
            overlays_dir,
            &axis,
            scale,
            out_dir,
            name,
            &format,
        )
        .and_then(|options| commands::generate::run(&options, json)),
        Commands::Checklist { dir, json } => commands::checklist::run(&dir, json),
        Commands::Layout {
            overlay,
            width,
            height,
            scale,
            json,
        } => layout_size(overlay.as_deref(), width, height)
            .and_then(|(w, h)| commands::layout::run(w, h, scale, json)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_options(
    background: Option<String>,
    transparent_background: bool,
    overlay: Option<String>,
    overlays_dir: Option<String>,
    axis: &str,
    scale: u32,
    out_dir: Option<String>,
    name: Option<String>,
    format: &str,
) -> anyhow::Result<GenerateOptions> {
    let background = match (background, transparent_background) {
        (_, true) => BackgroundInput::Transparent,
        (Some(path), false) => BackgroundInput::File(PathBuf::from(path)),
        (None, false) => anyhow::bail!("a background image or --transparent-background is required"),
    };

    let overlay = match (overlay, overlays_dir) {
        (Some(path), None) => OverlayInput::Combined {
            path: PathBuf::from(path),
            scale_percent: scale,
        },
        (None, Some(dir)) => OverlayInput::Directory(PathBuf::from(dir)),
        _ => anyhow::bail!("exactly one of --overlay or --overlays-dir is required"),
    };

    let axis: SplitAxis = axis.parse().map_err(anyhow::Error::msg)?;
    let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;

    Ok(GenerateOptions {
        background,
        overlay,
        axis,
        out_dir: commands::generate::resolve_out_dir(out_dir.as_deref()),
        name,
        format,
    })
}

fn layout_size(
    overlay: Option<&str>,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<(u32, u32)> {
    if let Some(path) = overlay {
        return image_dimensions(PathBuf::from(path).as_path());
    }
    let (grid_w, grid_h) = grid_extent();
    Ok((width.unwrap_or(grid_w), height.unwrap_or(grid_h)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate_with_defaults() {
        let cli = Cli::try_parse_from([
            "keytheme",
            "generate",
            "--background",
            "bg.jpg",
            "--overlay",
            "grid.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                background,
                transparent_background,
                overlay,
                overlays_dir,
                axis,
                scale,
                out_dir,
                name,
                format,
                json,
            } => {
                assert_eq!(background.as_deref(), Some("bg.jpg"));
                assert!(!transparent_background);
                assert_eq!(overlay.as_deref(), Some("grid.png"));
                assert!(overlays_dir.is_none());
                assert_eq!(axis, "horizontal");
                assert_eq!(scale, 100);
                assert!(out_dir.is_none());
                assert!(name.is_none());
                assert_eq!(format, "zip");
                assert!(!json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_generate_with_overlay_dir() {
        let cli = Cli::try_parse_from([
            "keytheme",
            "generate",
            "--transparent-background",
            "--overlays-dir",
            "keys",
            "--axis",
            "vertical",
            "--format",
            "passthm",
            "--name",
            "Beach",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                transparent_background,
                overlays_dir,
                axis,
                format,
                name,
                json,
                ..
            } => {
                assert!(transparent_background);
                assert_eq!(overlays_dir.as_deref(), Some("keys"));
                assert_eq!(axis, "vertical");
                assert_eq!(format, "passthm");
                assert_eq!(name.as_deref(), Some("Beach"));
                assert!(json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_requires_one_overlay_source() {
        assert!(Cli::try_parse_from(["keytheme", "generate", "--background", "bg.png"]).is_err());
        assert!(Cli::try_parse_from([
            "keytheme",
            "generate",
            "--background",
            "bg.png",
            "--overlay",
            "a.png",
            "--overlays-dir",
            "keys",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_requires_background_or_transparent() {
        assert!(Cli::try_parse_from(["keytheme", "generate", "--overlay", "a.png"]).is_err());
        assert!(Cli::try_parse_from([
            "keytheme",
            "generate",
            "--background",
            "bg.png",
            "--transparent-background",
            "--overlay",
            "a.png",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_rejects_zero_scale() {
        assert!(Cli::try_parse_from([
            "keytheme",
            "generate",
            "--transparent-background",
            "--overlay",
            "a.png",
            "--scale",
            "0",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_rejects_scale_above_maximum() {
        assert!(Cli::try_parse_from([
            "keytheme",
            "generate",
            "--transparent-background",
            "--overlay",
            "a.png",
            "--scale",
            "1001",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["keytheme", "layout", "--scale", "4294967295"]).is_err());
        assert!(Cli::try_parse_from(["keytheme", "layout", "--scale", "1000"]).is_ok());
    }

    #[test]
    fn test_cli_parses_checklist() {
        let cli = Cli::try_parse_from(["keytheme", "checklist", "--dir", "keys", "--json"]).unwrap();
        match cli.command {
            Commands::Checklist { dir, json } => {
                assert_eq!(dir, "keys");
                assert!(json);
            }
            _ => panic!("expected checklist command"),
        }
    }

    #[test]
    fn test_cli_parses_verbose_anywhere() {
        let cli = Cli::try_parse_from(["keytheme", "layout", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_generate_options_mapping() {
        let options = generate_options(
            None,
            true,
            None,
            Some("keys".into()),
            "vertical",
            100,
            None,
            None,
            "dir",
        )
        .unwrap();
        assert!(matches!(options.background, BackgroundInput::Transparent));
        assert!(matches!(options.overlay, OverlayInput::Directory(_)));
        assert_eq!(options.axis, SplitAxis::Vertical);
        assert_eq!(options.format, ExportFormat::Dir);
        assert_eq!(options.out_dir, PathBuf::from("."));
    }

    #[test]
    fn test_layout_size_defaults_to_grid() {
        assert_eq!(layout_size(None, None, None).unwrap(), (915, 1148));
        assert_eq!(layout_size(None, Some(900), None).unwrap(), (900, 1148));
    }
}
