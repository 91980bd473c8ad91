//! Layout command implementation
//!
//! Prints where each key's section is cut from a combined overlay of a
//! given size and scale.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use keytheme_core::{GridPlacement, Key, OUTPUT_HEIGHT, OUTPUT_WIDTH};
use serde::Serialize;

/// Source rectangle of one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRegion {
    pub key: Key,
    pub column: u32,
    pub row: u32,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Full layout report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOutput {
    pub overlay_width: u32,
    pub overlay_height: u32,
    pub scale_percent: u32,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
    pub regions: Vec<KeyRegion>,
}

/// Compute the per-key regions for an overlay size and scale.
pub fn compute(width: u32, height: u32, scale_percent: u32) -> Result<LayoutOutput> {
    let placement = GridPlacement::compute(width, height, scale_percent)?;
    let regions = Key::ALL
        .iter()
        .map(|&key| {
            let cell = key.grid_cell();
            let rect = placement.source_rect(key);
            KeyRegion {
                key,
                column: cell.column,
                row: cell.row,
                x: rect.x as i64,
                y: rect.y as i64,
                width: OUTPUT_WIDTH,
                height: OUTPUT_HEIGHT,
            }
        })
        .collect();

    Ok(LayoutOutput {
        overlay_width: width,
        overlay_height: height,
        scale_percent,
        scaled_width: placement.scaled_width,
        scaled_height: placement.scaled_height,
        offset_x: placement.offset_x,
        offset_y: placement.offset_y,
        regions,
    })
}

/// Run the layout command
pub fn run(width: u32, height: u32, scale_percent: u32, json_output: bool) -> Result<ExitCode> {
    let layout = compute(width, height, scale_percent)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}x{} at {}% -> {}x{}, grid offset ({}, {})",
        "Overlay".cyan().bold(),
        layout.overlay_width,
        layout.overlay_height,
        layout.scale_percent,
        layout.scaled_width,
        layout.scaled_height,
        layout.offset_x,
        layout.offset_y
    );
    for key in Key::DISPLAY_ORDER {
        let region = &layout.regions[key.index()];
        println!(
            "  {} col {} row {}  ({}, {})-({}, {})",
            format!("[{}]", key).as_str().bold(),
            region.column,
            region.row,
            region.x,
            region.y,
            region.x + region.width as i64,
            region.y + region.height as i64
        );
    }

    Ok(ExitCode::SUCCESS)
}
