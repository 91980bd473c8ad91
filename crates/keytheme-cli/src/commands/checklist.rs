//! Checklist command implementation
//!
//! Shows which keys a directory of per-key overlays covers, without
//! decoding any image.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use keytheme_core::{Key, OverlayChecklist};

use super::json_output::{error_codes, ChecklistEntry, ChecklistOutput, JsonError};
use crate::input::scan_overlay_dir;

/// Run the checklist command
///
/// # Returns
/// Exit code: 0 when all ten keys are covered, 1 otherwise
pub fn run(dir: &str, json_output: bool) -> Result<ExitCode> {
    let dir = Path::new(dir);
    if json_output {
        let output = match scan_overlay_dir(dir) {
            Ok((checklist, _)) => checklist_output(&checklist),
            Err(e) => ChecklistOutput {
                complete: false,
                entries: Vec::new(),
                unmatched: Vec::new(),
                errors: vec![JsonError::from_anyhow(&e, error_codes::INPUT_READ)],
            },
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(exit_code(output.complete));
    }

    let (checklist, _) = scan_overlay_dir(dir)?;

    println!("{} {}", "Overlays in".cyan().bold(), dir.display());
    for key in Key::ALL {
        let label = key.checklist_label();
        match checklist.source_for(key) {
            Some(source) => println!("  {} {:<12} {}", "✓".green(), label, source.dimmed()),
            None => println!("  {} {}", "✗".red(), label),
        }
    }

    for name in checklist.unmatched() {
        println!("  {} unmatched: {}", "!".yellow(), name);
    }

    if checklist.is_complete() {
        println!("\n{}", "All 10 keys covered".green().bold());
    } else {
        let missing: Vec<String> = checklist.missing().iter().map(|k| k.to_string()).collect();
        println!(
            "\n{} {}",
            "Missing keys:".red().bold(),
            missing.join(", ")
        );
    }

    Ok(exit_code(checklist.is_complete()))
}

/// JSON view of a checklist, in canonical key order.
pub fn checklist_output(checklist: &OverlayChecklist) -> ChecklistOutput {
    ChecklistOutput {
        complete: checklist.is_complete(),
        entries: Key::ALL
            .iter()
            .map(|&key| ChecklistEntry {
                key,
                label: key.checklist_label(),
                source: checklist.source_for(key).map(str::to_string),
            })
            .collect(),
        unmatched: checklist.unmatched().to_vec(),
        errors: Vec::new(),
    }
}

fn exit_code(complete: bool) -> ExitCode {
    if complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
