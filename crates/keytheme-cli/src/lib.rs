//! Keypad theme CLI library.
//!
//! This crate provides everything around the core pipeline: decoding input
//! files, resolving per-key overlay files, packaging outputs, and the
//! command implementations behind the `keytheme` binary.

pub mod commands;
pub mod input;
pub mod package;
