//! CLI command implementations

pub mod checklist;
pub mod generate;
pub mod json_output;
pub mod layout;
