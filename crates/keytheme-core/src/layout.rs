//! Fixed keypad tables: key indices, output names, and the overlay grid.
//!
//! The combined overlay image is laid out like a phone passcode pad:
//!
//! ```text
//!   1 2 3
//!   4 5 6
//!   7 8 9
//!     0
//! ```
//!
//! Each cell is one output image in size. Canonical key order (`0..=9`) and
//! display order (`1..=9, 0`) are separate tables; nothing in the pipeline
//! uses display order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of every generated key image.
pub const OUTPUT_WIDTH: u32 = 305;
/// Height of every generated key image.
pub const OUTPUT_HEIGHT: u32 = 287;

/// Number of keys on the pad.
pub const KEY_COUNT: usize = 10;

/// Columns in the logical overlay grid.
pub const GRID_COLUMNS: u32 = 3;
/// Rows in the logical overlay grid (the last row holds only `0`).
pub const GRID_ROWS: u32 = 4;

/// Output file names indexed by key.
pub const OVERLAY_FILENAMES: [&str; KEY_COUNT] = [
    "en-0---white.png",
    "en-1---white.png",
    "en-2-A B C--white.png",
    "en-3-D E F--white.png",
    "en-4-G H I--white.png",
    "en-5-J K L--white.png",
    "en-6-M N O--white.png",
    "en-7-P Q R S--white.png",
    "en-8-T U V--white.png",
    "en-9-W X Y Z--white.png",
];

/// `(column, row)` of each key's cell in the overlay grid, indexed by key.
const GRID_POSITIONS: [(u32, u32); KEY_COUNT] = [
    (1, 3),
    (0, 0),
    (1, 0),
    (2, 0),
    (0, 1),
    (1, 1),
    (2, 1),
    (0, 2),
    (1, 2),
    (2, 2),
];

/// A telephony key, `0` through `9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Key(u8);

impl Key {
    /// Every key in canonical order.
    pub const ALL: [Key; KEY_COUNT] = [
        Key(0),
        Key(1),
        Key(2),
        Key(3),
        Key(4),
        Key(5),
        Key(6),
        Key(7),
        Key(8),
        Key(9),
    ];

    /// Every key in passcode display order.
    pub const DISPLAY_ORDER: [Key; KEY_COUNT] = [
        Key(1),
        Key(2),
        Key(3),
        Key(4),
        Key(5),
        Key(6),
        Key(7),
        Key(8),
        Key(9),
        Key(0),
    ];

    /// Returns `None` outside `0..=9`.
    pub const fn new(index: u8) -> Option<Key> {
        if index <= 9 {
            Some(Key(index))
        } else {
            None
        }
    }

    /// Key for an ASCII digit character.
    pub fn from_digit(c: char) -> Option<Key> {
        c.to_digit(10).and_then(|d| Key::new(d as u8))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Canonical output file name.
    pub const fn filename(self) -> &'static str {
        OVERLAY_FILENAMES[self.0 as usize]
    }

    /// Cell of this key in the overlay grid.
    pub const fn grid_cell(self) -> GridCell {
        let (column, row) = GRID_POSITIONS[self.0 as usize];
        GridCell { column, row }
    }

    /// Short label used in overlay checklists, e.g. `"2: A B C"` or `"0:"`.
    pub fn checklist_label(self) -> String {
        let name = self.filename();
        let name = name.strip_prefix("en-").unwrap_or(name);
        let name = name.strip_suffix("--white.png").unwrap_or(name);
        name.replacen('-', ": ", 1).trim_end().to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Key {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Key::new(value).ok_or_else(|| format!("key index out of range: {}", value))
    }
}

impl From<Key> for u8 {
    fn from(key: Key) -> u8 {
        key.0
    }
}

/// Position of a key in the 3x4 overlay grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub column: u32,
    pub row: u32,
}

impl GridCell {
    /// Top-left pixel of this cell relative to the grid origin.
    pub fn origin(&self) -> (u32, u32) {
        (self.column * OUTPUT_WIDTH, self.row * OUTPUT_HEIGHT)
    }
}

/// Full pixel extent of the overlay grid.
pub const fn grid_extent() -> (u32, u32) {
    (OUTPUT_WIDTH * GRID_COLUMNS, OUTPUT_HEIGHT * GRID_ROWS)
}

/// Map an overlay file name to a key.
///
/// An exact canonical name wins; otherwise the first ASCII digit anywhere in
/// the name decides. Names without digits resolve to `None`.
pub fn resolve_overlay_filename(name: &str) -> Option<Key> {
    if let Some(index) = OVERLAY_FILENAMES.iter().position(|f| *f == name) {
        return Key::new(index as u8);
    }
    name.chars().find(|c| c.is_ascii_digit()).and_then(Key::from_digit)
}

/// Tracks which keys a batch of overlay file names covers.
#[derive(Debug, Clone, Default)]
pub struct OverlayChecklist {
    matched: BTreeMap<Key, String>,
    unmatched: Vec<String>,
}

impl OverlayChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one file name. A later name for an already-matched key
    /// replaces the earlier one.
    pub fn add(&mut self, name: &str) -> Option<Key> {
        match resolve_overlay_filename(name) {
            Some(key) => {
                if let Some(previous) = self.matched.insert(key, name.to_string()) {
                    log::debug!("overlay '{}' replaces '{}' for key {}", name, previous, key);
                }
                Some(key)
            }
            None => {
                self.unmatched.push(name.to_string());
                None
            }
        }
    }

    /// Build a checklist from a list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut checklist = Self::new();
        for name in names {
            checklist.add(name.as_ref());
        }
        checklist
    }

    /// Source name recorded for a key.
    pub fn source_for(&self, key: Key) -> Option<&str> {
        self.matched.get(&key).map(String::as_str)
    }

    /// Matched keys with their source names, in key order.
    pub fn matched(&self) -> impl Iterator<Item = (Key, &str)> {
        self.matched.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Names that resolved to no key.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Keys still lacking an overlay, in key order.
    pub fn missing(&self) -> Vec<Key> {
        Key::ALL
            .iter()
            .copied()
            .filter(|k| !self.matched.contains_key(k))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.matched.len() == KEY_COUNT
    }
}
