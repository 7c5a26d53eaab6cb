//! Header row detection.
//!
//! Shipment sheets carry a title block above the column headers, so the
//! header row is found by content: the first row in a short leading window
//! whose joined text mentions enough of the required column concepts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::grid::{Cell, RawGrid};
use crate::schema::{CanonicalField, HeaderMap};

pub const DEFAULT_WINDOW: usize = 5;
pub const DEFAULT_QUORUM: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    Item,
    Model,
    Part,
    Quantity,
}

impl Concept {
    pub const ALL: [Concept; 4] = [Self::Item, Self::Model, Self::Part, Self::Quantity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Model => "model",
            Self::Part => "part",
            Self::Quantity => "quantity",
        }
    }
}

static CONCEPTS: Lazy<Vec<(Concept, Regex)>> = Lazy::new(|| {
    [
        (Concept::Item, r"\bitem\b.*\bno"),
        (Concept::Model, r"\bmodel\b.*\bno"),
        (Concept::Part, r"\b(p/n|part\s*no)\b"),
        (Concept::Quantity, r"\bquantity\b.*\b(pcs|pc)\b"),
    ]
    .into_iter()
    .map(|(concept, pattern)| {
        let re = Regex::new(pattern).expect("static header pattern");
        (concept, re)
    })
    .collect()
});

/// Lowercased row text: cells trimmed, line breaks flattened, joined with
/// single spaces.
pub fn row_text(row: &[Cell]) -> String {
    row.iter()
        .map(|c| c.display().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Concepts mentioned by a row, in concept order.
pub fn concepts_in(row: &[Cell]) -> Vec<Concept> {
    let text = row_text(row);
    CONCEPTS
        .iter()
        .filter(|(_, re)| re.is_match(&text))
        .map(|(concept, _)| *concept)
        .collect()
}

/// First row within `window` rows that mentions at least `quorum` concepts.
pub fn locate_header(grid: &RawGrid, window: usize, quorum: usize) -> Option<usize> {
    grid.rows()
        .iter()
        .take(window)
        .position(|row| concepts_in(row).len() >= quorum)
}

/// Header of an auxiliary (duty) table: the first row anywhere in the grid
/// whose labels resolve to both `ItemName` and `AuxCode`.
pub fn locate_aux_header(grid: &RawGrid) -> Option<usize> {
    grid.rows().iter().position(|row| {
        let map = HeaderMap::from_header_row(row);
        map.contains(CanonicalField::ItemName) && map.contains(CanonicalField::AuxCode)
    })
}
