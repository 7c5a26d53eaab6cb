//! Cross-reference of invoice records against the duty table.
//!
//! A record's item name must appear in the duty table and the record's
//! own HS code must be well formed.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::grid::{format_number, Cell, RawGrid};
use crate::header::locate_aux_header;
use crate::identifier::MISSING_KEY;
use crate::model::Record;
use crate::schema::{CanonicalField, HeaderMap};

static CODE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4,10}(\.\d{1,10})?|\d+-\d+)$").expect("static code pattern")
});

// ---------------------------------------------------------------------------
// Duty table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DutyRow {
    /// 1-based spreadsheet row.
    pub row: usize,
    pub item_name: String,
    pub code: Option<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DutyTable {
    rows: Vec<DutyRow>,
}

impl DutyTable {
    pub fn new(rows: Vec<DutyRow>) -> Self {
        Self { rows }
    }

    /// Rows below the first header naming both the item name and the HS
    /// code. A grid with no such header yields an empty table.
    pub fn from_grid(grid: &RawGrid) -> Self {
        let Some(header_row) = locate_aux_header(grid) else {
            return Self::default();
        };
        let header = HeaderMap::from_header_row(grid.row(header_row).unwrap_or_default());
        let (Some(name_col), Some(code_col)) = (
            header.position(CanonicalField::ItemName),
            header.position(CanonicalField::AuxCode),
        ) else {
            return Self::default();
        };

        let rows = grid
            .rows()
            .iter()
            .enumerate()
            .skip(header_row + 1)
            .filter_map(|(index, row)| {
                let name = row.get(name_col).filter(|c| !c.is_blank())?;
                Some(DutyRow {
                    row: index + 1,
                    item_name: name.display(),
                    code: row.get(code_col).filter(|c| !c.is_blank()).cloned(),
                })
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[DutyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row whose item name contains `item_name`, case-insensitively
    /// and taken literally.
    pub fn find_item(&self, item_name: &str) -> Option<&DutyRow> {
        let needle = item_name.trim();
        match RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => self.rows.iter().find(|r| re.is_match(&r.item_name)),
            Err(_) => {
                let needle = needle.to_lowercase();
                self.rows
                    .iter()
                    .find(|r| r.item_name.to_lowercase().contains(&needle))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Canonical string form of an HS code cell; missing codes read as `N/A`.
pub fn canonical_code(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Cell::Empty) => MISSING_KEY.to_string(),
        Some(Cell::Number(n)) => format_number(*n),
        Some(Cell::Text(s)) if s.trim().is_empty() => MISSING_KEY.to_string(),
        Some(Cell::Text(s)) => s.trim().to_string(),
    }
}

/// 4–10 digits with an optional 1–10 digit fraction, or `digits-digits`.
pub fn is_valid_code(code: &str) -> bool {
    CODE_SHAPE.is_match(code)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum CrossRefOutcome {
    Valid { duty_row: usize },
    MissingItemName,
    NoMatchingDutyRow { item_name: String },
    InvalidCode { code: String },
}

pub fn cross_reference(record: &Record, table: &DutyTable) -> CrossRefOutcome {
    let Some(item_name) = record.get(CanonicalField::ItemName).map(Cell::display) else {
        return CrossRefOutcome::MissingItemName;
    };
    let Some(duty_row) = table.find_item(&item_name) else {
        return CrossRefOutcome::NoMatchingDutyRow { item_name };
    };
    let code = canonical_code(record.get(CanonicalField::AuxCode));
    if is_valid_code(&code) {
        CrossRefOutcome::Valid { duty_row: duty_row.row }
    } else {
        CrossRefOutcome::InvalidCode { code }
    }
}
