use std::collections::BTreeMap;

use crate::describe;
use crate::grid::{Cell, RawGrid};
use crate::header::{locate_header, DEFAULT_QUORUM, DEFAULT_WINDOW};
use crate::model::Record;
use crate::schema::{CanonicalField, ColumnLabel, HeaderMap};

// ---------------------------------------------------------------------------
// Options + outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub window: usize,
    pub quorum: usize,
    /// Run composite descriptions through the splitter.
    pub split_descriptions: bool,
    /// Keep only rows whose item number starts with a digit.
    pub numeric_item_numbers: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            quorum: DEFAULT_QUORUM,
            split_descriptions: false,
            numeric_item_numbers: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SheetRecords {
    pub sheet: String,
    /// 0-based index of the header row in the grid.
    pub header_row: usize,
    pub header: HeaderMap,
    pub records: Vec<Record>,
    /// Non-blank rows dropped by the quantity cast or the item-number filter.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub enum SheetOutcome {
    Extracted(SheetRecords),
    HeaderNotFound,
    MissingIdentifierColumn { header_row: usize },
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Locate the header by content, then extract records below it.
pub fn extract_sheet(sheet: &str, grid: &RawGrid, options: &ExtractOptions) -> SheetOutcome {
    match locate_header(grid, options.window, options.quorum) {
        Some(header_row) => extract_below(sheet, grid, header_row, options),
        None => SheetOutcome::HeaderNotFound,
    }
}

/// Extract records from the rows after `header_row`.
pub fn extract_below(
    sheet: &str,
    grid: &RawGrid,
    header_row: usize,
    options: &ExtractOptions,
) -> SheetOutcome {
    let header_cells = grid.row(header_row).unwrap_or_default();
    let width = occupied_width(grid, header_row).min(header_cells.len());
    let header = HeaderMap::from_header_row(&header_cells[..width]);

    if !header.contains(CanonicalField::Identifier) {
        return SheetOutcome::MissingIdentifierColumn { header_row };
    }

    let has_quantity = header.contains(CanonicalField::Quantity);
    let filter_items = options.numeric_item_numbers && header.contains(CanonicalField::ItemNumber);

    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, row) in grid.rows().iter().enumerate().skip(header_row + 1) {
        if row.iter().all(Cell::is_blank) {
            continue;
        }

        let mut fields = BTreeMap::new();
        let mut extra = Vec::new();
        for (col, label) in header.columns().iter().enumerate() {
            let cell = row.get(col).cloned().unwrap_or(Cell::Empty);
            match label {
                ColumnLabel::Field(field) => {
                    fields.insert(*field, cell);
                }
                ColumnLabel::Raw(label) => extra.push((label.clone(), cell)),
            }
        }

        if has_quantity {
            match fields.get(&CanonicalField::Quantity).and_then(Cell::as_number) {
                Some(qty) => {
                    fields.insert(CanonicalField::Quantity, Cell::Number(qty));
                }
                None => {
                    skipped += 1;
                    continue;
                }
            }
        }

        if filter_items && !starts_with_digit(fields.get(&CanonicalField::ItemNumber)) {
            skipped += 1;
            continue;
        }

        if options.split_descriptions {
            describe::apply(&mut fields);
        }

        records.push(Record::new(sheet, index + 1, fields, extra));
    }

    SheetOutcome::Extracted(SheetRecords {
        sheet: sheet.to_string(),
        header_row,
        header,
        records,
        skipped,
    })
}

/// Width up to the last column holding a non-blank cell, from the header
/// row down.
fn occupied_width(grid: &RawGrid, header_row: usize) -> usize {
    grid.rows()
        .iter()
        .skip(header_row)
        .filter_map(|row| row.iter().rposition(|c| !c.is_blank()))
        .map(|last| last + 1)
        .max()
        .unwrap_or(0)
}

fn starts_with_digit(cell: Option<&Cell>) -> bool {
    cell.map(|c| c.display())
        .and_then(|s| s.trim_start().chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}
