use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{ErrorSummary, ValidationError};
use crate::grid::{Cell, RawGrid, Workbook};
use crate::identifier::{identifier_key, secondary_key};
use crate::schema::CanonicalField;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded sources for one run. The duty table is a single grid.
pub struct ReconInput<'a> {
    pub input: &'a Workbook,
    pub reference: &'a Workbook,
    pub duty: &'a RawGrid,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One extracted data row. Built once by the extractor and never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    sheet: String,
    row: usize,
    fields: BTreeMap<CanonicalField, Cell>,
    extra: Vec<(String, Cell)>,
}

impl Record {
    pub fn new(
        sheet: impl Into<String>,
        row: usize,
        fields: BTreeMap<CanonicalField, Cell>,
        extra: Vec<(String, Cell)>,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            fields,
            extra,
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// 1-based spreadsheet row.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Field value; blank cells read as missing.
    pub fn get(&self, field: CanonicalField) -> Option<&Cell> {
        self.fields.get(&field).filter(|c| !c.is_blank())
    }

    pub fn fields(&self) -> &BTreeMap<CanonicalField, Cell> {
        &self.fields
    }

    /// Columns whose labels matched no canonical field.
    pub fn extra(&self) -> &[(String, Cell)] {
        &self.extra
    }

    /// Identifier as written in the sheet.
    pub fn identifier(&self) -> String {
        self.get(CanonicalField::Identifier)
            .map(Cell::display)
            .unwrap_or_default()
    }

    pub fn identifier_key(&self) -> String {
        identifier_key(self.get(CanonicalField::Identifier))
    }

    pub fn secondary_key(&self) -> String {
        secondary_key(&self.identifier())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One paired input/reference sheet and what came of it.
#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub input_sheet: String,
    pub reference_sheet: String,
    pub similarity: f64,
    pub records: usize,
    pub matched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub input_sheets: usize,
    pub reference_sheets: usize,
    pub duty_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ErrorSummary,
    pub sheets: Vec<SheetReport>,
    pub unmatched_sheets: Vec<String>,
    pub errors: Vec<ValidationError>,
}

impl ReconResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
