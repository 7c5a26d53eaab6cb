//! Per-source normalization stages: turn a loaded workbook into extracted
//! sheets, reporting sheets that cannot be read.

use regex::Regex;
use tracing::{debug, info, warn};

use crate::aggregate::ErrorKind;
use crate::context::RunContext;
use crate::duty::DutyTable;
use crate::extract::{extract_sheet, ExtractOptions, SheetOutcome, SheetRecords};
use crate::grid::{RawGrid, Workbook};

/// Extracted sheets of one workbook, in workbook order. Sheets that could
/// not be extracted are absent.
#[derive(Debug, Clone, Default)]
pub struct NormalizedWorkbook {
    pub sheets: Vec<SheetRecords>,
    /// Names considered for pairing (excluded sheets removed).
    pub names: Vec<String>,
}

impl NormalizedWorkbook {
    pub fn sheet(&self, name: &str) -> Option<&SheetRecords> {
        self.sheets.iter().find(|s| s.sheet == name)
    }

    pub fn record_count(&self) -> usize {
        self.sheets.iter().map(|s| s.records.len()).sum()
    }
}

pub fn normalize_input(
    workbook: &Workbook,
    options: &ExtractOptions,
    ctx: &mut RunContext,
) -> NormalizedWorkbook {
    normalize_workbook("input", workbook, options, None, ctx)
}

/// Like [`normalize_input`], but sheets whose name matches `exclude` are
/// dropped before extraction.
pub fn normalize_reference(
    workbook: &Workbook,
    options: &ExtractOptions,
    exclude: Option<&Regex>,
    ctx: &mut RunContext,
) -> NormalizedWorkbook {
    normalize_workbook("reference", workbook, options, exclude, ctx)
}

pub fn normalize_duty(grid: &RawGrid, ctx: &RunContext) -> DutyTable {
    let table = DutyTable::from_grid(grid);
    if ctx.is_verbose() {
        let sample: Vec<&str> = table.rows().iter().take(5).map(|r| r.item_name.as_str()).collect();
        debug!(rows = table.len(), ?sample, "duty table");
    }
    table
}

fn normalize_workbook(
    source: &str,
    workbook: &Workbook,
    options: &ExtractOptions,
    exclude: Option<&Regex>,
    ctx: &mut RunContext,
) -> NormalizedWorkbook {
    let mut out = NormalizedWorkbook::default();

    for sheet in workbook.sheets() {
        if exclude.is_some_and(|re| re.is_match(&sheet.name)) {
            info!(source, sheet = %sheet.name, "skipping excluded sheet");
            continue;
        }
        out.names.push(sheet.name.clone());

        match extract_sheet(&sheet.name, &sheet.grid, options) {
            SheetOutcome::Extracted(records) => {
                debug!(
                    source,
                    sheet = %sheet.name,
                    header_row = records.header_row + 1,
                    records = records.records.len(),
                    skipped = records.skipped,
                    "extracted sheet"
                );
                if ctx.is_verbose() {
                    let sample: Vec<String> =
                        records.records.iter().take(5).map(|r| r.identifier_key()).collect();
                    debug!(source, sheet = %sheet.name, ?sample, "identifier keys");
                }
                out.sheets.push(records);
            }
            SheetOutcome::HeaderNotFound => {
                warn!(source, sheet = %sheet.name, "header row not found");
                ctx.report_sheet(
                    &sheet.name,
                    ErrorKind::HeaderNotFound,
                    format!("Could not find header row in {source} sheet"),
                );
            }
            SheetOutcome::MissingIdentifierColumn { header_row } => {
                warn!(source, sheet = %sheet.name, header_row = header_row + 1, "no P/N column");
                ctx.report_sheet(
                    &sheet.name,
                    ErrorKind::MissingIdentifierColumnInSheet,
                    format!("No P/N column in {source} sheet header (row {})", header_row + 1),
                );
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Verbosity;

    fn data_sheet(pn: &str) -> RawGrid {
        RawGrid::from_strs(&[
            &["Item No.", "Model No.", "P/N", "Quantity PCS"],
            &["1", "M", pn, "2"],
        ])
    }

    #[test]
    fn sheet_failures_are_isolated() {
        let wb = Workbook::new()
            .with_sheet("Good", data_sheet("A1"))
            .with_sheet("Notes", RawGrid::from_strs(&[&["free text"]]))
            .with_sheet(
                "NoPN",
                RawGrid::from_strs(&[&["Item No.", "Model No.", "Quantity PCS", "Part name"]]),
            );
        let mut ctx = RunContext::new(Verbosity::Normal);
        let out = normalize_input(&wb, &ExtractOptions::default(), &mut ctx);

        assert_eq!(out.sheets.len(), 1);
        assert_eq!(out.record_count(), 1);
        assert_eq!(out.names, vec!["Good", "Notes", "NoPN"]);

        let kinds: Vec<ErrorKind> = ctx.errors().entries().iter().map(|e| e.category).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::HeaderNotFound, ErrorKind::MissingIdentifierColumnInSheet]
        );
    }

    #[test]
    fn packing_lists_are_excluded() {
        let wb = Workbook::new()
            .with_sheet("Invoice", data_sheet("A1"))
            .with_sheet("PL", RawGrid::from_strs(&[&["weights"]]));
        let exclude = Regex::new(r"(?i)\bPL\b").unwrap();
        let mut ctx = RunContext::default();
        let out = normalize_reference(&wb, &ExtractOptions::default(), Some(&exclude), &mut ctx);

        assert_eq!(out.names, vec!["Invoice"]);
        assert!(out.sheet("Invoice").is_some());
        assert!(ctx.errors().is_empty());
    }
}
