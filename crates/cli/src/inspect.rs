// `shipcheck inspect` - per-sheet header detection diagnostics

use serde::Serialize;
use shipcheck_recon::extract::{extract_sheet, SheetOutcome};
use shipcheck_recon::header::concepts_in;
use shipcheck_recon::schema::HeaderMap;
use shipcheck_recon::{CanonicalField, RawGrid, ReconConfig, ReconError, Workbook};

/// What header detection and extraction make of one sheet.
#[derive(Debug, Serialize)]
pub struct SheetInspection {
    pub name: String,
    pub rows: usize,
    /// `ok`, `header_not_found`, `missing_identifier_column` or `excluded`.
    pub status: &'static str,
    /// 1-based. The detected header row, or the best candidate in the scan
    /// window when none qualified.
    pub row: Option<usize>,
    pub concepts: Vec<&'static str>,
    pub columns: Vec<String>,
    pub has_identifier: bool,
    pub records: usize,
    pub skipped: usize,
}

/// Inspect every sheet of a workbook with the extraction settings of the
/// input side, or of the reference side when `reference` is set.
pub fn inspect_workbook(
    workbook: &Workbook,
    config: &ReconConfig,
    reference: bool,
) -> Result<Vec<SheetInspection>, ReconError> {
    config.validate()?;
    let (options, exclude) = if reference {
        (config.reference_options(), config.exclude_pattern()?)
    } else {
        (config.input_options(), None)
    };

    let mut out = Vec::with_capacity(workbook.sheets().len());
    for sheet in workbook.sheets() {
        let grid = &sheet.grid;
        let mut inspection = SheetInspection {
            name: sheet.name.clone(),
            rows: grid.len(),
            status: "ok",
            row: None,
            concepts: Vec::new(),
            columns: Vec::new(),
            has_identifier: false,
            records: 0,
            skipped: 0,
        };

        if exclude.as_ref().is_some_and(|re| re.is_match(&sheet.name)) {
            inspection.status = "excluded";
            out.push(inspection);
            continue;
        }

        match extract_sheet(&sheet.name, grid, &options) {
            SheetOutcome::Extracted(extracted) => {
                describe_header(&mut inspection, grid, extracted.header_row, &extracted.header);
                inspection.records = extracted.records.len();
                inspection.skipped = extracted.skipped;
            }
            SheetOutcome::MissingIdentifierColumn { header_row } => {
                inspection.status = "missing_identifier_column";
                let header = HeaderMap::from_header_row(grid.row(header_row).unwrap_or(&[]));
                describe_header(&mut inspection, grid, header_row, &header);
            }
            SheetOutcome::HeaderNotFound => {
                inspection.status = "header_not_found";
                if let Some(best) = best_candidate(grid, options.window) {
                    inspection.row = Some(best + 1);
                    inspection.concepts = concept_names(grid, best);
                }
            }
        }
        out.push(inspection);
    }
    Ok(out)
}

fn describe_header(inspection: &mut SheetInspection, grid: &RawGrid, row: usize, header: &HeaderMap) {
    inspection.row = Some(row + 1);
    inspection.concepts = concept_names(grid, row);
    inspection.columns = header
        .columns()
        .iter()
        .map(|label| label.as_str().to_string())
        .collect();
    inspection.has_identifier = header.contains(CanonicalField::Identifier);
}

fn concept_names(grid: &RawGrid, row: usize) -> Vec<&'static str> {
    grid.row(row)
        .map(concepts_in)
        .unwrap_or_default()
        .iter()
        .map(|c| c.as_str())
        .collect()
}

/// Row in the scan window mentioning the most concepts; earliest wins ties.
/// None when no row mentions any.
fn best_candidate(grid: &RawGrid, window: usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, row) in grid.rows().iter().take(window).enumerate() {
        let n = concepts_in(row).len();
        if n > 0 && best.map_or(true, |(_, m)| n > m) {
            best = Some((i, n));
        }
    }
    best.map(|(i, _)| i)
}

/// Plain-text rendering, one block per sheet.
pub fn render(inspections: &[SheetInspection]) -> String {
    let mut out = String::new();
    for s in inspections {
        out.push_str(&format!("{} ({} rows): {}\n", s.name, s.rows, s.status));
        if let Some(row) = s.row {
            let label = if s.status == "header_not_found" { "best row" } else { "header row" };
            out.push_str(&format!("  {label} {row}: {}\n", s.concepts.join(", ")));
        }
        if !s.columns.is_empty() {
            out.push_str(&format!("  columns: {}\n", s.columns.join(" | ")));
        }
        if s.status == "ok" {
            out.push_str(&format!("  {} records, {} skipped\n", s.records, s.skipped));
        }
    }
    out
}
