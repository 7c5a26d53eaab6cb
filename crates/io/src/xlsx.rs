// Excel file loading (xlsx, xls, xlsb, ods) and findings export (xlsx only)
//
// Loading keeps cell values untyped: text, numbers, or empty. Rows keep
// their spreadsheet positions so that reported row numbers match Excel.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook as XlsxWorkbook};
use shipcheck_recon::{Cell, ErrorKind, RawGrid, ReconResult, Workbook};
use tracing::debug;

use crate::error::{LoadError, ReportError};
use crate::report::REPORT_COLUMNS;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load every sheet of a spreadsheet file, in workbook order.
pub fn load(path: &Path) -> Result<Workbook, LoadError> {
    let workbook_err = |source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut sheets: Sheets<_> = open_workbook_auto(path).map_err(workbook_err)?;
    let sheet_names: Vec<String> = sheets.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(LoadError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = Workbook::new();
    for sheet_name in &sheet_names {
        let range = sheets.worksheet_range(sheet_name).map_err(workbook_err)?;

        // Range start offset (data may not begin at A1)
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let (start_row, start_col) = (start_row as usize, start_col as usize);

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; start_col];
            cells.extend(row.iter().map(to_cell));
            rows.push(cells);
        }

        debug!(path = %path.display(), sheet = %sheet_name, rows = rows.len(), "loaded sheet");
        workbook.push(sheet_name.clone(), RawGrid::new(rows));
    }

    Ok(workbook)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => Cell::text(format!("#{e:?}")),
        // Serial date; dates are never compared as dates here
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Findings export
// ---------------------------------------------------------------------------

/// Write findings to an xlsx file: an `Errors` sheet in discovery order and
/// a `Summary` sheet with counts per category.
pub fn write_findings(result: &ReconResult, path: &Path) -> Result<(), ReportError> {
    let mut xlsx_workbook = XlsxWorkbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD8E4BC))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    let errors = xlsx_workbook.add_worksheet().set_name("Errors")?;
    for (col, title) in REPORT_COLUMNS.iter().enumerate() {
        errors.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (i, e) in result.errors.iter().enumerate() {
        let row = (i + 1) as u32;
        errors.write_string(row, 0, &e.sheet)?;
        if let Some(sheet_row) = e.row {
            errors.write_number(row, 1, sheet_row as f64)?;
        }
        errors.write_string(row, 2, &e.identifier)?;
        errors.write_string(row, 3, e.category.as_str())?;
        errors.write_string(row, 4, &e.message)?;
    }
    for (col, width) in [(0u16, 18.0), (1, 8.0), (2, 18.0), (3, 30.0), (4, 70.0)] {
        errors.set_column_width(col, width)?;
    }
    errors.set_freeze_panes(1, 0)?;

    let summary = xlsx_workbook.add_worksheet().set_name("Summary")?;
    summary.write_string_with_format(0, 0, "Category", &header_format)?;
    summary.write_string_with_format(0, 1, "Count", &header_format)?;
    let mut row = 1u32;
    for kind in ErrorKind::ALL {
        let count = result.summary.by_category.get(kind.as_str()).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        summary.write_string(row, 0, kind.as_str())?;
        summary.write_number(row, 1, count as f64)?;
        row += 1;
    }
    summary.write_string_with_format(row, 0, "Total", &Format::new().set_bold())?;
    summary.write_number_with_format(row, 1, result.summary.total as f64, &Format::new().set_bold())?;
    summary.set_column_width(0, 36.0)?;

    xlsx_workbook.save(path)?;
    Ok(())
}
