// File I/O: workbook loading (xlsx/xls/xlsb/ods, csv) and report writing

pub mod csv;
pub mod error;
pub mod report;
pub mod xlsx;

use std::path::Path;

use shipcheck_recon::Workbook;

pub use error::{LoadError, ReportError};
pub use report::{write_report, ReportFormat};

/// Extensions handled by calamine.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Load any supported file into a workbook, dispatching on extension.
/// A CSV file becomes a single sheet named after the file stem.
pub fn load_workbook(path: &Path) -> Result<Workbook, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "tsv" | "txt" => csv::load(path),
        ext if SPREADSHEET_EXTENSIONS.contains(&ext) => xlsx::load(path),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}
