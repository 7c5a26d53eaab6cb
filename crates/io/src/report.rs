// Findings report: xlsx, csv or json

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use shipcheck_recon::ReconResult;
use tracing::info;

use crate::error::ReportError;

/// Column titles of the findings table, in order.
pub const REPORT_COLUMNS: [&str; 5] = ["Sheet", "Row", "Identifier", "Category", "Error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ReportFormat {
    /// Format implied by a file extension; anything unknown is xlsx.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Xlsx,
        }
    }
}

pub fn write_report(result: &ReconResult, path: &Path, format: ReportFormat) -> Result<(), ReportError> {
    match format {
        ReportFormat::Xlsx => crate::xlsx::write_findings(result, path)?,
        ReportFormat::Csv => {
            let mut out = BufWriter::new(File::create(path)?);
            write_csv(result, &mut out)?;
            out.flush()?;
        }
        ReportFormat::Json => {
            let mut out = BufWriter::new(File::create(path)?);
            write_json(result, &mut out)?;
            out.flush()?;
        }
    }
    info!(path = %path.display(), errors = result.errors.len(), ?format, "report written");
    Ok(())
}

/// One CSV row per finding. Sheet-level findings have an empty row cell.
pub fn write_csv<W: Write>(result: &ReconResult, writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(REPORT_COLUMNS)?;
    for e in &result.errors {
        let row = e.row.map(|r| r.to_string()).unwrap_or_default();
        wtr.write_record([
            e.sheet.as_str(),
            row.as_str(),
            e.identifier.as_str(),
            e.category.as_str(),
            e.message.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(result: &ReconResult, mut writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    Ok(())
}
