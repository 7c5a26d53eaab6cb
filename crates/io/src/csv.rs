// CSV/TSV loading

use std::io::Read;
use std::path::Path;

use shipcheck_recon::{Cell, RawGrid, Workbook};
use tracing::debug;

use crate::error::LoadError;

/// Load a delimited text file as a one-sheet workbook. The sheet is named
/// after the file stem.
pub fn load(path: &Path) -> Result<Workbook, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    debug!(path = %path.display(), delimiter = %(delimiter as char).escape_default(), "loading CSV");
    let grid = parse_grid(&content, delimiter).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Sheet1".to_string());
    Ok(Workbook::new().with_sheet(name, grid))
}

const DELIMITER_CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];
const SNIFF_LINES: usize = 10;

/// Guess the field delimiter from the first few lines.
///
/// A candidate must split the first line into several fields. It scores
/// that width times the number of sampled lines sharing it; the highest
/// score wins, earlier candidates on ties. Comma when nothing qualifies.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SNIFF_LINES).collect();
    let mut best = (b',', 0usize);

    for delimiter in DELIMITER_CANDIDATES {
        let widths: Vec<usize> = sample.iter().map(|line| field_count(line, delimiter)).collect();
        let Some(&first) = widths.first() else {
            break;
        };
        if first <= 1 {
            continue;
        }
        let score = first * widths.iter().filter(|&&w| w == first).count();
        if score > best.1 {
            best = (delimiter, score);
        }
    }

    best.0
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}

/// Read a file as UTF-8, falling back to Windows-1252 for Excel-exported CSVs.
/// A leading byte-order mark is dropped.
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Parse delimited text into a grid. Every field stays text; empty fields
/// become empty cells. Rows may have differing lengths.
pub fn parse_grid(content: &str, delimiter: u8) -> Result<RawGrid, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(Cell::from).collect());
    }
    Ok(RawGrid::new(rows))
}
